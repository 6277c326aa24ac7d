use std::fs::{self, File};
use std::io::stdout;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{error, info, warn};
use pdfdock::clock::SystemClock;
use pdfdock::event_source::TerminalEventSource;
use pdfdock::flag_store::{FileFlagStore, FlagStore, MemoryFlagStore};
use pdfdock::panic_handler::{TerminalGuard, initialize_panic_handler};
use pdfdock::prompts::{InstallCapability, InstallOutcome};
use pdfdock::settings::{default_storage_path, load_settings};
use pdfdock::share::SystemClipboard;
use pdfdock::{App, run_app_with_event_source};
use ratatui::{Terminal, backend::CrosstermBackend};
use simplelog::{Config, LevelFilter, WriteLogger};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "pdfdock", version, about = "Catalog of local PDF tools")]
struct Cli {
    /// Where to write the log
    #[arg(long, default_value = "pdfdock.log")]
    log_file: PathBuf,

    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,

    /// Flag store location (defaults to the user data directory)
    #[arg(long, conflicts_with = "ephemeral")]
    data_file: Option<PathBuf>,

    /// Keep flags in memory only
    #[arg(long)]
    ephemeral: bool,

    /// Offer the launcher install prompt on startup
    #[arg(long)]
    offer_install: bool,
}

/// Installs a desktop launcher entry for the current executable.
struct DesktopEntryInstall;

impl DesktopEntryInstall {
    fn write_entry() -> Result<PathBuf> {
        let applications = dirs::data_dir()
            .context("no data directory")?
            .join("applications");
        fs::create_dir_all(&applications)?;
        let exe = std::env::current_exe()?;
        let path = applications.join("pdfdock.desktop");
        fs::write(
            &path,
            format!(
                "[Desktop Entry]\nType=Application\nName=pdfdock\nExec={}\nTerminal=true\nCategories=Office;\n",
                exe.display()
            ),
        )?;
        Ok(path)
    }
}

impl InstallCapability for DesktopEntryInstall {
    fn suppress_default(&mut self) {}

    fn invoke(self: Box<Self>) -> InstallOutcome {
        match Self::write_entry() {
            Ok(path) => {
                info!("Installed launcher entry at {path:?}");
                InstallOutcome::Accepted
            }
            Err(e) => {
                error!("Failed to install launcher entry: {e:#}");
                InstallOutcome::Dismissed
            }
        }
    }
}

fn open_store(cli: &Cli) -> Box<dyn FlagStore> {
    if cli.ephemeral {
        return Box::new(MemoryFlagStore::new());
    }
    match cli.data_file.clone().or_else(default_storage_path) {
        Some(path) => Box::new(FileFlagStore::open_or_empty(path)),
        None => {
            warn!("Could not determine data directory, flags will not persist");
            Box::new(MemoryFlagStore::new())
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    WriteLogger::init(
        cli.log_level.into(),
        Config::default(),
        File::create(&cli.log_file)
            .with_context(|| format!("cannot create log file {:?}", cli.log_file))?,
    )?;
    initialize_panic_handler();
    info!("Starting pdfdock");

    let settings = load_settings();
    let store = open_store(&cli);
    let (width, _) = crossterm::terminal::size().unwrap_or((120, 40));

    let mut app = App::new(settings, store, Box::new(SystemClock), width)
        .with_clipboard(Box::new(SystemClipboard));
    if cli.offer_install {
        app.offer_install(Box::new(DesktopEntryInstall));
    }

    let guard = TerminalGuard::enter()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    let res = run_app_with_event_source(&mut terminal, &mut app, &mut TerminalEventSource);
    drop(guard);

    if let Err(err) = res {
        error!("Application error: {err:?}");
        eprintln!("{err:?}");
    }

    info!("Shutting down pdfdock");
    Ok(())
}
