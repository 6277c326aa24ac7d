use crate::viewport::DEFAULT_MOBILE_BREAKPOINT;
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CURRENT_VERSION: u32 = 1;
const SETTINGS_FILENAME: &str = "config.yaml";
const STORAGE_FILENAME: &str = "storage.json";
const APP_NAME: &str = "pdfdock";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default = "default_theme")]
    pub theme: String,

    /// Terminal widths below this use the compact layout.
    #[serde(default = "default_mobile_breakpoint")]
    pub mobile_breakpoint: u16,

    /// Views that show the floating support button.
    #[serde(default = "default_idle_views")]
    pub idle_views: Vec<String>,

    #[serde(default = "default_support_url")]
    pub support_url: String,
}

fn default_version() -> u32 {
    CURRENT_VERSION
}

fn default_theme() -> String {
    "Oceanic Next".to_string()
}

fn default_mobile_breakpoint() -> u16 {
    DEFAULT_MOBILE_BREAKPOINT
}

fn default_idle_views() -> Vec<String> {
    vec!["home".to_string(), "tool".to_string()]
}

fn default_support_url() -> String {
    "https://pdfdock.app".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION,
            theme: default_theme(),
            mobile_breakpoint: default_mobile_breakpoint(),
            idle_views: default_idle_views(),
            support_url: default_support_url(),
        }
    }
}

pub fn preferred_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|config| config.join(APP_NAME).join(SETTINGS_FILENAME))
}

pub fn default_storage_path() -> Option<PathBuf> {
    dirs::data_dir().map(|data| data.join(APP_NAME).join(STORAGE_FILENAME))
}

/// Loads settings from the config directory, writing defaults on first run.
pub fn load_settings() -> Settings {
    let Some(path) = preferred_config_path() else {
        warn!("Could not determine config directory, using default settings");
        return Settings::default();
    };
    if path.exists() {
        load_settings_from_path(&path)
    } else {
        info!("Settings file not found, creating with defaults at {path:?}");
        let settings = Settings::default();
        save_settings_to_file(&settings, &path);
        settings
    }
}

pub fn load_settings_from_path(path: &Path) -> Settings {
    match fs::read_to_string(path) {
        Ok(content) => match serde_yaml::from_str::<Settings>(&content) {
            Ok(mut settings) => {
                debug!("Loaded settings from {path:?}");
                if settings.version < CURRENT_VERSION {
                    migrate_settings(&mut settings);
                    save_settings_to_file(&settings, path);
                }
                settings
            }
            Err(e) => {
                error!("Failed to parse settings file {path:?}: {e}");
                Settings::default()
            }
        },
        Err(e) => {
            error!("Failed to read settings file {path:?}: {e}");
            Settings::default()
        }
    }
}

fn migrate_settings(settings: &mut Settings) {
    info!(
        "Migrating settings from v{} to v{}",
        settings.version, CURRENT_VERSION
    );
    settings.version = CURRENT_VERSION;
}

pub fn save_settings_to_file(settings: &Settings, path: &Path) {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            if let Err(e) = fs::create_dir_all(parent) {
                error!("Failed to create config directory {parent:?}: {e}");
                return;
            }
        }
    }

    let body = match serde_yaml::to_string(settings) {
        Ok(body) => body,
        Err(e) => {
            error!("Failed to serialize settings: {e}");
            return;
        }
    };
    let content = format!("{SETTINGS_HEADER}{body}");

    match fs::write(path, content) {
        Ok(()) => debug!("Saved settings to {path:?}"),
        Err(e) => error!("Failed to save settings to {path:?}: {e}"),
    }
}

const SETTINGS_HEADER: &str = r#"# pdfdock settings
#
# mobile_breakpoint: terminal columns below which the compact layout is used
# idle_views: views that show the floating support button
#   (any of: home, tool, about, privacy)
# support_url: link offered by the share and copy actions

"#;

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_fields_take_defaults() {
        let settings: Settings = serde_yaml::from_str("theme: \"Catppuccin Mocha\"\n").unwrap();

        assert_eq!(settings.theme, "Catppuccin Mocha");
        assert_eq!(settings.mobile_breakpoint, DEFAULT_MOBILE_BREAKPOINT);
        assert_eq!(settings.idle_views, vec!["home", "tool"]);
    }

    #[test]
    fn saved_settings_load_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pdfdock").join(SETTINGS_FILENAME);
        let settings = Settings {
            idle_views: vec!["about".into()],
            mobile_breakpoint: 100,
            ..Settings::default()
        };

        save_settings_to_file(&settings, &path);

        assert_eq!(load_settings_from_path(&path), settings);
    }

    #[test]
    fn outdated_version_is_migrated() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(SETTINGS_FILENAME);
        fs::write(&path, "version: 0\n").unwrap();

        let settings = load_settings_from_path(&path);

        assert_eq!(settings.version, CURRENT_VERSION);
        let rewritten = fs::read_to_string(&path).unwrap();
        assert!(rewritten.contains(&format!("version: {CURRENT_VERSION}")));
    }

    #[test]
    fn unparseable_file_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(SETTINGS_FILENAME);
        fs::write(&path, "idle_views: [unterminated\n").unwrap();

        assert_eq!(load_settings_from_path(&path), Settings::default());
    }
}
