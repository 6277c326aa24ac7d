pub mod catalog;
pub mod clock;
pub mod event_source;
pub mod flag_store;
pub mod idle;
pub mod main_app;
pub mod panic_handler;
pub mod prompts;
pub mod settings;
pub mod share;
pub mod theme;
pub mod timer;
pub mod toast;
pub mod usage;
pub mod viewport;

pub mod test_utils;

pub use main_app::{App, AppAction, run_app_with_event_source};
