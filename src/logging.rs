//! Routes `log` records to the browser console.

use log::Level;

/// Most verbose level emitted: `Debug` in debug builds, `Info` otherwise.
pub fn default_level() -> Level {
    if cfg!(debug_assertions) {
        Level::Debug
    } else {
        Level::Info
    }
}

/// Install the console logger. Later calls are ignored.
pub fn init() {
    if console_log::init_with_level(default_level()).is_err() {
        log::debug!("Console logger already installed");
    }
}
