//! Cross-platform application paths using the `dirs` crate.
//!
//! Layout:
//!
//! Config dir (settings):
//!   Windows: %APPDATA%\voice-flight-agent\
//!   macOS:   ~/Library/Application Support/voice-flight-agent/
//!   Linux:   ~/.config/voice-flight-agent/
//!
//! Data dir (flight database):
//!   Windows: %LOCALAPPDATA%\voice-flight-agent\
//!   macOS:   ~/Library/Application Support/voice-flight-agent/
//!   Linux:   ~/.local/share/voice-flight-agent/

use std::path::PathBuf;

/// The two files the agent keeps on disk.
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// `settings.toml` in the platform config directory.
    pub settings_file: PathBuf,
    /// Default SQLite database in the platform local data directory.
    pub database_file: PathBuf,
}

impl AppPaths {
    const APP_NAME: &'static str = "voice-flight-agent";

    /// Falls back to the current directory where the platform has no
    /// standard location.
    pub fn new() -> Self {
        let under = |base: Option<PathBuf>, file: &str| {
            base.unwrap_or_else(|| PathBuf::from("."))
                .join(Self::APP_NAME)
                .join(file)
        };
        Self {
            settings_file: under(dirs::config_dir(), "settings.toml"),
            database_file: under(dirs::data_local_dir(), "flights.db"),
        }
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}
