//! Configuration management.
//!
//! Settings are layered, later layers winning:
//!
//! 1. Defaults (file store at `$HOME/.tir.json`)
//! 2. A TOML config file
//! 3. `TIR_*` environment variables
//! 4. Command-line flags
//!
//! ```toml
//! [store]
//! type = "http"
//! base_url = "https://tir.example.com"
//! api_secret = "..."
//! ping_timeout_ms = 1000
//! operation_timeout_ms = 3000
//!
//! [logging]
//! format = "json"
//! filter = "tiir=debug"
//! ```

mod store;

pub use store::{
    DEFAULT_OPERATION_TIMEOUT, DEFAULT_PING_TIMEOUT, SQLITE_IN_MEMORY, StoreConfig,
    StoreSettings, StoreTimeouts, StoreType,
};

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration for tir.
#[derive(Debug, Clone, Default)]
pub struct TirConfig {
    /// Which store to use and how to reach it.
    pub store: StoreConfig,
    /// Logging settings from the config file.
    pub logging: LoggingSettings,
}

/// Logging settings as written in the config file.
///
/// Turned into a subscriber configuration by
/// [`crate::observability::LoggingConfig::from_settings`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingSettings {
    /// Output format: "pretty" or "json".
    pub format: Option<String>,
    /// `EnvFilter` directive, e.g. `tiir=debug`.
    pub filter: Option<String>,
}

/// On-disk config file layout.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    store: Option<StoreSettings>,
    logging: Option<LoggingSettings>,
}

impl TirConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from `path` (or the default location), then
    /// applies environment variables and `overrides`.
    ///
    /// An explicit `path` must exist; a missing file at the default location
    /// is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the
    /// resulting store settings are invalid.
    pub fn load(path: Option<&Path>, overrides: StoreSettings) -> Result<Self> {
        let file = match path {
            Some(path) => read_config_file(path)?,
            None => match default_config_path().filter(|p| p.exists()) {
                Some(path) => read_config_file(&path)?,
                None => ConfigFile::default(),
            },
        };

        Self::from_config_file(file, StoreSettings::from_env().overlay(overrides))
    }

    /// Loads configuration from a file path, then applies environment
    /// variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        Self::load(Some(path), StoreSettings::default())
    }

    /// Converts a `ConfigFile` to `TirConfig`, layering `overrides` on top
    /// of the file's store settings.
    fn from_config_file(file: ConfigFile, overrides: StoreSettings) -> Result<Self> {
        let store = file.store.unwrap_or_default().overlay(overrides).resolve()?;
        Ok(Self {
            store,
            logging: file.logging.unwrap_or_default(),
        })
    }

    /// Sets the store.
    #[must_use]
    pub fn with_store(mut self, store: StoreConfig) -> Self {
        self.store = store;
        self
    }
}

/// `<config dir>/tir/config.toml`, e.g. `~/.config/tir/config.toml`.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|dirs| dirs.config_dir().join("tir").join("config.toml"))
}

fn read_config_file(path: &Path) -> Result<ConfigFile> {
    let contents = std::fs::read_to_string(path).map_err(|e| Error::OperationFailed {
        operation: "read_config_file".to_string(),
        cause: format!("{}: {e}", path.display()),
    })?;

    toml::from_str(&contents).map_err(|e| Error::OperationFailed {
        operation: "parse_config_file".to_string(),
        cause: e.to_string(),
    })
}
