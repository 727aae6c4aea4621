//! Store selection and settings.

use crate::{Error, Result};
use secrecy::SecretString;
use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Default connectivity probe budget.
pub const DEFAULT_PING_TIMEOUT: Duration = Duration::from_secs(1);

/// Default per-operation budget.
pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(3);

/// Path that selects an in-memory `SQLite` database.
pub const SQLITE_IN_MEMORY: &str = ":memory:";

/// Timeouts applied by the SQL and HTTP stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreTimeouts {
    /// Budget for the connectivity probe run while opening the store.
    pub ping: Duration,
    /// Budget for every operation after opening.
    pub operation: Duration,
}

impl Default for StoreTimeouts {
    fn default() -> Self {
        Self {
            ping: DEFAULT_PING_TIMEOUT,
            operation: DEFAULT_OPERATION_TIMEOUT,
        }
    }
}

/// Which backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreType {
    /// A local JSON file.
    #[default]
    File,
    /// An in-memory map; nothing persists.
    Memory,
    /// A remote tir server.
    Http,
    /// A `SQLite` database.
    Sqlite,
}

impl StoreType {
    /// Returns the config-file spelling of this store type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Memory => "memory",
            Self::Http => "http",
            Self::Sqlite => "sqlite",
        }
    }
}

impl fmt::Display for StoreType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StoreType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "file" => Ok(Self::File),
            "memory" => Ok(Self::Memory),
            "http" => Ok(Self::Http),
            "sqlite" | "sql" | "libsql" => Ok(Self::Sqlite),
            other => Err(Error::InvalidInput(format!(
                "unknown store type '{other}' (expected file, memory, http or sqlite)"
            ))),
        }
    }
}

/// A fully resolved store selection.
#[derive(Debug, Clone)]
pub enum StoreConfig {
    /// JSON file at `path`.
    File {
        /// Location of the store file.
        path: PathBuf,
    },
    /// In-memory store.
    Memory,
    /// Remote tir server.
    Http {
        /// Server root, e.g. `https://tir.example.com`.
        base_url: String,
        /// Shared secret sent as a bearer token.
        api_secret: Option<SecretString>,
        /// Probe and request budgets.
        timeouts: StoreTimeouts,
    },
    /// `SQLite` database at `path` ([`SQLITE_IN_MEMORY`] for in-memory).
    Sqlite {
        /// Location of the database.
        path: PathBuf,
        /// Probe and statement budgets.
        timeouts: StoreTimeouts,
    },
}

impl StoreConfig {
    /// Returns the type of this store.
    #[must_use]
    pub const fn store_type(&self) -> StoreType {
        match self {
            Self::File { .. } => StoreType::File,
            Self::Memory => StoreType::Memory,
            Self::Http { .. } => StoreType::Http,
            Self::Sqlite { .. } => StoreType::Sqlite,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::File {
            path: default_path(".tir.json"),
        }
    }
}

/// `$HOME/<name>`, or `<name>` in the working directory if there is no home.
fn default_path(name: &str) -> PathBuf {
    directories::BaseDirs::new()
        .map_or_else(|| PathBuf::from(name), |dirs| dirs.home_dir().join(name))
}

/// Unresolved store settings, as read from a config file, the environment,
/// or command-line flags.
///
/// Layers are combined with [`StoreSettings::overlay`] and turned into a
/// [`StoreConfig`] with [`StoreSettings::resolve`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreSettings {
    /// Store type name.
    #[serde(rename = "type")]
    pub store_type: Option<String>,
    /// File or database path.
    pub path: Option<String>,
    /// HTTP server root.
    pub base_url: Option<String>,
    /// HTTP shared secret.
    pub api_secret: Option<String>,
    /// Probe budget in milliseconds.
    pub ping_timeout_ms: Option<u64>,
    /// Operation budget in milliseconds.
    pub operation_timeout_ms: Option<u64>,
}

impl StoreSettings {
    /// Reads `TIR_*` variables from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Reads `TIR_*` variables through `var`.
    ///
    /// Unparseable timeout values are ignored with a warning.
    pub fn from_env_with(var: impl Fn(&str) -> Option<String>) -> Self {
        let millis = |key: &str| {
            var(key).and_then(|value| match value.trim().parse::<u64>() {
                Ok(ms) => Some(ms),
                Err(e) => {
                    tracing::warn!(key, value = %value, error = %e, "Ignoring invalid timeout");
                    None
                },
            })
        };

        Self {
            store_type: var("TIR_STORE_TYPE"),
            path: var("TIR_STORE_PATH"),
            base_url: var("TIR_BASE_URL"),
            api_secret: var("TIR_API_SECRET"),
            ping_timeout_ms: millis("TIR_PING_TIMEOUT_MS"),
            operation_timeout_ms: millis("TIR_OPERATION_TIMEOUT_MS"),
        }
    }

    /// Returns `self` with every field that `over` sets replaced.
    #[must_use]
    pub fn overlay(self, over: Self) -> Self {
        Self {
            store_type: over.store_type.or(self.store_type),
            path: over.path.or(self.path),
            base_url: over.base_url.or(self.base_url),
            api_secret: over.api_secret.or(self.api_secret),
            ping_timeout_ms: over.ping_timeout_ms.or(self.ping_timeout_ms),
            operation_timeout_ms: over.operation_timeout_ms.or(self.operation_timeout_ms),
        }
    }

    /// Resolves the settings into a store selection.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for an unknown store type or an HTTP
    /// store without a base URL.
    pub fn resolve(self) -> Result<StoreConfig> {
        let store_type = self
            .store_type
            .as_deref()
            .map_or(Ok(StoreType::default()), str::parse)?;

        let mut timeouts = StoreTimeouts::default();
        if let Some(ms) = self.ping_timeout_ms {
            timeouts.ping = Duration::from_millis(ms);
        }
        if let Some(ms) = self.operation_timeout_ms {
            timeouts.operation = Duration::from_millis(ms);
        }

        let path = self.path.filter(|p| !p.is_empty()).map(PathBuf::from);
        let config = match store_type {
            StoreType::File => StoreConfig::File {
                path: path.unwrap_or_else(|| default_path(".tir.json")),
            },
            StoreType::Memory => StoreConfig::Memory,
            StoreType::Sqlite => StoreConfig::Sqlite {
                path: path.unwrap_or_else(|| default_path(".tir.db")),
                timeouts,
            },
            StoreType::Http => StoreConfig::Http {
                base_url: self.base_url.filter(|u| !u.is_empty()).ok_or_else(|| {
                    Error::InvalidInput("http store requires a base URL".to_string())
                })?,
                api_secret: self
                    .api_secret
                    .filter(|s| !s.is_empty())
                    .map(SecretString::from),
                timeouts,
            },
        };

        Ok(config)
    }
}
