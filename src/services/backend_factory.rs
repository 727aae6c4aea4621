//! Backend factory for storage layer initialization.
//!
//! Turns a [`StoreConfig`] into a boxed [`TextStore`]:
//!
//! ```text
//! BackendFactory::create(&StoreConfig)
//!   ├── File   → FileStore::open(path)
//!   ├── Memory → MemoryStore::new()
//!   ├── Sqlite → SqliteStore::open(path) / SqliteStore::in_memory()
//!   └── Http   → HttpStore::connect(base_url, api_secret)
//! ```
//!
//! There is no fallback: if the configured store cannot be opened, the
//! error is returned.

use crate::Result;
use crate::config::{SQLITE_IN_MEMORY, StoreConfig};
use crate::storage::traits::TextStore;
use crate::storage::{FileStore, HttpStore, MemoryStore, SqliteStore};

/// Factory for creating text stores.
///
/// # Example
///
/// ```rust,ignore
/// use tiir::services::BackendFactory;
/// use tiir::StoreConfig;
///
/// let store = BackendFactory::create(&StoreConfig::Memory)?;
/// # Ok::<(), tiir::Error>(())
/// ```
pub struct BackendFactory;

impl BackendFactory {
    /// Opens the store `config` selects.
    ///
    /// # Errors
    ///
    /// Returns the store's open error: I/O or parse failures for the file
    /// store, [`crate::Error::BackendUnavailable`] when the SQL or HTTP store
    /// fails its probe, [`crate::Error::InvalidInput`] for a bad base URL.
    pub fn create(config: &StoreConfig) -> Result<Box<dyn TextStore>> {
        let store: Box<dyn TextStore> = match config {
            StoreConfig::File { path } => {
                tracing::debug!(path = %path.display(), "Using file store");
                Box::new(FileStore::open(path)?)
            },
            StoreConfig::Memory => {
                tracing::debug!("Using in-memory store");
                Box::new(MemoryStore::new())
            },
            StoreConfig::Sqlite { path, timeouts } => {
                if path.as_os_str() == SQLITE_IN_MEMORY {
                    tracing::debug!("Using in-memory SQLite store");
                    Box::new(SqliteStore::in_memory(*timeouts)?)
                } else {
                    tracing::debug!(path = %path.display(), "Using SQLite store");
                    Box::new(SqliteStore::open(path, *timeouts)?)
                }
            },
            StoreConfig::Http {
                base_url,
                api_secret,
                timeouts,
            } => {
                if api_secret.is_none() {
                    tracing::warn!(
                        base_url = %base_url,
                        "No API secret configured; the server may reject writes"
                    );
                }
                tracing::debug!(base_url = %base_url, "Using HTTP store");
                Box::new(HttpStore::connect(base_url, api_secret.clone(), *timeouts)?)
            },
        };

        Ok(store)
    }
}
