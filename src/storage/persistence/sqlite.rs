//! `SQLite` text store.
//!
//! Texts live in a `texts` table created on first use. Writes are single
//! statements (`INSERT OR REPLACE ... RETURNING`, `DELETE ... RETURNING`),
//! so each one is atomic in the database without a client-side transaction.
//! Listing scans the whole table and sorts in memory.

use crate::config::StoreTimeouts;
use crate::models::{Comparator, Direction, Text, TextId, sort};
use crate::storage::metrics::{record_operation_metrics, status_of};
use crate::storage::sqlite::{
    CREATE_TABLE, TEXT_COLUMNS, TextRow, acquire_lock, configure_connection, probe,
};
use crate::storage::traits::TextStore;
use crate::{Error, Result};
use rusqlite::{Connection, OptionalExtension, params};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Instant;
use tracing::instrument;

/// `SQLite` text store.
///
/// # Concurrency Model
///
/// Uses a `Mutex<Connection>` for thread-safe access since
/// `rusqlite::Connection` is not `Sync`. Concurrent upserts of the same ID
/// rely on `INSERT OR REPLACE` being atomic; no other locking is added.
///
/// # Timeouts
///
/// Opening runs a `SELECT 1` probe with the busy timeout set to
/// [`StoreTimeouts::ping`]; afterwards the busy timeout is
/// [`StoreTimeouts::operation`].
#[derive(Debug)]
pub struct SqliteStore {
    conn: Mutex<Connection>,
    /// Path to the database (None for in-memory).
    db_path: Option<PathBuf>,
}

impl SqliteStore {
    /// Opens (or creates) the database at `db_path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BackendUnavailable`] if the database cannot be opened
    /// or fails the probe, and [`Error::OperationFailed`] if the table cannot
    /// be created.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// use tiir::{SqliteStore, StoreTimeouts};
    ///
    /// let store = SqliteStore::open("./tir.db", StoreTimeouts::default())?;
    /// # Ok::<(), tiir::Error>(())
    /// ```
    pub fn open(db_path: impl Into<PathBuf>, timeouts: StoreTimeouts) -> Result<Self> {
        let db_path = db_path.into();
        let conn = Connection::open(&db_path).map_err(|e| Error::BackendUnavailable {
            backend: "sqlite".to_string(),
            cause: format!("{}: {e}", db_path.display()),
        })?;

        initialize(&conn, timeouts)?;
        tracing::debug!(path = %db_path.display(), "Opened SQLite store");

        Ok(Self {
            conn: Mutex::new(conn),
            db_path: Some(db_path),
        })
    }

    /// Creates a store backed by an in-memory database (useful for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn in_memory(timeouts: StoreTimeouts) -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|e| Error::BackendUnavailable {
            backend: "sqlite".to_string(),
            cause: e.to_string(),
        })?;

        initialize(&conn, timeouts)?;

        Ok(Self {
            conn: Mutex::new(conn),
            db_path: None,
        })
    }

    /// Returns the database path (None for in-memory).
    #[must_use]
    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }
}

/// Probes the connection, applies pragmas, and creates the `texts` table.
fn initialize(conn: &Connection, timeouts: StoreTimeouts) -> Result<()> {
    probe(conn, timeouts.ping)?;
    configure_connection(conn, timeouts.operation)?;

    conn.execute(CREATE_TABLE, [])
        .map_err(|e| Error::OperationFailed {
            operation: "create_texts_table".to_string(),
            cause: e.to_string(),
        })?;

    Ok(())
}

impl TextStore for SqliteStore {
    #[instrument(skip(self), fields(operation = "read", backend = "sqlite", text.id = %id))]
    fn read(&self, id: &TextId) -> Result<Text> {
        let start = Instant::now();
        let result = (|| {
            let conn = acquire_lock(&self.conn);

            let row = conn
                .query_row(
                    &format!("SELECT {TEXT_COLUMNS} FROM texts WHERE id = ?1"),
                    params![id.as_str()],
                    TextRow::from_row,
                )
                .optional()
                .map_err(|e| Error::OperationFailed {
                    operation: "read_text".to_string(),
                    cause: e.to_string(),
                })?;

            row.ok_or_else(|| Error::NotFound(id.clone()))?.into_text()
        })();

        record_operation_metrics("sqlite", "read", start, status_of(&result));
        result
    }

    #[instrument(skip(self, text), fields(operation = "upsert", backend = "sqlite", text.id = %text.id))]
    fn upsert(&self, text: Text) -> Result<Text> {
        let start = Instant::now();
        let result = (|| {
            let row = TextRow::from_text(&text)?;
            let conn = acquire_lock(&self.conn);

            let stored = conn
                .query_row(
                    &format!(
                        "INSERT OR REPLACE INTO texts ({TEXT_COLUMNS})
                         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                         RETURNING {TEXT_COLUMNS}"
                    ),
                    params![
                        row.id,
                        row.title,
                        row.url,
                        row.author,
                        row.note,
                        row.timestamp
                    ],
                    TextRow::from_row,
                )
                .map_err(|e| Error::OperationFailed {
                    operation: "upsert_text".to_string(),
                    cause: e.to_string(),
                })?;

            stored.into_text()
        })();

        if result.is_ok() {
            tracing::debug!("Wrote text to SQLite store");
        }
        record_operation_metrics("sqlite", "upsert", start, status_of(&result));
        result
    }

    #[instrument(skip(self), fields(operation = "delete", backend = "sqlite", text.id = %id))]
    fn delete(&self, id: &TextId) -> Result<Text> {
        let start = Instant::now();
        let result = (|| {
            let conn = acquire_lock(&self.conn);

            // No returned row means nothing matched; keep that distinct from
            // a failed statement.
            let deleted = conn
                .query_row(
                    &format!("DELETE FROM texts WHERE id = ?1 RETURNING {TEXT_COLUMNS}"),
                    params![id.as_str()],
                    TextRow::from_row,
                )
                .optional()
                .map_err(|e| Error::OperationFailed {
                    operation: "delete_text".to_string(),
                    cause: e.to_string(),
                })?;

            deleted.ok_or_else(|| Error::NotFound(id.clone()))?.into_text()
        })();

        record_operation_metrics("sqlite", "delete", start, status_of(&result));
        result
    }

    #[instrument(skip(self, comparator), fields(operation = "list", backend = "sqlite"))]
    fn list(&self, comparator: Comparator, direction: Direction) -> Result<Vec<Text>> {
        let start = Instant::now();
        let result = (|| {
            let conn = acquire_lock(&self.conn);

            let mut stmt = conn
                .prepare(&format!("SELECT {TEXT_COLUMNS} FROM texts"))
                .map_err(|e| Error::OperationFailed {
                    operation: "prepare_list_texts".to_string(),
                    cause: e.to_string(),
                })?;

            let rows = stmt
                .query_map([], TextRow::from_row)
                .and_then(|rows| rows.collect::<rusqlite::Result<Vec<_>>>())
                .map_err(|e| Error::OperationFailed {
                    operation: "list_texts".to_string(),
                    cause: e.to_string(),
                })?;

            let mut texts = rows
                .into_iter()
                .map(TextRow::into_text)
                .collect::<Result<Vec<_>>>()?;
            sort(&mut texts, comparator, direction);
            Ok(texts)
        })();

        record_operation_metrics("sqlite", "list", start, status_of(&result));
        result
    }

    fn close(self: Box<Self>) -> Result<()> {
        let conn = self
            .conn
            .into_inner()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        conn.close().map_err(|(_, e)| Error::OperationFailed {
            operation: "close_sqlite".to_string(),
            cause: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::timestamps;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn text(id: &str, hour: u32) -> Text {
        Text {
            id: TextId::new(id),
            title: format!("title {id}"),
            url: "https://example.com".to_string(),
            author: "A".to_string(),
            note: "note".to_string(),
            timestamp: Some(Utc.with_ymd_and_hms(2024, 1, 1, hour, 0, 0).unwrap()),
            public: false,
        }
    }

    fn store() -> SqliteStore {
        SqliteStore::in_memory(StoreTimeouts::default()).unwrap()
    }

    #[test]
    fn test_upsert_twice_keeps_one_row() {
        let store = store();
        store.upsert(text("abc123de", 1)).unwrap();

        let mut changed = text("abc123de", 1);
        changed.author = "B".to_string();
        let stored = store.upsert(changed).unwrap();
        assert_eq!(stored.author, "B");

        let texts = store.list(timestamps, Direction::Descending).unwrap();
        assert_eq!(texts.len(), 1);
        assert_eq!(texts[0].author, "B");
    }

    #[test]
    fn test_upsert_returns_written_row() {
        let store = store();
        let written = text("abc123de", 5);
        assert_eq!(store.upsert(written.clone()).unwrap(), written);
    }

    #[test]
    fn test_read_missing_is_not_found() {
        let result = store().read(&TextId::new("missing0"));
        assert!(matches!(result, Err(Error::NotFound(ref id)) if id.as_str() == "missing0"));
    }

    #[test]
    fn test_delete_missing_is_not_found() {
        let result = store().delete(&TextId::new("missing0"));
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[test]
    fn test_delete_returns_row() {
        let store = store();
        store.upsert(text("abc123de", 1)).unwrap();
        let deleted = store.delete(&TextId::new("abc123de")).unwrap();
        assert_eq!(deleted.title, "title abc123de");
        assert!(store.read(&TextId::new("abc123de")).unwrap_err().is_not_found());
    }

    #[test]
    fn test_list_sorts_client_side() {
        let store = store();
        store.upsert(text("00000002", 2)).unwrap();
        store.upsert(text("00000003", 3)).unwrap();
        store.upsert(text("00000001", 1)).unwrap();

        let texts = store.list(timestamps, Direction::Descending).unwrap();
        let ids: Vec<&str> = texts.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["00000003", "00000002", "00000001"]);
    }

    #[test]
    fn test_public_reads_back_false() {
        let store = store();
        let mut public = text("abc123de", 1);
        public.public = true;
        assert!(!store.upsert(public).unwrap().public);
    }

    #[test]
    fn test_durable_across_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tir.db");

        let store = SqliteStore::open(&path, StoreTimeouts::default()).unwrap();
        assert_eq!(store.db_path(), Some(path.as_path()));
        store.upsert(text("abc123de", 1)).unwrap();
        Box::new(store).close().unwrap();

        let reopened = SqliteStore::open(&path, StoreTimeouts::default()).unwrap();
        assert_eq!(reopened.read(&TextId::new("abc123de")).unwrap(), text("abc123de", 1));
    }

    #[test]
    fn test_unopenable_path_is_unavailable() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("dir").join("tir.db");
        let result = SqliteStore::open(path, StoreTimeouts::default());
        assert!(matches!(result, Err(Error::BackendUnavailable { .. })));
    }
}
