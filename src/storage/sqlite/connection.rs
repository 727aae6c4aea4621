//! Connection handling for the `SQLite` store.
//!
//! This module provides utilities for managing `SQLite` connections with proper
//! mutex handling, poison recovery, and the two timeout budgets the store
//! applies: a short one for the connectivity probe and a longer one for every
//! later statement.

use crate::{Error, Result};
use rusqlite::Connection;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

/// Helper to acquire mutex lock with poison recovery.
///
/// If the mutex is poisoned (due to a panic in a previous critical section),
/// we recover the inner value and log a warning. `SQLite` rolls back any
/// statement that did not complete, so the connection is still usable.
///
/// # Examples
///
/// ```ignore
/// use std::sync::Mutex;
/// use tiir::storage::sqlite::acquire_lock;
///
/// let mutex = Mutex::new(connection);
/// let guard = acquire_lock(&mutex);
/// ```
pub fn acquire_lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            tracing::warn!("SQLite mutex was poisoned, recovering");
            metrics::counter!("tir_sqlite_mutex_poison_recovery_total").increment(1);
            poisoned.into_inner()
        },
    }
}

/// Checks that the database answers within `timeout`.
///
/// Sets the busy timeout to `timeout` and runs `SELECT 1`.
///
/// # Errors
///
/// Returns [`Error::BackendUnavailable`] if the probe fails.
pub fn probe(conn: &Connection, timeout: Duration) -> Result<()> {
    let unavailable = |e: rusqlite::Error| Error::BackendUnavailable {
        backend: "sqlite".to_string(),
        cause: e.to_string(),
    };

    conn.busy_timeout(timeout).map_err(unavailable)?;
    conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
        .map_err(unavailable)?;
    Ok(())
}

/// Configures a `SQLite` connection for use by the store.
///
/// # Configuration Applied
///
/// - **WAL mode**: Enables Write-Ahead Logging for better concurrent read performance
/// - **NORMAL synchronous**: Balances durability with performance
/// - **busy timeout**: `operation_timeout`, the budget for every statement
///   issued after the probe
///
/// # Errors
///
/// Returns [`Error::OperationFailed`] if the busy timeout cannot be set.
///
/// # Examples
///
/// ```ignore
/// use rusqlite::Connection;
/// use std::time::Duration;
/// use tiir::storage::sqlite::configure_connection;
///
/// let conn = Connection::open("tir.db")?;
/// configure_connection(&conn, Duration::from_secs(3))?;
/// # Ok::<(), tiir::Error>(())
/// ```
pub fn configure_connection(conn: &Connection, operation_timeout: Duration) -> Result<()> {
    // journal_mode returns the resulting mode ("memory" for in-memory
    // databases), so neither pragma result is an error worth surfacing.
    let _ = conn.pragma_update(None, "journal_mode", "WAL");
    let _ = conn.pragma_update(None, "synchronous", "NORMAL");

    conn.busy_timeout(operation_timeout)
        .map_err(|e| Error::OperationFailed {
            operation: "configure_sqlite".to_string(),
            cause: e.to_string(),
        })
}
