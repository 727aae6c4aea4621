//! Storage layer abstraction.
//!
//! One [`TextStore`] contract with four backends:
//! - **Memory**: a map behind a reader/writer lock, lost on exit
//! - **File**: the whole collection as one JSON object in one file
//! - **`SQLite`**: a `texts` table
//! - **HTTP**: a remote tir server's REST API

// Allow significant_drop_tightening - dropping locks slightly early
// provides no meaningful benefit.
#![allow(clippy::significant_drop_tightening)]

pub mod metrics;
pub mod persistence;
pub mod sqlite;
pub mod traits;

pub use persistence::{FileStore, HttpStore, MemoryStore, SqliteStore};
pub use traits::TextStore;
