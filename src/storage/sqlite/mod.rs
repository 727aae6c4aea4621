//! Shared `SQLite` infrastructure for the SQL text store.
//!
//! ## Module Structure
//!
//! - [`connection`]: lock acquisition with poison recovery, connection
//!   pragmas, and the connectivity probe
//! - [`text_row`]: the `texts` table contract and row conversion

mod connection;
mod text_row;

pub use connection::{acquire_lock, configure_connection, probe};
pub use text_row::{CREATE_TABLE, TEXT_COLUMNS, TextRow};
