//! Text store implementations.

mod file;
mod http;
mod memory;
mod sqlite;

pub use file::FileStore;
pub use http::HttpStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
