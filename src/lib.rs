//! # tiir
//!
//! Today I Read: a log of the articles you read.
//!
//! tiir records short structured notes about texts (title, URL, author, a
//! note, when it was logged, and whether it is public) and keeps them behind
//! a swappable storage backend.
//!
//! ## Features
//!
//! - One [`TextStore`] contract with four backends: in-memory, a single
//!   JSON file, `SQLite`, and a remote tir server over HTTP
//! - A [`TextService`] that validates drafts, assigns IDs and timestamps,
//!   and merges partial updates
//! - Plain, JSON and JSON Feed renderers for listing texts
//!
//! ## Example
//!
//! ```rust,ignore
//! use tiir::{MemoryStore, Text, TextService};
//!
//! let service = TextService::new(MemoryStore::new());
//! let created = service.create(Text {
//!     title: "Visualizing IP data".to_string(),
//!     url: "https://davidchall.github.io/ggip/".to_string(),
//!     author: "David Hall".to_string(),
//!     note: "Use a Hilbert curve.".to_string(),
//!     ..Text::default()
//! })?;
//! assert_eq!(service.read(&created.id)?, created);
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
// multiple_crate_versions is inherently crate-level (detects duplicate transitive dependencies).
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

// Module declarations
pub mod cli;
pub mod config;
pub mod models;
pub mod observability;
pub mod rendering;
pub mod services;
pub mod storage;

// Re-exports for convenience
pub use config::{StoreConfig, StoreTimeouts, TirConfig};
pub use models::{Comparator, Direction, Editor, Text, TextId};
pub use rendering::{RenderFormat, Renderer};
pub use services::{BackendFactory, TextService};
pub use storage::{FileStore, HttpStore, MemoryStore, SqliteStore, TextStore};

/// Error type for tiir operations.
///
/// Uses `thiserror` for automatic `Display` and `Error` trait implementations.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `Validation` | A draft passed to create is missing a required field |
/// | `NotFound` | Read, update or delete target an absent ID |
/// | `BackendUnavailable` | The SQL or HTTP store fails its connectivity probe |
/// | `Conflict` | The remote server rejects a create as a duplicate |
/// | `InvalidInput` | Bad configuration or command-line input |
/// | `OperationFailed` | I/O, serialization, SQL or transport failures |
/// | `Context` | A service wraps one of the above with extra context |
#[derive(Debug, ThisError)]
pub enum Error {
    /// A draft text failed validation.
    ///
    /// Raised only by [`TextService::create`]; stores never validate.
    #[error("invalid text: {0}")]
    Validation(String),

    /// No text with the given ID exists in the store.
    #[error("no text with ID '{0}'")]
    NotFound(TextId),

    /// A store could not reach its database or server while opening.
    #[error("{backend} store unavailable: {cause}")]
    BackendUnavailable {
        /// The store that failed to open (e.g. "sqlite", "http").
        backend: String,
        /// The underlying cause.
        cause: String,
    },

    /// The remote server rejected a write as conflicting.
    ///
    /// The HTTP store decides between create and update with a read first,
    /// so two clients creating the same ID can race; the loser sees this.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Invalid input was provided.
    ///
    /// Raised when:
    /// - A config file names an unknown store type
    /// - A required store setting (path, base URL) is missing
    /// - A base URL cannot be parsed
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An operation failed.
    ///
    /// Raised when:
    /// - `SQLite` statements fail
    /// - Filesystem I/O errors occur
    /// - JSON (de)serialization fails
    /// - The remote server responds with an unexpected status
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },

    /// Another error with added context.
    #[error("{context}: {source}")]
    Context {
        /// What was being attempted.
        context: String,
        /// The wrapped error.
        #[source]
        source: Box<Self>,
    },
}

impl Error {
    /// Wraps this error with a description of what was being attempted.
    #[must_use]
    pub fn context(self, context: impl Into<String>) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Returns the innermost error, looking through any [`Error::Context`].
    #[must_use]
    pub fn root(&self) -> &Self {
        match self {
            Self::Context { source, .. } => source.root(),
            other => other,
        }
    }

    /// Returns true if this error (or the error it wraps) is [`Error::NotFound`].
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self.root(), Self::NotFound(_))
    }

    /// Returns true if this error (or the error it wraps) is [`Error::Validation`].
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self.root(), Self::Validation(_))
    }

    /// HTTP-equivalent status for surfaces that report errors to users.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self.root() {
            Self::Validation(_) | Self::InvalidInput(_) => 400,
            Self::NotFound(_) => 404,
            Self::Conflict(_) => 409,
            Self::BackendUnavailable { .. } => 503,
            Self::OperationFailed { .. } | Self::Context { .. } => 500,
        }
    }
}

/// Result type alias for tiir operations.
pub type Result<T> = std::result::Result<T, Error>;
