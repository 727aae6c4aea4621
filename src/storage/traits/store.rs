//! Text store trait.

use crate::Result;
use crate::models::{Comparator, Direction, Text, TextId};

/// Capability set shared by every storage backend.
///
/// A store owns *where* texts live and how they survive restarts. It never
/// validates texts and never assigns IDs; both are the job of
/// [`crate::TextService`].
///
/// Operations are synchronous and run on the caller's thread. Implementations
/// must be safe to share between threads of one process; what happens across
/// processes depends on the backend.
pub trait TextStore: Send + Sync {
    /// Reads the text with `id`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NotFound`] if no text has that ID.
    fn read(&self, id: &TextId) -> Result<Text>;

    /// Creates `text` or fully replaces the text with the same ID.
    ///
    /// The caller must already have set a non-empty `id`. Returns the text as
    /// stored, which may be normalized (e.g. timestamps in UTC).
    fn upsert(&self, text: Text) -> Result<Text>;

    /// Removes the text with `id` and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NotFound`] if no text has that ID.
    fn delete(&self, id: &TextId) -> Result<Text>;

    /// Returns every text, sorted by `comparator` in `direction`.
    ///
    /// The sort is not stable.
    fn list(&self, comparator: Comparator, direction: Direction) -> Result<Vec<Text>>;

    /// Releases the store's resources.
    ///
    /// Consumes the store, so it can be closed at most once.
    fn close(self: Box<Self>) -> Result<()>;
}
