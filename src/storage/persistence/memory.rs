//! In-memory text store.
//!
//! Texts live in a `HashMap` behind a single reader/writer lock and are lost
//! when the process exits. This is the reference behavior the other stores
//! are tested against.

use crate::models::{Comparator, Direction, Text, TextId, sort};
use crate::storage::traits::TextStore;
use crate::{Error, Result};
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::instrument;

/// In-memory text store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    texts: RwLock<HashMap<TextId, Text>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `texts`, keyed by their IDs.
    #[must_use]
    pub fn with_texts(texts: impl IntoIterator<Item = Text>) -> Self {
        let texts = texts.into_iter().map(|t| (t.id.clone(), t)).collect();
        Self {
            texts: RwLock::new(texts),
        }
    }

    /// Returns the number of stored texts.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is poisoned.
    pub fn len(&self) -> Result<usize> {
        Ok(self.read_lock()?.len())
    }

    /// Returns true if the store holds no texts.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is poisoned.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.read_lock()?.is_empty())
    }

    fn read_lock(&self) -> Result<RwLockReadGuard<'_, HashMap<TextId, Text>>> {
        self.texts.read().map_err(|_| Error::OperationFailed {
            operation: "memory_read_lock".to_string(),
            cause: "Lock poisoned".to_string(),
        })
    }

    fn write_lock(&self) -> Result<RwLockWriteGuard<'_, HashMap<TextId, Text>>> {
        self.texts.write().map_err(|_| Error::OperationFailed {
            operation: "memory_write_lock".to_string(),
            cause: "Lock poisoned".to_string(),
        })
    }
}

impl TextStore for MemoryStore {
    #[instrument(skip(self), fields(operation = "read", backend = "memory", text.id = %id))]
    fn read(&self, id: &TextId) -> Result<Text> {
        self.read_lock()?
            .get(id)
            .cloned()
            .ok_or_else(|| Error::NotFound(id.clone()))
    }

    #[instrument(skip(self, text), fields(operation = "upsert", backend = "memory", text.id = %text.id))]
    fn upsert(&self, text: Text) -> Result<Text> {
        self.write_lock()?.insert(text.id.clone(), text.clone());
        Ok(text)
    }

    #[instrument(skip(self), fields(operation = "delete", backend = "memory", text.id = %id))]
    fn delete(&self, id: &TextId) -> Result<Text> {
        self.write_lock()?
            .remove(id)
            .ok_or_else(|| Error::NotFound(id.clone()))
    }

    #[instrument(skip(self, comparator), fields(operation = "list", backend = "memory"))]
    fn list(&self, comparator: Comparator, direction: Direction) -> Result<Vec<Text>> {
        let mut texts: Vec<Text> = self.read_lock()?.values().cloned().collect();
        sort(&mut texts, comparator, direction);
        Ok(texts)
    }

    fn close(self: Box<Self>) -> Result<()> {
        Ok(())
    }
}
