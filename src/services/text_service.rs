//! Text service.
//!
//! Validates new texts, assigns their IDs and timestamps, merges partial
//! updates, and delegates storage to a [`TextStore`].

use crate::models::{Direction, Text, TextId, timestamp, timestamps};
use crate::storage::traits::TextStore;
use crate::{Error, Result, TirConfig};
use chrono::Utc;
use tracing::instrument;

/// Service for creating, reading, updating, deleting and listing texts.
///
/// Wraps exactly one store chosen when the service is built. The service
/// never retries and never hides a store error; it only adds context.
pub struct TextService {
    store: Box<dyn TextStore>,
}

impl TextService {
    /// Creates a service over `store`.
    #[must_use]
    pub fn new(store: impl TextStore + 'static) -> Self {
        Self {
            store: Box::new(store),
        }
    }

    /// Creates a service over an already boxed store.
    #[must_use]
    pub fn from_boxed(store: Box<dyn TextStore>) -> Self {
        Self { store }
    }

    /// Creates a service over the store `config` selects.
    ///
    /// # Errors
    ///
    /// Returns any error raised while opening the store.
    pub fn from_config(config: &TirConfig) -> Result<Self> {
        super::BackendFactory::create(&config.store).map(Self::from_boxed)
    }

    /// Validates `draft`, assigns it a fresh ID, and stores it.
    ///
    /// The timestamp is set to now unless the draft already has one. A
    /// draft stamped with the zero time counts as unstamped. Any ID on the
    /// draft is replaced.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Validation`] if title, author, note or url is
    /// empty, or if the timestamp's year is outside `0001..=9999`; nothing
    /// is written in that case. Otherwise returns any store error.
    #[instrument(skip(self, draft), fields(operation = "create"))]
    pub fn create(&self, mut draft: Text) -> Result<Text> {
        draft.validate()?;
        if let Some(ts) = &draft.timestamp {
            timestamp::check(ts).map_err(|e| Error::Validation(e.to_string()))?;
        }

        draft.id = TextId::random();
        if draft.timestamp.is_none_or(|ts| timestamp::is_zero_time(&ts)) {
            draft.timestamp = Some(Utc::now());
        }

        let created = self.store.upsert(draft)?;
        tracing::info!(text.id = %created.id, "Created text");
        Ok(created)
    }

    /// Reads the text with `id`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NotFound`] if no text has that ID.
    pub fn read(&self, id: &TextId) -> Result<Text> {
        self.store.read(id)
    }

    /// Merges `updates` into the stored text with `id` and stores the result.
    ///
    /// Only non-empty title, author, note and url are applied. An empty
    /// string means "unchanged", so a field cannot be cleared, and `public`
    /// is not updated. The merged text is not validated.
    ///
    /// # Errors
    ///
    /// Fails with the store's read error (wrapped with "error reading old
    /// record"; check [`crate::Error::is_not_found`]) or its write error.
    #[instrument(skip(self, updates), fields(operation = "update", text.id = %id))]
    pub fn update(&self, id: &TextId, updates: &Text) -> Result<Text> {
        let mut text = self
            .store
            .read(id)
            .map_err(|e| e.context("error reading old record"))?;
        text.integrate(updates);

        let updated = self.store.upsert(text)?;
        tracing::info!("Updated text");
        Ok(updated)
    }

    /// Deletes the text with `id` and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NotFound`] if no text has that ID.
    #[instrument(skip(self), fields(operation = "delete", text.id = %id))]
    pub fn delete(&self, id: &TextId) -> Result<Text> {
        let deleted = self.store.delete(id)?;
        tracing::info!("Deleted text");
        Ok(deleted)
    }

    /// Lists every text, newest first.
    ///
    /// Texts with equal timestamps may come back in any order.
    ///
    /// # Errors
    ///
    /// Returns any store error.
    pub fn list(&self) -> Result<Vec<Text>> {
        self.store.list(timestamps, Direction::Descending)
    }

    /// Closes the underlying store.
    ///
    /// # Errors
    ///
    /// Returns any error the store raises while releasing resources.
    pub fn close(self) -> Result<()> {
        self.store.close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ID_LENGTH;
    use crate::storage::MemoryStore;
    use chrono::{TimeZone, Utc};

    fn draft() -> Text {
        Text {
            title: "Visualizing IP data".to_string(),
            url: "https://davidchall.github.io/ggip/articles/visualizing-ip-data.html"
                .to_string(),
            author: "David Hall".to_string(),
            note: "Use a Hilbert curve.".to_string(),
            ..Text::default()
        }
    }

    fn service() -> TextService {
        TextService::new(MemoryStore::new())
    }

    #[test]
    fn test_create_assigns_id_and_timestamp() {
        let service = service();
        let before = Utc::now();
        let created = service.create(draft()).unwrap();

        assert_eq!(created.id.as_str().len(), ID_LENGTH);
        let stamped = created.timestamp.unwrap();
        assert!(stamped >= before && stamped <= Utc::now());
        assert_eq!(service.read(&created.id).unwrap(), created);
    }

    #[test]
    fn test_create_keeps_existing_timestamp() {
        let when = Utc.with_ymd_and_hms(2023, 4, 7, 21, 43, 52).unwrap();
        let mut text = draft();
        text.timestamp = Some(when);
        let created = service().create(text).unwrap();
        assert_eq!(created.timestamp, Some(when));
    }

    #[test]
    fn test_create_treats_zero_time_as_unstamped() {
        let mut text = draft();
        text.timestamp = Some(Utc.with_ymd_and_hms(1, 1, 1, 0, 0, 0).unwrap());
        let before = Utc::now();
        let created = service().create(text).unwrap();
        assert!(created.timestamp.unwrap() >= before);
    }

    #[test]
    fn test_create_rejects_unwritable_year() {
        let service = service();
        let mut text = draft();
        text.timestamp = Some(Utc.with_ymd_and_hms(10000, 1, 1, 0, 0, 0).unwrap());
        let result = service.create(text);
        assert!(matches!(result, Err(Error::Validation(ref m)) if m.contains("outside years")));
        assert!(service.list().unwrap().is_empty());
    }

    #[test]
    fn test_create_replaces_draft_id() {
        let mut text = draft();
        text.id = TextId::new("chosen!!");
        let created = service().create(text).unwrap();
        assert_ne!(created.id.as_str(), "chosen!!");
    }

    #[test]
    fn test_create_rejects_incomplete_draft() {
        let service = service();
        let mut text = draft();
        text.author.clear();
        let result = service.create(text);
        assert!(matches!(result, Err(Error::Validation(ref m)) if m == "must specify author"));
        assert!(service.list().unwrap().is_empty());
    }

    #[test]
    fn test_update_merges_non_empty_fields() {
        let service = service();
        let created = service.create(draft()).unwrap();

        let updated = service
            .update(
                &created.id,
                &Text {
                    author: "B".to_string(),
                    ..Text::default()
                },
            )
            .unwrap();

        assert_eq!(updated.author, "B");
        assert_eq!(updated.title, created.title);
        assert_eq!(updated.timestamp, created.timestamp);
        assert_eq!(service.read(&created.id).unwrap(), updated);
    }

    #[test]
    fn test_update_missing_wraps_not_found() {
        let err = service()
            .update(&TextId::new("missing0"), &draft())
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().starts_with("error reading old record: "));
    }

    #[test]
    fn test_delete_then_read() {
        let service = service();
        let created = service.create(draft()).unwrap();
        assert_eq!(service.delete(&created.id).unwrap(), created);
        assert!(matches!(
            service.read(&created.id),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_list_newest_first() {
        let service = service();
        for hour in [2, 3, 1] {
            let mut text = draft();
            text.timestamp = Some(Utc.with_ymd_and_hms(2024, 1, 1, hour, 0, 0).unwrap());
            service.create(text).unwrap();
        }
        let hours: Vec<_> = service
            .list()
            .unwrap()
            .iter()
            .map(|t| t.timestamp.unwrap().format("%H").to_string())
            .collect();
        assert_eq!(hours, ["03", "02", "01"]);
    }

    #[test]
    fn test_close() {
        assert!(service().close().is_ok());
    }
}
