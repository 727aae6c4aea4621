//! The `texts` table contract and row conversion.
//!
//! The table has six columns: `id`, `title`, `url`, `author`, `note` and
//! `timestamp`. Timestamps are stored as RFC3339 text in UTC. There is no
//! `public` column, so texts read back from this table are never public.

use crate::models::{Text, TextId, timestamp};
use crate::{Error, Result};
use rusqlite::Row;

/// Idempotent DDL for the `texts` table.
pub const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS texts (
    id TEXT NOT NULL PRIMARY KEY,
    title TEXT NOT NULL,
    url TEXT NOT NULL,
    author TEXT NOT NULL,
    note TEXT NOT NULL,
    timestamp TEXT NOT NULL
)";

/// Column list matching [`TextRow::from_row`]'s positional reads.
pub const TEXT_COLUMNS: &str = "id, title, url, author, note, timestamp";

/// One row of the `texts` table as stored.
#[derive(Debug)]
pub struct TextRow {
    /// Text ID.
    pub id: String,
    /// Title.
    pub title: String,
    /// URL.
    pub url: String,
    /// Author.
    pub author: String,
    /// Note.
    pub note: String,
    /// RFC3339 timestamp.
    pub timestamp: String,
}

impl TextRow {
    /// Reads a row selected with [`TEXT_COLUMNS`].
    ///
    /// # Errors
    ///
    /// Returns the `rusqlite` error if a column is missing or mistyped.
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            url: row.get(2)?,
            author: row.get(3)?,
            note: row.get(4)?,
            timestamp: row.get(5)?,
        })
    }

    /// Builds the row to write for `text`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the timestamp has no RFC3339 form.
    pub fn from_text(text: &Text) -> Result<Self> {
        Ok(Self {
            id: text.id.as_str().to_string(),
            title: text.title.clone(),
            url: text.url.clone(),
            author: text.author.clone(),
            note: text.note.clone(),
            timestamp: timestamp::format(text.timestamp.as_ref())?,
        })
    }

    /// Converts the row back into a text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OperationFailed`] if the stored timestamp is not RFC3339.
    pub fn into_text(self) -> Result<Text> {
        let parsed = timestamp::parse(&self.timestamp).map_err(|e| Error::OperationFailed {
            operation: "parse_text_timestamp".to_string(),
            cause: format!("{}: {e}", self.timestamp),
        })?;

        Ok(Text {
            title: self.title,
            url: self.url,
            author: self.author,
            note: self.note,
            id: TextId::new(self.id),
            timestamp: parsed,
            public: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_public_is_not_stored() {
        let text = Text {
            id: TextId::new("abc123de"),
            title: "t".to_string(),
            timestamp: Some(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()),
            public: true,
            ..Text::default()
        };
        let row = TextRow::from_text(&text).unwrap();
        assert_eq!(row.timestamp, "2024-05-01T12:00:00Z");

        let back = row.into_text().unwrap();
        assert!(!back.public);
        assert_eq!(back.timestamp, text.timestamp);
        assert_eq!(back.id, text.id);
    }

    #[test]
    fn test_far_future_is_not_written() {
        let text = Text {
            id: TextId::new("abc123de"),
            timestamp: Some(Utc.with_ymd_and_hms(10000, 1, 1, 0, 0, 0).unwrap()),
            ..Text::default()
        };
        assert!(matches!(
            TextRow::from_text(&text),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_bad_timestamp() {
        let row = TextRow {
            id: "abc123de".to_string(),
            title: String::new(),
            url: String::new(),
            author: String::new(),
            note: String::new(),
            timestamp: "last tuesday".to_string(),
        };
        assert!(matches!(
            row.into_text(),
            Err(Error::OperationFailed { ref operation, .. }) if operation == "parse_text_timestamp"
        ));
    }
}
