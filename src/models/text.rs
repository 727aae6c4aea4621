//! Text records and identifiers.

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Number of hex characters in a generated [`TextId`].
pub const ID_LENGTH: usize = 8;

/// Unique identifier for a text.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TextId(String);

impl TextId {
    /// Creates a text ID from an existing string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a fresh ID: [`ID_LENGTH`] lowercase hex characters.
    ///
    /// The bytes come from the random (non-version) prefix of a v4 UUID, so
    /// they are drawn from the OS random source. Collisions are not checked.
    #[must_use]
    pub fn random() -> Self {
        let uuid = Uuid::new_v4();
        Self(hex::encode(&uuid.as_bytes()[..ID_LENGTH / 2]))
    }

    /// Returns the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if no ID has been assigned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for TextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for TextId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for TextId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A text you read.
///
/// Serializes to
/// `{"title","url","author","note","id","timestamp","public"}`; missing
/// fields deserialize to their defaults so partial updates can be sent as
/// sparse objects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Text {
    /// Title of the text.
    pub title: String,
    /// Where the text can be found.
    pub url: String,
    /// Who wrote it.
    pub author: String,
    /// What the reader thought of it.
    pub note: String,
    /// Identifier, assigned by [`crate::TextService::create`].
    pub id: TextId,
    /// When the text was logged. `None` until the service stamps it.
    #[serde(with = "crate::models::timestamp")]
    pub timestamp: Option<DateTime<Utc>>,
    /// Whether the text may be shown publicly.
    pub public: bool,
}

impl Text {
    /// Checks that every user-supplied field is non-empty.
    ///
    /// `id`, `timestamp` and `public` are not checked.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] naming the first empty field, checked
    /// in the order title, author, note, url.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("title", &self.title),
            ("author", &self.author),
            ("note", &self.note),
            ("url", &self.url),
        ];
        match required.iter().find(|(_, value)| value.is_empty()) {
            Some((field, _)) => Err(Error::Validation(format!("must specify {field}"))),
            None => Ok(()),
        }
    }

    /// Merges `updates` into `self`, skipping empty strings.
    ///
    /// Only title, author, note and url take part. An empty string means
    /// "leave unchanged", so a field cannot be blanked this way, and
    /// `public` is never merged.
    pub fn integrate(&mut self, updates: &Self) {
        if !updates.author.is_empty() {
            self.author.clone_from(&updates.author);
        }
        if !updates.note.is_empty() {
            self.note.clone_from(&updates.note);
        }
        if !updates.title.is_empty() {
            self.title.clone_from(&updates.title);
        }
        if !updates.url.is_empty() {
            self.url.clone_from(&updates.url);
        }
    }

    /// Hands this text to `editor` and returns the edited result.
    ///
    /// # Errors
    ///
    /// Propagates whatever the editor fails with.
    pub fn edit_with(self, editor: &mut dyn Editor) -> Result<Self> {
        editor.update(self)
    }
}

/// Produces a draft text from an initial one, typically by asking a user.
///
/// The output of an editor is what gets passed to
/// [`crate::TextService::create`] or [`crate::TextService::update`].
pub trait Editor {
    /// Returns the user's edits of `initial`.
    ///
    /// # Errors
    ///
    /// Implementations fail if the user aborts or input cannot be read.
    fn update(&mut self, initial: Text) -> Result<Text>;
}
