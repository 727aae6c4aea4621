//! Non-interactive editor fed from command-line flags.

use crate::Result;
use crate::models::{Editor, Text};

/// An [`Editor`] that overlays whatever fields were given as flags.
///
/// Fields left as `None` keep the value of the text being edited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldsEditor {
    /// Replacement title.
    pub title: Option<String>,
    /// Replacement URL.
    pub url: Option<String>,
    /// Replacement author.
    pub author: Option<String>,
    /// Replacement note.
    pub note: Option<String>,
    /// Replacement public flag.
    pub public: Option<bool>,
}

impl Editor for FieldsEditor {
    fn update(&mut self, mut initial: Text) -> Result<Text> {
        if let Some(title) = self.title.take() {
            initial.title = title;
        }
        if let Some(url) = self.url.take() {
            initial.url = url;
        }
        if let Some(author) = self.author.take() {
            initial.author = author;
        }
        if let Some(note) = self.note.take() {
            initial.note = note;
        }
        if let Some(public) = self.public {
            initial.public = public;
        }
        Ok(initial)
    }
}
