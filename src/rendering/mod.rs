//! Output rendering for lists of texts.
//!
//! A [`Renderer`] writes a slice of texts to any byte sink. Three formats
//! ship with the crate:
//!
//! | Format | Renderer | Output |
//! |--------|----------|--------|
//! | `plain` | [`PlainRenderer`] | One human-readable block per text |
//! | `json` | [`JsonRenderer`] | A JSON array of text records |
//! | `jsonfeed` | [`JsonFeedRenderer`] | A JSON Feed 1.1 document |
//!
//! Renderers never reorder their input; callers pass texts already sorted.

mod json;
mod json_feed;
mod plain;

pub use json::JsonRenderer;
pub use json_feed::{FEED_TITLE, FEED_VERSION, JsonFeedRenderer};
pub use plain::PlainRenderer;

use crate::models::Text;
use crate::{Error, Result};
use std::fmt;
use std::io::Write;
use std::str::FromStr;

/// Writes texts to a sink in some output format.
pub trait Renderer {
    /// Renders `texts`, in the order given, to `sink`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OperationFailed`] if serialization or writing fails.
    fn render(&self, texts: &[Text], sink: &mut dyn Write) -> Result<()>;
}

/// Output formats selectable from the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RenderFormat {
    /// Human-readable blocks.
    #[default]
    Plain,
    /// JSON array.
    Json,
    /// JSON Feed 1.1.
    JsonFeed,
}

impl RenderFormat {
    /// Returns the format name as accepted by [`FromStr`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Json => "json",
            Self::JsonFeed => "jsonfeed",
        }
    }

    /// Returns a renderer for this format.
    #[must_use]
    pub fn renderer(self) -> Box<dyn Renderer> {
        match self {
            Self::Plain => Box::new(PlainRenderer),
            Self::Json => Box::new(JsonRenderer),
            Self::JsonFeed => Box::new(JsonFeedRenderer),
        }
    }
}

impl fmt::Display for RenderFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RenderFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "plain" | "text" => Ok(Self::Plain),
            "json" => Ok(Self::Json),
            "jsonfeed" | "json-feed" | "feed" => Ok(Self::JsonFeed),
            other => Err(Error::InvalidInput(format!(
                "unknown output format '{other}' (expected plain, json or jsonfeed)"
            ))),
        }
    }
}

/// Maps a sink or serializer error to [`Error::OperationFailed`].
fn render_error(operation: &str, e: impl fmt::Display) -> Error {
    Error::OperationFailed {
        operation: operation.to_string(),
        cause: e.to_string(),
    }
}
