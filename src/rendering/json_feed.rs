//! JSON Feed renderer.
//!
//! Produces a [JSON Feed 1.1](https://jsonfeed.org/version/1.1) document so
//! a reading log can be followed from a feed reader.

use super::{Renderer, render_error};
use crate::Result;
use crate::models::Text;
use chrono::SecondsFormat;
use serde::Serialize;
use std::io::Write;

/// Value of the feed's `version` member.
pub const FEED_VERSION: &str = "https://jsonfeed.org/version/1.1";

/// Value of the feed's `title` member.
pub const FEED_TITLE: &str = "tir";

#[derive(Debug, Serialize)]
struct Feed<'a> {
    version: &'static str,
    title: &'static str,
    items: Vec<Item<'a>>,
}

#[derive(Debug, Serialize)]
struct Item<'a> {
    id: &'a str,
    url: &'a str,
    title: &'a str,
    content_text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    date_published: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    authors: Vec<Author<'a>>,
}

#[derive(Debug, Serialize)]
struct Author<'a> {
    name: &'a str,
}

impl<'a> From<&'a Text> for Item<'a> {
    fn from(text: &'a Text) -> Self {
        let authors = if text.author.is_empty() {
            Vec::new()
        } else {
            vec![Author { name: &text.author }]
        };
        Self {
            id: text.id.as_str(),
            url: &text.url,
            title: &text.title,
            content_text: &text.note,
            date_published: text
                .timestamp
                .map(|ts| ts.to_rfc3339_opts(SecondsFormat::Secs, true)),
            authors,
        }
    }
}

/// Renders texts as an indented JSON Feed 1.1 document.
///
/// Each text becomes one item: the note is the item's `content_text`, the
/// author its single entry in `authors`, and the timestamp, to the second,
/// its `date_published`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFeedRenderer;

impl Renderer for JsonFeedRenderer {
    fn render(&self, texts: &[Text], sink: &mut dyn Write) -> Result<()> {
        let feed = Feed {
            version: FEED_VERSION,
            title: FEED_TITLE,
            items: texts.iter().map(Item::from).collect(),
        };
        serde_json::to_writer_pretty(&mut *sink, &feed)
            .map_err(|e| render_error("render_json_feed", e))?;
        writeln!(sink).map_err(|e| render_error("render_json_feed", e))?;
        sink.flush().map_err(|e| render_error("render_json_feed", e))
    }
}
