//! JSON array renderer.

use super::{Renderer, render_error};
use crate::Result;
use crate::models::Text;
use std::io::Write;

/// Renders texts as a single-line JSON array followed by a newline, using
/// the same record shape the stores persist.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, texts: &[Text], sink: &mut dyn Write) -> Result<()> {
        serde_json::to_writer(&mut *sink, texts).map_err(|e| render_error("render_json", e))?;
        writeln!(sink).map_err(|e| render_error("render_json", e))?;
        sink.flush().map_err(|e| render_error("render_json", e))
    }
}
