//! Plain-text renderer.

use super::{Renderer, render_error};
use crate::Result;
use crate::models::Text;
use std::io::Write;

/// Renders each text as a short block, separated by blank lines:
///
/// ```text
/// Visualizing IP data (David Hall)
/// https://davidchall.github.io/ggip/articles/visualizing-ip-data.html
/// Use a Hilbert curve.
/// [35bb8126] 2023-04-07 public
/// ```
///
/// The trailing `public` marker only appears on public texts, and the date
/// is omitted for texts that were never stamped.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainRenderer;

impl Renderer for PlainRenderer {
    fn render(&self, texts: &[Text], sink: &mut dyn Write) -> Result<()> {
        for (i, text) in texts.iter().enumerate() {
            if i > 0 {
                writeln!(sink).map_err(|e| render_error("render_plain", e))?;
            }
            write_block(text, sink).map_err(|e| render_error("render_plain", e))?;
        }
        sink.flush().map_err(|e| render_error("render_plain", e))
    }
}

fn write_block(text: &Text, sink: &mut dyn Write) -> std::io::Result<()> {
    if text.author.is_empty() {
        writeln!(sink, "{}", text.title)?;
    } else {
        writeln!(sink, "{} ({})", text.title, text.author)?;
    }
    if !text.url.is_empty() {
        writeln!(sink, "{}", text.url)?;
    }
    if !text.note.is_empty() {
        writeln!(sink, "{}", text.note)?;
    }

    write!(sink, "[{}]", text.id)?;
    if let Some(ts) = text.timestamp {
        write!(sink, " {}", ts.format("%Y-%m-%d"))?;
    }
    if text.public {
        write!(sink, " public")?;
    }
    writeln!(sink)
}
