//! Text commands: create, read, update, delete, list.

use super::{FieldsEditor, write_record};
use crate::Result;
use crate::models::{Text, TextId};
use crate::rendering::RenderFormat;
use crate::services::TextService;
use std::io::Write;

/// Creates a text from the flag values in `fields` and prints it.
///
/// # Errors
///
/// Returns [`crate::Error::Validation`] if a required flag is missing, or
/// any store error.
pub fn cmd_create(
    service: &TextService,
    mut fields: FieldsEditor,
    out: &mut dyn Write,
) -> Result<()> {
    let draft = Text::default().edit_with(&mut fields)?;
    let created = service.create(draft)?;
    write_record(&created, out)
}

/// Prints the text with `id`.
///
/// # Errors
///
/// Returns [`crate::Error::NotFound`] if no text has that ID.
pub fn cmd_read(service: &TextService, id: &TextId, out: &mut dyn Write) -> Result<()> {
    let text = service.read(id)?;
    write_record(&text, out)
}

/// Applies the flag values in `fields` to the text with `id` and prints
/// the result.
///
/// Flags that were not given leave their field unchanged.
///
/// # Errors
///
/// Returns the service's read or write error.
pub fn cmd_update(
    service: &TextService,
    id: &TextId,
    mut fields: FieldsEditor,
    out: &mut dyn Write,
) -> Result<()> {
    let updates = Text::default().edit_with(&mut fields)?;
    let updated = service.update(id, &updates)?;
    write_record(&updated, out)
}

/// Deletes the text with `id` and prints what was removed.
///
/// # Errors
///
/// Returns [`crate::Error::NotFound`] if no text has that ID.
pub fn cmd_delete(service: &TextService, id: &TextId, out: &mut dyn Write) -> Result<()> {
    let deleted = service.delete(id)?;
    write_record(&deleted, out)
}

/// Renders every text, newest first, in `format`.
///
/// # Errors
///
/// Returns any store or rendering error.
pub fn cmd_list(service: &TextService, format: RenderFormat, out: &mut dyn Write) -> Result<()> {
    let texts = service.list()?;
    tracing::debug!(count = texts.len(), format = %format, "Listing texts");
    format.renderer().render(&texts, out)
}
