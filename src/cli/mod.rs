//! CLI command implementations.
//!
//! This module provides the command-line interface for tir. The argument
//! parser lives in `main.rs`; the functions here do the work against a
//! [`TextService`](crate::TextService) and write to any sink, so they can
//! be tested without a terminal.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `create` | Log a new text from `--title`, `--url`, `--author`, `--note` |
//! | `read` | Print one text as JSON |
//! | `update` | Change some fields of a text |
//! | `delete` | Remove a text and print what was removed |
//! | `list` | Print every text, newest first, as plain text, JSON or JSON Feed |
//!
//! # Example Usage
//!
//! ```bash
//! tir create --title "Visualizing IP data" --author "David Hall" \
//!     --url https://davidchall.github.io/ggip/ --note "Use a Hilbert curve."
//! tir update 35bb8126 --note "Hilbert curves keep nearby addresses close."
//! tir --store sqlite list --format jsonfeed
//! ```

mod commands;
mod editor;

pub use commands::{cmd_create, cmd_delete, cmd_list, cmd_read, cmd_update};
pub use editor::FieldsEditor;

use crate::models::Text;
use crate::{Error, Result};
use serde::Serialize;
use std::io::Write;
use std::process::ExitCode;

/// Exit status for a failed command.
///
/// | Error | Code |
/// |-------|------|
/// | `Validation`, `InvalidInput` | 2 |
/// | `NotFound` | 3 |
/// | `Conflict` | 4 |
/// | `BackendUnavailable` | 5 |
/// | anything else | 1 |
#[must_use]
pub fn exit_code_for(error: &Error) -> u8 {
    match error.root() {
        Error::Validation(_) | Error::InvalidInput(_) => 2,
        Error::NotFound(_) => 3,
        Error::Conflict(_) => 4,
        Error::BackendUnavailable { .. } => 5,
        Error::OperationFailed { .. } | Error::Context { .. } => 1,
    }
}

/// [`exit_code_for`] as a process [`ExitCode`].
#[must_use]
pub fn exit_code(error: &Error) -> ExitCode {
    ExitCode::from(exit_code_for(error))
}

/// Writes `text` as tab-indented JSON followed by a newline.
///
/// # Errors
///
/// Returns [`Error::OperationFailed`] if serialization or writing fails.
pub fn write_record(text: &Text, sink: &mut dyn Write) -> Result<()> {
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
    let mut serializer = serde_json::Serializer::with_formatter(&mut *sink, formatter);
    text.serialize(&mut serializer).map_err(|e| output_error(&e))?;
    writeln!(sink).map_err(|e| output_error(&e))
}

/// Flushes whatever a command wrote to `sink`.
///
/// # Errors
///
/// Returns [`Error::OperationFailed`] if the sink cannot be flushed.
pub fn flush_output(sink: &mut dyn Write) -> Result<()> {
    sink.flush().map_err(|e| output_error(&e))
}

fn output_error(e: &dyn std::fmt::Display) -> Error {
    Error::OperationFailed {
        operation: "write_output".to_string(),
        cause: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TextId;

    #[test]
    fn test_exit_codes() {
        assert_eq!(exit_code_for(&Error::Validation("x".into())), 2);
        assert_eq!(exit_code_for(&Error::InvalidInput("x".into())), 2);
        assert_eq!(exit_code_for(&Error::NotFound(TextId::new("a"))), 3);
        assert_eq!(exit_code_for(&Error::Conflict("x".into())), 4);
        let unavailable = Error::BackendUnavailable {
            backend: "http".into(),
            cause: "refused".into(),
        };
        assert_eq!(exit_code_for(&unavailable), 5);
        let failed = Error::OperationFailed {
            operation: "x".into(),
            cause: "y".into(),
        };
        assert_eq!(exit_code_for(&failed), 1);
    }

    #[test]
    fn test_exit_code_looks_through_context() {
        let err = Error::NotFound(TextId::new("a")).context("error reading old record");
        assert_eq!(exit_code_for(&err), 3);
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Err(std::io::Error::from(std::io::ErrorKind::BrokenPipe))
        }
    }

    #[test]
    fn test_flush_failure_is_an_error() {
        let err = flush_output(&mut BrokenPipe).unwrap_err();
        assert!(
            matches!(err, Error::OperationFailed { ref operation, .. } if operation == "write_output")
        );
        assert_eq!(exit_code_for(&err), 1);
        assert!(flush_output(&mut Vec::new()).is_ok());
    }

    #[test]
    fn test_write_record_uses_tabs() {
        let mut out = Vec::new();
        write_record(
            &Text {
                id: TextId::new("abc123de"),
                ..Text::default()
            },
            &mut out,
        )
        .unwrap();
        let raw = String::from_utf8(out).unwrap();
        assert!(raw.starts_with("{\n\t\"title\": \"\","));
        assert!(raw.contains("\t\"id\": \"abc123de\","));
        assert!(raw.ends_with("}\n"));
    }
}
