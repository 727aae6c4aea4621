//! Logging setup.
//!
//! Installs a `tracing` subscriber that writes to stderr, keeping stdout free
//! for command output.

mod logging;

pub use logging::{DEFAULT_FILTER, LogFormat, LoggingConfig, VERBOSE_FILTER};

use crate::{Error, Result};
use std::sync::OnceLock;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

static LOGGING_INIT: OnceLock<()> = OnceLock::new();

/// Initializes logging for the process.
///
/// Only the first call installs a subscriber; later calls return `Ok(())`
/// without changing anything.
///
/// # Errors
///
/// Returns an error if the filter directive is invalid or another global
/// subscriber is already installed.
pub fn init(config: &LoggingConfig) -> Result<()> {
    if LOGGING_INIT.get().is_some() {
        return Ok(());
    }

    let filter = EnvFilter::try_new(&config.filter).map_err(|e| {
        Error::InvalidInput(format!("invalid log filter '{}': {e}", config.filter))
    })?;

    match config.format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_target(true),
            )
            .with(filter)
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true),
            )
            .with(filter)
            .try_init(),
    }
    .map_err(init_error)?;

    let _ = LOGGING_INIT.set(());
    tracing::debug!(format = %config.format, filter = %config.filter, "Logging initialized");
    Ok(())
}

/// Helper to convert init errors.
#[allow(clippy::needless_pass_by_value)]
fn init_error(e: tracing_subscriber::util::TryInitError) -> Error {
    Error::OperationFailed {
        operation: "logging_init".to_string(),
        cause: e.to_string(),
    }
}
