//! Structured logging configuration.

use crate::config::LoggingSettings;
use std::fmt;
use std::str::FromStr;

/// Default filter when nothing else is configured.
pub const DEFAULT_FILTER: &str = "warn";

/// Filter used for `--verbose`.
pub const VERBOSE_FILTER: &str = "tiir=debug,tir=debug,warn";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable multi-line output.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{other}'")),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pretty => f.write_str("pretty"),
            Self::Json => f.write_str("json"),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// `EnvFilter` directive string.
    pub filter: String,
    /// Output format.
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_FILTER.to_string(),
            format: LogFormat::default(),
        }
    }
}

impl LoggingConfig {
    /// Builds logging config from file settings and the process environment.
    ///
    /// Filter precedence: `--verbose`, `TIR_LOG`, `RUST_LOG`, the config
    /// file, then [`DEFAULT_FILTER`]. Format precedence: `TIR_LOG_FORMAT`,
    /// the config file, then pretty.
    #[must_use]
    pub fn from_settings(settings: Option<&LoggingSettings>, verbose: bool) -> Self {
        Self::from_settings_with(settings, verbose, |key| std::env::var(key).ok())
    }

    /// Like [`LoggingConfig::from_settings`], reading variables through `var`.
    pub fn from_settings_with(
        settings: Option<&LoggingSettings>,
        verbose: bool,
        var: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let filter = if verbose {
            VERBOSE_FILTER.to_string()
        } else {
            var("TIR_LOG")
                .or_else(|| var("RUST_LOG"))
                .or_else(|| settings.and_then(|s| s.filter.clone()))
                .unwrap_or_else(|| DEFAULT_FILTER.to_string())
        };

        let format = var("TIR_LOG_FORMAT")
            .or_else(|| settings.and_then(|s| s.format.clone()))
            .and_then(|raw| match raw.parse() {
                Ok(format) => Some(format),
                Err(e) => {
                    tracing::warn!("{e}; using pretty logs");
                    None
                },
            })
            .unwrap_or_default();

        Self { filter, format }
    }
}
