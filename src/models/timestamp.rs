//! Wire format for text timestamps.
//!
//! Timestamps travel as RFC3339 strings. An unset timestamp is written as the
//! zero time `0001-01-01T00:00:00Z`, which is what the companion server emits
//! for a draft, and reading the zero time back yields `None`. A stored
//! `Some` of exactly the zero time therefore reads back as `None` from every
//! store that serializes it; [`crate::TextService::create`] treats such a
//! draft as unstamped so no store ever holds one.
//!
//! RFC3339 only has room for four-digit years, so timestamps outside
//! `0001..=9999` cannot be written. Formatting one fails with
//! [`OutOfRange`] instead of producing text that would not parse back.
//!
//! Use with `#[serde(with = "crate::models::timestamp")]` on an
//! `Option<DateTime<Utc>>` field.

use chrono::{DateTime, Datelike, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serializer};
use thiserror::Error as ThisError;

/// Serialized form of an unset timestamp.
pub const ZERO_TIME: &str = "0001-01-01T00:00:00Z";

/// Unix seconds of `0001-01-01T00:00:00Z`.
const ZERO_TIME_UNIX: i64 = -62_135_596_800;

/// Earliest year a timestamp can carry.
pub const MIN_YEAR: i32 = 1;

/// Latest year a timestamp can carry.
pub const MAX_YEAR: i32 = 9999;

/// A timestamp whose year has no four-digit RFC3339 form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ThisError)]
#[error("timestamp {0} is outside years 0001-9999")]
pub struct OutOfRange(pub DateTime<Utc>);

impl From<OutOfRange> for crate::Error {
    fn from(err: OutOfRange) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

/// Checks that `timestamp` can be formatted and parsed back.
///
/// # Errors
///
/// Returns [`OutOfRange`] if its year is outside [`MIN_YEAR`]..=[`MAX_YEAR`].
pub fn check(timestamp: &DateTime<Utc>) -> Result<(), OutOfRange> {
    if (MIN_YEAR..=MAX_YEAR).contains(&timestamp.year()) {
        Ok(())
    } else {
        Err(OutOfRange(*timestamp))
    }
}

/// Returns true if `timestamp` is the zero time used for "unset".
#[must_use]
pub fn is_zero_time(timestamp: &DateTime<Utc>) -> bool {
    timestamp.timestamp() == ZERO_TIME_UNIX && timestamp.timestamp_subsec_nanos() == 0
}

/// Formats a timestamp as RFC3339 in UTC.
///
/// # Errors
///
/// Returns [`OutOfRange`] for a timestamp [`check`] rejects.
pub fn format(timestamp: Option<&DateTime<Utc>>) -> Result<String, OutOfRange> {
    match timestamp {
        None => Ok(ZERO_TIME.to_string()),
        Some(ts) => {
            check(ts)?;
            Ok(ts.to_rfc3339_opts(SecondsFormat::AutoSi, true))
        }
    }
}

/// Parses an RFC3339 timestamp with any offset, normalizing it to UTC.
///
/// # Errors
///
/// Returns the `chrono` parse error if `value` is not RFC3339.
pub fn parse(value: &str) -> Result<Option<DateTime<Utc>>, chrono::ParseError> {
    let parsed = DateTime::parse_from_rfc3339(value)?.with_timezone(&Utc);
    if is_zero_time(&parsed) {
        return Ok(None);
    }
    Ok(Some(parsed))
}

/// Serde serializer for `Option<DateTime<Utc>>`.
///
/// # Errors
///
/// Fails for an out-of-range timestamp; propagates serializer errors.
#[allow(clippy::ref_option)]
pub fn serialize<S>(timestamp: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let formatted = format(timestamp.as_ref()).map_err(serde::ser::Error::custom)?;
    serializer.serialize_str(&formatted)
}

/// Serde deserializer for `Option<DateTime<Utc>>`; accepts a string or null.
///
/// # Errors
///
/// Fails if the value is a string that is not RFC3339.
pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(value) if value.is_empty() => Ok(None),
        Some(value) => parse(&value).map_err(serde::de::Error::custom),
    }
}
