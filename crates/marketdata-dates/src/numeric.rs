//! Classification of integer timestamps by magnitude.
//!
//! An integer's decimal digit count decides how it is read: small values are
//! spreadsheet serial dates, and 10, 13, 16 and 19 digits are Unix time in
//! seconds, milliseconds, microseconds and nanoseconds. Anything in between
//! is rejected rather than guessed.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{DateError, Result};
use crate::precision::Precision;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimestampMagnitude {
    /// Spreadsheet serial day count (up to 5 digits).
    Serial,
    /// Unix seconds (6 to 10 digits).
    Seconds,
    /// Unix milliseconds (13 digits).
    Milliseconds,
    /// Unix microseconds (16 digits).
    Microseconds,
    /// Unix nanoseconds (19 digits).
    Nanoseconds,
}

impl TimestampMagnitude {
    /// Precision implied by the magnitude. Serial dates report their own
    /// precision from the fractional day, so they have none here.
    pub fn precision(&self) -> Option<Precision> {
        match self {
            TimestampMagnitude::Serial => None,
            TimestampMagnitude::Seconds => Some(Precision::Second),
            TimestampMagnitude::Milliseconds => Some(Precision::Millisecond),
            TimestampMagnitude::Microseconds => Some(Precision::Microsecond),
            TimestampMagnitude::Nanoseconds => Some(Precision::Nanosecond),
        }
    }
}

/// Decimal digits in `|value|`; zero has one digit.
pub fn digit_count(value: i64) -> u32 {
    value.unsigned_abs().checked_ilog10().map_or(1, |log| log + 1)
}

/// Significant digits in an integer literal such as `"-000123"`.
///
/// Returns `None` unless `text` is an optional sign followed only by ASCII
/// digits. Used for literals too wide for `i64`, which no timestamp
/// resolution covers.
pub fn literal_digit_count(text: &str) -> Option<u32> {
    let unsigned = text.strip_prefix(|c| c == '-' || c == '+').unwrap_or(text);
    if unsigned.is_empty() || !unsigned.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let significant = unsigned.trim_start_matches('0').len().max(1);
    Some(u32::try_from(significant).unwrap_or(u32::MAX))
}

/// Classify an integer timestamp by its digit count.
///
/// # Errors
///
/// Returns [`DateError::AmbiguousTimestampMagnitude`] for 11-12, 14-15 and
/// 17-18 digit values.
pub fn classify(value: i64) -> Result<TimestampMagnitude> {
    let digits = digit_count(value);
    match digits {
        0..=5 => Ok(TimestampMagnitude::Serial),
        6..=10 => Ok(TimestampMagnitude::Seconds),
        13 => Ok(TimestampMagnitude::Milliseconds),
        16 => Ok(TimestampMagnitude::Microseconds),
        19 => Ok(TimestampMagnitude::Nanoseconds),
        _ => Err(DateError::AmbiguousTimestampMagnitude {
            value: value.to_string(),
            digits,
        }),
    }
}

/// Convert a Unix timestamp of the given magnitude to an instant.
///
/// # Errors
///
/// Returns [`DateError::OutOfRange`] when the value cannot be represented, or
/// when called with [`TimestampMagnitude::Serial`], which is not Unix time.
pub fn from_unix(value: i64, magnitude: TimestampMagnitude) -> Result<DateTime<Utc>> {
    let converted = match magnitude {
        TimestampMagnitude::Serial => None,
        TimestampMagnitude::Seconds => DateTime::from_timestamp(value, 0),
        TimestampMagnitude::Milliseconds => DateTime::from_timestamp_millis(value),
        TimestampMagnitude::Microseconds => DateTime::from_timestamp_micros(value),
        TimestampMagnitude::Nanoseconds => Some(DateTime::from_timestamp_nanos(value)),
    };
    converted.ok_or_else(|| {
        DateError::OutOfRange(format!("{value} is not a representable {magnitude:?} timestamp"))
    })
}
