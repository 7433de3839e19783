//! How precisely an instant was specified.
//!
//! [`Precision`] is totally ordered from coarsest (`Year`) to finest
//! (`Nanosecond`), so `min`/`max` pick the coarser/finer of two values.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, TimeZone, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::DateError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Precision {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
    Millisecond,
    Microsecond,
    Nanosecond,
}

impl Precision {
    pub const ALL: [Precision; 9] = [
        Precision::Year,
        Precision::Month,
        Precision::Day,
        Precision::Hour,
        Precision::Minute,
        Precision::Second,
        Precision::Millisecond,
        Precision::Microsecond,
        Precision::Nanosecond,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Precision::Year => "year",
            Precision::Month => "month",
            Precision::Day => "day",
            Precision::Hour => "hour",
            Precision::Minute => "minute",
            Precision::Second => "second",
            Precision::Millisecond => "millisecond",
            Precision::Microsecond => "microsecond",
            Precision::Nanosecond => "nanosecond",
        }
    }

    /// The coarser of two precisions.
    pub fn coarser(self, other: Precision) -> Precision {
        self.min(other)
    }

    /// The finer of two precisions.
    pub fn finer(self, other: Precision) -> Precision {
        self.max(other)
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Precision {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        Precision::ALL
            .into_iter()
            .find(|p| p.as_str() == lowered)
            .ok_or_else(|| DateError::UnsupportedType(format!("unknown precision '{s}'")))
    }
}

/// Infer the coarsest component at which `dt` carries information.
///
/// Components are inspected from finest to coarsest in the instant's own
/// zone: any sub-second part means nanosecond precision; otherwise the first
/// non-zero of second, minute, hour wins; at midnight a day other than the
/// 1st means day precision, a month other than January means month
/// precision, and anything else is year precision.
pub fn infer_precision<Z: TimeZone>(dt: &DateTime<Z>) -> Precision {
    if dt.nanosecond() != 0 {
        Precision::Nanosecond
    } else if dt.second() != 0 {
        Precision::Second
    } else if dt.minute() != 0 {
        Precision::Minute
    } else if dt.hour() != 0 {
        Precision::Hour
    } else if dt.day() != 1 {
        Precision::Day
    } else if dt.month() != 1 {
        Precision::Month
    } else {
        Precision::Year
    }
}
