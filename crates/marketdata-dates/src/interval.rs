//! Shorthand durations such as `10s`, `5 min` or `2 weeks`.
//!
//! A bare number is minutes. Months are 30 days and years 365 days; neither
//! is calendar-aware.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::TimeDelta;
use regex::Regex;
use serde::Serialize;

use crate::error::{DateError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IntervalUnit {
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl IntervalUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntervalUnit::Second => "second",
            IntervalUnit::Minute => "minute",
            IntervalUnit::Hour => "hour",
            IntervalUnit::Day => "day",
            IntervalUnit::Week => "week",
            IntervalUnit::Month => "month",
            IntervalUnit::Year => "year",
        }
    }

    /// Length of one unit in seconds.
    pub fn seconds(&self) -> i64 {
        const DAY: i64 = 86_400;
        match self {
            IntervalUnit::Second => 1,
            IntervalUnit::Minute => 60,
            IntervalUnit::Hour => 3_600,
            IntervalUnit::Day => DAY,
            IntervalUnit::Week => 7 * DAY,
            IntervalUnit::Month => 30 * DAY,
            IntervalUnit::Year => 365 * DAY,
        }
    }
}

impl fmt::Display for IntervalUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed interval: `count` of `unit`, totalling `duration`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub duration: TimeDelta,
    pub unit: IntervalUnit,
    pub count: i64,
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plural = if self.count == 1 { "" } else { "s" };
        write!(f, "{} {}{}", self.count, self.unit, plural)
    }
}

impl FromStr for Interval {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self> {
        parse_interval(s)
    }
}

fn patterns() -> &'static [(Regex, IntervalUnit)] {
    static PATTERNS: OnceLock<Vec<(Regex, IntervalUnit)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            (r"^(\d+)$", IntervalUnit::Minute),
            (r"(?i)^(\d+)\s*(?:min|mins|minute|minutes)$", IntervalUnit::Minute),
            (r"(?i)^(\d+)\s*(?:s|sec|secs|second|seconds)$", IntervalUnit::Second),
            (r"(?i)^(\d+)\s*(?:h|hr|hrs|hour|hours)$", IntervalUnit::Hour),
            (r"(?i)^d$", IntervalUnit::Day),
            (r"(?i)^(\d+)\s*(?:d|day|days)$", IntervalUnit::Day),
            (r"(?i)^(\d+)\s*(?:w|wk|wks|week|weeks)$", IntervalUnit::Week),
            (r"(?i)^(\d+)\s*(?:m|mo|month|months)$", IntervalUnit::Month),
            (r"(?i)^(\d+)\s*(?:y|yr|yrs|year|years)$", IntervalUnit::Year),
        ]
        .into_iter()
        .map(|(pattern, unit)| (Regex::new(pattern).expect("valid interval regex"), unit))
        .collect()
    })
}

/// Parse a shorthand interval.
///
/// Patterns are tried in order; the first match decides the unit. A lone
/// `d` means one day.
///
/// # Errors
///
/// Returns [`DateError::InvalidIntervalFormat`] when no pattern matches or the
/// total does not fit in a duration.
pub fn parse_interval(input: &str) -> Result<Interval> {
    let invalid = || DateError::InvalidIntervalFormat(input.to_string());
    let trimmed = input.trim();

    for (regex, unit) in patterns() {
        let Some(caps) = regex.captures(trimmed) else {
            continue;
        };

        let count: i64 = match caps.get(1) {
            Some(digits) => digits.as_str().parse().map_err(|_| invalid())?,
            None => 1,
        };
        let duration = count
            .checked_mul(unit.seconds())
            .and_then(TimeDelta::try_seconds)
            .ok_or_else(invalid)?;

        tracing::trace!(input, unit = unit.as_str(), count, "matched interval");
        return Ok(Interval {
            duration,
            unit: *unit,
            count,
        });
    }

    Err(invalid())
}
