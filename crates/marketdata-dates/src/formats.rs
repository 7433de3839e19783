//! The catalog of parseable date strings.
//!
//! Every [`FormatSpec`] pairs a chrono pattern with the [`Precision`] it
//! expresses and the shape of value it yields. The catalog is split once into
//! a zone-less partition (parsed in the caller's timezone) and a zone-bearing
//! partition (parsed with the zone written in the string).
//!
//! # Ordering
//!
//! Within each partition patterns are tried in declaration order and the first
//! one that parses wins, so the order below is part of the contract. Patterns
//! are strict (fractional seconds use fixed digit counts, trailing input is an
//! error), which keeps distinct shapes from shadowing each other; where two
//! patterns can accept the same text the coarser, more common shape is listed
//! first, mirroring the order callers are most likely to send.

use std::sync::OnceLock;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use chrono_tz::Tz;

use crate::config::{localize, start_of_day};
use crate::error::Result;
use crate::precision::Precision;

/// What a pattern produces when it matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatShape {
    /// Clock time only; anchored to the current date in the target zone.
    Time,
    /// Calendar date only; midnight in the target zone.
    Date,
    /// Date and time without a zone; interpreted in the target zone.
    DateTime,
    /// Date and time with a numeric offset or a zone abbreviation.
    Zoned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatSpec {
    pub pattern: &'static str,
    pub precision: Precision,
    pub shape: FormatShape,
}

const fn spec(pattern: &'static str, precision: Precision, shape: FormatShape) -> FormatSpec {
    FormatSpec {
        pattern,
        precision,
        shape,
    }
}

use FormatShape::{Date, DateTime as Clock, Time, Zoned};
use Precision::{Day, Microsecond, Millisecond, Minute, Nanosecond, Second};

/// All known formats, in matching order.
pub const FORMATS: &[FormatSpec] = &[
    // Without timezone
    spec("%I:%M%p", Minute, Time),
    spec("%I:%M %p", Minute, Time),
    spec("%A, %B %d, %Y %I:%M %p", Minute, Clock),
    spec("%m/%d/%y", Day, Date),
    spec("%m/%d/%Y", Day, Date),
    spec("%Y-%m-%d", Day, Date),
    spec("%B %d, %Y", Day, Date),
    spec("%A, %B %d, %Y", Day, Date),
    spec("%d-%b-%Y", Day, Date),
    spec("%d %B %Y", Day, Date),
    spec("%m/%d/%Y %I:%M %p", Minute, Clock),
    spec("%m/%d/%Y %H:%M", Minute, Clock),
    spec("%Y-%m-%dT%H:%M", Minute, Clock),
    spec("%Y-%m-%d %H:%M", Minute, Clock),
    spec("%a %b %e %H:%M:%S %Y", Second, Clock),
    spec("%m/%d/%Y %I:%M:%S %p", Second, Clock),
    spec("%m/%d/%Y %H:%M:%S", Second, Clock),
    spec("%Y-%m-%d %H:%M:%S", Second, Clock),
    spec("%Y-%m-%dT%H:%M:%S", Second, Clock),
    spec("%Y%m%dT%H%M%S", Second, Clock),
    spec("%B %d, %Y %H:%M:%S", Second, Clock),
    spec("%B %d, %Y %H:%M:%S.%3f", Millisecond, Clock),
    spec("%m/%d/%Y %I:%M:%S.%3f %p", Millisecond, Clock),
    spec("%m/%d/%Y %H:%M:%S.%3f", Millisecond, Clock),
    spec("%Y-%m-%d %H:%M:%S.%3f", Millisecond, Clock),
    spec("%Y-%m-%dT%H:%M:%S.%3f", Millisecond, Clock),
    spec("%m/%d/%Y %I:%M:%S.%6f %p", Microsecond, Clock),
    spec("%m/%d/%Y %H:%M:%S.%6f", Microsecond, Clock),
    spec("%Y-%m-%d %H:%M:%S.%6f", Microsecond, Clock),
    spec("%Y-%m-%dT%H:%M:%S.%6f", Microsecond, Clock),
    spec("%m/%d/%Y %I:%M:%S.%9f %p", Nanosecond, Clock),
    spec("%m/%d/%Y %H:%M:%S.%9f", Nanosecond, Clock),
    spec("%Y-%m-%d %H:%M:%S.%9f", Nanosecond, Clock),
    spec("%Y-%m-%dT%H:%M:%S.%9f", Nanosecond, Clock),
    // With timezone
    spec("%m/%d/%Y %I:%M %p %Z", Minute, Zoned),
    spec("%Y-%m-%dT%H:%M%#z", Minute, Zoned),
    spec("%Y%m%dT%H%M%#z", Minute, Zoned),
    spec("%Y-%m-%dT%H:%MZ%:z", Minute, Zoned),
    spec("%a %b %e %H:%M %Z %Y", Minute, Zoned),
    spec("%a %b %d %H:%M %z %Y", Minute, Zoned),
    spec("%d %b %y %H:%M %Z", Minute, Zoned),
    spec("%d %b %y %H:%M %z", Minute, Zoned),
    spec("%A, %d-%b-%y %H:%M %Z", Minute, Zoned),
    spec("%a, %d %b %Y %H:%M %Z", Minute, Zoned),
    spec("%a, %d %b %Y %H:%M %z", Minute, Zoned),
    spec("%m/%d/%Y %H:%M:%S %Z", Second, Zoned),
    spec("%Y-%m-%dT%H:%M:%S%#z", Second, Zoned),
    spec("%Y%m%dT%H%M%S%#z", Second, Zoned),
    spec("%Y-%m-%dT%H:%M:%SZ%:z", Second, Zoned),
    spec("%a %b %e %H:%M:%S %Z %Y", Second, Zoned),
    spec("%a %b %d %H:%M:%S %z %Y", Second, Zoned),
    spec("%d %b %y %H:%M:%S %Z", Second, Zoned),
    spec("%d %b %y %H:%M:%S %z", Second, Zoned),
    spec("%A, %d-%b-%y %H:%M:%S %Z", Second, Zoned),
    spec("%a, %d %b %Y %H:%M:%S %Z", Second, Zoned),
    spec("%a, %d %b %Y %H:%M:%S %z", Second, Zoned),
    spec("%Y-%m-%dT%H:%M:%S.%3f%#z", Millisecond, Zoned),
    spec("%Y-%m-%dT%H:%M:%S.%6f%#z", Microsecond, Zoned),
    spec("%Y-%m-%dT%H:%M:%S%.f%#z", Nanosecond, Zoned),
];

/// Zone abbreviations accepted where a pattern has `%Z`, with their offsets.
const ZONE_ABBREVIATIONS: &[(&str, &str)] = &[
    ("UTC", "+0000"),
    ("GMT", "+0000"),
    ("Z", "+0000"),
    ("EST", "-0500"),
    ("EDT", "-0400"),
    ("CST", "-0600"),
    ("CDT", "-0500"),
    ("MST", "-0700"),
    ("MDT", "-0600"),
    ("PST", "-0800"),
    ("PDT", "-0700"),
    ("BST", "+0100"),
    ("CET", "+0100"),
    ("CEST", "+0200"),
    ("JST", "+0900"),
];

impl FormatSpec {
    pub fn has_timezone(&self) -> bool {
        self.shape == FormatShape::Zoned
    }

    /// Parse a zone-less string as wall-clock time in `tz`.
    ///
    /// `today` is the current date in `tz`, used by time-only patterns.
    /// Returns `None` when the pattern does not match, and an error when it
    /// matches a wall time `tz` never shows.
    pub(crate) fn parse_local(
        &self,
        input: &str,
        tz: &Tz,
        today: NaiveDate,
    ) -> Option<Result<DateTime<Tz>>> {
        let localized = match self.shape {
            FormatShape::Time => {
                let time = NaiveTime::parse_from_str(input, self.pattern).ok()?;
                localize(tz, &today.and_time(time))
            }
            FormatShape::Date => {
                start_of_day(NaiveDate::parse_from_str(input, self.pattern).ok()?, *tz)
            }
            FormatShape::DateTime => {
                localize(tz, &NaiveDateTime::parse_from_str(input, self.pattern).ok()?)
            }
            FormatShape::Zoned => return None,
        };
        Some(localized)
    }

    /// Parse a string that names its own offset or zone abbreviation.
    pub(crate) fn parse_zoned(&self, input: &str) -> Option<DateTime<FixedOffset>> {
        if self.shape != FormatShape::Zoned {
            return None;
        }
        if self.pattern.contains("%Z") {
            let (rewritten, pattern) = substitute_abbreviation(input, self.pattern)?;
            DateTime::parse_from_str(&rewritten, &pattern).ok()
        } else {
            DateTime::parse_from_str(input, self.pattern).ok()
        }
    }
}

/// Replace the first known zone abbreviation in `input` with its numeric
/// offset and switch the pattern's `%Z` to `%z` to match.
fn substitute_abbreviation(input: &str, pattern: &str) -> Option<(String, String)> {
    let mut replaced = false;
    let rewritten = input
        .split(' ')
        .map(|token| {
            if !replaced {
                if let Some((_, offset)) = ZONE_ABBREVIATIONS.iter().find(|(abbr, _)| *abbr == token) {
                    replaced = true;
                    return *offset;
                }
            }
            token
        })
        .collect::<Vec<_>>()
        .join(" ");

    replaced.then(|| (rewritten, pattern.replace("%Z", "%z")))
}

/// The catalog split into its two partitions, order preserved.
#[derive(Debug, Clone)]
pub struct FormatCatalog {
    without_timezone: Vec<FormatSpec>,
    with_timezone: Vec<FormatSpec>,
}

impl FormatCatalog {
    pub fn new(specs: &[FormatSpec]) -> Self {
        let (with_timezone, without_timezone): (Vec<FormatSpec>, Vec<FormatSpec>) =
            specs.iter().partition(|s| s.has_timezone());
        Self {
            without_timezone,
            with_timezone,
        }
    }

    /// The catalog built from [`FORMATS`], initialized once per process.
    pub fn global() -> &'static FormatCatalog {
        static CATALOG: OnceLock<FormatCatalog> = OnceLock::new();
        CATALOG.get_or_init(|| FormatCatalog::new(FORMATS))
    }

    pub fn without_timezone(&self) -> &[FormatSpec] {
        &self.without_timezone
    }

    pub fn with_timezone(&self) -> &[FormatSpec] {
        &self.with_timezone
    }

    /// First zone-less pattern that parses `input` in `tz`.
    ///
    /// The first matching pattern decides: if its wall time does not exist
    /// in `tz`, that error is returned rather than trying later patterns.
    pub fn match_local(
        &self,
        input: &str,
        tz: &Tz,
        today: NaiveDate,
    ) -> Result<Option<(DateTime<Tz>, &FormatSpec)>> {
        self.without_timezone
            .iter()
            .find_map(|spec| {
                spec.parse_local(input, tz, today)
                    .map(|parsed| parsed.map(|dt| (dt, spec)))
            })
            .transpose()
    }

    /// First zone-bearing pattern that parses `input`.
    pub fn match_zoned(&self, input: &str) -> Option<(DateTime<FixedOffset>, &FormatSpec)> {
        self.with_timezone
            .iter()
            .find_map(|spec| spec.parse_zoned(input).map(|dt| (dt, spec)))
    }
}
