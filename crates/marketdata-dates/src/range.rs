//! Closed intervals of time with containment and overlap algebra.
//!
//! A [`CalendarRange`] holds two instants in one timezone with
//! `start <= end`; both bounds are inclusive. Construction rejects inverted
//! bounds, so every method can rely on the ordering.

use std::fmt;

use chrono::{DateTime, SecondsFormat, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use crate::error::{DateError, Result};
use crate::input::DateInput;
use crate::keys::{self, DateKey};
use crate::resolve::Resolver;

/// Anything with an inclusive lower and upper bound in time.
///
/// A single instant is its own lower and upper bound.
pub trait Bounded {
    fn lower(&self) -> DateTime<Utc>;
    fn upper(&self) -> DateTime<Utc>;
}

impl<Z: TimeZone> Bounded for DateTime<Z> {
    fn lower(&self) -> DateTime<Utc> {
        self.with_timezone(&Utc)
    }

    fn upper(&self) -> DateTime<Utc> {
        self.with_timezone(&Utc)
    }
}

impl Bounded for CalendarRange {
    fn lower(&self) -> DateTime<Utc> {
        self.start.with_timezone(&Utc)
    }

    fn upper(&self) -> DateTime<Utc> {
        self.end.with_timezone(&Utc)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarRange {
    start: DateTime<Tz>,
    end: DateTime<Tz>,
}

impl CalendarRange {
    /// Build a range from two instants. `end` is expressed in `start`'s zone.
    ///
    /// # Errors
    ///
    /// Returns [`DateError::InvertedRange`] when `start` is after `end`.
    pub fn new(start: DateTime<Tz>, end: DateTime<Tz>) -> Result<Self> {
        if start > end {
            return Err(DateError::InvertedRange {
                start: start.to_rfc3339(),
                end: end.to_rfc3339(),
            });
        }
        let end = end.with_timezone(&start.timezone());
        Ok(Self { start, end })
    }

    /// The range covering the calendar unit named by `key` in `tz`.
    pub fn from_date_key(key: &str, tz: Tz) -> Result<Self> {
        keys::date_key_to_range(key, tz)
    }

    pub fn start(&self) -> &DateTime<Tz> {
        &self.start
    }

    pub fn end(&self) -> &DateTime<Tz> {
        &self.end
    }

    pub fn timezone(&self) -> Tz {
        self.start.timezone()
    }

    /// Replace both bounds, resolving each in this range's timezone.
    ///
    /// The range is left unchanged on error.
    pub fn set_dates(
        &mut self,
        start: impl Into<DateInput>,
        end: impl Into<DateInput>,
    ) -> Result<()> {
        *self = Resolver::new(self.timezone()).calendar_range(start, end)?;
        Ok(())
    }

    /// Replace both bounds with the span of `key` in `tz`.
    pub fn set_from_date_key(&mut self, key: &str, tz: Tz) -> Result<()> {
        *self = Self::from_date_key(key, tz)?;
        Ok(())
    }

    /// Whether `other` lies wholly inside this range, bounds included.
    pub fn contains<B: Bounded + ?Sized>(&self, other: &B) -> bool {
        self.lower() <= other.lower() && other.upper() <= self.upper()
    }

    /// Whether `other` lies wholly outside this range.
    ///
    /// This is not the negation of [`contains`](Self::contains): a partial
    /// overlap is neither contained nor disjoint.
    pub fn does_not_contain<B: Bounded + ?Sized>(&self, other: &B) -> bool {
        other.upper() < self.lower() || self.upper() < other.lower()
    }

    /// Whether `other` overlaps this range without being contained by it.
    pub fn partially_contains<B: Bounded + ?Sized>(&self, other: &B) -> bool {
        !self.contains(other) && !self.does_not_contain(other)
    }

    /// Resolve `value` in this range's zone and test containment.
    pub fn contains_value(&self, value: impl Into<DateInput>) -> Result<bool> {
        let moment = Resolver::new(self.timezone()).resolve(value)?;
        Ok(self.contains(&moment.instant))
    }

    pub fn duration(&self) -> TimeDelta {
        self.end.signed_duration_since(self.start)
    }

    pub fn duration_ms(&self) -> i64 {
        self.duration().num_milliseconds()
    }

    /// Start and end as Unix seconds.
    pub fn unix_timestamps(&self) -> (i64, i64) {
        (self.start.timestamp(), self.end.timestamp())
    }

    /// Split integer timestamps into those inside the range and the rest.
    ///
    /// Each value is classified by magnitude like any integer input; values
    /// that fail to resolve count as outside.
    pub fn validate_timestamps(&self, timestamps: &[i64]) -> (Vec<i64>, Vec<i64>) {
        let resolver = Resolver::new(self.timezone());
        timestamps.iter().partition(|&&ts| {
            resolver
                .resolve(ts)
                .is_ok_and(|moment| self.contains(&moment.instant))
        })
    }

    /// Whether this range starts before `value`. A range argument is
    /// compared by its start.
    pub fn is_earlier_than(&self, value: impl Into<DateInput>) -> Result<bool> {
        let (lower, _) = Resolver::new(self.timezone()).bounds(&value.into())?;
        Ok(self.start < lower)
    }

    /// Whether this range ends after `value`. A range argument is compared
    /// by its end.
    pub fn is_later_than(&self, value: impl Into<DateInput>) -> Result<bool> {
        let (_, upper) = Resolver::new(self.timezone()).bounds(&value.into())?;
        Ok(self.end > upper)
    }

    /// Keys of `unit` for every calendar unit this range touches.
    pub fn generate_date_keys(&self, unit: &str) -> Result<Vec<String>> {
        keys::generate_date_keys(&self.start, &self.end, unit)
    }

    /// Typed form of [`generate_date_keys`](Self::generate_date_keys).
    pub fn date_keys(&self, unit: keys::DateKeyUnit) -> Result<Vec<DateKey>> {
        keys::date_keys_between(&self.start, &self.end, unit)
    }
}

impl fmt::Display for CalendarRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} to {}",
            self.start.to_rfc3339_opts(SecondsFormat::AutoSi, false),
            self.end.to_rfc3339_opts(SecondsFormat::AutoSi, false)
        )
    }
}
