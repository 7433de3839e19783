//! Resolution of arbitrary [`DateInput`] values to instants.
//!
//! A [`Resolver`] fixes the timezone that zone-less inputs are read in and,
//! optionally, the instant treated as "now". Dispatch is by input kind:
//!
//! - integers are classified by digit count (serial date or Unix time);
//! - floats are serial dates;
//! - strings that look numeric are converted and resolved as numbers;
//!   other strings go through the zone-less formats, then the zone-bearing
//!   formats, then the keywords `today`, `yesterday` and `now`;
//! - instants pass through with their precision inferred;
//! - ranges resolve to their start at the coarser of the two bounds'
//!   precisions;
//! - producers are invoked and their result resolved as an instant.
//!
//! Every result is expressed in the resolver's timezone.

use chrono::{DateTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use crate::config::{self, end_of_day, start_of_day, DateConfig};
use crate::error::{DateError, Result};
use crate::formats::FormatCatalog;
use crate::input::DateInput;
use crate::numeric;
use crate::precision::{infer_precision, Precision};
use crate::range::CalendarRange;
use crate::serial;

// ── Resolved values ─────────────────────────────────────────────────────────

/// A resolved input: the instant and how precisely it was specified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ParsedMoment {
    pub instant: DateTime<Tz>,
    pub precision: Precision,
}

impl ParsedMoment {
    fn inferred(instant: DateTime<Tz>) -> Self {
        Self {
            precision: infer_precision(&instant),
            instant,
        }
    }
}

// ── Resolver ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolver {
    tz: Tz,
    anchor: Option<DateTime<Utc>>,
}

impl Default for Resolver {
    /// Resolves in the process default timezone against the system clock.
    fn default() -> Self {
        Self::new(DateConfig::global().default_timezone)
    }
}

impl Resolver {
    pub fn new(tz: Tz) -> Self {
        Self { tz, anchor: None }
    }

    /// Build a resolver from an IANA zone name.
    pub fn for_timezone(name: &str) -> Result<Self> {
        config::parse_timezone(name).map(Self::new)
    }

    /// Pin "now" to `anchor` instead of reading the system clock.
    ///
    /// Affects keywords and time-only strings.
    pub fn with_anchor<Z: TimeZone>(mut self, anchor: DateTime<Z>) -> Self {
        self.anchor = Some(anchor.with_timezone(&Utc));
        self
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// The current instant in this resolver's zone.
    pub fn now(&self) -> DateTime<Tz> {
        self.anchor.unwrap_or_else(Utc::now).with_timezone(&self.tz)
    }

    /// Resolve any input to an instant and its precision.
    ///
    /// # Arguments
    ///
    /// * `input` — Anything convertible to [`DateInput`]: integers, floats,
    ///   strings, instants, ranges or `Option`s of these
    ///
    /// # Errors
    ///
    /// - [`DateError::NilInput`] for absent values.
    /// - [`DateError::UnsupportedType`] for booleans.
    /// - [`DateError::AmbiguousTimestampMagnitude`] for integers whose digit
    ///   count matches no timestamp resolution.
    /// - [`DateError::UnparseableDateString`] for strings nothing matches.
    /// - [`DateError::OutOfRange`] for values chrono cannot represent.
    /// - [`DateError::NonexistentLocalTime`] for wall times inside a DST gap.
    ///
    /// # Examples
    ///
    /// ```
    /// use marketdata_dates::{Precision, Resolver};
    ///
    /// let resolver = Resolver::new(chrono_tz::America::New_York);
    /// let moment = resolver.resolve("2024-03-08 16:00").unwrap();
    /// assert_eq!(moment.instant.to_rfc3339(), "2024-03-08T16:00:00-05:00");
    /// assert_eq!(moment.precision, Precision::Minute);
    ///
    /// // Ten digits are Unix seconds.
    /// let moment = resolver.resolve(1_709_931_600_i64).unwrap();
    /// assert_eq!(moment.precision, Precision::Second);
    /// ```
    pub fn resolve(&self, input: impl Into<DateInput>) -> Result<ParsedMoment> {
        self.resolve_input(&input.into())
    }

    pub fn resolve_input(&self, input: &DateInput) -> Result<ParsedMoment> {
        match input {
            DateInput::Nil => Err(DateError::NilInput),
            DateInput::Boolean(_) => Err(DateError::UnsupportedType(
                "boolean values cannot be parsed as dates".to_string(),
            )),
            DateInput::Integer(value) => self.resolve_integer(*value),
            DateInput::Float(value) => self.resolve_serial(*value),
            DateInput::Text(text) => self.resolve_text(text),
            DateInput::Instant(instant) => Ok(ParsedMoment::inferred(instant.with_timezone(&self.tz))),
            DateInput::Range(range) => {
                let start = ParsedMoment::inferred(range.start().with_timezone(&self.tz));
                let end_precision = infer_precision(&range.end().with_timezone(&self.tz));
                Ok(ParsedMoment {
                    instant: start.instant,
                    precision: start.precision.coarser(end_precision),
                })
            }
            DateInput::Producer(produce) => Ok(ParsedMoment::inferred(produce().with_timezone(&self.tz))),
        }
    }

    /// Resolve and keep only the instant.
    pub fn to_time(&self, input: impl Into<DateInput>) -> Result<DateTime<Tz>> {
        Ok(self.resolve(input)?.instant)
    }

    /// Resolve and format as `YYYY-MM-DD` in this resolver's zone.
    pub fn to_day_string(&self, input: impl Into<DateInput>) -> Result<String> {
        Ok(self.to_time(input)?.format("%Y-%m-%d").to_string())
    }
}

// ── Ranges and aggregates ───────────────────────────────────────────────────

impl Resolver {
    /// Resolve both bounds and build a range.
    ///
    /// # Errors
    ///
    /// Propagates resolution errors, and returns
    /// [`DateError::InvertedRange`] when `start` resolves after `end`.
    pub fn calendar_range(
        &self,
        start: impl Into<DateInput>,
        end: impl Into<DateInput>,
    ) -> Result<CalendarRange> {
        let start = self.to_time(start)?;
        let end = self.to_time(end)?;
        CalendarRange::new(start, end)
    }

    /// Build a range from request-style parameters.
    ///
    /// A non-blank `date` wins and covers the rest of that day, from the
    /// resolved instant to 23:59:59.999999999. Otherwise both `from` and `to`
    /// must be given.
    ///
    /// # Arguments
    ///
    /// * `date` — A single day, e.g. `"2024-05-17"`
    /// * `from` — Start of an explicit range
    /// * `to` — End of an explicit range
    ///
    /// # Errors
    ///
    /// Returns [`DateError::NilInput`] when neither `date` nor both of
    /// `from` and `to` are present, and propagates resolution errors.
    ///
    /// # Examples
    ///
    /// ```
    /// use marketdata_dates::Resolver;
    ///
    /// let resolver = Resolver::new(chrono_tz::UTC);
    /// let day = resolver.date_range(Some("2024-05-17"), None, None).unwrap();
    /// assert_eq!(day.end().to_rfc3339(), "2024-05-17T23:59:59.999999999+00:00");
    /// ```
    pub fn date_range(
        &self,
        date: Option<&str>,
        from: Option<&str>,
        to: Option<&str>,
    ) -> Result<CalendarRange> {
        fn present(value: Option<&str>) -> Option<&str> {
            value.filter(|v| !v.trim().is_empty())
        }

        match (present(date), present(from), present(to)) {
            (Some(date), _, _) => {
                let start = self.to_time(date)?;
                let end = end_of_day(start.date_naive(), self.tz)?;
                CalendarRange::new(start, end)
            }
            (None, Some(from), Some(to)) => self.calendar_range(from, to),
            _ => Err(DateError::NilInput),
        }
    }

    /// The earliest instant among `inputs`. Ranges contribute their start.
    ///
    /// # Errors
    ///
    /// Returns [`DateError::EmptyInputSet`] when `inputs` is empty, and the
    /// first resolution error otherwise.
    pub fn earliest<I>(&self, inputs: I) -> Result<DateTime<Tz>>
    where
        I: IntoIterator,
        I::Item: Into<DateInput>,
    {
        let mut earliest: Option<DateTime<Tz>> = None;
        for input in inputs {
            let (lower, _) = self.bounds(&input.into())?;
            earliest = Some(earliest.map_or(lower, |current| current.min(lower)));
        }
        earliest.ok_or(DateError::EmptyInputSet)
    }

    /// The latest instant among `inputs`. Ranges contribute their end.
    pub fn latest<I>(&self, inputs: I) -> Result<DateTime<Tz>>
    where
        I: IntoIterator,
        I::Item: Into<DateInput>,
    {
        let mut latest: Option<DateTime<Tz>> = None;
        for input in inputs {
            let (_, upper) = self.bounds(&input.into())?;
            latest = Some(latest.map_or(upper, |current| current.max(upper)));
        }
        latest.ok_or(DateError::EmptyInputSet)
    }

    /// The smallest range covering every input.
    pub fn combine_date_ranges<I>(&self, inputs: I) -> Result<CalendarRange>
    where
        I: IntoIterator,
        I::Item: Into<DateInput>,
    {
        let inputs: Vec<DateInput> = inputs.into_iter().map(Into::into).collect();
        let start = self.earliest(inputs.iter().cloned())?;
        let end = self.latest(inputs)?;
        CalendarRange::new(start, end)
    }

    /// Lower and upper bound of an input: a range's own bounds, or the
    /// resolved instant twice.
    pub(crate) fn bounds(&self, input: &DateInput) -> Result<(DateTime<Tz>, DateTime<Tz>)> {
        match input {
            DateInput::Range(range) => Ok((
                range.start().with_timezone(&self.tz),
                range.end().with_timezone(&self.tz),
            )),
            other => {
                let instant = self.resolve_input(other)?.instant;
                Ok((instant, instant))
            }
        }
    }
}

// ── Input dispatch ──────────────────────────────────────────────────────────

impl Resolver {
    fn resolve_integer(&self, value: i64) -> Result<ParsedMoment> {
        let magnitude = numeric::classify(value)?;
        match magnitude.precision() {
            None => self.resolve_serial(value as f64),
            Some(precision) => Ok(ParsedMoment {
                instant: numeric::from_unix(value, magnitude)?.with_timezone(&self.tz),
                precision,
            }),
        }
    }

    fn resolve_serial(&self, value: f64) -> Result<ParsedMoment> {
        Ok(ParsedMoment {
            instant: serial::from_serial(value, self.tz)?,
            precision: serial::serial_precision(value),
        })
    }

    fn resolve_text(&self, text: &str) -> Result<ParsedMoment> {
        let trimmed = text.trim();

        // Numeric strings are numbers, never patterns.
        if let Ok(value) = trimmed.parse::<i64>() {
            return self.resolve_integer(value);
        }
        if let Some(digits) = numeric::literal_digit_count(trimmed) {
            return Err(DateError::AmbiguousTimestampMagnitude {
                value: trimmed.to_string(),
                digits,
            });
        }
        if let Ok(value) = trimmed.parse::<f64>() {
            if value.is_finite() {
                return self.resolve_serial(value);
            }
        }

        let catalog = FormatCatalog::global();
        let today = self.now().date_naive();
        if let Some((instant, spec)) = catalog.match_local(trimmed, &self.tz, today)? {
            tracing::trace!(input = trimmed, pattern = spec.pattern, "matched zone-less format");
            return Ok(ParsedMoment {
                instant,
                precision: spec.precision,
            });
        }
        if let Some((instant, spec)) = catalog.match_zoned(trimmed) {
            tracing::trace!(input = trimmed, pattern = spec.pattern, "matched zoned format");
            return Ok(ParsedMoment {
                instant: instant.with_timezone(&self.tz),
                precision: spec.precision,
            });
        }
        if let Some(moment) = self.resolve_keyword(trimmed)? {
            return Ok(moment);
        }

        Err(DateError::UnparseableDateString(text.to_string()))
    }

    fn resolve_keyword(&self, text: &str) -> Result<Option<ParsedMoment>> {
        let now = self.now();
        let day = |date| -> Result<Option<ParsedMoment>> {
            Ok(Some(ParsedMoment {
                instant: start_of_day(date, self.tz)?,
                precision: Precision::Day,
            }))
        };

        match text.to_ascii_lowercase().as_str() {
            "today" => day(now.date_naive()),
            "yesterday" => {
                let yesterday = now
                    .date_naive()
                    .pred_opt()
                    .ok_or_else(|| DateError::OutOfRange("yesterday".to_string()))?;
                day(yesterday)
            }
            "now" => Ok(Some(ParsedMoment {
                instant: now.with_nanosecond(0).unwrap_or(now),
                precision: Precision::Second,
            })),
            _ => Ok(None),
        }
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
