//! # marketdata-dates
//!
//! Flexible date resolution for market-data request builders.
//!
//! Callers hand the engine a date in whatever form they have it: a Unix
//! timestamp at any of four resolutions, a spreadsheet serial number, an ISO
//! or locale-style string, a keyword like `today`, an instant, or a range.
//! The engine resolves it to a single instant in a known timezone and reports
//! how precisely the input specified it. Calendar keys (`2022-03`,
//! `2022-W01`) expand to exact ranges, and shorthand intervals (`10s`,
//! `2 weeks`) parse to durations.
//!
//! ## Modules
//!
//! - [`resolve`] — input dispatch: [`Resolver`] and [`ParsedMoment`]
//! - [`input`] — the closed [`DateInput`] type and its conversions
//! - [`formats`] — ordered table of parseable string formats
//! - [`numeric`] — integer timestamps classified by digit count
//! - [`serial`] — spreadsheet serial date conversion
//! - [`precision`] — precision levels and inference from an instant
//! - [`range`] — [`CalendarRange`] containment and overlap
//! - [`keys`] — calendar keys: parsing, validation, generation
//! - [`interval`] — shorthand duration parsing
//! - [`display`] — human-readable rendering of instants
//! - [`config`] — default and display timezones
//! - [`error`] — Error types
//!
//! ## Example
//!
//! ```
//! use marketdata_dates::{Precision, Resolver};
//!
//! let resolver = Resolver::new(chrono_tz::UTC);
//! let moment = resolver.resolve(36540).unwrap();
//! assert_eq!(moment.instant.format("%Y-%m-%d").to_string(), "2000-01-15");
//! assert_eq!(moment.precision, Precision::Day);
//!
//! let week = marketdata_dates::date_key_to_range("2022-W01", Some(chrono_tz::UTC)).unwrap();
//! assert_eq!(week.start().format("%Y-%m-%d").to_string(), "2022-01-02");
//! ```

pub mod config;
pub mod display;
pub mod error;
pub mod formats;
pub mod input;
pub mod interval;
pub mod keys;
pub mod numeric;
pub mod precision;
pub mod range;
pub mod resolve;
pub mod serial;

use chrono::DateTime;
use chrono_tz::Tz;

pub use config::{parse_timezone, DateConfig, DEFAULT_TIMEZONE};
pub use display::{is_start_of_day, time_string, time_string_in};
pub use error::{DateError, Result};
pub use formats::{FormatCatalog, FormatShape, FormatSpec, FORMATS};
pub use input::DateInput;
pub use interval::{parse_interval, Interval, IntervalUnit};
pub use keys::{generate_date_keys, is_valid_date_key, DateKey, DateKeyUnit};
pub use numeric::TimestampMagnitude;
pub use precision::{infer_precision, Precision};
pub use range::{Bounded, CalendarRange};
pub use resolve::{ParsedMoment, Resolver};
pub use serial::{from_serial, serial_precision, to_serial};

fn resolver(tz: Option<Tz>) -> Resolver {
    tz.map_or_else(Resolver::default, Resolver::new)
}

/// Resolve `input` in `tz`, or the default timezone when `None`.
pub fn resolve(input: impl Into<DateInput>, tz: Option<Tz>) -> Result<ParsedMoment> {
    resolver(tz).resolve(input)
}

/// Resolve `input` and keep only the instant.
pub fn to_time(input: impl Into<DateInput>, tz: Option<Tz>) -> Result<DateTime<Tz>> {
    resolver(tz).to_time(input)
}

/// Resolve `input` and format it as `YYYY-MM-DD`.
pub fn to_day_string(input: impl Into<DateInput>, tz: Option<Tz>) -> Result<String> {
    resolver(tz).to_day_string(input)
}

/// Resolve two bounds into a [`CalendarRange`].
pub fn new_calendar_range(
    start: impl Into<DateInput>,
    end: impl Into<DateInput>,
    tz: Option<Tz>,
) -> Result<CalendarRange> {
    resolver(tz).calendar_range(start, end)
}

/// Expand a calendar key to its range.
pub fn date_key_to_range(key: &str, tz: Option<Tz>) -> Result<CalendarRange> {
    keys::date_key_to_range(key, tz.unwrap_or(DateConfig::global().default_timezone))
}

/// The earliest of `inputs`, resolved in the default timezone.
pub fn earliest<I>(inputs: I) -> Result<DateTime<Tz>>
where
    I: IntoIterator,
    I::Item: Into<DateInput>,
{
    Resolver::default().earliest(inputs)
}

/// The latest of `inputs`, resolved in the default timezone.
pub fn latest<I>(inputs: I) -> Result<DateTime<Tz>>
where
    I: IntoIterator,
    I::Item: Into<DateInput>,
{
    Resolver::default().latest(inputs)
}

/// The smallest range covering all of `inputs`.
pub fn combine_date_ranges<I>(inputs: I) -> Result<CalendarRange>
where
    I: IntoIterator,
    I::Item: Into<DateInput>,
{
    Resolver::default().combine_date_ranges(inputs)
}
