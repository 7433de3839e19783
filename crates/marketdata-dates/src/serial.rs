//! Spreadsheet serial dates.
//!
//! A serial date is a floating-point count of days since 1899-12-30, the
//! anchor spreadsheet applications use so that serial 1 is 1899-12-31 and
//! serial 60 lands on their phantom 1900-02-29. The integer part counts days
//! and the fractional part is the time of day.
//!
//! Serials are wall-clock values: `44197.0` is midnight on 2021-01-01 in
//! whatever zone the caller names, not midnight UTC.

use chrono::{DateTime, Offset, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;

use crate::config::localize;
use crate::error::{DateError, Result};
use crate::precision::Precision;

/// Days from the serial anchor (1899-12-30) to the Unix epoch.
pub const SERIAL_EPOCH_OFFSET_DAYS: i64 = 25_569;

const SECONDS_PER_DAY: i64 = 86_400;
const NANOS_PER_DAY: f64 = 86_400_000_000_000.0;

/// Convert a serial date to an instant in `tz`.
///
/// The serial is read as a wall clock and placed in `tz`. A wall time that
/// occurs twice resolves to the earlier instant.
///
/// # Errors
///
/// Returns [`DateError::OutOfRange`] for non-finite values and for serials
/// outside chrono's representable range, and
/// [`DateError::NonexistentLocalTime`] for wall times inside a DST gap.
pub fn from_serial(value: f64, tz: Tz) -> Result<DateTime<Tz>> {
    let out_of_range = || DateError::OutOfRange(format!("serial date {value}"));
    if !value.is_finite() {
        return Err(out_of_range());
    }

    let whole_days = value.trunc();
    let fraction_nanos = ((value - whole_days) * NANOS_PER_DAY).round() as i64;

    // Saturating cast; anything that large fails the checked arithmetic below.
    let unix_seconds = (whole_days as i64)
        .checked_sub(SERIAL_EPOCH_OFFSET_DAYS)
        .and_then(|days| days.checked_mul(SECONDS_PER_DAY))
        .ok_or_else(out_of_range)?;

    let wall = DateTime::from_timestamp(unix_seconds, 0)
        .and_then(|dt| dt.checked_add_signed(TimeDelta::nanoseconds(fraction_nanos)))
        .ok_or_else(out_of_range)?;

    localize(&tz, &wall.naive_utc())
}

/// Convert an instant to a serial date, reading its wall clock in `tz`.
pub fn to_serial<Z: TimeZone>(instant: &DateTime<Z>, tz: Tz) -> f64 {
    let utc = instant.with_timezone(&Utc);
    let offset = tz.offset_from_utc_datetime(&utc.naive_utc()).fix();
    let wall_seconds = utc.timestamp() + i64::from(offset.local_minus_utc());

    let days = wall_seconds as f64 / SECONDS_PER_DAY as f64;
    let subsec = f64::from(utc.timestamp_subsec_nanos()) / NANOS_PER_DAY;
    days + subsec + SERIAL_EPOCH_OFFSET_DAYS as f64
}

/// Precision carried by a serial's fractional day.
///
/// A whole number is a day. Otherwise the fraction is scaled by 10^9, 10^6
/// and 10^3 in turn; the first scale that yields an integer decides between
/// second, millisecond and microsecond, falling through to nanosecond.
pub fn serial_precision(value: f64) -> Precision {
    let fraction = value.fract().abs();
    if fraction == 0.0 {
        return Precision::Day;
    }

    let is_integral = |scale: f64| {
        let scaled = fraction * scale;
        scaled == scaled.floor()
    };

    if is_integral(1e9) {
        Precision::Second
    } else if is_integral(1e6) {
        Precision::Millisecond
    } else if is_integral(1e3) {
        Precision::Microsecond
    } else {
        Precision::Nanosecond
    }
}
