//! Process-wide defaults for date resolution.
//!
//! The default timezone is read once from the `TZ` environment variable the
//! first time [`DateConfig::global`] is called and is never mutated after
//! that. An unset or unknown zone falls back to [`DEFAULT_TIMEZONE`].

use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, TimeZone};
use chrono_tz::Tz;

use crate::error::{DateError, Result};

/// Zone used when `TZ` is unset or names an unknown zone.
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::America::New_York;

/// Environment variable consulted for the default timezone.
pub const TIMEZONE_ENV_VAR: &str = "TZ";

const MINUTES_PER_DAY: i64 = 24 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateConfig {
    /// Zone used to interpret inputs that carry no zone of their own.
    pub default_timezone: Tz,
    /// Zone used by [`crate::display::time_string`].
    pub display_timezone: Tz,
}

impl Default for DateConfig {
    fn default() -> Self {
        Self {
            default_timezone: DEFAULT_TIMEZONE,
            display_timezone: DEFAULT_TIMEZONE,
        }
    }
}

impl DateConfig {
    /// Build a configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_timezone_setting(std::env::var(TIMEZONE_ENV_VAR).ok().as_deref())
    }

    /// Build a configuration from an optional timezone setting.
    ///
    /// Empty or unknown values fall back to [`DEFAULT_TIMEZONE`].
    pub fn from_timezone_setting(setting: Option<&str>) -> Self {
        let default_timezone = match setting.map(str::trim) {
            None | Some("") => DEFAULT_TIMEZONE,
            Some(name) => match parse_timezone(name) {
                Ok(tz) => tz,
                Err(_) => {
                    tracing::warn!(
                        timezone = name,
                        fallback = DEFAULT_TIMEZONE.name(),
                        "unknown timezone in TZ, using fallback"
                    );
                    DEFAULT_TIMEZONE
                }
            },
        };

        Self {
            default_timezone,
            ..Self::default()
        }
    }

    /// The process-wide configuration, loaded from the environment on first use.
    pub fn global() -> &'static DateConfig {
        static CONFIG: OnceLock<DateConfig> = OnceLock::new();
        CONFIG.get_or_init(DateConfig::from_env)
    }
}

/// Parse an IANA timezone string into `Tz`.
pub fn parse_timezone(s: &str) -> Result<Tz> {
    s.parse::<Tz>()
        .map_err(|_| DateError::InvalidTimezone(format!("'{}'", s)))
}

/// Place a wall-clock time in `tz`.
///
/// Ambiguous times (DST fall-back) resolve to the earlier instant; times
/// inside a DST gap are rejected.
pub(crate) fn localize(tz: &Tz, naive: &NaiveDateTime) -> Result<DateTime<Tz>> {
    tz.from_local_datetime(naive)
        .earliest()
        .ok_or_else(|| DateError::NonexistentLocalTime(format!("{naive} in {}", tz.name())))
}

/// The first instant of `date` in `tz`.
///
/// Usually midnight. Where a DST gap swallows midnight the day begins when
/// the clocks jump, so every calendar day has a start.
pub(crate) fn start_of_day(date: NaiveDate, tz: Tz) -> Result<DateTime<Tz>> {
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| DateError::OutOfRange(date.to_string()))?;

    (0..MINUTES_PER_DAY)
        .filter_map(|minute| midnight.checked_add_signed(TimeDelta::minutes(minute)))
        .find_map(|naive| tz.from_local_datetime(&naive).earliest())
        .ok_or_else(|| DateError::NonexistentLocalTime(format!("{date} in {}", tz.name())))
}

/// The last nanosecond of `date` in `tz`.
///
/// A repeated final hour ends at its later pass. If 23:59:59.999999999 falls
/// in a gap, the day ends one nanosecond before the next one starts.
pub(crate) fn end_of_day(date: NaiveDate, tz: Tz) -> Result<DateTime<Tz>> {
    let last_nano = date
        .and_hms_nano_opt(23, 59, 59, 999_999_999)
        .ok_or_else(|| DateError::OutOfRange(date.to_string()))?;
    if let Some(end) = tz.from_local_datetime(&last_nano).latest() {
        return Ok(end);
    }

    let next = date
        .succ_opt()
        .ok_or_else(|| DateError::OutOfRange(date.to_string()))?;
    start_of_day(next, tz)?
        .checked_sub_signed(TimeDelta::nanoseconds(1))
        .ok_or_else(|| DateError::OutOfRange(date.to_string()))
}
