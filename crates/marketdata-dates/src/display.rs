//! Human-readable rendering of instants.

use chrono::{DateTime, TimeZone, Timelike};
use chrono_tz::Tz;

use crate::config::DateConfig;

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S %:z";

/// Whether `instant` falls exactly on midnight in `tz`.
pub fn is_start_of_day<Z: TimeZone>(instant: &DateTime<Z>, tz: &Tz) -> bool {
    let local = instant.with_timezone(tz);
    local.num_seconds_from_midnight() == 0 && local.nanosecond() == 0
}

/// Render `instant` in the configured display timezone.
///
/// Midnight renders as a bare date (`2024-01-15`); anything else as date,
/// time and offset (`2024-01-15 09:30:00 -05:00`).
pub fn time_string<Z: TimeZone>(instant: &DateTime<Z>) -> String {
    time_string_in(instant, &DateConfig::global().display_timezone)
}

/// [`time_string`] with an explicit display zone.
pub fn time_string_in<Z: TimeZone>(instant: &DateTime<Z>, tz: &Tz) -> String {
    let local = instant.with_timezone(tz);
    let format = if is_start_of_day(&local, tz) {
        DATE_FORMAT
    } else {
        DATETIME_FORMAT
    };
    local.format(format).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use chrono_tz::America::New_York;

    #[test]
    fn test_midnight_renders_as_date() {
        let dt = New_York.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
        assert_eq!(time_string_in(&dt, &New_York), "2024-01-15");
    }

    #[test]
    fn test_other_times_include_offset() {
        let dt = New_York.with_ymd_and_hms(2024, 1, 15, 9, 30, 0).unwrap();
        assert_eq!(time_string_in(&dt, &New_York), "2024-01-15 09:30:00 -05:00");
    }

    #[test]
    fn test_converts_to_display_zone() {
        // Midnight UTC is 19:00 the previous evening in New York.
        let dt = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
        assert_eq!(time_string_in(&dt, &New_York), "2024-01-14 19:00:00 -05:00");
        assert!(!is_start_of_day(&dt, &New_York));
        assert!(is_start_of_day(&dt, &chrono_tz::UTC));
    }

    #[test]
    fn test_sub_second_is_not_midnight() {
        let dt = New_York.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap()
            + chrono::TimeDelta::nanoseconds(1);
        assert!(!is_start_of_day(&dt, &New_York));
    }

    #[test]
    fn test_time_string_uses_display_zone() {
        let dt = New_York.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        assert_eq!(time_string(&dt), "2024-06-01");
    }
}
