//! Calendar keys: short strings naming one calendar unit.
//!
//! | Shape        | Unit  | Example      |
//! |--------------|-------|--------------|
//! | `YYYY-MM-DD` | day   | `2022-03-15` |
//! | `YYYY-Www`   | week  | `2022-W01`   |
//! | `YYYY-MM`    | month | `2022-03`    |
//! | `YYYY`       | year  | `2022`       |
//!
//! Weeks run Sunday to Saturday. Week 1 of a year starts on that year's first
//! Sunday; the days before it belong to the last week of the previous year.
//! A year therefore has 52 or 53 weeks.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Days, Months, NaiveDate, TimeZone};
use chrono_tz::Tz;

use crate::config::{end_of_day, start_of_day};
use crate::error::{DateError, Result};
use crate::range::CalendarRange;

// ── Key types ───────────────────────────────────────────────────────────────

/// The unit a key names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateKeyUnit {
    Day,
    Week,
    Month,
    Year,
}

impl DateKeyUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            DateKeyUnit::Day => "days",
            DateKeyUnit::Week => "weeks",
            DateKeyUnit::Month => "months",
            DateKeyUnit::Year => "years",
        }
    }
}

impl fmt::Display for DateKeyUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DateKeyUnit {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" | "days" => Ok(DateKeyUnit::Day),
            "week" | "weeks" => Ok(DateKeyUnit::Week),
            "month" | "months" => Ok(DateKeyUnit::Month),
            "year" | "years" => Ok(DateKeyUnit::Year),
            _ => Err(DateError::InvalidKeyUnit(s.to_string())),
        }
    }
}

/// A parsed calendar key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateKey {
    Day(NaiveDate),
    Week { year: i32, week: u32 },
    Month { year: i32, month: u32 },
    Year(i32),
}

impl DateKey {
    /// The key of `unit` that contains `date`.
    pub fn containing(date: NaiveDate, unit: DateKeyUnit) -> DateKey {
        match unit {
            DateKeyUnit::Day => DateKey::Day(date),
            DateKeyUnit::Week => {
                let (year, week) = sunday_week(date);
                DateKey::Week { year, week }
            }
            DateKeyUnit::Month => DateKey::Month {
                year: date.year(),
                month: date.month(),
            },
            DateKeyUnit::Year => DateKey::Year(date.year()),
        }
    }

    pub fn unit(&self) -> DateKeyUnit {
        match self {
            DateKey::Day(_) => DateKeyUnit::Day,
            DateKey::Week { .. } => DateKeyUnit::Week,
            DateKey::Month { .. } => DateKeyUnit::Month,
            DateKey::Year(_) => DateKeyUnit::Year,
        }
    }

    /// First calendar day covered by the key.
    pub fn first_day(&self) -> Option<NaiveDate> {
        match *self {
            DateKey::Day(date) => Some(date),
            DateKey::Week { year, week } => first_sunday(year)?.checked_add_days(Days::new(
                u64::from(week.checked_sub(1)?) * 7,
            )),
            DateKey::Month { year, month } => NaiveDate::from_ymd_opt(year, month, 1),
            DateKey::Year(year) => NaiveDate::from_ymd_opt(year, 1, 1),
        }
    }

    /// Last calendar day covered by the key.
    pub fn last_day(&self) -> Option<NaiveDate> {
        let first = self.first_day()?;
        match self {
            DateKey::Day(_) => Some(first),
            DateKey::Week { .. } => first.checked_add_days(Days::new(6)),
            DateKey::Month { .. } => first.checked_add_months(Months::new(1))?.pred_opt(),
            DateKey::Year(year) => NaiveDate::from_ymd_opt(*year, 12, 31),
        }
    }

    /// Expand the key to a range in `tz`, from midnight on its first day to
    /// 23:59:59.999999999 on its last.
    ///
    /// # Errors
    ///
    /// Returns [`DateError::InvalidDateKeyFormat`] when the key names a day
    /// chrono cannot represent. A day whose midnight falls in a DST gap
    /// starts when the clocks jump.
    pub fn to_range(&self, tz: Tz) -> Result<CalendarRange> {
        let (first, last) = self
            .first_day()
            .zip(self.last_day())
            .ok_or_else(|| DateError::InvalidDateKeyFormat(format!("'{self}' is out of range")))?;
        CalendarRange::new(start_of_day(first, tz)?, end_of_day(last, tz)?)
    }

    /// The key immediately after this one.
    fn following(&self) -> Option<DateKey> {
        let next_day = self.last_day()?.succ_opt()?;
        Some(DateKey::containing(next_day, self.unit()))
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateKey::Day(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            DateKey::Week { year, week } => write!(f, "{year:04}-W{week:02}"),
            DateKey::Month { year, month } => write!(f, "{year:04}-{month:02}"),
            DateKey::Year(year) => write!(f, "{year:04}"),
        }
    }
}

impl FromStr for DateKey {
    type Err = DateError;

    /// Dispatch on shape: `-W` means a week, two hyphens a day, one hyphen a
    /// month, none a year.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = |reason: &str| DateError::InvalidDateKeyFormat(format!("'{s}': {reason}"));

        if let Some((year, week)) = s.split_once("-W") {
            let year = parse_fixed(year, 4).ok_or_else(|| invalid("expected a 4-digit year"))?;
            let week = parse_fixed(week, 2).ok_or_else(|| invalid("expected a 2-digit week"))?;
            let key = DateKey::Week {
                year,
                week: week as u32,
            };
            // Week 53 only exists in some years.
            return match key.first_day() {
                Some(first) if week >= 1 && first.year() == year => Ok(key),
                _ => Err(invalid("week is out of range for the year")),
            };
        }

        let parts: Vec<&str> = s.split('-').collect();
        match parts.as_slice() {
            [year, month, day] => {
                let year = parse_fixed(year, 4).ok_or_else(|| invalid("expected a 4-digit year"))?;
                let month = parse_fixed(month, 2).ok_or_else(|| invalid("expected a 2-digit month"))?;
                let day = parse_fixed(day, 2).ok_or_else(|| invalid("expected a 2-digit day"))?;
                NaiveDate::from_ymd_opt(year, month as u32, day as u32)
                    .map(DateKey::Day)
                    .ok_or_else(|| invalid("no such calendar day"))
            }
            [year, month] => {
                let year = parse_fixed(year, 4).ok_or_else(|| invalid("expected a 4-digit year"))?;
                let month = parse_fixed(month, 2).ok_or_else(|| invalid("expected a 2-digit month"))?;
                if !(1..=12).contains(&month) {
                    return Err(invalid("month must be between 01 and 12"));
                }
                Ok(DateKey::Month {
                    year,
                    month: month as u32,
                })
            }
            [year] => parse_fixed(year, 4)
                .map(DateKey::Year)
                .ok_or_else(|| invalid("expected a 4-digit year")),
            _ => Err(invalid("too many '-' separators")),
        }
    }
}

// ── Week arithmetic ─────────────────────────────────────────────────────────

/// Parse exactly `width` ASCII digits.
fn parse_fixed(s: &str, width: usize) -> Option<i32> {
    if s.len() != width || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Zero-based day of the year on which the year's first Sunday falls.
fn first_sunday_ordinal0(jan1_from_sunday: u32) -> u32 {
    (7 - jan1_from_sunday) % 7
}

fn first_sunday(year: i32) -> Option<NaiveDate> {
    let jan1 = NaiveDate::from_ymd_opt(year, 1, 1)?;
    let offset = first_sunday_ordinal0(jan1.weekday().num_days_from_sunday());
    jan1.checked_add_days(Days::new(u64::from(offset)))
}

/// The (year, week) a date belongs to under the Sunday-start convention.
fn sunday_week(date: NaiveDate) -> (i32, u32) {
    let ordinal0 = date.ordinal0();
    let weekday = date.weekday().num_days_from_sunday();
    let jan1 = (weekday + 7 - ordinal0 % 7) % 7;
    let first = first_sunday_ordinal0(jan1);
    if ordinal0 >= first {
        return (date.year(), (ordinal0 - first) / 7 + 1);
    }

    let prev_year = date.year() - 1;
    let prev_len = if is_leap_year(prev_year) { 366 } else { 365 };
    let prev_jan1 = (jan1 + 7 - prev_len % 7) % 7;
    let prev_first = first_sunday_ordinal0(prev_jan1);
    (prev_year, (ordinal0 + prev_len - prev_first) / 7 + 1)
}

// ── Key generation ──────────────────────────────────────────────────────────

/// Keys of `unit` for every calendar unit touched by `[start, end]`, in
/// order. Dates are taken in each bound's own zone.
pub fn date_keys_between<Z: TimeZone>(
    start: &DateTime<Z>,
    end: &DateTime<Z>,
    unit: DateKeyUnit,
) -> Result<Vec<DateKey>> {
    let last = end.date_naive();
    let mut keys = Vec::new();
    let mut key = DateKey::containing(start.date_naive(), unit);

    loop {
        let first = key
            .first_day()
            .ok_or_else(|| DateError::OutOfRange(format!("date key {key}")))?;
        if first > last {
            break;
        }
        keys.push(key);
        match key.following() {
            Some(next) => key = next,
            None => break,
        }
    }

    Ok(keys)
}

/// String form of [`date_keys_between`], with the unit given by name.
///
/// # Arguments
///
/// * `start` — First instant of the span
/// * `end` — Last instant of the span, inclusive
/// * `unit` — `"days"`, `"weeks"`, `"months"` or `"years"`
///
/// # Errors
///
/// Returns [`DateError::InvalidKeyUnit`] when `unit` is not one of `days`,
/// `weeks`, `months` or `years` (singular forms are accepted too).
///
/// # Examples
///
/// ```
/// use chrono::TimeZone;
/// use marketdata_dates::generate_date_keys;
///
/// let start = chrono_tz::UTC.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap();
/// let end = chrono_tz::UTC.with_ymd_and_hms(2022, 1, 15, 0, 0, 0).unwrap();
/// let keys = generate_date_keys(&start, &end, "weeks").unwrap();
/// assert_eq!(keys, ["2021-W52", "2022-W01", "2022-W02"]);
/// ```
pub fn generate_date_keys<Z: TimeZone>(
    start: &DateTime<Z>,
    end: &DateTime<Z>,
    unit: &str,
) -> Result<Vec<String>> {
    let unit: DateKeyUnit = unit.parse()?;
    Ok(date_keys_between(start, end, unit)?
        .iter()
        .map(DateKey::to_string)
        .collect())
}

/// Whether `key` is a well-formed calendar key naming a real calendar unit.
pub fn is_valid_date_key(key: &str) -> bool {
    key.parse::<DateKey>().is_ok()
}

/// Expand a calendar key to its range in `tz`.
///
/// # Examples
///
/// ```
/// use marketdata_dates::keys::date_key_to_range;
///
/// let week = date_key_to_range("2022-W01", chrono_tz::UTC).unwrap();
/// assert_eq!(week.start().to_rfc3339(), "2022-01-02T00:00:00+00:00");
/// ```
pub fn date_key_to_range(key: &str, tz: Tz) -> Result<CalendarRange> {
    key.parse::<DateKey>()?.to_range(tz)
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Timelike, Utc};
    use chrono_tz::America::New_York;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_each_shape() {
        assert_eq!("2022-03-15".parse::<DateKey>().unwrap(), DateKey::Day(date(2022, 3, 15)));
        assert_eq!(
            "2022-W01".parse::<DateKey>().unwrap(),
            DateKey::Week { year: 2022, week: 1 }
        );
        assert_eq!(
            "2022-03".parse::<DateKey>().unwrap(),
            DateKey::Month { year: 2022, month: 3 }
        );
        assert_eq!("2022".parse::<DateKey>().unwrap(), DateKey::Year(2022));
    }

    #[test]
    fn test_display_matches_parse() {
        for key in ["2022-03-15", "2022-W01", "2021-W52", "2022-03", "2022"] {
            assert_eq!(key.parse::<DateKey>().unwrap().to_string(), key);
        }
    }

    #[test]
    fn test_invalid_keys() {
        for key in [
            "", "22", "2022-13", "2022-00", "2022-02-30", "2022-1-5", "2022-W00", "2022-W54",
            "2022-Wxx", "2022-01-01-01", "abcd", "2022-03-15T00",
        ] {
            assert!(!is_valid_date_key(key), "{key} should be rejected");
            assert!(matches!(
                key.parse::<DateKey>(),
                Err(DateError::InvalidDateKeyFormat(_))
            ));
        }
    }

    #[test]
    fn test_week_53_only_when_it_fits() {
        // 2023 starts on a Sunday, so it has 53 weeks; 2022 has 52.
        assert!(is_valid_date_key("2023-W53"));
        assert!(!is_valid_date_key("2022-W53"));
        assert!(is_valid_date_key("2022-W52"));
    }

    #[test]
    fn test_week_one_starts_first_sunday() {
        let range = date_key_to_range("2022-W01", New_York).unwrap();
        assert_eq!(range.start().date_naive(), date(2022, 1, 2));
        assert_eq!(range.end().date_naive(), date(2022, 1, 8));
        assert_eq!(range.start().hour(), 0);
        assert_eq!(range.end().hour(), 23);
        assert_eq!(range.end().nanosecond(), 999_999_999);
    }

    #[test]
    fn test_containing_week_before_first_sunday() {
        // Saturday 2022-01-01 precedes 2022's first Sunday.
        assert_eq!(
            DateKey::containing(date(2022, 1, 1), DateKeyUnit::Week),
            DateKey::Week { year: 2021, week: 52 }
        );
        assert_eq!(
            DateKey::containing(date(2023, 1, 1), DateKeyUnit::Week),
            DateKey::Week { year: 2023, week: 1 }
        );
        assert_eq!(
            DateKey::containing(date(2023, 12, 31), DateKeyUnit::Week),
            DateKey::Week { year: 2023, week: 53 }
        );
    }

    #[test]
    fn test_containing_week_matches_expansion() {
        let mut day = date(2019, 12, 1);
        while day < date(2025, 2, 1) {
            let key = DateKey::containing(day, DateKeyUnit::Week);
            let first = key.first_day().unwrap();
            let last = key.last_day().unwrap();
            assert!(first <= day && day <= last, "{day} not inside {key}");
            day = day.succ_opt().unwrap();
        }
    }

    #[test]
    fn test_day_key_on_midnight_gap() {
        let santiago = chrono_tz::America::Santiago;
        let day = date_key_to_range("2022-09-11", santiago).unwrap();
        assert_eq!(day.start().to_rfc3339(), "2022-09-11T01:00:00-03:00");
        assert_eq!(day.end().to_rfc3339(), "2022-09-11T23:59:59.999999999-03:00");

        // The week holding that day starts the same Sunday.
        let week = date_key_to_range("2022-W37", santiago).unwrap();
        assert_eq!(week.start(), day.start());
    }

    #[test]
    fn test_month_and_year_ranges() {
        let feb = date_key_to_range("2024-02", New_York).unwrap();
        assert_eq!(feb.start().date_naive(), date(2024, 2, 1));
        assert_eq!(feb.end().date_naive(), date(2024, 2, 29));

        let year = date_key_to_range("2022", New_York).unwrap();
        assert_eq!(year.start().date_naive(), date(2022, 1, 1));
        assert_eq!(year.end().date_naive(), date(2022, 12, 31));
    }

    #[test]
    fn test_generate_daily_keys() {
        let start = Utc.with_ymd_and_hms(2022, 1, 30, 12, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2022, 2, 2, 0, 0, 0).unwrap();
        assert_eq!(
            generate_date_keys(&start, &end, "days").unwrap(),
            vec!["2022-01-30", "2022-01-31", "2022-02-01", "2022-02-02"]
        );
    }

    #[test]
    fn test_generate_weekly_keys() {
        let start = New_York.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap();
        let end = New_York.with_ymd_and_hms(2022, 1, 15, 0, 0, 0).unwrap();
        assert_eq!(
            generate_date_keys(&start, &end, "weeks").unwrap(),
            vec!["2021-W52", "2022-W01", "2022-W02"]
        );
    }

    #[test]
    fn test_generate_monthly_keys_from_month_end() {
        let start = Utc.with_ymd_and_hms(2022, 1, 31, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2022, 4, 1, 0, 0, 0).unwrap();
        assert_eq!(
            generate_date_keys(&start, &end, "month").unwrap(),
            vec!["2022-01", "2022-02", "2022-03", "2022-04"]
        );
    }

    #[test]
    fn test_generate_yearly_keys() {
        let start = Utc.with_ymd_and_hms(2020, 6, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(
            generate_date_keys(&start, &end, "years").unwrap(),
            vec!["2020", "2021", "2022"]
        );
    }

    #[test]
    fn test_generate_rejects_unknown_unit() {
        let now = Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap();
        assert!(matches!(
            generate_date_keys(&now, &now, "fortnights"),
            Err(DateError::InvalidKeyUnit(_))
        ));
    }

    #[test]
    fn test_key_unit_from_str() {
        assert_eq!("Days".parse::<DateKeyUnit>().unwrap(), DateKeyUnit::Day);
        assert_eq!("week".parse::<DateKeyUnit>().unwrap(), DateKeyUnit::Week);
        assert_eq!(DateKeyUnit::Month.to_string(), "months");
    }
}
