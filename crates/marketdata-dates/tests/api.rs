use chrono::{TimeZone, Timelike, Utc};
use chrono_tz::America::New_York;
use chrono_tz::UTC;

use marketdata_dates::{
    combine_date_ranges, date_key_to_range, earliest, generate_date_keys, is_valid_date_key,
    latest, new_calendar_range, resolve, time_string_in, to_day_string, CalendarRange, DateError,
    DateInput, Precision, Resolver,
};

#[test]
fn test_free_functions_accept_explicit_zone() {
    let moment = resolve("2022-W01", Some(UTC));
    // Calendar keys are not date strings.
    assert!(matches!(moment, Err(DateError::UnparseableDateString(_))));

    let moment = resolve("March 4, 2021", Some(New_York)).unwrap();
    assert_eq!(moment.instant.to_rfc3339(), "2021-03-04T00:00:00-05:00");
    assert_eq!(moment.precision, Precision::Day);

    assert_eq!(to_day_string(1_617_181_723_000_i64, Some(UTC)).unwrap(), "2021-03-31");
}

#[test]
fn test_range_from_mixed_inputs() {
    let range = new_calendar_range("2024-01-01", 45_322, Some(UTC)).unwrap();
    assert_eq!(range.end().to_rfc3339(), "2024-01-31T00:00:00+00:00");
    assert_eq!(
        range.generate_date_keys("weeks").unwrap(),
        vec!["2023-W53", "2024-W01", "2024-W02", "2024-W03", "2024-W04"]
    );
}

#[test]
fn test_weekly_key_round_trip() {
    let week = date_key_to_range("2022-W01", Some(New_York)).unwrap();
    assert_eq!(week.start().to_rfc3339(), "2022-01-02T00:00:00-05:00");
    assert_eq!(week.end().to_rfc3339(), "2022-01-08T23:59:59.999999999-05:00");
    assert_eq!(week.generate_date_keys("weeks").unwrap(), vec!["2022-W01"]);
    assert_eq!(week.generate_date_keys("days").unwrap().len(), 7);
}

#[test]
fn test_midnight_gap_day_still_has_a_range() {
    let santiago = chrono_tz::America::Santiago;
    let key = date_key_to_range("2022-09-11", Some(santiago)).unwrap();
    let moment = resolve("2022-09-11", Some(santiago)).unwrap();
    assert_eq!(&moment.instant, key.start());
    assert_eq!(moment.precision, Precision::Day);
    assert_eq!(key.duration().num_hours(), 22);
}

#[test]
fn test_key_validation() {
    assert!(is_valid_date_key("2024-02-29"));
    assert!(!is_valid_date_key("2023-02-29"));
    assert!(!is_valid_date_key("2024-13"));
    assert!(matches!(
        date_key_to_range("2024-13", Some(UTC)),
        Err(DateError::InvalidDateKeyFormat(_))
    ));
}

#[test]
fn test_generate_keys_from_instants() {
    let start = UTC.with_ymd_and_hms(2021, 11, 15, 0, 0, 0).unwrap();
    let end = UTC.with_ymd_and_hms(2022, 2, 1, 0, 0, 0).unwrap();
    assert_eq!(
        generate_date_keys(&start, &end, "months").unwrap(),
        vec!["2021-11", "2021-12", "2022-01", "2022-02"]
    );
    assert_eq!(generate_date_keys(&start, &end, "years").unwrap(), vec!["2021", "2022"]);
}

#[test]
fn test_earliest_latest_and_combine() {
    let a = new_calendar_range("2024-01-10T00:00:00Z", "2024-01-12T00:00:00Z", Some(UTC)).unwrap();
    let b = new_calendar_range("2024-01-01T00:00:00Z", "2024-01-03T00:00:00Z", Some(UTC)).unwrap();

    let first = earliest([&a, &b]).unwrap();
    let last = latest([&a, &b]).unwrap();
    assert_eq!(first.with_timezone(&Utc), b.start().with_timezone(&Utc));
    assert_eq!(last.with_timezone(&Utc), a.end().with_timezone(&Utc));

    let combined = combine_date_ranges([a, b]).unwrap();
    assert_eq!(combined.duration().num_days(), 11);

    let nothing: [DateInput; 0] = [];
    assert_eq!(earliest(nothing), Err(DateError::EmptyInputSet));
}

#[test]
fn test_range_serializes_bounds() {
    let range = CalendarRange::from_date_key("2024-03", New_York).unwrap();
    let json = serde_json::to_value(&range).unwrap();
    assert_eq!(json["start"], "2024-03-01T00:00:00-05:00");
    assert_eq!(json["end"], "2024-03-31T23:59:59.999999999-04:00");
}

#[test]
fn test_parsed_moment_serializes_precision() {
    let moment = Resolver::new(chrono_tz::Asia::Tokyo).resolve(43101.5).unwrap();
    let json = serde_json::to_value(moment).unwrap();
    assert_eq!(json["precision"], "second");
    assert_eq!(json["instant"], "2018-01-01T12:00:00+09:00");
}

#[test]
fn test_display_of_resolved_values() {
    let resolver = Resolver::new(New_York);
    let midnight = resolver.to_time("2024-01-15").unwrap();
    assert_eq!(time_string_in(&midnight, &New_York), "2024-01-15");

    let later = resolver.to_time("2024-01-15 09:30:00").unwrap();
    assert_eq!(later.second(), 0);
    assert_eq!(time_string_in(&later, &New_York), "2024-01-15 09:30:00 -05:00");
}
