//! The closed set of values the resolver accepts.
//!
//! Callers rarely build a [`DateInput`] by hand; the `From` impls let any
//! integer, float, string, chrono instant or [`CalendarRange`] be passed
//! straight to [`crate::Resolver::resolve`] and friends.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};

use crate::range::CalendarRange;

/// A zero-argument function producing an instant, invoked at resolution time.
pub type InstantProducer = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

#[derive(Clone)]
pub enum DateInput {
    /// An absent value. Always fails with `NilInput`.
    Nil,
    /// Booleans are never dates. Always fails with `UnsupportedType`.
    Boolean(bool),
    /// Classified by digit count: serial date or Unix time.
    Integer(i64),
    /// A spreadsheet serial date with an optional fractional day.
    Float(f64),
    /// A formatted date string, a numeric string, or a keyword.
    Text(String),
    Instant(DateTime<Utc>),
    /// Resolves to the range's start.
    Range(CalendarRange),
    Producer(InstantProducer),
}

impl DateInput {
    /// Wrap a closure that yields an instant.
    pub fn producer<F>(f: F) -> Self
    where
        F: Fn() -> DateTime<Utc> + Send + Sync + 'static,
    {
        DateInput::Producer(Arc::new(f))
    }

    /// Short name of the variant, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            DateInput::Nil => "nil",
            DateInput::Boolean(_) => "boolean",
            DateInput::Integer(_) => "integer",
            DateInput::Float(_) => "float",
            DateInput::Text(_) => "text",
            DateInput::Instant(_) => "instant",
            DateInput::Range(_) => "range",
            DateInput::Producer(_) => "producer",
        }
    }
}

impl fmt::Debug for DateInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateInput::Nil => f.write_str("Nil"),
            DateInput::Boolean(b) => f.debug_tuple("Boolean").field(b).finish(),
            DateInput::Integer(i) => f.debug_tuple("Integer").field(i).finish(),
            DateInput::Float(x) => f.debug_tuple("Float").field(x).finish(),
            DateInput::Text(s) => f.debug_tuple("Text").field(s).finish(),
            DateInput::Instant(dt) => f.debug_tuple("Instant").field(dt).finish(),
            DateInput::Range(r) => f.debug_tuple("Range").field(r).finish(),
            DateInput::Producer(_) => f.write_str("Producer(..)"),
        }
    }
}

macro_rules! impl_from_integer {
    ($($t:ty),*) => {
        $(
            impl From<$t> for DateInput {
                fn from(value: $t) -> Self {
                    DateInput::Integer(i64::from(value))
                }
            }
        )*
    };
}

impl_from_integer!(i8, i16, i32, i64, u8, u16, u32);

impl From<f64> for DateInput {
    fn from(value: f64) -> Self {
        DateInput::Float(value)
    }
}

impl From<f32> for DateInput {
    fn from(value: f32) -> Self {
        DateInput::Float(f64::from(value))
    }
}

impl From<bool> for DateInput {
    fn from(value: bool) -> Self {
        DateInput::Boolean(value)
    }
}

impl From<&str> for DateInput {
    fn from(value: &str) -> Self {
        DateInput::Text(value.to_string())
    }
}

impl From<String> for DateInput {
    fn from(value: String) -> Self {
        DateInput::Text(value)
    }
}

impl From<&String> for DateInput {
    fn from(value: &String) -> Self {
        DateInput::Text(value.clone())
    }
}

impl<Z: TimeZone> From<DateTime<Z>> for DateInput {
    fn from(value: DateTime<Z>) -> Self {
        DateInput::Instant(value.with_timezone(&Utc))
    }
}

impl<Z: TimeZone> From<&DateTime<Z>> for DateInput {
    fn from(value: &DateTime<Z>) -> Self {
        DateInput::Instant(value.with_timezone(&Utc))
    }
}

impl From<CalendarRange> for DateInput {
    fn from(value: CalendarRange) -> Self {
        DateInput::Range(value)
    }
}

impl From<&CalendarRange> for DateInput {
    fn from(value: &CalendarRange) -> Self {
        DateInput::Range(value.clone())
    }
}

impl<T: Into<DateInput>> From<Option<T>> for DateInput {
    fn from(value: Option<T>) -> Self {
        value.map_or(DateInput::Nil, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::Asia::Tokyo;

    #[test]
    fn test_integer_widths_widen() {
        assert!(matches!(DateInput::from(36540_i32), DateInput::Integer(36540)));
        assert!(matches!(DateInput::from(7_u8), DateInput::Integer(7)));
        assert!(matches!(
            DateInput::from(4_000_000_000_u32),
            DateInput::Integer(4_000_000_000)
        ));
    }

    #[test]
    fn test_text_and_floats() {
        assert!(matches!(DateInput::from("today"), DateInput::Text(ref s) if s == "today"));
        assert!(matches!(DateInput::from(0.5_f32), DateInput::Float(x) if x == 0.5));
    }

    #[test]
    fn test_option_none_is_nil() {
        let none: Option<i64> = None;
        assert!(matches!(DateInput::from(none), DateInput::Nil));
        assert!(matches!(DateInput::from(Some("now")), DateInput::Text(_)));
    }

    #[test]
    fn test_zoned_instant_normalizes_to_utc() {
        let tokyo = Tokyo.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        match DateInput::from(tokyo) {
            DateInput::Instant(dt) => {
                assert_eq!(dt, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
            }
            other => panic!("expected instant, got {other:?}"),
        }
    }

    #[test]
    fn test_producer_debug_and_kind() {
        let input = DateInput::producer(Utc::now);
        assert_eq!(format!("{input:?}"), "Producer(..)");
        assert_eq!(input.kind(), "producer");
        assert_eq!(DateInput::Nil.kind(), "nil");
    }
}
