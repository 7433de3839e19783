//! Error types for date resolution operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateError {
    #[error("Nil input: a date value is required")]
    NilInput,

    #[error("Unsupported input type: {0}")]
    UnsupportedType(String),

    #[error("Unparseable date string: '{0}'")]
    UnparseableDateString(String),

    #[error("Ambiguous timestamp magnitude: {value} has {digits} digits")]
    AmbiguousTimestampMagnitude { value: String, digits: u32 },

    #[error("Invalid interval format: '{0}'")]
    InvalidIntervalFormat(String),

    #[error("Invalid date key format: {0}")]
    InvalidDateKeyFormat(String),

    #[error("Invalid date key unit: '{0}'")]
    InvalidKeyUnit(String),

    #[error("Empty input set: no dates were provided")]
    EmptyInputSet,

    #[error("Inverted range: start {start} is after end {end}")]
    InvertedRange { start: String, end: String },

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Value out of range: {0}")]
    OutOfRange(String),

    #[error("Nonexistent local time: {0}")]
    NonexistentLocalTime(String),
}

pub type Result<T> = std::result::Result<T, DateError>;
