//! Error types for the calendar engine.

use almanac_time::TimeError;
use thiserror::Error;

use crate::field::Field;

/// Errors surfaced by calendar operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum CalendarError {
    /// A field is out of range in non-lenient mode.
    #[error("field {field} value {value} is outside [{min}, {max}]")]
    Validation {
        field: Field,
        value: i32,
        min: i32,
        max: i32,
    },
    /// Unknown calendar identifier, bad week rule, or invalid option.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// Instant or field arithmetic left the representable range.
    #[error("arithmetic overflow in {operation}")]
    ArithmeticOverflow { operation: &'static str },
    /// The operation is not defined for this field.
    #[error("{operation} is not supported for field {field}")]
    UnsupportedField {
        field: Field,
        operation: &'static str,
    },
    /// Non-lenient mode: the wall time falls in a zone-offset gap.
    #[error("wall time {wall_millis} does not exist in the zone")]
    NonexistentWallTime { wall_millis: i64 },
    /// An astronomical search needed by a lunisolar calendar failed.
    #[error("ephemeris search failed: {0}")]
    Ephemeris(&'static str),
    /// Instant/Julian-day conversion failure.
    #[error(transparent)]
    Time(#[from] TimeError),
}

impl CalendarError {
    pub(crate) fn overflow(operation: &'static str) -> Self {
        Self::ArithmeticOverflow { operation }
    }
}
