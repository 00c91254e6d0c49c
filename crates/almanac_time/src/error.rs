//! Error types for instant and Julian-day conversions.

use thiserror::Error;

/// Errors from converting between instants and Julian days.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum TimeError {
    /// The instant lies outside the supported calendar range.
    #[error("instant {millis} ms is outside the supported range")]
    InstantOutOfRange { millis: i64 },
    /// The Julian day cannot be represented as a millisecond instant.
    #[error("Julian day {jd} cannot be represented as an instant")]
    JulianDayOutOfRange { jd: i64 },
}
