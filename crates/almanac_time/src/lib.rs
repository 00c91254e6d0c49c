//! Instant ↔ Julian-day conversion for the almanac calendar engine.
//!
//! This crate provides:
//! - Exact millisecond ↔ Julian day conversion over the full `i64` range
//! - Proleptic Gregorian and Julian date arithmetic
//! - A hybrid calendar with a configurable Gregorian cutover

pub mod cutover;
pub mod error;
pub mod julian;

pub use cutover::{DEFAULT_CUTOVER_MILLIS, GregorianCutover};
pub use error::TimeError;
pub use julian::{
    DAY_MS, EPOCH_JULIAN_DATE, EPOCH_JULIAN_DAY, HOUR_MS, JULIAN_1_CE, JulianDay, MAX_JULIAN,
    MAX_MILLIS, MIN_JULIAN, MIN_MILLIS, MINUTE_MS, SECOND_MS, WEEK_MS, YearMonthDay, day_of_week,
    days_before_month, floor_div, floor_div_rem, gregorian_to_jd, is_gregorian_leap_year,
    is_julian_leap_year, jd_to_gregorian, jd_to_julian, julian_date_to_millis, julian_day_start_millis,
    julian_day_to_millis, julian_to_jd, millis_to_julian_date, millis_to_julian_day, month_length,
};

/// Check that an instant lies in the calendar-supported range.
pub fn check_instant(millis: i64) -> Result<i64, TimeError> {
    if (MIN_MILLIS..=MAX_MILLIS).contains(&millis) {
        Ok(millis)
    } else {
        Err(TimeError::InstantOutOfRange { millis })
    }
}

/// Clamp an instant into the calendar-supported range.
pub fn pin_instant(millis: i64) -> i64 {
    millis.clamp(MIN_MILLIS, MAX_MILLIS)
}
