//! Julian Day Number arithmetic.
//!
//! The integer Julian day used here is the civil-day numbering in which day
//! 2440588 starts at 1970-01-01T00:00 in the zone of interest. Julian day 0
//! is the day beginning at noon on 1 January 4713 BCE (proleptic Julian),
//! shifted to start at the preceding midnight so that days and instants line
//! up on millisecond boundaries.
//!
//! All instant arithmetic goes through `i128` intermediates so that every
//! `i64` millisecond value converts exactly in both directions.

use crate::error::TimeError;

/// Milliseconds per second.
pub const SECOND_MS: i64 = 1_000;
/// Milliseconds per minute.
pub const MINUTE_MS: i64 = 60 * SECOND_MS;
/// Milliseconds per hour.
pub const HOUR_MS: i64 = 60 * MINUTE_MS;
/// Milliseconds per day.
pub const DAY_MS: i64 = 24 * HOUR_MS;
/// Milliseconds per week.
pub const WEEK_MS: i64 = 7 * DAY_MS;

/// Julian day of 1970-01-01 (the millisecond epoch).
pub const EPOCH_JULIAN_DAY: i64 = 2_440_588;
/// Julian day of 0001-01-01 in the proleptic Gregorian calendar.
pub const JULIAN_1_CE: i64 = 1_721_426;
/// Astronomical Julian date of the millisecond epoch (midnight, hence `.5`).
pub const EPOCH_JULIAN_DATE: f64 = 2_440_587.5;

/// Smallest Julian day a calendar will resolve to.
pub const MIN_JULIAN: i64 = -0x7F00_0000;
/// Largest Julian day a calendar will resolve to.
pub const MAX_JULIAN: i64 = 0x7F00_0000;
/// Earliest supported instant, `(MIN_JULIAN - EPOCH_JULIAN_DAY) * DAY_MS`.
pub const MIN_MILLIS: i64 = -184_303_902_528_000_000;
/// Latest supported instant, `(MAX_JULIAN - EPOCH_JULIAN_DAY) * DAY_MS`.
pub const MAX_MILLIS: i64 = 183_882_168_921_600_000;

const MONTH_LENGTH: [[i32; 12]; 2] = [
    [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31],
    [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31],
];

const DAYS_BEFORE: [[i32; 12]; 2] = [
    [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334],
    [0, 31, 60, 91, 121, 152, 182, 213, 244, 274, 305, 335],
];

/// A Julian day number paired with the milliseconds elapsed in that day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JulianDay {
    pub day: i64,
    pub millis_in_day: i32,
}

impl JulianDay {
    /// Real-valued astronomical Julian date (day boundary at noon).
    pub fn as_julian_date(self) -> f64 {
        self.day as f64 - 0.5 + self.millis_in_day as f64 / DAY_MS as f64
    }
}

/// A proleptic calendar date split into its parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearMonthDay {
    pub year: i32,
    /// Zero-based month.
    pub month: i32,
    /// One-based day of month.
    pub day: i32,
    /// One-based day of year.
    pub day_of_year: i32,
    pub leap_year: bool,
}

/// Floor division for signed integers.
pub fn floor_div(numerator: i64, denominator: i64) -> i64 {
    let q = numerator / denominator;
    if numerator % denominator != 0 && (numerator < 0) != (denominator < 0) {
        q - 1
    } else {
        q
    }
}

/// Floor division by a positive denominator, returning the non-negative
/// remainder as well. Never overflows.
pub fn floor_div_rem(numerator: i64, denominator: i64) -> (i64, i64) {
    (numerator.div_euclid(denominator), numerator.rem_euclid(denominator))
}

/// Split an instant into its Julian day and the milliseconds within it.
///
/// Exact for every `i64` input.
pub fn millis_to_julian_day(millis: i64) -> JulianDay {
    let (days, ms) = floor_div_rem(millis, DAY_MS);
    JulianDay {
        day: days + EPOCH_JULIAN_DAY,
        millis_in_day: ms as i32,
    }
}

/// Combine a Julian day and milliseconds-in-day into an instant.
///
/// `millis_in_day` may be negative or exceed a day; the excess carries.
pub fn julian_day_to_millis(jd: i64, millis_in_day: i64) -> Result<i64, TimeError> {
    let wide = (i128::from(jd) - i128::from(EPOCH_JULIAN_DAY)) * i128::from(DAY_MS)
        + i128::from(millis_in_day);
    i64::try_from(wide).map_err(|_| TimeError::JulianDayOutOfRange { jd })
}

/// Start of a Julian day as an instant.
pub fn julian_day_start_millis(jd: i64) -> Result<i64, TimeError> {
    julian_day_to_millis(jd, 0)
}

/// Astronomical Julian date (fractional, noon-based) for an instant.
pub fn millis_to_julian_date(millis: i64) -> f64 {
    millis as f64 / DAY_MS as f64 + EPOCH_JULIAN_DATE
}

/// Instant for an astronomical Julian date, rounded toward negative infinity.
pub fn julian_date_to_millis(jd: f64) -> f64 {
    (jd - EPOCH_JULIAN_DATE) * DAY_MS as f64
}

/// Day of week for a Julian day: 1 = Sunday … 7 = Saturday.
pub fn day_of_week(jd: i64) -> i32 {
    let dow = (jd + 2).rem_euclid(7) as i32;
    if dow == 0 { 7 } else { dow }
}

/// Proleptic Gregorian leap-year rule.
pub fn is_gregorian_leap_year(year: i64) -> bool {
    year.rem_euclid(4) == 0 && (year.rem_euclid(100) != 0 || year.rem_euclid(400) == 0)
}

/// Proleptic Julian leap-year rule.
pub fn is_julian_leap_year(year: i64) -> bool {
    year.rem_euclid(4) == 0
}

/// Days in a zero-based month under the given leap flag.
pub fn month_length(month: i32, leap_year: bool) -> i32 {
    MONTH_LENGTH[usize::from(leap_year)][month.rem_euclid(12) as usize]
}

/// Days preceding a zero-based month under the given leap flag.
pub fn days_before_month(month: i32, leap_year: bool) -> i32 {
    DAYS_BEFORE[usize::from(leap_year)][month.rem_euclid(12) as usize]
}

/// Julian day of day 0 of the given year (the day before 1 January),
/// proleptic Gregorian.
pub fn gregorian_year_start(year: i64) -> i64 {
    let y = year - 1;
    365 * y + floor_div(y, 4) + floor_div(y, 400) - floor_div(y, 100) + JULIAN_1_CE - 1
}

/// Julian day of day 0 of the given year, proleptic Julian.
pub fn julian_year_start(year: i64) -> i64 {
    let y = year - 1;
    365 * y + floor_div(y, 4) + JULIAN_1_CE - 3
}

/// Julian day of a proleptic Gregorian date. Out-of-range months carry.
pub fn gregorian_to_jd(year: i64, month: i64, day: i64) -> i64 {
    let (carry, m) = floor_div_rem(month, 12);
    let y = year + carry;
    gregorian_year_start(y) + i64::from(days_before_month(m as i32, is_gregorian_leap_year(y))) + day
}

/// Julian day of a proleptic Julian-calendar date. Out-of-range months carry.
pub fn julian_to_jd(year: i64, month: i64, day: i64) -> i64 {
    let (carry, m) = floor_div_rem(month, 12);
    let y = year + carry;
    julian_year_start(y) + i64::from(days_before_month(m as i32, is_julian_leap_year(y))) + day
}

fn split_day_of_year(year: i64, day_of_year: i64, leap: bool) -> YearMonthDay {
    let correction = if day_of_year >= if leap { 60 } else { 59 } {
        if leap { 1 } else { 2 }
    } else {
        0
    };
    let month = ((12 * (day_of_year + correction) + 6) / 367) as i32;
    let day = day_of_year as i32 - days_before_month(month, leap) + 1;
    YearMonthDay {
        year: year.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32,
        month,
        day,
        day_of_year: day_of_year as i32 + 1,
        leap_year: leap,
    }
}

/// Proleptic Gregorian date for a Julian day.
pub fn jd_to_gregorian(jd: i64) -> YearMonthDay {
    let days = jd - JULIAN_1_CE;
    let (n400, rem) = floor_div_rem(days, 146_097);
    let n100 = rem / 36_524;
    let rem = rem % 36_524;
    let n4 = rem / 1_461;
    let rem = rem % 1_461;
    let n1 = rem / 365;

    let mut year = 400 * n400 + 100 * n100 + 4 * n4 + n1;
    let mut day_of_year = rem % 365;
    if n100 == 4 || n1 == 4 {
        day_of_year = 365;
    } else {
        year += 1;
    }
    split_day_of_year(year, day_of_year, is_gregorian_leap_year(year))
}

/// Proleptic Julian-calendar date for a Julian day.
pub fn jd_to_julian(jd: i64) -> YearMonthDay {
    // Zero on Saturday 30 December 0 (Gregorian).
    let epoch_day = jd - (JULIAN_1_CE - 2);
    let year = floor_div(4 * epoch_day + 1464, 1461);
    let january_1 = 365 * (year - 1) + floor_div(year - 1, 4);
    let day_of_year = epoch_day - january_1;
    split_day_of_year(year, day_of_year, is_julian_leap_year(year))
}
