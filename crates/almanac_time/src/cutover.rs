//! Julian/Gregorian hybrid calendar with a configurable cutover.
//!
//! Days before the cutover use the proleptic Julian rule; days on or after
//! it use the proleptic Gregorian rule. A cutover at `i64::MIN` gives a pure
//! Gregorian calendar and one at `i64::MAX` a pure Julian one.

use crate::julian::{
    DAY_MS, EPOCH_JULIAN_DAY, YearMonthDay, days_before_month, floor_div_rem,
    gregorian_year_start, is_gregorian_leap_year, is_julian_leap_year, jd_to_gregorian,
    jd_to_julian, julian_year_start,
};

/// Default cutover: 1582-10-15T00:00Z.
pub const DEFAULT_CUTOVER_MILLIS: i64 = -12_219_292_800_000;

/// Cutover configuration and the values derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GregorianCutover {
    millis: i64,
    julian_day: i64,
    year: i32,
}

impl Default for GregorianCutover {
    fn default() -> Self {
        Self::new(DEFAULT_CUTOVER_MILLIS)
    }
}

impl GregorianCutover {
    /// Cutover at the start of the day containing `millis`.
    pub fn new(millis: i64) -> Self {
        let (days, _) = floor_div_rem(millis, DAY_MS);
        let julian_day = days + EPOCH_JULIAN_DAY;
        let year = jd_to_gregorian(julian_day).year;
        Self {
            millis,
            julian_day,
            year,
        }
    }

    /// Pure proleptic Gregorian calendar.
    pub fn pure_gregorian() -> Self {
        Self::new(i64::MIN)
    }

    /// Pure proleptic Julian calendar.
    pub fn pure_julian() -> Self {
        Self::new(i64::MAX)
    }

    /// Cutover instant as configured.
    pub fn millis(&self) -> i64 {
        self.millis
    }

    /// First Julian day reckoned in the Gregorian calendar.
    pub fn julian_day(&self) -> i64 {
        self.julian_day
    }

    /// Gregorian year in which the cutover falls.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Leap-year rule for `year` as labelled by the hybrid calendar.
    pub fn is_leap_year(&self, year: i64) -> bool {
        if year >= i64::from(self.year) {
            is_gregorian_leap_year(year)
        } else {
            is_julian_leap_year(year)
        }
    }

    /// Date fields for a Julian day.
    pub fn fields_from_jd(&self, jd: i64) -> YearMonthDay {
        if jd >= self.julian_day {
            jd_to_gregorian(jd)
        } else {
            jd_to_julian(jd)
        }
    }

    /// Day 0 of a zero-based month (the day before its first day).
    ///
    /// `gregorian` selects the rule; callers pick it from
    /// [`uses_gregorian_rule`](Self::uses_gregorian_rule) and re-run with the
    /// other rule when the result lands on the wrong side of the cutover.
    pub fn month_start(&self, year: i64, month: i64, gregorian: bool) -> i64 {
        let (carry, m) = floor_div_rem(month, 12);
        let year = year + carry;
        let (start, leap) = if gregorian {
            (gregorian_year_start(year), is_gregorian_leap_year(year))
        } else {
            (julian_year_start(year), is_julian_leap_year(year))
        };
        start + i64::from(days_before_month(m as i32, leap))
    }

    /// Whether a date labelled with `year` is computed with the Gregorian rule
    /// on the first pass.
    pub fn uses_gregorian_rule(&self, year: i64) -> bool {
        year >= i64::from(self.year)
    }

    /// Julian day for a hybrid-calendar date, skipping the dropped days.
    ///
    /// Dates inside the gap resolve leniently (1582-10-10 maps to 1582-10-20).
    pub fn jd_from_fields(&self, year: i64, month: i64, day: i64) -> i64 {
        let gregorian = self.uses_gregorian_rule(year);
        let jd = self.month_start(year, month, gregorian) + day;
        if gregorian != (jd >= self.julian_day) {
            self.month_start(year, month, !gregorian) + day
        } else {
            jd
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::julian::gregorian_to_jd;

    #[test]
    fn default_cutover_is_1582_10_15() {
        let c = GregorianCutover::default();
        assert_eq!(c.julian_day(), 2_299_161);
        assert_eq!(c.year(), 1582);
        let f = c.fields_from_jd(c.julian_day());
        assert_eq!((f.year, f.month, f.day), (1582, 9, 15));
        let f = c.fields_from_jd(c.julian_day() - 1);
        assert_eq!((f.year, f.month, f.day), (1582, 9, 4));
    }

    #[test]
    fn gap_dates_resolve_past_cutover() {
        let c = GregorianCutover::default();
        assert_eq!(c.jd_from_fields(1582, 9, 4), 2_299_160);
        assert_eq!(c.jd_from_fields(1582, 9, 15), 2_299_161);
        assert_eq!(c.jd_from_fields(1582, 9, 10), 2_299_161 + 5);
    }

    #[test]
    fn pure_modes() {
        let g = GregorianCutover::pure_gregorian();
        assert_eq!(g.jd_from_fields(1000, 0, 1), gregorian_to_jd(1000, 0, 1));
        let j = GregorianCutover::pure_julian();
        assert!(j.is_leap_year(1900));
        assert!(!g.is_leap_year(1900));
        let f = j.fields_from_jd(gregorian_to_jd(2000, 0, 14));
        assert_eq!((f.year, f.month, f.day), (2000, 0, 1));
    }

    #[test]
    fn julian_leap_before_cutover() {
        let c = GregorianCutover::default();
        assert!(c.is_leap_year(1500));
        assert!(!c.is_leap_year(1700));
        let f = c.fields_from_jd(c.jd_from_fields(1500, 1, 29));
        assert_eq!((f.year, f.month, f.day), (1500, 1, 29));
    }
}
