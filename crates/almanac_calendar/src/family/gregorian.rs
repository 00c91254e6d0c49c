//! Julian/Gregorian hybrid calendar, and the rules shared by the
//! Gregorian-based era calendars.

use std::cell::Cell;
use std::sync::Arc;

use almanac_time::{GregorianCutover, floor_div_rem, month_length};

use super::{CalendarFamily, LimitTable, to_field};
use crate::config::CalendarKind;
use crate::error::CalendarError;
use crate::field::{Field, FieldSet};
use crate::resolve::julian_day_from_fields;
use crate::week::WeekRule;

pub const BC: i32 = 0;
pub const AD: i32 = 1;
pub const EPOCH_YEAR: i32 = 1970;

pub(crate) const GREGORIAN_LIMITS: LimitTable = LimitTable {
    era: [0, 0, 1, 1],
    year: [1, 1, 5_828_963, 5_838_270],
    month: [0, 0, 11, 11],
    week_of_year: [1, 1, 52, 53],
    day_of_month: [1, 1, 28, 31],
    day_of_year: [1, 1, 365, 366],
    day_of_week_in_month: [-1, -1, 4, 5],
    year_woy: [-5_838_270, -5_838_270, 5_828_964, 5_838_271],
    extended_year: [-5_838_269, -5_838_269, 5_828_963, 5_838_270],
};

/// Month arithmetic of the hybrid calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct GregorianRules {
    pub cutover: GregorianCutover,
}

impl GregorianRules {
    pub fn new(cutover: GregorianCutover) -> Self {
        Self { cutover }
    }

    fn uses_gregorian(&self, eyear: i64, month: i64) -> bool {
        let (carry, _) = floor_div_rem(month, 12);
        self.cutover.uses_gregorian_rule(eyear + carry)
    }

    pub fn month_start(&self, eyear: i64, month: i64) -> i64 {
        self.cutover.month_start(eyear, month, self.uses_gregorian(eyear, month))
    }

    pub fn month_length(&self, eyear: i64, month: i64) -> i32 {
        let (carry, m) = floor_div_rem(month, 12);
        month_length(m as i32, self.cutover.is_leap_year(eyear + carry))
    }

    /// Day 0 of a year counted in real days. The year holding the cutover
    /// starts on its Julian 1 January and loses the dropped days.
    pub fn year_start(&self, eyear: i64) -> i64 {
        self.cutover.jd_from_fields(eyear, 0, 1) - 1
    }

    pub fn year_length(&self, eyear: i64) -> i32 {
        (self.year_start(eyear + 1) - self.year_start(eyear)) as i32
    }

    /// Resolve fields, re-running with the other leap rule when the first
    /// pass lands on the wrong side of the cutover.
    pub fn julian_day<F>(
        &self,
        family: &F,
        fields: &mut FieldSet,
        rule: WeekRule,
        best: Field,
    ) -> Result<i64, CalendarError>
    where
        F: CalendarFamily + ?Sized,
    {
        if best == Field::DayOfYear {
            let year_start = |y: i64, _m: i64, _leap: bool| Ok(self.year_start(y));
            return julian_day_from_fields(family, fields, rule, best, &year_start);
        }
        let gregorian = Cell::new(true);
        let first_pass = |y: i64, m: i64, _leap: bool| {
            let g = self.uses_gregorian(y, m);
            gregorian.set(g);
            Ok(self.cutover.month_start(y, m, g))
        };
        let jd = julian_day_from_fields(family, fields, rule, best, &first_pass)?;
        if gregorian.get() == (jd >= self.cutover.julian_day()) {
            return Ok(jd);
        }
        let inverted = |y: i64, m: i64, _leap: bool| Ok(self.cutover.month_start(y, m, !self.uses_gregorian(y, m)));
        julian_day_from_fields(family, fields, rule, best, &inverted)
    }

    /// Set the extended year and month/day fields; returns the extended year.
    pub fn compute_date_fields(&self, jd: i64, fields: &mut FieldSet) -> i32 {
        let ymd = self.cutover.fields_from_jd(jd);
        fields.set_internal(Field::ExtendedYear, ymd.year);
        fields.set_internal(Field::Month, ymd.month);
        fields.set_internal(Field::DayOfMonth, ymd.day);
        let day_of_year = jd - self.year_start(i64::from(ymd.year));
        fields.set_internal(Field::DayOfYear, day_of_year as i32);
        fields.set_internal(Field::IsLeapMonth, 0);
        ymd.year
    }
}

/// The Julian/Gregorian hybrid calendar with BC/AD eras.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Gregorian {
    rules: GregorianRules,
}

impl Gregorian {
    pub fn new(cutover: GregorianCutover) -> Self {
        Self {
            rules: GregorianRules::new(cutover),
        }
    }
}

impl CalendarFamily for Gregorian {
    fn kind(&self) -> CalendarKind {
        CalendarKind::Gregorian
    }

    fn limits(&self) -> &LimitTable {
        &GREGORIAN_LIMITS
    }

    fn extended_year(&self, fields: &FieldSet) -> i64 {
        if fields.newer_field(Field::ExtendedYear, Field::Year) == Field::ExtendedYear {
            i64::from(fields.get_or(Field::ExtendedYear, EPOCH_YEAR))
        } else if fields.get_or(Field::Era, AD) == BC {
            1 - i64::from(fields.get_or(Field::Year, 1))
        } else {
            i64::from(fields.get_or(Field::Year, EPOCH_YEAR))
        }
    }

    fn month_start(&self, eyear: i64, month: i64, _leap_month: bool) -> Result<i64, CalendarError> {
        Ok(self.rules.month_start(eyear, month))
    }

    fn month_length(&self, eyear: i64, month: i64, _leap_month: bool) -> Result<i32, CalendarError> {
        Ok(self.rules.month_length(eyear, month))
    }

    fn year_length(&self, eyear: i64) -> Result<i32, CalendarError> {
        Ok(self.rules.year_length(eyear))
    }

    fn is_leap_year(&self, eyear: i64) -> Result<bool, CalendarError> {
        Ok(self.rules.cutover.is_leap_year(eyear))
    }

    fn compute_fields(&self, jd: i64, fields: &mut FieldSet) -> Result<(), CalendarError> {
        let eyear = i64::from(self.rules.compute_date_fields(jd, fields));
        let (era, year) = if eyear < 1 { (BC, 1 - eyear) } else { (AD, eyear) };
        fields.set_internal(Field::Era, era);
        fields.set_internal(Field::Year, to_field(year, "year")?);
        Ok(())
    }

    fn julian_day(&self, fields: &mut FieldSet, rule: WeekRule, best: Field) -> Result<i64, CalendarError> {
        self.rules.julian_day(self, fields, rule, best)
    }

    fn cutover(&self) -> Option<GregorianCutover> {
        Some(self.rules.cutover)
    }

    fn with_cutover(&self, cutover: GregorianCutover) -> Option<Arc<dyn CalendarFamily>> {
        Some(Arc::new(Self::new(cutover)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use almanac_time::gregorian_to_jd;

    #[test]
    fn bc_years_count_backwards() {
        let g = Gregorian::default();
        let mut fs = FieldSet::default();
        g.compute_fields(gregorian_to_jd(0, 0, 1) - 100, &mut fs).unwrap();
        assert_eq!(fs.get(Field::Era), BC);
        assert_eq!(fs.get(Field::Year), 2);
        assert_eq!(fs.get(Field::ExtendedYear), -1);
    }

    #[test]
    fn extended_year_from_era() {
        let g = Gregorian::default();
        let mut fs = FieldSet::default();
        assert_eq!(g.extended_year(&fs), 1970);
        fs.set(Field::Era, BC);
        fs.set(Field::Year, 81);
        assert_eq!(g.extended_year(&fs), -80);
        assert!(g.is_leap_year(-80).unwrap());
        fs.set(Field::ExtendedYear, 5);
        assert_eq!(g.extended_year(&fs), 5);
    }

    #[test]
    fn cutover_month_lengths() {
        let g = Gregorian::default();
        assert_eq!(g.month_length(1900, 1, false).unwrap(), 28);
        // Julian rule before the cutover year.
        assert_eq!(g.month_length(1500, 1, false).unwrap(), 29);
        assert_eq!(g.month_length(2000, 13, false).unwrap(), 28);
    }

    #[test]
    fn resolve_across_cutover() {
        let g = Gregorian::default();
        let mut fs = FieldSet::default();
        fs.set(Field::Year, 1582);
        fs.set(Field::Month, 9);
        fs.set(Field::DayOfMonth, 4);
        let jd = g.julian_day(&mut fs, WeekRule::US, Field::DayOfMonth).unwrap();
        assert_eq!(jd, 2_299_160);
        fs.set(Field::DayOfMonth, 15);
        let jd = g.julian_day(&mut fs, WeekRule::US, Field::DayOfMonth).unwrap();
        assert_eq!(jd, 2_299_161);
    }

    #[test]
    fn cutover_year_counts_real_days() {
        let g = Gregorian::default();
        assert_eq!(g.year_length(1582).unwrap(), 355);
        assert_eq!(g.year_length(1581).unwrap(), 365);
        assert_eq!(g.year_length(1584).unwrap(), 366);

        let mut fs = FieldSet::default();
        g.compute_fields(2_299_160, &mut fs).unwrap();
        assert_eq!(fs.get(Field::DayOfYear), 277);
        g.compute_fields(2_299_161, &mut fs).unwrap();
        assert_eq!(fs.get(Field::DayOfMonth), 15);
        assert_eq!(fs.get(Field::DayOfYear), 278);

        let mut fs = FieldSet::default();
        fs.set(Field::Year, 1582);
        fs.set(Field::DayOfYear, 278);
        let jd = g.julian_day(&mut fs, WeekRule::US, Field::DayOfYear).unwrap();
        assert_eq!(jd, 2_299_161);
    }
}
