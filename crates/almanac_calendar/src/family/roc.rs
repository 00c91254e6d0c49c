//! Republic of China (Minguo) calendar: Gregorian months, years counted
//! from 1912.

use std::sync::Arc;

use almanac_time::GregorianCutover;

use super::gregorian::{EPOCH_YEAR, GREGORIAN_LIMITS, GregorianRules};
use super::{CalendarFamily, LimitTable, to_field};
use crate::config::CalendarKind;
use crate::error::CalendarError;
use crate::field::{Field, FieldSet};
use crate::week::WeekRule;

pub const BEFORE_MINGUO: i32 = 0;
pub const MINGUO: i32 = 1;

/// Gregorian year preceding Minguo 1.
const GREGORIAN_OFFSET: i64 = 1911;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Roc {
    rules: GregorianRules,
}

impl Roc {
    pub fn new(cutover: GregorianCutover) -> Self {
        Self {
            rules: GregorianRules::new(cutover),
        }
    }
}

impl CalendarFamily for Roc {
    fn kind(&self) -> CalendarKind {
        CalendarKind::Roc
    }

    fn limits(&self) -> &LimitTable {
        &GREGORIAN_LIMITS
    }

    fn extended_year(&self, fields: &FieldSet) -> i64 {
        if fields.newer_field(Field::ExtendedYear, Field::Year) == Field::ExtendedYear {
            return i64::from(fields.get_or(Field::ExtendedYear, EPOCH_YEAR));
        }
        let year = i64::from(fields.get_or(Field::Year, 1));
        if fields.get_or(Field::Era, MINGUO) == MINGUO {
            year + GREGORIAN_OFFSET
        } else {
            1 - year + GREGORIAN_OFFSET
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
        let y = i64::from(self.rules.compute_date_fields(jd, fields)) - GREGORIAN_OFFSET;
        let (era, year) = if y > 0 { (MINGUO, y) } else { (BEFORE_MINGUO, 1 - y) };
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
    fn minguo_years() {
        let r = Roc::default();
        let mut fs = FieldSet::default();
        r.compute_fields(gregorian_to_jd(1912, 0, 1), &mut fs).unwrap();
        assert_eq!((fs.get(Field::Era), fs.get(Field::Year)), (MINGUO, 1));
        r.compute_fields(gregorian_to_jd(1911, 11, 31), &mut fs).unwrap();
        assert_eq!((fs.get(Field::Era), fs.get(Field::Year)), (BEFORE_MINGUO, 1));
        let mut fs = FieldSet::default();
        fs.set(Field::Era, BEFORE_MINGUO);
        fs.set(Field::Year, 2);
        assert_eq!(r.extended_year(&fs), 1910);
    }
}
