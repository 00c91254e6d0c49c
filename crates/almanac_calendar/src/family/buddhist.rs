//! Thai solar calendar: Gregorian months, Buddhist Era years.

use std::sync::Arc;

use almanac_time::GregorianCutover;

use super::gregorian::{EPOCH_YEAR, GREGORIAN_LIMITS, GregorianRules};
use super::{CalendarFamily, LimitTable, to_field};
use crate::config::CalendarKind;
use crate::error::CalendarError;
use crate::field::{Field, FieldSet};
use crate::week::WeekRule;

/// Gregorian year 1 is BE 544.
const BUDDHIST_ERA_START: i64 = -543;

const LIMITS: LimitTable = LimitTable {
    era: [0, 0, 0, 0],
    ..GREGORIAN_LIMITS
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Buddhist {
    rules: GregorianRules,
}

impl Buddhist {
    pub fn new(cutover: GregorianCutover) -> Self {
        Self {
            rules: GregorianRules::new(cutover),
        }
    }
}

impl CalendarFamily for Buddhist {
    fn kind(&self) -> CalendarKind {
        CalendarKind::Buddhist
    }

    fn limits(&self) -> &LimitTable {
        &LIMITS
    }

    fn extended_year(&self, fields: &FieldSet) -> i64 {
        if fields.newer_field(Field::ExtendedYear, Field::Year) == Field::ExtendedYear {
            i64::from(fields.get_or(Field::ExtendedYear, EPOCH_YEAR))
        } else {
            let default = EPOCH_YEAR - BUDDHIST_ERA_START as i32;
            i64::from(fields.get_or(Field::Year, default)) + BUDDHIST_ERA_START
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
        fields.set_internal(Field::Era, 0);
        fields.set_internal(Field::Year, to_field(eyear - BUDDHIST_ERA_START, "year")?);
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
    fn year_offset() {
        let b = Buddhist::default();
        let mut fs = FieldSet::default();
        b.compute_fields(gregorian_to_jd(2024, 0, 1), &mut fs).unwrap();
        assert_eq!(fs.get(Field::Year), 2567);
        assert_eq!(fs.get(Field::Era), 0);
        let mut fs = FieldSet::default();
        fs.set(Field::Year, 2567);
        assert_eq!(b.extended_year(&fs), 2024);
    }
}
