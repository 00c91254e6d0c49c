//! Japanese imperial calendar: Gregorian months, years counted within
//! imperial eras.
//!
//! Only the modern eras are tabulated. Dates before Meiji are reported in
//! era 0 with a year of zero or less.

use std::sync::Arc;

use almanac_time::GregorianCutover;

use super::gregorian::{EPOCH_YEAR, GREGORIAN_LIMITS, GregorianRules};
use super::{CalendarFamily, LimitTable, LimitType, to_field};
use crate::Calendar;
use crate::config::CalendarKind;
use crate::error::CalendarError;
use crate::field::{Field, FieldSet};
use crate::week::WeekRule;

/// Era start date in the Gregorian calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JapaneseEra {
    pub name: &'static str,
    pub year: i32,
    /// One-based month.
    pub month: i32,
    pub day: i32,
}

pub const ERAS: [JapaneseEra; 5] = [
    JapaneseEra { name: "Meiji", year: 1868, month: 9, day: 8 },
    JapaneseEra { name: "Taisho", year: 1912, month: 7, day: 30 },
    JapaneseEra { name: "Showa", year: 1926, month: 12, day: 25 },
    JapaneseEra { name: "Heisei", year: 1989, month: 1, day: 8 },
    JapaneseEra { name: "Reiwa", year: 2019, month: 5, day: 1 },
];

pub const MEIJI: i32 = 0;
pub const TAISHO: i32 = 1;
pub const SHOWA: i32 = 2;
pub const HEISEI: i32 = 3;
pub const REIWA: i32 = 4;
pub const CURRENT_ERA: i32 = REIWA;

const LIMITS: LimitTable = LimitTable {
    era: [0, 0, CURRENT_ERA, CURRENT_ERA],
    year: [1, 1, 1, GREGORIAN_LIMITS.year[3] - ERAS[CURRENT_ERA as usize].year],
    ..GREGORIAN_LIMITS
};

fn era(index: i32) -> JapaneseEra {
    ERAS[index.clamp(0, CURRENT_ERA) as usize]
}

/// Era containing a Gregorian date (month zero-based).
fn era_of(year: i32, month: i32, day: i32) -> i32 {
    let key = (year, month + 1, day);
    ERAS.iter()
        .rposition(|e| (e.year, e.month, e.day) <= key)
        .map_or(MEIJI, |i| i as i32)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Japanese {
    rules: GregorianRules,
}

impl Japanese {
    pub fn new(cutover: GregorianCutover) -> Self {
        Self {
            rules: GregorianRules::new(cutover),
        }
    }
}

impl CalendarFamily for Japanese {
    fn kind(&self) -> CalendarKind {
        CalendarKind::Japanese
    }

    fn limits(&self) -> &LimitTable {
        &LIMITS
    }

    fn extended_year(&self, fields: &FieldSet) -> i64 {
        if fields.newer_field(Field::ExtendedYear, Field::Year) == Field::ExtendedYear
            && fields.newer_field(Field::ExtendedYear, Field::Era) == Field::ExtendedYear
        {
            i64::from(fields.get_or(Field::ExtendedYear, EPOCH_YEAR))
        } else {
            let start = era(fields.get_or(Field::Era, CURRENT_ERA)).year;
            i64::from(fields.get_or(Field::Year, 1)) + i64::from(start) - 1
        }
    }

    fn default_month(&self, eyear: i64, fields: &FieldSet) -> i32 {
        let e = era(fields.get_or(Field::Era, CURRENT_ERA));
        if eyear == i64::from(e.year) { e.month - 1 } else { 0 }
    }

    fn default_day(&self, eyear: i64, month: i32, fields: &FieldSet) -> i32 {
        let e = era(fields.get_or(Field::Era, CURRENT_ERA));
        if eyear == i64::from(e.year) && month == e.month - 1 {
            e.day
        } else {
            1
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
        let eyear = self.rules.compute_date_fields(jd, fields);
        let index = era_of(eyear, fields.get(Field::Month), fields.get(Field::DayOfMonth));
        let year = i64::from(eyear) - i64::from(era(index).year) + 1;
        fields.set_internal(Field::Era, index);
        fields.set_internal(Field::Year, to_field(year, "year")?);
        Ok(())
    }

    fn julian_day(&self, fields: &mut FieldSet, rule: WeekRule, best: Field) -> Result<i64, CalendarError> {
        self.rules.julian_day(self, fields, rule, best)
    }

    fn actual_maximum(&self, cal: &mut Calendar, field: Field) -> Result<Option<i32>, CalendarError> {
        if field != Field::Year {
            return Ok(None);
        }
        let index = cal.get(Field::Era)?;
        if index >= CURRENT_ERA {
            return Ok(Some(self.handle_limit(Field::Year, LimitType::Maximum)));
        }
        let this = era(index);
        let next = era(index + 1);
        let mut max = next.year - this.year + 1;
        if next.month == 1 && next.day == 1 {
            max -= 1;
        }
        Ok(Some(max))
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
    fn era_boundaries() {
        let j = Japanese::default();
        let mut fs = FieldSet::default();
        j.compute_fields(gregorian_to_jd(2019, 3, 30), &mut fs).unwrap();
        assert_eq!((fs.get(Field::Era), fs.get(Field::Year)), (HEISEI, 31));
        j.compute_fields(gregorian_to_jd(2019, 4, 1), &mut fs).unwrap();
        assert_eq!((fs.get(Field::Era), fs.get(Field::Year)), (REIWA, 1));
        j.compute_fields(gregorian_to_jd(1989, 0, 7), &mut fs).unwrap();
        assert_eq!((fs.get(Field::Era), fs.get(Field::Year)), (SHOWA, 64));
    }

    #[test]
    fn pre_meiji_years_are_not_positive() {
        let j = Japanese::default();
        let mut fs = FieldSet::default();
        j.compute_fields(gregorian_to_jd(1867, 0, 1), &mut fs).unwrap();
        assert_eq!(fs.get(Field::Era), MEIJI);
        assert_eq!(fs.get(Field::Year), 0);
    }

    #[test]
    fn era_start_defaults() {
        let j = Japanese::default();
        let mut fs = FieldSet::default();
        fs.set(Field::Era, HEISEI);
        fs.set(Field::Year, 1);
        let eyear = j.extended_year(&fs);
        assert_eq!(eyear, 1989);
        assert_eq!(j.default_month(eyear, &fs), 0);
        assert_eq!(j.default_day(eyear, 0, &fs), 8);
        assert_eq!(j.default_day(eyear, 1, &fs), 1);
    }
}
