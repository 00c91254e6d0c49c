//! Calendar families.
//!
//! A family maps extended years, months and days to Julian days and back.
//! Everything else (field resolution, week numbering, time of day, zones,
//! arithmetic) is shared and lives in the calendar façade.

mod buddhist;
mod cecal;
mod chinese;
mod gregorian;
mod hebrew;
mod islamic;
mod japanese;
mod roc;

use std::fmt::Debug;
use std::sync::Arc;

use almanac_time::{DAY_MS, GregorianCutover, HOUR_MS, MAX_JULIAN, MIN_JULIAN};

use crate::Calendar;
use crate::config::{CalendarConfig, CalendarKind};
use crate::error::CalendarError;
use crate::field::{Field, FieldSet};
use crate::resolve::{self, DATE_PRECEDENCE, ResolutionTable};
use crate::week::WeekRule;

pub use buddhist::Buddhist;
pub use cecal::{Coptic, Ethiopic};
pub use chinese::{Chinese, LunisolarVariant};
pub use gregorian::Gregorian;
pub use hebrew::Hebrew;
pub use islamic::{Islamic, IslamicMethod};
pub use japanese::{Japanese, JapaneseEra};
pub use roc::Roc;

/// Which bound of a field to report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LimitType {
    /// Smallest value the field can take.
    Minimum,
    /// Largest of the per-context minima.
    GreatestMinimum,
    /// Smallest of the per-context maxima.
    LeastMaximum,
    /// Largest value the field can take.
    Maximum,
}

impl LimitType {
    fn index(self) -> usize {
        match self {
            Self::Minimum => 0,
            Self::GreatestMinimum => 1,
            Self::LeastMaximum => 2,
            Self::Maximum => 3,
        }
    }
}

/// Per-family bounds as `[min, greatest min, least max, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitTable {
    pub era: [i32; 4],
    pub year: [i32; 4],
    pub month: [i32; 4],
    pub week_of_year: [i32; 4],
    pub day_of_month: [i32; 4],
    pub day_of_year: [i32; 4],
    pub day_of_week_in_month: [i32; 4],
    pub year_woy: [i32; 4],
    pub extended_year: [i32; 4],
}

impl LimitTable {
    pub fn get(&self, field: Field, limit: LimitType) -> Option<i32> {
        let row = match field {
            Field::Era => &self.era,
            Field::Year => &self.year,
            Field::Month => &self.month,
            Field::WeekOfYear => &self.week_of_year,
            Field::DayOfMonth => &self.day_of_month,
            Field::DayOfYear => &self.day_of_year,
            Field::DayOfWeekInMonth => &self.day_of_week_in_month,
            Field::YearWoy => &self.year_woy,
            Field::ExtendedYear => &self.extended_year,
            _ => return None,
        };
        Some(row[limit.index()])
    }
}

const H: i32 = HOUR_MS as i32;
const MAX_JD: i32 = MAX_JULIAN as i32;
const MIN_JD: i32 = MIN_JULIAN as i32;

/// Bounds shared by every family.
fn common_limit(field: Field) -> Option<[i32; 4]> {
    let row = match field {
        Field::DayOfWeek | Field::DowLocal => [1, 1, 7, 7],
        Field::AmPm => [0, 0, 1, 1],
        Field::Hour => [0, 0, 11, 11],
        Field::HourOfDay => [0, 0, 23, 23],
        Field::Minute | Field::Second => [0, 0, 59, 59],
        Field::Millisecond => [0, 0, 999, 999],
        Field::ZoneOffset => [-24 * H, -16 * H, 12 * H, 30 * H],
        Field::DstOffset => [-H, -H, 2 * H, 2 * H],
        Field::JulianDay => [MIN_JD, MIN_JD, MAX_JD, MAX_JD],
        Field::MillisecondsInDay => [0, 0, DAY_MS as i32 - 1, DAY_MS as i32 - 1],
        Field::IsLeapMonth => [0, 0, 1, 1],
        _ => return None,
    };
    Some(row)
}

/// Bound of `field` for `family` under `rule`.
pub fn limit(family: &dyn CalendarFamily, field: Field, limit: LimitType, rule: WeekRule) -> i32 {
    if let Some(row) = common_limit(field) {
        return row[limit.index()];
    }
    if field == Field::WeekOfMonth {
        let min_days = rule.minimal_days_in_first_week();
        return match limit {
            LimitType::Minimum => i32::from(min_days == 1),
            LimitType::GreatestMinimum => 1,
            LimitType::LeastMaximum | LimitType::Maximum => {
                let days = family.handle_limit(Field::DayOfMonth, limit);
                let extra = if limit == LimitType::Maximum { 6 } else { 0 };
                (days + extra + 7 - min_days) / 7
            }
        };
    }
    family.handle_limit(field, limit)
}

/// One calendar system.
pub trait CalendarFamily: Debug + Send + Sync {
    fn kind(&self) -> CalendarKind;

    /// Bounds for the family-specific fields.
    fn limits(&self) -> &LimitTable;

    fn handle_limit(&self, field: Field, limit: LimitType) -> i32 {
        self.limits().get(field, limit).unwrap_or(0)
    }

    /// Extended year selected by the era/year fields.
    fn extended_year(&self, fields: &FieldSet) -> i64;

    /// Julian day of day 0 of `month` (the day before its first day).
    /// Months outside the year carry into neighbouring years.
    fn month_start(&self, eyear: i64, month: i64, leap_month: bool) -> Result<i64, CalendarError>;

    fn month_length(&self, eyear: i64, month: i64, leap_month: bool) -> Result<i32, CalendarError>;

    fn year_length(&self, eyear: i64) -> Result<i32, CalendarError> {
        let len = self.month_start(eyear + 1, 0, false)? - self.month_start(eyear, 0, false)?;
        i32::try_from(len).map_err(|_| CalendarError::overflow("year length"))
    }

    fn is_leap_year(&self, eyear: i64) -> Result<bool, CalendarError>;

    /// Set ERA, YEAR, EXTENDED_YEAR, MONTH, DAY_OF_MONTH, DAY_OF_YEAR and
    /// IS_LEAP_MONTH for a Julian day.
    fn compute_fields(&self, jd: i64, fields: &mut FieldSet) -> Result<(), CalendarError>;

    fn resolution_table(&self) -> &'static ResolutionTable {
        DATE_PRECEDENCE
    }

    /// Month used when MONTH is unset.
    fn default_month(&self, _eyear: i64, _fields: &FieldSet) -> i32 {
        0
    }

    /// Day used when DAY_OF_MONTH is unset.
    fn default_day(&self, _eyear: i64, _month: i32, _fields: &FieldSet) -> i32 {
        1
    }

    /// Julian day for the resolved field group `best`.
    fn julian_day(&self, fields: &mut FieldSet, rule: WeekRule, best: Field) -> Result<i64, CalendarError> {
        resolve::julian_day_from_fields(self, fields, rule, best, &|y, m, l| self.month_start(y, m, l))
    }

    /// Extra strict-mode checks for a user-set field.
    fn validate_field(&self, _field: Field, _fields: &FieldSet) -> Result<(), CalendarError> {
        Ok(())
    }

    /// Family-specific `add`. Returns `false` to use the generic algorithm.
    fn add(&self, _cal: &mut Calendar, _field: Field, _amount: i32) -> Result<bool, CalendarError> {
        Ok(false)
    }

    /// Family-specific `roll`. Returns `false` to use the generic algorithm.
    fn roll(&self, _cal: &mut Calendar, _field: Field, _amount: i32) -> Result<bool, CalendarError> {
        Ok(false)
    }

    /// Family-specific actual maximum, if the generic search does not apply.
    fn actual_maximum(&self, _cal: &mut Calendar, _field: Field) -> Result<Option<i32>, CalendarError> {
        Ok(None)
    }

    fn cutover(&self) -> Option<GregorianCutover> {
        None
    }

    /// Same family with a different Gregorian cutover.
    fn with_cutover(&self, _cutover: GregorianCutover) -> Option<Arc<dyn CalendarFamily>> {
        None
    }

    fn islamic_method(&self) -> Option<IslamicMethod> {
        None
    }

    fn is_amete_alem(&self) -> bool {
        false
    }

    /// Same family with Amete Alem era numbering switched on or off.
    fn with_amete_alem(&self, _on: bool) -> Option<Arc<dyn CalendarFamily>> {
        None
    }
}

/// Build the family selected by `config`.
pub fn family_for(config: &CalendarConfig) -> Arc<dyn CalendarFamily> {
    let cutover = GregorianCutover::new(config.gregorian_cutover);
    match config.kind {
        CalendarKind::Gregorian => Arc::new(Gregorian::new(cutover)),
        CalendarKind::Chinese => Arc::new(Chinese::new(LunisolarVariant::Chinese)),
        CalendarKind::Dangi => Arc::new(Chinese::new(LunisolarVariant::Dangi)),
        CalendarKind::Hebrew => Arc::new(Hebrew::new()),
        CalendarKind::Islamic => Arc::new(Islamic::new(IslamicMethod::Astronomical)),
        CalendarKind::IslamicCivil => Arc::new(Islamic::new(IslamicMethod::Civil)),
        CalendarKind::IslamicTbla => Arc::new(Islamic::new(IslamicMethod::Tbla)),
        CalendarKind::IslamicUmalqura => Arc::new(Islamic::new(IslamicMethod::UmmAlQura)),
        CalendarKind::Coptic => Arc::new(Coptic),
        CalendarKind::Ethiopic => Arc::new(Ethiopic::new(false)),
        CalendarKind::EthiopicAmeteAlem => Arc::new(Ethiopic::new(true)),
        CalendarKind::Japanese => Arc::new(Japanese::new(cutover)),
        CalendarKind::Buddhist => Arc::new(Buddhist::new(cutover)),
        CalendarKind::Roc => Arc::new(Roc::new(cutover)),
    }
}

/// Narrow a computed value into a field value.
pub(crate) fn to_field(value: i64, what: &'static str) -> Result<i32, CalendarError> {
    i32::try_from(value).map_err(|_| CalendarError::overflow(what))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn week_of_month_limits_follow_rule() {
        let g = Gregorian::new(GregorianCutover::default());
        let us = WeekRule::US;
        let iso = WeekRule::ISO;
        assert_eq!(limit(&g, Field::WeekOfMonth, LimitType::Minimum, us), 1);
        assert_eq!(limit(&g, Field::WeekOfMonth, LimitType::Minimum, iso), 0);
        assert_eq!(limit(&g, Field::WeekOfMonth, LimitType::Maximum, us), 6);
        assert_eq!(limit(&g, Field::WeekOfMonth, LimitType::LeastMaximum, iso), 4);
    }

    #[test]
    fn common_limits_ignore_family() {
        let h = Hebrew::new();
        assert_eq!(limit(&h, Field::HourOfDay, LimitType::Maximum, WeekRule::US), 23);
        assert_eq!(limit(&h, Field::IsLeapMonth, LimitType::Maximum, WeekRule::US), 1);
    }
}
