//! Coptic and Ethiopic calendars: twelve 30-day months and a short
//! thirteenth month of 5 or 6 days, with a leap day every fourth year.

use std::sync::Arc;

use almanac_time::floor_div_rem;

use super::{CalendarFamily, LimitTable, to_field};
use crate::config::CalendarKind;
use crate::error::CalendarError;
use crate::field::{Field, FieldSet};

/// Julian day of 1 Thout 1 AM, less one.
const COPTIC_EPOCH_OFFSET: i64 = 1_824_665;
/// Julian day of 1 Meskerem 1 Amete Mihret, less one.
const ETHIOPIC_EPOCH_OFFSET: i64 = 1_723_856;
/// Amete Alem year of Amete Mihret 1, less one.
pub const AMETE_MIHRET_DELTA: i64 = 5500;

pub const COPTIC_BCE: i32 = 0;
pub const COPTIC_CE: i32 = 1;
pub const AMETE_ALEM: i32 = 0;
pub const AMETE_MIHRET: i32 = 1;

const LIMITS: LimitTable = LimitTable {
    era: [0, 0, 1, 1],
    year: [1, 1, 5_000_000, 5_000_000],
    month: [0, 0, 12, 12],
    week_of_year: [1, 1, 52, 53],
    day_of_month: [1, 1, 5, 30],
    day_of_year: [1, 1, 365, 366],
    day_of_week_in_month: [-1, -1, 1, 5],
    year_woy: [-5_000_000, -5_000_000, 5_000_000, 5_000_000],
    extended_year: [-5_000_000, -5_000_000, 5_000_000, 5_000_000],
};

const AMETE_ALEM_LIMITS: LimitTable = LimitTable {
    era: [0, 0, 0, 0],
    ..LIMITS
};

/// Julian day of a date; months outside 0..13 carry into the year.
fn ce_to_jd(year: i64, month: i64, day: i64, epoch_offset: i64) -> i64 {
    let (carry, month) = floor_div_rem(month, 13);
    let year = year + carry;
    let (leap_days, _) = floor_div_rem(year, 4);
    epoch_offset + 365 * year + leap_days + 30 * month + day - 1
}

/// (extended year, zero-based month, day of month, day of year).
fn jd_to_ce(jd: i64, epoch_offset: i64) -> (i64, i64, i64, i64) {
    let (c4, r4) = floor_div_rem(jd - epoch_offset, 1461);
    let year = 4 * c4 + (r4 / 365 - r4 / 1460);
    let doy = if r4 == 1460 { 365 } else { r4 % 365 };
    (year, doy / 30, doy % 30 + 1, doy + 1)
}

fn ce_month_length(eyear: i64, month: i64) -> i32 {
    let (carry, month) = floor_div_rem(month, 13);
    if month != 12 {
        30
    } else {
        ((eyear + carry).rem_euclid(4) / 3) as i32 + 5
    }
}

fn ce_set_date_fields(jd: i64, epoch_offset: i64, fields: &mut FieldSet) -> Result<i64, CalendarError> {
    let (eyear, month, day, doy) = jd_to_ce(jd, epoch_offset);
    fields.set_internal(Field::ExtendedYear, to_field(eyear, "extended year")?);
    fields.set_internal(Field::Month, month as i32);
    fields.set_internal(Field::DayOfMonth, day as i32);
    fields.set_internal(Field::DayOfYear, doy as i32);
    fields.set_internal(Field::IsLeapMonth, 0);
    Ok(eyear)
}

/// Coptic calendar, eras BCE and CE (Era of the Martyrs).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Coptic;

impl CalendarFamily for Coptic {
    fn kind(&self) -> CalendarKind {
        CalendarKind::Coptic
    }

    fn limits(&self) -> &LimitTable {
        &LIMITS
    }

    fn extended_year(&self, fields: &FieldSet) -> i64 {
        if fields.newer_field(Field::ExtendedYear, Field::Year) == Field::ExtendedYear {
            i64::from(fields.get_or(Field::ExtendedYear, 1))
        } else if fields.get_or(Field::Era, COPTIC_CE) == COPTIC_BCE {
            1 - i64::from(fields.get_or(Field::Year, 1))
        } else {
            i64::from(fields.get_or(Field::Year, 1))
        }
    }

    fn month_start(&self, eyear: i64, month: i64, _leap_month: bool) -> Result<i64, CalendarError> {
        Ok(ce_to_jd(eyear, month, 0, COPTIC_EPOCH_OFFSET))
    }

    fn month_length(&self, eyear: i64, month: i64, _leap_month: bool) -> Result<i32, CalendarError> {
        Ok(ce_month_length(eyear, month))
    }

    fn year_length(&self, eyear: i64) -> Result<i32, CalendarError> {
        Ok(360 + ce_month_length(eyear, 12))
    }

    fn is_leap_year(&self, eyear: i64) -> Result<bool, CalendarError> {
        Ok(eyear.rem_euclid(4) == 3)
    }

    fn compute_fields(&self, jd: i64, fields: &mut FieldSet) -> Result<(), CalendarError> {
        let eyear = ce_set_date_fields(jd, COPTIC_EPOCH_OFFSET, fields)?;
        let (era, year) = if eyear <= 0 { (COPTIC_BCE, 1 - eyear) } else { (COPTIC_CE, eyear) };
        fields.set_internal(Field::Era, era);
        fields.set_internal(Field::Year, to_field(year, "year")?);
        Ok(())
    }
}

/// Ethiopic calendar. In Amete Alem mode every year is numbered in the
/// Amete Alem era; otherwise only years before Amete Mihret 1 are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Ethiopic {
    amete_alem: bool,
}

impl Ethiopic {
    pub fn new(amete_alem: bool) -> Self {
        Self { amete_alem }
    }
}

impl CalendarFamily for Ethiopic {
    fn kind(&self) -> CalendarKind {
        if self.amete_alem {
            CalendarKind::EthiopicAmeteAlem
        } else {
            CalendarKind::Ethiopic
        }
    }

    fn limits(&self) -> &LimitTable {
        if self.amete_alem { &AMETE_ALEM_LIMITS } else { &LIMITS }
    }

    fn extended_year(&self, fields: &FieldSet) -> i64 {
        if fields.newer_field(Field::ExtendedYear, Field::Year) == Field::ExtendedYear {
            i64::from(fields.get_or(Field::ExtendedYear, 1))
        } else if self.amete_alem {
            let default = (1 + AMETE_MIHRET_DELTA) as i32;
            i64::from(fields.get_or(Field::Year, default)) - AMETE_MIHRET_DELTA
        } else if fields.get_or(Field::Era, AMETE_MIHRET) == AMETE_MIHRET {
            i64::from(fields.get_or(Field::Year, 1))
        } else {
            i64::from(fields.get_or(Field::Year, 1)) - AMETE_MIHRET_DELTA
        }
    }

    fn month_start(&self, eyear: i64, month: i64, _leap_month: bool) -> Result<i64, CalendarError> {
        Ok(ce_to_jd(eyear, month, 0, ETHIOPIC_EPOCH_OFFSET))
    }

    fn month_length(&self, eyear: i64, month: i64, _leap_month: bool) -> Result<i32, CalendarError> {
        Ok(ce_month_length(eyear, month))
    }

    fn year_length(&self, eyear: i64) -> Result<i32, CalendarError> {
        Ok(360 + ce_month_length(eyear, 12))
    }

    fn is_leap_year(&self, eyear: i64) -> Result<bool, CalendarError> {
        Ok(eyear.rem_euclid(4) == 3)
    }

    fn compute_fields(&self, jd: i64, fields: &mut FieldSet) -> Result<(), CalendarError> {
        let eyear = ce_set_date_fields(jd, ETHIOPIC_EPOCH_OFFSET, fields)?;
        let (era, year) = if self.amete_alem || eyear <= 0 {
            (AMETE_ALEM, eyear + AMETE_MIHRET_DELTA)
        } else {
            (AMETE_MIHRET, eyear)
        };
        fields.set_internal(Field::Era, era);
        fields.set_internal(Field::Year, to_field(year, "year")?);
        Ok(())
    }

    fn is_amete_alem(&self) -> bool {
        self.amete_alem
    }

    fn with_amete_alem(&self, on: bool) -> Option<Arc<dyn CalendarFamily>> {
        Some(Arc::new(Self::new(on)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use almanac_time::gregorian_to_jd;

    #[test]
    fn ethiopic_new_year_2016() {
        // 1 Meskerem 2016 = 12 September 2023.
        let e = Ethiopic::new(false);
        let mut fs = FieldSet::default();
        e.compute_fields(gregorian_to_jd(2023, 8, 12), &mut fs).unwrap();
        assert_eq!(fs.get(Field::Year), 2016);
        assert_eq!((fs.get(Field::Month), fs.get(Field::DayOfMonth)), (0, 1));
        assert_eq!(fs.get(Field::Era), AMETE_MIHRET);
    }

    #[test]
    fn amete_alem_changes_labels_only() {
        let jd = gregorian_to_jd(2023, 8, 12);
        let mut fs = FieldSet::default();
        Ethiopic::new(true).compute_fields(jd, &mut fs).unwrap();
        assert_eq!(fs.get(Field::Era), AMETE_ALEM);
        assert_eq!(fs.get(Field::Year), 7516);
        assert_eq!(fs.get(Field::ExtendedYear), 2016);
        assert_eq!(Ethiopic::new(true).month_start(2016, 0, false).unwrap() + 1, jd);
    }

    #[test]
    fn coptic_new_year() {
        // 1 Thout 1740 = 12 September 2023.
        let c = Coptic;
        let mut fs = FieldSet::default();
        c.compute_fields(gregorian_to_jd(2023, 8, 12), &mut fs).unwrap();
        assert_eq!((fs.get(Field::Year), fs.get(Field::Month), fs.get(Field::DayOfMonth)), (1740, 0, 1));
    }

    #[test]
    fn short_month_tracks_leap_years() {
        assert_eq!(ce_month_length(3, 12), 6);
        assert_eq!(ce_month_length(4, 12), 5);
        assert_eq!(ce_month_length(-1, 12), 6);
        assert_eq!(ce_month_length(2, 25), 6);
        let total: i64 = (0..13).map(|m| i64::from(ce_month_length(3, m))).sum();
        assert_eq!(total, ce_to_jd(4, 0, 1, 0) - ce_to_jd(3, 0, 1, 0));
    }
}
