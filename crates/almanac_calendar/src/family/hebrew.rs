//! Hebrew calendar.
//!
//! Years start at the molad of Tishri, postponed by the dehiyyot. Leap
//! years (7 in every 19) insert Adar I as month 5; in common years month 5
//! is skipped, so MONTH always runs 0..=12.

use almanac_astro::YearCache;
use almanac_time::floor_div;

use super::{CalendarFamily, LimitTable, to_field};
use crate::Calendar;
use crate::config::CalendarKind;
use crate::error::CalendarError;
use crate::field::{Field, FieldSet};

pub const TISHRI: i32 = 0;
pub const HESHVAN: i32 = 1;
pub const KISLEV: i32 = 2;
pub const TEVET: i32 = 3;
pub const SHEVAT: i32 = 4;
pub const ADAR_1: i32 = 5;
pub const ADAR: i32 = 6;
pub const NISAN: i32 = 7;
pub const IYAR: i32 = 8;
pub const SIVAN: i32 = 9;
pub const TAMUZ: i32 = 10;
pub const AV: i32 = 11;
pub const ELUL: i32 = 12;

/// Julian day before 1 Tishri AM 1.
const EPOCH_OFFSET: i64 = 347_997;

const HOUR_PARTS: i64 = 1080;
const DAY_PARTS: i64 = 24 * HOUR_PARTS;
/// Fractional part of a mean lunar month, in parts.
const MONTH_FRACT: i64 = 12 * HOUR_PARTS + 793;
const MONTH_PARTS: i64 = 29 * DAY_PARTS + MONTH_FRACT;
/// Molad of Tishri AM 1.
const BAHARAD: i64 = 11 * HOUR_PARTS + 204;

/// Month lengths by year type (deficient, regular, complete).
const MONTH_LENGTH: [[i32; 3]; 13] = [
    [30, 30, 30],
    [29, 29, 30],
    [29, 30, 30],
    [29, 29, 29],
    [30, 30, 30],
    [30, 30, 30],
    [29, 29, 29],
    [30, 30, 30],
    [29, 29, 29],
    [30, 30, 30],
    [29, 29, 29],
    [30, 30, 30],
    [29, 29, 29],
];

/// Days before each month in a common year; the last row is the year length.
const MONTH_START: [[i32; 3]; 14] = [
    [0, 0, 0],
    [30, 30, 30],
    [59, 59, 60],
    [88, 89, 90],
    [117, 118, 119],
    [147, 148, 149],
    [147, 148, 149],
    [176, 177, 178],
    [206, 207, 208],
    [235, 236, 237],
    [265, 266, 267],
    [294, 295, 296],
    [324, 325, 326],
    [353, 354, 355],
];

const LEAP_MONTH_START: [[i32; 3]; 14] = [
    [0, 0, 0],
    [30, 30, 30],
    [59, 59, 60],
    [88, 89, 90],
    [117, 118, 119],
    [147, 148, 149],
    [177, 178, 179],
    [206, 207, 208],
    [236, 237, 238],
    [265, 266, 267],
    [295, 296, 297],
    [324, 325, 326],
    [354, 355, 356],
    [383, 384, 385],
];

const LIMITS: LimitTable = LimitTable {
    era: [0, 0, 0, 0],
    year: [-5_000_000, -5_000_000, 5_000_000, 5_000_000],
    month: [0, 0, 12, 12],
    week_of_year: [1, 1, 51, 56],
    day_of_month: [1, 1, 29, 30],
    day_of_year: [1, 1, 353, 385],
    day_of_week_in_month: [-1, -1, 5, 5],
    year_woy: [-5_000_000, -5_000_000, 5_000_000, 5_000_000],
    extended_year: [-5_000_000, -5_000_000, 5_000_000, 5_000_000],
};

pub fn is_leap_year(year: i64) -> bool {
    (12 * year + 17).rem_euclid(19) >= 12
}

fn months_in_year(year: i64) -> i64 {
    if is_leap_year(year) { 13 } else { 12 }
}

/// Carry an out-of-range month into neighbouring years. Every year allows
/// months 0..=12.
fn normalize_month(mut year: i64, mut month: i64) -> (i64, i64) {
    // 235 months per 19-year cycle.
    let cycles = floor_div(month, 235);
    year += 19 * cycles;
    month -= 235 * cycles;
    while month > 12 {
        month -= months_in_year(year);
        year += 1;
    }
    (year, month)
}

#[derive(Debug, Clone)]
pub struct Hebrew {
    year_starts: YearCache,
}

impl Default for Hebrew {
    fn default() -> Self {
        Self::new()
    }
}

impl Hebrew {
    pub fn new() -> Self {
        Self {
            year_starts: YearCache::new("hebrew-year-start"),
        }
    }

    /// Days from the epoch to 1 Tishri of `year`, with postponements.
    fn start_of_year(&self, year: i64) -> i64 {
        match i32::try_from(year) {
            Ok(key) => self.year_starts.get_or_insert_with(key, || compute_start_of_year(year)),
            Err(_) => compute_start_of_year(year),
        }
    }

    fn days_in_year(&self, year: i64) -> i64 {
        self.start_of_year(year + 1) - self.start_of_year(year)
    }

    /// 0 deficient, 1 regular, 2 complete.
    fn year_type(&self, year: i64) -> usize {
        let mut len = self.days_in_year(year);
        if len > 380 {
            len -= 30;
        }
        match len {
            ..=353 => 0,
            354 => 1,
            _ => 2,
        }
    }

    fn start_table(year: i64) -> &'static [[i32; 3]; 14] {
        if is_leap_year(year) { &LEAP_MONTH_START } else { &MONTH_START }
    }
}

fn compute_start_of_year(year: i64) -> i64 {
    let months = floor_div(235 * year - 234, 19);
    let frac = months * MONTH_FRACT + BAHARAD;
    let mut day = months * 29 + floor_div(frac, DAY_PARTS);
    let frac = frac.rem_euclid(DAY_PARTS);

    // 0 is Monday.
    let mut wd = day.rem_euclid(7);
    if wd == 2 || wd == 4 || wd == 6 {
        // Sunday, Wednesday or Friday.
        day += 1;
        wd = day.rem_euclid(7);
    }
    if wd == 1 && frac > 15 * HOUR_PARTS + 204 && !is_leap_year(year) {
        day += 2;
    } else if wd == 0 && frac > 21 * HOUR_PARTS + 589 && is_leap_year(year - 1) {
        day += 1;
    }
    day
}

impl CalendarFamily for Hebrew {
    fn kind(&self) -> CalendarKind {
        CalendarKind::Hebrew
    }

    fn limits(&self) -> &LimitTable {
        &LIMITS
    }

    fn extended_year(&self, fields: &FieldSet) -> i64 {
        if fields.newer_field(Field::ExtendedYear, Field::Year) == Field::ExtendedYear {
            i64::from(fields.get_or(Field::ExtendedYear, 1))
        } else {
            i64::from(fields.get_or(Field::Year, 1))
        }
    }

    fn month_start(&self, eyear: i64, month: i64, _leap_month: bool) -> Result<i64, CalendarError> {
        let (year, month) = normalize_month(eyear, month);
        let mut day = self.start_of_year(year);
        if month != 0 {
            day += i64::from(Self::start_table(year)[month as usize][self.year_type(year)]);
        }
        Ok(day + EPOCH_OFFSET)
    }

    fn month_length(&self, eyear: i64, month: i64, _leap_month: bool) -> Result<i32, CalendarError> {
        let (year, month) = normalize_month(eyear, month);
        let month = month as usize;
        Ok(match month as i32 {
            HESHVAN | KISLEV => MONTH_LENGTH[month][self.year_type(year)],
            _ => MONTH_LENGTH[month][0],
        })
    }

    fn year_length(&self, eyear: i64) -> Result<i32, CalendarError> {
        to_field(self.days_in_year(eyear), "year length")
    }

    fn is_leap_year(&self, eyear: i64) -> Result<bool, CalendarError> {
        Ok(is_leap_year(eyear))
    }

    fn compute_fields(&self, jd: i64, fields: &mut FieldSet) -> Result<(), CalendarError> {
        let d = jd - EPOCH_OFFSET;
        let months = floor_div(d * DAY_PARTS, MONTH_PARTS);
        let mut year = floor_div(19 * months + 234, 235) + 1;
        let mut day_of_year = d - self.start_of_year(year);
        while day_of_year < 1 {
            year -= 1;
            day_of_year = d - self.start_of_year(year);
        }
        while day_of_year > self.days_in_year(year) {
            day_of_year -= self.days_in_year(year);
            year += 1;
        }

        let kind = self.year_type(year);
        let table = Self::start_table(year);
        let month = table
            .iter()
            .rposition(|row| day_of_year > i64::from(row[kind]))
            .unwrap_or(0);
        let day_of_month = day_of_year - i64::from(table[month][kind]);

        let year = to_field(year, "year")?;
        fields.set_internal(Field::Era, 0);
        fields.set_internal(Field::Year, year);
        fields.set_internal(Field::ExtendedYear, year);
        fields.set_internal(Field::Month, month as i32);
        fields.set_internal(Field::DayOfMonth, day_of_month as i32);
        fields.set_internal(Field::DayOfYear, day_of_year as i32);
        fields.set_internal(Field::IsLeapMonth, 0);
        Ok(())
    }

    fn validate_field(&self, field: Field, fields: &FieldSet) -> Result<(), CalendarError> {
        if field == Field::Month
            && fields.get(Field::Month) == ADAR_1
            && !is_leap_year(self.extended_year(fields))
        {
            return Err(CalendarError::Validation {
                field,
                value: ADAR_1,
                min: TISHRI,
                max: ELUL,
            });
        }
        Ok(())
    }

    fn add(&self, cal: &mut Calendar, field: Field, amount: i32) -> Result<bool, CalendarError> {
        if field != Field::Month {
            return Ok(false);
        }
        let mut month = i64::from(cal.get(Field::Month)?);
        let mut year = i64::from(cal.get(Field::Year)?);
        let amount = i64::from(amount);
        let months_per_year = i64::from(ELUL) + 1;
        if amount > 0 {
            let mut across_adar_1 = month < i64::from(ADAR_1);
            month += amount;
            loop {
                if across_adar_1 && month >= i64::from(ADAR_1) && !is_leap_year(year) {
                    month += 1;
                }
                if month <= i64::from(ELUL) {
                    break;
                }
                month -= months_per_year;
                year += 1;
                across_adar_1 = true;
            }
        } else {
            let mut across_adar_1 = month > i64::from(ADAR_1);
            month += amount;
            loop {
                if across_adar_1 && month <= i64::from(ADAR_1) && !is_leap_year(year) {
                    month -= 1;
                }
                if month >= 0 {
                    break;
                }
                month += months_per_year;
                year -= 1;
                across_adar_1 = true;
            }
        }
        cal.set(Field::Month, month as i32);
        cal.set(Field::Year, to_field(year, "year")?);
        cal.pin_field(Field::DayOfMonth)?;
        Ok(true)
    }

    fn roll(&self, cal: &mut Calendar, field: Field, amount: i32) -> Result<bool, CalendarError> {
        if field != Field::Month {
            return Ok(false);
        }
        let month = cal.get(Field::Month)?;
        let year = i64::from(cal.get(Field::Year)?);
        let leap = is_leap_year(year);
        let mut new_month = month + amount % months_in_year(year) as i32;
        if !leap {
            if amount > 0 && month < ADAR_1 && new_month >= ADAR_1 {
                new_month += 1;
            } else if amount < 0 && month > ADAR_1 && new_month <= ADAR_1 {
                new_month -= 1;
            }
        }
        cal.set(Field::Month, (new_month + 13) % 13);
        cal.pin_field(Field::DayOfMonth)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use almanac_time::gregorian_to_jd;

    fn fields_of(h: &Hebrew, y: i64, m: i64, d: i64) -> (i32, i32, i32, i32) {
        let mut fs = FieldSet::default();
        h.compute_fields(gregorian_to_jd(y, m, d), &mut fs).unwrap();
        (
            fs.get(Field::Year),
            fs.get(Field::Month),
            fs.get(Field::DayOfMonth),
            fs.get(Field::DayOfYear),
        )
    }

    #[test]
    fn rosh_hashanah_5784() {
        let h = Hebrew::new();
        assert_eq!(fields_of(&h, 2023, 8, 16), (5784, TISHRI, 1, 1));
        assert_eq!(fields_of(&h, 2023, 8, 15), (5783, ELUL, 29, 355));
        assert_eq!(h.month_start(5784, 0, false).unwrap() + 1, gregorian_to_jd(2023, 8, 16));
    }

    #[test]
    fn leap_year_has_adar_1() {
        let h = Hebrew::new();
        assert!(is_leap_year(5784));
        assert!(!is_leap_year(5785));
        assert_eq!(h.year_length(5784).unwrap(), 383);
        assert_eq!(fields_of(&h, 2024, 1, 10), (5784, ADAR_1, 1, 148));
        assert_eq!(fields_of(&h, 2024, 2, 11), (5784, ADAR, 1, 178));
        assert_eq!(fields_of(&h, 2024, 3, 23), (5784, NISAN, 15, 221));
        // Common year: month 5 is skipped.
        assert_eq!(fields_of(&h, 2025, 2, 1), (5785, ADAR, 1, 150));
    }

    #[test]
    fn month_carry() {
        let h = Hebrew::new();
        assert_eq!(h.month_start(5784, 13, false).unwrap(), h.month_start(5785, 0, false).unwrap());
        assert_eq!(
            h.month_start(5700, 235, false).unwrap(),
            h.month_start(5719, 0, false).unwrap()
        );
    }

    #[test]
    fn year_types_are_valid() {
        let h = Hebrew::new();
        for y in 5700..5800 {
            let len = h.year_length(y).unwrap();
            assert!(matches!(len, 353..=355 | 383..=385), "year {y} has {len} days");
        }
    }
}
