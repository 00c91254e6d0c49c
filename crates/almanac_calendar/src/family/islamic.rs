//! Islamic (Hijri) calendars.
//!
//! Four month rules share one field layout: the arithmetic civil and tbla
//! calendars (30-year leap cycle, epochs one day apart), months following
//! the observed moon age, and Umm al-Qura months tabulated from a Mecca
//! visibility criterion.

use std::f64::consts::PI;
use std::sync::OnceLock;

use almanac_astro::{
    GeoLocation, RiseSetEvent, SYNODIC_MONTH, YearCache, moon_age, moon_rise_set, nearest_new_moon,
    sun_rise_set,
};
use almanac_time::{DAY_MS, EPOCH_JULIAN_DAY, HOUR_MS, floor_div, floor_div_rem};
use tracing::debug;

use super::{CalendarFamily, LimitTable, to_field};
use crate::config::CalendarKind;
use crate::error::CalendarError;
use crate::field::{Field, FieldSet};

/// Julian day of 1 Muharram AH 1 (Friday 16 July 622 Julian).
const CIVIL_EPOCH: i64 = 1_948_440;
/// One day earlier (Thursday), used by the tbla variant.
const ASTRONOMICAL_EPOCH: i64 = 1_948_439;
/// Midnight UTC starting the civil epoch day.
const HIJRA_MILLIS: i64 = (CIVIL_EPOCH - EPOCH_JULIAN_DAY) * DAY_MS;

/// First year of the Umm al-Qura table.
pub const UMALQURA_FIRST_YEAR: i64 = 1300;
/// Last year of the Umm al-Qura table.
pub const UMALQURA_LAST_YEAR: i64 = 1600;
/// Mecca, where Umm al-Qura visibility is judged.
const MECCA: GeoLocation = GeoLocation {
    latitude_deg: 21.4225,
    longitude_deg: 39.8262,
};
const MECCA_OFFSET: i64 = 3 * HOUR_MS;

const LIMITS: LimitTable = LimitTable {
    era: [0, 0, 0, 0],
    year: [1, 1, 5_000_000, 5_000_000],
    month: [0, 0, 11, 11],
    week_of_year: [1, 1, 50, 51],
    day_of_month: [1, 1, 29, 30],
    day_of_year: [1, 1, 354, 355],
    day_of_week_in_month: [-1, -1, 5, 5],
    year_woy: [1, 1, 5_000_000, 5_000_000],
    extended_year: [1, 1, 5_000_000, 5_000_000],
};

/// Month rule of an Islamic calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IslamicMethod {
    /// Arithmetic, Friday epoch.
    Civil,
    /// Arithmetic, Thursday epoch.
    Tbla,
    /// Months start on the first day beginning after a new moon.
    Astronomical,
    /// Tabulated Umm al-Qura months, civil rule outside the table.
    UmmAlQura,
}

impl IslamicMethod {
    fn epoch(self) -> i64 {
        match self {
            Self::Tbla => ASTRONOMICAL_EPOCH,
            Self::Civil | Self::Astronomical | Self::UmmAlQura => CIVIL_EPOCH,
        }
    }
}

/// Day of the civil year start, counted from the epoch day.
fn civil_year_start(year: i64) -> i64 {
    (year - 1) * 354 + floor_div(3 + 11 * year, 30)
}

fn civil_month_start(year: i64, month: i64) -> i64 {
    // ceil(29.5 * month)
    (59 * month + 1).div_euclid(2) + civil_year_start(year)
}

fn civil_leap_year(year: i64) -> bool {
    (14 + 11 * year).rem_euclid(30) < 11
}

fn civil_month_length(year: i64, month: i64) -> i64 {
    let mut length = 29 + (month + 1) % 2;
    if month == 11 && civil_leap_year(year) {
        length += 1;
    }
    length
}

/// Civil (year, month) containing day `days` since the epoch.
fn civil_year_month(days: i64) -> (i64, i64) {
    let year = floor_div(30 * days + 10_646, 10_631);
    let month = ((days - 29 - civil_year_start(year)) as f64 / 29.5).ceil() as i64;
    (year, month.min(11))
}

/// Moon age in degrees, in `(-180, 180]`.
fn moon_age_degrees(millis: i64) -> f64 {
    let age = moon_age(millis) * 180.0 / PI;
    if age > 180.0 { age - 360.0 } else { age }
}

/// Umm al-Qura month starts, one per month from 1 Muharram 1300 through
/// 1 Muharram 1601, as days since the civil epoch.
fn umalqura_table() -> Result<&'static [i64], CalendarError> {
    static TABLE: OnceLock<Result<Vec<i64>, CalendarError>> = OnceLock::new();
    TABLE
        .get_or_init(build_umalqura_table)
        .as_ref()
        .map(Vec::as_slice)
        .map_err(Clone::clone)
}

fn build_umalqura_table() -> Result<Vec<i64>, CalendarError> {
    let months = ((UMALQURA_LAST_YEAR - UMALQURA_FIRST_YEAR + 1) * 12 + 1) as usize;
    let mut starts: Vec<i64> = Vec::with_capacity(months);

    let guess = HIJRA_MILLIS + (civil_month_start(UMALQURA_FIRST_YEAR, 0) - 10) * DAY_MS;
    let mut conjunction = nearest_new_moon(guess, true).ok_or(CalendarError::Ephemeris("new moon"))?;
    for _ in 0..months {
        let raw = visible_month_start(conjunction)?;
        let start = match starts.last() {
            Some(&previous) => previous + (raw - previous).clamp(29, 30),
            None => raw,
        };
        starts.push(start);
        conjunction = nearest_new_moon(conjunction + 20 * DAY_MS, true)
            .ok_or(CalendarError::Ephemeris("new moon"))?;
    }
    debug!(months = starts.len(), "built Umm al-Qura month table");
    Ok(starts)
}

/// First day of the month following a conjunction, by the Umm al-Qura
/// rule: the next day if the conjunction precedes sunset in Mecca and the
/// moon sets after the sun, otherwise the day after.
fn visible_month_start(conjunction: i64) -> Result<i64, CalendarError> {
    let local_day = floor_div(conjunction + MECCA_OFFSET, DAY_MS);
    let local_noon = local_day * DAY_MS + 12 * HOUR_MS - MECCA_OFFSET;
    let sunset = sun_rise_set(local_noon, RiseSetEvent::Set, &MECCA).ok_or(CalendarError::Ephemeris("sunset"))?;
    let visible = conjunction < sunset
        && moon_rise_set(sunset, RiseSetEvent::Set, &MECCA).is_some_and(|moonset| moonset > sunset);
    let day = local_day - (CIVIL_EPOCH - EPOCH_JULIAN_DAY);
    Ok(if visible { day + 1 } else { day + 2 })
}

#[derive(Debug, Clone)]
pub struct Islamic {
    method: IslamicMethod,
    month_starts: YearCache,
}

impl Islamic {
    pub fn new(method: IslamicMethod) -> Self {
        Self {
            method,
            month_starts: YearCache::new("islamic-month-start"),
        }
    }

    pub fn method(&self) -> IslamicMethod {
        self.method
    }

    /// Start of lunation `month` (months since 1 Muharram AH 1) under the
    /// moon-age rule, in days since the epoch.
    fn true_month_start(&self, month: i64) -> i64 {
        let compute = || {
            let mut origin = HIJRA_MILLIS + (month as f64 * SYNODIC_MONTH).floor() as i64 * DAY_MS;
            if moon_age_degrees(origin) >= 0.0 {
                loop {
                    origin -= DAY_MS;
                    if moon_age_degrees(origin) < 0.0 {
                        break;
                    }
                }
            } else {
                loop {
                    origin += DAY_MS;
                    if moon_age_degrees(origin) >= 0.0 {
                        break;
                    }
                }
            }
            floor_div(origin - HIJRA_MILLIS, DAY_MS) + 1
        };
        match i32::try_from(month) {
            Ok(key) => self.month_starts.get_or_insert_with(key, compute),
            Err(_) => compute(),
        }
    }

    /// Shift applied to the civil rule before (`true`) or after the table,
    /// so the two join without a gap.
    fn umalqura_shift(before: bool) -> Result<i64, CalendarError> {
        let table = umalqura_table()?;
        Ok(if before {
            table[0] - civil_year_start(UMALQURA_FIRST_YEAR)
        } else {
            table[table.len() - 1] - civil_year_start(UMALQURA_LAST_YEAR + 1)
        })
    }

    /// Start of a month in days since the epoch; the month's first day.
    fn month_start_days(&self, year: i64, month: i64) -> Result<i64, CalendarError> {
        let (carry, month) = floor_div_rem(month, 12);
        let year = year + carry;
        match self.method {
            IslamicMethod::Civil | IslamicMethod::Tbla => Ok(civil_month_start(year, month)),
            IslamicMethod::Astronomical => Ok(self.true_month_start(12 * (year - 1) + month)),
            IslamicMethod::UmmAlQura => {
                if year < UMALQURA_FIRST_YEAR {
                    Ok(civil_month_start(year, month) + Self::umalqura_shift(true)?)
                } else if year > UMALQURA_LAST_YEAR {
                    Ok(civil_month_start(year, month) + Self::umalqura_shift(false)?)
                } else {
                    let index = ((year - UMALQURA_FIRST_YEAR) * 12 + month) as usize;
                    Ok(umalqura_table()?[index])
                }
            }
        }
    }

    /// (year, month) containing day `days` since the epoch.
    fn year_month(&self, days: i64) -> Result<(i64, i64), CalendarError> {
        match self.method {
            IslamicMethod::Civil | IslamicMethod::Tbla => Ok(civil_year_month(days)),
            IslamicMethod::Astronomical => {
                let mut months = (days as f64 / SYNODIC_MONTH).floor() as i64;
                while self.true_month_start(months) > days {
                    months -= 1;
                }
                while self.true_month_start(months + 1) <= days {
                    months += 1;
                }
                let (year, month) = floor_div_rem(months, 12);
                Ok((year + 1, month))
            }
            IslamicMethod::UmmAlQura => {
                let table = umalqura_table()?;
                if days < table[0] {
                    Ok(civil_year_month(days - Self::umalqura_shift(true)?))
                } else if days >= table[table.len() - 1] {
                    Ok(civil_year_month(days - Self::umalqura_shift(false)?))
                } else {
                    let index = table.partition_point(|&start| start <= days) as i64 - 1;
                    Ok((UMALQURA_FIRST_YEAR + index / 12, index % 12))
                }
            }
        }
    }
}

impl CalendarFamily for Islamic {
    fn kind(&self) -> CalendarKind {
        match self.method {
            IslamicMethod::Civil => CalendarKind::IslamicCivil,
            IslamicMethod::Tbla => CalendarKind::IslamicTbla,
            IslamicMethod::Astronomical => CalendarKind::Islamic,
            IslamicMethod::UmmAlQura => CalendarKind::IslamicUmalqura,
        }
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
        Ok(self.month_start_days(eyear, month)? + self.method.epoch() - 1)
    }

    fn month_length(&self, eyear: i64, month: i64, _leap_month: bool) -> Result<i32, CalendarError> {
        let (carry, month) = floor_div_rem(month, 12);
        let eyear = eyear + carry;
        let length = match self.method {
            IslamicMethod::Civil | IslamicMethod::Tbla => civil_month_length(eyear, month),
            IslamicMethod::UmmAlQura if !(UMALQURA_FIRST_YEAR..=UMALQURA_LAST_YEAR).contains(&eyear) => {
                civil_month_length(eyear, month)
            }
            _ => self.month_start_days(eyear, month + 1)? - self.month_start_days(eyear, month)?,
        };
        to_field(length, "month length")
    }

    fn year_length(&self, eyear: i64) -> Result<i32, CalendarError> {
        let length = match self.method {
            IslamicMethod::Civil | IslamicMethod::Tbla => 354 + i64::from(civil_leap_year(eyear)),
            _ => self.month_start_days(eyear + 1, 0)? - self.month_start_days(eyear, 0)?,
        };
        to_field(length, "year length")
    }

    fn is_leap_year(&self, eyear: i64) -> Result<bool, CalendarError> {
        match self.method {
            IslamicMethod::Civil | IslamicMethod::Tbla => Ok(civil_leap_year(eyear)),
            _ => Ok(self.year_length(eyear)? == 355),
        }
    }

    fn compute_fields(&self, jd: i64, fields: &mut FieldSet) -> Result<(), CalendarError> {
        let days = jd - self.method.epoch();
        let (year, month) = self.year_month(days)?;
        let dom = days - self.month_start_days(year, month)? + 1;
        let doy = days - self.month_start_days(year, 0)? + 1;

        let year = to_field(year, "year")?;
        fields.set_internal(Field::Era, 0);
        fields.set_internal(Field::Year, year);
        fields.set_internal(Field::ExtendedYear, year);
        fields.set_internal(Field::Month, month as i32);
        fields.set_internal(Field::DayOfMonth, to_field(dom, "day of month")?);
        fields.set_internal(Field::DayOfYear, to_field(doy, "day of year")?);
        fields.set_internal(Field::IsLeapMonth, 0);
        Ok(())
    }

    fn islamic_method(&self) -> Option<IslamicMethod> {
        Some(self.method)
    }
}
