//! Chinese and Korean (Dangi) lunisolar calendars.
//!
//! Months run from new moon to new moon in local standard time. Month 11
//! always contains the winter solstice; when 13 new moons fall between two
//! solstice months, the first month without a major solar term is a leap
//! month. ERA counts 60-year cycles and YEAR is the year within the cycle.

use std::f64::consts::PI;

use almanac_astro::{SYNODIC_MONTH, WINTER_SOLSTICE, YearCache, nearest_new_moon, sun_longitude, sun_time};
use almanac_time::{DAY_MS, EPOCH_JULIAN_DAY, HOUR_MS, floor_div, floor_div_rem, gregorian_to_jd, jd_to_gregorian};

use super::{CalendarFamily, LimitTable, to_field};
use crate::Calendar;
use crate::config::CalendarKind;
use crate::error::CalendarError;
use crate::field::{Field, FieldSet, month};
use crate::resolve::{LUNISOLAR_DATE_PRECEDENCE, ResolutionTable};

/// Gregorian year before Chinese cycle 1, year 1 (2637 BCE).
const CHINESE_EPOCH_YEAR: i64 = -2636;
/// Gregorian year before Dangi year 1 (2333 BCE).
const DANGI_EPOCH_YEAR: i64 = -2332;
/// Days safely inside the next lunar month from a new moon.
const SYNODIC_GAP: i64 = 25;

const LIMITS: LimitTable = LimitTable {
    era: [1, 1, 83_333, 83_333],
    year: [1, 1, 60, 60],
    month: [0, 0, 11, 11],
    week_of_year: [1, 1, 50, 55],
    day_of_month: [1, 1, 29, 30],
    day_of_year: [1, 1, 353, 385],
    day_of_week_in_month: [-1, -1, 5, 5],
    year_woy: [-5_000_000, -5_000_000, 5_000_000, 5_000_000],
    extended_year: [-5_000_000, -5_000_000, 5_000_000, 5_000_000],
};

/// Which lunisolar calendar, fixing the epoch and the meridian that
/// defines a civil day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LunisolarVariant {
    /// UTC+8 throughout.
    Chinese,
    /// UTC+8, then UTC+7 in 1897, UTC+8 from 1898 and UTC+9 from 1912.
    /// The year boundaries are approximated as multiples of 365 days.
    Dangi,
}

impl LunisolarVariant {
    fn epoch_year(self) -> i64 {
        match self {
            Self::Chinese => CHINESE_EPOCH_YEAR,
            Self::Dangi => DANGI_EPOCH_YEAR,
        }
    }

    fn zone_offset(self, millis: i64) -> i64 {
        const Y365: i64 = 365 * DAY_MS;
        match self {
            Self::Chinese => 8 * HOUR_MS,
            Self::Dangi => {
                if millis < (1897 - 1970) * Y365 {
                    8 * HOUR_MS
                } else if millis < (1898 - 1970) * Y365 {
                    7 * HOUR_MS
                } else if millis < (1912 - 1970) * Y365 {
                    8 * HOUR_MS
                } else {
                    9 * HOUR_MS
                }
            }
        }
    }
}

/// Lunar month containing a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LunarMonth {
    /// One-based month number.
    month: i64,
    is_leap_month: bool,
    is_leap_year: bool,
    /// Local day number of the month's first day.
    new_moon: i64,
}

#[derive(Debug, Clone)]
pub struct Chinese {
    variant: LunisolarVariant,
    winter_solstices: YearCache,
    new_years: YearCache,
}

fn search_failed(what: &'static str) -> CalendarError {
    CalendarError::Ephemeris(what)
}

impl Chinese {
    pub fn new(variant: LunisolarVariant) -> Self {
        Self {
            variant,
            winter_solstices: YearCache::new("lunisolar-winter-solstice"),
            new_years: YearCache::new("lunisolar-new-year"),
        }
    }

    pub fn variant(&self) -> LunisolarVariant {
        self.variant
    }

    /// UTC instant of local midnight starting a day (days since 1970).
    fn days_to_millis(&self, days: i64) -> i64 {
        let millis = days * DAY_MS;
        millis - self.variant.zone_offset(millis)
    }

    /// Local day containing a UTC instant.
    fn millis_to_days(&self, millis: i64) -> i64 {
        floor_div(millis + self.variant.zone_offset(millis), DAY_MS)
    }

    fn cached(
        cache: &YearCache,
        year: i64,
        compute: impl FnOnce() -> Result<i64, CalendarError>,
    ) -> Result<i64, CalendarError> {
        match i32::try_from(year) {
            Ok(key) => cache.try_get_or_insert_with(key, compute),
            Err(_) => compute(),
        }
    }

    /// Local day of the winter solstice in Gregorian year `gyear`.
    fn winter_solstice(&self, gyear: i64) -> Result<i64, CalendarError> {
        Self::cached(&self.winter_solstices, gyear, || {
            let dec_1 = gregorian_to_jd(gyear, i64::from(month::DECEMBER), 1) - EPOCH_JULIAN_DAY;
            let start = self.days_to_millis(dec_1);
            let solstice = sun_time(start, WINTER_SOLSTICE, true).ok_or_else(|| search_failed("winter solstice"))?;
            Ok(self.millis_to_days(solstice))
        })
    }

    /// Local day of the new moon nearest `days`, searching in one direction.
    fn new_moon_near(&self, days: i64, after: bool) -> Result<i64, CalendarError> {
        let moon = nearest_new_moon(self.days_to_millis(days), after).ok_or_else(|| search_failed("new moon"))?;
        Ok(self.millis_to_days(moon))
    }

    fn synodic_months_between(day1: i64, day2: i64) -> i64 {
        ((day2 - day1) as f64 / SYNODIC_MONTH).round() as i64
    }

    /// Major solar term (1..=12) in effect at the start of a day.
    fn major_solar_term(&self, days: i64) -> i64 {
        let longitude = sun_longitude(self.days_to_millis(days));
        let term = ((6.0 * longitude / PI).floor() as i64 + 2).rem_euclid(12);
        if term < 1 { term + 12 } else { term }
    }

    fn has_no_major_solar_term(&self, new_moon: i64) -> Result<bool, CalendarError> {
        let next = self.new_moon_near(new_moon + SYNODIC_GAP, true)?;
        Ok(self.major_solar_term(new_moon) == self.major_solar_term(next))
    }

    /// Whether any month from `new_moon_1` through `new_moon_2` lacks a
    /// major solar term.
    fn is_leap_month_between(&self, new_moon_1: i64, new_moon_2: i64) -> Result<bool, CalendarError> {
        let mut moon = new_moon_2;
        while moon >= new_moon_1 {
            if self.has_no_major_solar_term(moon)? {
                return Ok(true);
            }
            moon = self.new_moon_near(moon - SYNODIC_GAP, false)?;
        }
        Ok(false)
    }

    /// Local day of the lunar new year in Gregorian year `gyear`.
    fn new_year(&self, gyear: i64) -> Result<i64, CalendarError> {
        Self::cached(&self.new_years, gyear, || {
            let before = self.winter_solstice(gyear - 1)?;
            let after = self.winter_solstice(gyear)?;
            let moon_1 = self.new_moon_near(before + 1, true)?;
            let moon_2 = self.new_moon_near(moon_1 + SYNODIC_GAP, true)?;
            let moon_11 = self.new_moon_near(after + 1, false)?;
            if Self::synodic_months_between(moon_1, moon_11) == 12
                && (self.has_no_major_solar_term(moon_1)? || self.has_no_major_solar_term(moon_2)?)
            {
                self.new_moon_near(moon_2 + SYNODIC_GAP, true)
            } else {
                Ok(moon_2)
            }
        })
    }

    /// Lunar month containing local day `days`, which falls in Gregorian
    /// year `gyear`.
    fn lunar_month(&self, days: i64, gyear: i64) -> Result<LunarMonth, CalendarError> {
        let mut solstice_after = self.winter_solstice(gyear)?;
        let solstice_before = if days < solstice_after {
            self.winter_solstice(gyear - 1)?
        } else {
            let before = solstice_after;
            solstice_after = self.winter_solstice(gyear + 1)?;
            before
        };

        let first_moon = self.new_moon_near(solstice_before + 1, true)?;
        let last_moon = self.new_moon_near(solstice_after + 1, false)?;
        let this_moon = self.new_moon_near(days + 1, false)?;
        let is_leap_year = Self::synodic_months_between(first_moon, last_moon) == 12;

        let mut month = Self::synodic_months_between(first_moon, this_moon);
        if is_leap_year && self.is_leap_month_between(first_moon, this_moon)? {
            month -= 1;
        }
        if month < 1 {
            month += 12;
        }
        let is_leap_month = is_leap_year
            && self.has_no_major_solar_term(this_moon)?
            && !self.is_leap_month_between(first_moon, self.new_moon_near(this_moon - SYNODIC_GAP, false)?)?;

        Ok(LunarMonth {
            month,
            is_leap_month,
            is_leap_year,
            new_moon: this_moon,
        })
    }

    /// Move by `delta` lunar months from the month starting at `new_moon`,
    /// keeping the day of month (pinned to the month length).
    fn offset_month(&self, cal: &mut Calendar, new_moon: i64, dom: i32, delta: i64) -> Result<(), CalendarError> {
        let guess = new_moon + (SYNODIC_MONTH * (delta as f64 - 0.5)) as i64;
        let new_moon = self.new_moon_near(guess, true)?;
        let jd = new_moon + EPOCH_JULIAN_DAY - 1 + i64::from(dom);
        if dom > 29 {
            cal.set(Field::JulianDay, to_field(jd - 1, "julian day")?);
            cal.complete()?;
            if cal.actual_maximum(Field::DayOfMonth)? >= dom {
                cal.set(Field::JulianDay, to_field(jd, "julian day")?);
            }
        } else {
            cal.set(Field::JulianDay, to_field(jd, "julian day")?);
        }
        Ok(())
    }

    /// Start of the current month and the current day of month.
    fn current_month(cal: &mut Calendar) -> Result<(i64, i32), CalendarError> {
        let dom = cal.get(Field::DayOfMonth)?;
        let day = i64::from(cal.get(Field::JulianDay)?) - EPOCH_JULIAN_DAY;
        Ok((day - i64::from(dom) + 1, dom))
    }
}

impl CalendarFamily for Chinese {
    fn kind(&self) -> CalendarKind {
        match self.variant {
            LunisolarVariant::Chinese => CalendarKind::Chinese,
            LunisolarVariant::Dangi => CalendarKind::Dangi,
        }
    }

    fn limits(&self) -> &LimitTable {
        &LIMITS
    }

    fn resolution_table(&self) -> &'static ResolutionTable {
        LUNISOLAR_DATE_PRECEDENCE
    }

    fn extended_year(&self, fields: &FieldSet) -> i64 {
        let era_year = fields.newest_stamp(&[Field::Era, Field::Year], 0);
        if era_year <= fields.stamp(Field::ExtendedYear) {
            i64::from(fields.get_or(Field::ExtendedYear, 1))
        } else {
            let cycle = i64::from(fields.get_or(Field::Era, 1)) - 1;
            cycle * 60 + i64::from(fields.get_or(Field::Year, 1))
                - (self.variant.epoch_year() - CHINESE_EPOCH_YEAR)
        }
    }

    fn month_start(&self, eyear: i64, month: i64, leap_month: bool) -> Result<i64, CalendarError> {
        let (carry, month) = floor_div_rem(month, 12);
        let gyear = eyear + carry + self.variant.epoch_year() - 1;
        let new_year = self.new_year(gyear)?;
        let mut new_moon = self.new_moon_near(new_year + month * 29, true)?;

        let g = jd_to_gregorian(new_moon + EPOCH_JULIAN_DAY);
        let found = self.lunar_month(new_moon, i64::from(g.year))?;
        if month != found.month - 1 || leap_month != found.is_leap_month {
            new_moon = self.new_moon_near(new_moon + SYNODIC_GAP, true)?;
        }
        Ok(new_moon + EPOCH_JULIAN_DAY - 1)
    }

    fn month_length(&self, eyear: i64, month: i64, leap_month: bool) -> Result<i32, CalendarError> {
        let this_start = self.month_start(eyear, month, leap_month)? - EPOCH_JULIAN_DAY + 1;
        let next_start = self.new_moon_near(this_start + SYNODIC_GAP, true)?;
        to_field(next_start - this_start, "month length")
    }

    fn is_leap_year(&self, eyear: i64) -> Result<bool, CalendarError> {
        let gyear = eyear + self.variant.epoch_year() - 1;
        let this = self.new_year(gyear)?;
        let next = self.new_year(gyear + 1)?;
        Ok(Self::synodic_months_between(this, next) == 13)
    }

    fn compute_fields(&self, jd: i64, fields: &mut FieldSet) -> Result<(), CalendarError> {
        let days = jd - EPOCH_JULIAN_DAY;
        let g = jd_to_gregorian(jd);
        let gyear = i64::from(g.year);
        let lunar = self.lunar_month(days, gyear)?;

        let mut extended_year = gyear - self.variant.epoch_year();
        let mut cycle_year = gyear - CHINESE_EPOCH_YEAR;
        if lunar.month < 11 || g.month >= month::JULY {
            extended_year += 1;
            cycle_year += 1;
        }
        let (cycle, year_of_cycle) = floor_div_rem(cycle_year - 1, 60);

        let mut new_year = self.new_year(gyear)?;
        if days < new_year {
            new_year = self.new_year(gyear - 1)?;
        }

        fields.set_internal(Field::ExtendedYear, to_field(extended_year, "extended year")?);
        fields.set_internal(Field::Era, to_field(cycle + 1, "era")?);
        fields.set_internal(Field::Year, year_of_cycle as i32 + 1);
        fields.set_internal(Field::Month, lunar.month as i32 - 1);
        fields.set_internal(Field::IsLeapMonth, i32::from(lunar.is_leap_month));
        fields.set_internal(Field::DayOfMonth, to_field(days - lunar.new_moon + 1, "day of month")?);
        fields.set_internal(Field::DayOfYear, to_field(days - new_year + 1, "day of year")?);
        Ok(())
    }

    fn add(&self, cal: &mut Calendar, field: Field, amount: i32) -> Result<bool, CalendarError> {
        if field != Field::Month {
            return Ok(false);
        }
        if amount != 0 {
            let (moon, dom) = Self::current_month(cal)?;
            self.offset_month(cal, moon, dom, i64::from(amount))?;
        }
        Ok(true)
    }

    fn roll(&self, cal: &mut Calendar, field: Field, amount: i32) -> Result<bool, CalendarError> {
        if field != Field::Month {
            return Ok(false);
        }
        if amount == 0 {
            return Ok(true);
        }
        let (moon, dom) = Self::current_month(cal)?;
        let jd = i64::from(cal.get(Field::JulianDay)?);
        let lunar = self.lunar_month(moon, i64::from(jd_to_gregorian(jd).year))?;

        // Zero-based position of this month within the year, counting a
        // leap month as its own position. Months 1 and 12 are never
        // followed by a leap month.
        let mut m = i64::from(cal.get(Field::Month)?);
        if lunar.is_leap_year {
            if cal.get(Field::IsLeapMonth)? == 1 {
                m += 1;
            } else {
                let guess = moon - (SYNODIC_MONTH * (m as f64 - 0.5)) as i64;
                let first = self.new_moon_near(guess, true)?;
                if self.is_leap_month_between(first, moon)? {
                    m += 1;
                }
            }
        }
        let n = if lunar.is_leap_year { 13 } else { 12 };
        let new_m = (m + i64::from(amount)).rem_euclid(n);
        if new_m != m {
            self.offset_month(cal, moon, dom, new_m - m)?;
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields_at(c: &Chinese, y: i64, m: i64, d: i64) -> (i32, i32, i32, i32, i32) {
        let mut fs = FieldSet::default();
        c.compute_fields(gregorian_to_jd(y, m, d), &mut fs).unwrap();
        (
            fs.get(Field::ExtendedYear),
            fs.get(Field::Month) + 1,
            fs.get(Field::IsLeapMonth),
            fs.get(Field::DayOfMonth),
            fs.get(Field::DayOfYear),
        )
    }

    #[test]
    fn leap_fourth_month_of_2001() {
        let c = Chinese::new(LunisolarVariant::Chinese);
        assert_eq!(fields_at(&c, 2001, 0, 24), (4638, 1, 0, 1, 1));
        assert_eq!(fields_at(&c, 2001, 4, 22), (4638, 4, 0, 30, 119));
        assert_eq!(fields_at(&c, 2001, 4, 23), (4638, 4, 1, 1, 120));
        assert_eq!(fields_at(&c, 2001, 5, 21), (4638, 5, 0, 1, 149));
    }

    #[test]
    fn new_year_2024() {
        let c = Chinese::new(LunisolarVariant::Chinese);
        assert_eq!(fields_at(&c, 2024, 1, 10), (4661, 1, 0, 1, 1));
        assert_eq!(fields_at(&c, 2024, 1, 9), (4660, 12, 0, 30, 384));
    }

    #[test]
    fn sexagenary_cycle() {
        let c = Chinese::new(LunisolarVariant::Chinese);
        let mut fs = FieldSet::default();
        // 1984-02-02 starts a new 60-year cycle (jia-zi).
        c.compute_fields(gregorian_to_jd(1984, 1, 2), &mut fs).unwrap();
        assert_eq!(fs.get(Field::Era), 78);
        assert_eq!(fs.get(Field::Year), 1);
    }

    #[test]
    fn month_start_selects_leap_month() {
        let c = Chinese::new(LunisolarVariant::Chinese);
        let regular = c.month_start(4638, 3, false).unwrap();
        let leap = c.month_start(4638, 3, true).unwrap();
        assert_eq!(regular + 1, gregorian_to_jd(2001, 3, 23));
        assert_eq!(leap + 1, gregorian_to_jd(2001, 4, 23));
        assert!(c.is_leap_year(4638).unwrap());
        assert!(!c.is_leap_year(4661).unwrap());
    }

    #[test]
    fn dangi_uses_korean_years() {
        let d = Chinese::new(LunisolarVariant::Dangi);
        assert_eq!(fields_at(&d, 2001, 4, 23), (4334, 4, 1, 1, 120));
    }

    #[test]
    fn caches_fill_on_use() {
        let c = Chinese::new(LunisolarVariant::Chinese);
        assert!(c.new_years.is_empty());
        c.new_year(2010).unwrap();
        assert!(c.new_years.get(2010).is_some());
        assert!(c.winter_solstices.get(2009).is_some());
    }
}
