//! Week numbering rules.

use crate::error::CalendarError;
use crate::field::weekday;

/// First day of the week plus the minimal number of days a partial week
/// needs to count as week 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WeekRule {
    first_day_of_week: i32,
    minimal_days_in_first_week: i32,
}

impl Default for WeekRule {
    fn default() -> Self {
        Self::US
    }
}

impl WeekRule {
    /// ISO 8601: weeks start Monday, week 1 has at least four days.
    pub const ISO: Self = Self {
        first_day_of_week: weekday::MONDAY,
        minimal_days_in_first_week: 4,
    };

    /// United States: weeks start Sunday, week 1 contains 1 January.
    pub const US: Self = Self {
        first_day_of_week: weekday::SUNDAY,
        minimal_days_in_first_week: 1,
    };

    pub fn new(first_day_of_week: i32, minimal_days_in_first_week: i32) -> Result<Self, CalendarError> {
        if !(1..=7).contains(&first_day_of_week) {
            return Err(CalendarError::Configuration(format!(
                "first day of week must be 1..=7, got {first_day_of_week}"
            )));
        }
        if !(1..=7).contains(&minimal_days_in_first_week) {
            return Err(CalendarError::Configuration(format!(
                "minimal days in first week must be 1..=7, got {minimal_days_in_first_week}"
            )));
        }
        Ok(Self {
            first_day_of_week,
            minimal_days_in_first_week,
        })
    }

    pub fn first_day_of_week(&self) -> i32 {
        self.first_day_of_week
    }

    pub fn minimal_days_in_first_week(&self) -> i32 {
        self.minimal_days_in_first_week
    }

    /// Day of week relative to the first day: 1 for the first day of the
    /// week through 7.
    pub fn local_day_of_week(&self, day_of_week: i32) -> i32 {
        (day_of_week - self.first_day_of_week).rem_euclid(7) + 1
    }

    /// Week number of `desired_day` within a period (month or year), given
    /// the day-of-week of `day_of_period`.
    pub fn week_number_of(&self, desired_day: i32, day_of_period: i32, day_of_week: i32) -> i32 {
        let period_start = (day_of_week - self.first_day_of_week - day_of_period + 1).rem_euclid(7);
        let mut week = (desired_day + period_start - 1).div_euclid(7);
        if 7 - period_start >= self.minimal_days_in_first_week {
            week += 1;
        }
        week
    }

    /// Week number of the day `day_of_period` within its period.
    pub fn week_number(&self, day_of_period: i32, day_of_week: i32) -> i32 {
        self.week_number_of(day_of_period, day_of_period, day_of_week)
    }

    /// Week of year and the year the week belongs to.
    ///
    /// `year_length` returns the length of an extended year; it is consulted
    /// for the previous year when the day falls before week 1, and for the
    /// current year near its end.
    pub fn week_of_year<F>(
        &self,
        extended_year: i32,
        day_of_year: i32,
        day_of_week: i32,
        year_length: F,
    ) -> Result<(i32, i32), CalendarError>
    where
        F: Fn(i32) -> Result<i32, CalendarError>,
    {
        let rel_dow = (day_of_week - self.first_day_of_week).rem_euclid(7);
        let rel_dow_jan1 = (day_of_week - day_of_year + 1 - self.first_day_of_week).rem_euclid(7);
        let mut woy = (day_of_year - 1 + rel_dow_jan1) / 7;
        if 7 - rel_dow_jan1 >= self.minimal_days_in_first_week {
            woy += 1;
        }
        let mut year_of_week = extended_year;

        if woy == 0 {
            let prev_doy = day_of_year + year_length(extended_year.saturating_sub(1))?;
            woy = self.week_number(prev_doy, day_of_week);
            year_of_week = year_of_week.saturating_sub(1);
        } else {
            let last_doy = year_length(extended_year)?;
            if day_of_year >= last_doy - 5 {
                let last_rel_dow = (rel_dow + last_doy - day_of_year).rem_euclid(7);
                if 6 - last_rel_dow >= self.minimal_days_in_first_week
                    && day_of_year + 7 - rel_dow > last_doy
                {
                    woy = 1;
                    year_of_week = year_of_week.saturating_add(1);
                }
            }
        }
        Ok((woy, year_of_week))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range() {
        assert!(WeekRule::new(0, 1).is_err());
        assert!(WeekRule::new(1, 8).is_err());
        assert_eq!(WeekRule::new(2, 4).ok(), Some(WeekRule::ISO));
    }

    #[test]
    fn local_dow_wraps() {
        let iso = WeekRule::ISO;
        assert_eq!(iso.local_day_of_week(weekday::MONDAY), 1);
        assert_eq!(iso.local_day_of_week(weekday::SUNDAY), 7);
        assert_eq!(WeekRule::US.local_day_of_week(weekday::SUNDAY), 1);
    }

    fn gregorian_len(y: i32) -> Result<i32, CalendarError> {
        let leap = y % 4 == 0 && (y % 100 != 0 || y % 400 == 0);
        Ok(if leap { 366 } else { 365 })
    }

    #[test]
    fn iso_week_at_year_boundary() {
        // 2021-01-01 is a Friday: ISO week 53 of 2020.
        let r = WeekRule::ISO.week_of_year(2021, 1, weekday::FRIDAY, gregorian_len);
        assert_eq!(r, Ok((53, 2020)));
        // 2024-12-30 is a Monday: ISO week 1 of 2025.
        let r = WeekRule::ISO.week_of_year(2024, 365, weekday::MONDAY, gregorian_len);
        assert_eq!(r, Ok((1, 2025)));
    }

    #[test]
    fn us_week_of_month() {
        // A month starting on Wednesday: the 1st is week 1, the 5th (Sunday) week 2.
        let us = WeekRule::US;
        assert_eq!(us.week_number(1, weekday::WEDNESDAY), 1);
        assert_eq!(us.week_number(5, weekday::SUNDAY), 2);
    }
}
