//! Field limits, absolute and in the calendar's current context.

use std::sync::Arc;

use super::Calendar;
use crate::error::CalendarError;
use crate::family::{LimitType, limit};
use crate::field::Field;

impl Calendar {
    fn limit(&self, field: Field, kind: LimitType) -> i32 {
        limit(self.family.as_ref(), field, kind, self.week_rule)
    }

    /// Smallest value of `field` in any context.
    pub fn minimum(&self, field: Field) -> i32 {
        self.limit(field, LimitType::Minimum)
    }

    /// Largest value of `field` in any context.
    pub fn maximum(&self, field: Field) -> i32 {
        self.limit(field, LimitType::Maximum)
    }

    pub fn greatest_minimum(&self, field: Field) -> i32 {
        self.limit(field, LimitType::GreatestMinimum)
    }

    pub fn least_maximum(&self, field: Field) -> i32 {
        self.limit(field, LimitType::LeastMaximum)
    }

    /// Smallest value `field` can take given the other current fields.
    pub fn actual_minimum(&mut self, field: Field) -> Result<i32, CalendarError> {
        match field {
            Field::DayOfWeek
            | Field::AmPm
            | Field::Hour
            | Field::HourOfDay
            | Field::Minute
            | Field::Second
            | Field::Millisecond
            | Field::ZoneOffset
            | Field::DstOffset
            | Field::DowLocal
            | Field::JulianDay
            | Field::MillisecondsInDay
            | Field::IsLeapMonth => Ok(self.minimum(field)),
            _ => self.actual_helper(field, self.greatest_minimum(field), self.minimum(field)),
        }
    }

    /// Largest value `field` can take given the other current fields.
    pub fn actual_maximum(&mut self, field: Field) -> Result<i32, CalendarError> {
        let family = Arc::clone(&self.family);
        if let Some(max) = family.actual_maximum(self, field)? {
            return Ok(max);
        }
        match field {
            Field::DayOfMonth => {
                let mut work = self.working_copy(field, false)?;
                let year = work.get(Field::ExtendedYear)?;
                let month = work.get(Field::Month)?;
                let leap = work.get(Field::IsLeapMonth)? == 1;
                family.month_length(i64::from(year), i64::from(month), leap)
            }
            Field::DayOfYear => {
                let mut work = self.working_copy(field, false)?;
                let year = work.get(Field::ExtendedYear)?;
                family.year_length(i64::from(year))
            }
            Field::DayOfWeek
            | Field::AmPm
            | Field::Hour
            | Field::HourOfDay
            | Field::Minute
            | Field::Second
            | Field::Millisecond
            | Field::ZoneOffset
            | Field::DstOffset
            | Field::DowLocal
            | Field::JulianDay
            | Field::MillisecondsInDay
            | Field::IsLeapMonth => Ok(self.maximum(field)),
            Field::Year if self.least_maximum(field) != self.maximum(field) => self.year_actual_maximum(),
            _ => self.actual_helper(field, self.least_maximum(field), self.maximum(field)),
        }
    }

    /// Lenient clone primed so that stepping `field` cannot overflow into
    /// a neighbouring field.
    ///
    /// Pending fields are not resolved first: an overflowed day such as
    /// 31 February must still be measured against February.
    fn working_copy(&self, field: Field, is_minimum: bool) -> Result<Calendar, CalendarError> {
        let mut work = self.clone();
        if work.is_time_set {
            work.complete()?;
        }
        work.lenient = true;
        work.prepare_get_actual(field, is_minimum)?;
        Ok(work)
    }

    fn prepare_get_actual(&mut self, field: Field, is_minimum: bool) -> Result<(), CalendarError> {
        self.set(Field::MillisecondsInDay, 0);
        match field {
            Field::Year | Field::ExtendedYear => {
                self.set(Field::DayOfYear, self.greatest_minimum(Field::DayOfYear));
            }
            Field::YearWoy => {
                self.set(Field::WeekOfYear, self.greatest_minimum(Field::WeekOfYear));
            }
            Field::Month => {
                self.set(Field::DayOfMonth, self.greatest_minimum(Field::DayOfMonth));
            }
            Field::DayOfWeekInMonth => {
                self.set(Field::DayOfMonth, 1);
                let dow = self.get(Field::DayOfWeek)?;
                self.set(Field::DayOfWeek, dow);
            }
            Field::WeekOfMonth | Field::WeekOfYear => {
                let mut dow = self.first_day_of_week();
                if is_minimum {
                    dow = (dow + 6) % 7;
                    if dow < 1 {
                        dow += 7;
                    }
                }
                self.set(Field::DayOfWeek, dow);
            }
            _ => {}
        }
        self.set(field, self.greatest_minimum(field));
        Ok(())
    }

    /// Walk `field` from `start` toward `end` one step at a time and
    /// return the last value that sticks.
    fn actual_helper(&mut self, field: Field, start: i32, end: i32) -> Result<i32, CalendarError> {
        if start == end {
            return Ok(start);
        }
        let delta = if end > start { 1 } else { -1 };
        let mut work = self.working_copy(field, delta < 0)?;
        work.set(field, start);
        if work.get(field)? != start && field != Field::WeekOfMonth && delta > 0 {
            return Ok(start);
        }
        let mut result = start;
        let mut value = start;
        loop {
            value += delta;
            work.add(field, delta)?;
            if work.get(field)? != value {
                break;
            }
            result = value;
            if value == end {
                break;
            }
        }
        Ok(result)
    }

    /// Largest YEAR in the current era, by bisection. Years whose
    /// instant cannot be represented count as out of range.
    fn year_actual_maximum(&mut self) -> Result<i32, CalendarError> {
        let mut work = self.working_copy(Field::Year, false)?;
        let era = work.get(Field::Era)?;
        let saved = work.time_in_millis()?;
        let mut low_good = self.greatest_minimum(Field::Year);
        let mut high_bad = self.maximum(Field::Year).saturating_add(1);
        while low_good + 1 < high_bad {
            let year = low_good + (high_bad - low_good) / 2;
            work.set(Field::Year, year);
            let good = matches!(work.get(Field::Year), Ok(y) if y == year)
                && matches!(work.get(Field::Era), Ok(e) if e == era);
            if good {
                low_good = year;
            } else {
                high_bad = year;
                work.set_time_in_millis(saved)?;
            }
        }
        Ok(low_good)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CalendarConfig, CalendarKind};
    use crate::field::month;
    use crate::zone::FixedZone;

    fn cal(kind: CalendarKind) -> Calendar {
        Calendar::at(CalendarConfig::new(kind), Arc::new(FixedZone::utc()), 0).unwrap()
    }

    #[test]
    fn february_lengths() {
        let mut c = cal(CalendarKind::Gregorian);
        c.set_date(2024, month::FEBRUARY, 10);
        assert_eq!(c.actual_maximum(Field::DayOfMonth).unwrap(), 29);
        c.set_date(2023, month::FEBRUARY, 10);
        assert_eq!(c.actual_maximum(Field::DayOfMonth).unwrap(), 28);
        assert_eq!(c.actual_maximum(Field::DayOfYear).unwrap(), 365);
        assert_eq!(c.actual_minimum(Field::DayOfMonth).unwrap(), 1);
    }

    #[test]
    fn week_limits() {
        let mut c = cal(CalendarKind::Gregorian);
        // 31 December 2022 is a Saturday, so its week stays in 2022.
        c.set_date(2022, month::JUNE, 15);
        assert_eq!(c.actual_maximum(Field::WeekOfYear).unwrap(), 53);
        c.set_date(2024, month::JUNE, 15);
        assert_eq!(c.actual_maximum(Field::WeekOfYear).unwrap(), 52);
        assert_eq!(c.actual_maximum(Field::DayOfWeekInMonth).unwrap(), 5);
        assert_eq!(c.maximum(Field::HourOfDay), 23);
    }

    #[test]
    fn gregorian_year_maximum_is_range_bound() {
        let mut c = cal(CalendarKind::Gregorian);
        let max = c.actual_maximum(Field::Year).unwrap();
        assert!(max >= c.least_maximum(Field::Year));
        assert!(max <= c.maximum(Field::Year));
    }

    #[test]
    fn islamic_month_lengths() {
        let mut c = cal(CalendarKind::IslamicCivil);
        c.set_date(1445, 11, 1);
        assert_eq!(c.actual_maximum(Field::DayOfMonth).unwrap(), 30);
        assert_eq!(c.actual_maximum(Field::DayOfYear).unwrap(), 355);
    }
}
