//! Field arithmetic: `add`, `roll` and `field_difference`.

use std::sync::Arc;

use almanac_time::{DAY_MS, HOUR_MS, MINUTE_MS, SECOND_MS, WEEK_MS};
use tracing::trace;

use super::Calendar;
use crate::config::WallTimeOption;
use crate::error::CalendarError;
use crate::field::Field;
use crate::zone::find_transition;

/// Year values below this wrap around when rolled; larger maxima pin.
const ROLL_WRAP_LIMIT: i32 = 32_768;

impl Calendar {
    /// Add a signed amount to a field, carrying into larger fields.
    ///
    /// Adding to a date field keeps the wall-clock time of day where the
    /// zone allows it; a skipped result follows the skipped-wall-time
    /// option.
    pub fn add(&mut self, field: Field, amount: i32) -> Result<(), CalendarError> {
        if amount == 0 {
            return Ok(());
        }
        let family = Arc::clone(&self.family);
        if family.add(self, field, amount)? {
            return Ok(());
        }

        let mut amount = amount;
        let mut keep_wall_time = true;
        let unit = match field {
            Field::Era => {
                let era = self.get(Field::Era)?;
                self.set(Field::Era, add_i32(era, amount, "add era")?);
                return self.pin_field(Field::Era);
            }
            Field::Year | Field::YearWoy | Field::ExtendedYear | Field::Month => {
                if matches!(field, Field::Year | Field::YearWoy)
                    && self.get(Field::Era)? == 0
                    && self.kind().era_zero_runs_backward()
                {
                    amount = amount.checked_neg().ok_or_else(|| CalendarError::overflow("add year"))?;
                }
                let old_lenient = self.lenient;
                self.lenient = true;
                let result = self.add_lenient_field(field, amount);
                if result.is_ok() && !old_lenient {
                    let completed = self.complete();
                    self.lenient = old_lenient;
                    return completed;
                }
                self.lenient = old_lenient;
                return result;
            }
            Field::WeekOfYear | Field::WeekOfMonth | Field::DayOfWeekInMonth => WEEK_MS,
            Field::AmPm => 12 * HOUR_MS,
            Field::DayOfMonth | Field::DayOfYear | Field::DayOfWeek | Field::DowLocal | Field::JulianDay => DAY_MS,
            Field::HourOfDay | Field::Hour => {
                keep_wall_time = false;
                HOUR_MS
            }
            Field::Minute => {
                keep_wall_time = false;
                MINUTE_MS
            }
            Field::Second => {
                keep_wall_time = false;
                SECOND_MS
            }
            Field::Millisecond | Field::MillisecondsInDay => {
                keep_wall_time = false;
                1
            }
            Field::ZoneOffset | Field::DstOffset | Field::IsLeapMonth => {
                return Err(CalendarError::UnsupportedField {
                    field,
                    operation: "add",
                });
            }
        };
        let delta = i64::from(amount) * unit;

        let (prev_wall, prev_offset) = if keep_wall_time {
            (self.get(Field::MillisecondsInDay)?, self.total_offset()?)
        } else {
            (0, 0)
        };
        let start = self.time_in_millis()?;
        let target = start.checked_add(delta).ok_or_else(|| CalendarError::overflow("add"))?;
        self.set_time_in_millis(target)?;
        if keep_wall_time {
            self.restore_wall_time(prev_wall, prev_offset)?;
        }
        Ok(())
    }

    fn add_lenient_field(&mut self, field: Field, amount: i32) -> Result<(), CalendarError> {
        let value = self.get(field)?;
        self.set(field, add_i32(value, amount, "add")?);
        self.pin_field(Field::DayOfMonth)
    }

    fn total_offset(&mut self) -> Result<i64, CalendarError> {
        Ok(i64::from(self.get(Field::ZoneOffset)?) + i64::from(self.get(Field::DstOffset)?))
    }

    /// After a day-or-longer jump across a zone transition, shift back to
    /// the original wall-clock time of day.
    fn restore_wall_time(&mut self, prev_wall: i32, prev_offset: i64) -> Result<(), CalendarError> {
        let mut new_wall = self.get(Field::MillisecondsInDay)?;
        if new_wall == prev_wall {
            return Ok(());
        }
        let t = self.time_in_millis()?;
        let new_offset = self.total_offset()?;
        if new_offset == prev_offset {
            return Ok(());
        }
        let adjust = (prev_offset - new_offset) % DAY_MS;
        if adjust != 0 {
            self.set_time_in_millis(t + adjust)?;
            new_wall = self.get(Field::MillisecondsInDay)?;
        }
        if new_wall != prev_wall {
            trace!(prev_wall, new_wall, "wall time skipped after add");
            match self.skipped_wall_time {
                WallTimeOption::Last => {
                    if adjust < 0 {
                        self.set_time_in_millis(t)?;
                    }
                }
                WallTimeOption::First => {
                    if adjust > 0 {
                        self.set_time_in_millis(t)?;
                    }
                }
                WallTimeOption::NextValid => {
                    let adjusted = if adjust > 0 { self.time_in_millis()? } else { t };
                    let transition = self.previous_transition(adjusted)?;
                    self.set_time_in_millis(transition)?;
                }
            }
        }
        Ok(())
    }

    /// Latest zone transition at or before `millis`, within two days.
    fn previous_transition(&self, millis: i64) -> Result<i64, CalendarError> {
        let zone = self.zone.as_ref();
        let earlier = millis - 2 * DAY_MS;
        if zone.offsets(earlier) == zone.offsets(millis) {
            return Err(CalendarError::NonexistentWallTime { wall_millis: millis });
        }
        Ok(find_transition(zone, earlier, millis))
    }

    /// Clamp a field to its actual range in the current context.
    pub(crate) fn pin_field(&mut self, field: Field) -> Result<(), CalendarError> {
        let max = self.actual_maximum(field)?;
        let min = self.actual_minimum(field)?;
        let value = self.internal_get(field);
        if value > max {
            self.set(field, max);
        } else if value < min {
            self.set(field, min);
        }
        Ok(())
    }

    /// Add to a field without changing larger fields; the value wraps
    /// within its actual range.
    pub fn roll(&mut self, field: Field, amount: i32) -> Result<(), CalendarError> {
        if amount == 0 {
            return Ok(());
        }
        self.complete()?;
        let family = Arc::clone(&self.family);
        if family.roll(self, field, amount)? {
            return Ok(());
        }
        let amount64 = i64::from(amount);

        match field {
            Field::DayOfMonth
            | Field::AmPm
            | Field::Minute
            | Field::Second
            | Field::Millisecond
            | Field::MillisecondsInDay
            | Field::Era => {
                let min = i64::from(self.actual_minimum(field)?);
                let max = i64::from(self.actual_maximum(field)?);
                let value = wrap(i64::from(self.internal_get(field)) + amount64, min, max - min + 1);
                self.set(field, value as i32);
            }
            Field::Hour | Field::HourOfDay => {
                let start = self.time_in_millis()?;
                let old = i64::from(self.internal_get(field));
                let span = i64::from(self.maximum(field)) + 1;
                let new = (old + amount64).rem_euclid(span);
                self.set_time_in_millis(start + HOUR_MS * (new - old))?;
            }
            Field::Month => {
                let span = i64::from(self.actual_maximum(Field::Month)?) + 1;
                let month = (i64::from(self.internal_get(Field::Month)) + amount64).rem_euclid(span);
                self.set(Field::Month, month as i32);
                self.pin_field(Field::DayOfMonth)?;
            }
            Field::Year | Field::YearWoy => {
                let era = self.get(Field::Era)?;
                let mut amount = amount64;
                let backward_era = era == 0 && self.kind().era_zero_runs_backward();
                if backward_era {
                    amount = -amount;
                }
                let mut year = i64::from(self.internal_get(field)) + amount;
                if era > 0 || year >= 1 {
                    let max_year = i64::from(self.actual_maximum(field)?);
                    if max_year < i64::from(ROLL_WRAP_LIMIT) {
                        if year < 1 {
                            year = max_year - (-year) % max_year;
                        } else if year > max_year {
                            year = (year - 1) % max_year + 1;
                        }
                    } else if year < 1 {
                        year = 1;
                    }
                } else if backward_era {
                    year = 1;
                }
                self.set(field, clamp_i32(year));
                self.pin_field(Field::Month)?;
                self.pin_field(Field::DayOfMonth)?;
            }
            Field::ExtendedYear => {
                let year = add_i32(self.internal_get(field), amount, "roll extended year")?;
                self.set(field, year);
                self.pin_field(Field::Month)?;
                self.pin_field(Field::DayOfMonth)?;
            }
            Field::WeekOfMonth => {
                let dom = i64::from(self.internal_get(Field::DayOfMonth));
                let month_length = i64::from(self.actual_maximum(Field::DayOfMonth)?);
                let day = self.roll_week(dom, month_length, amount64);
                self.set(Field::DayOfMonth, day as i32);
            }
            Field::WeekOfYear => {
                let doy = i64::from(self.internal_get(Field::DayOfYear));
                let year_length = i64::from(self.actual_maximum(Field::DayOfYear)?);
                let day = self.roll_week(doy, year_length, amount64);
                self.set(Field::DayOfYear, day as i32);
                self.clear_field(Field::Month);
            }
            Field::DayOfYear => {
                let time = self.time_in_millis()?;
                let year_start = time - (i64::from(self.internal_get(Field::DayOfYear)) - 1) * DAY_MS;
                let span = i64::from(self.actual_maximum(Field::DayOfYear)?) * DAY_MS;
                self.set_time_in_millis(year_start + wrap(time + amount64 * DAY_MS - year_start, 0, span))?;
            }
            Field::DayOfWeek | Field::DowLocal => {
                let time = self.time_in_millis()?;
                let first = if field == Field::DayOfWeek { self.first_day_of_week() } else { 1 };
                let lead_days = i64::from(self.internal_get(field) - first).rem_euclid(7);
                let week_start = time - lead_days * DAY_MS;
                self.set_time_in_millis(week_start + wrap(time + amount64 * DAY_MS - week_start, 0, WEEK_MS))?;
            }
            Field::DayOfWeekInMonth => {
                let time = self.time_in_millis()?;
                let dom = i64::from(self.internal_get(Field::DayOfMonth));
                let pre_weeks = (dom - 1) / 7;
                let post_weeks = (i64::from(self.actual_maximum(Field::DayOfMonth)?) - dom) / 7;
                let first = time - pre_weeks * WEEK_MS;
                let span = WEEK_MS * (pre_weeks + post_weeks + 1);
                self.set_time_in_millis(first + wrap(time + amount64 * WEEK_MS - first, 0, span))?;
            }
            Field::JulianDay => {
                let jd = add_i32(self.internal_get(field), amount, "roll julian day")?;
                self.set(field, jd);
            }
            Field::ZoneOffset | Field::DstOffset | Field::IsLeapMonth => {
                return Err(CalendarError::UnsupportedField {
                    field,
                    operation: "roll",
                });
            }
        }
        Ok(())
    }

    /// Day of the period after rolling by `amount` weeks, staying inside
    /// the weeks that overlap the period.
    fn roll_week(&self, day: i64, period_length: i64, amount: i64) -> i64 {
        let dow = i64::from(self.internal_get(Field::DayOfWeek) - self.first_day_of_week()).rem_euclid(7);
        let first_dow = (dow - day + 1).rem_euclid(7);
        let start = if 7 - first_dow < i64::from(self.minimal_days_in_first_week()) {
            8 - first_dow
        } else {
            1 - first_dow
        };
        let last_dow = (period_length - day + dow).rem_euclid(7);
        let limit = period_length + 7 - last_dow;
        let gap = limit - start;
        let rolled = wrap(day + amount * 7 - start, 0, gap) + start;
        rolled.clamp(1, period_length)
    }

    /// Whole units of `field` from this calendar's instant toward
    /// `target`, leaving the calendar advanced by that many units.
    pub fn field_difference(&mut self, target: i64, field: Field) -> Result<i32, CalendarError> {
        let start = self.time_in_millis()?;
        let mut min: i32 = 0;
        if start < target {
            let mut max: i32 = 1;
            loop {
                self.set_time_in_millis(start)?;
                self.add(field, max)?;
                let ms = self.time_in_millis()?;
                if ms == target {
                    return Ok(max);
                } else if ms > target {
                    break;
                } else if max < i32::MAX {
                    min = max;
                    max = max.checked_mul(2).unwrap_or(i32::MAX);
                } else {
                    return Err(CalendarError::overflow("field difference"));
                }
            }
            while min < max - 1 {
                let t = min + (max - min) / 2;
                self.set_time_in_millis(start)?;
                self.add(field, t)?;
                let ms = self.time_in_millis()?;
                if ms == target {
                    return Ok(t);
                } else if ms > target {
                    max = t;
                } else {
                    min = t;
                }
            }
        } else if start > target {
            let mut max: i32 = -1;
            loop {
                self.set_time_in_millis(start)?;
                self.add(field, max)?;
                let ms = self.time_in_millis()?;
                if ms == target {
                    return Ok(max);
                } else if ms < target {
                    break;
                } else if max > i32::MIN + 1 {
                    min = max;
                    max = max.checked_mul(2).unwrap_or(i32::MIN + 1);
                } else {
                    return Err(CalendarError::overflow("field difference"));
                }
            }
            while min > max + 1 {
                let t = min + (max - min) / 2;
                self.set_time_in_millis(start)?;
                self.add(field, t)?;
                let ms = self.time_in_millis()?;
                if ms == target {
                    return Ok(t);
                } else if ms < target {
                    max = t;
                } else {
                    min = t;
                }
            }
        }
        self.set_time_in_millis(start)?;
        self.add(field, min)?;
        Ok(min)
    }
}

fn add_i32(value: i32, amount: i32, operation: &'static str) -> Result<i32, CalendarError> {
    value.checked_add(amount).ok_or_else(|| CalendarError::overflow(operation))
}

fn clamp_i32(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// `value - min` reduced into `[0, span)`, plus `min`.
fn wrap(value: i64, min: i64, span: i64) -> i64 {
    (value - min).rem_euclid(span) + min
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CalendarConfig, CalendarKind};
    use crate::field::month;
    use crate::zone::{FixedZone, TimeZone, TransitionZone};

    fn cal(kind: CalendarKind, zone: Arc<dyn TimeZone>) -> Calendar {
        Calendar::at(CalendarConfig::new(kind), zone, 0).unwrap()
    }

    fn gregorian() -> Calendar {
        cal(CalendarKind::Gregorian, Arc::new(FixedZone::utc()))
    }

    #[test]
    fn add_month_pins_day() {
        let mut c = gregorian();
        c.set_date(2024, month::JANUARY, 31);
        c.add(Field::Month, 1).unwrap();
        assert_eq!(c.get(Field::Month).unwrap(), month::FEBRUARY);
        assert_eq!(c.get(Field::DayOfMonth).unwrap(), 29);
    }

    #[test]
    fn month_and_year_steps_pin_to_month_end() {
        let mut c = gregorian();
        c.set_date(2023, month::JANUARY, 31);
        c.add(Field::Month, 1).unwrap();
        assert_eq!(
            (c.get(Field::Year).unwrap(), c.get(Field::Month).unwrap(), c.get(Field::DayOfMonth).unwrap()),
            (2023, month::FEBRUARY, 28)
        );
        // Pinning is one-way: stepping back does not restore the 31st.
        c.add(Field::Month, -1).unwrap();
        assert_eq!(c.get(Field::Month).unwrap(), month::JANUARY);
        assert_eq!(c.get(Field::DayOfMonth).unwrap(), 28);

        c.set_date(2023, month::MARCH, 31);
        c.roll(Field::Month, 1).unwrap();
        assert_eq!(c.get(Field::Month).unwrap(), month::APRIL);
        assert_eq!(c.get(Field::DayOfMonth).unwrap(), 30);

        c.set_date(2024, month::FEBRUARY, 29);
        c.add(Field::Year, 1).unwrap();
        assert_eq!(
            (c.get(Field::Year).unwrap(), c.get(Field::Month).unwrap(), c.get(Field::DayOfMonth).unwrap()),
            (2025, month::FEBRUARY, 28)
        );
        c.set_date(2024, month::FEBRUARY, 29);
        c.roll(Field::Year, 1).unwrap();
        assert_eq!(c.get(Field::Month).unwrap(), month::FEBRUARY);
        assert_eq!(c.get(Field::DayOfMonth).unwrap(), 28);
    }

    #[test]
    fn add_year_in_bc_runs_backward() {
        let mut c = gregorian();
        c.set(Field::Era, 0);
        c.set(Field::Year, 5);
        c.add(Field::Year, 1).unwrap();
        assert_eq!(c.get(Field::Year).unwrap(), 4);
        assert_eq!(c.get(Field::Era).unwrap(), 0);
    }

    #[test]
    fn add_day_keeps_wall_time_across_apia_jump() {
        let mut c = cal(CalendarKind::Gregorian, Arc::new(TransitionZone::pacific_apia()));
        c.clear();
        c.set_date_time(2011, month::DECEMBER, 29, 0, 0, 0);
        c.add(Field::DayOfMonth, 1).unwrap();
        assert_eq!(c.get(Field::DayOfMonth).unwrap(), 31);
        assert_eq!(c.get(Field::HourOfDay).unwrap(), 0);
    }

    #[test]
    fn roll_does_not_carry() {
        let mut c = gregorian();
        c.set_date(2024, month::DECEMBER, 31);
        c.roll(Field::DayOfMonth, 1).unwrap();
        assert_eq!(c.get(Field::DayOfMonth).unwrap(), 1);
        assert_eq!(c.get(Field::Month).unwrap(), month::DECEMBER);
        c.roll(Field::Month, 2).unwrap();
        assert_eq!(c.get(Field::Month).unwrap(), month::FEBRUARY);
        assert_eq!(c.get(Field::Year).unwrap(), 2024);
        c.roll(Field::HourOfDay, -1).unwrap();
        assert_eq!(c.get(Field::HourOfDay).unwrap(), 23);
        assert_eq!(c.get(Field::DayOfMonth).unwrap(), 1);
    }

    #[test]
    fn roll_week_of_year_stays_in_year() {
        let mut c = gregorian();
        c.set_date(2024, month::DECEMBER, 30);
        c.roll(Field::WeekOfYear, 1).unwrap();
        assert_eq!(c.get(Field::Year).unwrap(), 2024);
    }

    #[test]
    fn unsupported_fields() {
        let mut c = gregorian();
        assert!(matches!(
            c.add(Field::ZoneOffset, 1),
            Err(CalendarError::UnsupportedField { .. })
        ));
        assert!(c.roll(Field::DstOffset, 1).is_err());
    }

    #[test]
    fn difference_in_months_and_days() {
        let mut c = gregorian();
        c.set_date(2000, month::JANUARY, 31);
        let mut target = gregorian();
        target.set_date(2001, month::MARCH, 15);
        let target = target.time_in_millis().unwrap();
        assert_eq!(c.field_difference(target, Field::Month).unwrap(), 13);
        assert_eq!(c.get(Field::Month).unwrap(), month::FEBRUARY);
        assert_eq!(c.field_difference(target, Field::DayOfMonth).unwrap(), 15);
        assert_eq!(c.time_in_millis().unwrap(), target);

        let mut back = gregorian();
        back.set_date(2001, month::MARCH, 15);
        let mut start = gregorian();
        start.set_date(2000, month::JANUARY, 1);
        let start = start.time_in_millis().unwrap();
        assert_eq!(back.field_difference(start, Field::Year).unwrap(), -1);
    }
}
