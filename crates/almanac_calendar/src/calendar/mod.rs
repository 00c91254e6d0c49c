//! The calendar façade.
//!
//! A [`Calendar`] holds one instant and the fields describing it in a
//! calendar family, time zone and week rule. Setting a field marks the
//! instant stale; reading any field recomputes whichever side is stale.
//! Field conflicts are settled by recency: the most recently set
//! combination of fields that determines a date wins.

mod actual;
mod arith;

use std::cmp::Ordering;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use almanac_time::{
    DAY_MS, EPOCH_JULIAN_DAY, GregorianCutover, check_instant, day_of_week, floor_div_rem,
    pin_instant,
};
use tracing::{debug, trace, warn};

use crate::config::{CalendarConfig, CalendarKind, WallTimeOption};
use crate::error::CalendarError;
use crate::family::{CalendarFamily, IslamicMethod, family_for, to_field};
use crate::field::{Field, FieldSet, UNSET, weekday};
use crate::resolve::{Resolved, compute_julian_day, validate_fields};
use crate::week::WeekRule;
use crate::zone::{FixedZone, TimeZone, find_transition};

/// A calendar bound to an instant, a family, a zone and a week rule.
///
/// Cloning gives an independent calendar; the family and zone are
/// immutable and shared.
#[derive(Debug, Clone)]
pub struct Calendar {
    fields: FieldSet,
    time: i64,
    is_time_set: bool,
    are_fields_set: bool,
    lenient: bool,
    week_rule: WeekRule,
    repeated_wall_time: WallTimeOption,
    skipped_wall_time: WallTimeOption,
    zone: Arc<dyn TimeZone>,
    family: Arc<dyn CalendarFamily>,
}

fn now_millis() -> i64 {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(d) => i64::try_from(d.as_millis()).unwrap_or(i64::MAX),
        Err(e) => i64::try_from(e.duration().as_millis()).map_or(i64::MIN, |ms| -ms),
    }
}

impl Calendar {
    /// Calendar of `kind` in UTC, set to the current time.
    pub fn new(kind: CalendarKind) -> Result<Self, CalendarError> {
        Self::with_config(CalendarConfig::new(kind), Arc::new(FixedZone::utc()))
    }

    /// Calendar built from `config` in `zone`, set to the current time.
    pub fn with_config(config: CalendarConfig, zone: Arc<dyn TimeZone>) -> Result<Self, CalendarError> {
        Self::at(config, zone, now_millis())
    }

    /// Calendar built from `config` in `zone`, set to `millis`.
    pub fn at(config: CalendarConfig, zone: Arc<dyn TimeZone>, millis: i64) -> Result<Self, CalendarError> {
        config.validate()?;
        let mut cal = Self {
            fields: FieldSet::default(),
            time: 0,
            is_time_set: false,
            are_fields_set: false,
            lenient: config.lenient,
            week_rule: config.week_rule,
            repeated_wall_time: config.repeated_wall_time,
            skipped_wall_time: config.skipped_wall_time,
            zone,
            family: family_for(&config),
        };
        cal.set_time_in_millis(millis)?;
        Ok(cal)
    }

    pub fn kind(&self) -> CalendarKind {
        self.family.kind()
    }

    // ---- fields ----

    /// Value of `field`, recomputing stale state first.
    pub fn get(&mut self, field: Field) -> Result<i32, CalendarError> {
        self.complete()?;
        Ok(self.fields.get(field))
    }

    /// Set `field`. The instant is recomputed on the next read.
    pub fn set(&mut self, field: Field, value: i32) {
        self.fields.set(field, value);
        self.is_time_set = false;
        self.are_fields_set = false;
    }

    /// Set year, zero-based month and day of month.
    pub fn set_date(&mut self, year: i32, month: i32, day_of_month: i32) {
        self.set(Field::Year, year);
        self.set(Field::Month, month);
        self.set(Field::DayOfMonth, day_of_month);
    }

    /// Set the date plus hour of day, minute and second.
    pub fn set_date_time(&mut self, year: i32, month: i32, day_of_month: i32, hour: i32, minute: i32, second: i32) {
        self.set_date(year, month, day_of_month);
        self.set(Field::HourOfDay, hour);
        self.set(Field::Minute, minute);
        self.set(Field::Second, second);
    }

    /// Unset every field. The instant is lost until fields are set again.
    pub fn clear(&mut self) {
        self.fields.clear();
        self.is_time_set = false;
        self.are_fields_set = false;
    }

    pub fn clear_field(&mut self, field: Field) {
        self.fields.clear_field(field);
        self.is_time_set = false;
        self.are_fields_set = false;
    }

    pub fn is_set(&self, field: Field) -> bool {
        self.fields.is_set(field)
    }

    /// Raw field value without recomputation.
    pub(crate) fn internal_get(&self, field: Field) -> i32 {
        self.fields.get(field)
    }

    // ---- instant ----

    /// Milliseconds since 1970-01-01T00:00Z, resolving fields if needed.
    pub fn time_in_millis(&mut self) -> Result<i64, CalendarError> {
        self.update_time()?;
        Ok(self.time)
    }

    /// Move to `millis`. Out-of-range instants are pinned in lenient mode
    /// and rejected in strict mode.
    pub fn set_time_in_millis(&mut self, millis: i64) -> Result<(), CalendarError> {
        let millis = if self.lenient {
            let pinned = pin_instant(millis);
            if pinned != millis {
                warn!(millis, pinned, "instant outside supported range, pinned");
            }
            pinned
        } else {
            check_instant(millis)?
        };
        self.time = millis;
        self.is_time_set = true;
        self.fields.clear();
        self.are_fields_set = false;
        self.compute_fields()?;
        self.are_fields_set = true;
        Ok(())
    }

    /// Instant of this calendar without mutating it.
    pub fn instant(&self) -> Result<i64, CalendarError> {
        if self.is_time_set {
            Ok(self.time)
        } else {
            self.clone().time_in_millis()
        }
    }

    pub fn after(&self, other: &Calendar) -> Result<bool, CalendarError> {
        Ok(self.instant()? > other.instant()?)
    }

    pub fn before(&self, other: &Calendar) -> Result<bool, CalendarError> {
        Ok(self.instant()? < other.instant()?)
    }

    /// Bring both the instant and every field up to date.
    pub fn complete(&mut self) -> Result<(), CalendarError> {
        self.update_time()?;
        if !self.are_fields_set {
            self.compute_fields()?;
            self.are_fields_set = true;
        }
        Ok(())
    }

    fn update_time(&mut self) -> Result<(), CalendarError> {
        if !self.is_time_set {
            self.compute_time()?;
            self.is_time_set = true;
            self.are_fields_set = false;
        }
        Ok(())
    }

    // ---- settings ----

    pub fn is_lenient(&self) -> bool {
        self.lenient
    }

    pub fn set_lenient(&mut self, lenient: bool) {
        self.lenient = lenient;
    }

    pub fn repeated_wall_time(&self) -> WallTimeOption {
        self.repeated_wall_time
    }

    /// Accepts `First` or `Last`.
    pub fn set_repeated_wall_time(&mut self, option: WallTimeOption) -> Result<(), CalendarError> {
        if option == WallTimeOption::NextValid {
            return Err(CalendarError::Configuration(
                "repeated wall time accepts First or Last only".into(),
            ));
        }
        self.repeated_wall_time = option;
        Ok(())
    }

    pub fn skipped_wall_time(&self) -> WallTimeOption {
        self.skipped_wall_time
    }

    pub fn set_skipped_wall_time(&mut self, option: WallTimeOption) {
        self.skipped_wall_time = option;
    }

    pub fn time_zone(&self) -> &Arc<dyn TimeZone> {
        &self.zone
    }

    /// Switch zones. Fields are recomputed for the same instant.
    pub fn set_time_zone(&mut self, zone: Arc<dyn TimeZone>) {
        self.zone = zone;
        self.are_fields_set = false;
    }

    pub fn week_rule(&self) -> WeekRule {
        self.week_rule
    }

    pub fn first_day_of_week(&self) -> i32 {
        self.week_rule.first_day_of_week()
    }

    pub fn set_first_day_of_week(&mut self, day: i32) -> Result<(), CalendarError> {
        self.set_week_rule(WeekRule::new(day, self.week_rule.minimal_days_in_first_week())?);
        Ok(())
    }

    pub fn minimal_days_in_first_week(&self) -> i32 {
        self.week_rule.minimal_days_in_first_week()
    }

    /// Values outside 1..=7 are clamped.
    pub fn set_minimal_days_in_first_week(&mut self, days: i32) -> Result<(), CalendarError> {
        self.set_week_rule(WeekRule::new(self.week_rule.first_day_of_week(), days.clamp(1, 7))?);
        Ok(())
    }

    pub fn set_week_rule(&mut self, rule: WeekRule) {
        if rule != self.week_rule {
            self.week_rule = rule;
            self.are_fields_set = false;
        }
    }

    /// Instant of the Julian/Gregorian switch, for families that have one.
    pub fn gregorian_change(&self) -> Option<i64> {
        self.family.cutover().map(|c| c.millis())
    }

    pub fn set_gregorian_change(&mut self, millis: i64) -> Result<(), CalendarError> {
        let family = self
            .family
            .with_cutover(GregorianCutover::new(millis))
            .ok_or_else(|| CalendarError::Configuration(format!("{} has no Gregorian cutover", self.kind())))?;
        self.swap_family(family)
    }

    pub fn islamic_method(&self) -> Option<IslamicMethod> {
        self.family.islamic_method()
    }

    pub fn is_amete_alem(&self) -> bool {
        self.family.is_amete_alem()
    }

    /// Switch Ethiopic era numbering between Amete Mihret and Amete Alem.
    pub fn set_amete_alem(&mut self, on: bool) -> Result<(), CalendarError> {
        let family = self
            .family
            .with_amete_alem(on)
            .ok_or_else(|| CalendarError::Configuration(format!("{} has no Amete Alem era", self.kind())))?;
        self.swap_family(family)
    }

    fn swap_family(&mut self, family: Arc<dyn CalendarFamily>) -> Result<(), CalendarError> {
        let millis = self.time_in_millis()?;
        self.family = family;
        self.set_time_in_millis(millis)
    }

    // ---- derived queries ----

    /// Whether the current extended year is a leap year of the family.
    pub fn is_leap_year(&mut self) -> Result<bool, CalendarError> {
        let year = self.get(Field::ExtendedYear)?;
        self.family.is_leap_year(i64::from(year))
    }

    /// Saturday or Sunday.
    pub fn is_weekend(&mut self) -> Result<bool, CalendarError> {
        let dow = self.get(Field::DayOfWeek)?;
        Ok(dow == weekday::SATURDAY || dow == weekday::SUNDAY)
    }

    /// Number of weeks in the current week-numbering year.
    pub fn weeks_in_week_year(&mut self) -> Result<i32, CalendarError> {
        let year_woy = self.get(Field::YearWoy)?;
        let start = self.week_year_start(year_woy)?;
        let next = self.week_year_start(year_woy.checked_add(1).ok_or_else(|| CalendarError::overflow("week year"))?)?;
        to_field((next - start) / 7, "weeks in week year")
    }

    fn week_year_start(&self, year_woy: i32) -> Result<i64, CalendarError> {
        let mut work = self.clone();
        work.lenient = true;
        work.set(Field::YearWoy, year_woy);
        work.set(Field::WeekOfYear, 1);
        work.set(Field::DayOfWeek, self.week_rule.first_day_of_week());
        Ok(i64::from(work.get(Field::JulianDay)?))
    }

    // ---- conversion ----

    /// Resolve the fields into an instant.
    fn compute_time(&mut self) -> Result<(), CalendarError> {
        let family = Arc::clone(&self.family);
        if !self.lenient {
            validate_fields(family.as_ref(), &self.fields, self.week_rule)?;
        }
        let resolved = compute_julian_day(family.as_ref(), &mut self.fields, self.week_rule)?;
        trace!(best = ?resolved.best, julian_day = resolved.julian_day, "resolved date fields");

        let day_start = (resolved.julian_day - EPOCH_JULIAN_DAY)
            .checked_mul(DAY_MS)
            .ok_or_else(|| CalendarError::overflow("julian day to millis"))?;
        let wall = day_start
            .checked_add(self.millis_in_day())
            .ok_or_else(|| CalendarError::overflow("wall time"))?;

        let user_offset = self.fields.is_user_set(Field::ZoneOffset) || self.fields.is_user_set(Field::DstOffset);
        let time = if user_offset {
            let offset = i64::from(self.fields.get(Field::ZoneOffset)) + i64::from(self.fields.get(Field::DstOffset));
            wall - offset
        } else {
            self.resolve_wall_time(wall)?
        };
        let time = check_instant(time)?;

        if !self.lenient {
            self.check_resolved(resolved)?;
        }
        self.time = time;
        Ok(())
    }

    /// Milliseconds into the local day from the time-of-day fields.
    fn millis_in_day(&self) -> i64 {
        let f = &self.fields;
        let time_fields = [
            Field::AmPm,
            Field::Hour,
            Field::HourOfDay,
            Field::Minute,
            Field::Second,
            Field::Millisecond,
        ];
        if f.is_user_set(Field::MillisecondsInDay)
            && f.newest_stamp(&time_fields, UNSET) <= f.stamp(Field::MillisecondsInDay)
        {
            return i64::from(f.get(Field::MillisecondsInDay));
        }

        let hour_of_day_stamp = f.stamp(Field::HourOfDay);
        let hour_stamp = f.stamp(Field::Hour).max(f.stamp(Field::AmPm));
        let best = hour_stamp.max(hour_of_day_stamp);
        let mut millis = 0;
        if best != UNSET {
            millis = if best == hour_of_day_stamp {
                i64::from(f.get(Field::HourOfDay))
            } else {
                i64::from(f.get(Field::Hour)) + 12 * i64::from(f.get(Field::AmPm))
            };
        }
        millis = millis * 60 + i64::from(f.get(Field::Minute));
        millis = millis * 60 + i64::from(f.get(Field::Second));
        millis * 1000 + i64::from(f.get(Field::Millisecond))
    }

    /// UTC instant for a local wall time, applying the repeated and
    /// skipped wall-time options around zone transitions.
    fn resolve_wall_time(&self, wall: i64) -> Result<i64, CalendarError> {
        let zone = self.zone.as_ref();
        let offset_at = |millis: i64| zone.offsets(millis).total();
        let valid = |offset: i64| offset_at(wall - offset) == offset;

        let early = offset_at(wall - DAY_MS);
        let late = offset_at(wall + DAY_MS);
        let (before, after) = (wall - early, wall - late);
        match (valid(early), valid(late)) {
            (true, true) if before != after => {
                let (first, last) = (before.min(after), before.max(after));
                Ok(match self.repeated_wall_time {
                    WallTimeOption::First => first,
                    WallTimeOption::Last | WallTimeOption::NextValid => last,
                })
            }
            (true, _) => Ok(before),
            (_, true) => Ok(after),
            (false, false) => {
                let landed = offset_at(before);
                if valid(landed) {
                    return Ok(wall - landed);
                }
                if !self.lenient {
                    return Err(CalendarError::NonexistentWallTime { wall_millis: wall });
                }
                let (first, last) = (before.min(after), before.max(after));
                let resolved = match self.skipped_wall_time {
                    WallTimeOption::First => first,
                    WallTimeOption::Last => last,
                    WallTimeOption::NextValid => find_transition(zone, first, last),
                };
                debug!(wall, resolved, option = ?self.skipped_wall_time, "resolved skipped wall time");
                Ok(resolved)
            }
        }
    }

    /// Strict mode: the fields that chose the day must survive the round
    /// trip unchanged.
    fn check_resolved(&self, resolved: Resolved) -> Result<(), CalendarError> {
        let checked: &[Field] = match resolved.best {
            Some(Field::DayOfMonth) => &[
                Field::Era,
                Field::Year,
                Field::ExtendedYear,
                Field::IsLeapMonth,
                Field::Month,
                Field::DayOfMonth,
            ],
            Some(Field::DayOfYear) => &[Field::Era, Field::Year, Field::ExtendedYear, Field::DayOfYear],
            _ => return Ok(()),
        };
        let mut derived = FieldSet::default();
        self.family.compute_fields(resolved.julian_day, &mut derived)?;
        for &field in checked {
            let value = self.fields.get(field);
            if self.fields.is_user_set(field) && value != derived.get(field) {
                return Err(CalendarError::Validation {
                    field,
                    value,
                    min: self.minimum(field),
                    max: self.maximum(field),
                });
            }
        }
        Ok(())
    }

    /// Derive every field from the instant.
    fn compute_fields(&mut self) -> Result<(), CalendarError> {
        let offsets = self.zone.offsets(self.time);
        let local = self
            .time
            .checked_add(offsets.total())
            .ok_or_else(|| CalendarError::overflow("local time"))?;
        let (days, millis_in_day) = floor_div_rem(local, DAY_MS);
        let jd = days + EPOCH_JULIAN_DAY;
        let rule = self.week_rule;
        let family = Arc::clone(&self.family);
        let fields = &mut self.fields;

        let dow = day_of_week(jd);
        fields.set_internal(Field::JulianDay, to_field(jd, "julian day")?);
        fields.set_internal(Field::DayOfWeek, dow);
        fields.set_internal(Field::DowLocal, rule.local_day_of_week(dow));
        family.compute_fields(jd, fields)?;

        let (woy, year_woy) = rule.week_of_year(
            fields.get(Field::ExtendedYear),
            fields.get(Field::DayOfYear),
            dow,
            |year| family.year_length(i64::from(year)),
        )?;
        let dom = fields.get(Field::DayOfMonth);
        fields.set_internal(Field::WeekOfYear, woy);
        fields.set_internal(Field::YearWoy, year_woy);
        fields.set_internal(Field::WeekOfMonth, rule.week_number(dom, dow));
        fields.set_internal(Field::DayOfWeekInMonth, (dom - 1) / 7 + 1);

        let ms = millis_in_day as i32;
        fields.set_internal(Field::MillisecondsInDay, ms);
        fields.set_internal(Field::Millisecond, ms % 1000);
        let seconds = ms / 1000;
        fields.set_internal(Field::Second, seconds % 60);
        let minutes = seconds / 60;
        fields.set_internal(Field::Minute, minutes % 60);
        let hours = minutes / 60;
        fields.set_internal(Field::HourOfDay, hours);
        fields.set_internal(Field::AmPm, hours / 12);
        fields.set_internal(Field::Hour, hours % 12);
        fields.set_internal(Field::ZoneOffset, offsets.raw);
        fields.set_internal(Field::DstOffset, offsets.dst);
        fields.mark_all_internal();
        Ok(())
    }
}

/// Calendars compare by instant. Calendars whose fields do not resolve
/// are unequal to everything.
impl PartialEq for Calendar {
    fn eq(&self, other: &Self) -> bool {
        matches!((self.instant(), other.instant()), (Ok(a), Ok(b)) if a == b)
    }
}

impl PartialOrd for Calendar {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self.instant(), other.instant()) {
            (Ok(a), Ok(b)) => Some(a.cmp(&b)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::month;
    use crate::zone::TransitionZone;
    use almanac_time::HOUR_MS;

    fn gregorian(millis: i64) -> Calendar {
        Calendar::at(CalendarConfig::default(), Arc::new(FixedZone::utc()), millis).unwrap()
    }

    #[test]
    fn epoch_fields() {
        let mut cal = gregorian(0);
        assert_eq!(cal.get(Field::Year).unwrap(), 1970);
        assert_eq!(cal.get(Field::Month).unwrap(), month::JANUARY);
        assert_eq!(cal.get(Field::DayOfMonth).unwrap(), 1);
        assert_eq!(cal.get(Field::DayOfWeek).unwrap(), weekday::THURSDAY);
        assert_eq!(cal.get(Field::JulianDay).unwrap(), EPOCH_JULIAN_DAY as i32);
        assert_eq!(cal.get(Field::WeekOfYear).unwrap(), 1);
    }

    #[test]
    fn set_then_read_back() {
        let mut cal = gregorian(0);
        cal.clear();
        cal.set_date_time(1997, month::OCTOBER, 1, 13, 45, 30);
        let millis = cal.time_in_millis().unwrap();
        assert_eq!(millis, 875_713_530_000);
        assert_eq!(cal.get(Field::Hour).unwrap(), 1);
        assert_eq!(cal.get(Field::AmPm).unwrap(), 1);
    }

    #[test]
    fn hour_and_am_pm_beat_older_hour_of_day() {
        let mut cal = gregorian(0);
        cal.set(Field::HourOfDay, 5);
        cal.set(Field::Hour, 3);
        cal.set(Field::AmPm, 1);
        assert_eq!(cal.get(Field::HourOfDay).unwrap(), 15);
    }

    #[test]
    fn user_zone_offset_wins() {
        let mut cal = gregorian(0);
        cal.set(Field::ZoneOffset, (2 * HOUR_MS) as i32);
        cal.set(Field::DstOffset, 0);
        assert_eq!(cal.time_in_millis().unwrap(), -2 * HOUR_MS);
    }

    #[test]
    fn skipped_wall_time_options() {
        // 2011-12-30 did not exist in Apia.
        let zone: Arc<dyn TimeZone> = Arc::new(TransitionZone::pacific_apia());
        let mut cal = Calendar::at(CalendarConfig::default(), zone, 0).unwrap();
        cal.clear();
        cal.set_date_time(2011, month::DECEMBER, 30, 12, 0, 0);
        assert_eq!(cal.get(Field::DayOfMonth).unwrap(), 31);

        cal.set_skipped_wall_time(WallTimeOption::First);
        cal.clear();
        cal.set_date_time(2011, month::DECEMBER, 30, 12, 0, 0);
        assert_eq!(cal.get(Field::DayOfMonth).unwrap(), 29);

        cal.set_skipped_wall_time(WallTimeOption::NextValid);
        cal.clear();
        cal.set_date_time(2011, month::DECEMBER, 30, 12, 0, 0);
        assert_eq!(cal.time_in_millis().unwrap(), 1_325_239_200_000);

        cal.set_lenient(false);
        cal.clear();
        cal.set_date_time(2011, month::DECEMBER, 30, 12, 0, 0);
        assert!(matches!(cal.time_in_millis(), Err(CalendarError::NonexistentWallTime { .. })));
    }

    #[test]
    fn strict_rejects_overflowing_day() {
        let mut cal = gregorian(0);
        cal.set_lenient(false);
        cal.set(Field::DayOfMonth, 32);
        assert!(matches!(
            cal.time_in_millis(),
            Err(CalendarError::Validation { field: Field::DayOfMonth, .. })
        ));
    }

    #[test]
    fn lenient_pins_out_of_range_instant() {
        let mut cal = gregorian(0);
        cal.set_time_in_millis(i64::MAX).unwrap();
        assert_eq!(cal.time_in_millis().unwrap(), almanac_time::MAX_MILLIS);
        cal.set_lenient(false);
        assert!(cal.set_time_in_millis(i64::MIN).is_err());
    }

    #[test]
    fn clones_are_independent() {
        let mut a = gregorian(0);
        let mut b = a.clone();
        b.set(Field::Year, 2000);
        assert_eq!(a.get(Field::Year).unwrap(), 1970);
        assert_eq!(b.get(Field::Year).unwrap(), 2000);
        assert!(b.after(&a).unwrap());
        assert!(a < b);
    }

    #[test]
    fn week_rule_changes_week_fields() {
        // 2021-01-01 is a Friday.
        let mut cal = gregorian(1_609_459_200_000);
        assert_eq!(cal.get(Field::WeekOfYear).unwrap(), 1);
        cal.set_week_rule(WeekRule::ISO);
        assert_eq!(cal.get(Field::WeekOfYear).unwrap(), 53);
        assert_eq!(cal.get(Field::YearWoy).unwrap(), 2020);
        assert_eq!(cal.weeks_in_week_year().unwrap(), 53);
    }

    #[test]
    fn family_switches() {
        let mut cal = gregorian(0);
        assert!(cal.set_amete_alem(true).is_err());
        assert_eq!(cal.gregorian_change(), Some(almanac_time::DEFAULT_CUTOVER_MILLIS));
        cal.set_gregorian_change(i64::MIN).unwrap();
        assert_eq!(cal.get(Field::Year).unwrap(), 1970);
        cal.set_date(1500, month::FEBRUARY, 1);
        assert!(!cal.is_leap_year().unwrap());
        cal.set_gregorian_change(i64::MAX).unwrap();
        assert!(cal.is_leap_year().unwrap());
    }

    #[test]
    fn strict_leap_month_error_names_the_leap_flag() {
        let config = CalendarConfig::new(CalendarKind::Chinese);
        let mut cal = Calendar::at(config, Arc::new(FixedZone::utc()), 0).unwrap();
        cal.set_lenient(false);
        cal.clear();
        // 4661 (2024) has no leap month.
        cal.set(Field::ExtendedYear, 4661);
        cal.set(Field::Month, 3);
        cal.set(Field::IsLeapMonth, 1);
        cal.set(Field::DayOfMonth, 1);
        assert!(matches!(
            cal.time_in_millis(),
            Err(CalendarError::Validation {
                field: Field::IsLeapMonth,
                value: 1,
                ..
            })
        ));
    }
}
