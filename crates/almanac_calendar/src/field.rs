//! Calendar fields and the staged field set.
//!
//! Every write carries a stamp from a per-instance logical clock. Field
//! resolution compares stamps to decide which group of fields was set most
//! recently.

use std::fmt::{Display, Formatter};

/// A calendar field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Era,
    Year,
    /// Zero-based month.
    Month,
    WeekOfYear,
    WeekOfMonth,
    DayOfMonth,
    DayOfYear,
    /// 1 = Sunday … 7 = Saturday.
    DayOfWeek,
    DayOfWeekInMonth,
    AmPm,
    Hour,
    HourOfDay,
    Minute,
    Second,
    Millisecond,
    ZoneOffset,
    DstOffset,
    YearWoy,
    DowLocal,
    ExtendedYear,
    JulianDay,
    MillisecondsInDay,
    IsLeapMonth,
}

/// Number of fields.
pub const FIELD_COUNT: usize = 23;

impl Field {
    /// All fields in index order.
    pub const ALL: [Field; FIELD_COUNT] = [
        Field::Era,
        Field::Year,
        Field::Month,
        Field::WeekOfYear,
        Field::WeekOfMonth,
        Field::DayOfMonth,
        Field::DayOfYear,
        Field::DayOfWeek,
        Field::DayOfWeekInMonth,
        Field::AmPm,
        Field::Hour,
        Field::HourOfDay,
        Field::Minute,
        Field::Second,
        Field::Millisecond,
        Field::ZoneOffset,
        Field::DstOffset,
        Field::YearWoy,
        Field::DowLocal,
        Field::ExtendedYear,
        Field::JulianDay,
        Field::MillisecondsInDay,
        Field::IsLeapMonth,
    ];

    /// Index into field arrays.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Canonical upper-case name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Era => "ERA",
            Self::Year => "YEAR",
            Self::Month => "MONTH",
            Self::WeekOfYear => "WEEK_OF_YEAR",
            Self::WeekOfMonth => "WEEK_OF_MONTH",
            Self::DayOfMonth => "DAY_OF_MONTH",
            Self::DayOfYear => "DAY_OF_YEAR",
            Self::DayOfWeek => "DAY_OF_WEEK",
            Self::DayOfWeekInMonth => "DAY_OF_WEEK_IN_MONTH",
            Self::AmPm => "AM_PM",
            Self::Hour => "HOUR",
            Self::HourOfDay => "HOUR_OF_DAY",
            Self::Minute => "MINUTE",
            Self::Second => "SECOND",
            Self::Millisecond => "MILLISECOND",
            Self::ZoneOffset => "ZONE_OFFSET",
            Self::DstOffset => "DST_OFFSET",
            Self::YearWoy => "YEAR_WOY",
            Self::DowLocal => "DOW_LOCAL",
            Self::ExtendedYear => "EXTENDED_YEAR",
            Self::JulianDay => "JULIAN_DAY",
            Self::MillisecondsInDay => "MILLISECONDS_IN_DAY",
            Self::IsLeapMonth => "IS_LEAP_MONTH",
        }
    }

    /// Look up a field by its canonical name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.name().eq_ignore_ascii_case(name))
    }
}

impl Display for Field {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Month constants (zero-based).
pub mod month {
    pub const JANUARY: i32 = 0;
    pub const FEBRUARY: i32 = 1;
    pub const MARCH: i32 = 2;
    pub const APRIL: i32 = 3;
    pub const MAY: i32 = 4;
    pub const JUNE: i32 = 5;
    pub const JULY: i32 = 6;
    pub const AUGUST: i32 = 7;
    pub const SEPTEMBER: i32 = 8;
    pub const OCTOBER: i32 = 9;
    pub const NOVEMBER: i32 = 10;
    pub const DECEMBER: i32 = 11;
}

/// Day-of-week constants.
pub mod weekday {
    pub const SUNDAY: i32 = 1;
    pub const MONDAY: i32 = 2;
    pub const TUESDAY: i32 = 3;
    pub const WEDNESDAY: i32 = 4;
    pub const THURSDAY: i32 = 5;
    pub const FRIDAY: i32 = 6;
    pub const SATURDAY: i32 = 7;
}

/// Stamp of a field that holds no value.
pub const UNSET: u64 = 0;
/// Stamp of a field derived from the instant.
pub const INTERNALLY_SET: u64 = 1;
/// First stamp handed out to caller writes.
pub const MINIMUM_USER_STAMP: u64 = 2;

/// Field values with their write stamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSet {
    values: [i32; FIELD_COUNT],
    stamps: [u64; FIELD_COUNT],
    next_stamp: u64,
}

impl Default for FieldSet {
    fn default() -> Self {
        Self {
            values: [0; FIELD_COUNT],
            stamps: [UNSET; FIELD_COUNT],
            next_stamp: MINIMUM_USER_STAMP,
        }
    }
}

impl FieldSet {
    /// Raw value; 0 when unset.
    pub fn get(&self, field: Field) -> i32 {
        self.values[field.index()]
    }

    /// Value if set, otherwise `default`.
    pub fn get_or(&self, field: Field, default: i32) -> i32 {
        if self.is_set(field) { self.get(field) } else { default }
    }

    /// Record a caller write with a fresh stamp.
    pub fn set(&mut self, field: Field, value: i32) {
        self.values[field.index()] = value;
        self.stamps[field.index()] = self.next_stamp;
        self.next_stamp += 1;
    }

    /// Record a derived value.
    pub fn set_internal(&mut self, field: Field, value: i32) {
        self.values[field.index()] = value;
        self.stamps[field.index()] = INTERNALLY_SET;
    }

    /// Forget one field.
    pub fn clear_field(&mut self, field: Field) {
        self.values[field.index()] = 0;
        self.stamps[field.index()] = UNSET;
    }

    /// Forget every field. The stamp clock keeps running.
    pub fn clear(&mut self) {
        self.values = [0; FIELD_COUNT];
        self.stamps = [UNSET; FIELD_COUNT];
    }

    pub fn is_set(&self, field: Field) -> bool {
        self.stamps[field.index()] != UNSET
    }

    /// Whether the caller (not the engine) wrote this field.
    pub fn is_user_set(&self, field: Field) -> bool {
        self.stamps[field.index()] >= MINIMUM_USER_STAMP
    }

    pub fn stamp(&self, field: Field) -> u64 {
        self.stamps[field.index()]
    }

    /// Newest stamp among `fields`, no older than `floor`.
    pub fn newest_stamp(&self, fields: &[Field], floor: u64) -> u64 {
        fields.iter().map(|f| self.stamp(*f)).fold(floor, u64::max)
    }

    /// Whichever of `a` and `b` was written later; `a` on a tie.
    pub fn newer_field(&self, a: Field, b: Field) -> Field {
        if self.stamp(b) > self.stamp(a) { b } else { a }
    }

    /// Mark every field as derived, keeping values.
    pub fn mark_all_internal(&mut self) {
        self.stamps = [INTERNALLY_SET; FIELD_COUNT];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_indices_match_all() {
        for (i, f) in Field::ALL.iter().enumerate() {
            assert_eq!(f.index(), i);
        }
    }

    #[test]
    fn later_write_wins() {
        let mut fs = FieldSet::default();
        fs.set(Field::DayOfYear, 1);
        fs.set(Field::DayOfMonth, 5);
        assert_eq!(fs.newer_field(Field::DayOfYear, Field::DayOfMonth), Field::DayOfMonth);
        fs.set(Field::DayOfYear, 2);
        assert_eq!(fs.newer_field(Field::DayOfYear, Field::DayOfMonth), Field::DayOfYear);
    }

    #[test]
    fn clear_keeps_clock_running() {
        let mut fs = FieldSet::default();
        fs.set(Field::Year, 1997);
        let s = fs.stamp(Field::Year);
        fs.clear();
        assert!(!fs.is_set(Field::Year));
        fs.set(Field::Month, 9);
        assert!(fs.stamp(Field::Month) > s);
    }

    #[test]
    fn internal_values_are_not_user_set() {
        let mut fs = FieldSet::default();
        fs.set_internal(Field::Month, 3);
        assert!(fs.is_set(Field::Month));
        assert!(!fs.is_user_set(Field::Month));
        assert_eq!(fs.get_or(Field::DayOfMonth, 7), 7);
    }

    #[test]
    fn names_roundtrip() {
        for f in Field::ALL {
            assert_eq!(Field::from_name(f.name()), Some(f));
        }
        assert_eq!(Field::from_name("day_of_month"), Some(Field::DayOfMonth));
        assert_eq!(Field::from_name("DATE"), None);
    }
}
