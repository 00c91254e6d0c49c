//! Field resolution: picking the most recently set field group and turning
//! it into a Julian day.

use almanac_time::day_of_week;

use crate::error::CalendarError;
use crate::family::{CalendarFamily, LimitType, limit, to_field};
use crate::field::{Field, FieldSet, INTERNALLY_SET, UNSET};
use crate::week::WeekRule;

/// One candidate in a precedence group.
///
/// A plain line resolves to its first field when all of `fields` are set.
/// A remap line resolves to `target`, which is not itself consulted.
#[derive(Debug, Clone, Copy)]
pub struct ResolveLine {
    target: Field,
    remap: bool,
    fields: &'static [Field],
}

const fn line(fields: &'static [Field]) -> ResolveLine {
    ResolveLine {
        target: fields[0],
        remap: false,
        fields,
    }
}

const fn remap(target: Field, fields: &'static [Field]) -> ResolveLine {
    ResolveLine {
        target,
        remap: true,
        fields,
    }
}

/// Groups of lines, tried in order until one yields a field.
pub type ResolutionTable = [&'static [ResolveLine]];

use Field::{
    DayOfMonth, DayOfWeek, DayOfWeekInMonth, DayOfYear, DowLocal, Era, ExtendedYear, IsLeapMonth,
    JulianDay, Month, WeekOfMonth, WeekOfYear, Year, YearWoy,
};

pub static DATE_PRECEDENCE: &ResolutionTable = &[
    &[
        line(&[DayOfMonth]),
        line(&[WeekOfYear, DayOfWeek]),
        line(&[WeekOfMonth, DayOfWeek]),
        line(&[DayOfWeekInMonth, DayOfWeek]),
        line(&[WeekOfYear, DowLocal]),
        line(&[WeekOfMonth, DowLocal]),
        line(&[DayOfWeekInMonth, DowLocal]),
        line(&[DayOfYear]),
        remap(DayOfMonth, &[Year]),
        remap(WeekOfYear, &[YearWoy]),
    ],
    &[
        line(&[WeekOfYear]),
        line(&[WeekOfMonth]),
        line(&[DayOfWeekInMonth]),
        remap(DayOfWeekInMonth, &[DayOfWeek]),
        remap(DayOfWeekInMonth, &[DowLocal]),
    ],
];

/// Lunisolar variant: a newer IS_LEAP_MONTH selects the month/day group.
pub static LUNISOLAR_DATE_PRECEDENCE: &ResolutionTable = &[
    &[
        line(&[DayOfMonth]),
        line(&[WeekOfYear, DayOfWeek]),
        line(&[WeekOfMonth, DayOfWeek]),
        line(&[DayOfWeekInMonth, DayOfWeek]),
        line(&[WeekOfYear, DowLocal]),
        line(&[WeekOfMonth, DowLocal]),
        line(&[DayOfWeekInMonth, DowLocal]),
        line(&[DayOfYear]),
        remap(DayOfMonth, &[IsLeapMonth]),
    ],
    &[
        line(&[WeekOfYear]),
        line(&[WeekOfMonth]),
        line(&[DayOfWeekInMonth]),
        remap(DayOfWeekInMonth, &[DayOfWeek]),
        remap(DayOfWeekInMonth, &[DowLocal]),
    ],
];

static DOW_PRECEDENCE: &ResolutionTable = &[&[line(&[DayOfWeek]), line(&[DowLocal])]];

static YEAR_PRECEDENCE: &ResolutionTable = &[&[line(&[Year]), line(&[ExtendedYear]), line(&[YearWoy])]];

/// Field whose group was set most recently, if any group is complete.
pub fn resolve_fields(fields: &FieldSet, table: &ResolutionTable) -> Option<Field> {
    let mut best = None;
    for group in table {
        if best.is_some() {
            break;
        }
        let mut best_stamp = UNSET;
        'lines: for line in group.iter() {
            let mut line_stamp = UNSET;
            for f in line.fields {
                let s = fields.stamp(*f);
                if s == UNSET {
                    continue 'lines;
                }
                line_stamp = line_stamp.max(s);
            }
            if line_stamp > best_stamp {
                let temp = line.target;
                if !line.remap
                    || temp != DayOfMonth
                    || fields.stamp(WeekOfMonth) < fields.stamp(temp)
                {
                    best = Some(temp);
                }
                if best == Some(temp) {
                    best_stamp = line_stamp;
                }
            }
        }
    }
    best
}

/// Outcome of resolving a field set into a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved {
    pub julian_day: i64,
    /// Group that determined the day; `None` when JULIAN_DAY was used.
    pub best: Option<Field>,
}

/// Resolve the date fields into a Julian day.
pub fn compute_julian_day(
    family: &dyn CalendarFamily,
    fields: &mut FieldSet,
    rule: WeekRule,
) -> Result<Resolved, CalendarError> {
    if fields.is_user_set(JulianDay) {
        let date_fields = [
            Era,
            Year,
            Month,
            WeekOfYear,
            WeekOfMonth,
            DayOfMonth,
            DayOfYear,
            DayOfWeek,
            DayOfWeekInMonth,
            YearWoy,
            DowLocal,
            ExtendedYear,
        ];
        if fields.newest_stamp(&date_fields, UNSET) <= fields.stamp(JulianDay) {
            return Ok(Resolved {
                julian_day: i64::from(fields.get(JulianDay)),
                best: None,
            });
        }
    }
    let best = resolve_fields(fields, family.resolution_table()).unwrap_or(DayOfMonth);
    let julian_day = family.julian_day(fields, rule, best)?;
    Ok(Resolved {
        julian_day,
        best: Some(best),
    })
}

/// Generic fields-to-day computation shared by all families.
///
/// `month_start` gives day 0 of a month; families with a cutover pass a
/// closure that pins the Julian or Gregorian rule.
pub fn julian_day_from_fields<F>(
    family: &F,
    fields: &mut FieldSet,
    rule: WeekRule,
    best: Field,
    month_start: &dyn Fn(i64, i64, bool) -> Result<i64, CalendarError>,
) -> Result<i64, CalendarError>
where
    F: CalendarFamily + ?Sized,
{
    let use_month = matches!(best, DayOfMonth | WeekOfMonth | DayOfWeekInMonth);

    let year = if best == WeekOfYear
        && fields.is_set(YearWoy)
        && fields.newer_field(YearWoy, Year) == YearWoy
    {
        i64::from(fields.get(YearWoy))
    } else {
        family.extended_year(fields)
    };
    fields.set_internal(ExtendedYear, to_field(year, "extended year")?);

    let month = if use_month {
        i64::from(fields.get_or(Month, family.default_month(year, fields)))
    } else {
        0
    };
    let leap = use_month && fields.get(IsLeapMonth) == 1;
    let mut julian_day = month_start(year, month, leap)?;

    if best == DayOfMonth {
        let day = if fields.is_set(DayOfMonth) {
            fields.get(DayOfMonth)
        } else {
            family.default_day(year, month as i32, fields)
        };
        return Ok(julian_day + i64::from(day));
    }
    if best == DayOfYear {
        return Ok(julian_day + i64::from(fields.get(DayOfYear)));
    }

    let first_dow = i64::from(rule.first_day_of_week());
    let min_days = i64::from(rule.minimal_days_in_first_week());
    let mut first = (i64::from(day_of_week(julian_day + 1)) - first_dow).rem_euclid(7);

    let dow_local = match resolve_fields(fields, DOW_PRECEDENCE) {
        Some(DayOfWeek) => i64::from(fields.get(DayOfWeek)) - first_dow,
        Some(DowLocal) => i64::from(fields.get(DowLocal)) - 1,
        _ => 0,
    }
    .rem_euclid(7);

    let mut date = 1 - first + dow_local;

    if best == DayOfWeekInMonth {
        if date < 1 {
            date += 7;
        }
        let dim = i64::from(fields.get_or(DayOfWeekInMonth, 1));
        if dim == 0 {
            return Err(CalendarError::Validation {
                field: DayOfWeekInMonth,
                value: 0,
                min: 1,
                max: family.handle_limit(DayOfWeekInMonth, LimitType::Maximum),
            });
        }
        if dim > 0 {
            date += 7 * (dim - 1);
        } else {
            let month_length = i64::from(family.month_length(year, month, leap)?);
            date += ((month_length - date) / 7 + dim + 1) * 7;
        }
        return Ok(julian_day + date);
    }

    if best == WeekOfYear {
        let year_woy_applies = !fields.is_set(YearWoy)
            || (resolve_fields(fields, YEAR_PRECEDENCE) != Some(YearWoy)
                && fields.stamp(YearWoy) != INTERNALLY_SET);
        if year_woy_applies {
            let woy = i64::from(fields.get(WeekOfYear));
            let next_julian_day = month_start(year + 1, 0, false)?;
            let next_first = (i64::from(day_of_week(next_julian_day + 1)) - first_dow).rem_euclid(7);
            if woy == 1 {
                if next_first > 0 && 7 - next_first >= min_days {
                    julian_day = next_julian_day;
                    first = next_first;
                    date = 1 - first + dow_local;
                }
            } else if woy >= i64::from(family.handle_limit(WeekOfYear, LimitType::LeastMaximum)) {
                let mut test_date = date;
                if 7 - first < min_days {
                    test_date += 7;
                }
                test_date += 7 * (woy - 1);
                if julian_day + test_date > next_julian_day {
                    julian_day = month_start(year - 1, 0, false)?;
                    first = (i64::from(day_of_week(julian_day + 1)) - first_dow).rem_euclid(7);
                    date = 1 - first + dow_local;
                }
            }
        }
    }

    if 7 - first < min_days {
        date += 7;
    }
    date += 7 * (i64::from(fields.get(best)) - 1);
    Ok(julian_day + date)
}

/// Check every user-set field against its bounds (strict mode).
pub fn validate_fields(
    family: &dyn CalendarFamily,
    fields: &FieldSet,
    rule: WeekRule,
) -> Result<(), CalendarError> {
    for field in Field::ALL {
        if !fields.is_user_set(field) {
            continue;
        }
        let value = fields.get(field);
        let (min, max) = match field {
            DayOfMonth => {
                let year = family.extended_year(fields);
                let month = fields.get_or(Month, family.default_month(year, fields));
                let leap = fields.get(IsLeapMonth) == 1;
                (1, family.month_length(year, i64::from(month), leap)?)
            }
            DayOfYear => (1, family.year_length(family.extended_year(fields))?),
            _ => (
                limit(family, field, LimitType::Minimum, rule),
                limit(family, field, LimitType::Maximum, rule),
            ),
        };
        if field == DayOfWeekInMonth && value == 0 {
            return Err(CalendarError::Validation {
                field,
                value,
                min: 1,
                max,
            });
        }
        if value < min || value > max {
            return Err(CalendarError::Validation {
                field,
                value,
                min,
                max,
            });
        }
        family.validate_field(field, fields)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_set_resolves_nothing() {
        assert_eq!(resolve_fields(&FieldSet::default(), DATE_PRECEDENCE), None);
    }

    #[test]
    fn newest_group_wins() {
        let mut fs = FieldSet::default();
        fs.set(DayOfMonth, 3);
        fs.set(DayOfYear, 40);
        assert_eq!(resolve_fields(&fs, DATE_PRECEDENCE), Some(DayOfYear));
        fs.set(DayOfWeek, 2);
        fs.set(DayOfWeekInMonth, 1);
        assert_eq!(resolve_fields(&fs, DATE_PRECEDENCE), Some(DayOfWeekInMonth));
        fs.set(DayOfMonth, 4);
        assert_eq!(resolve_fields(&fs, DATE_PRECEDENCE), Some(DayOfMonth));
    }

    #[test]
    fn year_woy_remaps_to_week_of_year() {
        let mut fs = FieldSet::default();
        fs.set(WeekOfYear, 10);
        fs.set(DayOfMonth, 1);
        fs.set(YearWoy, 2000);
        assert_eq!(resolve_fields(&fs, DATE_PRECEDENCE), Some(WeekOfYear));
        fs.set(Year, 2000);
        assert_eq!(resolve_fields(&fs, DATE_PRECEDENCE), Some(DayOfMonth));
    }

    #[test]
    fn leap_month_remaps_to_day_of_month() {
        let mut fs = FieldSet::default();
        fs.set(DayOfMonth, 1);
        fs.set(DayOfYear, 1);
        assert_eq!(resolve_fields(&fs, LUNISOLAR_DATE_PRECEDENCE), Some(DayOfYear));
        fs.set(IsLeapMonth, 1);
        assert_eq!(resolve_fields(&fs, LUNISOLAR_DATE_PRECEDENCE), Some(DayOfMonth));
    }

    #[test]
    fn lone_day_of_week_falls_to_second_group() {
        let mut fs = FieldSet::default();
        fs.set(DayOfWeek, 3);
        assert_eq!(resolve_fields(&fs, DATE_PRECEDENCE), Some(DayOfWeekInMonth));
        let mut fs = FieldSet::default();
        fs.set(WeekOfYear, 3);
        assert_eq!(resolve_fields(&fs, DATE_PRECEDENCE), Some(WeekOfYear));
    }
}
