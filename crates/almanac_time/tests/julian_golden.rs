//! Golden-value tests for Julian day conversion.
//!
//! Reference values from the USNO Julian date converter.

use almanac_time::{
    DAY_MS, GregorianCutover, gregorian_to_jd, jd_to_gregorian, julian_day_to_millis,
    millis_to_julian_date, millis_to_julian_day,
};
use proptest::prelude::*;

/// USNO: 2000-01-01 12:00 UT is JD 2451545.0 (J2000).
#[test]
fn j2000_julian_date() {
    let millis = julian_day_to_millis(gregorian_to_jd(2000, 0, 1), 12 * 3_600_000).unwrap();
    let jd = millis_to_julian_date(millis);
    assert!((jd - 2_451_545.0).abs() < 1e-9, "got {jd}");
}

/// USNO: 1980-07-27 00:00 UT is JD 2444447.5.
#[test]
fn jd_1980_july() {
    let millis = julian_day_to_millis(gregorian_to_jd(1980, 6, 27), 0).unwrap();
    assert_eq!(millis, 333_504_000_000);
    let jd = millis_to_julian_date(millis);
    assert!((jd - 2_444_447.5).abs() < 1e-9, "got {jd}");
}

/// 1 BC (astronomical year 0) was a leap year in both calendars.
#[test]
fn year_zero_is_leap() {
    let c = GregorianCutover::pure_gregorian();
    let jd = c.jd_from_fields(0, 1, 29);
    let f = jd_to_gregorian(jd);
    assert_eq!((f.year, f.month, f.day), (0, 1, 29));
}

proptest! {
    #[test]
    fn instant_julian_day_roundtrip(ms in any::<i64>()) {
        let jd = millis_to_julian_day(ms);
        prop_assert!(jd.millis_in_day >= 0 && i64::from(jd.millis_in_day) < DAY_MS);
        prop_assert_eq!(julian_day_to_millis(jd.day, i64::from(jd.millis_in_day)).unwrap(), ms);
    }

    #[test]
    fn hybrid_fields_roundtrip(jd in -1_000_000i64..5_000_000) {
        let c = GregorianCutover::default();
        let f = c.fields_from_jd(jd);
        prop_assert_eq!(
            c.jd_from_fields(i64::from(f.year), i64::from(f.month), i64::from(f.day)),
            jd
        );
    }
}
