//! Greenwich and local sidereal time in hours.
//!
//! Sources: Duffett-Smith, "Practical Astronomy with your Calculator",
//! §12–§15; GMST polynomial of Aoki et al. (1982).

use almanac_time::{DAY_MS, HOUR_MS, floor_div};

use crate::angle::normalize;
use crate::coords::J2000_JD;
use crate::julian_date;

/// Ratio of mean solar to sidereal time.
const SIDEREAL_TO_SOLAR: f64 = 0.997_269_566_3;

/// GMST at 0h UT of the day containing `millis`, hours in `[0, 24)`.
pub fn sidereal_offset(millis: i64) -> f64 {
    let jd = (julian_date(millis) - 0.5).floor() + 0.5;
    let t = (jd - J2000_JD) / 36_525.0;
    normalize(6.697_374_558 + 2400.051_336 * t + 0.000_025_862 * t * t, 24.0)
}

/// Greenwich sidereal time at `millis`, hours in `[0, 24)`.
pub fn greenwich_sidereal(millis: i64) -> f64 {
    let ut = normalize(millis as f64 / HOUR_MS as f64, 24.0);
    normalize(sidereal_offset(millis) + ut * 1.002_737_909, 24.0)
}

/// Local sidereal time for an observer `gmt_offset_ms` east of Greenwich.
pub fn local_sidereal(millis: i64, gmt_offset_ms: i64) -> f64 {
    normalize(greenwich_sidereal(millis) + gmt_offset_ms as f64 / HOUR_MS as f64, 24.0)
}

/// Instant at which local sidereal time `lst` (hours) occurs on the local
/// day containing `millis`.
pub fn lst_to_ut(millis: i64, lst: f64, gmt_offset_ms: i64) -> i64 {
    let lt = normalize((lst - sidereal_offset(millis)) * SIDEREAL_TO_SOLAR, 24.0);
    let base = DAY_MS * floor_div(millis + gmt_offset_ms, DAY_MS) - gmt_offset_ms;
    base + (lt * HOUR_MS as f64) as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gmst_at_j2000_midnight() {
        // 2000-01-01T00:00Z: GMST ≈ 6h 39m 52s.
        let millis = 946_684_800_000;
        let gmst = greenwich_sidereal(millis);
        assert!((gmst - 6.6645).abs() < 0.01, "gmst = {gmst}");
    }

    #[test]
    fn lst_roundtrip_same_day() {
        let millis = 946_684_800_000 + 3 * HOUR_MS;
        let lst = local_sidereal(millis, 0);
        let back = lst_to_ut(millis, lst, 0);
        assert!((back - millis).abs() < 2_000, "drift {} ms", back - millis);
    }
}
