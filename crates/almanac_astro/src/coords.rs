//! Ecliptic and equatorial coordinates.
//!
//! Obliquity polynomial from the Astronomical Almanac (1984 series),
//! valid for several centuries around J2000.

use crate::angle::DEG_RAD;

/// J2000.0 as an astronomical Julian date.
pub const J2000_JD: f64 = 2_451_545.0;

/// Equatorial coordinates in radians.
///
/// Right ascension is not normalized; it follows the `atan2` branch and
/// therefore lies in `(-π, π]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Equatorial {
    pub ascension: f64,
    pub declination: f64,
}

/// Ecliptic coordinates in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ecliptic {
    pub longitude: f64,
    pub latitude: f64,
}

/// Mean obliquity of the ecliptic at an astronomical Julian date, radians.
pub fn ecliptic_obliquity(jd: f64) -> f64 {
    let t = (jd - J2000_JD) / 36_525.0;
    let deg = 23.439_292 - 46.815 / 3600.0 * t - 0.0006 / 3600.0 * t * t
        + 0.00181 / 3600.0 * t * t * t;
    deg * DEG_RAD
}

/// Convert ecliptic longitude/latitude to equatorial RA/Dec at `jd`.
pub fn ecliptic_to_equatorial(jd: f64, ecliptic: Ecliptic) -> Equatorial {
    let obliq = ecliptic_obliquity(jd);
    let (sin_e, cos_e) = obliq.sin_cos();
    let (sin_l, cos_l) = ecliptic.longitude.sin_cos();
    let (sin_b, cos_b) = ecliptic.latitude.sin_cos();
    let tan_b = ecliptic.latitude.tan();

    Equatorial {
        ascension: (sin_l * cos_e - tan_b * sin_e).atan2(cos_l),
        declination: (sin_b * cos_e + cos_b * sin_e * sin_l).asin(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn obliquity_at_j2000() {
        let e = ecliptic_obliquity(J2000_JD);
        assert!((e - 23.439_292 * DEG_RAD).abs() < 1e-12);
    }

    #[test]
    fn summer_solstice_declination_is_obliquity() {
        let eq = ecliptic_to_equatorial(
            J2000_JD,
            Ecliptic {
                longitude: FRAC_PI_2,
                latitude: 0.0,
            },
        );
        assert!((eq.declination - ecliptic_obliquity(J2000_JD)).abs() < 1e-12);
        assert!((eq.ascension - FRAC_PI_2).abs() < 1e-12);
    }
}
