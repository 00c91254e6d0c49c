//! Low-precision lunar position and phase.
//!
//! Mean elements at epoch 1990 January 0.0 with the five largest periodic
//! corrections (evection, annual equation, equation of centre, the
//! "fourth" correction, and variation), after Duffett-Smith §65.
//! Moon age is good to a fraction of a degree.

use crate::angle::{DEG_RAD, norm_2pi};
use crate::coords::{Ecliptic, Equatorial, ecliptic_to_equatorial};
use crate::julian_date;
use crate::sun::{JD_EPOCH, solar_state_at_jd};

/// Mean days between new moons.
pub const SYNODIC_MONTH: f64 = 29.530_588_853;

/// Mean longitude at epoch.
const MOON_L0: f64 = 318.351_648 * DEG_RAD;
/// Mean longitude of perigee at epoch.
const MOON_P0: f64 = 36.340_410 * DEG_RAD;
/// Mean longitude of the node at epoch.
const MOON_N0: f64 = 318.510_107 * DEG_RAD;
/// Inclination of the lunar orbit.
const MOON_I: f64 = 5.145_366 * DEG_RAD;

/// Full lunar state at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LunarState {
    pub ecliptic: Ecliptic,
    pub equatorial: Equatorial,
    /// Solar longitude at the same instant.
    pub sun_longitude: f64,
}

impl LunarState {
    /// Elongation of the Moon from the Sun, radians in `[0, 2π)`.
    pub fn age(&self) -> f64 {
        norm_2pi(self.ecliptic.longitude - self.sun_longitude)
    }

    /// Illuminated fraction, 0 at new moon and 1 at full moon.
    pub fn phase(&self) -> f64 {
        0.5 * (1.0 - self.age().cos())
    }
}

/// Lunar state at an astronomical Julian date.
pub fn lunar_state_at_jd(jd: f64) -> LunarState {
    let sun = solar_state_at_jd(jd);
    let day = jd - JD_EPOCH;

    let mean_longitude = norm_2pi(13.176_396_6 * DEG_RAD * day + MOON_L0);
    let mut mean_anomaly = norm_2pi(mean_longitude - 0.111_404_1 * DEG_RAD * day - MOON_P0);

    let evection =
        1.2739 * DEG_RAD * (2.0 * (mean_longitude - sun.longitude) - mean_anomaly).sin();
    let annual = 0.1858 * DEG_RAD * sun.mean_anomaly.sin();
    let a3 = 0.3700 * DEG_RAD * sun.mean_anomaly.sin();
    mean_anomaly += evection - annual - a3;

    let center = 6.2886 * DEG_RAD * mean_anomaly.sin();
    let a4 = 0.2140 * DEG_RAD * (2.0 * mean_anomaly).sin();
    let mut longitude = mean_longitude + evection + center - annual + a4;

    let variation = 0.6583 * DEG_RAD * (2.0 * (longitude - sun.longitude)).sin();
    longitude += variation;

    let mut node = norm_2pi(MOON_N0 - 0.052_953_9 * DEG_RAD * day);
    node -= 0.16 * DEG_RAD * sun.mean_anomaly.sin();

    let y = (longitude - node).sin();
    let x = (longitude - node).cos();
    let ecliptic = Ecliptic {
        longitude: (y * MOON_I.cos()).atan2(x) + node,
        latitude: (y * MOON_I.sin()).asin(),
    };

    LunarState {
        ecliptic,
        equatorial: ecliptic_to_equatorial(jd, ecliptic),
        sun_longitude: sun.longitude,
    }
}

/// Lunar state at an instant.
pub fn lunar_state(millis: i64) -> LunarState {
    lunar_state_at_jd(julian_date(millis))
}

/// Geocentric equatorial position of the Moon.
pub fn moon_position(millis: i64) -> Equatorial {
    lunar_state(millis).equatorial
}

/// Angle of the Moon past the last new moon, radians in `[0, 2π)`.
pub fn moon_age(millis: i64) -> f64 {
    lunar_state(millis).age()
}

/// Illuminated fraction in `[0, 1]`.
pub fn moon_phase(millis: i64) -> f64 {
    lunar_state(millis).phase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::TAU;

    #[test]
    fn age_is_normalized() {
        for ms in (0i64..2_000_000_000_000).step_by(77_777_777_777) {
            let a = moon_age(ms);
            assert!((0.0..TAU).contains(&a), "age {a} at {ms}");
        }
    }

    #[test]
    fn phase_tracks_age() {
        let s = lunar_state(1_700_000_000_000);
        assert!((s.phase() - 0.5 * (1.0 - s.age().cos())).abs() < 1e-15);
        assert!((0.0..=1.0).contains(&s.phase()));
    }

    #[test]
    fn latitude_bounded_by_inclination() {
        for ms in (0i64..2_000_000_000_000).step_by(55_555_555_555) {
            let s = lunar_state(ms);
            assert!(s.ecliptic.latitude.abs() <= MOON_I + 1e-12);
        }
    }
}
