//! Low-precision solar position.
//!
//! Keplerian orbit with elements at epoch 1990 January 0.0, after
//! Duffett-Smith, "Practical Astronomy with your Calculator" (3rd ed.), §46.
//! Good to about 0.01° over several centuries.

use std::f64::consts::TAU;

use crate::angle::{DEG_RAD, norm_2pi};
use crate::coords::{Ecliptic, Equatorial, ecliptic_to_equatorial};
use crate::julian_date;

/// Astronomical Julian date of the orbital-element epoch (1990 Jan 0.0).
pub const JD_EPOCH: f64 = 2_447_891.5;
/// Mean solar days per tropical year.
pub const TROPICAL_YEAR: f64 = 365.242_191;

/// Ecliptic longitude at epoch.
const SUN_ETA_G: f64 = 279.403_303 * DEG_RAD;
/// Ecliptic longitude of perigee.
const SUN_OMEGA_G: f64 = 282.768_422 * DEG_RAD;
/// Eccentricity of Earth's orbit.
const SUN_E: f64 = 0.016_713;

/// Solar longitude together with the mean anomaly used to derive it.
///
/// The lunar theory reuses the mean anomaly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolarState {
    pub longitude: f64,
    pub mean_anomaly: f64,
}

/// Solve Kepler's equation and return the true anomaly.
pub fn true_anomaly(mean_anomaly: f64, eccentricity: f64) -> f64 {
    let mut e = mean_anomaly;
    loop {
        let delta = e - eccentricity * e.sin() - mean_anomaly;
        e -= delta / (1.0 - eccentricity * e.cos());
        if delta.abs() <= 1e-5 {
            break;
        }
    }
    2.0 * ((e / 2.0).tan() * ((1.0 + eccentricity) / (1.0 - eccentricity)).sqrt()).atan()
}

/// Solar state at an astronomical Julian date.
pub fn solar_state_at_jd(jd: f64) -> SolarState {
    let day = jd - JD_EPOCH;
    let epoch_angle = norm_2pi(TAU / TROPICAL_YEAR * day);
    let mean_anomaly = norm_2pi(epoch_angle + SUN_ETA_G - SUN_OMEGA_G);
    SolarState {
        longitude: norm_2pi(true_anomaly(mean_anomaly, SUN_E) + SUN_OMEGA_G),
        mean_anomaly,
    }
}

/// Solar state at an instant.
pub fn solar_state(millis: i64) -> SolarState {
    solar_state_at_jd(julian_date(millis))
}

/// Geocentric ecliptic longitude of the Sun, radians in `[0, 2π)`.
pub fn sun_longitude(millis: i64) -> f64 {
    solar_state(millis).longitude
}

/// Geocentric equatorial position of the Sun.
pub fn sun_position(millis: i64) -> Equatorial {
    let ecliptic = Ecliptic {
        longitude: sun_longitude(millis),
        latitude: 0.0,
    };
    ecliptic_to_equatorial(julian_date(millis), ecliptic)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn circular_orbit_anomaly_is_identity() {
        assert!((true_anomaly(1.0, 0.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn longitude_is_normalized() {
        for ms in (-5_000_000_000_000i64..5_000_000_000_000).step_by(123_456_789_000) {
            let l = sun_longitude(ms);
            assert!((0.0..TAU).contains(&l), "longitude {l} at {ms}");
        }
    }

    #[test]
    fn march_equinox_longitude_near_zero() {
        // 2024-03-20T03:06Z
        let l = sun_longitude(1_710_903_960_000);
        let off = crate::angle::norm_pi(l);
        assert!(off.abs() < 0.01, "longitude {l}");
    }
}
