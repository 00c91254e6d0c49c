//! Types for rise/set computation.

use std::f64::consts::TAU;

use almanac_time::HOUR_MS;

use crate::angle::{DEG_RAD, norm_pi};

/// Geographic location on Earth's surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoLocation {
    /// Latitude in degrees, north positive. Range: [-90, 90].
    pub latitude_deg: f64,
    /// Longitude in degrees, east positive. Range: [-180, 180].
    pub longitude_deg: f64,
}

impl GeoLocation {
    /// Create a new geographic location.
    pub fn new(latitude_deg: f64, longitude_deg: f64) -> Self {
        Self {
            latitude_deg,
            longitude_deg,
        }
    }

    /// Latitude in radians, reduced to `[-π, π)`.
    pub fn latitude_rad(&self) -> f64 {
        norm_pi(self.latitude_deg * DEG_RAD)
    }

    /// Longitude in radians (east positive), reduced to `[-π, π)`.
    pub fn longitude_rad(&self) -> f64 {
        norm_pi(self.longitude_deg * DEG_RAD)
    }

    /// Local mean time offset from UT in milliseconds.
    pub fn gmt_offset_ms(&self) -> i64 {
        (self.longitude_rad() * 24.0 * HOUR_MS as f64 / TAU) as i64
    }
}

/// Body whose rise or set is sought.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Body {
    Sun,
    Moon,
}

/// Rising or setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RiseSetEvent {
    Rise,
    Set,
}

impl RiseSetEvent {
    /// Whether this is a rising event.
    pub fn is_rising(self) -> bool {
        matches!(self, Self::Rise)
    }
}

/// Horizon parameters for one body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiseSetConfig {
    /// Apparent angular diameter in degrees.
    pub diameter_deg: f64,
    /// Horizontal refraction in arcminutes.
    pub refraction_arcmin: f64,
    /// Convergence threshold in milliseconds.
    pub epsilon_ms: f64,
}

impl RiseSetConfig {
    /// Standard parameters for a body.
    pub fn for_body(body: Body) -> Self {
        let epsilon_ms = match body {
            Body::Sun => 60_000.0 / 12.0,
            Body::Moon => 60_000.0,
        };
        Self {
            diameter_deg: 0.533,
            refraction_arcmin: 34.0,
            epsilon_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gmt_offset_for_ninety_west() {
        let loc = GeoLocation::new(0.0, -90.0);
        assert!((loc.gmt_offset_ms() + 6 * HOUR_MS).abs() <= 1);
    }

    #[test]
    fn sun_converges_tighter_than_moon() {
        let sun = RiseSetConfig::for_body(Body::Sun);
        let moon = RiseSetConfig::for_body(Body::Moon);
        assert!(sun.epsilon_ms < moon.epsilon_ms);
        assert_eq!(sun.diameter_deg, moon.diameter_deg);
    }

    #[test]
    fn is_rising_correct() {
        assert!(RiseSetEvent::Rise.is_rising());
        assert!(!RiseSetEvent::Set.is_rising());
    }
}
