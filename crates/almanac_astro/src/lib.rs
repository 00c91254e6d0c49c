//! Low-precision solar and lunar ephemeris for calendar computations.
//!
//! This crate provides:
//! - Solar longitude and equatorial position
//! - Lunar position, age and phase
//! - Searches for solar-longitude crossings and lunar phases
//! - Sunrise/sunset and moonrise/moonset
//! - A year-keyed cache for memoizing search results
//!
//! Everything is a pure function of a millisecond instant (plus a location
//! for rise/set). Accuracy is a few arc-minutes for the Sun, enough to
//! place solstices and new moons within minutes.

pub mod angle;
pub mod cache;
pub mod coords;
pub mod moon;
pub mod riseset;
pub mod riseset_types;
pub mod search;
pub mod sidereal;
pub mod sun;

use almanac_time::millis_to_julian_date;

pub use cache::YearCache;
pub use coords::{Ecliptic, Equatorial, ecliptic_obliquity, ecliptic_to_equatorial};
pub use moon::{LunarState, SYNODIC_MONTH, lunar_state, moon_age, moon_phase, moon_position};
pub use riseset::{moon_rise_set, rise_or_set, sun_rise_set};
pub use riseset_types::{Body, GeoLocation, RiseSetConfig, RiseSetEvent};
pub use search::{
    AUTUMN_EQUINOX, FIRST_QUARTER, FULL_MOON, LAST_QUARTER, NEW_MOON, SUMMER_SOLSTICE,
    VERNAL_EQUINOX, WINTER_SOLSTICE, moon_time, nearest_new_moon,
    nearest_solar_longitude_crossing, sun_time, time_of_angle,
};
pub use sidereal::{greenwich_sidereal, local_sidereal, lst_to_ut};
pub use sun::{TROPICAL_YEAR, solar_state, sun_longitude, sun_position};

/// Astronomical Julian date for an instant.
pub fn julian_date(millis: i64) -> f64 {
    millis_to_julian_date(millis)
}

/// An observer at a location, fixed at an instant.
///
/// Convenience wrapper over the free functions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Astronomer {
    pub millis: i64,
    pub location: GeoLocation,
}

impl Astronomer {
    /// Observer at Greenwich.
    pub fn new(millis: i64) -> Self {
        Self {
            millis,
            location: GeoLocation::new(0.0, 0.0),
        }
    }

    /// Observer at `location`.
    pub fn at(millis: i64, location: GeoLocation) -> Self {
        Self { millis, location }
    }

    pub fn sun_longitude(&self) -> f64 {
        sun_longitude(self.millis)
    }

    pub fn sun_position(&self) -> Equatorial {
        sun_position(self.millis)
    }

    pub fn moon_position(&self) -> Equatorial {
        moon_position(self.millis)
    }

    pub fn moon_age(&self) -> f64 {
        moon_age(self.millis)
    }

    pub fn moon_phase(&self) -> f64 {
        moon_phase(self.millis)
    }

    /// Local sidereal time at the observer, hours.
    pub fn local_sidereal(&self) -> f64 {
        local_sidereal(self.millis, self.location.gmt_offset_ms())
    }

    pub fn sun_time(&self, longitude: f64, forward: bool) -> Option<i64> {
        sun_time(self.millis, longitude, forward)
    }

    pub fn moon_time(&self, age: f64, forward: bool) -> Option<i64> {
        moon_time(self.millis, age, forward)
    }

    pub fn rise_or_set(&self, body: Body, event: RiseSetEvent) -> Option<i64> {
        rise_or_set(self.millis, body, event, &self.location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn julian_date_of_epoch() {
        assert_eq!(julian_date(0), 2_440_587.5);
    }

    #[test]
    fn astronomer_delegates() {
        let a = Astronomer::new(333_504_000_000);
        assert_eq!(a.sun_longitude(), sun_longitude(333_504_000_000));
        assert_eq!(a.moon_phase(), moon_phase(333_504_000_000));
    }
}
