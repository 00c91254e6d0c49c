//! Rise and set times of the Sun and Moon.
//!
//! The body's hour angle at the horizon is found from its declination, the
//! corresponding local sidereal time is converted to UT, and the position is
//! re-evaluated at that time until the estimate settles. A final correction
//! accounts for semi-diameter and refraction.
//!
//! Source: Duffett-Smith, "Practical Astronomy with your Calculator", §33.

use std::f64::consts::TAU;

use almanac_time::{DAY_MS, HOUR_MS, SECOND_MS, floor_div};
use tracing::trace;

use crate::angle::{DEG_RAD, RAD_DEG};
use crate::coords::Equatorial;
use crate::moon::moon_position;
use crate::riseset_types::{Body, GeoLocation, RiseSetConfig, RiseSetEvent};
use crate::sidereal::lst_to_ut;
use crate::sun::sun_position;

/// Refinement passes before accepting the estimate.
const MAX_ITERATIONS: usize = 5;

/// Rise or set of `body` nearest to the local day containing `millis`.
///
/// Returns `None` when the body does not cross the horizon (polar day or
/// night).
pub fn rise_or_set(millis: i64, body: Body, event: RiseSetEvent, location: &GeoLocation) -> Option<i64> {
    let config = RiseSetConfig::for_body(body);
    match body {
        Body::Sun => {
            // Start from 06:00 or 18:00 local mean time.
            let gmt = location.gmt_offset_ms();
            let noon = floor_div(millis + gmt, DAY_MS) * DAY_MS - gmt + 12 * HOUR_MS;
            let guess = noon + if event.is_rising() { -6 } else { 6 } * HOUR_MS;
            rise_or_set_with(sun_position, guess, event, location, &config)
        }
        Body::Moon => rise_or_set_with(moon_position, millis, event, location, &config),
    }
}

/// Sunrise or sunset for the local day containing `millis`.
pub fn sun_rise_set(millis: i64, event: RiseSetEvent, location: &GeoLocation) -> Option<i64> {
    rise_or_set(millis, Body::Sun, event, location)
}

/// Moonrise or moonset nearest to `millis`.
pub fn moon_rise_set(millis: i64, event: RiseSetEvent, location: &GeoLocation) -> Option<i64> {
    rise_or_set(millis, Body::Moon, event, location)
}

/// Iterate the horizon crossing of a body with the given position function.
pub fn rise_or_set_with<F>(
    position_at: F,
    start: i64,
    event: RiseSetEvent,
    location: &GeoLocation,
    config: &RiseSetConfig,
) -> Option<i64>
where
    F: Fn(i64) -> Equatorial,
{
    let latitude = location.latitude_rad();
    let gmt = location.gmt_offset_ms();
    let rising = event.is_rising();
    let tan_l = latitude.tan();

    let mut time = start;
    let mut pos;
    let mut count = 0;
    loop {
        pos = position_at(time);
        let angle = (-tan_l * pos.declination.tan()).acos();
        if angle.is_nan() {
            trace!(time, "body does not cross the horizon");
            return None;
        }
        let lst = ((if rising { TAU - angle } else { angle }) + pos.ascension) * 24.0 / TAU;
        let new_time = lst_to_ut(time, lst, gmt);
        let delta_t = new_time - time;
        time = new_time;
        count += 1;
        if count >= MAX_ITERATIONS || (delta_t.abs() as f64) <= config.epsilon_ms {
            break;
        }
    }

    let cos_d = pos.declination.cos();
    let psi = (latitude.sin() / cos_d).acos();
    let x = config.diameter_deg * DEG_RAD / 2.0 + config.refraction_arcmin / 60.0 * DEG_RAD;
    let y = (x.sin() / psi.sin()).asin();
    let delta = (240.0 * y * RAD_DEG / cos_d * SECOND_MS as f64) as i64;
    if y.is_nan() {
        return None;
    }
    Some(if rising { time - delta } else { time + delta })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 2024-06-21T12:00Z
    const MIDSUMMER_NOON: i64 = 1_718_971_200_000;

    #[test]
    fn greenwich_midsummer_sunrise_before_sunset() {
        let loc = GeoLocation::new(51.4769, 0.0);
        let rise = sun_rise_set(MIDSUMMER_NOON, RiseSetEvent::Rise, &loc).unwrap();
        let set = sun_rise_set(MIDSUMMER_NOON, RiseSetEvent::Set, &loc).unwrap();
        assert!(rise < set);
        let hours = (set - rise) as f64 / HOUR_MS as f64;
        assert!((hours - 16.6).abs() < 0.2, "day length {hours} h");
    }

    #[test]
    fn polar_day_has_no_sunset() {
        let svalbard = GeoLocation::new(78.2, 15.6);
        assert_eq!(sun_rise_set(MIDSUMMER_NOON, RiseSetEvent::Set, &svalbard), None);
        assert_eq!(sun_rise_set(MIDSUMMER_NOON, RiseSetEvent::Rise, &svalbard), None);
    }

    #[test]
    fn equator_day_is_about_twelve_hours() {
        let loc = GeoLocation::new(0.0, 0.0);
        let rise = sun_rise_set(MIDSUMMER_NOON, RiseSetEvent::Rise, &loc).unwrap();
        let set = sun_rise_set(MIDSUMMER_NOON, RiseSetEvent::Set, &loc).unwrap();
        let hours = (set - rise) as f64 / HOUR_MS as f64;
        assert!((hours - 12.1).abs() < 0.2, "day length {hours} h");
    }
}
