//! Searches for the instant at which an angle reaches a target value.
//!
//! Secant-style iteration: the rate of change is re-estimated from the
//! last step, and the search restarts one eighth of a period further on if
//! a step grows instead of shrinking.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use almanac_time::{DAY_MS, MINUTE_MS};
use tracing::trace;

use crate::angle::{norm_2pi, norm_pi};
use crate::moon::{SYNODIC_MONTH, moon_age};
use crate::sun::{TROPICAL_YEAR, sun_longitude};

/// Solar longitude of the March equinox.
pub const VERNAL_EQUINOX: f64 = 0.0;
/// Solar longitude of the June solstice.
pub const SUMMER_SOLSTICE: f64 = FRAC_PI_2;
/// Solar longitude of the September equinox.
pub const AUTUMN_EQUINOX: f64 = PI;
/// Solar longitude of the December solstice.
pub const WINTER_SOLSTICE: f64 = 3.0 * FRAC_PI_2;

/// Moon age at new moon.
pub const NEW_MOON: f64 = 0.0;
/// Moon age at first quarter.
pub const FIRST_QUARTER: f64 = FRAC_PI_2;
/// Moon age at full moon.
pub const FULL_MOON: f64 = PI;
/// Moon age at last quarter.
pub const LAST_QUARTER: f64 = 3.0 * FRAC_PI_2;

/// Iteration cap for one search pass.
const MAX_ITERATIONS: usize = 64;
/// Restart cap before the search gives up.
const MAX_RESTARTS: usize = 8;

/// Find when `angle_at` reaches `desired`, starting from `start`.
///
/// `period_days` is the mean period of the angle. With `forward` the search
/// moves toward later instants, otherwise earlier. Returns `None` if the
/// iteration fails to converge within `epsilon_ms`.
pub fn time_of_angle<F>(
    angle_at: F,
    start: i64,
    desired: f64,
    period_days: f64,
    epsilon_ms: f64,
    forward: bool,
) -> Option<i64>
where
    F: Fn(i64) -> f64,
{
    let period_ms = period_days * DAY_MS as f64;
    let mut origin = start;
    for restart in 0..=MAX_RESTARTS {
        if let Some(t) = search_pass(&angle_at, origin, desired, period_ms, epsilon_ms, forward) {
            return Some(t);
        }
        let shift = (period_ms / 8.0) as i64;
        origin = if forward {
            origin.checked_add(shift)?
        } else {
            origin.checked_sub(shift)?
        };
        trace!(restart, origin, "angle search diverged; restarting");
    }
    None
}

fn search_pass<F>(
    angle_at: &F,
    start: i64,
    desired: f64,
    period_ms: f64,
    epsilon_ms: f64,
    forward: bool,
) -> Option<i64>
where
    F: Fn(i64) -> f64,
{
    let mut last_angle = angle_at(start);
    let delta_angle = norm_2pi(desired - last_angle);
    let mut delta_t = (delta_angle + if forward { 0.0 } else { -TAU }) * period_ms / TAU;
    let mut last_delta_t = delta_t;
    let mut time = start.checked_add(delta_t as i64)?;

    for _ in 0..MAX_ITERATIONS {
        let angle = angle_at(time);
        let factor = (delta_t / norm_pi(angle - last_angle)).abs();
        delta_t = norm_pi(desired - angle) * factor;
        if !delta_t.is_finite() {
            return if delta_t.is_nan() && last_delta_t.abs() <= epsilon_ms {
                Some(time)
            } else {
                None
            };
        }
        if delta_t.abs() > last_delta_t.abs() {
            return None;
        }
        last_delta_t = delta_t;
        last_angle = angle;
        time = time.checked_add(delta_t as i64)?;
        if delta_t.abs() <= epsilon_ms {
            return Some(time);
        }
    }
    None
}

/// Instant at which the Sun's longitude next (or last) equals `desired`.
pub fn sun_time(start: i64, desired: f64, forward: bool) -> Option<i64> {
    time_of_angle(sun_longitude, start, desired, TROPICAL_YEAR, MINUTE_MS as f64, forward)
}

/// Nearest crossing of a solar longitude in the given direction.
///
/// Used for solstices, equinoxes and the 30° principal terms.
pub fn nearest_solar_longitude_crossing(start: i64, longitude: f64, forward: bool) -> Option<i64> {
    sun_time(start, longitude, forward)
}

/// Instant at which the moon age next (or last) equals `desired`.
pub fn moon_time(start: i64, desired: f64, forward: bool) -> Option<i64> {
    time_of_angle(moon_age, start, desired, SYNODIC_MONTH, MINUTE_MS as f64, forward)
}

/// Nearest new moon in the given direction.
pub fn nearest_new_moon(start: i64, forward: bool) -> Option<i64> {
    moon_time(start, NEW_MOON, forward)
}
