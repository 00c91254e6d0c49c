//! Angle constants and normalization helpers.

use std::f64::consts::{PI, TAU};

/// Degrees to radians.
pub const DEG_RAD: f64 = PI / 180.0;
/// Radians to degrees.
pub const RAD_DEG: f64 = 180.0 / PI;

/// Reduce `value` into `[0, range)`.
pub fn normalize(value: f64, range: f64) -> f64 {
    value - range * (value / range).floor()
}

/// Reduce an angle into `[0, 2π)`.
pub fn norm_2pi(angle: f64) -> f64 {
    normalize(angle, TAU)
}

/// Reduce an angle into `[-π, π)`.
pub fn norm_pi(angle: f64) -> f64 {
    normalize(angle + PI, TAU) - PI
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn norm_2pi_wraps_negative() {
        let a = norm_2pi(-0.5);
        assert!((a - (TAU - 0.5)).abs() < 1e-12);
    }

    #[test]
    fn norm_pi_is_centered() {
        assert!((norm_pi(1.5 * PI) + 0.5 * PI).abs() < 1e-12);
        assert!((norm_pi(0.25) - 0.25).abs() < 1e-15);
    }

    #[test]
    fn normalize_hours() {
        assert!((normalize(25.5, 24.0) - 1.5).abs() < 1e-12);
        assert!((normalize(-1.0, 24.0) - 23.0).abs() < 1e-12);
    }
}
