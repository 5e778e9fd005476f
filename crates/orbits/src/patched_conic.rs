//! Patched-conic burns between a circular parking orbit and a hyperbolic asymptote.

/// Circular speed `√(μ/r)` at radius `r`.
pub fn circular_speed(gravitational_parameter: f64, radius: f64) -> f64 {
    (gravitational_parameter / radius).sqrt()
}

/// Speed at `radius` on the hyperbola with excess speed `excess_speed`.
pub fn hyperbolic_speed(gravitational_parameter: f64, radius: f64, excess_speed: f64) -> f64 {
    (excess_speed * excess_speed + 2.0 * gravitational_parameter / radius).sqrt()
}

/// Delta-v to leave a circular parking orbit of radius `parking_radius` with
/// hyperbolic excess speed `excess_speed`.
pub fn escape_delta_v(gravitational_parameter: f64, parking_radius: f64, excess_speed: f64) -> f64 {
    let circular = circular_speed(gravitational_parameter, parking_radius);
    let hyperbolic = hyperbolic_speed(gravitational_parameter, parking_radius, excess_speed);
    (hyperbolic - circular).max(0.0)
}

/// Delta-v to capture into a circular orbit from an arrival asymptote.
///
/// Symmetric to [`escape_delta_v`] for a propulsive capture.
pub fn capture_delta_v(gravitational_parameter: f64, parking_radius: f64, excess_speed: f64) -> f64 {
    escape_delta_v(gravitational_parameter, parking_radius, excess_speed)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MU_EARTH: f64 = 3.986_004_418e14;

    #[test]
    fn zero_excess_needs_escape_speed_difference() {
        let r = 6_678_000.0;
        let dv = escape_delta_v(MU_EARTH, r, 0.0);
        let expected = (2.0f64.sqrt() - 1.0) * circular_speed(MU_EARTH, r);
        assert!((dv - expected).abs() < 1e-9);
    }

    #[test]
    fn escape_from_leo_to_mars_c3() {
        // v∞ ≈ 2.94 km/s from a 300 km parking orbit costs ≈ 3.6 km/s
        let dv = escape_delta_v(MU_EARTH, 6_678_000.0, 2_940.0);
        assert!((dv - 3_600.0).abs() < 50.0, "dv = {dv}");
        assert_eq!(capture_delta_v(MU_EARTH, 6_678_000.0, 2_940.0), dv);
    }
}
