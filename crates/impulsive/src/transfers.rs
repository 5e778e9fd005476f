//! Coplanar transfers between circular orbits: Hohmann, bi-elliptic and
//! one-tangent burn.
//!
//! Radii are in metres, speeds in m/s and times in seconds. The `*_cost` and
//! `*_time` functions read the gravitational parameter from the primary body.

use std::f64::consts::PI;

use orrery_bodies::CelestialBody;
use orrery_orbits::kepler;

/// Burns of a Hohmann transfer between circular, coplanar orbits of radii r1 and r2.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HohmannResult {
    /// Signed: negative for an inward (retrograde) departure burn.
    pub dv1: f64,
    /// Signed: negative for a retrograde circularisation when arriving inward.
    pub dv2: f64,
    /// |dv1| + |dv2|
    pub dv_total: f64,
    pub time_of_flight: f64,
}

/// Classical Hohmann transfer around a body of parameter `mu`.
pub fn hohmann(r1: f64, r2: f64, mu: f64) -> HohmannResult {
    let v1 = (mu / r1).sqrt();
    let v2 = (mu / r2).sqrt();
    let a_t = 0.5 * (r1 + r2);

    // transfer periapsis/apoapsis speeds
    let v_t1 = (mu * (2.0 / r1 - 1.0 / a_t)).sqrt();
    let v_t2 = (mu * (2.0 / r2 - 1.0 / a_t)).sqrt();

    let dv1 = v_t1 - v1;
    let dv2 = v2 - v_t2;
    HohmannResult {
        dv1,
        dv2,
        dv_total: dv1.abs() + dv2.abs(),
        time_of_flight: half_period(a_t, mu),
    }
}

/// Bi-elliptic transfer through an intermediate apoapsis `rb`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiEllipticResult {
    pub rb: f64,
    pub dv1: f64,
    pub dv2: f64,
    pub dv3: f64,
    pub dv_total: f64,
    pub time_of_flight: f64,
}

/// Evaluate the three burns and the two half-ellipses (r1 → rb, rb → r2).
///
/// `rb` is not optimised. With `rb = r2` this is exactly a Hohmann transfer;
/// with `rb = ∞` the burns stay finite but the transfer never ends.
pub fn bi_elliptic(r1: f64, r2: f64, rb: f64, mu: f64) -> BiEllipticResult {
    let v1 = (mu / r1).sqrt();
    let v2 = (mu / r2).sqrt();

    let a1 = 0.5 * (r1 + rb);
    let v_peri_1 = (mu * (2.0 / r1 - 1.0 / a1)).sqrt();
    let v_apo_1 = (mu * (2.0 / rb - 1.0 / a1)).sqrt();

    let a2 = 0.5 * (rb + r2);
    let v_peri_2 = (mu * (2.0 / rb - 1.0 / a2)).sqrt();
    let v_apo_2 = (mu * (2.0 / r2 - 1.0 / a2)).sqrt();

    let dv1 = v_peri_1 - v1;
    let dv2 = v_peri_2 - v_apo_1;
    let dv3 = v2 - v_apo_2;

    // a leg between coincident radii is not flown
    let t1 = if r1 == rb { 0.0 } else { half_period(a1, mu) };
    let t2 = if r2 == rb { 0.0 } else { half_period(a2, mu) };

    BiEllipticResult {
        rb,
        dv1,
        dv2,
        dv3,
        dv_total: dv1.abs() + dv2.abs() + dv3.abs(),
        time_of_flight: t1 + t2,
    }
}

fn half_period(semi_major_axis: f64, mu: f64) -> f64 {
    PI * (semi_major_axis.powi(3) / mu).sqrt()
}

pub fn hohmann_cost(primary: &CelestialBody, r1: f64, r2: f64) -> f64 {
    hohmann(r1, r2, primary.gravitational_parameter()).dv_total
}

pub fn hohmann_time(primary: &CelestialBody, r1: f64, r2: f64) -> f64 {
    hohmann(r1, r2, primary.gravitational_parameter()).time_of_flight
}

pub fn bi_elliptic_cost(primary: &CelestialBody, r1: f64, r2: f64, rb: f64) -> f64 {
    bi_elliptic(r1, r2, rb, primary.gravitational_parameter()).dv_total
}

pub fn bi_elliptic_time(primary: &CelestialBody, r1: f64, r2: f64, rb: f64) -> f64 {
    bi_elliptic(r1, r2, rb, primary.gravitational_parameter()).time_of_flight
}

/// Smallest transfer eccentricity reaching r2 from a tangential departure at r1.
///
/// At this value the one-tangent burn is a Hohmann transfer.
pub fn one_tangent_burn_minimum_eccentricity(r1: f64, r2: f64) -> f64 {
    let a = (r1 + r2) / 2.0;
    1.0 - r1 / a
}

/// Semi-major axis of the transfer conic of eccentricity `e` and the true
/// anomaly at which it crosses r2. A parabola has an infinite semi-major axis.
fn one_tangent_crossing(r1: f64, r2: f64, e: f64) -> (f64, f64) {
    let a = if e == 1.0 { f64::INFINITY } else { r1 / (1.0 - e) };
    let p = r1 * (1.0 + e);
    let cos_f = ((p / r2 - 1.0) / e).clamp(-1.0, 1.0);
    (a, cos_f.acos())
}

/// Time from the tangential departure at r1 to the crossing of r2.
pub fn one_tangent_burn_time(primary: &CelestialBody, r1: f64, r2: f64, e: f64) -> f64 {
    let mu = primary.gravitational_parameter();
    let (a, f) = one_tangent_crossing(r1, r2, e);
    let mean_motion = if e == 1.0 {
        3.0 * (mu / (r1 * (1.0 + e)).powi(3)).sqrt()
    } else {
        (mu / a.abs().powi(3)).sqrt()
    };
    kepler::mean_anomaly_at_true_anomaly(e, f) / mean_motion
}

/// Tangential departure burn plus the arrival burn that also removes the
/// flight-path angle at r2.
pub fn one_tangent_burn_cost(primary: &CelestialBody, r1: f64, r2: f64, e: f64) -> f64 {
    let mu = primary.gravitational_parameter();
    let (a, f) = one_tangent_crossing(r1, r2, e);
    let departure = (mu * (2.0 / r1 - 1.0 / a)).sqrt() - (mu / r1).sqrt();
    let flight_path_angle = (e * f.sin() / (1.0 + e * f.cos())).atan();
    let transfer_speed = (mu * (2.0 / r2 - 1.0 / a)).sqrt();
    let final_speed = (mu / r2).sqrt();
    let arrival = (transfer_speed * transfer_speed + final_speed * final_speed
        - 2.0 * transfer_speed * final_speed * flight_path_angle.cos())
    .sqrt();
    departure + arrival
}

#[cfg(test)]
mod tests {
    use super::*;

    const MU_EARTH: f64 = 3.986_004_418e14;

    fn earth() -> CelestialBody {
        let mut body = CelestialBody::new("Earth");
        body.set_radius(6.371e6);
        body.set_gravitational_parameter(MU_EARTH);
        body
    }

    fn is_close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * a.abs().max(b.abs())
    }

    #[test]
    fn hohmann_is_a_degenerate_bi_elliptic() {
        let primary = earth();
        for &(r1, r2) in &[(7e6, 1.7e7), (6.6e6, 4.2e7), (1e7, 1.0001e7)] {
            assert!(is_close(hohmann_cost(&primary, r1, r2), bi_elliptic_cost(&primary, r1, r2, r2)));
            assert!(is_close(hohmann_time(&primary, r1, r2), bi_elliptic_time(&primary, r1, r2, r2)));
        }
    }

    #[test]
    fn hohmann_cost_peaks_at_the_worst_ratio() {
        use crate::recipes::HOHMANN_WORST_RATIO;
        let primary = earth();
        let r1 = 7e6;
        let worst = hohmann_cost(&primary, r1, r1 * HOHMANN_WORST_RATIO);
        assert!(hohmann_cost(&primary, r1, r1 * (HOHMANN_WORST_RATIO - 1e-3)) < worst);
        assert!(hohmann_cost(&primary, r1, r1 * (HOHMANN_WORST_RATIO + 1e-3)) < worst);
    }

    #[test]
    fn bi_elliptic_trade_offs() {
        let primary = earth();
        let r1 = 7e6;
        let r2 = r1 * 50.0;
        assert!(hohmann_cost(&primary, r1, r2) < bi_elliptic_cost(&primary, r1, r2, r1 * 40.0));
        assert!(hohmann_time(&primary, r1, r2) < bi_elliptic_time(&primary, r1, r2, r1 * 40.0));
        assert!(bi_elliptic_cost(&primary, r1, r2, r1 * 60.0) < hohmann_cost(&primary, r1, r2));
        assert!(hohmann_time(&primary, r1, r2) < bi_elliptic_time(&primary, r1, r2, r1 * 60.0));

        let r2 = r1 * 9999.0;
        assert!(bi_elliptic_cost(&primary, r1, r2, f64::INFINITY) < hohmann_cost(&primary, r1, r2));
        assert_eq!(bi_elliptic_time(&primary, r1, r2, f64::INFINITY), f64::INFINITY);
    }

    #[test]
    fn hohmann_burn_signs() {
        let outward = hohmann(7e6, 4.2e7, MU_EARTH);
        let inward = hohmann(4.2e7, 7e6, MU_EARTH);
        assert!(outward.dv1 > 0.0 && outward.dv2 > 0.0);
        assert!(inward.dv1 < 0.0 && inward.dv2 < 0.0);
        assert!(is_close(outward.dv_total, inward.dv_total));
        assert!(is_close(outward.time_of_flight, inward.time_of_flight));
    }

    #[test]
    fn one_tangent_burn_at_minimum_eccentricity_is_hohmann() {
        let primary = earth();
        for &(r1, r2) in &[(7e6, 1.7e7), (7e6, 7e6 * 9999.0)] {
            let e = one_tangent_burn_minimum_eccentricity(r1, r2);
            assert!(is_close(one_tangent_burn_time(&primary, r1, r2, e), hohmann_time(&primary, r1, r2)));
            assert!(is_close(one_tangent_burn_cost(&primary, r1, r2, e), hohmann_cost(&primary, r1, r2)));
        }
    }

    #[test]
    fn faster_one_tangent_burns_cost_more() {
        let primary = earth();
        let (r1, r2) = (7e6, 4.2e7);
        let e_min = one_tangent_burn_minimum_eccentricity(r1, r2);
        let e = e_min + 0.1;
        assert!(one_tangent_burn_time(&primary, r1, r2, e) < hohmann_time(&primary, r1, r2));
        assert!(one_tangent_burn_cost(&primary, r1, r2, e) > hohmann_cost(&primary, r1, r2));
    }

    #[test]
    fn parabolic_one_tangent_burn() {
        let primary = earth();
        let (r1, r2) = (7e6, 4.2e7);
        let p = 2.0 * r1;
        let f = (p / r2 - 1.0).acos();
        let ea = (f / 2.0).tan();
        let expected = (ea.powi(3) + 3.0 * ea) / 2.0 / (3.0 * (MU_EARTH / p.powi(3)).sqrt());
        let time = one_tangent_burn_time(&primary, r1, r2, 1.0);
        assert!(is_close(time, expected));
        assert!((time - 7_822.524_003).abs() < 1e-3);
        assert!(time < one_tangent_burn_time(&primary, r1, r2, 0.9));
        assert!(one_tangent_burn_time(&primary, r1, r2, 1.2) < time);

        let cost = one_tangent_burn_cost(&primary, r1, r2, 1.0);
        assert!((cost - 7_310.506_168).abs() < 1e-3);
    }
}
