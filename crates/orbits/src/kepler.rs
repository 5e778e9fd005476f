//! Anomaly conversions for elliptic, parabolic and hyperbolic trajectories.
//!
//! Every function dispatches on the eccentricity alone, so they can be used
//! without building an [`Orbit`](crate::Orbit). Angles are in radians.

use std::f64::consts::PI;

use orrery_core::angle;

/// Below this mean anomaly, `sin E ≈ E` and Kepler's equation is linear (2⁻²⁶).
pub const LINEAR_THRESHOLD: f64 = 1.490_116_119_384_765_6e-8;

/// Newton iteration cap for Kepler's equation.
pub const MAX_ITERATIONS: usize = 30;

/// Solve Kepler's equation for the eccentric anomaly.
///
/// - `e < 1`: `M = E − e·sin E`, with `M` first folded into `[0, 2π)`
/// - `e = 1`: Barker's equation, closed form
/// - `e > 1`: `M = e·sinh E − E`
///
/// Non-convergence within [`MAX_ITERATIONS`] is not reported; the last
/// estimate is returned.
pub fn eccentric_anomaly_at_mean_anomaly(eccentricity: f64, mean_anomaly: f64) -> f64 {
    let e = eccentricity;
    if e < 1.0 {
        let m = angle::wrap_two_pi(mean_anomaly);
        if m.abs() < LINEAR_THRESHOLD {
            return m / (1.0 - e);
        }
        newton(PI, |x| (x - e * x.sin() - m, 1.0 - e * x.cos()))
    } else if e == 1.0 {
        let m = mean_anomaly;
        let z = (m + (1.0 + m * m).sqrt()).cbrt();
        z - 1.0 / z
    } else {
        let m = mean_anomaly;
        if m.abs() < LINEAR_THRESHOLD {
            return m / (e - 1.0);
        }
        newton(1.0, |x| (e * x.sinh() - x - m, e * x.cosh() - 1.0))
    }
}

/// Newton's method that stops on a fixed point or a 2-cycle.
fn newton(mut x: f64, f: impl Fn(f64) -> (f64, f64)) -> f64 {
    let mut previous = 0.0;
    for _ in 0..MAX_ITERATIONS {
        let before_previous = previous;
        previous = x;
        let (value, slope) = f(x);
        x -= value / slope;
        if x == previous || x == before_previous {
            break;
        }
    }
    x
}

pub fn true_anomaly_at_eccentric_anomaly(eccentricity: f64, eccentric_anomaly: f64) -> f64 {
    let e = eccentricity;
    let half = eccentric_anomaly / 2.0;
    if e < 1.0 {
        2.0 * ((1.0 + e).sqrt() * half.sin()).atan2((1.0 - e).sqrt() * half.cos())
    } else if e == 1.0 {
        2.0 * eccentric_anomaly.atan()
    } else {
        2.0 * ((e + 1.0).sqrt() * half.sinh()).atan2((e - 1.0).sqrt() * half.cosh())
    }
}

pub fn eccentric_anomaly_at_true_anomaly(eccentricity: f64, true_anomaly: f64) -> f64 {
    let e = eccentricity;
    let t = angle::tan(true_anomaly / 2.0);
    if e < 1.0 {
        2.0 * (((1.0 - e) / (1.0 + e)).sqrt() * t).atan()
    } else if e == 1.0 {
        t
    } else {
        2.0 * (((e - 1.0) / (e + 1.0)).sqrt() * t).atanh()
    }
}

pub fn mean_anomaly_at_eccentric_anomaly(eccentricity: f64, eccentric_anomaly: f64) -> f64 {
    let e = eccentricity;
    let x = eccentric_anomaly;
    if e < 1.0 {
        x - e * x.sin()
    } else if e == 1.0 {
        (x * x * x + 3.0 * x) / 2.0
    } else {
        e * x.sinh() - x
    }
}

/// Mean anomaly to true anomaly through the eccentric anomaly.
pub fn true_anomaly_at_mean_anomaly(eccentricity: f64, mean_anomaly: f64) -> f64 {
    let ea = eccentric_anomaly_at_mean_anomaly(eccentricity, mean_anomaly);
    true_anomaly_at_eccentric_anomaly(eccentricity, ea)
}

/// True anomaly to mean anomaly through the eccentric anomaly.
pub fn mean_anomaly_at_true_anomaly(eccentricity: f64, true_anomaly: f64) -> f64 {
    let ea = eccentric_anomaly_at_true_anomaly(eccentricity, true_anomaly);
    mean_anomaly_at_eccentric_anomaly(eccentricity, ea)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn same_angle(a: f64, b: f64, tolerance: f64) -> bool {
        angle::wrap_pi(b - a).abs() < tolerance
    }

    const D: f64 = 1e-5;
    const ECCENTRICITIES: [f64; 8] = [0.0, D, 0.5, 1.0 - D, 1.0, 1.0 + D, 10.0, 100.0];
    const ANGLES: [f64; 9] = [
        -PI + 1e-3,
        -2.0,
        -1.0,
        -1e-3,
        0.0,
        1e-3,
        1.0,
        2.0,
        PI - 1e-3,
    ];

    #[test]
    fn mean_to_true_round_trips() {
        for &e in &ECCENTRICITIES {
            for &m in &ANGLES {
                let ea = eccentric_anomaly_at_mean_anomaly(e, m);
                let f = true_anomaly_at_eccentric_anomaly(e, ea);
                let back_ea = eccentric_anomaly_at_true_anomaly(e, f);
                let back_m = mean_anomaly_at_eccentric_anomaly(e, back_ea);
                assert!(
                    same_angle(back_m, m, 1e-7),
                    "e = {e}, M = {m}: got back {back_m}"
                );
            }
        }
    }

    #[test]
    fn kepler_equation_is_satisfied() {
        for &e in &[0.1, 0.5, 0.9, 0.99] {
            for &m in &[0.2, 1.0, 3.0, 5.5] {
                let ea = eccentric_anomaly_at_mean_anomaly(e, m);
                assert!((ea - e * ea.sin() - m).abs() < 1e-12, "e = {e}, M = {m}");
            }
        }
        for &e in &[1.5, 10.0] {
            for &m in &[-3.0, 0.5, 3.0] {
                let ea = eccentric_anomaly_at_mean_anomaly(e, m);
                assert!((e * ea.sinh() - ea - m).abs() < 1e-9, "e = {e}, M = {m}");
            }
        }
    }

    #[test]
    fn small_mean_anomaly_uses_linear_solution() {
        assert_eq!(eccentric_anomaly_at_mean_anomaly(0.5, 1e-9), 2e-9);
        assert_eq!(eccentric_anomaly_at_mean_anomaly(3.0, -1e-9), -0.5e-9);
        assert_eq!(eccentric_anomaly_at_mean_anomaly(0.3, 0.0), 0.0);
    }

    #[test]
    fn apsides_map_to_themselves() {
        for &e in &[0.0, 0.5, 0.9] {
            let ea = eccentric_anomaly_at_mean_anomaly(e, PI);
            assert!((ea - PI).abs() < 1e-12);
            assert!((true_anomaly_at_eccentric_anomaly(e, ea).abs() - PI).abs() < 1e-12);
        }
    }
}
