//! Lambert's problem after Izzo, "Revisiting Lambert's problem" (2015).
//!
//! The unknown is the dimensionless parameter `x`; the time of flight `T(x)`
//! is inverted with a Householder iteration and the endpoint velocities
//! follow in closed form.

use std::f64::consts::PI;

use orrery_core::vector::{self, Vector3};
use thiserror::Error;
use tracing::debug;

const HOUSEHOLDER_ITERATIONS: usize = 35;
const HALLEY_ITERATIONS: usize = 12;
const HYPERGEOMETRIC_TERMS: usize = 10_000;

/// Smallest |r̂1 × r̂2| accepted as a well-defined transfer plane.
const COLLINEAR_TOLERANCE: f64 = 1e-12;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LambertError {
    #[error("time of flight must be positive (got {0} s)")]
    NonPositiveTime(f64),
    #[error("position vectors must have non-zero length")]
    ZeroPosition,
    #[error("positions are collinear, the transfer plane is undefined")]
    Collinear,
    #[error("{requested} revolutions requested but at most {maximum} fit in the time of flight")]
    TooManyRevolutions { requested: u32, maximum: u32 },
}

/// Which of the two multi-revolution solutions to return.
///
/// Ignored for zero revolutions, where the solution is unique.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Branch {
    #[default]
    Left,
    Right,
}

/// Solve for the velocities at `r1` and `r2` of the conic joining them in
/// `time_of_flight` seconds around a body of parameter `mu`.
///
/// The transfer is prograde with respect to the +z axis: when `r1 × r2`
/// points below the xy plane the long way round is taken.
pub fn solve(
    mu: f64,
    r1: &Vector3,
    r2: &Vector3,
    time_of_flight: f64,
    revolutions: u32,
    branch: Branch,
) -> Result<(Vector3, Vector3), LambertError> {
    if time_of_flight <= 0.0 || time_of_flight.is_nan() {
        return Err(LambertError::NonPositiveTime(time_of_flight));
    }
    let r1_norm = vector::norm(r1);
    let r2_norm = vector::norm(r2);
    if r1_norm == 0.0 || r2_norm == 0.0 {
        return Err(LambertError::ZeroPosition);
    }

    let chord = vector::distance(r1, r2);
    let s = 0.5 * (r1_norm + r2_norm + chord);
    let mut lambda = (1.0 - chord / s).sqrt();

    let i_r1 = vector::scale(r1, 1.0 / r1_norm);
    let i_r2 = vector::scale(r2, 1.0 / r2_norm);
    let normal = vector::cross(&i_r1, &i_r2);
    let normal_norm = vector::norm(&normal);
    if normal_norm < COLLINEAR_TOLERANCE {
        return Err(LambertError::Collinear);
    }
    let mut i_h = vector::scale(&normal, 1.0 / normal_norm);
    if i_h[2] < 0.0 {
        lambda = -lambda;
        i_h = vector::scale(&i_h, -1.0);
    }
    let i_t1 = vector::cross(&i_h, &i_r1);
    let i_t2 = vector::cross(&i_h, &i_r2);

    let t = time_of_flight * (2.0 * mu / (s * s * s)).sqrt();

    let maximum = max_revolutions(lambda, t);
    if revolutions > maximum {
        debug!(revolutions, maximum, "rejecting revolution count");
        return Err(LambertError::TooManyRevolutions {
            requested: revolutions,
            maximum,
        });
    }

    let m = f64::from(revolutions);
    let x = householder(lambda, t, m, initial_guess(lambda, t, m, branch));
    let y = compute_y(lambda, x);
    debug!(lambda, t, x, revolutions, "lambert converged");

    let gamma = (mu * s / 2.0).sqrt();
    let rho = (r1_norm - r2_norm) / chord;
    let sigma = (1.0 - rho * rho).sqrt();
    let v_r1 = gamma * ((lambda * y - x) - rho * (lambda * y + x)) / r1_norm;
    let v_r2 = -gamma * ((lambda * y - x) + rho * (lambda * y + x)) / r2_norm;
    let v_t1 = gamma * sigma * (y + lambda * x) / r1_norm;
    let v_t2 = gamma * sigma * (y + lambda * x) / r2_norm;

    let v1 = vector::add(&vector::scale(&i_r1, v_r1), &vector::scale(&i_t1, v_t1));
    let v2 = vector::add(&vector::scale(&i_r2, v_r2), &vector::scale(&i_t2, v_t2));
    Ok((v1, v2))
}

fn compute_y(lambda: f64, x: f64) -> f64 {
    (1.0 - lambda * lambda * (1.0 - x * x)).sqrt()
}

fn compute_psi(lambda: f64, x: f64, y: f64) -> f64 {
    if (-1.0..=1.0).contains(&x) {
        (x * y + lambda * (1.0 - x * x)).acos()
    } else if x > 1.0 {
        ((y - x * lambda) * (x * x - 1.0).sqrt()).asinh()
    } else {
        0.0
    }
}

/// Gauss hypergeometric function ₂F₁(3, 1; 5/2; z), summed until it stops changing.
fn hyp2f1b(z: f64) -> f64 {
    if z >= 1.0 {
        return f64::INFINITY;
    }
    let mut sum = 1.0;
    let mut term = 1.0;
    for i in 0..HYPERGEOMETRIC_TERMS {
        let i = i as f64;
        term *= (3.0 + i) / (2.5 + i) * z;
        let next = sum + term;
        if next == sum {
            break;
        }
        sum = next;
    }
    sum
}

/// Dimensionless time of flight T(x) for `m` complete revolutions.
fn time_of_flight(lambda: f64, x: f64, m: f64) -> f64 {
    let y = compute_y(lambda, x);
    if m == 0.0 && 0.6f64.sqrt() < x && x < 1.4f64.sqrt() {
        // close to the parabola 1 - x² cancels; use the series instead
        let eta = y - lambda * x;
        let s1 = (1.0 - lambda - x * eta) * 0.5;
        let q = 4.0 / 3.0 * hyp2f1b(s1);
        return (eta * eta * eta * q + 4.0 * lambda * eta) * 0.5;
    }
    let psi = compute_psi(lambda, x, y);
    ((psi + m * PI) / (1.0 - x * x).abs().sqrt() - x + lambda * y) / (1.0 - x * x)
}

/// First three derivatives of T with respect to x, given T(x).
fn derivatives(lambda: f64, x: f64, t: f64) -> (f64, f64, f64) {
    let y = compute_y(lambda, x);
    let l2 = lambda * lambda;
    let l3 = l2 * lambda;
    let l5 = l3 * l2;
    let d1 = (3.0 * t * x - 2.0 + 2.0 * l3 * x / y) / (1.0 - x * x);
    let d2 = (3.0 * t + 5.0 * x * d1 + 2.0 * (1.0 - l2) * l3 / y.powi(3)) / (1.0 - x * x);
    let d3 = (7.0 * x * d2 + 8.0 * d1 - 6.0 * (1.0 - l2) * l5 * x / y.powi(5)) / (1.0 - x * x);
    (d1, d2, d3)
}

fn initial_guess(lambda: f64, t: f64, m: f64, branch: Branch) -> f64 {
    if m == 0.0 {
        let t0 = lambda.acos() + lambda * (1.0 - lambda * lambda).sqrt();
        let t1 = 2.0 / 3.0 * (1.0 - lambda.powi(3));
        if t < t1 {
            2.5 * t1 * (t1 - t) / (t * (1.0 - lambda.powi(5))) + 1.0
        } else if t < t0 {
            (t0 / t).powf((t1 / t0).ln() / 2f64.ln()) - 1.0
        } else {
            (t0 / t).powf(2.0 / 3.0) - 1.0
        }
    } else {
        let k = match branch {
            Branch::Right => (8.0 * t / (m * PI)).powf(2.0 / 3.0),
            Branch::Left => ((m * PI + PI) / (8.0 * t)).powf(2.0 / 3.0),
        };
        (k - 1.0) / (k + 1.0)
    }
}

/// Fourth-order Householder iteration on T(x) = `target`.
fn householder(lambda: f64, target: f64, m: f64, mut x: f64) -> f64 {
    let mut previous = f64::NAN;
    for _ in 0..HOUSEHOLDER_ITERATIONS {
        let t = time_of_flight(lambda, x, m);
        let (d1, d2, d3) = derivatives(lambda, x, t);
        let f = t - target;
        let next = x - f * (d1 * d1 - f * d2 / 2.0) / (d1 * (d1 * d1 - f * d2) + d3 * f * f / 6.0);
        if next == x || next == previous {
            return next;
        }
        previous = x;
        x = next;
    }
    x
}

/// Minimum of T(x) for `m ≥ 1` revolutions, by Halley iteration on T'(x) = 0.
fn minimum_time_of_flight(lambda: f64, m: f64) -> f64 {
    if lambda == 1.0 {
        return time_of_flight(lambda, 0.0, m);
    }
    let mut x = 0.1;
    let mut previous = f64::NAN;
    for _ in 0..HALLEY_ITERATIONS {
        let t = time_of_flight(lambda, x, m);
        let (d1, d2, d3) = derivatives(lambda, x, t);
        if d2 == 0.0 {
            break;
        }
        let next = x - 2.0 * d1 * d2 / (2.0 * d2 * d2 - d1 * d3);
        if next == x || next == previous {
            x = next;
            break;
        }
        previous = x;
        x = next;
    }
    time_of_flight(lambda, x, m)
}

/// Largest revolution count with a solution for dimensionless time `t`.
fn max_revolutions(lambda: f64, t: f64) -> u32 {
    let mut m = (t / PI).floor() as u32;
    let t00 = lambda.acos() + lambda * (1.0 - lambda * lambda).sqrt();
    if m > 0 && t < t00 + f64::from(m) * PI && t < minimum_time_of_flight(lambda, f64::from(m)) {
        m -= 1;
    }
    m
}
