//! Two-body Keplerian orbits and patched-conic helpers.
//!
//! An [`Orbit`] refers to its primary through a [`BodyId`] (an index into
//! the body arena owned by `orrery_bodies`) and keeps a copy of the
//! primary's gravitational parameter, so every query here is a pure function
//! of the orbit value.

pub mod kepler;
mod orbit;
pub mod patched_conic;

use std::ops::{Add, Mul};

use orrery_core::vector::{self, Vector3};
use thiserror::Error;

pub use orbit::Orbit;

/// Stable index of a body inside a body arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub usize);

/// The body an orbit is built around.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Primary {
    pub id: BodyId,
    /// μ = G·M (m³/s²)
    pub gravitational_parameter: f64,
}

impl Primary {
    pub fn new(id: BodyId, gravitational_parameter: f64) -> Self {
        Self {
            id,
            gravitational_parameter,
        }
    }
}

/// Position (m) and velocity (m/s) in the primary's inertial frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StateVector {
    pub position: Vector3,
    pub velocity: Vector3,
}

impl Add for StateVector {
    type Output = StateVector;

    fn add(self, rhs: StateVector) -> StateVector {
        StateVector {
            position: vector::add(&self.position, &rhs.position),
            velocity: vector::add(&self.velocity, &rhs.velocity),
        }
    }
}

/// Scales both halves, as needed by the step formulas of numerical integrators.
impl Mul<f64> for StateVector {
    type Output = StateVector;

    fn mul(self, k: f64) -> StateVector {
        StateVector {
            position: vector::scale(&self.position, k),
            velocity: vector::scale(&self.velocity, k),
        }
    }
}

/// Inconsistent combination of orbital elements.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OrbitError {
    #[error("invalid orbit shape: eccentricity must be non-negative (got {0})")]
    NegativeEccentricity(f64),
    #[error(
        "invalid orbit shape: semi-major axis {semi_major_axis} does not match eccentricity {eccentricity}"
    )]
    SemiMajorAxisSign {
        semi_major_axis: f64,
        eccentricity: f64,
    },
    #[error("invalid orbit shape: a parabola has no finite semi-major axis")]
    ParabolaFromSemiMajorAxis,
    #[error("invalid orbit shape: eccentricity {0} describes an open trajectory, which has no period")]
    OpenOrbitFromPeriod(f64),
    #[error("invalid orbit shape: an infinite period describes an open trajectory")]
    InfinitePeriod,
}
