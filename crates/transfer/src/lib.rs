//! Transfer planning between two bodies of a loaded [`System`].
//!
//! Both modules work on a [`TransferPair`]: an origin and a destination that
//! orbit the same primary.

pub mod estimate;
pub mod porkchop;

use orrery_bodies::{BodyId, CelestialBody, Orbit, System, SystemError};
use thiserror::Error;

pub use estimate::{EstimateOptions, TransferEstimate, estimate};
pub use porkchop::{
    PorkchopError, PorkchopPoint, PorkchopRequest, PorkchopSummary, TimeWindow, best_point, generate,
};

#[derive(Debug, Error)]
pub enum TransferError {
    #[error(transparent)]
    System(#[from] SystemError),
    #[error("'{0}' has no orbit")]
    NoOrbit(String),
    #[error("'{0}' cannot be both origin and destination")]
    SameBody(String),
    #[error("'{origin}' and '{destination}' do not orbit the same primary")]
    NoCommonPrimary { origin: String, destination: String },
}

/// Origin and destination bodies resolved against their shared primary.
#[derive(Debug, Clone, Copy)]
pub struct TransferPair<'a> {
    pub primary: &'a CelestialBody,
    pub origin: &'a CelestialBody,
    pub destination: &'a CelestialBody,
    pub origin_orbit: &'a Orbit,
    pub destination_orbit: &'a Orbit,
}

impl<'a> TransferPair<'a> {
    pub fn resolve(system: &'a System, origin: BodyId, destination: BodyId) -> Result<Self, TransferError> {
        let origin_body = system.body(origin)?;
        let destination_body = system.body(destination)?;
        if origin == destination {
            return Err(TransferError::SameBody(origin_body.name().to_string()));
        }
        let origin_orbit = origin_body
            .orbit()
            .ok_or_else(|| TransferError::NoOrbit(origin_body.name().to_string()))?;
        let destination_orbit = destination_body
            .orbit()
            .ok_or_else(|| TransferError::NoOrbit(destination_body.name().to_string()))?;
        if origin_orbit.primary() != destination_orbit.primary() {
            return Err(TransferError::NoCommonPrimary {
                origin: origin_body.name().to_string(),
                destination: destination_body.name().to_string(),
            });
        }
        Ok(Self {
            primary: system.body(origin_orbit.primary())?,
            origin: origin_body,
            destination: destination_body,
            origin_orbit,
            destination_orbit,
        })
    }
}
