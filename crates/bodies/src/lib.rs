//! Celestial bodies and the arena that ties them into a system.
//!
//! A [`System`] owns every [`CelestialBody`]; bodies refer to each other by
//! [`BodyId`]. Orbits are assigned through the system so that satellite
//! lists and cached primary parameters stay in step.

mod body;
pub mod load;
mod system;

pub use body::CelestialBody;
pub use load::{LoadError, load_system, system_from_catalog};
pub use orrery_orbits::{BodyId, Orbit, Primary, StateVector};
pub use system::{System, SystemError};
