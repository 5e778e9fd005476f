//! Orrery: Keplerian orbits, celestial body hierarchies and transfer
//! planning.
//!
//! The workspace crates are re-exported here so that front-ends and
//! integration tests can depend on a single crate.

pub use orrery_bodies as bodies;
pub use orrery_config as config;
pub use orrery_core as core;
pub use orrery_export as export;
pub use orrery_impulsive as impulsive;
pub use orrery_lowthrust as lowthrust;
pub use orrery_orbits as orbits;
pub use orrery_propulsion as propulsion;
pub use orrery_transfer as transfer;

/// Returns the version of the library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
