//! Building a [`System`] from catalog records.

use std::path::Path;

use orrery_config::{BodyRecord, Catalog, ConfigError, load_catalog};
use orrery_core::coordinates::CelestialCoordinates;
use orrery_orbits::{Orbit, OrbitError};
use thiserror::Error;
use tracing::{debug, info};

use crate::{CelestialBody, System, SystemError};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("body '{body}' orbits unknown primary '{primary}'")]
    UnknownPrimary { body: String, primary: String },
    #[error("body '{body}' has an invalid orbit: {source}")]
    Orbit {
        body: String,
        #[source]
        source: OrbitError,
    },
    #[error(transparent)]
    System(#[from] SystemError),
}

fn body_from_record(name: &str, record: &BodyRecord) -> CelestialBody {
    let mut body = CelestialBody::new(name);
    body.set_radius(record.radius);
    if record.gravitational_parameter != 0.0 {
        body.set_gravitational_parameter(record.gravitational_parameter);
    } else {
        body.set_mass(record.mass);
    }
    body.set_rotation(record.rotational_period);
    body.set_axis(record.positive_pole.as_ref().map(|pole| {
        CelestialCoordinates::from_equatorial(pole.right_ascension, pole.declination, pole.distance)
    }));
    body
}

/// Build a system from a catalog.
///
/// Every body is inserted first so that primaries are in place, with their
/// final gravitational parameters, before any orbit is determined.
pub fn system_from_catalog(catalog: &Catalog) -> Result<System, LoadError> {
    let mut system = System::new();
    let ids = catalog
        .iter()
        .map(|(name, record)| system.add(body_from_record(name, record)))
        .collect::<Result<Vec<_>, _>>()?;

    for ((name, record), id) in catalog.iter().zip(ids) {
        let Some(elements) = &record.orbit else {
            continue;
        };
        let primary = system
            .find(&elements.primary)
            .ok_or_else(|| LoadError::UnknownPrimary {
                body: name.clone(),
                primary: elements.primary.clone(),
            })?;
        let orbit = Orbit::from_semi_major(
            system.primary_handle(primary)?,
            elements.semi_major_axis,
            elements.eccentricity,
        )
        .map_err(|source| LoadError::Orbit {
            body: name.clone(),
            source,
        })?
        .with_orientation(
            elements.longitude_of_ascending_node,
            elements.inclination,
            elements.argument_of_periapsis,
            elements.epoch,
            elements.mean_anomaly_at_epoch,
        );
        debug!(body = %name, primary = %elements.primary, "assigned orbit");
        system.set_orbit(id, Some(orbit))?;
    }

    system.check_primary_chains()?;
    info!(bodies = system.len(), "loaded celestial system");
    Ok(system)
}

/// Read a catalog from `path` and build its system.
pub fn load_system<P: AsRef<Path>>(path: P) -> Result<System, LoadError> {
    let catalog = load_catalog(path)?;
    system_from_catalog(&catalog)
}
