use std::collections::HashMap;

use orrery_core::coordinates::CelestialCoordinates;
use orrery_core::vector::{self, Vector3};
use orrery_orbits::{BodyId, Orbit, Primary, StateVector};
use thiserror::Error;
use tracing::warn;

use crate::CelestialBody;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SystemError {
    #[error("no body with id {}", .0.0)]
    UnknownBody(BodyId),
    #[error("a body named '{0}' already exists")]
    DuplicateName(String),
    #[error("primary chain of '{0}' forms a cycle")]
    PrimaryCycle(String),
}

/// Arena of celestial bodies addressed by [`BodyId`].
///
/// Bodies are never removed, so ids stay valid for the life of the system.
#[derive(Debug, Clone, Default)]
pub struct System {
    bodies: Vec<CelestialBody>,
    names: HashMap<String, BodyId>,
}

impl System {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a body built with the intrinsic setters. Any orbit is assigned
    /// afterwards with [`System::set_orbit`].
    pub fn add(&mut self, mut body: CelestialBody) -> Result<BodyId, SystemError> {
        if self.names.contains_key(body.name()) {
            return Err(SystemError::DuplicateName(body.name().to_string()));
        }
        let id = BodyId(self.bodies.len());
        body.set_orbit(None);
        self.names.insert(body.name().to_string(), id);
        self.bodies.push(body);
        Ok(id)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn get(&self, id: BodyId) -> Option<&CelestialBody> {
        self.bodies.get(id.0)
    }

    pub fn body(&self, id: BodyId) -> Result<&CelestialBody, SystemError> {
        self.get(id).ok_or(SystemError::UnknownBody(id))
    }

    fn body_mut(&mut self, id: BodyId) -> Result<&mut CelestialBody, SystemError> {
        self.bodies.get_mut(id.0).ok_or(SystemError::UnknownBody(id))
    }

    /// Look a body up by its exact name.
    pub fn find(&self, name: &str) -> Option<BodyId> {
        self.names.get(name).copied()
    }

    /// Case-insensitive lookup, for names typed by users.
    pub fn find_ignore_case(&self, name: &str) -> Option<BodyId> {
        self.find(name).or_else(|| {
            self.iter()
                .find(|(_, body)| body.name().eq_ignore_ascii_case(name))
                .map(|(id, _)| id)
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (BodyId, &CelestialBody)> {
        self.bodies.iter().enumerate().map(|(i, body)| (BodyId(i), body))
    }

    /// Handle for determining orbits around `id`.
    pub fn primary_handle(&self, id: BodyId) -> Result<Primary, SystemError> {
        let body = self.body(id)?;
        Ok(Primary::new(id, body.gravitational_parameter()))
    }

    /// The body `id` orbits, if any.
    pub fn primary_of(&self, id: BodyId) -> Result<Option<BodyId>, SystemError> {
        Ok(self.body(id)?.orbit().map(Orbit::primary))
    }

    /// Assign (or clear) the orbit of `id`.
    ///
    /// The body leaves its previous primary's satellite list and joins the new
    /// one. The orbit is rebuilt if it carries a stale primary parameter.
    /// A body orbiting itself is accepted here and reported by the
    /// position queries and [`System::check_primary_chains`].
    pub fn set_orbit(&mut self, id: BodyId, orbit: Option<Orbit>) -> Result<(), SystemError> {
        self.body(id)?;
        let orbit = match orbit {
            None => None,
            Some(orbit) => {
                let mu = self.body(orbit.primary())?.gravitational_parameter();
                if orbit.gravitational_parameter() == mu {
                    Some(orbit)
                } else {
                    Some(orbit.with_gravitational_parameter(mu))
                }
            }
        };

        if let Some(old) = self.primary_of(id)? {
            self.body_mut(old)?.remove_satellite(id);
        }
        if let Some(new) = orbit.as_ref().map(Orbit::primary) {
            self.body_mut(new)?.append_satellite(id);
        }
        self.body_mut(id)?.set_orbit(orbit);
        Ok(())
    }

    pub fn set_name(&mut self, id: BodyId, name: &str) -> Result<(), SystemError> {
        if let Some(&existing) = self.names.get(name) {
            if existing == id {
                return Ok(());
            }
            return Err(SystemError::DuplicateName(name.to_string()));
        }
        let body = self.body_mut(id)?;
        let old = body.name().to_string();
        body.set_name(name);
        self.names.remove(&old);
        self.names.insert(name.to_string(), id);
        Ok(())
    }

    pub fn set_radius(&mut self, id: BodyId, radius: f64) -> Result<(), SystemError> {
        self.body_mut(id)?.set_radius(radius);
        Ok(())
    }

    /// Change μ of `id` and refresh the orbits of everything circling it.
    pub fn set_gravitational_parameter(&mut self, id: BodyId, gravitational_parameter: f64) -> Result<(), SystemError> {
        self.body_mut(id)?.set_gravitational_parameter(gravitational_parameter);
        self.refresh_satellite_orbits(id)
    }

    pub fn set_mass(&mut self, id: BodyId, mass: f64) -> Result<(), SystemError> {
        self.body_mut(id)?.set_mass(mass);
        self.refresh_satellite_orbits(id)
    }

    pub fn set_rotation(&mut self, id: BodyId, sidereal_day: f64) -> Result<(), SystemError> {
        self.body_mut(id)?.set_rotation(sidereal_day);
        Ok(())
    }

    pub fn set_axis(&mut self, id: BodyId, positive_pole: Option<CelestialCoordinates>) -> Result<(), SystemError> {
        self.body_mut(id)?.set_axis(positive_pole);
        Ok(())
    }

    fn refresh_satellite_orbits(&mut self, id: BodyId) -> Result<(), SystemError> {
        let mu = self.body(id)?.gravitational_parameter();
        let satellites = self.body(id)?.satellites().to_vec();
        for satellite in satellites {
            let body = self.body_mut(satellite)?;
            let refreshed = match body.orbit() {
                Some(orbit) if orbit.primary() == id => orbit.with_gravitational_parameter(mu),
                _ => continue,
            };
            body.set_orbit(Some(refreshed));
        }
        Ok(())
    }

    /// Add `satellite` to the satellite list of `id` without touching orbits.
    pub fn append_satellite(&mut self, id: BodyId, satellite: BodyId) -> Result<(), SystemError> {
        self.body(satellite)?;
        self.body_mut(id)?.append_satellite(satellite);
        Ok(())
    }

    /// Remove `satellite` from the list of `id`; returns whether it was there.
    pub fn remove_satellite(&mut self, id: BodyId, satellite: BodyId) -> Result<bool, SystemError> {
        Ok(self.body_mut(id)?.remove_satellite(satellite))
    }

    /// Walk the primary chain of `id`, summing `offset` for every orbit.
    ///
    /// A chain longer than the arena can only be a cycle.
    fn accumulate(&self, id: BodyId, offset: impl Fn(&Orbit) -> Vector3) -> Result<Vector3, SystemError> {
        let mut total = vector::ZERO;
        let mut current = id;
        for _ in 0..=self.bodies.len() {
            match self.body(current)?.orbit() {
                None => return Ok(total),
                Some(orbit) => {
                    total = vector::add(&total, &offset(orbit));
                    current = orbit.primary();
                }
            }
        }
        let name = self.body(id)?.name().to_string();
        warn!(body = %name, "primary chain does not reach a root body");
        Err(SystemError::PrimaryCycle(name))
    }

    /// Position of `id` relative to the root of its primary chain.
    pub fn global_position_at_time(&self, id: BodyId, time: f64) -> Result<Vector3, SystemError> {
        self.accumulate(id, |orbit| orbit.position_at_time(time))
    }

    pub fn global_velocity_at_time(&self, id: BodyId, time: f64) -> Result<Vector3, SystemError> {
        self.accumulate(id, |orbit| orbit.velocity_at_time(time))
    }

    pub fn global_state_at_time(&self, id: BodyId, time: f64) -> Result<StateVector, SystemError> {
        Ok(StateVector {
            position: self.global_position_at_time(id, time)?,
            velocity: self.global_velocity_at_time(id, time)?,
        })
    }

    /// State of `id` relative to `origin` (both in the root frame).
    pub fn relative_state_at_time(&self, id: BodyId, origin: BodyId, time: f64) -> Result<StateVector, SystemError> {
        let body = self.global_state_at_time(id, time)?;
        let origin = self.global_state_at_time(origin, time)?;
        Ok(StateVector {
            position: vector::sub(&body.position, &origin.position),
            velocity: vector::sub(&body.velocity, &origin.velocity),
        })
    }

    /// Verify that every primary chain ends at a root body.
    pub fn check_primary_chains(&self) -> Result<(), SystemError> {
        for (id, _) in self.iter() {
            self.accumulate(id, |_| vector::ZERO)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(name: &str, mu: f64) -> CelestialBody {
        let mut body = CelestialBody::new(name);
        body.set_gravitational_parameter(mu);
        body
    }

    fn circular(system: &System, primary: BodyId, radius: f64) -> Orbit {
        Orbit::from_periapsis(system.primary_handle(primary).unwrap(), radius, 0.0).unwrap()
    }

    fn two_level() -> (System, BodyId, BodyId, BodyId) {
        let mut system = System::new();
        let sun = system.add(body("Sun", 1e20)).unwrap();
        let planet = system.add(body("Planet", 1e14)).unwrap();
        let moon = system.add(body("Moon", 1e12)).unwrap();
        let orbit = circular(&system, sun, 1e11);
        system.set_orbit(planet, Some(orbit)).unwrap();
        let orbit = circular(&system, planet, 1e8);
        system.set_orbit(moon, Some(orbit)).unwrap();
        (system, sun, planet, moon)
    }

    #[test]
    fn satellite_lists_follow_orbit_assignment() {
        let (mut system, sun, planet, moon) = two_level();
        assert_eq!(system.body(sun).unwrap().satellites(), &[planet]);
        assert_eq!(system.body(planet).unwrap().satellites(), &[moon]);

        let orbit = circular(&system, sun, 2e11);
        system.set_orbit(moon, Some(orbit)).unwrap();
        assert!(system.body(planet).unwrap().satellites().is_empty());
        assert_eq!(system.body(sun).unwrap().satellites().len(), 2);

        let extra = system.add(body("Probe", 0.0)).unwrap();
        system.append_satellite(sun, extra).unwrap();
        assert_eq!(system.body(sun).unwrap().satellites().len(), 3);
        system.set_orbit(moon, None).unwrap();
        assert_eq!(system.body(sun).unwrap().satellites().len(), 2);
        assert!(system.remove_satellite(sun, extra).unwrap());
        assert_eq!(system.body(sun).unwrap().satellites(), &[planet]);
        assert!(system.body(moon).unwrap().sphere_of_influence().is_infinite());
    }

    #[test]
    fn global_position_sums_the_chain() {
        let (system, sun, planet, moon) = two_level();
        assert_eq!(system.global_position_at_time(sun, 0.0).unwrap(), vector::ZERO);
        let p = system.global_position_at_time(planet, 0.0).unwrap();
        let m = system.global_position_at_time(moon, 0.0).unwrap();
        assert!((p[0] - 1e11).abs() < 1e-3);
        assert!((m[0] - (1e11 + 1e8)).abs() < 1e-3);

        let later = system.global_position_at_time(moon, 1.0).unwrap();
        assert!(vector::distance(&m, &later) != 0.0);

        let relative = system.relative_state_at_time(moon, planet, 1e4).unwrap();
        assert!((vector::norm(&relative.position) - 1e8).abs() < 1e-3);
        let speed = (1e14f64 / 1e8).sqrt();
        assert!((vector::norm(&relative.velocity) - speed).abs() < 1e-9);
    }

    #[test]
    fn self_primary_is_a_cycle() {
        let mut system = System::new();
        let a = system.add(body("A", 1e10)).unwrap();
        let orbit = circular(&system, a, 1e6);
        system.set_orbit(a, Some(orbit)).unwrap();
        assert_eq!(
            system.global_position_at_time(a, 0.0),
            Err(SystemError::PrimaryCycle("A".into()))
        );
        assert!(system.check_primary_chains().is_err());
    }

    #[test]
    fn transitive_cycle_is_detected() {
        let (mut system, sun, planet, moon) = two_level();
        assert!(system.check_primary_chains().is_ok());
        let orbit = circular(&system, moon, 1e6);
        system.set_orbit(sun, Some(orbit)).unwrap();
        assert!(matches!(
            system.global_velocity_at_time(planet, 0.0),
            Err(SystemError::PrimaryCycle(name)) if name == "Planet"
        ));
        assert!(system.check_primary_chains().is_err());
    }

    #[test]
    fn primary_parameter_change_refreshes_satellites() {
        let (mut system, sun, planet, _) = two_level();
        let before = system.body(planet).unwrap().orbit().unwrap().period();
        let soi_before = system.body(planet).unwrap().sphere_of_influence();
        system.set_gravitational_parameter(sun, 4e20).unwrap();
        let orbit = system.body(planet).unwrap().orbit().unwrap();
        assert_eq!(orbit.gravitational_parameter(), 4e20);
        assert!((orbit.period() - before / 2.0).abs() < 1e-6 * before);
        assert!(system.body(planet).unwrap().sphere_of_influence() < soi_before);
    }

    #[test]
    fn stale_orbit_parameter_is_corrected() {
        let (mut system, sun, planet, _) = two_level();
        let stale = Orbit::from_periapsis(Primary::new(sun, 1.0), 1e11, 0.0).unwrap();
        system.set_orbit(planet, Some(stale)).unwrap();
        let orbit = system.body(planet).unwrap().orbit().unwrap();
        assert_eq!(orbit.gravitational_parameter(), 1e20);
    }

    #[test]
    fn names_are_unique() {
        let (mut system, sun, planet, _) = two_level();
        assert_eq!(system.find("Planet"), Some(planet));
        assert_eq!(system.find_ignore_case("sUN"), Some(sun));
        assert!(matches!(system.add(body("Sun", 1.0)), Err(SystemError::DuplicateName(_))));
        assert!(system.set_name(planet, "Sun").is_err());
        system.set_name(planet, "Earth").unwrap();
        assert_eq!(system.find("Earth"), Some(planet));
        assert_eq!(system.find("Planet"), None);
        assert_eq!(system.body(BodyId(42)).unwrap_err(), SystemError::UnknownBody(BodyId(42)));
    }
}
