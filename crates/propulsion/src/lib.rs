//! Engines and vehicle mass properties.

use orrery_config::VehicleConfig;
use orrery_core::constants::G0;

/// A rocket engine described by its vacuum thrust and specific impulse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Engine {
    /// Newtons at full throttle.
    pub thrust: f64,
    /// Seconds.
    pub specific_impulse: f64,
}

impl Engine {
    pub fn exhaust_velocity(&self) -> f64 {
        self.specific_impulse * G0
    }

    /// Propellant consumption ṁ = throttle·F/(Isp·g₀), in kg/s.
    pub fn mass_flow_rate(&self, throttle: f64) -> f64 {
        throttle * self.thrust / self.exhaust_velocity()
    }
}

/// Basic vehicle definition: a dry structure, its propellant and one engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Vehicle {
    pub name: String,
    pub dry_mass: f64,
    pub propellant_mass: f64,
    pub engine: Engine,
}

impl Vehicle {
    pub fn mass(&self) -> f64 {
        self.dry_mass + self.propellant_mass
    }

    pub fn has_propellant(&self) -> bool {
        self.propellant_mass > 0.0
    }

    /// Tsiolkovsky delta-v left in the tanks.
    pub fn delta_v(&self) -> f64 {
        self.engine.exhaust_velocity() * (self.mass() / self.dry_mass).ln()
    }

    /// Thrust (N) the engine produces at `throttle`, zero once the tanks are dry.
    pub fn thrust(&self, throttle: f64) -> f64 {
        if self.has_propellant() {
            throttle * self.engine.thrust
        } else {
            0.0
        }
    }

    /// Run the engine at `throttle` for `duration` seconds and return the
    /// propellant actually consumed.
    pub fn burn(&mut self, throttle: f64, duration: f64) -> f64 {
        let wanted = self.engine.mass_flow_rate(throttle) * duration;
        let used = wanted.min(self.propellant_mass).max(0.0);
        self.propellant_mass -= used;
        used
    }
}

impl From<&VehicleConfig> for Vehicle {
    fn from(config: &VehicleConfig) -> Self {
        Self {
            name: config.name.clone(),
            dry_mass: config.dry_mass_kg,
            propellant_mass: config.propellant_mass_kg,
            engine: Engine {
                thrust: config.thrust_newtons,
                specific_impulse: config.isp_seconds,
            },
        }
    }
}

/// Pick a vehicle by name (case-insensitive), or the first one when no name is given.
pub fn select<'a>(vehicles: &'a [VehicleConfig], name: Option<&str>) -> Option<&'a VehicleConfig> {
    match name {
        Some(name) => vehicles.iter().find(|v| v.name.eq_ignore_ascii_case(name)),
        None => vehicles.first(),
    }
}
