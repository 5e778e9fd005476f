use std::f64::consts::{FRAC_PI_2, PI, TAU};

use orrery_core::constants::GRAVITATIONAL_CONSTANT;
use orrery_core::coordinates::CelestialCoordinates;
use orrery_core::matrix;
use orrery_core::vector::{self, Vector3, Z_AXIS};
use orrery_orbits::{BodyId, Orbit};

/// A celestial body: physical properties, rotation and optional orbit.
///
/// Derived fields (mass/μ pair, sphere of influence, rotation rates, tilt,
/// synodic day) are recomputed by the setters that feed them.
#[derive(Debug, Clone, PartialEq)]
pub struct CelestialBody {
    name: String,
    radius: f64,

    gravitational_parameter: f64,
    mass: f64,
    satellites: Vec<BodyId>,

    orbit: Option<Orbit>,
    sphere_of_influence: f64,

    positive_pole: Option<CelestialCoordinates>,
    rotational_period: f64,
    sidereal_day: f64,
    synodic_day: f64,
    tilt: f64,
    angular_speed: f64,
    angular_velocity: Vector3,
    surface_velocity: f64,
}

impl CelestialBody {
    /// A massless point with no orbit and no rotation.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            radius: 0.0,
            gravitational_parameter: 0.0,
            mass: 0.0,
            satellites: Vec::new(),
            orbit: None,
            sphere_of_influence: f64::INFINITY,
            positive_pole: None,
            rotational_period: 0.0,
            sidereal_day: 0.0,
            synodic_day: f64::NAN,
            tilt: 0.0,
            angular_speed: 0.0,
            angular_velocity: vector::ZERO,
            surface_velocity: 0.0,
        }
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_radius(&mut self, radius: f64) {
        self.radius = radius;
        self.update_angular_velocity();
    }

    /// Sets μ and derives the mass through the gravitational constant.
    pub fn set_gravitational_parameter(&mut self, gravitational_parameter: f64) {
        self.gravitational_parameter = gravitational_parameter;
        self.mass = gravitational_parameter / GRAVITATIONAL_CONSTANT;
        self.update_sphere_of_influence();
    }

    /// Sets the mass and derives μ through the gravitational constant.
    pub fn set_mass(&mut self, mass: f64) {
        self.mass = mass;
        self.gravitational_parameter = GRAVITATIONAL_CONSTANT * mass;
        self.update_sphere_of_influence();
    }

    /// Sidereal rotation period; negative for retrograde rotation.
    ///
    /// Zero on a body with an orbit means tidally locked: the sidereal day
    /// follows the orbital period.
    pub fn set_rotation(&mut self, sidereal_day: f64) {
        self.rotational_period = sidereal_day;
        self.update_rotation();
    }

    /// Direction of the rotational pole; `None` keeps the axis on +z.
    pub fn set_axis(&mut self, positive_pole: Option<CelestialCoordinates>) {
        self.positive_pole = positive_pole;
        self.update_tilt();
        self.update_angular_velocity();
    }

    /// Only the arena may assign orbits, since satellite lists depend on it.
    pub(crate) fn set_orbit(&mut self, orbit: Option<Orbit>) {
        self.orbit = orbit;
        self.update_sphere_of_influence();
        self.update_rotation();
    }

    pub(crate) fn append_satellite(&mut self, satellite: BodyId) {
        self.satellites.push(satellite);
    }

    /// Swap-remove: satellite order is not preserved.
    pub(crate) fn remove_satellite(&mut self, satellite: BodyId) -> bool {
        match self.satellites.iter().position(|&s| s == satellite) {
            Some(index) => {
                self.satellites.swap_remove(index);
                true
            }
            None => false,
        }
    }

    fn update_sphere_of_influence(&mut self) {
        self.sphere_of_influence = match &self.orbit {
            None => f64::INFINITY,
            Some(orbit) => {
                let ratio = self.gravitational_parameter / orbit.gravitational_parameter();
                orbit.semi_major_axis() * ratio.powf(0.4)
            }
        };
    }

    fn update_rotation(&mut self) {
        self.sidereal_day = match &self.orbit {
            Some(orbit) if self.rotational_period == 0.0 => orbit.period(),
            _ => self.rotational_period,
        };
        self.update_synodic_day();
        self.update_tilt();
        self.update_angular_velocity();
    }

    fn update_synodic_day(&mut self) {
        let Some(orbit) = &self.orbit else {
            self.synodic_day = f64::NAN;
            return;
        };
        let sidereal_year = orbit.period();
        let solar_year = sidereal_year - self.sidereal_day;
        self.synodic_day = if sidereal_year.is_infinite() {
            self.sidereal_day
        } else if solar_year == 0.0 {
            f64::INFINITY
        } else {
            self.sidereal_day * sidereal_year / solar_year
        };
    }

    /// Spherical triangle between the ecliptic pole, the orbit normal and
    /// the rotational pole.
    fn update_tilt(&mut self) {
        let (Some(pole), Some(orbit)) = (&self.positive_pole, &self.orbit) else {
            self.tilt = 0.0;
            return;
        };
        let b = orbit.inclination();
        let mut c = pole.ecliptic_latitude - FRAC_PI_2;
        if self.sidereal_day < 0.0 {
            c += PI;
        }
        let a = orbit.longitude_of_ascending_node() + FRAC_PI_2 - pole.ecliptic_longitude;
        let cos_tilt = b.cos() * c.cos() + b.sin() * c.sin() * a.cos();
        self.tilt = cos_tilt.clamp(-1.0, 1.0).acos();
    }

    fn update_angular_velocity(&mut self) {
        self.angular_speed = if self.sidereal_day == 0.0 {
            0.0
        } else {
            TAU / self.sidereal_day
        };
        self.surface_velocity = self.angular_speed * self.radius;
        if self.angular_speed == 0.0 {
            self.angular_velocity = vector::ZERO;
            return;
        }
        let axis = self.rotation_axis();
        self.angular_velocity = vector::scale(&axis, self.angular_speed);
    }

    /// Unit vector along the positive pole, in the ecliptic frame.
    pub fn rotation_axis(&self) -> Vector3 {
        match &self.positive_pole {
            None => Z_AXIS,
            Some(pole) => {
                let tilted = matrix::mul_vec(&matrix::rotation_x(pole.ecliptic_latitude - FRAC_PI_2), &Z_AXIS);
                matrix::mul_vec(&matrix::rotation_z(pole.ecliptic_longitude - FRAC_PI_2), &tilted)
            }
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn radius(&self) -> f64 {
        self.radius
    }
    pub fn gravitational_parameter(&self) -> f64 {
        self.gravitational_parameter
    }
    pub fn mass(&self) -> f64 {
        self.mass
    }
    pub fn satellites(&self) -> &[BodyId] {
        &self.satellites
    }
    pub fn orbit(&self) -> Option<&Orbit> {
        self.orbit.as_ref()
    }
    /// Infinite exactly when the body has no orbit.
    pub fn sphere_of_influence(&self) -> f64 {
        self.sphere_of_influence
    }
    pub fn positive_pole(&self) -> Option<&CelestialCoordinates> {
        self.positive_pole.as_ref()
    }
    /// Rotation period as configured (zero when unset).
    pub fn rotational_period(&self) -> f64 {
        self.rotational_period
    }
    pub fn sidereal_day(&self) -> f64 {
        self.sidereal_day
    }
    /// Solar day; NaN without an orbit.
    pub fn synodic_day(&self) -> f64 {
        self.synodic_day
    }
    pub fn tilt(&self) -> f64 {
        self.tilt
    }
    pub fn angular_speed(&self) -> f64 {
        self.angular_speed
    }
    pub fn angular_velocity(&self) -> Vector3 {
        self.angular_velocity
    }
    pub fn surface_velocity(&self) -> f64 {
        self.surface_velocity
    }

    /// Gravitational acceleration at `distance` from the centre.
    ///
    /// Inside the body only the enclosed mass pulls (uniform density).
    pub fn gravity(&self, distance: f64) -> f64 {
        let mut mu = self.gravitational_parameter;
        if distance == 0.0 {
            return 0.0;
        } else if distance < self.radius {
            mu *= (distance / self.radius).powi(3);
        }
        mu / (distance * distance)
    }

    /// Escape velocity from `distance`, with a uniform-density interior.
    pub fn escape_velocity(&self, distance: f64) -> f64 {
        let mu = self.gravitational_parameter;
        if distance < self.radius {
            let r = distance;
            let big_r = self.radius;
            return (mu * (3.0 / big_r - r * r / big_r.powi(3))).sqrt();
        }
        (2.0 * mu / distance).sqrt()
    }

    /// Apparent angular diameter seen from `distance`.
    pub fn angular_diameter(&self, distance: f64) -> f64 {
        2.0 * (self.radius / distance).asin()
    }
}
