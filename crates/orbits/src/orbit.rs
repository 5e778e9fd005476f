use std::f64::consts::{PI, TAU};

use orrery_core::angle;
use orrery_core::matrix::{self, Matrix3};
use orrery_core::vector::{self, Vector3, X_AXIS, Z_AXIS};
use tracing::debug;

use crate::{BodyId, OrbitError, Primary, StateVector, kepler};

/// Eccentricities this close to 1 recovered from a state vector are taken as
/// parabolic.
pub const PARABOLIC_TOLERANCE: f64 = 1e-12;

/// Keplerian orbit around a primary body.
///
/// Shape and orientation elements are stored together with every quantity
/// derived from them. Values are only produced by the determination
/// constructors and [`Orbit::orient`], which recompute the derived set in
/// full, so the cache never drifts from the elements.
#[derive(Debug, Clone, PartialEq)]
pub struct Orbit {
    primary: BodyId,
    gravitational_parameter: f64,

    periapsis: f64,
    eccentricity: f64,
    inclination: f64,
    longitude_of_ascending_node: f64,
    argument_of_periapsis: f64,
    epoch: f64,
    mean_anomaly_at_epoch: f64,

    semi_major_axis: f64,
    semi_minor_axis: f64,
    apoapsis: f64,
    semi_latus_rectum: f64,
    focus: f64,
    mean_motion: f64,
    period: f64,
    orientation: Matrix3,
}

impl Orbit {
    /// Canonical determination from periapsis distance and eccentricity.
    ///
    /// The result has zero orientation, zero epoch and zero mean anomaly at
    /// epoch; chain [`Orbit::with_orientation`] to place it.
    pub fn from_periapsis(primary: Primary, periapsis: f64, eccentricity: f64) -> Result<Self, OrbitError> {
        if eccentricity < 0.0 || eccentricity.is_nan() {
            debug!(eccentricity, "rejecting negative eccentricity");
            return Err(OrbitError::NegativeEccentricity(eccentricity));
        }

        let mu = primary.gravitational_parameter;
        let e = eccentricity;
        let semi_major_axis = if e == 1.0 { f64::INFINITY } else { periapsis / (1.0 - e) };
        let semi_latus_rectum = periapsis * (1.0 + e);
        let mean_motion = if e == 1.0 {
            3.0 * (mu / semi_latus_rectum.powi(3)).sqrt()
        } else {
            (mu / semi_major_axis.powi(3).abs()).sqrt()
        };
        let period = if e < 1.0 { TAU / mean_motion } else { f64::INFINITY };

        Ok(Self {
            primary: primary.id,
            gravitational_parameter: mu,
            periapsis,
            eccentricity: e,
            inclination: 0.0,
            longitude_of_ascending_node: 0.0,
            argument_of_periapsis: 0.0,
            epoch: 0.0,
            mean_anomaly_at_epoch: 0.0,
            semi_major_axis,
            semi_minor_axis: semi_major_axis * (1.0 - e * e).abs().sqrt(),
            apoapsis: semi_major_axis * (1.0 + e),
            semi_latus_rectum,
            focus: semi_major_axis * e,
            mean_motion,
            period,
            orientation: matrix::IDENTITY,
        })
    }

    /// Determination from semi-major axis and eccentricity.
    ///
    /// Closed orbits need `a > 0`, hyperbolas `a < 0`; a parabola has an
    /// infinite semi-major axis and cannot be described this way.
    pub fn from_semi_major(primary: Primary, semi_major_axis: f64, eccentricity: f64) -> Result<Self, OrbitError> {
        let a = semi_major_axis;
        let e = eccentricity;
        if e == 1.0 {
            debug!(semi_major_axis = a, "rejecting parabola from semi-major axis");
            return Err(OrbitError::ParabolaFromSemiMajorAxis);
        }
        if (e < 1.0 && a <= 0.0) || (e > 1.0 && a >= 0.0) {
            debug!(semi_major_axis = a, eccentricity = e, "rejecting semi-major axis sign");
            return Err(OrbitError::SemiMajorAxisSign {
                semi_major_axis: a,
                eccentricity: e,
            });
        }
        Self::from_periapsis(primary, a * (1.0 - e), e)
    }

    /// Determination from two apsides, in either order.
    ///
    /// An infinite apsis describes a parabola.
    pub fn from_apses(primary: Primary, apsis1: f64, apsis2: f64) -> Result<Self, OrbitError> {
        let periapsis = apsis1.abs().min(apsis2.abs());
        let eccentricity = if apsis1.is_infinite() || apsis2.is_infinite() {
            1.0
        } else {
            (apsis1 - apsis2).abs() / (apsis1 + apsis2).abs()
        };
        Self::from_periapsis(primary, periapsis, eccentricity)
    }

    /// Determination from orbital period and eccentricity (closed orbits only).
    pub fn from_period(primary: Primary, period: f64, eccentricity: f64) -> Result<Self, OrbitError> {
        if eccentricity >= 1.0 {
            debug!(eccentricity, "rejecting open orbit from period");
            return Err(OrbitError::OpenOrbitFromPeriod(eccentricity));
        }
        let a = semi_major_axis_for_period(primary.gravitational_parameter, period);
        Self::from_semi_major(primary, a, eccentricity)
    }

    /// Determination from orbital period and one apsis (periapsis or apoapsis).
    pub fn from_period_and_apsis(primary: Primary, period: f64, apsis: f64) -> Result<Self, OrbitError> {
        if period.is_infinite() {
            debug!(period, "rejecting infinite period");
            return Err(OrbitError::InfinitePeriod);
        }
        let a = semi_major_axis_for_period(primary.gravitational_parameter, period);
        let eccentricity = (apsis / a - 1.0).abs();
        Self::from_semi_major(primary, a, eccentricity)
    }

    /// Orbit determination from an inertial state vector at `epoch`.
    ///
    /// An eccentricity within [`PARABOLIC_TOLERANCE`] of 1 is rounded to
    /// exactly 1 so that the parabolic forms are used.
    pub fn from_state_vector(
        primary: Primary,
        position: Vector3,
        velocity: Vector3,
        epoch: f64,
    ) -> Result<Self, OrbitError> {
        let mu = primary.gravitational_parameter;
        let distance = vector::norm(&position);
        let speed = vector::norm(&velocity);
        let normal = vector::cross(&position, &velocity);

        let position_factor = speed * speed / mu - 1.0 / distance;
        let velocity_factor = vector::dot(&position, &velocity) / mu;
        let eccentricity_vector = vector::sub(
            &vector::scale(&position, position_factor),
            &vector::scale(&velocity, velocity_factor),
        );
        let mut eccentricity = vector::norm(&eccentricity_vector);
        if (eccentricity - 1.0).abs() < PARABOLIC_TOLERANCE {
            eccentricity = 1.0;
        }

        let h = vector::norm(&normal);
        let periapsis = h * h / mu / (1.0 + eccentricity);
        let orbit = Self::from_periapsis(primary, periapsis, eccentricity)?;

        let inclination = vector::angle(&normal, &Z_AXIS);
        let node = if inclination == 0.0 || inclination == PI {
            X_AXIS
        } else {
            vector::cross(&Z_AXIS, &normal)
        };
        let mut longitude_of_ascending_node = vector::angle(&X_AXIS, &node);
        if normal[0] < 0.0 {
            longitude_of_ascending_node = -longitude_of_ascending_node;
        }

        let periapsis_direction = if eccentricity != 0.0 {
            eccentricity_vector
        } else {
            X_AXIS
        };
        let argument_of_periapsis = vector::signed_angle(&node, &periapsis_direction, &normal);
        let true_anomaly = vector::signed_angle(&periapsis_direction, &position, &normal);
        let mean_anomaly_at_epoch = orbit.mean_anomaly_at_true_anomaly(true_anomaly);

        Ok(orbit.with_orientation(
            longitude_of_ascending_node,
            inclination,
            argument_of_periapsis,
            epoch,
            mean_anomaly_at_epoch,
        ))
    }

    /// Set orientation and timing elements, then rebuild the orientation matrix.
    ///
    /// Inclination is folded into `[0, π]`; a value past π is read as the
    /// retrograde equivalent, shifting node and argument of periapsis by π.
    /// Node and argument of periapsis end up in `[0, 2π)`.
    pub fn orient(
        &mut self,
        longitude_of_ascending_node: f64,
        inclination: f64,
        argument_of_periapsis: f64,
        epoch: f64,
        mean_anomaly_at_epoch: f64,
    ) {
        let mut inclination = angle::wrap_two_pi(inclination);
        let mut node = longitude_of_ascending_node;
        let mut argument = argument_of_periapsis;
        if inclination > PI {
            inclination = TAU - inclination;
            node -= PI;
            argument -= PI;
        }
        let node = angle::wrap_two_pi(node);
        let argument = angle::wrap_two_pi(argument);

        self.inclination = inclination;
        self.longitude_of_ascending_node = node;
        self.argument_of_periapsis = argument;
        self.epoch = epoch;
        self.mean_anomaly_at_epoch = mean_anomaly_at_epoch;
        self.orientation = matrix::from_euler_angles(node, inclination, argument);
    }

    /// Builder form of [`Orbit::orient`].
    pub fn with_orientation(
        mut self,
        longitude_of_ascending_node: f64,
        inclination: f64,
        argument_of_periapsis: f64,
        epoch: f64,
        mean_anomaly_at_epoch: f64,
    ) -> Self {
        self.orient(
            longitude_of_ascending_node,
            inclination,
            argument_of_periapsis,
            epoch,
            mean_anomaly_at_epoch,
        );
        self
    }

    /// Re-derive the shape for a new primary gravitational parameter.
    ///
    /// Periapsis, eccentricity and orientation are kept; mean motion and
    /// period follow the new parameter.
    pub fn with_gravitational_parameter(&self, gravitational_parameter: f64) -> Self {
        let primary = Primary {
            id: self.primary,
            gravitational_parameter,
        };
        match Self::from_periapsis(primary, self.periapsis, self.eccentricity) {
            Ok(orbit) => orbit.with_orientation(
                self.longitude_of_ascending_node,
                self.inclination,
                self.argument_of_periapsis,
                self.epoch,
                self.mean_anomaly_at_epoch,
            ),
            // eccentricity was validated when `self` was built
            Err(_) => self.clone(),
        }
    }

    /// Arena id of the body at the occupied focus.
    pub fn primary(&self) -> BodyId {
        self.primary
    }
    /// μ of the primary (m³/s²), cached when the orbit was determined.
    pub fn gravitational_parameter(&self) -> f64 {
        self.gravitational_parameter
    }
    /// Closest approach to the primary's centre (m).
    pub fn periapsis(&self) -> f64 {
        self.periapsis
    }
    pub fn eccentricity(&self) -> f64 {
        self.eccentricity
    }
    /// In `[0, π]`; past π/2 the orbit is retrograde.
    pub fn inclination(&self) -> f64 {
        self.inclination
    }
    pub fn longitude_of_ascending_node(&self) -> f64 {
        self.longitude_of_ascending_node
    }
    pub fn argument_of_periapsis(&self) -> f64 {
        self.argument_of_periapsis
    }
    /// Reference time (s) of [`Orbit::mean_anomaly_at_epoch`].
    pub fn epoch(&self) -> f64 {
        self.epoch
    }
    pub fn mean_anomaly_at_epoch(&self) -> f64 {
        self.mean_anomaly_at_epoch
    }
    /// Positive for closed orbits, infinite for a parabola, negative for a hyperbola.
    pub fn semi_major_axis(&self) -> f64 {
        self.semi_major_axis
    }
    pub fn semi_minor_axis(&self) -> f64 {
        self.semi_minor_axis
    }
    /// Farthest distance on a closed orbit. Infinite for a parabola and
    /// negative for a hyperbola, following `a·(1 + e)`.
    pub fn apoapsis(&self) -> f64 {
        self.apoapsis
    }
    /// `p = rp·(1 + e)`, finite for every conic.
    pub fn semi_latus_rectum(&self) -> f64 {
        self.semi_latus_rectum
    }
    /// Distance from the centre of the conic to the occupied focus.
    pub fn focus(&self) -> f64 {
        self.focus
    }
    /// Radians per second. A parabola uses `3·√(μ/p³)`, matching its
    /// mean anomaly `(E³ + 3E)/2`.
    pub fn mean_motion(&self) -> f64 {
        self.mean_motion
    }
    /// Infinite for open trajectories.
    pub fn period(&self) -> f64 {
        self.period
    }
    /// Rotation from the perifocal frame into the primary's inertial frame.
    pub fn orientation(&self) -> &Matrix3 {
        &self.orientation
    }

    pub fn is_closed(&self) -> bool {
        self.eccentricity < 1.0
    }

    pub fn mean_anomaly_at_time(&self, time: f64) -> f64 {
        self.mean_anomaly_at_epoch + self.mean_motion * (time - self.epoch)
    }

    pub fn time_at_mean_anomaly(&self, mean_anomaly: f64) -> f64 {
        self.epoch + (mean_anomaly - self.mean_anomaly_at_epoch) / self.mean_motion
    }

    pub fn eccentric_anomaly_at_mean_anomaly(&self, mean_anomaly: f64) -> f64 {
        kepler::eccentric_anomaly_at_mean_anomaly(self.eccentricity, mean_anomaly)
    }

    pub fn true_anomaly_at_eccentric_anomaly(&self, eccentric_anomaly: f64) -> f64 {
        kepler::true_anomaly_at_eccentric_anomaly(self.eccentricity, eccentric_anomaly)
    }

    pub fn eccentric_anomaly_at_true_anomaly(&self, true_anomaly: f64) -> f64 {
        kepler::eccentric_anomaly_at_true_anomaly(self.eccentricity, true_anomaly)
    }

    pub fn mean_anomaly_at_eccentric_anomaly(&self, eccentric_anomaly: f64) -> f64 {
        kepler::mean_anomaly_at_eccentric_anomaly(self.eccentricity, eccentric_anomaly)
    }

    pub fn true_anomaly_at_mean_anomaly(&self, mean_anomaly: f64) -> f64 {
        kepler::true_anomaly_at_mean_anomaly(self.eccentricity, mean_anomaly)
    }

    pub fn mean_anomaly_at_true_anomaly(&self, true_anomaly: f64) -> f64 {
        kepler::mean_anomaly_at_true_anomaly(self.eccentricity, true_anomaly)
    }

    pub fn true_anomaly_at_time(&self, time: f64) -> f64 {
        self.true_anomaly_at_mean_anomaly(self.mean_anomaly_at_time(time))
    }

    pub fn time_at_true_anomaly(&self, true_anomaly: f64) -> f64 {
        self.time_at_mean_anomaly(self.mean_anomaly_at_true_anomaly(true_anomaly))
    }

    /// Orbit equation `r = p / (1 + e·cos f)`.
    pub fn distance_at_true_anomaly(&self, true_anomaly: f64) -> f64 {
        self.semi_latus_rectum / (1.0 + self.eccentricity * true_anomaly.cos())
    }

    pub fn distance_at_time(&self, time: f64) -> f64 {
        self.distance_at_true_anomaly(self.true_anomaly_at_time(time))
    }

    /// Outbound true anomaly (in `[0, π]`) where the orbit reaches `distance`.
    ///
    /// NaN for a circular orbit, below periapsis, or beyond the apoapsis of a
    /// closed orbit.
    pub fn true_anomaly_at_distance(&self, distance: f64) -> f64 {
        let e = self.eccentricity;
        if e == 0.0 || distance < self.periapsis || (e < 1.0 && self.apoapsis < distance) {
            return f64::NAN;
        }
        // rounding pushes the ratio past 1 next to the periapsis
        ((self.semi_latus_rectum / distance - 1.0) / e).min(1.0).acos()
    }

    /// Time at which the outbound leg reaches `distance`; NaN when unreachable.
    pub fn time_at_distance(&self, distance: f64) -> f64 {
        self.time_at_true_anomaly(self.true_anomaly_at_distance(distance))
    }

    /// Vis-viva speed `√(μ(2/r − 1/a))`.
    pub fn speed_at_distance(&self, distance: f64) -> f64 {
        (self.gravitational_parameter * (2.0 / distance - 1.0 / self.semi_major_axis)).sqrt()
    }

    fn position_at(&self, distance: f64, true_anomaly: f64) -> Vector3 {
        let (s, c) = true_anomaly.sin_cos();
        matrix::mul_vec(&self.orientation, &[distance * c, distance * s, 0.0])
    }

    fn velocity_at(&self, distance: f64, true_anomaly: f64) -> Vector3 {
        let (s, c) = true_anomaly.sin_cos();
        let e = self.eccentricity;
        let d = 1.0 + e * c;
        let x = self.semi_latus_rectum * e * s / (d * d);
        let direction = [-distance * s + x * c, distance * c + x * s, 0.0];
        let speed = self.speed_at_distance(distance);
        let velocity = vector::scale(&direction, speed / vector::norm(&direction));
        matrix::mul_vec(&self.orientation, &velocity)
    }

    pub fn position_at_true_anomaly(&self, true_anomaly: f64) -> Vector3 {
        self.position_at(self.distance_at_true_anomaly(true_anomaly), true_anomaly)
    }

    pub fn velocity_at_true_anomaly(&self, true_anomaly: f64) -> Vector3 {
        self.velocity_at(self.distance_at_true_anomaly(true_anomaly), true_anomaly)
    }

    pub fn state_at_true_anomaly(&self, true_anomaly: f64) -> StateVector {
        let distance = self.distance_at_true_anomaly(true_anomaly);
        StateVector {
            position: self.position_at(distance, true_anomaly),
            velocity: self.velocity_at(distance, true_anomaly),
        }
    }

    pub fn position_at_time(&self, time: f64) -> Vector3 {
        self.position_at_true_anomaly(self.true_anomaly_at_time(time))
    }

    pub fn velocity_at_time(&self, time: f64) -> Vector3 {
        self.velocity_at_true_anomaly(self.true_anomaly_at_time(time))
    }

    pub fn state_at_time(&self, time: f64) -> StateVector {
        self.state_at_true_anomaly(self.true_anomaly_at_time(time))
    }

    /// True anomaly at which the orbit crosses a sphere of influence of
    /// radius `sphere_of_influence`; NaN if it never does.
    pub fn true_anomaly_at_escape(&self, sphere_of_influence: f64) -> f64 {
        self.true_anomaly_at_distance(sphere_of_influence)
    }

    pub fn time_at_escape(&self, sphere_of_influence: f64) -> f64 {
        self.time_at_distance(sphere_of_influence)
    }

    pub fn position_at_escape(&self, sphere_of_influence: f64) -> Vector3 {
        let f = self.true_anomaly_at_escape(sphere_of_influence);
        self.position_at(sphere_of_influence, f)
    }

    pub fn velocity_at_escape(&self, sphere_of_influence: f64) -> Vector3 {
        let f = self.true_anomaly_at_escape(sphere_of_influence);
        self.velocity_at(sphere_of_influence, f)
    }

    /// Hyperbolic excess speed `√(−μ/a)`; NaN for closed orbits.
    pub fn excess_velocity(&self) -> f64 {
        if self.eccentricity < 1.0 {
            return f64::NAN;
        }
        (-self.gravitational_parameter / self.semi_major_axis).sqrt()
    }

    /// Asymptotic true anomaly `acos(−1/e)`; NaN for closed orbits.
    pub fn ejection_angle(&self) -> f64 {
        if self.eccentricity < 1.0 {
            return f64::NAN;
        }
        (-1.0 / self.eccentricity).acos()
    }
}

/// `a = ∛((T/2π)²·μ)`
fn semi_major_axis_for_period(gravitational_parameter: f64, period: f64) -> f64 {
    let n = period / TAU;
    (n * n * gravitational_parameter).cbrt()
}
