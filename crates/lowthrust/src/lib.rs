//! Fixed-step propagation of a state under two-body gravity and thrust.
//!
//! The derivative function receives everything it needs through
//! [`Dynamics`], so several propagations around different primaries can
//! run side by side.

use std::ops::{Add, Mul};

use orrery_core::matrix::{self, Matrix3};
use orrery_core::vector::{self, Vector3, X_AXIS};
use orrery_orbits::StateVector;
use orrery_propulsion::Vehicle;
use tracing::debug;

/// One explicit Euler step of `y' = f(t, y)`.
pub fn euler<T, F>(f: F, t: f64, y: T, h: f64) -> T
where
    T: Copy + Add<Output = T> + Mul<f64, Output = T>,
    F: Fn(f64, T) -> T,
{
    y + f(t, y) * h
}

/// One classical fourth-order Runge-Kutta step of `y' = f(t, y)`.
pub fn runge_kutta_4<T, F>(f: F, t: f64, y: T, h: f64) -> T
where
    T: Copy + Add<Output = T> + Mul<f64, Output = T>,
    F: Fn(f64, T) -> T,
{
    let k1 = f(t, y);
    let k2 = f(t + h / 2.0, y + k1 * (h / 2.0));
    let k3 = f(t + h / 2.0, y + k2 * (h / 2.0));
    let k4 = f(t + h, y + k3 * h);
    y + (k1 + (k2 + k3) * 2.0 + k4) * (h / 6.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Integrator {
    Euler,
    #[default]
    RungeKutta4,
}

/// Point-mass gravity of a primary at the origin plus a constant thrust
/// acceleration (m/s²) over one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dynamics {
    pub gravitational_parameter: f64,
    pub thrust: Vector3,
}

impl Dynamics {
    pub fn ballistic(gravitational_parameter: f64) -> Self {
        Self {
            gravitational_parameter,
            thrust: vector::ZERO,
        }
    }

    pub fn derivative(&self, _time: f64, state: StateVector) -> StateVector {
        let distance = vector::norm(&state.position);
        let gravity = vector::scale(
            &state.position,
            -self.gravitational_parameter / (distance * distance * distance),
        );
        StateVector {
            position: state.velocity,
            velocity: vector::add(&gravity, &self.thrust),
        }
    }

    pub fn step(&self, integrator: Integrator, time: f64, state: StateVector, step: f64) -> StateVector {
        let f = |t, y| self.derivative(t, y);
        match integrator {
            Integrator::Euler => euler(f, time, state, step),
            Integrator::RungeKutta4 => runge_kutta_4(f, time, state, step),
        }
    }

    /// Take `steps` fixed steps of size `step` starting at `time`.
    pub fn propagate(
        &self,
        integrator: Integrator,
        mut time: f64,
        mut state: StateVector,
        step: f64,
        steps: usize,
    ) -> StateVector {
        for _ in 0..steps {
            state = self.step(integrator, time, state, step);
            time += step;
        }
        state
    }
}

/// A vehicle flying under its own engine around a primary.
#[derive(Debug, Clone, PartialEq)]
pub struct Rocket {
    pub state: StateVector,
    /// Body-to-inertial rotation; the engine pushes along the body x axis.
    pub attitude: Matrix3,
    /// In `[0, 1]`.
    pub throttle: f64,
    pub vehicle: Vehicle,
}

impl Rocket {
    pub fn new(vehicle: Vehicle, state: StateVector) -> Self {
        Self {
            state,
            attitude: matrix::IDENTITY,
            throttle: 0.0,
            vehicle,
        }
    }

    pub fn name(&self) -> &str {
        &self.vehicle.name
    }

    /// Unit thrust direction in the inertial frame.
    pub fn heading(&self) -> Vector3 {
        matrix::mul_vec(&self.attitude, &X_AXIS)
    }

    pub fn thrust_acceleration(&self) -> Vector3 {
        let thrust = self.vehicle.thrust(self.throttle);
        if thrust == 0.0 {
            return vector::ZERO;
        }
        vector::scale(&self.heading(), thrust / self.vehicle.mass())
    }

    /// Integrate one RK4 step around a primary of parameter
    /// `gravitational_parameter`, then burn the propellant used meanwhile.
    pub fn update(&mut self, gravitational_parameter: f64, time: f64, step: f64) {
        let dynamics = Dynamics {
            gravitational_parameter,
            thrust: self.thrust_acceleration(),
        };
        self.state = dynamics.step(Integrator::RungeKutta4, time, self.state, step);
        if self.throttle > 0.0 {
            let used = self.vehicle.burn(self.throttle, step);
            if !self.vehicle.has_propellant() {
                debug!(rocket = %self.vehicle.name, used, "propellant exhausted");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orrery_orbits::{BodyId, Orbit, Primary};
    use orrery_propulsion::Engine;

    const MU_EARTH: f64 = 3.98601e14;

    fn leo() -> StateVector {
        StateVector {
            position: [6_371e3 + 300e3, 0.0, 0.0],
            velocity: [0.0, 7_660.0, 0.0],
        }
    }

    fn kepler_error(integrator: Integrator) -> f64 {
        let start = leo();
        let orbit = Orbit::from_state_vector(Primary::new(BodyId(0), MU_EARTH), start.position, start.velocity, 0.0)
            .unwrap();
        let steps = 8_192;
        let end = Dynamics::ballistic(MU_EARTH).propagate(integrator, 0.0, start, 1.0, steps);
        let expected = orbit.position_at_time(steps as f64);
        vector::distance(&end.position, &expected) / vector::norm(&expected)
    }

    #[test]
    fn rk4_tracks_the_keplerian_position() {
        assert!(kepler_error(Integrator::RungeKutta4) < 1e-9);
    }

    #[test]
    fn euler_drifts() {
        let error = kepler_error(Integrator::Euler);
        assert!(error > 1e-2, "{error}");
    }

    #[test]
    fn integrators_on_linear_growth() {
        // y' = 1 is integrated exactly by both schemes
        let f = |_t: f64, _y: StateVector| StateVector {
            position: [1.0, 0.0, 0.0],
            velocity: vector::ZERO,
        };
        let y = StateVector::default();
        assert_eq!(euler(f, 0.0, y, 2.0).position, [2.0, 0.0, 0.0]);
        assert_eq!(runge_kutta_4(f, 0.0, y, 2.0).position, [2.0, 0.0, 0.0]);
    }

    fn probe(propellant: f64) -> Rocket {
        let vehicle = Vehicle {
            name: "Probe".into(),
            dry_mass: 1_000.0,
            propellant_mass: propellant,
            engine: Engine {
                thrust: 2_000.0,
                specific_impulse: 300.0,
            },
        };
        Rocket::new(vehicle, leo())
    }

    #[test]
    fn prograde_burn_raises_the_orbit() {
        let mut rocket = probe(500.0);
        // point the engine along +y, the direction of motion
        rocket.attitude = matrix::rotation_z(std::f64::consts::FRAC_PI_2);
        rocket.throttle = 1.0;
        let mut coasting = probe(500.0);
        let mut time = 0.0;
        for _ in 0..60 {
            rocket.update(MU_EARTH, time, 1.0);
            coasting.update(MU_EARTH, time, 1.0);
            time += 1.0;
        }
        assert!(vector::norm(&rocket.state.velocity) > vector::norm(&coasting.state.velocity) + 50.0);
        assert_eq!(coasting.vehicle.propellant_mass, 500.0);
        let used = 500.0 - rocket.vehicle.propellant_mass;
        let expected = 60.0 * rocket.vehicle.engine.mass_flow_rate(1.0);
        assert!((used - expected).abs() < 1e-9);
    }

    #[test]
    fn dry_rocket_coasts() {
        let mut rocket = probe(0.0);
        rocket.throttle = 1.0;
        assert_eq!(rocket.thrust_acceleration(), vector::ZERO);
        rocket.update(MU_EARTH, 0.0, 10.0);
        let ballistic = Dynamics::ballistic(MU_EARTH).step(Integrator::RungeKutta4, 0.0, leo(), 10.0);
        assert_eq!(rocket.state, ballistic);
        assert_eq!(rocket.name(), "Probe");
    }
}
