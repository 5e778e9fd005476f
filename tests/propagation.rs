use std::path::PathBuf;

use orrery::bodies::load_system;
use orrery::config::load_vehicle_configs;
use orrery::core::vector;
use orrery::lowthrust::{Dynamics, Integrator, Rocket};
use orrery::orbits::{Orbit, Primary};
use orrery::propulsion::{Vehicle, select};

fn config(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("configs").join(name)
}

#[test]
fn runge_kutta_tracks_the_mun() {
    let system = load_system(config("kerbol_system.json")).unwrap();
    let mun = system.find("Mun").unwrap();
    let kerbin = system.find("Kerbin").unwrap();
    let orbit = system.body(mun).unwrap().orbit().unwrap();
    let mu = system.body(kerbin).unwrap().gravitational_parameter();

    let start = orbit.state_at_time(0.0);
    let step = 60.0;
    let steps = 600;
    let end = Dynamics::ballistic(mu).propagate(Integrator::RungeKutta4, 0.0, start, step, steps);

    let expected = system.relative_state_at_time(mun, kerbin, step * steps as f64).unwrap();
    let error = vector::distance(&end.position, &expected.position) / vector::norm(&expected.position);
    assert!(error < 1e-8, "relative error {error}");
}

#[test]
fn upper_stage_burn_raises_the_orbit() {
    let system = load_system(config("kerbol_system.json")).unwrap();
    let kerbin_id = system.find("Kerbin").unwrap();
    let kerbin = system.body(kerbin_id).unwrap();
    let mu = kerbin.gravitational_parameter();

    let vehicles = load_vehicle_configs(config("vehicles.yaml")).unwrap();
    let config = select(&vehicles, Some("chemical upper stage")).expect("vehicle in catalog");
    let vehicle = Vehicle::from(config);
    let delta_v = vehicle.delta_v();

    let parking = Orbit::from_periapsis(Primary::new(kerbin_id, mu), kerbin.radius() + 100e3, 0.0).unwrap();
    let mut rocket = Rocket::new(vehicle, parking.state_at_time(0.0));
    // prograde at periapsis: the body x axis along +y
    rocket.attitude = [[0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]];
    rocket.throttle = 1.0;

    let speed_before = vector::norm(&rocket.state.velocity);
    let mut time = 0.0;
    for _ in 0..20 {
        rocket.update(mu, time, 1.0);
        time += 1.0;
    }
    assert!(rocket.vehicle.propellant_mass < 20_000.0);

    let after = Orbit::from_state_vector(
        Primary::new(kerbin_id, mu),
        rocket.state.position,
        rocket.state.velocity,
        time,
    )
    .unwrap();
    assert!(after.semi_major_axis() > parking.semi_major_axis());
    assert!(vector::norm(&rocket.state.velocity) > speed_before);
    assert!(delta_v > 5_000.0);
}
