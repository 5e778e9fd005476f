//! Out-of-plane manoeuvres and departures onto escape trajectories.

use orrery_bodies::CelestialBody;
use orrery_orbits::Orbit;

/// Rotate a velocity of magnitude `speed` by `angle` without changing its size.
pub fn plane_change_cost(speed: f64, angle: f64) -> f64 {
    2.0 * speed * (angle / 2.0).sin()
}

/// Cost of changing the inclination by `delta_inclination` with a burn at
/// `true_anomaly`.
///
/// Only the velocity component normal to the line of nodes is rotated, so
/// the cost vanishes when the burn is 90° from the nodes.
pub fn inclination_change_cost(orbit: &Orbit, true_anomaly: f64, delta_inclination: f64) -> f64 {
    let e = orbit.eccentricity();
    let w = orbit.argument_of_periapsis();
    let f = true_anomaly;
    2.0 * (delta_inclination / 2.0).sin() * (1.0 - e * e).sqrt() * (w + f).cos() * orbit.mean_motion()
        * orbit.semi_major_axis()
        / (1.0 + e * f.cos())
}

/// Burn from the periapsis of a parking orbit with apsides r1 and r2 onto a
/// trajectory leaving the sphere of influence of `primary` at `v_soi`.
///
/// A non-zero `inclination` between the parking plane and the departure
/// asymptote is folded into the same burn by the law of cosines.
pub fn orbit_to_escape_cost(primary: &CelestialBody, r1: f64, r2: f64, v_soi: f64, inclination: f64) -> f64 {
    let mu = primary.gravitational_parameter();
    let r_soi = primary.sphere_of_influence();

    let a = (r1 + r2) / 2.0;
    let r_peri = r1.min(r2);
    let v_parking = (mu * (2.0 / r_peri - 1.0 / a)).sqrt();
    let v_escape = (v_soi * v_soi + 2.0 * mu * (1.0 / r_peri - 1.0 / r_soi)).sqrt();

    if inclination == 0.0 {
        v_escape - v_parking
    } else {
        (v_parking * v_parking + v_escape * v_escape - 2.0 * v_parking * v_escape * inclination.cos()).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orrery_orbits::{BodyId, Primary};
    use std::f64::consts::{FRAC_PI_2, PI, SQRT_2};

    const MU: f64 = 3.986_004_418e14;

    fn is_close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1e-9)
    }

    fn root() -> CelestialBody {
        let mut body = CelestialBody::new("Root");
        body.set_radius(6.371e6);
        body.set_gravitational_parameter(MU);
        body
    }

    #[test]
    fn plane_change() {
        assert!(is_close(plane_change_cost(100.0, 0.0), 0.0));
        assert!(is_close(plane_change_cost(100.0, FRAC_PI_2), 100.0 * SQRT_2));
        assert!(is_close(plane_change_cost(100.0, PI), 200.0));
    }

    #[test]
    fn inclination_change_matches_plane_change_on_circular_orbits() {
        let orbit = Orbit::from_periapsis(Primary::new(BodyId(0), MU), 7e6, 0.0).unwrap();
        let speed = orbit.speed_at_distance(orbit.semi_major_axis());
        assert!(is_close(plane_change_cost(speed, 2.0), inclination_change_cost(&orbit, 0.0, 2.0)));
        assert!(inclination_change_cost(&orbit, FRAC_PI_2, 2.0).abs() < 1e-9 * speed);
    }

    #[test]
    fn inclination_change_scales_with_distance_on_ellipses() {
        let orbit = Orbit::from_periapsis(Primary::new(BodyId(0), MU), 7e6, 0.5).unwrap();
        let at_periapsis = inclination_change_cost(&orbit, 0.0, 0.1).abs();
        let at_apoapsis = inclination_change_cost(&orbit, PI, 0.1).abs();
        assert!(is_close(at_apoapsis / at_periapsis, 3.0));
    }

    #[test]
    fn escape_from_circular_parking_orbit() {
        let primary = root();
        let r = 7e6;
        let circular = (MU / r).sqrt();
        assert!(primary.sphere_of_influence().is_infinite());
        assert!(is_close(orbit_to_escape_cost(&primary, r, r, 0.0, 0.0), (SQRT_2 - 1.0) * circular));

        let v_soi = 3000.0;
        let coplanar = orbit_to_escape_cost(&primary, r, r, v_soi, 0.0);
        let v_escape = (v_soi * v_soi + 2.0 * MU / r).sqrt();
        assert!(is_close(coplanar, v_escape - circular));
        let tilted = orbit_to_escape_cost(&primary, r, r, v_soi, FRAC_PI_2);
        assert!(is_close(tilted, (circular * circular + v_escape * v_escape).sqrt()));
        assert!(tilted > coplanar);
    }
}
