//! Small closed-form mission-planning helpers.

use std::f64::consts::PI;

use orrery_bodies::CelestialBody;
use orrery_orbits::Orbit;

/// Worst r2/r1 ratio for a Hohmann transfer with r1 fixed, in delta-v
/// terms: `5 + 4√7·cos(⅓·atan(√3/37))`.
pub const HOHMANN_WORST_RATIO: f64 = 15.581_718_738_763_179;

/// Below this r2/r1 ratio a Hohmann transfer beats every bi-elliptic one.
///
/// Root of R³ − (7+4√2)R² + (3+4√2)R − 1 = 0.
pub const HOHMANN_UPPER_BOUND: f64 = 11.938_765_472_645_871;

/// Smallest rb/r1 for which a bi-elliptic transfer can beat Hohmann.
///
/// Root of R³ − 15R² − 9R − 1 = 0. Between [`HOHMANN_UPPER_BOUND`] and
/// [`HOHMANN_WORST_RATIO`] a bi-elliptic transfer only wins with rb past
/// this bound.
pub const BIELLIPTIC_LOWER_BOUND: f64 = 15.581_718_738_763_179;

pub fn circular_orbit_speed(primary: &CelestialBody, distance: f64) -> f64 {
    (primary.gravitational_parameter() / distance).sqrt()
}

/// Longest time spent in the primary's cylindrical shadow per revolution,
/// with the line of apsides perpendicular to the sun direction.
pub fn darkness_time(orbit: &Orbit, primary: &CelestialBody) -> f64 {
    let x = primary.radius() / orbit.semi_minor_axis();
    2.0 / orbit.mean_motion() * (x.asin() + orbit.eccentricity() * x)
}

/// Time between successive alignments of two bodies on the given orbits.
pub fn synodic_period(a: &Orbit, b: &Orbit) -> f64 {
    1.0 / (1.0 / a.period() - 1.0 / b.period()).abs()
}

/// Fewest satellites on a ring that keep line of sight over the horizon,
/// given the range of their transmitters. Zero for a negative range.
pub fn constellation_minimum_size(primary: &CelestialBody, communication_range: f64) -> u32 {
    if communication_range < 0.0 {
        return 0;
    }
    (PI / (communication_range / primary.radius() / 2.0).atan()).ceil() as u32
}

/// Lowest ring radius at which `size` satellites see each other over the
/// primary; NaN below three satellites.
pub fn constellation_minimum_radius(primary: &CelestialBody, size: u32) -> f64 {
    if size < 3 {
        return f64::NAN;
    }
    primary.radius() / (PI / f64::from(size)).cos()
}

/// Highest ring radius at which neighbours stay within `communication_range`;
/// NaN below three satellites.
pub fn constellation_maximum_radius(communication_range: f64, size: u32) -> f64 {
    if size < 3 {
        return f64::NAN;
    }
    communication_range / (PI / f64::from(size)).sin() / 2.0
}
