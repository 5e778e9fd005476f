//! Celestial coordinates in the equatorial and ecliptic frames.

/// Obliquity of the ecliptic (Earth's axial tilt), in radians.
pub const OBLIQUITY_OF_THE_ECLIPTIC: f64 = 0.409_105_176_667_470_87;

/// A direction (infinite distance) or position expressed in both frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CelestialCoordinates {
    pub right_ascension: f64,
    pub declination: f64,
    pub ecliptic_longitude: f64,
    pub ecliptic_latitude: f64,
    pub distance: f64,
}

impl CelestialCoordinates {
    /// Build from equatorial coordinates, deriving the ecliptic pair.
    pub fn from_equatorial(right_ascension: f64, declination: f64, distance: f64) -> Self {
        let (se, ce) = OBLIQUITY_OF_THE_ECLIPTIC.sin_cos();
        let (sa, ca) = right_ascension.sin_cos();
        let (sd, cd) = declination.sin_cos();
        Self {
            right_ascension,
            declination,
            ecliptic_longitude: (cd * sa * ce + sd * se).atan2(cd * ca),
            ecliptic_latitude: (sd * ce - cd * se * sa).asin(),
            distance,
        }
    }

    /// Build from ecliptic coordinates, deriving the equatorial pair.
    pub fn from_ecliptic(ecliptic_longitude: f64, ecliptic_latitude: f64, distance: f64) -> Self {
        let (se, ce) = OBLIQUITY_OF_THE_ECLIPTIC.sin_cos();
        let (sl, cl) = ecliptic_longitude.sin_cos();
        let (sb, cb) = ecliptic_latitude.sin_cos();
        Self {
            right_ascension: (cb * sl * ce - sb * se).atan2(cb * cl),
            declination: (sb * ce + cb * se * sl).asin(),
            ecliptic_longitude,
            ecliptic_latitude,
            distance,
        }
    }

    /// Whether these coordinates describe a pure direction.
    pub fn is_direction(&self) -> bool {
        self.distance.is_infinite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::angle::wrap_pi;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    fn assert_close_angle(a: f64, b: f64) {
        assert!(wrap_pi(a - b).abs() < 1e-7, "angle {a} != {b}");
    }

    #[test]
    fn polaris_ecliptic_position() {
        let right_ascension = (2.0 * 3600.0 + 31.0 * 60.0 + 49.9) / 86_400.0 * 2.0 * PI;
        let declination = (89.0 + 15.0 / 60.0 + 50.8 / 3600.0_f64).to_radians();
        let c = CelestialCoordinates::from_equatorial(right_ascension, declination, f64::INFINITY);
        assert_close_angle(c.ecliptic_longitude, 1.545_798_077_611_784_3);
        assert_close_angle(c.ecliptic_latitude, 1.153_675_222_738_428);
        assert!(c.is_direction());

        let back = CelestialCoordinates::from_ecliptic(c.ecliptic_longitude, c.ecliptic_latitude, c.distance);
        assert_close_angle(back.right_ascension, right_ascension);
        assert_close_angle(back.declination, declination);
    }

    #[test]
    fn frames_round_trip_away_from_the_poles() {
        let angles = [-PI + 1e-7, -FRAC_PI_2, -FRAC_PI_4, -1e-7, 0.0, 1e-7, FRAC_PI_4, FRAC_PI_2, PI];
        for &lon in &angles {
            for &lat in &angles {
                let lat = lat / 2.0 * 0.99;
                let eq = CelestialCoordinates::from_equatorial(lon, lat, 1.0);
                let back = CelestialCoordinates::from_ecliptic(eq.ecliptic_longitude, eq.ecliptic_latitude, 1.0);
                assert_close_angle(back.right_ascension, lon);
                assert_close_angle(back.declination, lat);

                let ecl = CelestialCoordinates::from_ecliptic(lon, lat, 1.0);
                let back = CelestialCoordinates::from_equatorial(ecl.right_ascension, ecl.declination, 1.0);
                assert_close_angle(back.ecliptic_longitude, lon);
                assert_close_angle(back.ecliptic_latitude, lat);
            }
        }
    }
}
