//! Core units, constants, and shared primitives for the Orrery workspace.
//!
//! Every quantity in the workspace is SI (metres, seconds, kilograms) and
//! every angle is in radians unless a helper says otherwise.

pub mod coordinates;
pub mod matrix;
pub mod vector;

/// Physical constants expressed in SI units (unless stated otherwise).
pub mod constants {
    /// Standard gravity at Earth's surface (m/s²).
    pub const G0: f64 = 9.80665;
    /// Newtonian constant of gravitation (m³/kg/s²).
    pub const GRAVITATIONAL_CONSTANT: f64 = 6.67259e-11;
    /// Metres per astronomical unit.
    pub const AU_M: f64 = 149_597_870_700.0;
    /// Seconds per Julian day.
    pub const SECONDS_PER_DAY: f64 = 86_400.0;
    /// Seconds per Julian year.
    pub const SECONDS_PER_YEAR: f64 = 365.25 * SECONDS_PER_DAY;
}

/// Basic unit conversion helpers.
pub mod units {
    /// Convert kilometres to metres.
    #[inline]
    pub fn km_to_m(v: f64) -> f64 {
        v * 1_000.0
    }

    /// Convert metres to kilometres.
    #[inline]
    pub fn m_to_km(v: f64) -> f64 {
        v / 1_000.0
    }

    /// Convert metres per second to kilometres per second.
    #[inline]
    pub fn ms_to_kms(v: f64) -> f64 {
        v / 1_000.0
    }

    /// Convert degrees to radians.
    #[inline]
    pub fn deg_to_rad(v: f64) -> f64 {
        v.to_radians()
    }

    /// Convert radians to degrees.
    #[inline]
    pub fn rad_to_deg(v: f64) -> f64 {
        v.to_degrees()
    }
}

/// Angle folding helpers shared by the orbit and body models.
pub mod angle {
    use std::f64::consts::{PI, TAU};

    /// Fold an angle into `[0, 2π)`.
    #[inline]
    pub fn wrap_two_pi(x: f64) -> f64 {
        x.rem_euclid(TAU)
    }

    /// Fold an angle into `[-π, π)`.
    #[inline]
    pub fn wrap_pi(x: f64) -> f64 {
        (x + PI).rem_euclid(TAU) - PI
    }

    /// Tangent computed as `sin / cos`.
    ///
    /// Near odd multiples of π/2 this yields a huge finite value (or an
    /// infinity) instead of going through the slow reduction path of `tan`.
    #[inline]
    pub fn tan(x: f64) -> f64 {
        x.sin() / x.cos()
    }
}

/// Lightweight time utilities shared across crates.
///
/// Epochs are plain `f64` seconds elapsed since J2000 (2000-01-01T12:00:00).
pub mod time {
    use chrono::{NaiveDate, NaiveDateTime};
    use thiserror::Error;

    use super::constants::SECONDS_PER_DAY;

    /// Calendar epochs accepted by [`epoch_seconds`].
    const FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"];

    #[derive(Debug, Error)]
    pub enum TimeError {
        #[error("unrecognised epoch '{0}' (expected YYYY-MM-DD[THH:MM[:SS]])")]
        Parse(String),
    }

    /// Convert days to seconds.
    #[inline]
    pub fn days_to_seconds(days: f64) -> f64 {
        days * SECONDS_PER_DAY
    }

    /// Convert seconds to days.
    #[inline]
    pub fn seconds_to_days(seconds: f64) -> f64 {
        seconds / SECONDS_PER_DAY
    }

    /// The J2000 reference instant.
    pub fn j2000() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2000, 1, 1)
            .and_then(|d| d.and_hms_opt(12, 0, 0))
            .unwrap_or_default()
    }

    /// Parse a calendar epoch into seconds since J2000.
    pub fn epoch_seconds(text: &str) -> Result<f64, TimeError> {
        let text = text.trim();
        let parsed = FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
            .or_else(|| {
                NaiveDate::parse_from_str(text, "%Y-%m-%d")
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
            })
            .ok_or_else(|| TimeError::Parse(text.to_string()))?;
        let delta = parsed - j2000();
        Ok(delta.num_milliseconds() as f64 / 1_000.0)
    }

    /// Format seconds since J2000 as an ISO-like calendar string.
    pub fn epoch_to_string(seconds: f64) -> String {
        let millis = (seconds * 1_000.0).round() as i64;
        let stamp = j2000() + chrono::Duration::milliseconds(millis);
        stamp.format("%Y-%m-%dT%H:%M:%S").to_string()
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn j2000_is_zero() {
            assert_eq!(epoch_seconds("2000-01-01T12:00:00").unwrap(), 0.0);
            assert_eq!(epoch_seconds("2000-01-02 12:00:00").unwrap(), 86_400.0);
            assert_eq!(epoch_seconds("2000-01-01").unwrap(), -43_200.0);
        }

        #[test]
        fn format_round_trips() {
            let t = epoch_seconds("2026-01-01T00:00:00").unwrap();
            assert_eq!(epoch_to_string(t), "2026-01-01T00:00:00");
        }

        #[test]
        fn rejects_garbage() {
            assert!(epoch_seconds("next tuesday").is_err());
        }
    }
}
