//! Porkchop grids: transfer costs over departure epoch × time of flight.

use std::cmp::Ordering;

use orrery_bodies::{BodyId, System};
use orrery_core::time::{epoch_to_string, seconds_to_days};
use orrery_core::vector;
use orrery_impulsive::{Branch, lambert_solve};
use orrery_orbits::patched_conic::{capture_delta_v, escape_delta_v};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{TransferError, TransferPair};

/// Slack allowed when deciding whether the last sample still lies in a window.
const WINDOW_TOLERANCE: f64 = 1e-9;

/// Most samples a single window may hold.
pub const MAX_WINDOW_SAMPLES: usize = 100_000;

/// Most cells a departure × time-of-flight grid may hold.
pub const MAX_GRID_CELLS: usize = 4_000_000;

#[derive(Debug, Error)]
pub enum PorkchopError {
    #[error(transparent)]
    Transfer(#[from] TransferError),
    #[error("invalid {name} window: {reason}")]
    InvalidWindow { name: &'static str, reason: String },
}

/// Evenly spaced instants (or durations), in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeWindow {
    pub start: f64,
    pub end: f64,
    pub step: f64,
}

impl TimeWindow {
    pub fn new(start: f64, end: f64, step: f64) -> Self {
        Self { start, end, step }
    }

    /// A window holding the single value `at`.
    pub fn single(at: f64) -> Self {
        Self::new(at, at, 1.0)
    }

    fn validate(&self, name: &'static str) -> Result<(), PorkchopError> {
        let reason = if !(self.start.is_finite() && self.end.is_finite()) {
            Some("bounds must be finite".to_string())
        } else if !(self.step.is_finite() && self.step > 0.0) {
            Some(format!("step must be positive (got {})", self.step))
        } else if self.end < self.start {
            Some(format!("end {} precedes start {}", self.end, self.start))
        } else if self.intervals() >= MAX_WINDOW_SAMPLES as f64 {
            Some(format!("more than {MAX_WINDOW_SAMPLES} samples"))
        } else {
            None
        };
        match reason {
            Some(reason) => Err(PorkchopError::InvalidWindow { name, reason }),
            None => Ok(()),
        }
    }

    fn intervals(&self) -> f64 {
        ((self.end - self.start) / self.step + WINDOW_TOLERANCE).floor()
    }

    /// Number of samples, counting both ends when the span divides evenly.
    ///
    /// Saturates at `usize::MAX` for windows too wide to count.
    pub fn len(&self) -> usize {
        if !(self.step > 0.0) || self.end < self.start {
            return 0;
        }
        (self.intervals() as usize).saturating_add(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Samples computed from their index so that rounding does not accumulate.
    pub fn samples(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.len()).map(move |i| self.start + i as f64 * self.step)
    }
}

/// One porkchop sweep between two bodies that orbit the same primary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PorkchopRequest {
    pub origin: BodyId,
    pub destination: BodyId,
    /// Departure epochs, seconds since J2000.
    pub departure: TimeWindow,
    /// Times of flight, seconds.
    pub time_of_flight: TimeWindow,
    /// Altitude of the circular parking orbit left at the origin (m).
    pub departure_altitude: f64,
    /// Altitude of the circular orbit captured into at the destination (m).
    pub arrival_altitude: f64,
}

/// A single grid cell. Speeds are in m/s and C3 in m²/s².
///
/// Cells whose Lambert problem has no solution are kept with NaN costs and
/// `feasible == false`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PorkchopPoint {
    /// Departure epoch, seconds since J2000.
    pub departure: f64,
    /// Arrival epoch, seconds since J2000.
    pub arrival: f64,
    pub departure_utc: String,
    pub arrival_utc: String,
    pub time_of_flight_days: f64,
    pub c3: f64,
    pub vinf_departure: f64,
    pub vinf_arrival: f64,
    pub dv_departure: f64,
    pub dv_arrival: f64,
    pub dv_total: f64,
    pub feasible: bool,
}

impl PorkchopPoint {
    fn new(departure: f64, arrival: f64) -> Self {
        Self {
            departure,
            arrival,
            departure_utc: epoch_to_string(departure),
            arrival_utc: epoch_to_string(arrival),
            time_of_flight_days: seconds_to_days(arrival - departure),
            c3: f64::NAN,
            vinf_departure: f64::NAN,
            vinf_arrival: f64::NAN,
            dv_departure: f64::NAN,
            dv_arrival: f64::NAN,
            dv_total: f64::NAN,
            feasible: false,
        }
    }
}

/// Headline numbers of a sweep, written next to the grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PorkchopSummary {
    pub origin: String,
    pub destination: String,
    pub primary: String,
    pub points: usize,
    pub feasible: usize,
    /// Cheapest feasible cell by total delta-v.
    pub best: Option<PorkchopPoint>,
}

impl PorkchopSummary {
    pub fn new(pair: &TransferPair<'_>, points: &[PorkchopPoint]) -> Self {
        Self {
            origin: pair.origin.name().to_string(),
            destination: pair.destination.name().to_string(),
            primary: pair.primary.name().to_string(),
            points: points.len(),
            feasible: points.iter().filter(|p| p.feasible).count(),
            best: best_point(points).cloned(),
        }
    }
}

/// Cheapest feasible point by total delta-v.
pub fn best_point(points: &[PorkchopPoint]) -> Option<&PorkchopPoint> {
    points
        .iter()
        .filter(|p| p.feasible)
        .min_by(|a, b| a.dv_total.partial_cmp(&b.dv_total).unwrap_or(Ordering::Equal))
}

/// Sweep every departure × time-of-flight pair of `request`.
///
/// Positions come from the two bodies' orbits about their shared primary, so
/// the transfer is solved in that primary's frame. Non-positive times of
/// flight are skipped.
pub fn generate(system: &System, request: &PorkchopRequest) -> Result<Vec<PorkchopPoint>, PorkchopError> {
    request.departure.validate("departure")?;
    request.time_of_flight.validate("time of flight")?;
    let cells = request
        .departure
        .len()
        .checked_mul(request.time_of_flight.len())
        .filter(|&cells| cells <= MAX_GRID_CELLS)
        .ok_or_else(|| PorkchopError::InvalidWindow {
            name: "grid",
            reason: format!("more than {MAX_GRID_CELLS} cells"),
        })?;
    let pair = TransferPair::resolve(system, request.origin, request.destination)?;

    let mu = pair.primary.gravitational_parameter();
    let departure_radius = pair.origin.radius() + request.departure_altitude;
    let arrival_radius = pair.destination.radius() + request.arrival_altitude;

    let mut points = Vec::with_capacity(cells);
    for departure in request.departure.samples() {
        let origin_state = pair.origin_orbit.state_at_time(departure);
        for time_of_flight in request.time_of_flight.samples() {
            if time_of_flight <= 0.0 {
                continue;
            }
            let arrival = departure + time_of_flight;
            let target_state = pair.destination_orbit.state_at_time(arrival);
            let mut point = PorkchopPoint::new(departure, arrival);

            match lambert_solve(
                mu,
                &origin_state.position,
                &target_state.position,
                time_of_flight,
                0,
                Branch::Left,
            ) {
                Ok((v1, v2)) => {
                    let vinf_departure = vector::norm(&vector::sub(&v1, &origin_state.velocity));
                    let vinf_arrival = vector::norm(&vector::sub(&v2, &target_state.velocity));
                    let dv_departure =
                        escape_delta_v(pair.origin.gravitational_parameter(), departure_radius, vinf_departure);
                    let dv_arrival =
                        capture_delta_v(pair.destination.gravitational_parameter(), arrival_radius, vinf_arrival);
                    point.c3 = vinf_departure * vinf_departure;
                    point.vinf_departure = vinf_departure;
                    point.vinf_arrival = vinf_arrival;
                    point.dv_departure = dv_departure;
                    point.dv_arrival = dv_arrival;
                    point.dv_total = dv_departure + dv_arrival;
                    point.feasible = point.dv_total.is_finite();
                }
                Err(err) => {
                    debug!(departure = %point.departure_utc, tof_days = point.time_of_flight_days, %err, "lambert failed");
                }
            }
            points.push(point);
        }
    }

    let infeasible = points.iter().filter(|p| !p.feasible).count();
    if infeasible > 0 {
        warn!(infeasible, total = points.len(), "porkchop grid has infeasible cells");
    }
    info!(
        origin = pair.origin.name(),
        destination = pair.destination.name(),
        points = points.len(),
        "porkchop sweep complete"
    );
    Ok(points)
}
