//! Closed-form transfer estimates between the orbits of two bodies.
//!
//! Both orbits are treated as circular and coplanar, with radii equal to
//! their semi-major axes.

use orrery_bodies::{BodyId, System};
use orrery_impulsive::recipes::{BIELLIPTIC_LOWER_BOUND, HOHMANN_UPPER_BOUND, synodic_period};
use orrery_impulsive::transfers::{
    bi_elliptic, hohmann, one_tangent_burn_cost, one_tangent_burn_minimum_eccentricity, one_tangent_burn_time,
};
use serde::Serialize;
use tracing::debug;

use crate::{TransferError, TransferPair};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EstimateOptions {
    /// Intermediate apoapsis of the bi-elliptic transfer (m).
    pub bi_elliptic_apoapsis: Option<f64>,
    /// Eccentricity of the one-tangent transfer ellipse.
    pub one_tangent_eccentricity: Option<f64>,
}

/// Costs (m/s) and durations (s) of the three classical transfers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransferEstimate {
    pub origin: String,
    pub destination: String,
    pub primary: String,
    pub departure_radius: f64,
    pub arrival_radius: f64,
    pub synodic_period: f64,
    pub hohmann_dv: f64,
    pub hohmann_time: f64,
    /// Below [`HOHMANN_UPPER_BOUND`] no bi-elliptic transfer is cheaper.
    pub hohmann_always_cheaper: bool,
    pub bi_elliptic_apoapsis: f64,
    pub bi_elliptic_dv: f64,
    pub bi_elliptic_time: f64,
    pub one_tangent_eccentricity: f64,
    pub one_tangent_dv: f64,
    pub one_tangent_time: f64,
}

/// Estimate a transfer from `origin` to `destination`.
///
/// Without overrides the bi-elliptic apoapsis is the smallest one that can
/// ever beat Hohmann, and the one-tangent eccentricity lies halfway between
/// the Hohmann ellipse and a parabola. The one-tangent burn is always
/// evaluated from the inner orbit outward.
pub fn estimate(
    system: &System,
    origin: BodyId,
    destination: BodyId,
    options: &EstimateOptions,
) -> Result<TransferEstimate, TransferError> {
    let pair = TransferPair::resolve(system, origin, destination)?;
    let mu = pair.primary.gravitational_parameter();
    let r1 = pair.origin_orbit.semi_major_axis();
    let r2 = pair.destination_orbit.semi_major_axis();
    let (inner, outer) = if r1 <= r2 { (r1, r2) } else { (r2, r1) };

    let direct = hohmann(r1, r2, mu);

    let rb = options
        .bi_elliptic_apoapsis
        .unwrap_or_else(|| outer.max(BIELLIPTIC_LOWER_BOUND * inner));
    let three_burn = bi_elliptic(r1, r2, rb, mu);

    let e = options
        .one_tangent_eccentricity
        .unwrap_or_else(|| (one_tangent_burn_minimum_eccentricity(inner, outer) + 1.0) / 2.0);

    debug!(
        origin = pair.origin.name(),
        destination = pair.destination.name(),
        r1,
        r2,
        rb,
        e,
        "estimating transfers"
    );

    Ok(TransferEstimate {
        origin: pair.origin.name().to_string(),
        destination: pair.destination.name().to_string(),
        primary: pair.primary.name().to_string(),
        departure_radius: r1,
        arrival_radius: r2,
        synodic_period: synodic_period(pair.origin_orbit, pair.destination_orbit),
        hohmann_dv: direct.dv_total,
        hohmann_time: direct.time_of_flight,
        hohmann_always_cheaper: outer / inner < HOHMANN_UPPER_BOUND,
        bi_elliptic_apoapsis: rb,
        bi_elliptic_dv: three_burn.dv_total,
        bi_elliptic_time: three_burn.time_of_flight,
        one_tangent_eccentricity: e,
        one_tangent_dv: one_tangent_burn_cost(pair.primary, inner, outer, e),
        one_tangent_time: one_tangent_burn_time(pair.primary, inner, outer, e),
    })
}
