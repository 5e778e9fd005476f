//! Impulsive manoeuvres: Lambert's problem, transfers between circular
//! orbits, plane changes and assorted closed-form recipes.

pub mod lambert;
pub mod plane;
pub mod recipes;
pub mod transfers;

pub use lambert::{Branch, LambertError, solve as lambert_solve};
