//! Core module has common/shared math, numeric traits, and the per-operation tolerance context.
pub mod math;
pub mod traits;
mod tolerance;

pub use tolerance::{ToleranceContext, METERS_PER_DEGREE};
