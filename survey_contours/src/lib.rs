//! Survey geometry kernel.
//!
//! * [tangency] decides whether two connected segments continue one curve.
//! * [reduce] collapses runs of tangent segments in parts and rings.
//! * [cogo] derives COGO attributes from geometry and rebuilds geometry from them.
//! * [traverse] adjusts traverses with the compass rule.
//!
//! Planar types ([segment::Segment], [segment::Part], [core::ToleranceContext]) are generic over
//! [core::traits::Real] with `f64` as the default. COGO and traverse work in `f64`.
extern crate static_aabb2d_index;

#[macro_use]
mod macros;

pub mod cogo;
pub mod core;
pub mod error;
pub mod reduce;
pub mod segment;
pub mod tangency;
pub mod traverse;

pub use static_aabb2d_index::AABB;
