//! COGO (coordinate geometry) attributes: deriving them from geometry, rebuilding geometry from
//! them, and turning them into traverse courses.
//!
//! Attribute values are survey ground values. Directions are north azimuths in decimal degrees,
//! distances, radii and arc lengths are meters, and a negative radius curves counter clockwise.
//! The [CogoFrame] holds the dataset coordinate system plus the scale factor and direction offset
//! between ground and grid.
mod attributes;
mod course;
mod derive;
mod direction;
mod frame;
mod geodesy;
mod rebuild;

pub use attributes::*;
pub use course::*;
pub use derive::{derive_cogo, MIN_CHORD_METERS};
pub use direction::*;
pub use frame::*;
pub use geodesy::*;
pub use rebuild::*;
