//! Line and arc segments and the parts (paths and rings) built from them.
mod arc;
mod part;
mod seg;

pub use arc::*;
pub use part::*;
pub use seg::*;
