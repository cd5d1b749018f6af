//! Error and outcome enums shared across the kernel.
//!
//! Nothing here aborts a batch: every variant describes why a single feature (part, course,
//! segment) was left unchanged or flagged, so callers can skip it and move on.
use thiserror::Error;

/// Invalid inputs when building a [ToleranceContext](crate::core::ToleranceContext).
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum ToleranceError {
    #[error("xy tolerance must be a positive finite value, got {0}")]
    XyTolerance(f64),

    #[error("meters per unit must be a positive finite value, got {0}")]
    MetersPerUnit(f64),
}

/// Malformed segment chain.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum ChainError {
    #[error("part has no segments")]
    Empty,

    #[error("segment {index} does not connect to the next segment (gap {gap})")]
    Disjoint { index: usize, gap: f64 },
}

/// Why a part was returned unchanged by the reducer.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum SkipReason {
    #[error("ring revisits vertex {vertex} (pretzel)")]
    Pretzel { vertex: usize },

    #[error(transparent)]
    Malformed(#[from] ChainError),

    #[error("part has too few segments to reduce")]
    TooFewSegments,
}

/// Reduction result rejected by the shape-preservation check; the original geometry is kept.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum ShapeRejection {
    #[error("perimeter changed from {original} to {reduced}")]
    PerimeterChanged { original: f64, reduced: f64 },

    #[error("part count changed from {original} to {reduced}")]
    PartCountChanged { original: usize, reduced: usize },

    #[error("reduced part {part} is invalid: {reason}")]
    Invalid { part: usize, reason: &'static str },
}

/// COGO attribute and reconstruction failures.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum CogoError {
    #[error("course has no COGO attributes")]
    NoAttributes,

    #[error("radius or arc length cannot be combined with a distance")]
    ConflictingAttributes,

    #[error("existing chord is too short to rebuild from ({0} m)")]
    ChordTooShort(f64),

    #[error("radius {radius} is too small for chord {chord}")]
    RadiusTooSmall { radius: f64, chord: f64 },

    #[error("arc length {arc_length} cannot span chord {chord}")]
    ArcLengthTooShort { arc_length: f64, chord: f64 },

    #[error("course value `{0}` must be a positive finite number")]
    InvalidValue(&'static str),

    #[error("course needs a direction and a distance, or a radius and an arc length")]
    IncompleteCourse,

    #[error("unrecognized direction `{0}`")]
    DirectionParse(String),
}

/// Traverse adjustment input errors.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum TraverseError {
    #[error("traverse has no courses")]
    NoCourses,

    #[error("traverse has zero total length")]
    ZeroLength,
}
