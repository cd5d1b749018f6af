//! Decide whether two connected segments continue one another (tangent) or meet at a bend.
//!
//! Every merge decision in [reduce](crate::reduce) goes through [classify_pair]. The classifier is
//! pure: identical inputs always produce the same [PairClass].
use crate::{
    core::{
        math::{deflection_angle, perpendicular_offset, projection_ratio, Vector2},
        traits::Real,
        ToleranceContext,
    },
    segment::{Arc, Segment},
};

/// Deflection at the shared vertex beyond which a pair is always a corner (degrees).
pub const CORNER_DEFLECTION_DEGREES: f64 = 45.0;
/// Arcs with a central angle below this (degrees) may be direction noise.
pub const SHORT_FLAT_SWEEP_DEGREES: f64 = 1.0;
/// Arcs with a chord below this (meters) may be direction noise.
pub const SHORT_FLAT_CHORD_METERS: f64 = 3.0;
/// Floor of the length scaled minimum offset (meters).
pub const MIN_OFFSET_FLOOR_METERS: f64 = 0.01;

/// Outcome of [classify_pair].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PairClass {
    /// One of the segments is too short to judge, the pair is skipped.
    Degenerate,
    /// The segments behave as one continuous line or curve.
    Tangent,
    /// The segments meet at a genuine change of direction.
    Bend,
}

/// Classify the connected pair `seg0 -> seg1` (where `seg0.end()` is the shared vertex).
///
/// `max_feature_length` is the overall length of the feature the pair belongs to (dataset units),
/// longer features tolerate larger absolute noise.
///
/// # Examples
///
/// ```
/// # use survey_contours::core::*;
/// # use survey_contours::core::math::*;
/// # use survey_contours::segment::*;
/// # use survey_contours::tangency::*;
/// let tol = ToleranceContext::default();
/// let a = Segment::line(Vector2::new(0.0, 0.0), Vector2::new(50.0, 0.0));
/// // 3 mm of digitizing noise over 100 m
/// let b = Segment::line(Vector2::new(50.0, 0.0), Vector2::new(100.0, 0.003));
/// assert_eq!(classify_pair(&a, &b, &tol, 100.0), PairClass::Tangent);
///
/// // a right angle is always a corner
/// let c = Segment::line(Vector2::new(50.0, 0.0), Vector2::new(50.0, 50.0));
/// assert_eq!(classify_pair(&a, &c, &tol, 100.0), PairClass::Bend);
///
/// // sub tolerance segments are never judged
/// let tiny = Segment::line(Vector2::new(50.0, 0.0), Vector2::new(50.001, 0.0));
/// assert_eq!(classify_pair(&a, &tiny, &tol, 100.0), PairClass::Degenerate);
/// ```
pub fn classify_pair<T>(
    seg0: &Segment<T>,
    seg1: &Segment<T>,
    tol: &ToleranceContext<T>,
    max_feature_length: T,
) -> PairClass
where
    T: Real,
{
    let min_chord = T::lit(1.5) * tol.xy_tolerance();
    if seg0.chord_length() < min_chord || seg1.chord_length() < min_chord {
        log::trace!("pair degenerate: chord below {:?}", min_chord);
        return PairClass::Degenerate;
    }

    let seg0 = repair_segment(seg0, tol).unwrap_or(*seg0);
    let seg1 = repair_segment(seg1, tol).unwrap_or(*seg1);

    if let (Some(arc0), Some(arc1)) = (seg0.as_arc(), seg1.as_arc()) {
        if arc0.orientation != arc1.orientation
            && !is_short_flat_arc(&seg0, tol)
            && !is_short_flat_arc(&seg1, tol)
        {
            log::trace!("pair bend: arcs curve in opposite directions");
            return PairClass::Bend;
        }
    }

    let (a, b, c) = tangent_line_points(&seg0, &seg1);
    let ac_length = (c - a).length();
    let offset_b = perpendicular_offset(a, c, b);
    let along = projection_ratio(a, c, b);
    if offset_b <= tol.xy_tolerance() && along >= T::zero() && along <= T::one() {
        log::trace!("pair tangent: offset {:?} within xy tolerance", offset_b);
        return PairClass::Tangent;
    }

    let deflection = deflection_angle(a, b, c);
    if deflection > T::lit(CORNER_DEFLECTION_DEGREES).to_radians() {
        log::trace!("pair bend: deflection {:?} deg", deflection.to_degrees());
        return PairClass::Bend;
    }

    let offset_m = tol.to_meters(offset_b);
    if offset_m > tol.effective_max_offset_meters() {
        log::trace!("pair bend: offset {:?} m above max offset", offset_m);
        return PairClass::Bend;
    }

    let min_offset = length_scaled_min_offset(tol, max_feature_length, ac_length);
    let is_bend = (ac_length / offset_b <= tol.offset_ratio() && offset_m > min_offset)
        || offset_m > tol.max_offset_ceiling_meters();
    log::trace!(
        "pair offset {:?} m, chord/offset {:?}, min offset {:?} m, bend: {}",
        offset_m,
        ac_length / offset_b,
        min_offset,
        is_bend
    );

    if is_bend {
        PairClass::Bend
    } else {
        PairClass::Tangent
    }
}

/// Shorthand for `classify_pair(..) == PairClass::Tangent`.
#[inline]
pub fn is_tangent<T>(
    seg0: &Segment<T>,
    seg1: &Segment<T>,
    tol: &ToleranceContext<T>,
    max_feature_length: T,
) -> bool
where
    T: Real,
{
    classify_pair(seg0, seg1, tol, max_feature_length) == PairClass::Tangent
}

/// Minimum offset (meters) a pair must exceed to count as a bend, growing with the log of the
/// feature length over the tested chord.
fn length_scaled_min_offset<T>(tol: &ToleranceContext<T>, feature_length: T, ac_length: T) -> T
where
    T: Real,
{
    let floor = num_traits::real::Real::max(
        T::lit(10.0) * tol.xy_tolerance_meters(),
        T::lit(MIN_OFFSET_FLOOR_METERS),
    );

    let length_ratio = if ac_length > T::zero() {
        feature_length / ac_length
    } else {
        T::one()
    };

    let length_ratio = if length_ratio > T::one() {
        length_ratio
    } else {
        T::one()
    };

    floor * (T::one() + length_ratio.ln())
}

/// Rebuild a zero length arc whose endpoints do not coincide as a flat (0.1 degree) arc along its
/// chord.
///
/// Returns `None` when the segment needs no repair or [ToleranceContext::flat_arc_repair] is
/// disabled.
pub fn repair_segment<T>(seg: &Segment<T>, tol: &ToleranceContext<T>) -> Option<Segment<T>>
where
    T: Real,
{
    if !tol.flat_arc_repair() {
        return None;
    }

    let arc = seg.as_arc()?;
    let chord = arc.chord_length();
    let arc_length = arc.length();
    // NaN length counts as zero
    if arc_length > tol.xy_tolerance() || chord < tol.xy_tolerance() {
        return None;
    }

    log::debug!("rebuilding zero length arc with chord {:?} as flat arc", chord);
    Arc::flat(arc.start, arc.end, arc.orientation).map(Segment::Arc)
}

/// True for an arc whose central angle and chord are both small enough that its curvature is
/// treated as direction noise.
pub fn is_short_flat_arc<T>(seg: &Segment<T>, tol: &ToleranceContext<T>) -> bool
where
    T: Real,
{
    match seg.as_arc() {
        Some(arc) => {
            arc.sweep_angle().abs() < T::lit(SHORT_FLAT_SWEEP_DEGREES).to_radians()
                && tol.to_meters(arc.chord_length()) < T::lit(SHORT_FLAT_CHORD_METERS)
        }
        None => false,
    }
}

/// Reduce the pair to three points tested for collinearity: `A` (far start), `B` (shared vertex)
/// and `C` (far end).
///
/// Each segment is replaced by the tangent line at the shared vertex extended to the segment's
/// chord length, so lines map to their own endpoints.
pub fn tangent_line_points<T>(
    seg0: &Segment<T>,
    seg1: &Segment<T>,
) -> (Vector2<T>, Vector2<T>, Vector2<T>)
where
    T: Real,
{
    let b = seg0.end();
    let a = match seg0 {
        Segment::Line { start, .. } => *start,
        Segment::Arc(_) => b - seg0.end_tangent().scale(seg0.chord_length()),
    };

    let c = match seg1 {
        Segment::Line { end, .. } => *end,
        Segment::Arc(_) => b + seg1.start_tangent().scale(seg1.chord_length()),
    };

    (a, b, c)
}
