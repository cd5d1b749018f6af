use super::{CogoAttributes, CogoFrame, MetricSpace};
use crate::{
    core::ToleranceContext,
    segment::{Arc, ArcOrientation, Segment},
};

/// Chords shorter than this (meters) carry no meaningful COGO values.
pub const MIN_CHORD_METERS: f64 = 0.0014;

/// Collinearity threshold for three point arc fits (scale independent).
pub(crate) const FIT_EPSILON: f64 = 1e-9;

/// Compute COGO attributes describing the chain `segments` (first start to last end).
///
/// A chain of circular arcs that all curve the same way around the center of the last arc is
/// reported as one arc (signed radius, summed arc length); anything else is reported as a line
/// along the chord. Distances are ground values (`grid / scale_factor`) and the direction has the
/// frame's direction offset removed. All values are absent for an empty chain or a chord shorter
/// than [MIN_CHORD_METERS].
///
/// # Examples
///
/// ```
/// # use survey_contours::cogo::*;
/// # use survey_contours::core::*;
/// # use survey_contours::core::math::*;
/// # use survey_contours::segment::*;
/// let tol = ToleranceContext::default();
/// let frame = CogoFrame::default();
/// let line = Segment::line(Vector2::new(0.0, 0.0), Vector2::new(30.0, 40.0));
/// let attrs = derive_cogo(&[line], &frame, &tol);
/// assert!((attrs.distance.unwrap() - 50.0).abs() < 1e-9);
/// assert!((attrs.direction.unwrap() - 36.869897645844).abs() < 1e-9);
/// assert!(attrs.radius.is_none());
///
/// // counter clockwise quarter circle of radius 10
/// let arc = Arc::from_center(
///     Vector2::new(10.0, 0.0),
///     Vector2::new(0.0, 10.0),
///     Vector2::zero(),
///     ArcOrientation::CounterClockwise,
/// );
/// let attrs = derive_cogo(&[arc.into()], &frame, &tol);
/// assert!((attrs.radius.unwrap() + 10.0).abs() < 1e-9);
/// assert!((attrs.arc_length.unwrap() - 5.0 * std::f64::consts::PI).abs() < 1e-9);
/// assert!(attrs.distance.is_none());
/// ```
pub fn derive_cogo(
    segments: &[Segment],
    frame: &CogoFrame,
    tol: &ToleranceContext,
) -> CogoAttributes {
    let (first, last) = match (segments.first(), segments.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return CogoAttributes::default(),
    };

    let start = first.start();
    let end = last.end();
    let (chord, grid_direction) = frame.measure(start, end);
    if !(chord >= MIN_CHORD_METERS) {
        log::debug!("chord {} m too short for COGO values", chord);
        return CogoAttributes::default();
    }

    let direction = frame.grid_to_ground_direction(grid_direction);
    match tangential_arc(segments, frame, tol) {
        Some((radius, arc_length)) => CogoAttributes::arc(
            direction,
            frame.grid_to_ground_distance(radius),
            frame.grid_to_ground_distance(arc_length),
        ),
        None => CogoAttributes::line(direction, frame.grid_to_ground_distance(chord)),
    }
}

/// Signed radius and summed length (grid meters) if `segments` form one tangential circular arc.
fn tangential_arc(
    segments: &[Segment],
    frame: &CogoFrame,
    tol: &ToleranceContext,
) -> Option<(f64, f64)> {
    let space = frame.metric_space(segments.first()?.start());
    let arcs = segments
        .iter()
        .map(|seg| metric_arc(seg, &space))
        .collect::<Option<Vec<_>>>()?;

    let last = arcs.last()?;
    let same_circle = arcs.iter().all(|arc| {
        arc.orientation == last.orientation && arc.is_concentric(last, tol.xy_tolerance_meters())
    });
    if !same_circle {
        return None;
    }

    let radius = match last.orientation {
        ArcOrientation::Clockwise => last.radius(),
        ArcOrientation::CounterClockwise => -last.radius(),
    };
    let arc_length = arcs.iter().map(Arc::length).sum();
    Some((radius, arc_length))
}

/// Circular arc segment expressed in planar meters, `None` for lines and elliptical arcs.
pub(crate) fn metric_arc(seg: &Segment, space: &MetricSpace) -> Option<Arc> {
    let arc = seg.as_arc().filter(|arc| arc.is_circular())?;
    match space {
        MetricSpace::Scaled { .. } => Some(Arc::from_center(
            space.forward(arc.start),
            space.forward(arc.end),
            space.forward(arc.center),
            arc.orientation,
        )),
        // arcs in degrees are not circular on the ground, fit through three points instead
        MetricSpace::Local(_) => Arc::from_three_points(
            space.forward(arc.start),
            space.forward(arc.midpoint()),
            space.forward(arc.end),
            FIT_EPSILON,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{cogo::Ellipsoid, core::math::vec2};

    #[test]
    fn tiny_chord_has_no_values() {
        let tol = ToleranceContext::default();
        let seg = Segment::line(vec2(0.0, 0.0), vec2(0.001, 0.0));
        assert!(derive_cogo(&[seg], &CogoFrame::default(), &tol).is_empty());
        assert!(derive_cogo(&[], &CogoFrame::default(), &tol).is_empty());
    }

    #[test]
    fn scale_factor_and_rotation_applied() {
        let tol = ToleranceContext::default();
        let frame = CogoFrame::default()
            .with_scale_factor(0.5)
            .unwrap()
            .with_direction_offset(10.0);
        let seg = Segment::line(vec2(0.0, 0.0), vec2(0.0, 50.0));
        let attrs = derive_cogo(&[seg], &frame, &tol);
        assert!((attrs.distance.unwrap() - 100.0).abs() < 1e-9);
        assert!((attrs.direction.unwrap() - 350.0).abs() < 1e-9);
    }

    #[test]
    fn mixed_chain_reports_chord() {
        let tol = ToleranceContext::default();
        let line = Segment::line(vec2(-10.0, -10.0), vec2(10.0, 0.0));
        let arc = Segment::Arc(Arc::from_center(
            vec2(10.0, 0.0),
            vec2(0.0, 10.0),
            vec2(0.0, 0.0),
            ArcOrientation::CounterClockwise,
        ));
        let attrs = derive_cogo(&[line, arc], &CogoFrame::default(), &tol);
        assert!(attrs.radius.is_none());
        assert!((attrs.distance.unwrap() - 500.0_f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn two_arcs_of_one_circle_sum() {
        let tol = ToleranceContext::default();
        let cw = ArcOrientation::Clockwise;
        let center = vec2(0.0, 0.0);
        let a = Segment::Arc(Arc::from_center(vec2(-5.0, 0.0), vec2(0.0, 5.0), center, cw));
        let b = Segment::Arc(Arc::from_center(vec2(0.0, 5.0), vec2(5.0, 0.0), center, cw));
        let attrs = derive_cogo(&[a, b], &CogoFrame::default(), &tol);
        assert!((attrs.radius.unwrap() - 5.0).abs() < 1e-9);
        assert!((attrs.arc_length.unwrap() - 5.0 * std::f64::consts::PI).abs() < 1e-9);
        assert!((attrs.direction.unwrap() - 90.0).abs() < 1e-9);
    }

    #[test]
    fn geographic_line_uses_geodesic() {
        let tol = ToleranceContext::geographic();
        let frame = CogoFrame::geographic(Ellipsoid::WGS84);
        let seg = Segment::line(vec2(0.0, 0.0), vec2(1.0, 0.0));
        let attrs = derive_cogo(&[seg], &frame, &tol);
        assert!((attrs.distance.unwrap() - 111_319.491).abs() < 1e-3);
        assert!((attrs.direction.unwrap() - 90.0).abs() < 1e-9);
    }
}
