use super::{
    derive::{metric_arc, FIT_EPSILON, MIN_CHORD_METERS},
    CogoFrame, CourseState, MetricSpace, PartialArc, PartialLine,
};
use crate::{
    core::{math::Vector2, ToleranceContext},
    error::CogoError,
    segment::{Arc, ArcOrientation, Segment},
};
use std::f64::consts::PI;

/// Rebuilt length may differ from the existing length by this many XY tolerances before it is
/// reported.
pub const LENGTH_CHANGE_FACTOR: f64 = 10.0;

const MAX_BISECTIONS: usize = 100;

/// Quality finding raised while rebuilding a segment from its COGO attributes.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum QualityEvent {
    /// Stored arc length did not agree with the radius and chord; `computed` (ground meters) was
    /// used instead.
    ArcLengthReconciled { stored: f64, computed: f64 },
    /// Rebuilt length (ground meters) differs from the existing geometry beyond tolerance. The
    /// segment is still usable.
    LengthChanged { original: f64, rebuilt: f64 },
    /// Rebuilt endpoints (dataset units) moved off the existing endpoints. The segment must not be
    /// written back.
    Disjoint { start_gap: f64, end_gap: f64 },
}

/// Segment rebuilt by [rebuild_segment] with any quality events raised on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct Rebuilt {
    pub segment: Segment,
    pub events: Vec<QualityEvent>,
}

impl Rebuilt {
    /// True if the rebuilt segment no longer meets the existing endpoints.
    pub fn is_disjoint(&self) -> bool {
        self.events
            .iter()
            .any(|e| matches!(e, QualityEvent::Disjoint { .. }))
    }

    /// Arc length used in place of the stored value, if it was reconciled.
    pub fn reconciled_arc_length(&self) -> Option<f64> {
        self.events.iter().find_map(|e| match e {
            QualityEvent::ArcLengthReconciled { computed, .. } => Some(*computed),
            _ => None,
        })
    }
}

/// Rebuild the geometry of `existing` from the course attributes classified as `state`.
///
/// Lines are traversed from the existing start point along the attribute direction and distance
/// (missing values are taken from the existing chord). Arcs always keep the existing endpoints:
/// the radius sign picks the orientation and the arc length picks minor or major. Geographic
/// frames build arcs in a [LocalFrame](super::LocalFrame) around the start point and project
/// them back to degrees.
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
/// let existing = Segment::line(Vector2::new(0.0, 0.0), Vector2::new(20.0, 0.0));
///
/// // half circle clockwise over the existing chord
/// let state = CogoAttributes::arc(90.0, 10.0, 10.0 * std::f64::consts::PI).classify();
/// let rebuilt = rebuild_segment(&state, &existing, &frame, &tol).unwrap();
/// let arc = rebuilt.segment.as_arc().unwrap();
/// assert!(arc.center.fuzzy_eq_eps(Vector2::new(10.0, 0.0), 1e-9));
/// assert_eq!(arc.orientation, ArcOrientation::Clockwise);
/// assert!(!rebuilt.is_disjoint());
///
/// // radius cannot span the chord
/// let state = CogoAttributes::arc(90.0, 5.0, 20.0).classify();
/// assert!(rebuild_segment(&state, &existing, &frame, &tol).is_err());
/// ```
pub fn rebuild_segment(
    state: &CourseState,
    existing: &Segment,
    frame: &CogoFrame,
    tol: &ToleranceContext,
) -> Result<Rebuilt, CogoError> {
    let mut events = Vec::new();
    let segment = match *state {
        CourseState::Empty => return Err(CogoError::NoAttributes),
        CourseState::Conflicting => return Err(CogoError::ConflictingAttributes),
        CourseState::Line {
            direction,
            distance,
        } => rebuild_line(existing, frame, direction, distance)?,
        CourseState::PartialLine(PartialLine::DistanceOnly(distance)) => {
            let (_, grid_direction) = frame.measure(existing.start(), existing.end());
            let direction = frame.grid_to_ground_direction(grid_direction);
            rebuild_line(existing, frame, direction, distance)?
        }
        CourseState::PartialLine(PartialLine::DirectionOnly(direction)) => {
            let (grid_distance, _) = frame.measure(existing.start(), existing.end());
            let distance = frame.grid_to_ground_distance(grid_distance);
            rebuild_line(existing, frame, direction, distance)?
        }
        CourseState::CircularArc { radius, arc_length } => {
            check_radius(radius)?;
            check_positive(arc_length, "arc_length")?;
            let space = frame.metric_space(existing.start());
            let (a, b) = metric_chord(existing, &space)?;
            let grid_radius = frame.ground_to_grid_distance(radius.abs());
            let grid_length = frame.ground_to_grid_distance(arc_length);
            let arc = chord_arc(
                a,
                b,
                grid_radius,
                orientation_of(radius),
                grid_length > PI * grid_radius,
                frame,
                tol,
            )?;

            let implied = arc.length();
            if (implied - grid_length).abs() > tol.xy_tolerance_meters() {
                let computed = frame.grid_to_ground_distance(implied);
                log::debug!(
                    "arc length {} disagrees with radius and chord, using {}",
                    arc_length,
                    computed
                );
                events.push(QualityEvent::ArcLengthReconciled {
                    stored: arc_length,
                    computed,
                });
            }

            back_project(existing, &arc, &space)
        }
        CourseState::PartialArc(PartialArc::ArcLengthOnly(arc_length)) => {
            check_positive(arc_length, "arc_length")?;
            let space = frame.metric_space(existing.start());
            let (a, b) = metric_chord(existing, &space)?;
            let chord = a.distance_to(b);
            let grid_length = frame.ground_to_grid_distance(arc_length);
            if grid_length <= chord {
                return Err(CogoError::ArcLengthTooShort {
                    arc_length,
                    chord: frame.grid_to_ground_distance(chord),
                });
            }

            let sweep = sweep_for_arc_length(chord, grid_length);
            let orientation = existing
                .orientation()
                .unwrap_or(ArcOrientation::Clockwise);
            let arc = chord_arc(
                a,
                b,
                grid_length / sweep,
                orientation,
                sweep > PI,
                frame,
                tol,
            )?;
            back_project(existing, &arc, &space)
        }
        CourseState::PartialArc(PartialArc::RadiusOnly(radius)) => {
            check_radius(radius)?;
            let space = frame.metric_space(existing.start());
            let (a, b) = metric_chord(existing, &space)?;
            let is_major = existing.as_arc().is_some_and(|arc| arc.is_major());
            let arc = chord_arc(
                a,
                b,
                frame.ground_to_grid_distance(radius.abs()),
                orientation_of(radius),
                is_major,
                frame,
                tol,
            )?;
            back_project(existing, &arc, &space)
        }
    };

    check_endpoints(existing, &segment, tol, &mut events);
    check_length(existing, &segment, frame, tol, &mut events);
    Ok(Rebuilt { segment, events })
}

fn rebuild_line(
    existing: &Segment,
    frame: &CogoFrame,
    direction: f64,
    distance: f64,
) -> Result<Segment, CogoError> {
    check_positive(distance, "distance")?;
    if !direction.is_finite() {
        return Err(CogoError::InvalidValue("direction"));
    }

    let start = existing.start();
    let end = frame.travel(
        start,
        frame.ground_to_grid_direction(direction),
        frame.ground_to_grid_distance(distance),
    );
    Ok(Segment::line(start, end))
}

#[inline]
fn check_positive(value: f64, name: &'static str) -> Result<(), CogoError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(CogoError::InvalidValue(name))
    }
}

#[inline]
fn check_radius(radius: f64) -> Result<(), CogoError> {
    check_positive(radius.abs(), "radius")
}

/// Negative radius curves counter clockwise.
#[inline]
fn orientation_of(radius: f64) -> ArcOrientation {
    if radius < 0.0 {
        ArcOrientation::CounterClockwise
    } else {
        ArcOrientation::Clockwise
    }
}

/// Existing endpoints in metric space, rejecting chords too short to build an arc over.
fn metric_chord(existing: &Segment, space: &MetricSpace) -> Result<(Vector2, Vector2), CogoError> {
    let a = space.forward(existing.start());
    let b = space.forward(existing.end());
    let chord = a.distance_to(b);
    if chord < MIN_CHORD_METERS {
        return Err(CogoError::ChordTooShort(chord));
    }

    Ok((a, b))
}

fn chord_arc(
    a: Vector2,
    b: Vector2,
    radius: f64,
    orientation: ArcOrientation,
    is_major: bool,
    frame: &CogoFrame,
    tol: &ToleranceContext,
) -> Result<Arc, CogoError> {
    Arc::from_chord(a, b, radius, orientation, is_major, tol.xy_tolerance_meters()).ok_or_else(
        || CogoError::RadiusTooSmall {
            radius: frame.grid_to_ground_distance(radius),
            chord: frame.grid_to_ground_distance(a.distance_to(b)),
        },
    )
}

/// Central angle whose arc of length `arc_length` spans `chord`.
///
/// Solves `sin(x) / x = chord / arc_length` for the half angle `x` in `(0, PI)` by bisection;
/// the left side decreases monotonically over that range.
fn sweep_for_arc_length(chord: f64, arc_length: f64) -> f64 {
    let target = chord / arc_length;
    let mut lo = 0.0_f64;
    let mut hi = PI;
    for _ in 0..MAX_BISECTIONS {
        let mid = 0.5 * (lo + hi);
        if mid.sin() / mid > target {
            lo = mid;
        } else {
            hi = mid;
        }
    }

    lo + hi
}

/// Metric arc back onto the existing endpoints in dataset coordinates.
///
/// Geographic arcs become the degree space circle through both endpoints and the ground arc point
/// that lands on the degree space bisector of the chord, so that point is the degree arc midpoint
/// and deriving the arc again fits the same ground circle.
fn back_project(existing: &Segment, arc: &Arc, space: &MetricSpace) -> Segment {
    let start = existing.start();
    let end = existing.end();
    let fitted = match space {
        MetricSpace::Scaled { .. } => None,
        MetricSpace::Local(_) => {
            let mid = bisector_point(arc, start, end, space);
            Arc::from_three_points(start, mid, end, FIT_EPSILON)
        }
    };

    let arc = fitted.unwrap_or_else(|| {
        Arc::from_center(start, end, space.inverse(arc.center), arc.orientation)
    });
    Segment::Arc(arc)
}

/// Point of the metric `arc` (dataset coordinates) equidistant from `start` and `end`.
fn bisector_point(arc: &Arc, start: Vector2, end: Vector2, space: &MetricSpace) -> Vector2 {
    let sweep = arc.sweep_angle();
    let at = |t: f64| space.inverse(arc.start.rotate_about(arc.center, sweep * t));
    // negative at the start of the arc, positive at the end
    let side = |p: Vector2| (p - start).length_squared() - (p - end).length_squared();
    let mut lo = 0.0_f64;
    let mut hi = 1.0_f64;
    for _ in 0..MAX_BISECTIONS {
        let mid = 0.5 * (lo + hi);
        if side(at(mid)) < 0.0 {
            lo = mid;
        } else {
            hi = mid;
        }
    }

    at(0.5 * (lo + hi))
}

fn check_endpoints(
    existing: &Segment,
    rebuilt: &Segment,
    tol: &ToleranceContext,
    events: &mut Vec<QualityEvent>,
) {
    let start_gap = existing.start().distance_to(rebuilt.start());
    let end_gap = existing.end().distance_to(rebuilt.end());
    if start_gap > tol.xy_tolerance() || end_gap > tol.xy_tolerance() {
        log::warn!(
            "rebuilt segment is disjoint from existing endpoints (gaps {} and {})",
            start_gap,
            end_gap
        );
        events.push(QualityEvent::Disjoint { start_gap, end_gap });
    }
}

fn check_length(
    existing: &Segment,
    rebuilt: &Segment,
    frame: &CogoFrame,
    tol: &ToleranceContext,
    events: &mut Vec<QualityEvent>,
) {
    let space = frame.metric_space(existing.start());
    let original = metric_length(existing, frame, &space);
    let new_length = metric_length(rebuilt, frame, &space);
    if (new_length - original).abs() > LENGTH_CHANGE_FACTOR * tol.xy_tolerance_meters() {
        let original = frame.grid_to_ground_distance(original);
        let rebuilt = frame.grid_to_ground_distance(new_length);
        log::debug!("segment length changed from {} to {}", original, rebuilt);
        events.push(QualityEvent::LengthChanged { original, rebuilt });
    }
}

/// Grid length in meters.
fn metric_length(seg: &Segment, frame: &CogoFrame, space: &MetricSpace) -> f64 {
    match seg {
        Segment::Line { start, end } => frame.measure(*start, *end).0,
        Segment::Arc(arc) if !arc.is_circular() => seg.length() * frame.planar_meters_per_unit(),
        Segment::Arc(_) => metric_arc(seg, space)
            .map(|arc| arc.length())
            .unwrap_or_else(|| space.forward(seg.start()).distance_to(space.forward(seg.end()))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{cogo::CogoAttributes, core::math::vec2};

    fn chord() -> Segment {
        Segment::line(vec2(0.0, 0.0), vec2(20.0, 0.0))
    }

    #[test]
    fn arc_length_bisection() {
        // half circle of radius 10
        let sweep = sweep_for_arc_length(20.0, 10.0 * PI);
        assert!((sweep - PI).abs() < 1e-9);
        let sweep = sweep_for_arc_length(10.0, 11.0);
        let radius = 11.0 / sweep;
        assert!((2.0 * radius * (0.5 * sweep).sin() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn inconsistent_arc_length_is_reconciled() {
        let tol = ToleranceContext::default();
        // radius 10 over a 20 m chord is a half circle, not 40 m long
        let state = CogoAttributes::arc(90.0, -10.0, 40.0).classify();
        let rebuilt = rebuild_segment(&state, &chord(), &CogoFrame::default(), &tol).unwrap();
        let computed = rebuilt.reconciled_arc_length().unwrap();
        assert!((computed - 10.0 * PI).abs() < 1e-6);
        assert_eq!(
            rebuilt.segment.orientation(),
            Some(ArcOrientation::CounterClockwise)
        );
    }

    #[test]
    fn line_off_the_existing_end_is_disjoint() {
        let tol = ToleranceContext::default();
        let state = CogoAttributes::line(90.0, 25.0).classify();
        let rebuilt = rebuild_segment(&state, &chord(), &CogoFrame::default(), &tol).unwrap();
        assert!(rebuilt.is_disjoint());
        assert!(rebuilt.segment.end().fuzzy_eq_eps(vec2(25.0, 0.0), 1e-9));
        assert!(rebuilt
            .events
            .iter()
            .any(|e| matches!(e, QualityEvent::LengthChanged { .. })));
    }

    #[test]
    fn partial_line_keeps_existing_direction() {
        let tol = ToleranceContext::default();
        let state = CourseState::PartialLine(PartialLine::DistanceOnly(20.0));
        let rebuilt = rebuild_segment(&state, &chord(), &CogoFrame::default(), &tol).unwrap();
        assert!(rebuilt.events.is_empty());
        assert!(rebuilt.segment.end().fuzzy_eq_eps(vec2(20.0, 0.0), 1e-9));
    }

    #[test]
    fn arc_length_only_defaults_clockwise() {
        let tol = ToleranceContext::default();
        let state = CourseState::PartialArc(PartialArc::ArcLengthOnly(10.0 * PI));
        let rebuilt = rebuild_segment(&state, &chord(), &CogoFrame::default(), &tol).unwrap();
        let arc = rebuilt.segment.as_arc().unwrap();
        assert_eq!(arc.orientation, ArcOrientation::Clockwise);
        assert!((arc.radius() - 10.0).abs() < 1e-6);

        let state = CourseState::PartialArc(PartialArc::ArcLengthOnly(19.0));
        assert!(matches!(
            rebuild_segment(&state, &chord(), &CogoFrame::default(), &tol),
            Err(CogoError::ArcLengthTooShort { .. })
        ));
    }

    #[test]
    fn radius_only_keeps_existing_major_flag() {
        let tol = ToleranceContext::default();
        let ccw = ArcOrientation::CounterClockwise;
        let existing = Segment::Arc(
            Arc::from_chord(vec2(0.0, 0.0), vec2(20.0, 0.0), 15.0, ccw, true, 1e-9).unwrap(),
        );
        let state = CourseState::PartialArc(PartialArc::RadiusOnly(-12.0));
        let rebuilt = rebuild_segment(&state, &existing, &CogoFrame::default(), &tol).unwrap();
        let arc = rebuilt.segment.as_arc().unwrap();
        assert!(arc.is_major());
        assert!((arc.radius() - 12.0).abs() < 1e-9);
        assert_eq!(arc.orientation, ccw);
    }

    #[test]
    fn rejects_bad_states() {
        let tol = ToleranceContext::default();
        let frame = CogoFrame::default();
        assert_eq!(
            rebuild_segment(&CourseState::Empty, &chord(), &frame, &tol),
            Err(CogoError::NoAttributes)
        );
        assert_eq!(
            rebuild_segment(&CourseState::Conflicting, &chord(), &frame, &tol),
            Err(CogoError::ConflictingAttributes)
        );
        let short = Segment::line(vec2(0.0, 0.0), vec2(0.001, 0.0));
        let state = CogoAttributes::arc(0.0, 5.0, 1.0).classify();
        assert!(matches!(
            rebuild_segment(&state, &short, &frame, &tol),
            Err(CogoError::ChordTooShort(_))
        ));
    }
}
