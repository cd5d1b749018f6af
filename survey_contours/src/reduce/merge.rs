use crate::{
    core::{traits::Real, ToleranceContext},
    segment::{Arc, Segment},
    tangency::is_short_flat_arc,
};

/// Build the single segment replacing the tangent pair `seg0 -> seg1`.
///
/// The result always starts at `seg0.start()` and ends at `seg1.end()`. Returns `None` when the
/// pair cannot be merged (arcs around different centers with no short flat noise arc, or the
/// replacement arc cannot be constructed). Tangency is not checked here, see
/// [classify_pair](crate::tangency::classify_pair).
///
/// # Examples
///
/// ```
/// # use survey_contours::core::*;
/// # use survey_contours::core::math::*;
/// # use survey_contours::core::traits::*;
/// # use survey_contours::segment::*;
/// # use survey_contours::reduce::*;
/// let tol = ToleranceContext::default();
/// let ccw = ArcOrientation::CounterClockwise;
/// let center = Vector2::zero();
/// // two quarter circles of the same circle merge into one half circle
/// let a = Segment::Arc(Arc::from_center(Vector2::new(10.0, 0.0), Vector2::new(0.0, 10.0), center, ccw));
/// let b = Segment::Arc(Arc::from_center(Vector2::new(0.0, 10.0), Vector2::new(-10.0, 0.0), center, ccw));
/// let merged = merge_pair(&a, &b, &tol).unwrap();
/// let arc = merged.as_arc().unwrap();
/// assert!(arc.center.fuzzy_eq_eps(center, 1e-6));
/// assert!(merged.length().fuzzy_eq_eps(10.0 * std::f64::consts::PI, 1e-6));
/// ```
pub fn merge_pair<T>(
    seg0: &Segment<T>,
    seg1: &Segment<T>,
    tol: &ToleranceContext<T>,
) -> Option<Segment<T>>
where
    T: Real,
{
    let start = seg0.start();
    let end = seg1.end();
    match (seg0, seg1) {
        (Segment::Line { .. }, Segment::Line { .. }) => Some(Segment::line(start, end)),
        (Segment::Arc(arc0), Segment::Arc(arc1)) if arc0.is_concentric(arc1, tol.xy_tolerance()) => {
            let long = if arc0.length() >= arc1.length() {
                arc0
            } else {
                arc1
            };

            let total_sweep = arc0.sweep_angle().abs() + arc1.sweep_angle().abs();
            if total_sweep >= T::tau() {
                return None;
            }

            // both elliptic, the longer arc's axes win
            if let (Some(_), Some(_), Some(shape)) = (arc0.ellipse, arc1.ellipse, long.ellipse) {
                return Some(Segment::Arc(Arc::elliptic(
                    start,
                    end,
                    long.center,
                    long.orientation,
                    shape,
                )));
            }

            // a circle paired with an ellipse stays circular on the circular input's radius
            let radius = if arc0.is_circular() {
                arc0.radius()
            } else {
                arc1.radius()
            };
            Arc::from_chord(
                start,
                end,
                radius,
                long.orientation,
                total_sweep > T::pi(),
                tol.xy_tolerance(),
            )
            .map(Segment::Arc)
        }
        _ => merge_with_noise_arc(seg0, seg1, tol),
    }
}

/// Absorb a short flat arc into its neighbour, taking the neighbour's shape.
fn merge_with_noise_arc<T>(
    seg0: &Segment<T>,
    seg1: &Segment<T>,
    tol: &ToleranceContext<T>,
) -> Option<Segment<T>>
where
    T: Real,
{
    let flat0 = is_short_flat_arc(seg0, tol);
    let flat1 = is_short_flat_arc(seg1, tol);
    let (dominant, other) = match (flat0, flat1) {
        (false, false) => return None,
        (true, false) => (seg1, seg0),
        (false, true) => (seg0, seg1),
        (true, true) if seg0.length() >= seg1.length() => (seg0, seg1),
        (true, true) => (seg1, seg0),
    };

    let start = seg0.start();
    let end = seg1.end();
    match dominant {
        Segment::Line { .. } => Some(Segment::line(start, end)),
        Segment::Arc(arc) => {
            let other_sweep = other
                .as_arc()
                .map_or(T::zero(), |a| a.sweep_angle().abs());
            let total_sweep = arc.sweep_angle().abs() + other_sweep;
            Arc::from_chord(
                start,
                end,
                arc.radius(),
                arc.orientation,
                total_sweep > T::pi(),
                tol.xy_tolerance(),
            )
            .map(Segment::Arc)
        }
    }
}
