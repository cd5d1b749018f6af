use super::{Arc, ArcOrientation};
use crate::core::{
    math::{line_seg_closest_point, midpoint, min_max, Vector2},
    traits::Real,
};
use static_aabb2d_index::AABB;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Directed line or arc segment of a part.
///
/// # Examples
///
/// ```
/// # use survey_contours::core::math::*;
/// # use survey_contours::core::traits::*;
/// # use survey_contours::segment::*;
/// let line = Segment::line(Vector2::new(0.0, 0.0), Vector2::new(3.0, 4.0));
/// assert!(line.length().fuzzy_eq(5.0));
/// assert!(line.start_tangent().fuzzy_eq(Vector2::new(0.6, 0.8)));
///
/// // quarter circle of radius 1 around the origin
/// let arc = Segment::Arc(Arc::from_center(
///     Vector2::new(1.0, 0.0),
///     Vector2::new(0.0, 1.0),
///     Vector2::zero(),
///     ArcOrientation::CounterClockwise,
/// ));
/// assert!(arc.length().fuzzy_eq(std::f64::consts::FRAC_PI_2));
/// assert!(arc.end_tangent().fuzzy_eq(Vector2::new(-1.0, 0.0)));
/// ```
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(tag = "type", rename_all = "camelCase")
)]
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Segment<T = f64> {
    Line { start: Vector2<T>, end: Vector2<T> },
    Arc(Arc<T>),
}

impl<T> Segment<T>
where
    T: Real,
{
    #[inline]
    pub fn line(start: Vector2<T>, end: Vector2<T>) -> Self {
        Segment::Line { start, end }
    }

    #[inline]
    pub fn start(&self) -> Vector2<T> {
        match self {
            Segment::Line { start, .. } => *start,
            Segment::Arc(arc) => arc.start,
        }
    }

    #[inline]
    pub fn end(&self) -> Vector2<T> {
        match self {
            Segment::Line { end, .. } => *end,
            Segment::Arc(arc) => arc.end,
        }
    }

    #[inline]
    pub fn is_line(&self) -> bool {
        matches!(self, Segment::Line { .. })
    }

    #[inline]
    pub fn as_arc(&self) -> Option<&Arc<T>> {
        match self {
            Segment::Arc(arc) => Some(arc),
            Segment::Line { .. } => None,
        }
    }

    /// True for a circular arc segment.
    #[inline]
    pub fn is_circular_arc(&self) -> bool {
        self.as_arc().is_some_and(|a| a.is_circular())
    }

    /// True for an elliptical arc segment.
    #[inline]
    pub fn is_elliptic_arc(&self) -> bool {
        self.as_arc().is_some_and(|a| !a.is_circular())
    }

    /// Arc orientation, `None` for lines.
    #[inline]
    pub fn orientation(&self) -> Option<ArcOrientation> {
        self.as_arc().map(|a| a.orientation)
    }

    /// Straight distance from start to end.
    #[inline]
    pub fn chord_length(&self) -> T {
        (self.end() - self.start()).length()
    }

    /// Path length along the segment.
    #[inline]
    pub fn length(&self) -> T {
        match self {
            Segment::Line { start, end } => (end - start).length(),
            Segment::Arc(arc) => arc.length(),
        }
    }

    /// Unit direction of travel at the start point (zero vector for a zero length line).
    pub fn start_tangent(&self) -> Vector2<T> {
        match self {
            Segment::Line { start, end } => line_direction(*start, *end),
            Segment::Arc(arc) => arc.start_tangent(),
        }
    }

    /// Unit direction of travel at the end point (zero vector for a zero length line).
    pub fn end_tangent(&self) -> Vector2<T> {
        match self {
            Segment::Line { start, end } => line_direction(*start, *end),
            Segment::Arc(arc) => arc.end_tangent(),
        }
    }

    /// Same segment travelled from end to start.
    pub fn reversed(&self) -> Self {
        match self {
            Segment::Line { start, end } => Segment::line(*end, *start),
            Segment::Arc(arc) => Segment::Arc(arc.reversed()),
        }
    }

    /// Point halfway along the segment path.
    pub fn midpoint(&self) -> Vector2<T> {
        match self {
            Segment::Line { start, end } => midpoint(*start, *end),
            Segment::Arc(arc) => arc.midpoint(),
        }
    }

    /// Closest point on the segment to `point`.
    pub fn closest_point(&self, point: Vector2<T>) -> Vector2<T> {
        match self {
            Segment::Line { start, end } => line_seg_closest_point(*start, *end, point),
            Segment::Arc(arc) => arc.closest_point(point),
        }
    }

    /// Distance from `point` to the closest point on the segment.
    #[inline]
    pub fn distance_to(&self, point: Vector2<T>) -> T {
        (self.closest_point(point) - point).length()
    }

    /// Axis aligned bounding box of the segment.
    pub fn bounding_box(&self) -> AABB<T> {
        match self {
            Segment::Line { start, end } => {
                let (min_x, max_x) = min_max(start.x, end.x);
                let (min_y, max_y) = min_max(start.y, end.y);
                AABB::new(min_x, min_y, max_x, max_y)
            }
            Segment::Arc(arc) => arc.bounding_box(),
        }
    }

    /// Signed area between the chord and the segment path (zero for lines).
    #[inline]
    pub fn signed_area_correction(&self) -> T {
        match self {
            Segment::Line { .. } => T::zero(),
            Segment::Arc(arc) => arc.signed_segment_area(),
        }
    }

    /// Segment with the same shape but new endpoints.
    ///
    /// Lines take the endpoints directly. Arcs keep their center and orientation, so the caller
    /// is responsible for keeping the endpoints on the curve.
    pub fn with_endpoints(&self, start: Vector2<T>, end: Vector2<T>) -> Self {
        match self {
            Segment::Line { .. } => Segment::line(start, end),
            Segment::Arc(arc) => Segment::Arc(Arc {
                start,
                end,
                ..*arc
            }),
        }
    }
}

#[inline]
fn line_direction<T>(start: Vector2<T>, end: Vector2<T>) -> Vector2<T>
where
    T: Real,
{
    let v = end - start;
    if v.length().fuzzy_eq_zero() {
        return Vector2::zero();
    }

    v.normalize()
}

impl<T> From<Arc<T>> for Segment<T> {
    fn from(arc: Arc<T>) -> Self {
        Segment::Arc(arc)
    }
}
