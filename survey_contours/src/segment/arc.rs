use crate::core::{
    math::{
        angle, angle_is_within_sweep, circumcenter, dist_squared, min_max, normalize_radians,
        point_on_circle, Vector2,
    },
    traits::Real,
};
use static_aabb2d_index::AABB;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Direction of travel around an arc center.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ArcOrientation {
    Clockwise,
    CounterClockwise,
}

impl ArcOrientation {
    #[inline]
    pub fn is_clockwise(self) -> bool {
        matches!(self, ArcOrientation::Clockwise)
    }

    #[inline]
    pub fn reversed(self) -> Self {
        match self {
            ArcOrientation::Clockwise => ArcOrientation::CounterClockwise,
            ArcOrientation::CounterClockwise => ArcOrientation::Clockwise,
        }
    }

    /// `1` for counter clockwise, `-1` for clockwise.
    #[inline]
    pub fn sign<T: Real>(self) -> T {
        match self {
            ArcOrientation::Clockwise => -T::one(),
            ArcOrientation::CounterClockwise => T::one(),
        }
    }

    /// Orientation for a signed sweep angle (positive is counter clockwise).
    #[inline]
    pub fn from_sweep<T: Real>(sweep: T) -> Self {
        if sweep < T::zero() {
            ArcOrientation::Clockwise
        } else {
            ArcOrientation::CounterClockwise
        }
    }
}

/// Axis parameters of an elliptical arc.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "camelCase")
)]
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct EllipseShape<T = f64> {
    /// Length of the semi-major axis.
    pub semi_major: T,
    /// Semi-minor axis divided by semi-major axis, in `(0, 1]`.
    pub minor_major_ratio: T,
    /// Rotation of the major axis from +x in radians (counter clockwise).
    pub rotation: T,
}

impl<T> EllipseShape<T>
where
    T: Real,
{
    #[inline]
    pub fn new(semi_major: T, minor_major_ratio: T, rotation: T) -> Self {
        Self {
            semi_major,
            minor_major_ratio,
            rotation,
        }
    }

    #[inline]
    pub fn semi_minor(&self) -> T {
        self.semi_major * self.minor_major_ratio
    }

    /// Parametric (eccentric) angle of `point` on the ellipse centered at `center`.
    pub fn param_angle(&self, center: Vector2<T>, point: Vector2<T>) -> T {
        let local = (point - center).rotate_about(Vector2::zero(), -self.rotation);
        T::atan2(local.y / self.semi_minor(), local.x / self.semi_major)
    }

    /// Point on the ellipse at parametric angle `t`.
    pub fn point_at(&self, center: Vector2<T>, t: T) -> Vector2<T> {
        let (s, c) = t.sin_cos();
        let local = Vector2::new(self.semi_major * c, self.semi_minor() * s);
        local.rotate_about(Vector2::zero(), self.rotation) + center
    }

    /// Derivative of [EllipseShape::point_at] with respect to `t`.
    pub fn derivative_at(&self, t: T) -> Vector2<T> {
        let (s, c) = t.sin_cos();
        let local = Vector2::new(-self.semi_major * s, self.semi_minor() * c);
        local.rotate_about(Vector2::zero(), self.rotation)
    }
}

/// Circular (or elliptical) arc segment.
///
/// Radius, sweep angle and major/minor state are all derived from `start`, `end`, `center`, and
/// `orientation` so they can never disagree with the geometry. Circular arcs have `ellipse` set to
/// `None`.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "camelCase")
)]
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Arc<T = f64> {
    pub start: Vector2<T>,
    pub end: Vector2<T>,
    pub center: Vector2<T>,
    pub orientation: ArcOrientation,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub ellipse: Option<EllipseShape<T>>,
}

/// Intervals used when integrating elliptical arc length or sampling elliptical extents.
const ELLIPSE_SAMPLES: usize = 64;

/// Arc centers closer than this fraction of the larger radius are treated as the same circle.
pub const CENTER_MATCH_RATIO: f64 = 1e-3;

impl<T> Arc<T>
where
    T: Real,
{
    /// Circular arc from its endpoints, center, and orientation.
    #[inline]
    pub fn from_center(
        start: Vector2<T>,
        end: Vector2<T>,
        center: Vector2<T>,
        orientation: ArcOrientation,
    ) -> Self {
        Self {
            start,
            end,
            center,
            orientation,
            ellipse: None,
        }
    }

    /// Elliptical arc from its endpoints, center, orientation, and axis shape.
    #[inline]
    pub fn elliptic(
        start: Vector2<T>,
        end: Vector2<T>,
        center: Vector2<T>,
        orientation: ArcOrientation,
        shape: EllipseShape<T>,
    ) -> Self {
        Self {
            start,
            end,
            center,
            orientation,
            ellipse: Some(shape),
        }
    }

    /// Circular arc spanning the chord `start` to `end` with the given `radius`.
    ///
    /// `is_major` selects the arc with central angle greater than PI. Returns `None` if the chord
    /// has zero length or the radius is shorter than half the chord (beyond `eps`).
    ///
    /// # Examples
    ///
    /// ```
    /// # use survey_contours::core::math::*;
    /// # use survey_contours::core::traits::*;
    /// # use survey_contours::segment::*;
    /// let start = Vector2::new(0.0, 0.0);
    /// let end = Vector2::new(10.0, 0.0);
    /// // half circle counter clockwise, center at the chord midpoint
    /// let arc = Arc::from_chord(start, end, 5.0, ArcOrientation::CounterClockwise, false, 1e-9).unwrap();
    /// assert!(arc.center.fuzzy_eq_eps(Vector2::new(5.0, 0.0), 1e-6));
    /// // minor counter clockwise arc keeps its center left of the chord direction
    /// let arc = Arc::from_chord(start, end, 10.0, ArcOrientation::CounterClockwise, false, 1e-9).unwrap();
    /// assert!(arc.center.y > 0.0);
    /// assert!(!arc.is_major());
    /// assert!(Arc::from_chord(start, end, 4.0, ArcOrientation::Clockwise, false, 1e-9).is_none());
    /// ```
    pub fn from_chord(
        start: Vector2<T>,
        end: Vector2<T>,
        radius: T,
        orientation: ArcOrientation,
        is_major: bool,
        eps: T,
    ) -> Option<Self> {
        let chord_v = end - start;
        let chord = chord_v.length();
        let radius = radius.abs();
        if chord.fuzzy_eq_zero() || radius.fuzzy_eq_zero() {
            return None;
        }

        let half = chord / T::two();
        let h_sq = radius * radius - half * half;
        let h = if h_sq >= T::zero() {
            h_sq.sqrt()
        } else if radius.fuzzy_eq_eps(half, eps) {
            T::zero()
        } else {
            return None;
        };

        let left = chord_v.scale(T::one() / chord).perp();
        let center_on_left = !orientation.is_clockwise() != is_major;
        let offset = if center_on_left { h } else { -h };
        let mid = start + chord_v.scale(T::half());
        Some(Self::from_center(
            start,
            end,
            mid + left.scale(offset),
            orientation,
        ))
    }

    /// Circular arc from its chord and signed sweep angle (counter clockwise positive).
    ///
    /// Returns `None` if the sweep is zero or not less than a full circle.
    pub fn from_sweep(start: Vector2<T>, end: Vector2<T>, sweep: T, eps: T) -> Option<Self> {
        let abs_sweep = sweep.abs();
        if abs_sweep.fuzzy_eq_zero() || abs_sweep >= T::tau() {
            return None;
        }

        let chord = (end - start).length();
        let radius = chord / (T::two() * (abs_sweep / T::two()).sin());
        Self::from_chord(
            start,
            end,
            radius,
            ArcOrientation::from_sweep(sweep),
            abs_sweep > T::pi(),
            eps,
        )
    }

    /// Circular arc from `start` through `mid` to `end`. Returns `None` for collinear points.
    pub fn from_three_points(
        start: Vector2<T>,
        mid: Vector2<T>,
        end: Vector2<T>,
        eps: T,
    ) -> Option<Self> {
        let center = circumcenter(start, mid, end, eps)?;
        let orientation = if (mid - start).perp_dot(end - mid) > T::zero() {
            ArcOrientation::CounterClockwise
        } else {
            ArcOrientation::Clockwise
        };

        Some(Self::from_center(start, end, center, orientation))
    }

    /// Very large radius arc along the chord `start` to `end` with a 0.1 degree central angle.
    ///
    /// Used to stand in for zero length arcs whose endpoints do not coincide.
    pub fn flat(start: Vector2<T>, end: Vector2<T>, orientation: ArcOrientation) -> Option<Self> {
        let sweep = T::lit(0.1).to_radians() * orientation.sign();
        Self::from_sweep(start, end, sweep, T::fuzzy_epsilon())
    }

    #[inline]
    pub fn is_circular(&self) -> bool {
        self.ellipse.is_none()
    }

    /// Radius for circular arcs, semi-major axis for elliptical arcs.
    #[inline]
    pub fn radius(&self) -> T {
        match self.ellipse {
            None => (self.start - self.center).length(),
            Some(shape) => shape.semi_major,
        }
    }

    /// Angle of `point` about the center (polar angle for circles, parametric for ellipses).
    #[inline]
    fn angle_of(&self, point: Vector2<T>) -> T {
        match self.ellipse {
            None => angle(self.center, point),
            Some(shape) => shape.param_angle(self.center, point),
        }
    }

    #[inline]
    fn point_at_angle(&self, a: T) -> Vector2<T> {
        match self.ellipse {
            None => point_on_circle(self.radius(), self.center, a),
            Some(shape) => shape.point_at(self.center, a),
        }
    }

    #[inline]
    pub fn start_angle(&self) -> T {
        self.angle_of(self.start)
    }

    #[inline]
    pub fn end_angle(&self) -> T {
        self.angle_of(self.end)
    }

    /// Signed central angle from start to end (counter clockwise positive), magnitude in
    /// `[0, 2PI)`.
    pub fn sweep_angle(&self) -> T {
        let a0 = self.start_angle();
        let a1 = self.end_angle();
        let sweep = match self.orientation {
            ArcOrientation::CounterClockwise => normalize_radians(a1 - a0),
            ArcOrientation::Clockwise => -normalize_radians(a0 - a1),
        };

        if sweep.abs() >= T::tau() {
            T::zero()
        } else {
            sweep
        }
    }

    /// Central angle greater than PI.
    #[inline]
    pub fn is_major(&self) -> bool {
        self.sweep_angle().abs() > T::pi()
    }

    #[inline]
    pub fn chord_length(&self) -> T {
        (self.end - self.start).length()
    }

    /// Path length along the arc.
    pub fn length(&self) -> T {
        let sweep = self.sweep_angle();
        match self.ellipse {
            None => self.radius() * sweep.abs(),
            Some(shape) => {
                // composite Simpson's rule over the parametric sweep
                let a0 = self.start_angle();
                let n = ELLIPSE_SAMPLES;
                let h = sweep / T::lit(n as f64);
                let speed = |i: usize| shape.derivative_at(a0 + h * T::lit(i as f64)).length();
                let mut sum = speed(0) + speed(n);
                for i in 1..n {
                    let w = if i % 2 == 1 { T::four() } else { T::two() };
                    sum = sum + w * speed(i);
                }
                (sum * h / T::lit(3.0)).abs()
            }
        }
    }

    /// Unit tangent (direction of travel) at `point`, assumed to lie on the arc.
    pub fn tangent_at(&self, point: Vector2<T>) -> Vector2<T> {
        let dir = match self.ellipse {
            None => (point - self.center).perp(),
            Some(shape) => shape.derivative_at(shape.param_angle(self.center, point)),
        };

        dir.scale(self.orientation.sign()).normalize()
    }

    #[inline]
    pub fn start_tangent(&self) -> Vector2<T> {
        self.tangent_at(self.start)
    }

    #[inline]
    pub fn end_tangent(&self) -> Vector2<T> {
        self.tangent_at(self.end)
    }

    /// Point halfway along the arc sweep.
    pub fn midpoint(&self) -> Vector2<T> {
        self.point_at_angle(self.start_angle() + self.sweep_angle() / T::two())
    }

    /// Same arc travelled from end to start.
    pub fn reversed(&self) -> Self {
        Self {
            start: self.end,
            end: self.start,
            center: self.center,
            orientation: self.orientation.reversed(),
            ellipse: self.ellipse,
        }
    }

    /// True if `other` shares this arc's center within `max(eps, CENTER_MATCH_RATIO * radius)`,
    /// using the larger of the two radii.
    pub fn is_concentric(&self, other: &Arc<T>, eps: T) -> bool {
        let radius = num_traits::real::Real::max(self.radius(), other.radius());
        let max_dist = num_traits::real::Real::max(eps, radius * T::lit(CENTER_MATCH_RATIO));
        (self.center - other.center).length() <= max_dist
    }

    /// Signed area between the chord and the arc, positive for counter clockwise arcs.
    ///
    /// Adding this to the shoelace area of the chord polygon yields the area enclosed by a ring of
    /// segments (see [Part::area](crate::segment::Part::area)).
    pub fn signed_segment_area(&self) -> T {
        let sweep = self.sweep_angle().abs();
        let scale = match self.ellipse {
            None => {
                let r = self.radius();
                r * r
            }
            Some(shape) => shape.semi_major * shape.semi_minor(),
        };

        scale * (sweep - sweep.sin()) / T::two() * self.orientation.sign()
    }

    /// Closest point on the arc to `point`.
    pub fn closest_point(&self, point: Vector2<T>) -> Vector2<T> {
        if let Some(shape) = self.ellipse {
            return self.sampled_closest_point(shape, point);
        }

        if point.fuzzy_eq(self.center) {
            return self.start;
        }

        let point_angle = angle(self.center, point);
        if angle_is_within_sweep(point_angle, self.start_angle(), self.sweep_angle()) {
            return point_on_circle(self.radius(), self.center, point_angle);
        }

        if dist_squared(self.start, point) < dist_squared(self.end, point) {
            self.start
        } else {
            self.end
        }
    }

    fn sampled_closest_point(&self, shape: EllipseShape<T>, point: Vector2<T>) -> Vector2<T> {
        let a0 = self.start_angle();
        let step = self.sweep_angle() / T::lit((ELLIPSE_SAMPLES * 4) as f64);
        (0..=ELLIPSE_SAMPLES * 4)
            .map(|i| shape.point_at(self.center, a0 + step * T::lit(i as f64)))
            .fold(self.start, |best, p| {
                if dist_squared(p, point) < dist_squared(best, point) {
                    p
                } else {
                    best
                }
            })
    }

    /// Axis aligned bounding box of the arc.
    pub fn bounding_box(&self) -> AABB<T> {
        let (mut min_x, mut max_x) = min_max(self.start.x, self.end.x);
        let (mut min_y, mut max_y) = min_max(self.start.y, self.end.y);
        let mut include = |p: Vector2<T>| {
            min_x = num_traits::real::Real::min(min_x, p.x);
            min_y = num_traits::real::Real::min(min_y, p.y);
            max_x = num_traits::real::Real::max(max_x, p.x);
            max_y = num_traits::real::Real::max(max_y, p.y);
        };

        let a0 = self.start_angle();
        let sweep = self.sweep_angle();
        match self.ellipse {
            None => {
                let r = self.radius();
                for quadrant in 0..4 {
                    let a = T::lit(quadrant as f64) * T::pi() / T::two();
                    if angle_is_within_sweep(a, a0, sweep) {
                        include(point_on_circle(r, self.center, a));
                    }
                }
            }
            Some(shape) => {
                let step = sweep / T::lit(ELLIPSE_SAMPLES as f64);
                for i in 1..ELLIPSE_SAMPLES {
                    include(shape.point_at(self.center, a0 + step * T::lit(i as f64)));
                }
            }
        }

        AABB::new(min_x, min_y, max_x, max_y)
    }
}
