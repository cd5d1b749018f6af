use super::Vector2;
use crate::core::traits::Real;

/// Returns the (min, max) values from `v1` and `v2`.
///
/// # Examples
///
/// ```
/// # use survey_contours::core::math::*;
/// let (min_val, max_val) = min_max(8, 4);
/// assert_eq!(min_val, 4);
/// assert_eq!(max_val, 8);
/// ```
#[inline]
pub fn min_max<T>(v1: T, v2: T) -> (T, T)
where
    T: PartialOrd,
{
    if v1 < v2 {
        (v1, v2)
    } else {
        (v2, v1)
    }
}

/// Normalize radians to be between `0` and `2PI`, e.g. `-PI/4` becomes `7PI/4` and `5PI` becomes
/// `PI`.
///
/// # Examples
///
/// ```
/// # use survey_contours::core::math::*;
/// # use survey_contours::core::traits::*;
/// use std::f64::consts::PI;
/// assert!(normalize_radians(5.0 * PI).fuzzy_eq(PI));
/// assert!(normalize_radians(-PI / 4.0).fuzzy_eq(7.0 * PI / 4.0));
/// assert!(normalize_radians(2.0 * PI).fuzzy_eq(2.0 * PI));
/// ```
#[inline]
pub fn normalize_radians<T>(angle: T) -> T
where
    T: Real,
{
    if angle >= T::zero() && angle <= T::tau() {
        return angle;
    }

    angle - (angle / T::tau()).floor() * T::tau()
}

/// Normalize decimal degrees into `[0, 360)`.
///
/// # Examples
///
/// ```
/// # use survey_contours::core::math::*;
/// # use survey_contours::core::traits::*;
/// assert!(normalize_degrees(-90.0).fuzzy_eq(270.0));
/// assert!(normalize_degrees(360.0).fuzzy_eq(0.0));
/// assert!(normalize_degrees(725.5).fuzzy_eq(5.5));
/// ```
#[inline]
pub fn normalize_degrees<T>(degrees: T) -> T
where
    T: Real,
{
    let full = T::lit(360.0);
    let d = degrees - (degrees / full).floor() * full;
    if d >= full {
        d - full
    } else {
        d
    }
}

/// Tests if `test_angle` is between a `start_angle` and `end_angle` going counter clockwise,
/// inclusive using `epsilon`.
#[inline]
pub fn angle_is_between_eps<T>(test_angle: T, start_angle: T, end_angle: T, epsilon: T) -> bool
where
    T: Real,
{
    let end_sweep = normalize_radians(end_angle - start_angle);
    let mid_sweep = normalize_radians(test_angle - start_angle);

    mid_sweep < end_sweep + epsilon
}

/// Tests if `test_angle` is within the `sweep_angle` starting at `start_angle`.
///
/// If `sweep_angle` is positive then sweep is counter clockwise, otherwise it is clockwise.
#[inline]
pub fn angle_is_within_sweep<T>(test_angle: T, start_angle: T, sweep_angle: T) -> bool
where
    T: Real,
{
    let end_angle = start_angle + sweep_angle;
    if sweep_angle < T::zero() {
        return angle_is_between_eps(test_angle, end_angle, start_angle, T::fuzzy_epsilon());
    }

    angle_is_between_eps(test_angle, start_angle, end_angle, T::fuzzy_epsilon())
}

/// Distance squared between the points `p0` and `p1`.
#[inline]
pub fn dist_squared<T>(p0: Vector2<T>, p1: Vector2<T>) -> T
where
    T: Real,
{
    let d = p0 - p1;
    d.dot(d)
}

/// Polar angle (counter clockwise from +x) of the direction vector described by `p0` to `p1`.
#[inline]
pub fn angle<T>(p0: Vector2<T>, p1: Vector2<T>) -> T
where
    T: Real,
{
    T::atan2(p1.y - p0.y, p1.x - p0.x)
}

/// North azimuth in radians (clockwise from +y, in `[0, 2PI)`) of the direction `p0` to `p1`.
///
/// # Examples
///
/// ```
/// # use survey_contours::core::math::*;
/// # use survey_contours::core::traits::*;
/// use std::f64::consts::PI;
/// let origin = Vector2::new(0.0, 0.0);
/// assert!(north_azimuth(origin, Vector2::new(0.0, 5.0)).fuzzy_eq(0.0));
/// assert!(north_azimuth(origin, Vector2::new(5.0, 0.0)).fuzzy_eq(0.5 * PI));
/// assert!(north_azimuth(origin, Vector2::new(-5.0, 0.0)).fuzzy_eq(1.5 * PI));
/// ```
#[inline]
pub fn north_azimuth<T>(p0: Vector2<T>, p1: Vector2<T>) -> T
where
    T: Real,
{
    let az = normalize_radians(T::atan2(p1.x - p0.x, p1.y - p0.y));
    if az >= T::tau() {
        az - T::tau()
    } else {
        az
    }
}

/// Unit direction vector for a north azimuth given in radians.
#[inline]
pub fn azimuth_unit_vector<T>(azimuth: T) -> Vector2<T>
where
    T: Real,
{
    let (s, c) = azimuth.sin_cos();
    Vector2::new(s, c)
}

/// Midpoint of a line segment defined by `p0` to `p1`.
#[inline]
pub fn midpoint<T>(p0: Vector2<T>, p1: Vector2<T>) -> Vector2<T>
where
    T: Real,
{
    Vector2::new((p0.x + p1.x) / T::two(), (p0.y + p1.y) / T::two())
}

/// Returns the point on the circle with `radius`, `center`, and polar `angle` in radians given.
#[inline]
pub fn point_on_circle<T>(radius: T, center: Vector2<T>, angle: T) -> Vector2<T>
where
    T: Real,
{
    let (s, c) = angle.sin_cos();
    Vector2::new(center.x + radius * c, center.y + radius * s)
}

/// Returns the closest point on the line segment from `p0` to `p1` to the `point` given.
#[inline]
pub fn line_seg_closest_point<T>(p0: Vector2<T>, p1: Vector2<T>, point: Vector2<T>) -> Vector2<T>
where
    T: Real,
{
    // See: http://geomalgorithms.com/a02-_lines.html
    let v = p1 - p0;
    let w = point - p0;
    let c1 = w.dot(v);
    if c1 < T::fuzzy_epsilon() {
        return p0;
    }

    let c2 = v.length_squared();
    if c2 < c1 + T::fuzzy_epsilon() {
        return p1;
    }

    let b = c1 / c2;
    p0 + v.scale(b)
}

/// Perpendicular distance of `point` from the infinite line through `p0` and `p1`.
///
/// Falls back to the distance from `p0` when `p0` and `p1` coincide.
///
/// # Examples
///
/// ```
/// # use survey_contours::core::math::*;
/// # use survey_contours::core::traits::*;
/// let d = perpendicular_offset(Vector2::new(0.0, 0.0), Vector2::new(10.0, 0.0), Vector2::new(3.0, 0.25));
/// assert!(d.fuzzy_eq(0.25));
/// ```
#[inline]
pub fn perpendicular_offset<T>(p0: Vector2<T>, p1: Vector2<T>, point: Vector2<T>) -> T
where
    T: Real,
{
    let v = p1 - p0;
    let len = v.length();
    if len.fuzzy_eq_zero() {
        return (point - p0).length();
    }

    (v.perp_dot(point - p0) / len).abs()
}

/// Parametric position of the projection of `point` onto the line `p0` to `p1` (0 at `p0`, 1 at
/// `p1`).
#[inline]
pub fn projection_ratio<T>(p0: Vector2<T>, p1: Vector2<T>, point: Vector2<T>) -> T
where
    T: Real,
{
    let v = p1 - p0;
    let len_sq = v.length_squared();
    if len_sq.fuzzy_eq_zero() {
        return T::zero();
    }

    (point - p0).dot(v) / len_sq
}

/// Angle (in `[0, PI]` radians) the direction turns through at `b` when travelling `a -> b -> c`.
///
/// # Examples
///
/// ```
/// # use survey_contours::core::math::*;
/// # use survey_contours::core::traits::*;
/// use std::f64::consts::PI;
/// let a = Vector2::new(0.0, 0.0);
/// let b = Vector2::new(1.0, 0.0);
/// assert!(deflection_angle(a, b, Vector2::new(2.0, 0.0)).fuzzy_eq(0.0));
/// assert!(deflection_angle(a, b, Vector2::new(1.0, 1.0)).fuzzy_eq(0.5 * PI));
/// assert!(deflection_angle(a, b, Vector2::new(0.0, 0.0)).fuzzy_eq(PI));
/// ```
#[inline]
pub fn deflection_angle<T>(a: Vector2<T>, b: Vector2<T>, c: Vector2<T>) -> T
where
    T: Real,
{
    let v0 = b - a;
    let v1 = c - b;
    T::atan2(v0.perp_dot(v1).abs(), v0.dot(v1))
}

/// Center of the circle through three points, `None` if the points are (nearly) collinear.
///
/// `epsilon` is compared against the doubled triangle area normalized by the longest side
/// squared, so it is scale independent.
pub fn circumcenter<T>(p0: Vector2<T>, p1: Vector2<T>, p2: Vector2<T>, epsilon: T) -> Option<Vector2<T>>
where
    T: Real,
{
    let a = p1 - p0;
    let b = p2 - p0;
    let d = T::two() * a.perp_dot(b);
    let longest = num_traits::real::Real::max(
        num_traits::real::Real::max(a.length_squared(), b.length_squared()),
        (p2 - p1).length_squared(),
    );
    if longest.fuzzy_eq_zero() || (d / longest).fuzzy_eq_zero_eps(epsilon) {
        return None;
    }

    let a_sq = a.length_squared();
    let b_sq = b.length_squared();
    let ux = (b.y * a_sq - a.y * b_sq) / d;
    let uy = (a.x * b_sq - b.x * a_sq) / d;
    Some(Vector2::new(p0.x + ux, p0.y + uy))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::traits::FuzzyEq;

    #[test]
    fn circumcenter_of_right_triangle() {
        let c = circumcenter(
            Vector2::new(0.0, 0.0),
            Vector2::new(4.0, 0.0),
            Vector2::new(4.0, 3.0),
            1e-12,
        )
        .unwrap();
        assert!(c.fuzzy_eq(Vector2::new(2.0, 1.5)));
    }

    #[test]
    fn circumcenter_rejects_collinear() {
        let c = circumcenter(
            Vector2::new(0.0, 0.0),
            Vector2::new(1.0, 1.0),
            Vector2::new(2.0, 2.0),
            1e-12,
        );
        assert!(c.is_none());
    }

    #[test]
    fn projection_ratio_outside_segment() {
        let r = projection_ratio(
            Vector2::new(0.0, 0.0),
            Vector2::new(2.0, 0.0),
            Vector2::new(3.0, 1.0),
        );
        assert!(r.fuzzy_eq(1.5));
    }
}
