//! Compass rule (Bowditch) traverse adjustment.
//!
//! Courses are walked from a start point, the closing error against the declared end point is
//! distributed over the vertexes in proportion to the running course length, and the enclosed
//! area is computed from the adjusted vertexes plus the circular segment area of arc courses.
use crate::{
    cogo::Course,
    core::math::{north_azimuth, Vector2},
    error::TraverseError,
};

/// Largest misclose ratio reported (also used when the misclose is effectively zero).
pub const RATIO_CEILING: f64 = 100_000.0;

/// Misclose lengths at or below this are treated as a perfect closure.
pub const MIN_MISCLOSE: f64 = 1e-9;

/// Result of [adjust] or [adjust_to].
#[derive(Debug, Clone, PartialEq)]
pub struct TraverseResult {
    /// Unadjusted vertexes, the start point followed by the end of each course.
    pub raw_vertexes: Vec<Vector2>,
    /// Compass rule adjusted vertexes, one per raw vertex. The last equals the declared end.
    pub adjusted_vertexes: Vec<Vector2>,
    /// Computed end minus declared end.
    pub misclose: Vector2,
    /// Total length over misclose length, capped at [RATIO_CEILING].
    pub ratio: f64,
    /// Area enclosed by the adjusted vertexes including arc segment areas. Only meaningful for a
    /// closed loop.
    pub area: f64,
    /// Sum of the course lengths used to distribute the misclose.
    pub total_length: f64,
}

impl TraverseResult {
    #[inline]
    pub fn misclose_distance(&self) -> f64 {
        self.misclose.length()
    }

    /// North azimuth (decimal degrees) of the misclose vector.
    #[inline]
    pub fn misclose_direction(&self) -> f64 {
        north_azimuth(Vector2::zero(), self.misclose).to_degrees()
    }

    /// Misclose ratio formatted the way closure reports state it, e.g. `1:30001`.
    pub fn ratio_text(&self) -> String {
        format!("1:{:.0}", self.ratio)
    }
}

/// Adjust a closed loop traverse that should return to `start`.
///
/// # Examples
///
/// ```
/// # use survey_contours::cogo::*;
/// # use survey_contours::core::math::*;
/// # use survey_contours::traverse::*;
/// // 100 x 100 square with the last course 0.05 short
/// let courses = [
///     Course::line(0.0, 100.0),
///     Course::line(90.0, 100.0),
///     Course::line(180.0, 100.0),
///     Course::line(270.0, 99.95),
/// ];
/// let result = adjust(&courses, Vector2::zero()).unwrap();
/// assert!((result.misclose_distance() - 0.05).abs() < 1e-9);
/// assert!((result.misclose_direction() - 90.0).abs() < 1e-6);
/// assert!(result.adjusted_vertexes[4].fuzzy_eq(Vector2::zero()));
/// assert!((result.area - 10_000.0).abs() < 5.0);
/// ```
pub fn adjust(courses: &[Course], start: Vector2) -> Result<TraverseResult, TraverseError> {
    adjust_to(courses, start, start)
}

/// Adjust a traverse from `start` that should end at `declared_end`.
pub fn adjust_to(
    courses: &[Course],
    start: Vector2,
    declared_end: Vector2,
) -> Result<TraverseResult, TraverseError> {
    if courses.is_empty() {
        return Err(TraverseError::NoCourses);
    }

    let mut raw_vertexes = Vec::with_capacity(courses.len() + 1);
    let mut running_lengths = Vec::with_capacity(courses.len() + 1);
    raw_vertexes.push(start);
    running_lengths.push(0.0);
    let mut current = start;
    let mut total_length = 0.0;
    let mut segment_area = 0.0;
    for course in courses {
        current = current + course.traverse_vector();
        total_length += course.distance.abs();
        segment_area += course.segment_area();
        raw_vertexes.push(current);
        running_lengths.push(total_length);
    }

    if !(total_length > 0.0) {
        return Err(TraverseError::ZeroLength);
    }

    let misclose = current - declared_end;
    let misclose_length = misclose.length();
    let ratio = if misclose_length <= MIN_MISCLOSE {
        RATIO_CEILING
    } else {
        (total_length / misclose_length).min(RATIO_CEILING)
    };

    let adjusted_vertexes: Vec<Vector2> = raw_vertexes
        .iter()
        .zip(&running_lengths)
        .map(|(v, running)| *v - misclose.scale(running / total_length))
        .collect();

    let area = (shoelace(&adjusted_vertexes) + segment_area).abs();
    log::debug!(
        "traverse of {} courses: misclose {} (1:{:.0}), area {}",
        courses.len(),
        misclose_length,
        ratio,
        area
    );

    Ok(TraverseResult {
        raw_vertexes,
        adjusted_vertexes,
        misclose,
        ratio,
        area,
        total_length,
    })
}

/// Signed area of the polygon through `points` (closing edge implied), positive counter clockwise.
fn shoelace(points: &[Vector2]) -> f64 {
    let n = points.len();
    let twice_area: f64 = (0..n)
        .map(|i| {
            let p0 = points[i];
            let p1 = points[(i + 1) % n];
            p0.perp_dot(p1)
        })
        .sum();
    twice_area / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::math::vec2;

    #[test]
    fn empty_and_zero_length() {
        assert_eq!(
            adjust(&[], Vector2::zero()),
            Err(TraverseError::NoCourses)
        );
        assert_eq!(
            adjust(&[Course::line(10.0, 0.0)], Vector2::zero()),
            Err(TraverseError::ZeroLength)
        );
    }

    #[test]
    fn perfect_closure_uses_ceiling() {
        let courses = [
            Course::line(0.0, 10.0),
            Course::line(120.0, 10.0),
            Course::line(240.0, 10.0),
        ];
        let result = adjust(&courses, vec2(5.0, 5.0)).unwrap();
        assert_eq!(result.ratio, RATIO_CEILING);
        assert_eq!(result.ratio_text(), "1:100000");
        let expected = 3.0_f64.sqrt() / 4.0 * 100.0;
        assert!((result.area - expected).abs() < 1e-9);
    }

    #[test]
    fn open_traverse_to_declared_end() {
        let courses = [Course::line(90.0, 50.0), Course::line(90.0, 50.0)];
        let result = adjust_to(&courses, vec2(0.0, 0.0), vec2(100.2, 0.0)).unwrap();
        assert!(result.misclose.fuzzy_eq_eps(vec2(-0.2, 0.0), 1e-9));
        assert!(result.adjusted_vertexes[1].fuzzy_eq_eps(vec2(50.1, 0.0), 1e-9));
        assert!(result.adjusted_vertexes[2].fuzzy_eq_eps(vec2(100.2, 0.0), 1e-9));
        assert!((result.ratio - 500.0).abs() < 1e-6);
    }
}
