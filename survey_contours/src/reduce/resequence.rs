use crate::{
    core::{traits::Real, ToleranceContext},
    segment::Part,
};
use static_aabb2d_index::StaticAABB2DIndexBuilder;

/// Rotate a closed ring so its longest segment comes first.
///
/// Returns the index (in the input order) of the segment moved to the front, `None` for open or
/// empty parts which are never re-sequenced.
///
/// # Examples
///
/// ```
/// # use survey_contours::core::math::*;
/// # use survey_contours::core::traits::*;
/// # use survey_contours::segment::*;
/// # use survey_contours::reduce::*;
/// let pts = [(0.0, 0.0), (1.0, 0.0), (1.0, 5.0), (0.0, 5.0)];
/// let mut ring = Part::new_closed();
/// for i in 0..4 {
///     let (x0, y0) = pts[i];
///     let (x1, y1) = pts[(i + 1) % 4];
///     ring.add(Segment::line(Vector2::new(x0, y0), Vector2::new(x1, y1)));
/// }
/// assert_eq!(resequence_ring(&mut ring), Some(1));
/// assert!(ring[0].start().fuzzy_eq(Vector2::new(1.0, 0.0)));
/// ```
pub fn resequence_ring<T>(part: &mut Part<T>) -> Option<usize>
where
    T: Real,
{
    if !part.is_closed() {
        return None;
    }

    let longest = part.longest_segment_index()?;
    part.rotate_start(longest);
    Some(longest)
}

/// Find a vertex a closed ring visits more than once (a pretzel).
///
/// Returns the index of the later of two coincident vertexes (within the XY tolerance), or `None`
/// if every ring vertex is distinct. Open parts always return `None`.
pub fn find_pretzel_vertex<T>(part: &Part<T>, tol: &ToleranceContext<T>) -> Option<usize>
where
    T: Real,
{
    if !part.is_closed() {
        return None;
    }

    let vertexes = part.vertexes();
    if vertexes.len() < 2 {
        return None;
    }

    let eps = tol.xy_tolerance();
    let mut builder = StaticAABB2DIndexBuilder::new(vertexes.len());
    for v in vertexes.iter() {
        builder.add(v.x - eps, v.y - eps, v.x + eps, v.y + eps);
    }

    let index = match builder.build() {
        Ok(index) => index,
        Err(e) => {
            log::warn!("failed to build vertex index for pretzel check: {:?}", e);
            return None;
        }
    };

    let mut query_stack = Vec::new();
    for (i, v) in vertexes.iter().enumerate() {
        let query_results =
            index.query_with_stack(v.x - eps, v.y - eps, v.x + eps, v.y + eps, &mut query_stack);
        let revisit = query_results
            .into_iter()
            .filter(|&j| j > i)
            .find(|&j| (vertexes[j] - v).length() <= eps);
        if revisit.is_some() {
            return revisit;
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{core::math::vec2, segment::Segment};

    fn ring(points: &[(f64, f64)]) -> Part {
        let n = points.len();
        let segments = (0..n)
            .map(|i| {
                let (x0, y0) = points[i];
                let (x1, y1) = points[(i + 1) % n];
                Segment::line(vec2(x0, y0), vec2(x1, y1))
            })
            .collect();
        Part::from_segments(segments, true)
    }

    #[test]
    fn figure_eight_is_pretzel() {
        // bow tie touching itself at (5, 5)
        let part = ring(&[
            (0.0, 0.0),
            (5.0, 5.0),
            (10.0, 0.0),
            (10.0, 10.0),
            (5.0, 5.0),
            (0.0, 10.0),
        ]);
        let tol = ToleranceContext::default();
        assert_eq!(find_pretzel_vertex(&part, &tol), Some(4));
    }

    #[test]
    fn simple_ring_is_not_pretzel() {
        let part = ring(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
        let tol = ToleranceContext::default();
        assert_eq!(find_pretzel_vertex(&part, &tol), None);
    }

    #[test]
    fn open_part_is_never_resequenced() {
        let mut part = ring(&[(0.0, 0.0), (10.0, 0.0), (10.0, 1.0)]);
        part.set_is_closed(false);
        assert_eq!(resequence_ring(&mut part), None);
    }
}
