use super::Segment;
use crate::{
    core::{math::Vector2, traits::Real},
    error::ChainError,
};
use static_aabb2d_index::AABB;
use std::ops::Index;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Ordered chain of segments forming one part of a feature (a path or a ring).
///
/// The end of each segment is expected to coincide with the start of the next (and for closed
/// parts the last end with the first start), see [Part::check_connectivity].
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "camelCase")
)]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Part<T = f64> {
    segments: Vec<Segment<T>>,
    is_closed: bool,
}

impl<T> Part<T>
where
    T: Real,
{
    /// Create a new empty open part.
    #[inline]
    pub fn new_open() -> Self {
        Self {
            segments: Vec::new(),
            is_closed: false,
        }
    }

    /// Create a new empty closed part (ring).
    #[inline]
    pub fn new_closed() -> Self {
        Self {
            segments: Vec::new(),
            is_closed: true,
        }
    }

    #[inline]
    pub fn from_segments(segments: Vec<Segment<T>>, is_closed: bool) -> Self {
        Self {
            segments,
            is_closed,
        }
    }

    #[inline]
    pub fn add(&mut self, segment: Segment<T>) {
        self.segments.push(segment);
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.is_closed
    }

    #[inline]
    pub fn set_is_closed(&mut self, is_closed: bool) {
        self.is_closed = is_closed;
    }

    #[inline]
    pub fn segments(&self) -> &[Segment<T>] {
        &self.segments
    }

    #[inline]
    pub fn into_segments(self) -> Vec<Segment<T>> {
        self.segments
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Segment<T>> {
        self.segments.iter()
    }

    /// True if any segment is an arc.
    #[inline]
    pub fn has_arcs(&self) -> bool {
        self.segments.iter().any(|s| !s.is_line())
    }

    /// Total path length of all segments.
    pub fn path_length(&self) -> T {
        self.segments
            .iter()
            .fold(T::zero(), |acc, s| acc + s.length())
    }

    /// Signed area enclosed by a closed part (counter clockwise positive), always zero for open
    /// parts.
    ///
    /// Shoelace formula over the segment endpoints plus the chord-to-arc area of every arc.
    ///
    /// # Examples
    ///
    /// ```
    /// # use survey_contours::core::math::*;
    /// # use survey_contours::core::traits::*;
    /// # use survey_contours::segment::*;
    /// // unit circle from two counter clockwise half circles
    /// let a = Vector2::new(1.0, 0.0);
    /// let b = Vector2::new(-1.0, 0.0);
    /// let ccw = ArcOrientation::CounterClockwise;
    /// let mut ring = Part::new_closed();
    /// ring.add(Segment::Arc(Arc::from_center(a, b, Vector2::zero(), ccw)));
    /// ring.add(Segment::Arc(Arc::from_center(b, a, Vector2::zero(), ccw)));
    /// assert!(ring.area().fuzzy_eq(std::f64::consts::PI));
    ///
    /// ring.set_is_closed(false);
    /// assert!(ring.area().fuzzy_eq(0.0));
    /// ```
    pub fn area(&self) -> T {
        if !self.is_closed {
            return T::zero();
        }

        let mut double_total_area = T::zero();
        for seg in self.segments.iter() {
            let p0 = seg.start();
            let p1 = seg.end();
            double_total_area = double_total_area + p0.x * p1.y - p0.y * p1.x;
            double_total_area = double_total_area + T::two() * seg.signed_area_correction();
        }

        double_total_area / T::two()
    }

    /// Verify each segment ends where the next begins (within `eps`).
    pub fn check_connectivity(&self, eps: T) -> Result<(), ChainError> {
        if self.segments.is_empty() {
            return Err(ChainError::Empty);
        }

        let n = self.segments.len();
        let pair_count = if self.is_closed { n } else { n - 1 };
        for i in 0..pair_count {
            let end = self.segments[i].end();
            let next_start = self.segments[(i + 1) % n].start();
            let gap = (next_start - end).length();
            if gap > eps {
                return Err(ChainError::Disjoint {
                    index: i,
                    gap: gap.to_f64().unwrap_or(f64::NAN),
                });
            }
        }

        Ok(())
    }

    /// Vertex positions: every segment start plus, for open parts, the final end point.
    pub fn vertexes(&self) -> Vec<Vector2<T>> {
        let mut result: Vec<_> = self.segments.iter().map(|s| s.start()).collect();
        if !self.is_closed {
            if let Some(last) = self.segments.last() {
                result.push(last.end());
            }
        }

        result
    }

    /// Index of the segment with the greatest path length (first one wins ties).
    pub fn longest_segment_index(&self) -> Option<usize> {
        let mut best: Option<(usize, T)> = None;
        for (i, seg) in self.segments.iter().enumerate() {
            let len = seg.length();
            match best {
                Some((_, best_len)) if len <= best_len => {}
                _ => best = Some((i, len)),
            }
        }

        best.map(|(i, _)| i)
    }

    /// Rotate the segment order of a closed part so `index` becomes the first segment.
    ///
    /// Open parts are left unchanged since their start point is fixed.
    pub fn rotate_start(&mut self, index: usize) {
        if self.is_closed && index < self.segments.len() {
            self.segments.rotate_left(index);
        }
    }

    /// Bounding box around all segments, `None` if the part is empty.
    pub fn extents(&self) -> Option<AABB<T>> {
        let mut iter = self.segments.iter();
        let first = iter.next()?.bounding_box();
        Some(iter.fold(first, |acc, seg| {
            let bb = seg.bounding_box();
            AABB::new(
                num_traits::real::Real::min(acc.min_x, bb.min_x),
                num_traits::real::Real::min(acc.min_y, bb.min_y),
                num_traits::real::Real::max(acc.max_x, bb.max_x),
                num_traits::real::Real::max(acc.max_y, bb.max_y),
            )
        }))
    }
}

impl<T> Index<usize> for Part<T> {
    type Output = Segment<T>;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.segments[index]
    }
}

impl<'a, T> IntoIterator for &'a Part<T> {
    type Item = &'a Segment<T>;
    type IntoIter = std::slice::Iter<'a, Segment<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{math::vec2, traits::FuzzyEq};

    fn square(size: f64) -> Part {
        let pts = [
            vec2(0.0, 0.0),
            vec2(size, 0.0),
            vec2(size, size),
            vec2(0.0, size),
        ];
        let segments = (0..4)
            .map(|i| Segment::line(pts[i], pts[(i + 1) % 4]))
            .collect();
        Part::from_segments(segments, true)
    }

    #[test]
    fn square_area_and_length() {
        let sq = square(10.0);
        assert!(sq.area().fuzzy_eq(100.0));
        assert!(sq.path_length().fuzzy_eq(40.0));
        assert_eq!(sq.vertexes().len(), 4);
        assert!(sq.check_connectivity(1e-9).is_ok());
        let bb = sq.extents().unwrap();
        assert!(bb.max_x.fuzzy_eq(10.0) && bb.max_y.fuzzy_eq(10.0));
        assert!(Part::<f64>::new_closed().extents().is_none());
    }

    #[test]
    fn connectivity_reports_first_gap() {
        let part = Part::from_segments(
            vec![
                Segment::line(vec2(0.0, 0.0), vec2(1.0, 0.0)),
                Segment::line(vec2(1.5, 0.0), vec2(2.0, 0.0)),
            ],
            false,
        );
        match part.check_connectivity(1e-3) {
            Err(ChainError::Disjoint { index, gap }) => {
                assert_eq!(index, 0);
                assert!(gap.fuzzy_eq(0.5));
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(
            Part::<f64>::new_open().check_connectivity(1e-3),
            Err(ChainError::Empty)
        );
    }

    #[test]
    fn rotate_start_keeps_ring() {
        let mut sq = square(2.0);
        sq.rotate_start(2);
        assert!(sq[0].start().fuzzy_eq(vec2(2.0, 2.0)));
        assert!(sq.area().fuzzy_eq(4.0));
        assert!(sq.check_connectivity(1e-9).is_ok());
    }
}
