/// Macro used for test assertions.
#[doc(hidden)]
#[macro_export]
macro_rules! assert_fuzzy_eq {
    ($left:expr, $right:expr) => {{
        match (&$left, &$right) {
            (left_val, right_val) => {
                if !(left_val.fuzzy_eq(*right_val)) {
                    panic!(
                        r#"assertion failed: `left.fuzzy_eq(right)`
  left: `{:?}`,
 right: `{:?}`"#,
                        &*left_val, &*right_val
                    )
                }
            }
        }
    }};
    ($left:expr, $right:expr, $eps:expr) => {{
        match (&$left, &$right, &$eps) {
            (left_val, right_val, eps_val) => {
                if !(left_val.fuzzy_eq_eps(*right_val, *eps_val)) {
                    panic!(
                        r#"assertion failed: `left.fuzzy_eq_eps(right, eps)`
  left: `{:?}`,
 right: `{:?}`
 eps: `{:?}`"#,
                        &*left_val, &*right_val, &*eps_val
                    )
                }
            }
        }
    }};
}

/// Construct an open part of line segments through the points given as a list of (x, y) tuples.
///
/// # Examples
///
/// ```
/// # use survey_contours::line_chain;
/// # use survey_contours::segment::*;
/// let part = line_chain![(0.0, 0.0), (10.0, 0.0), (10.0, 5.0)];
/// assert!(!part.is_closed());
/// assert_eq!(part.len(), 2);
/// assert_eq!(part[1].end().y, 5.0);
/// ```
#[macro_export]
macro_rules! line_chain {
    ($( $p:expr ),* $(,)?) => {
        {
            let points = [$($crate::core::math::Vector2::new($p.0, $p.1)),*];
            let segments = points
                .windows(2)
                .map(|w| $crate::segment::Segment::line(w[0], w[1]))
                .collect();
            $crate::segment::Part::from_segments(segments, false)
        }
    };
}

/// Construct a closed ring of line segments through the points given as a list of (x, y) tuples.
/// The closing segment from the last point back to the first is added.
///
/// # Examples
///
/// ```
/// # use survey_contours::line_ring;
/// # use survey_contours::segment::*;
/// let ring = line_ring![(0.0, 0.0), (10.0, 0.0), (10.0, 5.0), (0.0, 5.0)];
/// assert!(ring.is_closed());
/// assert_eq!(ring.len(), 4);
/// assert_eq!(ring.area(), 50.0);
/// ```
#[macro_export]
macro_rules! line_ring {
    ($( $p:expr ),* $(,)?) => {
        {
            let points = [$($crate::core::math::Vector2::new($p.0, $p.1)),*];
            let n = points.len();
            let segments = (0..n)
                .map(|i| $crate::segment::Segment::line(points[i], points[(i + 1) % n]))
                .collect();
            $crate::segment::Part::from_segments(segments, true)
        }
    };
}
