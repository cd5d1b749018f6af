//! Collapse chains of tangent segments into the fewest equivalent segments.
//!
//! [reduce_part] works on one part: rings are checked for pretzels and re-sequenced, then the
//! segments are walked back to front merging every tangent pair accepted by
//! [classify_pair](crate::tangency::classify_pair). [reduce_geometry] reduces every part of a
//! multi-part geometry and applies [check_shape_preserved] as a final safety net.
mod merge;
mod resequence;

pub use merge::*;
pub use resequence::*;

use crate::{
    core::{math::Vector2, traits::Real, ToleranceContext},
    error::{ShapeRejection, SkipReason},
    segment::{Part, Segment},
    tangency::{classify_pair, PairClass},
};

/// Fraction the total perimeter may change by before a reduction is rejected.
pub const MAX_PERIMETER_CHANGE: f64 = 0.1;

/// Outcome of reducing one part.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReduceResult {
    /// Number of vertexes removed (one per merge).
    pub removed_count: usize,
    /// Set when the part was returned unchanged without attempting any merge.
    pub skipped: Option<SkipReason>,
}

impl ReduceResult {
    #[inline]
    pub fn changed(&self) -> bool {
        self.removed_count > 0
    }

    fn skip(reason: SkipReason) -> Self {
        Self {
            removed_count: 0,
            skipped: Some(reason),
        }
    }
}

/// Outcome of reducing every part of a geometry.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GeometryReduceResult {
    /// Result for each part, in input order.
    pub parts: Vec<ReduceResult>,
    /// Set when the reduced geometry failed the shape check and the original was restored.
    pub rejected: Option<ShapeRejection>,
}

impl GeometryReduceResult {
    /// Total vertexes removed across all parts (zero if the reduction was rejected).
    pub fn removed_count(&self) -> usize {
        if self.rejected.is_some() {
            return 0;
        }

        self.parts.iter().map(|p| p.removed_count).sum()
    }

    #[inline]
    pub fn changed(&self) -> bool {
        self.removed_count() > 0
    }
}

/// Fewest segments a closed ring may be reduced to.
#[inline]
fn min_ring_segments<T>(part: &Part<T>) -> usize
where
    T: Real,
{
    if part.has_arcs() {
        2
    } else {
        3
    }
}

/// Merged segment plus the vertexes it replaced.
struct Run<T> {
    segment: Segment<T>,
    removed: Vec<Vector2<T>>,
}

/// Reduce one part in place by merging tangent segment pairs.
///
/// The part is left untouched unless at least one merge happens. Rings that revisit a vertex
/// (pretzels) and malformed chains are skipped entirely, see [ReduceResult::skipped].
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
/// let mut part = Part::new_open();
/// part.add(Segment::line(Vector2::new(0.0, 0.0), Vector2::new(10.0, 0.0)));
/// part.add(Segment::line(Vector2::new(10.0, 0.0), Vector2::new(20.0, 0.0005)));
/// part.add(Segment::line(Vector2::new(20.0, 0.0005), Vector2::new(30.0, 0.0)));
/// let result = reduce_part(&mut part, &tol);
/// assert_eq!(result.removed_count, 2);
/// assert_eq!(part.len(), 1);
/// assert!(part[0].end().fuzzy_eq(Vector2::new(30.0, 0.0)));
/// ```
pub fn reduce_part<T>(part: &mut Part<T>, tol: &ToleranceContext<T>) -> ReduceResult
where
    T: Real,
{
    if let Err(e) = part.check_connectivity(tol.xy_tolerance()) {
        log::warn!("skipping malformed part: {}", e);
        return ReduceResult::skip(e.into());
    }

    let min_count = if part.is_closed() {
        min_ring_segments(part)
    } else {
        1
    };

    if part.len() <= min_count {
        return ReduceResult::skip(SkipReason::TooFewSegments);
    }

    let mut working = part.clone();
    if working.is_closed() {
        if let Some(vertex) = find_pretzel_vertex(&working, tol) {
            log::warn!("skipping ring that revisits vertex {}", vertex);
            return ReduceResult::skip(SkipReason::Pretzel { vertex });
        }

        resequence_ring(&mut working);
    }

    let feature_length = working.path_length();
    let segment_count = working.len();
    let is_closed = working.is_closed();
    let mut runs: Vec<Run<T>> = working
        .into_segments()
        .into_iter()
        .map(|segment| Run {
            segment,
            removed: Vec::new(),
        })
        .collect();

    // a rejected pair may become mergeable once its neighbours have merged, repeat until stable
    let mut removed_count = 0;
    loop {
        let (next_runs, merged) = merge_pass(runs, is_closed, min_count, tol, feature_length);
        runs = next_runs;
        if merged == 0 {
            break;
        }

        removed_count += merged;
    }

    if removed_count > 0 {
        log::debug!(
            "reduced part from {} to {} segments",
            segment_count,
            runs.len()
        );
        *part = Part::from_segments(
            runs.into_iter().map(|r| r.segment).collect(),
            part.is_closed(),
        );
    }

    ReduceResult {
        removed_count,
        skipped: None,
    }
}

/// One back to front pass over `runs`, returning the new runs and the number of merges made.
///
/// Each run carries the vertexes already removed into it so later passes keep checking the max
/// offset against the original geometry.
fn merge_pass<T>(
    runs: Vec<Run<T>>,
    is_closed: bool,
    min_count: usize,
    tol: &ToleranceContext<T>,
    feature_length: T,
) -> (Vec<Run<T>>, usize)
where
    T: Real,
{
    let run_count = runs.len();
    let mut merged_count = 0;
    let mut out: Vec<Run<T>> = Vec::with_capacity(run_count);

    // back to front; the top of `out` is always the run following `run`
    for run in runs.into_iter().rev() {
        if run_count - merged_count <= min_count {
            out.push(run);
            continue;
        }

        match out.pop() {
            Some(next) => match try_merge(run, next, tol, feature_length) {
                Ok(merged) => {
                    merged_count += 1;
                    out.push(merged);
                }
                Err((run, next)) => {
                    out.push(next);
                    out.push(run);
                }
            },
            None => out.push(run),
        }
    }

    out.reverse();

    if is_closed && out.len() > min_count {
        // wrap-around pair (last, first) the linear walk cannot reach
        let first = out.remove(0);
        match out.pop() {
            Some(last) => match try_merge(last, first, tol, feature_length) {
                Ok(merged) => {
                    merged_count += 1;
                    out.insert(0, merged);
                }
                Err((last, first)) => {
                    out.insert(0, first);
                    out.push(last);
                }
            },
            None => out.insert(0, first),
        }
    }

    (out, merged_count)
}

/// Merge `run0 -> run1` if the pair is tangent, the replacement can be built, and it stays within
/// the user max offset of every vertex it removes. Hands both runs back on failure.
fn try_merge<T>(
    run0: Run<T>,
    run1: Run<T>,
    tol: &ToleranceContext<T>,
    feature_length: T,
) -> Result<Run<T>, (Run<T>, Run<T>)>
where
    T: Real,
{
    match classify_pair(&run0.segment, &run1.segment, tol, feature_length) {
        PairClass::Tangent => {}
        PairClass::Bend | PairClass::Degenerate => return Err((run0, run1)),
    }

    let merged = match merge_pair(&run0.segment, &run1.segment, tol) {
        Some(merged) => merged,
        None => {
            log::debug!(
                "tangent pair at {:?} could not be merged",
                run0.segment.end()
            );
            return Err((run0, run1));
        }
    };

    let shared = run0.segment.end();
    let max_offset = tol.from_meters(tol.user_max_offset_meters());
    let moved_too_far = run0
        .removed
        .iter()
        .chain(std::iter::once(&shared))
        .chain(run1.removed.iter())
        .any(|&v| merged.distance_to(v) > max_offset);
    if moved_too_far {
        log::debug!("merge at {:?} exceeds max offset, skipped", shared);
        return Err((run0, run1));
    }

    log::debug!("merged tangent pair at {:?}", shared);
    let mut removed = run0.removed;
    removed.push(shared);
    removed.extend(run1.removed);
    Ok(Run {
        segment: merged,
        removed,
    })
}

/// Reduce every part of a geometry, restoring all parts if the result fails
/// [check_shape_preserved].
pub fn reduce_geometry<T>(
    parts: &mut Vec<Part<T>>,
    tol: &ToleranceContext<T>,
) -> GeometryReduceResult
where
    T: Real,
{
    apply_reduction(parts, tol, reduce_part)
}

/// Run `reduce` over every part then apply the shape-preservation check.
///
/// [reduce_geometry] uses [reduce_part]; other per-part reductions may be supplied to share the
/// same all-or-nothing guard.
pub fn apply_reduction<T, F>(
    parts: &mut Vec<Part<T>>,
    tol: &ToleranceContext<T>,
    mut reduce: F,
) -> GeometryReduceResult
where
    T: Real,
    F: FnMut(&mut Part<T>, &ToleranceContext<T>) -> ReduceResult,
{
    let original = parts.clone();
    let results: Vec<_> = parts.iter_mut().map(|p| reduce(p, tol)).collect();
    let mut result = GeometryReduceResult {
        parts: results,
        rejected: None,
    };

    if !result.changed() {
        return result;
    }

    if let Err(rejection) = check_shape_preserved(&original, parts, tol) {
        log::warn!("reduction rejected, restoring original geometry: {}", rejection);
        *parts = original;
        result.rejected = Some(rejection);
    }

    result
}

/// Coarse safety net comparing reduced parts against the originals.
///
/// Rejects the reduction if the part count changed, the total perimeter changed by more than
/// [MAX_PERIMETER_CHANGE], or any reduced part is invalid (disjoint, a ring with no area, or a
/// ring whose orientation flipped).
///
/// # Examples
///
/// ```
/// # use survey_contours::core::*;
/// # use survey_contours::core::math::*;
/// # use survey_contours::segment::*;
/// # use survey_contours::reduce::*;
/// # use survey_contours::error::ShapeRejection;
/// let tol = ToleranceContext::default();
/// let open = |len: f64| {
///     Part::from_segments(vec![Segment::line(Vector2::new(0.0, 0.0), Vector2::new(len, 0.0))], false)
/// };
/// assert!(check_shape_preserved(&[open(100.0)], &[open(95.0)], &tol).is_ok());
/// assert!(matches!(
///     check_shape_preserved(&[open(100.0)], &[open(50.0)], &tol),
///     Err(ShapeRejection::PerimeterChanged { .. })
/// ));
/// ```
pub fn check_shape_preserved<T>(
    original: &[Part<T>],
    reduced: &[Part<T>],
    tol: &ToleranceContext<T>,
) -> Result<(), ShapeRejection>
where
    T: Real,
{
    if original.len() != reduced.len() {
        return Err(ShapeRejection::PartCountChanged {
            original: original.len(),
            reduced: reduced.len(),
        });
    }

    let perimeter = |parts: &[Part<T>]| {
        parts
            .iter()
            .fold(T::zero(), |acc, p| acc + p.path_length())
    };

    let original_perimeter = perimeter(original);
    let reduced_perimeter = perimeter(reduced);
    let change = (reduced_perimeter - original_perimeter).abs();
    if !(change <= T::lit(MAX_PERIMETER_CHANGE) * original_perimeter) {
        return Err(ShapeRejection::PerimeterChanged {
            original: to_f64(original_perimeter),
            reduced: to_f64(reduced_perimeter),
        });
    }

    let eps = tol.xy_tolerance();
    for (i, (orig, red)) in original.iter().zip(reduced.iter()).enumerate() {
        let invalid = |reason| ShapeRejection::Invalid { part: i, reason };
        if red.check_connectivity(eps).is_err() {
            return Err(invalid("segments are not connected"));
        }

        if red.is_closed() {
            let area = red.area();
            if area.abs() <= eps * eps {
                return Err(invalid("ring has no area"));
            }

            if (area > T::zero()) != (orig.area() > T::zero()) {
                return Err(invalid("ring orientation flipped"));
            }
        }
    }

    Ok(())
}

#[inline]
fn to_f64<T: Real>(value: T) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}
