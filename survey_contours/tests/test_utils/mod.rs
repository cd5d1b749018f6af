#![allow(dead_code)]

use survey_contours::{
    core::{
        math::{vec2, Vector2},
        traits::FuzzyEq,
    },
    segment::{Arc, ArcOrientation, Part, Segment},
};

/// Summary values of a part used to compare results without depending on vertex order.
#[derive(Debug, Copy, Clone)]
pub struct PartProperties {
    pub segment_count: usize,
    pub path_length: f64,
    pub area: f64,
    pub start: Vector2,
    pub end: Vector2,
}

impl PartProperties {
    pub const LENGTH_EPS: f64 = 1e-6;

    pub fn new(part: &Part) -> Self {
        Self {
            segment_count: part.len(),
            path_length: part.path_length(),
            // shoelace terms far from the origin lose precision
            area: translated(part, -part[0].start()).area(),
            start: part[0].start(),
            end: part[part.len() - 1].end(),
        }
    }

    /// Compare ignoring start and end, rings may be re-sequenced.
    pub fn shape_eq(&self, other: &Self) -> bool {
        self.segment_count == other.segment_count
            && self
                .path_length
                .fuzzy_eq_eps(other.path_length, Self::LENGTH_EPS)
            && self.area.fuzzy_eq_eps(other.area, Self::LENGTH_EPS)
    }
}

/// Copy of `part` moved by `offset`.
pub fn translated(part: &Part, offset: Vector2) -> Part {
    let segments = part
        .iter()
        .map(|seg| match seg {
            Segment::Line { start, end } => Segment::line(*start + offset, *end + offset),
            Segment::Arc(arc) => Segment::Arc(Arc {
                start: arc.start + offset,
                end: arc.end + offset,
                center: arc.center + offset,
                ..*arc
            }),
        })
        .collect();
    Part::from_segments(segments, part.is_closed())
}

/// Copy of a ring starting at segment `index`.
pub fn rotated(part: &Part, index: usize) -> Part {
    let mut result = part.clone();
    result.rotate_start(index);
    result
}

/// Variants of `part` that must reduce to the same shape: the original, moved far from the origin,
/// and for rings every rotation of the start segment.
pub fn part_variants(part: &Part) -> Vec<(String, Part)> {
    let mut result = vec![
        ("original".to_string(), part.clone()),
        (
            "translated".to_string(),
            translated(part, vec2(500_000.0, 4_000_000.0)),
        ),
    ];

    if part.is_closed() {
        for i in 1..part.len() {
            result.push((format!("rotated {}", i), rotated(part, i)));
        }
    }

    result
}

/// Consecutive arcs of one circle splitting `sweep_degrees` (signed, counter clockwise positive)
/// from `start_degrees` into `pieces` equal arcs.
pub fn arc_run(
    center: Vector2,
    radius: f64,
    start_degrees: f64,
    sweep_degrees: f64,
    pieces: usize,
) -> Vec<Segment> {
    let orientation = if sweep_degrees < 0.0 {
        ArcOrientation::Clockwise
    } else {
        ArcOrientation::CounterClockwise
    };
    let point = |deg: f64| {
        let (s, c) = deg.to_radians().sin_cos();
        vec2(center.x + radius * c, center.y + radius * s)
    };

    let step = sweep_degrees / pieces as f64;
    (0..pieces)
        .map(|i| {
            let a0 = start_degrees + step * i as f64;
            Segment::Arc(Arc::from_center(
                point(a0),
                point(a0 + step),
                center,
                orientation,
            ))
        })
        .collect()
}

/// Every vertex of `reduced` must be one of the vertexes of `original` (merges only remove).
pub fn vertexes_are_subset(original: &Part, reduced: &Part, eps: f64) -> bool {
    let original = original.vertexes();
    reduced
        .vertexes()
        .iter()
        .all(|v| original.iter().any(|o| o.fuzzy_eq_eps(*v, eps)))
}
