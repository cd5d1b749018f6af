use std::f64::consts::PI;
use survey_contours::{
    assert_fuzzy_eq,
    cogo::{parse_direction, Course},
    core::{math::vec2, traits::FuzzyEq},
    error::TraverseError,
    traverse::{adjust, adjust_to, RATIO_CEILING},
};

#[test]
fn rectangle_with_long_first_course() {
    let courses = [
        Course::line(90.0, 1000.1),
        Course::line(0.0, 500.0),
        Course::line(270.0, 1000.0),
        Course::line(180.0, 500.0),
    ];
    let result = adjust(&courses, vec2(0.0, 0.0)).unwrap();

    assert_fuzzy_eq!(result.misclose_distance(), 0.1, 1e-6);
    assert_fuzzy_eq!(result.misclose_direction(), 90.0, 1e-6);
    assert_fuzzy_eq!(result.total_length, 3000.1);
    assert!((result.ratio - 30_001.0).abs() < 1e-3);
    assert_eq!(result.ratio_text(), "1:30001");
    assert!((result.area - 500_000.0).abs() / 500_000.0 < 1e-4);

    // compass rule: each vertex moves back by its share of the total length
    let first = result.adjusted_vertexes[1];
    let share = 1000.1 / 3000.1;
    assert!(first.fuzzy_eq_eps(vec2(1000.1 - 0.1 * share, 0.0), 1e-9));
    assert_eq!(result.raw_vertexes.len(), 5);
    assert!(result.adjusted_vertexes[4].fuzzy_eq_eps(vec2(0.0, 0.0), 1e-9));
}

#[test]
fn courses_from_bearing_text() {
    let bearings = ["N90-00-00E", "N00-00-00E", "S90-00-00W", "S00-00-00W"];
    let courses: Vec<Course> = bearings
        .iter()
        .map(|b| Course::line(parse_direction(b).unwrap(), 200.0))
        .collect();
    let result = adjust(&courses, vec2(5000.0, 5000.0)).unwrap();
    assert_eq!(result.ratio, RATIO_CEILING);
    assert!((result.area - 40_000.0).abs() < 1e-6);
}

#[test]
fn half_circle_parcel_area() {
    // 100 x 50 rectangle with a half circle of radius 25 off its east side
    let courses = [
        Course::line(90.0, 100.0),
        Course::arc(0.0, 50.0, -25.0, 25.0 * PI, false),
        Course::line(270.0, 100.0),
        Course::line(180.0, 50.0),
    ];
    let result = adjust(&courses, vec2(0.0, 0.0)).unwrap();
    assert!(result.misclose_distance() < 1e-9);
    let expected = 5000.0 + 0.5 * PI * 25.0 * 25.0;
    assert_fuzzy_eq!(result.area, expected, 1e-6);

    // the same arc curving clockwise cuts into the rectangle
    let mut inward = courses;
    inward[1].radius = Some(25.0);
    let result = adjust(&inward, vec2(0.0, 0.0)).unwrap();
    let expected = 5000.0 - 0.5 * PI * 25.0 * 25.0;
    assert_fuzzy_eq!(result.area, expected, 1e-6);
}

#[test]
fn reversed_course_travels_backward() {
    // the west side is stored in the opposite direction
    let courses = [
        Course::line(90.0, 100.0),
        Course::line(0.0, 100.0),
        Course::line(90.0, 100.0).with_reversed(true),
        Course::line(180.0, 100.0),
    ];
    let result = adjust(&courses, vec2(0.0, 0.0)).unwrap();
    assert!(result.misclose_distance() < 1e-9);
    assert!(result.raw_vertexes[3].fuzzy_eq_eps(vec2(0.0, 100.0), 1e-9));
    assert!((result.area - 10_000.0).abs() < 1e-6);
}

#[test]
fn clockwise_loop_area_is_positive() {
    let courses = [
        Course::line(0.0, 100.0),
        Course::line(90.0, 100.0),
        Course::line(180.0, 100.0),
        Course::line(270.0, 100.0),
    ];
    let result = adjust(&courses, vec2(0.0, 0.0)).unwrap();
    assert!((result.area - 10_000.0).abs() < 1e-6);
}

#[test]
fn open_traverse_between_control_points() {
    let courses = [
        Course::line(45.0, 100.0),
        Course::line(135.0, 100.0),
    ];
    let start = vec2(1000.0, 1000.0);
    let end = vec2(1000.0 + 200.0 * 0.5_f64.sqrt(), 1000.05);
    let result = adjust_to(&courses, start, end).unwrap();

    assert_fuzzy_eq!(result.misclose, vec2(0.0, -0.05), 1e-9);
    assert!((result.misclose_direction() - 180.0).abs() < 1e-6);
    assert!(result.adjusted_vertexes[0].fuzzy_eq(start));
    assert!(result.adjusted_vertexes[2].fuzzy_eq_eps(end, 1e-9));
    // halfway along the half the misclose is removed
    let mid = result.raw_vertexes[1] + vec2(0.0, 0.025);
    assert!(result.adjusted_vertexes[1].fuzzy_eq_eps(mid, 1e-9));
    assert!((result.ratio - 4000.0).abs() < 1e-6);
}

#[test]
fn degenerate_inputs() {
    assert_eq!(adjust(&[], vec2(0.0, 0.0)), Err(TraverseError::NoCourses));
    let courses = [Course::line(0.0, 0.0), Course::line(90.0, 0.0)];
    assert_eq!(
        adjust(&courses, vec2(0.0, 0.0)),
        Err(TraverseError::ZeroLength)
    );
}
