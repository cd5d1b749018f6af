use std::f64::consts::PI;
use survey_contours::{
    cogo::*,
    core::{math::vec2, ToleranceContext},
    error::CogoError,
    segment::{Arc, ArcOrientation, Part, Segment},
    traverse::adjust,
};

/// US survey foot dataset with a combined scale factor and a small rotation.
fn state_plane_frame() -> CogoFrame {
    CogoFrame::projected(0.3048)
        .unwrap()
        .with_scale_factor(0.9996)
        .unwrap()
        .with_direction_offset(-1.25)
}

fn state_plane_tolerance() -> ToleranceContext {
    ToleranceContext::new(0.001 / 0.3048, 0.3048).unwrap()
}

fn planar_cases() -> [(CogoFrame, ToleranceContext); 2] {
    [
        (CogoFrame::default(), ToleranceContext::default()),
        (state_plane_frame(), state_plane_tolerance()),
    ]
}

#[test]
fn line_round_trip() {
    for (frame, tol) in planar_cases() {
        for end in [vec2(130.0, 240.0), vec2(-75.5, 12.25), vec2(0.0, -1000.0)] {
            let existing = Segment::line(vec2(100.0, 200.0), vec2(100.0, 200.0) + end);
            let attrs = derive_cogo(&[existing], &frame, &tol);
            assert!(attrs.radius.is_none() && attrs.arc_length.is_none());

            let rebuilt = rebuild_segment(&attrs.classify(), &existing, &frame, &tol).unwrap();
            assert!(rebuilt.events.is_empty(), "{:?}", rebuilt.events);
            assert!(rebuilt.segment.end().fuzzy_eq_eps(existing.end(), 1e-9));

            let again = derive_cogo(&[rebuilt.segment], &frame, &tol);
            assert!((again.distance.unwrap() - attrs.distance.unwrap()).abs() < 1e-9);
            assert!((again.direction.unwrap() - attrs.direction.unwrap()).abs() < 1e-9);
        }
    }
}

#[test]
fn arc_round_trip_all_orientations() {
    let a = vec2(1000.0, 2000.0);
    let b = vec2(1060.0, 2030.0);
    for (frame, tol) in planar_cases() {
        for orientation in [ArcOrientation::Clockwise, ArcOrientation::CounterClockwise] {
            for is_major in [false, true] {
                let arc = Arc::from_chord(a, b, 40.0, orientation, is_major, 1e-9).unwrap();
                let existing = Segment::Arc(arc);
                let attrs = derive_cogo(&[existing], &frame, &tol);
                let radius = attrs.radius.unwrap();
                assert_eq!(radius < 0.0, orientation == ArcOrientation::CounterClockwise);
                let expected_radius = 40.0 * frame.planar_meters_per_unit() / frame.scale_factor();
                assert!((radius.abs() - expected_radius).abs() < 1e-9);

                let rebuilt = rebuild_segment(&attrs.classify(), &existing, &frame, &tol).unwrap();
                assert!(rebuilt.events.is_empty(), "{:?}", rebuilt.events);
                let new_arc = rebuilt.segment.as_arc().unwrap();
                assert!(new_arc.center.fuzzy_eq_eps(arc.center, 1e-6));
                assert_eq!(new_arc.orientation, orientation);
                assert_eq!(new_arc.is_major(), is_major);
                assert!(new_arc.start.fuzzy_eq(a) && new_arc.end.fuzzy_eq(b));
            }
        }
    }
}

#[test]
fn geodetic_line_round_trip() {
    let tol = ToleranceContext::geographic();
    let frame = CogoFrame::geographic(Ellipsoid::WGS84);
    let existing = Segment::line(vec2(-122.0, 47.0), vec2(-121.99, 47.005));
    let attrs = derive_cogo(&[existing], &frame, &tol);
    // roughly 760 m east and 555 m north
    let distance = attrs.distance.unwrap();
    assert!(distance > 900.0 && distance < 960.0, "{}", distance);

    let rebuilt = rebuild_segment(&attrs.classify(), &existing, &frame, &tol).unwrap();
    assert!(!rebuilt.is_disjoint(), "{:?}", rebuilt.events);
    assert!(rebuilt.segment.end().fuzzy_eq_eps(existing.end(), 1e-9));
}

#[test]
fn grid_azimuth_geographic_is_planar() {
    let tol = ToleranceContext::geographic();
    let frame = CogoFrame::geographic(Ellipsoid::WGS84).with_grid_azimuth(true);
    let existing = Segment::line(vec2(10.0, 50.0), vec2(10.001, 50.001));
    let attrs = derive_cogo(&[existing], &frame, &tol);
    // planar trigonometry in degrees ignores meridian convergence
    assert!((attrs.direction.unwrap() - 45.0).abs() < 1e-6);
}

#[test]
fn geographic_arc_round_trip() {
    let tol = ToleranceContext::geographic();
    let frame = CogoFrame::geographic(Ellipsoid::WGS84);
    let a = vec2(-122.0, 47.0);
    let b = vec2(-121.9995, 47.0003);
    let arc = Arc::from_chord(a, b, 0.0004, ArcOrientation::CounterClockwise, false, 1e-12).unwrap();
    let existing = Segment::Arc(arc);

    let attrs = derive_cogo(&[existing], &frame, &tol);
    assert!(attrs.radius.unwrap() < 0.0);
    let rebuilt = rebuild_segment(&attrs.classify(), &existing, &frame, &tol).unwrap();
    assert!(rebuilt.events.is_empty(), "{:?}", rebuilt.events);
    assert!(rebuilt.segment.start().fuzzy_eq(a));
    assert!(rebuilt.segment.end().fuzzy_eq(b));

    let again = derive_cogo(&[rebuilt.segment], &frame, &tol);
    assert!((again.radius.unwrap() - attrs.radius.unwrap()).abs() < 1e-3);
    assert!((again.arc_length.unwrap() - attrs.arc_length.unwrap()).abs() < 1e-3);
    assert!((again.direction.unwrap() - attrs.direction.unwrap()).abs() < 1e-7);
}

#[test]
fn edited_distance_moves_the_end() {
    let tol = ToleranceContext::default();
    let frame = CogoFrame::default();
    let existing = Segment::line(vec2(0.0, 0.0), vec2(0.0, 100.0));
    let mut attrs = derive_cogo(&[existing], &frame, &tol);
    attrs.distance = attrs.distance.map(|d| d + 1.0);

    let rebuilt = rebuild_segment(&attrs.classify(), &existing, &frame, &tol).unwrap();
    assert!(rebuilt.is_disjoint());
    assert!(rebuilt.segment.end().fuzzy_eq_eps(vec2(0.0, 101.0), 1e-9));
    assert!(rebuilt.events.iter().any(|e| match e {
        QualityEvent::LengthChanged { original, rebuilt } => {
            (original - 100.0).abs() < 1e-9 && (rebuilt - 101.0).abs() < 1e-9
        }
        _ => false,
    }));
}

#[test]
fn arc_length_only_over_existing_line() {
    let tol = ToleranceContext::default();
    let frame = CogoFrame::default();
    let existing = Segment::line(vec2(0.0, 0.0), vec2(20.0, 0.0));
    let attrs = CogoAttributes {
        arc_length: Some(10.0 * PI),
        ..Default::default()
    };

    let rebuilt = rebuild_segment(&attrs.classify(), &existing, &frame, &tol).unwrap();
    let arc = rebuilt.segment.as_arc().unwrap();
    assert_eq!(arc.orientation, ArcOrientation::Clockwise);
    assert!(arc.center.fuzzy_eq_eps(vec2(10.0, 0.0), 1e-6));
    assert!(!rebuilt.is_disjoint());

    let too_short = CogoAttributes {
        arc_length: Some(19.0),
        ..Default::default()
    };
    assert!(matches!(
        rebuild_segment(&too_short.classify(), &existing, &frame, &tol),
        Err(CogoError::ArcLengthTooShort { .. })
    ));
}

#[test]
fn tiny_chord_cannot_hold_an_arc() {
    let tol = ToleranceContext::default();
    let existing = Segment::line(vec2(0.0, 0.0), vec2(0.001, 0.0));
    let state = CogoAttributes::arc(90.0, 5.0, 0.0011).classify();
    assert!(matches!(
        rebuild_segment(&state, &existing, &CogoFrame::default(), &tol),
        Err(CogoError::ChordTooShort(_))
    ));
}

#[test]
fn course_state_table() {
    let d = Some(45.0);
    let l = Some(10.0);
    let r = Some(-20.0);
    let a = Some(12.0);
    let attrs = |direction, distance, radius, arc_length| CogoAttributes {
        direction,
        distance,
        radius,
        arc_length,
    };

    let cases = [
        (attrs(d, l, None, None), CourseState::Line { direction: 45.0, distance: 10.0 }),
        (
            attrs(None, l, None, None),
            CourseState::PartialLine(PartialLine::DistanceOnly(10.0)),
        ),
        (
            attrs(d, None, None, None),
            CourseState::PartialLine(PartialLine::DirectionOnly(45.0)),
        ),
        (
            attrs(d, None, r, a),
            CourseState::CircularArc { radius: -20.0, arc_length: 12.0 },
        ),
        (
            attrs(None, None, r, a),
            CourseState::CircularArc { radius: -20.0, arc_length: 12.0 },
        ),
        (
            attrs(None, None, None, a),
            CourseState::PartialArc(PartialArc::ArcLengthOnly(12.0)),
        ),
        (
            attrs(d, None, r, None),
            CourseState::PartialArc(PartialArc::RadiusOnly(-20.0)),
        ),
        (attrs(d, l, r, None), CourseState::Conflicting),
        (attrs(None, l, None, a), CourseState::Conflicting),
        (attrs(d, l, r, a), CourseState::Conflicting),
        (attrs(None, None, None, None), CourseState::Empty),
    ];

    for (attrs, expected) in cases {
        assert_eq!(attrs.classify(), expected, "attributes: {:?}", attrs);
    }
}

#[test]
fn direction_text_round_trip() {
    for az in [0.0, 12.345, 89.999, 90.0, 135.5, 180.0, 225.75, 270.0, 359.5] {
        for format in [
            DirectionFormat::DecimalDegrees,
            DirectionFormat::DegreesMinutesSeconds,
            DirectionFormat::QuadrantBearing,
        ] {
            let text = format_direction(az, format);
            let parsed = parse_direction(&text).unwrap();
            // hundredths of a second
            assert!((parsed - az).abs() < 0.01 / 3600.0, "{} -> {} -> {}", az, text, parsed);
        }
    }

    assert!(matches!(
        parse_direction("north"),
        Err(CogoError::DirectionParse(_))
    ));
    assert!(parse_direction("").is_err());
    assert!(parse_direction("12-75-00").is_err());
}

/// 100 x 100 parcel whose east side is a half circle bulging outward.
fn parcel() -> Part {
    Part::from_segments(
        vec![
            Segment::line(vec2(0.0, 0.0), vec2(100.0, 0.0)),
            Segment::Arc(Arc::from_center(
                vec2(100.0, 0.0),
                vec2(100.0, 100.0),
                vec2(100.0, 50.0),
                ArcOrientation::CounterClockwise,
            )),
            Segment::line(vec2(100.0, 100.0), vec2(0.0, 100.0)),
            Segment::line(vec2(0.0, 100.0), vec2(0.0, 0.0)),
        ],
        true,
    )
}

#[test]
fn derived_courses_close_the_parcel() {
    let tol = ToleranceContext::default();
    let frame = CogoFrame::default();
    let part = parcel();
    let courses = part
        .iter()
        .map(|seg| Course::from_attributes(&derive_cogo(&[*seg], &frame, &tol), false))
        .collect::<Result<Vec<_>, _>>()
        .unwrap();

    assert!(courses[1].is_arc());
    assert!((courses[1].distance - 100.0).abs() < 1e-9);

    let result = adjust(&courses, vec2(0.0, 0.0)).unwrap();
    assert!(result.misclose_distance() < 1e-9);
    assert!((result.area - part.area()).abs() < 1e-6);
    assert!((result.area - (10_000.0 + 1250.0 * PI)).abs() < 1e-6);
}
