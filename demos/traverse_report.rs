use survey_contours::{
    cogo::{derive_cogo, format_direction, parse_direction, CogoFrame, Course, DirectionFormat},
    core::{math::vec2, ToleranceContext},
    segment::{Arc, ArcOrientation, Segment},
    traverse::adjust,
};

fn main() {
    env_logger::init();
    field_book_closure();
    parcel_from_geometry();
}

fn print_report(courses: &[Course]) {
    let result = match adjust(courses, vec2(0.0, 0.0)) {
        Ok(r) => r,
        Err(e) => {
            log::error!("traverse failed: {}", e);
            return;
        }
    };

    for (i, course) in courses.iter().enumerate() {
        let bearing = format_direction(course.travel_direction(), DirectionFormat::QuadrantBearing);
        match course.radius {
            Some(radius) => println!(
                "  {:>2} {} chord {:.3} radius {:.3}",
                i + 1,
                bearing,
                course.distance,
                radius
            ),
            None => println!("  {:>2} {} {:.3}", i + 1, bearing, course.distance),
        }
    }

    println!(
        "misclose {:.4} toward {}, precision {}",
        result.misclose_distance(),
        format_direction(result.misclose_direction(), DirectionFormat::DegreesMinutesSeconds),
        result.ratio_text()
    );
    println!("adjusted area {:.3}", result.area);
}

fn field_book_closure() {
    println!("Closing a field book traverse...");
    let calls = [
        ("N89-58-40E", 250.02),
        ("N00-01-20W", 180.00),
        ("S89-58-40W", 249.97),
        ("S00-01-20E", 180.04),
    ];

    let courses: Vec<Course> = calls
        .iter()
        .filter_map(|(bearing, distance)| match parse_direction(bearing) {
            Ok(direction) => Some(Course::line(direction, *distance)),
            Err(e) => {
                log::warn!("skipping course: {}", e);
                None
            }
        })
        .collect();
    print_report(&courses);
}

fn parcel_from_geometry() {
    println!("Traversing a parcel derived from geometry...");
    let tol = ToleranceContext::default();
    let frame = CogoFrame::default();
    let boundary = [
        Segment::line(vec2(0.0, 0.0), vec2(100.0, 0.0)),
        Segment::Arc(Arc::from_center(
            vec2(100.0, 0.0),
            vec2(100.0, 60.0),
            vec2(100.0, 30.0),
            ArcOrientation::CounterClockwise,
        )),
        Segment::line(vec2(100.0, 60.0), vec2(0.0, 60.0)),
        Segment::line(vec2(0.0, 60.0), vec2(0.0, 0.0)),
    ];

    let mut courses = Vec::new();
    for seg in boundary.iter() {
        let attrs = derive_cogo(&[*seg], &frame, &tol);
        match Course::from_attributes(&attrs, false) {
            Ok(course) => courses.push(course),
            Err(e) => log::warn!("no course for segment: {}", e),
        }
    }

    print_report(&courses);
}
