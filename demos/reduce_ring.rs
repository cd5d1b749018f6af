use survey_contours::{
    core::{math::vec2, ToleranceContext},
    line_ring,
    reduce::reduce_geometry,
    segment::{Arc, ArcOrientation, Part, Segment},
    tangency::{classify_pair, PairClass},
};

fn main() {
    env_logger::init();
    classify_pairs();
    reduce_digitized_lot();
}

fn classify_pairs() {
    println!("Classifying segment pairs...");
    let tol = ToleranceContext::default();

    // Digitizing noise along a straight boundary
    let a = Segment::line(vec2(0.0, 0.0), vec2(50.0, 0.0004));
    let b = Segment::line(vec2(50.0, 0.0004), vec2(100.0, 0.0));
    let result = classify_pair(&a, &b, &tol, 100.0);
    assert_eq!(result, PairClass::Tangent);
    println!("noisy straight boundary: {:?}", result);

    // A lot corner
    let c = Segment::line(vec2(100.0, 0.0), vec2(100.0, 50.0));
    let result = classify_pair(&b, &c, &tol, 150.0);
    assert_eq!(result, PairClass::Bend);
    println!("lot corner: {:?}", result);
}

fn reduce_digitized_lot() {
    println!("Reducing a digitized lot...");
    let tol = ToleranceContext::default();

    let mut lot = line_ring![
        (0.0, 0.0),
        (40.0, 0.0003),
        (80.0, -0.0002),
        (120.0, 0.0),
        (120.0, 60.0),
        (60.0, 60.0004),
        (0.0, 60.0)
    ];

    // Cul-de-sac frontage digitized as three arcs of one circle
    let center = vec2(60.0, 100.0);
    let ccw = ArcOrientation::CounterClockwise;
    let mut frontage = Part::new_open();
    frontage.add(Segment::Arc(Arc::from_center(
        vec2(40.0, 100.0),
        vec2(60.0, 80.0),
        center,
        ccw,
    )));
    frontage.add(Segment::Arc(Arc::from_center(
        vec2(60.0, 80.0),
        vec2(80.0, 100.0),
        center,
        ccw,
    )));
    frontage.add(Segment::Arc(Arc::from_center(
        vec2(80.0, 100.0),
        vec2(60.0, 120.0),
        center,
        ccw,
    )));

    let before = (lot.len(), frontage.len());
    let area = lot.area();
    let mut parts = vec![lot.clone(), frontage];
    let result = reduce_geometry(&mut parts, &tol);
    assert!(result.rejected.is_none());
    println!(
        "lot: {} -> {} segments, frontage: {} -> {} segments, {} removed",
        before.0,
        parts[0].len(),
        before.1,
        parts[1].len(),
        result.removed_count()
    );
    println!("lot area before {:.4}, after {:.4}", area, parts[0].area());

    lot = parts.swap_remove(0);
    for (i, seg) in lot.iter().enumerate() {
        println!("  side {}: {:?} -> {:?}", i, seg.start(), seg.end());
    }
}
