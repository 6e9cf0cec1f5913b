use artbot_core::{Pixel, PlateCoordinate};
use artbot_planner::{CoordinateMapper, PlannerError, PrintOrderOptimizer};
use proptest::prelude::*;

fn sorted(points: &[PlateCoordinate]) -> Vec<PlateCoordinate> {
    let mut points = points.to_vec();
    points.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    points
}

fn mapped(pixels: &[(i64, i64)]) -> Vec<PlateCoordinate> {
    let mapper = CoordinateMapper::default();
    pixels.iter().map(|&p| mapper.map(Pixel::from(p))).collect()
}

#[test]
fn test_three_pixel_scenario() {
    let mapper = CoordinateMapper::default();
    let points = mapped(&[(0, 0), (1, 0), (0, 1)]);

    assert!((points[0].x - -1.5).abs() < 1e-9);
    assert!((points[0].y - 1.0).abs() < 1e-9);

    let ordered = PrintOrderOptimizer::order(&points).unwrap();

    // (0, 1) is one column step (~0.079) away, (1, 0) one row step (0.08)
    assert_eq!(
        ordered,
        vec![
            mapper.map(Pixel::new(0, 0)),
            mapper.map(Pixel::new(0, 1)),
            mapper.map(Pixel::new(1, 0)),
        ]
    );

    let first_step = ordered[0].distance_to(&ordered[1]);
    let skipped = ordered[0].distance_to(&ordered[2]);
    assert!(first_step <= skipped);
}

#[test]
fn test_row_of_pixels_is_walked_in_order() {
    let points = mapped(&[(5, 0), (5, 3), (5, 1), (5, 2)]);
    let ordered = PrintOrderOptimizer::order(&points).unwrap();
    assert_eq!(ordered, mapped(&[(5, 0), (5, 1), (5, 2), (5, 3)]));
}

#[test]
fn test_empty_color_is_an_error() {
    assert!(matches!(
        PrintOrderOptimizer::order(&mapped(&[])),
        Err(PlannerError::EmptyPointSet)
    ));
}

fn pixel_lists() -> impl Strategy<Value = Vec<(i64, i64)>> {
    prop::collection::vec((0i64..26, 0i64..39), 1..60)
}

proptest! {
    #[test]
    fn prop_order_is_a_permutation(pixels in pixel_lists()) {
        let points = mapped(&pixels);
        let ordered = PrintOrderOptimizer::order(&points).unwrap();
        prop_assert_eq!(ordered.len(), points.len());
        prop_assert_eq!(sorted(&ordered), sorted(&points));
        prop_assert_eq!(ordered[0], points[0]);
    }

    #[test]
    fn prop_order_is_deterministic(pixels in pixel_lists()) {
        let points = mapped(&pixels);
        let first = PrintOrderOptimizer::order(&points).unwrap();
        let second = PrintOrderOptimizer::order(&points).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_every_step_is_greedy(pixels in pixel_lists()) {
        let ordered = PrintOrderOptimizer::order(&mapped(&pixels)).unwrap();
        for i in 0..ordered.len().saturating_sub(1) {
            let chosen = ordered[i].distance_to(&ordered[i + 1]);
            for later in &ordered[i + 2..] {
                prop_assert!(chosen <= ordered[i].distance_to(later));
            }
        }
    }

    #[test]
    fn prop_single_point_is_unchanged(row in -100i64..100, column in -100i64..100) {
        let points = mapped(&[(row, column)]);
        prop_assert_eq!(PrintOrderOptimizer::order(&points).unwrap(), points);
    }
}
