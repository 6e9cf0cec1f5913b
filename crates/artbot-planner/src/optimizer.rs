//! Print-order optimizer
//!
//! Orders the dispense locations of one color so the pipette does not zig-zag
//! across the canvas. Uses a greedy nearest-neighbor walk: starting from the
//! first point, always move to the closest point not yet visited. The result
//! is an open path; no return edge to the start is considered.

use crate::error::{PlannerError, PlannerResult};
use artbot_core::PlateCoordinate;

/// Print-order optimization strategies
#[derive(Debug)]
pub struct PrintOrderOptimizer;

impl PrintOrderOptimizer {
    /// Index of the candidate closest to `from`.
    ///
    /// Ties go to the candidate encountered first. Returns `None` only for an
    /// empty candidate list.
    pub fn nearest(from: &PlateCoordinate, candidates: &[PlateCoordinate]) -> Option<usize> {
        let (first, rest) = candidates.split_first()?;
        let mut best = 0;
        let mut best_dist = from.distance_to(first);

        for (i, candidate) in rest.iter().enumerate() {
            let dist = from.distance_to(candidate);
            if dist < best_dist {
                best = i + 1;
                best_dist = dist;
            }
        }

        Some(best)
    }

    /// Order `points` by repeated nearest-neighbor selection.
    ///
    /// The output is a permutation of the input that starts with `points[0]`.
    /// Fails with [`PlannerError::EmptyPointSet`] when there is nothing to seed
    /// the walk with.
    pub fn order(points: &[PlateCoordinate]) -> PlannerResult<Vec<PlateCoordinate>> {
        let (&first, rest) = points.split_first().ok_or(PlannerError::EmptyPointSet)?;

        let mut ordered = Vec::with_capacity(points.len());
        ordered.push(first);

        // Removal keeps the remaining points in input order so ties stay stable
        let mut remaining = rest.to_vec();
        let mut current = first;
        while let Some(index) = Self::nearest(&current, &remaining) {
            current = remaining.remove(index);
            ordered.push(current);
        }

        Ok(ordered)
    }

    /// Total travel along an open path
    pub fn path_length(path: &[PlateCoordinate]) -> f64 {
        path.windows(2).map(|w| w[0].distance_to(&w[1])).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(x: f64, y: f64) -> PlateCoordinate {
        PlateCoordinate::new(x, y)
    }

    #[test]
    fn test_empty_input_fails() {
        assert!(matches!(
            PrintOrderOptimizer::order(&[]),
            Err(PlannerError::EmptyPointSet)
        ));
    }

    #[test]
    fn test_single_point() {
        let ordered = PrintOrderOptimizer::order(&[pt(0.3, -0.2)]).unwrap();
        assert_eq!(ordered, vec![pt(0.3, -0.2)]);
    }

    #[test]
    fn test_walks_to_nearest() {
        let points = [pt(0.0, 0.0), pt(5.0, 0.0), pt(1.0, 0.0), pt(2.0, 0.0)];
        let ordered = PrintOrderOptimizer::order(&points).unwrap();
        assert_eq!(
            ordered,
            vec![pt(0.0, 0.0), pt(1.0, 0.0), pt(2.0, 0.0), pt(5.0, 0.0)]
        );
    }

    #[test]
    fn test_first_point_is_kept_as_start() {
        let points = [pt(5.0, 0.0), pt(0.0, 0.0), pt(4.0, 0.0)];
        let ordered = PrintOrderOptimizer::order(&points).unwrap();
        assert_eq!(ordered[0], pt(5.0, 0.0));
        assert_eq!(ordered[1], pt(4.0, 0.0));
    }

    #[test]
    fn test_tie_goes_to_first_encountered() {
        let points = [pt(0.0, 0.0), pt(-1.0, 0.0), pt(1.0, 0.0)];
        let ordered = PrintOrderOptimizer::order(&points).unwrap();
        assert_eq!(ordered[1], pt(-1.0, 0.0));

        let points = [pt(0.0, 0.0), pt(1.0, 0.0), pt(-1.0, 0.0)];
        let ordered = PrintOrderOptimizer::order(&points).unwrap();
        assert_eq!(ordered[1], pt(1.0, 0.0));
    }

    #[test]
    fn test_duplicates_are_all_visited() {
        let points = [pt(0.0, 0.0), pt(1.0, 1.0), pt(0.0, 0.0)];
        let ordered = PrintOrderOptimizer::order(&points).unwrap();
        assert_eq!(ordered, vec![pt(0.0, 0.0), pt(0.0, 0.0), pt(1.0, 1.0)]);
    }

    #[test]
    fn test_nearest_on_empty() {
        assert_eq!(PrintOrderOptimizer::nearest(&pt(0.0, 0.0), &[]), None);
    }

    #[test]
    fn test_path_length() {
        let path = [pt(0.0, 0.0), pt(3.0, 4.0), pt(3.0, 0.0)];
        assert_eq!(PrintOrderOptimizer::path_length(&path), 9.0);
        assert_eq!(PrintOrderOptimizer::path_length(&path[..1]), 0.0);
    }
}
