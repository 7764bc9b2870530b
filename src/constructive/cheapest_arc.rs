//! Cheapest-arc (nearest-neighbor) construction.
//!
//! Builds routes greedily: starting from the depot, always extend the route
//! with the unassigned stop reachable by the cheapest arc from the current
//! end, among stops that still fit the vehicle. When nothing fits, close the
//! route and move to the next vehicle.
//!
//! Unlike [`cheapest_insertion`](super::cheapest_insertion) the return arc to
//! the depot is ignored, so routes tend to drift outward.
//!
//! # Complexity
//!
//! O(n²) where n = number of stops.

use super::cheapest_insertion::sequential_greedy;
use super::ConstructionOrder;
use crate::distance::DistanceModel;
use crate::models::{ProblemInstance, Solution};

/// Constructs a solution by always taking the cheapest outgoing arc.
///
/// # Examples
///
/// ```
/// use u_cvrp::constructive::{cheapest_arc, ConstructionOrder};
/// use u_cvrp::models::ProblemInstance;
///
/// let rows = vec![
///     vec![0.0, 10.0, 1.0],
///     vec![10.0, 0.0, 9.0],
///     vec![1.0, 9.0, 0.0],
/// ];
/// let instance = ProblemInstance::from_parts(&[0, 5, 5], &[100], &rows, 0).unwrap();
///
/// let solution = cheapest_arc(&instance, &ConstructionOrder::canonical(&instance));
/// // Stop 2 is nearest to the depot, then stop 1.
/// assert_eq!(solution.routes()[0].stops(), &[2, 1]);
/// ```
pub fn cheapest_arc(instance: &ProblemInstance, order: &ConstructionOrder) -> Solution {
    sequential_greedy(instance, order, |last, stop| instance.cost(last, stop))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arc_ignores_return_leg() {
        // From the depot stop 1 is nearest (1), but it is a dead end far from
        // home; stop 2 costs 2 out and 2 back.
        let rows = vec![
            vec![0.0, 1.0, 2.0],
            vec![9.0, 0.0, 9.0],
            vec![2.0, 9.0, 0.0],
        ];
        let inst = ProblemInstance::from_parts(&[0, 5, 5], &[5, 5], &rows, 0).expect("valid");
        let order = ConstructionOrder::canonical(&inst);

        let arc = cheapest_arc(&inst, &order);
        assert_eq!(arc.routes()[0].stops(), &[1]);

        let insertion = super::super::cheapest_insertion(&inst, &order);
        assert_eq!(insertion.routes()[0].stops(), &[2]);
    }

    #[test]
    fn test_arc_respects_capacity() {
        let rows: Vec<Vec<f64>> = (0..4)
            .map(|i| (0..4).map(|j| (i as f64 - j as f64).abs()).collect())
            .collect();
        let inst = ProblemInstance::from_parts(&[0, 10, 10, 10], &[20, 20], &rows, 0).expect("valid");
        let sol = cheapest_arc(&inst, &ConstructionOrder::canonical(&inst));
        assert_eq!(sol.routes()[0].stops(), &[1, 2]);
        assert_eq!(sol.routes()[1].stops(), &[3]);
        assert!(sol.is_complete());
    }
}
