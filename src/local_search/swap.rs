//! Inter-route single-stop exchange.
//!
//! # Algorithm
//!
//! For each pair of routes (r1 < r2) and each pair of stops `a ∈ r1`,
//! `b ∈ r2`, exchange their positions. The move is accepted when both routes
//! keep every prefix load within capacity and the total distance drops:
//!
//! ```text
//! delta = [d(p1, b) + d(b, n1) - d(p1, a) - d(a, n1)]
//!       + [d(p2, a) + d(a, n2) - d(p2, b) - d(b, n2)]
//! ```
//!
//! # Complexity
//!
//! O(n²) per scan.

use super::{at_or_depot, before, Deadline, MoveOutcome};
use crate::distance::DistanceModel;
use crate::evaluation::{CapacityTracker, EPSILON};
use crate::models::{DemandModel, Route};

/// Finds and applies the first improving exchange of two stops on
/// different routes.
pub fn swap<P>(
    problem: &P,
    routes: &mut [Route],
    trackers: &mut [CapacityTracker],
    deadline: &Deadline,
) -> MoveOutcome
where
    P: DistanceModel + DemandModel + ?Sized,
{
    for r1 in 0..routes.len() {
        for i in 0..routes[r1].len() {
            if deadline.expired() {
                return MoveOutcome::Expired;
            }
            let route1 = &routes[r1];
            let a = route1.stops()[i];
            let (p1, n1) = (before(route1, i), at_or_depot(route1, i + 1));
            let demand_a = i64::from(problem.demand(a));

            for r2 in r1 + 1..routes.len() {
                let route2 = &routes[r2];
                for j in 0..route2.len() {
                    let b = route2.stops()[j];
                    let demand_b = i64::from(problem.demand(b));
                    if !trackers[r1].can_replace(i, 1, demand_b) || !trackers[r2].can_replace(j, 1, demand_a) {
                        continue;
                    }

                    let (p2, n2) = (before(route2, j), at_or_depot(route2, j + 1));
                    let delta = problem.cost(p1, b) + problem.cost(b, n1) - problem.cost(p1, a) - problem.cost(a, n1)
                        + problem.cost(p2, a)
                        + problem.cost(a, n2)
                        - problem.cost(p2, b)
                        - problem.cost(b, n2);

                    if delta < -EPSILON {
                        routes[r1].stops_mut()[i] = b;
                        routes[r2].stops_mut()[j] = a;
                        for (r, pos) in [(r1, i), (r2, j)] {
                            routes[r].refresh(problem, problem);
                            trackers[r].sync(routes[r].stops(), problem, pos);
                        }
                        return MoveOutcome::Applied(delta);
                    }
                }
            }
        }
    }

    MoveOutcome::Exhausted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local_search::fixtures::{points_instance, routes};

    // Two clusters, left (1, 2) and right (3, 4), each route serving one
    // stop of each.
    fn crossed(capacities: &[i32], demands: &[i32]) -> crate::models::ProblemInstance {
        points_instance(
            &[(0.0, 0.0), (-10.0, 1.0), (-10.0, -1.0), (10.0, 1.0), (10.0, -1.0)],
            demands,
            capacities,
        )
    }

    #[test]
    fn test_swap_untangles_clusters() {
        let inst = crossed(&[10, 10], &[0, 5, 5, 5, 5]);
        let (mut rs, mut ts) = routes(&inst, &[vec![1, 3], vec![2, 4]]);
        let initial: f64 = rs.iter().map(Route::distance).sum();

        let outcome = swap(&inst, &mut rs, &mut ts, &Deadline::never());
        let MoveOutcome::Applied(delta) = outcome else {
            panic!("expected a move, got {outcome:?}");
        };

        let after: f64 = rs.iter().map(Route::distance).sum();
        assert!((after - (initial + delta)).abs() < 1e-9);
        assert!(after < initial);
        for (route, tracker) in rs.iter().zip(&ts) {
            assert_eq!(route.load(), 10);
            assert_eq!(*tracker, CapacityTracker::for_route(route, &inst));
        }
    }

    #[test]
    fn test_swap_respects_capacity() {
        // Both untangling swaps would put a demand-9 stop on the first
        // route, which only has room for 10.
        let demands = [0, 2, 9, 2, 9];
        let inst = crossed(&[10, 20], &demands);
        let (mut rs, mut ts) = routes(&inst, &[vec![1, 3], vec![2, 4]]);
        assert_eq!(swap(&inst, &mut rs, &mut ts, &Deadline::never()), MoveOutcome::Exhausted);
        assert_eq!(rs[0].stops(), &[1, 3]);

        let inst = crossed(&[20, 20], &demands);
        let (mut rs, mut ts) = routes(&inst, &[vec![1, 3], vec![2, 4]]);
        let outcome = swap(&inst, &mut rs, &mut ts, &Deadline::never());
        assert!(matches!(outcome, MoveOutcome::Applied(_)));
        assert_eq!(rs[0].stops(), &[4, 3]);
        assert_eq!(rs[1].stops(), &[2, 1]);
    }

    #[test]
    fn test_swap_needs_two_routes() {
        let inst = crossed(&[100], &[0, 1, 1, 1, 1]);
        let (mut rs, mut ts) = routes(&inst, &[vec![1, 3, 2, 4]]);
        assert_eq!(swap(&inst, &mut rs, &mut ts, &Deadline::never()), MoveOutcome::Exhausted);
    }
}
