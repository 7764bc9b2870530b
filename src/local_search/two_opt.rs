//! Intra-route 2-opt improvement.
//!
//! # Algorithm
//!
//! For each route and each pair of positions `i < j`, compute the change in
//! distance from reversing the segment `r[i..=j]`:
//!
//! ```text
//! delta = d(prev, r[j]) + d(r[i], next) - d(prev, r[i]) - d(r[j], next)
//!       + (reversed inner arcs - forward inner arcs)
//! ```
//!
//! The inner-arc term vanishes for symmetric costs; for asymmetric costs it
//! is accumulated incrementally as `j` grows, keeping each evaluation O(1).
//! The first move with `delta < 0` is applied (first-improvement strategy).
//!
//! Reversal leaves a route's load unchanged, so no capacity check is needed.
//!
//! # Complexity
//!
//! O(n²) per scan.
//!
//! # Reference
//!
//! Croes, G.A. (1958). "A method for solving traveling salesman problems",
//! *Operations Research* 6(6), 791-812.

use super::{at_or_depot, before, Deadline, MoveOutcome};
use crate::distance::DistanceModel;
use crate::evaluation::{CapacityTracker, EPSILON};
use crate::models::{DemandModel, Route};

/// Finds and applies the first improving segment reversal in any route.
///
/// # Examples
///
/// ```
/// use u_cvrp::evaluation::CapacityTracker;
/// use u_cvrp::local_search::{two_opt, Deadline, MoveOutcome};
/// use u_cvrp::models::{ProblemInstance, Route};
///
/// let rows: Vec<Vec<f64>> = (0..4)
///     .map(|i| (0..4).map(|j| (i as f64 - j as f64).abs()).collect())
///     .collect();
/// let instance = ProblemInstance::from_parts(&[0, 1, 1, 1], &[10], &rows, 0).unwrap();
/// let mut routes = vec![Route::with_stops(&instance.vehicles()[0], 0, vec![3, 1, 2], &instance, &instance)];
/// let mut trackers = vec![CapacityTracker::for_route(&routes[0], &instance)];
///
/// let outcome = two_opt(&instance, &mut routes, &mut trackers, &Deadline::never());
/// assert!(matches!(outcome, MoveOutcome::Applied(_)));
/// assert!(routes[0].distance() < 8.0);
/// ```
pub fn two_opt<P>(
    problem: &P,
    routes: &mut [Route],
    trackers: &mut [CapacityTracker],
    deadline: &Deadline,
) -> MoveOutcome
where
    P: DistanceModel + DemandModel + ?Sized,
{
    let symmetric = problem.is_symmetric();

    for r in 0..routes.len() {
        let route = &routes[r];
        let n = route.len();
        if n < 2 {
            continue;
        }

        for i in 0..n - 1 {
            if deadline.expired() {
                return MoveOutcome::Expired;
            }
            let prev = before(route, i);
            let first = route.stops()[i];
            let mut forward = 0.0;
            let mut reversed = 0.0;

            for j in i + 1..n {
                let last = route.stops()[j];
                if !symmetric {
                    let inner = route.stops()[j - 1];
                    forward += problem.cost(inner, last);
                    reversed += problem.cost(last, inner);
                }
                let next = at_or_depot(route, j + 1);
                let delta = problem.cost(prev, last) + problem.cost(first, next)
                    - problem.cost(prev, first)
                    - problem.cost(last, next)
                    + (reversed - forward);

                if delta < -EPSILON {
                    let route = &mut routes[r];
                    route.stops_mut()[i..=j].reverse();
                    route.refresh(problem, problem);
                    trackers[r].sync(route.stops(), problem, i);
                    return MoveOutcome::Applied(delta);
                }
            }
        }
    }

    MoveOutcome::Exhausted
}
