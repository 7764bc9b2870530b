//! Or-opt: relocate a chain of consecutive stops.
//!
//! # Algorithm
//!
//! For every segment of 1 to [`MAX_SEGMENT`] consecutive stops, try moving it
//! (keeping its orientation) to every other position of the same route and of
//! every other route. The change in distance is
//!
//! ```text
//! delta = [d(a, first) + d(last, b) - d(a, b)]          -- insertion between a and b
//!       - [d(prev, first) + d(last, next) - d(prev, next)] -- removal gain
//! ```
//!
//! Moves into another route must keep every prefix load of the receiving
//! route within capacity. Moves within a route never change its load.
//!
//! # Complexity
//!
//! O(k · n²) per scan, k = [`MAX_SEGMENT`].
//!
//! # Reference
//!
//! Or, I. (1976). "Traveling Salesman-Type Combinatorial Problems and their
//! Relation to the Logistics of Regional Blood Banking", PhD thesis,
//! Northwestern University.

use super::{at_or_depot, before, Deadline, MoveOutcome, MAX_SEGMENT};
use crate::distance::DistanceModel;
use crate::evaluation::{CapacityTracker, EPSILON};
use crate::models::{DemandModel, Route};

/// Where a segment is moved to.
#[derive(Debug, Clone, Copy)]
enum Target {
    /// Position in the same route after the segment is taken out.
    Within(usize),
    /// Route index and insertion position in that route.
    Across(usize, usize),
}

/// Finds and applies the first improving segment relocation.
///
/// # Examples
///
/// ```
/// use u_cvrp::evaluation::CapacityTracker;
/// use u_cvrp::local_search::{or_opt, Deadline, MoveOutcome};
/// use u_cvrp::models::{ProblemInstance, Route};
///
/// let rows: Vec<Vec<f64>> = (0..4)
///     .map(|i| (0..4).map(|j| (i as f64 - j as f64).abs()).collect())
///     .collect();
/// let instance = ProblemInstance::from_parts(&[0, 1, 1, 1], &[10], &rows, 0).unwrap();
/// let mut routes = vec![Route::with_stops(&instance.vehicles()[0], 0, vec![2, 1, 3], &instance, &instance)];
/// let mut trackers = vec![CapacityTracker::for_route(&routes[0], &instance)];
///
/// let outcome = or_opt(&instance, &mut routes, &mut trackers, &Deadline::never());
/// assert!(matches!(outcome, MoveOutcome::Applied(_)));
/// ```
pub fn or_opt<P>(
    problem: &P,
    routes: &mut [Route],
    trackers: &mut [CapacityTracker],
    deadline: &Deadline,
) -> MoveOutcome
where
    P: DistanceModel + DemandModel + ?Sized,
{
    for r in 0..routes.len() {
        let n = routes[r].len();

        for from in 0..n {
            if deadline.expired() {
                return MoveOutcome::Expired;
            }
            for len in 1..=MAX_SEGMENT.min(n - from) {
                if let Some((target, delta)) = first_improvement(problem, routes, trackers, r, from, len) {
                    relocate(problem, routes, trackers, r, from, len, target);
                    return MoveOutcome::Applied(delta);
                }
            }
        }
    }

    MoveOutcome::Exhausted
}

fn first_improvement<P>(
    problem: &P,
    routes: &[Route],
    trackers: &[CapacityTracker],
    r: usize,
    from: usize,
    len: usize,
) -> Option<(Target, f64)>
where
    P: DistanceModel + DemandModel + ?Sized,
{
    let route = &routes[r];
    let first = route.stops()[from];
    let last = route.stops()[from + len - 1];
    let prev = before(route, from);
    let next = at_or_depot(route, from + len);
    let gain = problem.cost(prev, first) + problem.cost(last, next) - problem.cost(prev, next);
    let insertion = |a: usize, b: usize| problem.cost(a, first) + problem.cost(last, b) - problem.cost(a, b);

    // Same route, indexed on the route with the segment removed.
    let remaining = route.len() - len;
    let reduced = |p: usize| {
        if p == remaining {
            route.depot()
        } else if p < from {
            route.stops()[p]
        } else {
            route.stops()[p + len]
        }
    };
    for to in 0..=remaining {
        if to == from {
            continue;
        }
        let a = if to == 0 { route.depot() } else { reduced(to - 1) };
        let delta = insertion(a, reduced(to)) - gain;
        if delta < -EPSILON {
            return Some((Target::Within(to), delta));
        }
    }

    let load = trackers[r].segment_load(from, len);
    for (r2, other) in routes.iter().enumerate() {
        if r2 == r {
            continue;
        }
        for pos in 0..=other.len() {
            if !trackers[r2].can_insert(pos, load) {
                continue;
            }
            let delta = insertion(before(other, pos), at_or_depot(other, pos)) - gain;
            if delta < -EPSILON {
                return Some((Target::Across(r2, pos), delta));
            }
        }
    }

    None
}

fn relocate<P>(
    problem: &P,
    routes: &mut [Route],
    trackers: &mut [CapacityTracker],
    r: usize,
    from: usize,
    len: usize,
    target: Target,
) where
    P: DistanceModel + DemandModel + ?Sized,
{
    let segment: Vec<usize> = routes[r].stops_mut().drain(from..from + len).collect();

    match target {
        Target::Within(to) => {
            let route = &mut routes[r];
            insert_segment(route.stops_mut(), to, segment);
            route.refresh(problem, problem);
            trackers[r].sync(route.stops(), problem, from.min(to));
        }
        Target::Across(r2, pos) => {
            routes[r].refresh(problem, problem);
            trackers[r].sync(routes[r].stops(), problem, from);

            let other = &mut routes[r2];
            insert_segment(other.stops_mut(), pos, segment);
            other.refresh(problem, problem);
            trackers[r2].sync(other.stops(), problem, pos);
        }
    }
}

fn insert_segment(stops: &mut Vec<usize>, pos: usize, segment: Vec<usize>) {
    let tail = stops.split_off(pos);
    stops.extend(segment);
    stops.extend(tail);
}
