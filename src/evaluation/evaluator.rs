//! Solution cost evaluation and invariant checking.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::CapacityTracker;
use crate::distance::DistanceModel;
use crate::models::{DemandModel, ProblemInstance, Solution, Violation, ViolationType};

/// Tolerance used when comparing distances.
pub const EPSILON: f64 = 1e-9;

/// Aggregate cost of a solution, ordered lexicographically: fewer
/// unassigned stops first, then shorter total distance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolutionCost {
    /// Number of stops left unassigned.
    pub unassigned: usize,
    /// Sum of all route distances.
    pub distance: f64,
    /// Sum of all route loads.
    pub load: i64,
}

impl SolutionCost {
    /// Compares two costs; distances within [`EPSILON`] are equal.
    pub fn compare(&self, other: &Self) -> Ordering {
        self.unassigned.cmp(&other.unassigned).then_with(|| {
            if (self.distance - other.distance).abs() <= EPSILON {
                Ordering::Equal
            } else if self.distance < other.distance {
                Ordering::Less
            } else {
                Ordering::Greater
            }
        })
    }

    /// Returns `true` if `self` is strictly better than `other`.
    pub fn is_better_than(&self, other: &Self) -> bool {
        self.compare(other) == Ordering::Less
    }
}

/// Computes total distance and load of solutions from the distance and
/// demand models, independent of any cached route metrics.
///
/// # Examples
///
/// ```
/// use u_cvrp::models::{ProblemInstance, Route, Solution};
/// use u_cvrp::evaluation::SolutionEvaluator;
///
/// let instance = ProblemInstance::from_parts(
///     &[0, 4, 6],
///     &[10],
///     &[vec![0.0, 2.0, 3.0], vec![2.0, 0.0, 1.0], vec![3.0, 1.0, 0.0]],
///     0,
/// ).unwrap();
/// let mut sol = Solution::new();
/// sol.add_route(Route::with_stops(&instance.vehicles()[0], 0, vec![1, 2], &instance, &instance));
///
/// let evaluator = SolutionEvaluator::for_instance(&instance);
/// assert_eq!(evaluator.total_distance(&sol), 6.0);
/// assert_eq!(evaluator.total_load(&sol), 10);
/// ```
pub struct SolutionEvaluator<'a, D: ?Sized, M: ?Sized> {
    distances: &'a D,
    demands: &'a M,
}

impl<'a> SolutionEvaluator<'a, ProblemInstance, ProblemInstance> {
    /// Creates an evaluator backed by an instance's own models.
    pub fn for_instance(instance: &'a ProblemInstance) -> Self {
        Self {
            distances: instance,
            demands: instance,
        }
    }
}

impl<'a, D, M> SolutionEvaluator<'a, D, M>
where
    D: DistanceModel + ?Sized,
    M: DemandModel + ?Sized,
{
    /// Creates an evaluator from explicit models.
    pub fn new(distances: &'a D, demands: &'a M) -> Self {
        Self { distances, demands }
    }

    /// Sum of recomputed route distances.
    pub fn total_distance(&self, solution: &Solution) -> f64 {
        solution
            .routes()
            .iter()
            .map(|r| self.distances.path_cost(r.depot(), r.stops()))
            .sum()
    }

    /// Sum of recomputed route loads.
    pub fn total_load(&self, solution: &Solution) -> i64 {
        solution
            .routes()
            .iter()
            .flat_map(|r| r.stops())
            .map(|&s| i64::from(self.demands.demand(s)))
            .sum()
    }

    /// Aggregate cost used to rank solutions.
    pub fn cost(&self, solution: &Solution) -> SolutionCost {
        SolutionCost {
            unassigned: solution.num_unassigned(),
            distance: self.total_distance(solution),
            load: self.total_load(solution),
        }
    }

    /// Orders two solutions by cost.
    pub fn compare(&self, a: &Solution, b: &Solution) -> Ordering {
        self.cost(a).compare(&self.cost(b))
    }
}

/// Checks every solution invariant against its instance.
///
/// Verifies that each non-depot stop is routed or unassigned exactly once,
/// that no route's load exceeds its vehicle's capacity at any prefix, that
/// routes belong to distinct known vehicles, and that cached route metrics
/// match the stop order. An empty result means the solution is consistent.
pub fn check_solution(instance: &ProblemInstance, solution: &Solution) -> Vec<Violation> {
    let n = instance.num_stops();
    let depot = instance.depot();
    let mut violations = Vec::new();
    let mut seen = vec![0usize; n];
    let mut owners = Vec::with_capacity(solution.num_routes());

    if solution.num_routes() > instance.num_vehicles() {
        violations.push(Violation::new(ViolationType::FleetMismatch {
            route_index: instance.num_vehicles(),
        }));
    }

    for (idx, route) in solution.routes().iter().enumerate() {
        let known = instance
            .vehicle(route.vehicle_id())
            .is_some_and(|v| v.capacity() == route.capacity());
        if !known || owners.contains(&route.vehicle_id()) || route.depot() != depot {
            violations.push(Violation::new(ViolationType::FleetMismatch { route_index: idx }));
        }
        owners.push(route.vehicle_id());

        let mut in_range = true;
        for &stop in route.stops() {
            if stop >= n || stop == depot {
                violations.push(Violation::new(ViolationType::UnknownStop { stop }));
                in_range = false;
            } else {
                seen[stop] += 1;
            }
        }
        if !in_range {
            continue;
        }

        let tracker = CapacityTracker::for_route(route, instance);
        if let Some((position, load)) = tracker.first_violation() {
            violations.push(Violation::new(ViolationType::CapacityExceeded {
                route_index: idx,
                position,
                load,
                capacity: route.capacity(),
            }));
        }

        let distance = instance.path_cost(depot, route.stops());
        if tracker.total() != route.load() || (distance - route.distance()).abs() > EPSILON {
            violations.push(Violation::new(ViolationType::StaleMetrics { route_index: idx }));
        }
    }

    for &stop in solution.unassigned() {
        if stop >= n || stop == depot {
            violations.push(Violation::new(ViolationType::UnknownStop { stop }));
        } else {
            seen[stop] += 1;
        }
    }

    for stop in instance.customers() {
        match seen[stop] {
            0 => violations.push(Violation::new(ViolationType::MissingStop { stop })),
            1 => {}
            _ => violations.push(Violation::new(ViolationType::DuplicateStop { stop })),
        }
    }

    violations
}
