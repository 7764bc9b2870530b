//! Sequential cheapest-insertion construction.
//!
//! # Algorithm
//!
//! Vehicles are filled one at a time. Each route starts at the depot and is
//! repeatedly extended with the unassigned stop whose demand fits the
//! vehicle's residual capacity and whose appending yields the smallest
//! marginal increase of the closed route:
//!
//! ```text
//! delta(s) = d(last, s) + d(s, depot) - d(last, depot)
//! ```
//!
//! Ties go to the stop scanned first (the lowest identifier in canonical
//! order). When no candidate fits, the route is closed and the next vehicle
//! starts. Stops that fit no vehicle are reported unassigned.
//!
//! # Complexity
//!
//! O(n²) where n = number of stops.

use tracing::debug;

use super::ConstructionOrder;
use crate::distance::DistanceModel;
use crate::models::{DemandModel, ProblemInstance, Route, Solution};

/// Constructs a solution by sequential cheapest end-insertion.
///
/// # Examples
///
/// ```
/// use u_cvrp::constructive::{cheapest_insertion, ConstructionOrder};
/// use u_cvrp::models::ProblemInstance;
///
/// let rows: Vec<Vec<f64>> = (0..4)
///     .map(|i| (0..4).map(|j| (i as f64 - j as f64).abs()).collect())
///     .collect();
/// let instance = ProblemInstance::from_parts(&[0, 10, 10, 10], &[30], &rows, 0).unwrap();
///
/// let solution = cheapest_insertion(&instance, &ConstructionOrder::canonical(&instance));
/// assert_eq!(solution.num_served(), 3);
/// assert!(solution.is_complete());
/// ```
pub fn cheapest_insertion(instance: &ProblemInstance, order: &ConstructionOrder) -> Solution {
    let depot = instance.depot();
    sequential_greedy(instance, order, |last, stop| {
        instance.cost(last, stop) + instance.cost(stop, depot) - instance.cost(last, depot)
    })
}

/// Fills vehicles one after another, each time appending the feasible stop
/// with the lowest `score(last, stop)`.
pub(crate) fn sequential_greedy<F>(instance: &ProblemInstance, order: &ConstructionOrder, score: F) -> Solution
where
    F: Fn(usize, usize) -> f64,
{
    let depot = instance.depot();
    let vehicles = instance.vehicles();
    let mut assigned = vec![false; instance.num_stops()];
    assigned[depot] = true;
    let mut routes: Vec<Route> = vehicles.iter().map(|v| Route::new(v, depot)).collect();

    for &vi in order.vehicles() {
        let route = &mut routes[vi];

        loop {
            let mut best: Option<(usize, f64)> = None;
            for &stop in order.stops() {
                if assigned[stop] || i64::from(instance.demand(stop)) > route.residual() {
                    continue;
                }
                let delta = score(route.last(), stop);
                if best.is_none_or(|(_, b)| delta < b) {
                    best = Some((stop, delta));
                }
            }

            match best {
                Some((next, _)) => {
                    assigned[next] = true;
                    route.push(next, instance.demand(next), instance);
                }
                None => break,
            }
        }

        route.refresh(instance, instance);
        debug!(
            vehicle = route.vehicle_id(),
            stops = route.len(),
            load = route.load(),
            distance = route.distance(),
            "route closed"
        );
    }

    let mut solution = Solution::new();
    for route in routes {
        solution.add_route(route);
    }
    for stop in instance.customers() {
        if !assigned[stop] {
            solution.add_unassigned(stop);
        }
    }
    solution
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::check_solution;

    fn line(demands: &[i32], capacities: &[i32]) -> ProblemInstance {
        let n = demands.len();
        let rows: Vec<Vec<f64>> = (0..n)
            .map(|i| (0..n).map(|j| (i as f64 - j as f64).abs()).collect())
            .collect();
        ProblemInstance::from_parts(demands, capacities, &rows, 0).expect("valid")
    }

    fn build(inst: &ProblemInstance) -> Solution {
        cheapest_insertion(inst, &ConstructionOrder::canonical(inst))
    }

    #[test]
    fn test_all_on_one_route() {
        let inst = line(&[0, 10, 10, 10], &[100]);
        let sol = build(&inst);
        assert_eq!(sol.num_routes(), 1);
        assert_eq!(sol.num_unassigned(), 0);
        // Line: every extension outward costs 2, inward 0; ties to lowest id.
        assert_eq!(sol.routes()[0].stops(), &[1, 2, 3]);
        assert!((sol.routes()[0].distance() - 6.0).abs() < 1e-10);
    }

    #[test]
    fn test_split_across_vehicles() {
        let inst = line(&[0, 10, 10, 10], &[20, 20]);
        let sol = build(&inst);
        assert_eq!(sol.routes()[0].stops(), &[1, 2]);
        assert_eq!(sol.routes()[1].stops(), &[3]);
        assert!(sol.is_complete());
        assert!(check_solution(&inst, &sol).is_empty());
    }

    #[test]
    fn test_insufficient_fleet_reports_unassigned() {
        let inst = line(&[0, 10, 10, 10], &[15]);
        let sol = build(&inst);
        assert_eq!(sol.routes()[0].stops(), &[1]);
        assert_eq!(sol.unassigned(), &[2, 3]);
        assert!(check_solution(&inst, &sol).is_empty());
    }

    #[test]
    fn test_skips_stop_that_does_not_fit() {
        // Stop 1 is nearest but too heavy for vehicle 0; vehicle 1 takes it.
        let inst = line(&[0, 25, 5, 5], &[10, 30]);
        let sol = build(&inst);
        assert_eq!(sol.routes()[0].stops(), &[2, 3]);
        assert_eq!(sol.routes()[1].stops(), &[1]);
    }

    #[test]
    fn test_empty_vehicles_keep_depot_route() {
        let inst = line(&[0, 5], &[10, 10, 10]);
        let sol = build(&inst);
        assert_eq!(sol.num_routes(), 3);
        assert_eq!(sol.num_used_routes(), 1);
        assert_eq!(sol.routes()[2].sequence(), vec![0, 0]);
        assert_eq!(sol.routes()[2].distance(), 0.0);
    }

    #[test]
    fn test_single_stop_round_trip() {
        let rows = vec![vec![0.0, 7.0], vec![7.0, 0.0]];
        let inst = ProblemInstance::from_parts(&[0, 5], &[30], &rows, 0).expect("valid");
        let sol = build(&inst);
        assert_eq!(sol.routes()[0].sequence(), vec![0, 1, 0]);
        assert!((sol.total_distance() - 14.0).abs() < 1e-10);
    }

    #[test]
    fn test_tie_broken_by_lowest_id() {
        // Stops 1 and 2 are both at distance 3 from the depot and each other.
        let rows = vec![
            vec![0.0, 3.0, 3.0],
            vec![3.0, 0.0, 3.0],
            vec![3.0, 3.0, 0.0],
        ];
        let inst = ProblemInstance::from_parts(&[0, 1, 1], &[5], &rows, 0).expect("valid");
        let sol = build(&inst);
        assert_eq!(sol.routes()[0].stops(), &[1, 2]);
    }
}
