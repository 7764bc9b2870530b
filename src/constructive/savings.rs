//! Clarke-Wright savings construction for a fixed, heterogeneous fleet.
//!
//! # Algorithm
//!
//! Every stop starts on its own route (depot → stop → depot). Routes are
//! merged by appending route B after route A when A ends at `i`, B starts at
//! `j`, and the ordered saving
//!
//! ```text
//! s(i, j) = d(i, 0) + d(0, j) - d(i, j)
//! ```
//!
//! is positive, largest first, as long as the merged load fits the largest
//! vehicle. Only tail-to-head merges are used, so asymmetric costs are
//! handled without reversing routes.
//!
//! The merged routes are then packed onto the fleet best-fit (heaviest route
//! to the smallest vehicle that carries it). Stops on routes that find no
//! vehicle are re-inserted one by one at their cheapest capacity-feasible
//! position; whatever still does not fit is reported unassigned.
//!
//! # Complexity
//!
//! O(n² log n) where n = number of stops (dominated by sorting savings).
//!
//! # Reference
//!
//! Clarke, G. & Wright, J.W. (1964). "Scheduling of Vehicles from a Central
//! Depot to a Number of Delivery Points", *Operations Research* 12(4), 568-581.

use tracing::debug;

use super::ConstructionOrder;
use crate::distance::DistanceModel;
use crate::evaluation::CapacityTracker;
use crate::models::{DemandModel, ProblemInstance, Route, Solution};

/// A savings value for linking the end of one route to the start of another.
#[derive(Debug)]
struct Saving {
    i: usize,
    j: usize,
    value: f64,
}

/// Constructs a solution using the Clarke-Wright savings algorithm.
///
/// # Examples
///
/// ```
/// use u_cvrp::constructive::{savings, ConstructionOrder};
/// use u_cvrp::models::ProblemInstance;
///
/// let rows: Vec<Vec<f64>> = (0..4)
///     .map(|i| (0..4).map(|j| (i as f64 - j as f64).abs()).collect())
///     .collect();
/// let instance = ProblemInstance::from_parts(&[0, 10, 10, 10], &[30], &rows, 0).unwrap();
///
/// let solution = savings(&instance, &ConstructionOrder::canonical(&instance));
/// assert_eq!(solution.num_served(), 3);
/// ```
pub fn savings(instance: &ProblemInstance, order: &ConstructionOrder) -> Solution {
    let depot = instance.depot();
    let n = instance.num_stops();
    let limit = i64::from(instance.max_capacity());

    // Stops heavier than every vehicle never enter a route.
    let mut oversized = Vec::new();
    let mut members: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut load = vec![0i64; n];
    let mut route_of = vec![usize::MAX; n];
    for &stop in order.stops() {
        if i64::from(instance.demand(stop)) > limit {
            oversized.push(stop);
            continue;
        }
        members[stop].push(stop);
        load[stop] = i64::from(instance.demand(stop));
        route_of[stop] = stop;
    }

    let candidates: Vec<usize> = order
        .stops()
        .iter()
        .copied()
        .filter(|&s| route_of[s] != usize::MAX)
        .collect();
    let mut links = Vec::with_capacity(candidates.len() * candidates.len());
    for &i in &candidates {
        for &j in &candidates {
            if i == j {
                continue;
            }
            let value = instance.cost(i, depot) + instance.cost(depot, j) - instance.cost(i, j);
            if value > 0.0 {
                links.push(Saving { i, j, value });
            }
        }
    }
    // Stable: equal savings keep scanning order.
    links.sort_by(|a, b| b.value.total_cmp(&a.value));

    for saving in &links {
        let ri = route_of[saving.i];
        let rj = route_of[saving.j];
        if ri == rj || load[ri] + load[rj] > limit {
            continue;
        }
        if members[ri].last() != Some(&saving.i) || members[rj].first() != Some(&saving.j) {
            continue;
        }

        let mut tail = std::mem::take(&mut members[rj]);
        for &stop in &tail {
            route_of[stop] = ri;
        }
        members[ri].append(&mut tail);
        load[ri] += load[rj];
        load[rj] = 0;
    }

    let mut merged: Vec<Vec<usize>> = members.into_iter().filter(|m| !m.is_empty()).collect();
    merged.sort_by_key(|m| std::cmp::Reverse(m.iter().map(|&s| i64::from(instance.demand(s))).sum::<i64>()));

    let vehicles = instance.vehicles();
    let mut routes: Vec<Route> = vehicles.iter().map(|v| Route::new(v, depot)).collect();
    let mut used = vec![false; vehicles.len()];
    let mut leftovers = Vec::new();

    for stops in merged {
        let demand: i64 = stops.iter().map(|&s| i64::from(instance.demand(s))).sum();
        let slot = order
            .vehicles()
            .iter()
            .copied()
            .filter(|&vi| !used[vi] && vehicles[vi].fits(demand))
            .min_by_key(|&vi| vehicles[vi].capacity());
        match slot {
            Some(vi) => {
                used[vi] = true;
                routes[vi] = Route::with_stops(&vehicles[vi], depot, stops, instance, instance);
            }
            None => leftovers.extend(stops),
        }
    }

    let mut unassigned = oversized;
    for stop in leftovers {
        if !insert_cheapest(&mut routes, stop, order, instance) {
            unassigned.push(stop);
        }
    }
    unassigned.sort_unstable();

    debug!(
        routes = routes.iter().filter(|r| !r.is_empty()).count(),
        unassigned = unassigned.len(),
        "savings construction finished"
    );

    let mut solution = Solution::new();
    for route in routes {
        solution.add_route(route);
    }
    for stop in unassigned {
        solution.add_unassigned(stop);
    }
    solution
}

/// Inserts `stop` at the cheapest capacity-feasible position of any route.
fn insert_cheapest(routes: &mut [Route], stop: usize, order: &ConstructionOrder, instance: &ProblemInstance) -> bool {
    let demand = i64::from(instance.demand(stop));
    let mut best: Option<(usize, usize, f64)> = None;

    for &vi in order.vehicles() {
        let route = &routes[vi];
        let tracker = CapacityTracker::for_route(route, instance);
        let depot = route.depot();
        for pos in 0..=route.len() {
            if !tracker.can_insert(pos, demand) {
                continue;
            }
            let prev = if pos == 0 { depot } else { route.stops()[pos - 1] };
            let next = if pos == route.len() { depot } else { route.stops()[pos] };
            let delta = instance.cost(prev, stop) + instance.cost(stop, next) - instance.cost(prev, next);
            if best.is_none_or(|(_, _, b)| delta < b) {
                best = Some((vi, pos, delta));
            }
        }
    }

    match best {
        Some((vi, pos, _)) => {
            let route = &mut routes[vi];
            route.stops_mut().insert(pos, stop);
            route.refresh(instance, instance);
            true
        }
        None => false,
    }
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
        savings(inst, &ConstructionOrder::canonical(inst))
    }

    #[test]
    fn test_savings_merges_line() {
        let inst = line(&[0, 10, 10, 10], &[30]);
        let sol = build(&inst);
        assert_eq!(sol.num_used_routes(), 1);
        assert!(sol.is_complete());
        assert!((sol.total_distance() - 6.0).abs() < 1e-10);
        assert!(check_solution(&inst, &sol).is_empty());
    }

    #[test]
    fn test_savings_respects_capacity() {
        let inst = line(&[0, 10, 10, 10], &[20, 20]);
        let sol = build(&inst);
        assert!(sol.is_complete());
        for route in sol.routes() {
            assert!(route.load() <= 20);
        }
        assert!(check_solution(&inst, &sol).is_empty());
    }

    #[test]
    fn test_savings_best_fit_packing() {
        // Heavy route goes to the big truck, light one to the small truck.
        let rows = vec![
            vec![0.0, 5.0, 5.0],
            vec![5.0, 0.0, 10.0],
            vec![5.0, 10.0, 0.0],
        ];
        let inst = ProblemInstance::from_parts(&[0, 25, 5], &[30, 10], &rows, 0).expect("valid");
        let sol = build(&inst);
        assert_eq!(sol.routes()[0].stops(), &[1]);
        assert_eq!(sol.routes()[1].stops(), &[2]);
    }

    #[test]
    fn test_savings_reinserts_leftovers() {
        // Three singleton routes but only two vehicles: the third stop must
        // be squeezed into a route with room left.
        let rows = vec![
            vec![0.0, 5.0, 5.0, 5.0],
            vec![5.0, 0.0, 10.0, 10.0],
            vec![5.0, 10.0, 0.0, 10.0],
            vec![5.0, 10.0, 10.0, 0.0],
        ];
        let inst = ProblemInstance::from_parts(&[0, 5, 5, 5], &[10, 10], &rows, 0).expect("valid");
        let sol = build(&inst);
        assert!(sol.is_complete());
        assert!(check_solution(&inst, &sol).is_empty());
    }

    #[test]
    fn test_savings_oversized_stop_unassigned() {
        let inst = line(&[0, 10, 50, 10], &[30, 30]);
        let sol = build(&inst);
        assert_eq!(sol.unassigned(), &[2]);
        assert!(check_solution(&inst, &sol).is_empty());
    }
}
