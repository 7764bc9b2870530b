//! Solution and violation types.

use serde::{Deserialize, Serialize};

use super::Route;

/// A type of invariant violation found when checking a solution.
#[derive(Debug, Clone, PartialEq)]
pub enum ViolationType {
    /// Cumulative load exceeded the vehicle capacity at some prefix.
    CapacityExceeded {
        /// Route index in the solution.
        route_index: usize,
        /// Position (0-based, excluding depot) where the load first exceeded capacity.
        position: usize,
        /// Load at that position.
        load: i64,
        /// Vehicle capacity.
        capacity: i32,
    },
    /// A stop appears more than once across routes and the unassigned list.
    DuplicateStop {
        /// Stop ID.
        stop: usize,
    },
    /// A non-depot stop is neither routed nor reported unassigned.
    MissingStop {
        /// Stop ID.
        stop: usize,
    },
    /// A route references a stop the instance does not have.
    UnknownStop {
        /// Stop ID.
        stop: usize,
    },
    /// A route's cached load or distance disagrees with its stop order.
    StaleMetrics {
        /// Route index.
        route_index: usize,
    },
    /// More routes than vehicles, or a route owned by an unknown vehicle.
    FleetMismatch {
        /// Route index.
        route_index: usize,
    },
}

/// An invariant violation in a solution.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    /// The type of violation.
    pub kind: ViolationType,
}

impl Violation {
    /// Creates a new violation.
    pub fn new(kind: ViolationType) -> Self {
        Self { kind }
    }
}

/// A complete or partial assignment of stops to vehicle routes.
///
/// Holds at most one route per vehicle plus the stops that could not be
/// assigned (non-empty only when the fleet cannot carry all demand).
///
/// # Examples
///
/// ```
/// use u_cvrp::models::{Route, Solution, Vehicle};
///
/// let mut sol = Solution::new();
/// sol.add_route(Route::new(&Vehicle::new(0, 30), 0));
/// assert_eq!(sol.num_routes(), 1);
/// assert!(sol.is_complete());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    routes: Vec<Route>,
    #[serde(default)]
    unassigned: Vec<usize>,
}

impl Solution {
    /// Creates an empty solution.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a route to this solution.
    pub fn add_route(&mut self, route: Route) {
        self.routes.push(route);
    }

    /// Marks a stop as unassigned.
    pub fn add_unassigned(&mut self, stop: usize) {
        self.unassigned.push(stop);
    }

    /// Returns the routes in this solution.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Returns a mutable reference to the routes.
    pub fn routes_mut(&mut self) -> &mut Vec<Route> {
        &mut self.routes
    }

    /// Returns the number of routes (one per vehicle, possibly empty).
    pub fn num_routes(&self) -> usize {
        self.routes.len()
    }

    /// Number of routes that visit at least one stop.
    pub fn num_used_routes(&self) -> usize {
        self.routes.iter().filter(|r| !r.is_empty()).count()
    }

    /// Returns the IDs of unassigned stops.
    pub fn unassigned(&self) -> &[usize] {
        &self.unassigned
    }

    /// Returns the number of unassigned stops.
    pub fn num_unassigned(&self) -> usize {
        self.unassigned.len()
    }

    /// Returns `true` if every stop is routed.
    pub fn is_complete(&self) -> bool {
        self.unassigned.is_empty()
    }

    /// Total distance across all routes.
    pub fn total_distance(&self) -> f64 {
        self.routes.iter().map(|r| r.distance()).sum()
    }

    /// Total load delivered across all routes.
    pub fn total_load(&self) -> i64 {
        self.routes.iter().map(|r| r.load()).sum()
    }

    /// Total number of stops served (across all routes).
    pub fn num_served(&self) -> usize {
        self.routes.iter().map(|r| r.len()).sum()
    }

    /// Index of the route serving `stop`, if any.
    pub fn route_of(&self, stop: usize) -> Option<usize> {
        self.routes.iter().position(|r| r.stops().contains(&stop))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::DistanceMatrix;
    use crate::models::Vehicle;

    #[test]
    fn test_solution_empty() {
        let sol = Solution::new();
        assert_eq!(sol.num_routes(), 0);
        assert_eq!(sol.num_unassigned(), 0);
        assert_eq!(sol.total_distance(), 0.0);
        assert_eq!(sol.num_served(), 0);
        assert!(sol.is_complete());
    }

    #[test]
    fn test_solution_with_routes() {
        let dm = DistanceMatrix::from_points(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (0.0, 3.0), (0.0, 4.0)]);
        let demands = vec![0, 10, 5, 10, 40];
        let mut sol = Solution::new();
        sol.add_route(Route::with_stops(&Vehicle::new(0, 20), 0, vec![1], &dm, &demands));
        sol.add_route(Route::with_stops(&Vehicle::new(1, 20), 0, vec![2, 3], &dm, &demands));
        sol.add_route(Route::new(&Vehicle::new(2, 20), 0));
        sol.add_unassigned(4);

        assert_eq!(sol.num_routes(), 3);
        assert_eq!(sol.num_used_routes(), 2);
        assert_eq!(sol.num_served(), 3);
        assert_eq!(sol.num_unassigned(), 1);
        assert!(!sol.is_complete());
        assert_eq!(sol.total_load(), 25);
        // 0→1→0 = 2, 0→2→3→0 = 2 + √13 + 3
        let expected = 2.0 + 2.0 + 13f64.sqrt() + 3.0;
        assert!((sol.total_distance() - expected).abs() < 1e-10);
        assert_eq!(sol.route_of(3), Some(1));
        assert_eq!(sol.route_of(4), None);
    }

    #[test]
    fn test_violation_types() {
        let v = Violation::new(ViolationType::CapacityExceeded {
            route_index: 0,
            position: 2,
            load: 35,
            capacity: 30,
        });
        assert!(matches!(v.kind, ViolationType::CapacityExceeded { load: 35, .. }));
    }
}
