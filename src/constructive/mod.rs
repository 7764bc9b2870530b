//! Constructive heuristics for building an initial CVRP solution.
//!
//! - [`cheapest_insertion`] — sequential per-vehicle greedy, appending the stop
//!   with the smallest marginal route-length increase, O(n²)
//! - [`cheapest_arc`] — sequential per-vehicle greedy on the outgoing arc cost
//!   alone (nearest neighbor), O(n²)
//! - [`savings`] — Clarke-Wright savings (1964) packed onto the fixed fleet,
//!   O(n² log n)
//!
//! Every strategy fills routes without exceeding any vehicle's capacity and
//! reports the stops it could not place as unassigned. The returned solution
//! holds one route per vehicle, in vehicle-identifier order.

mod cheapest_arc;
mod cheapest_insertion;
mod savings;

use std::fmt;
use std::str::FromStr;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

pub use cheapest_arc::cheapest_arc;
pub use cheapest_insertion::cheapest_insertion;
pub use savings::savings;

use crate::models::{ProblemInstance, Solution};

/// Construction heuristic used for the first feasible solution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConstructionStrategy {
    /// Append the stop with the smallest marginal increase of the closed route.
    #[default]
    CheapestInsertion,
    /// Append the stop with the cheapest arc from the current route end.
    CheapestArc,
    /// Clarke-Wright savings merged under the largest capacity, then packed.
    Savings,
}

impl ConstructionStrategy {
    /// All strategies, in declaration order.
    pub const ALL: [ConstructionStrategy; 3] = [
        ConstructionStrategy::CheapestInsertion,
        ConstructionStrategy::CheapestArc,
        ConstructionStrategy::Savings,
    ];

    /// Builds a solution with this strategy.
    pub fn build(&self, instance: &ProblemInstance, order: &ConstructionOrder) -> Solution {
        match self {
            ConstructionStrategy::CheapestInsertion => cheapest_insertion(instance, order),
            ConstructionStrategy::CheapestArc => cheapest_arc(instance, order),
            ConstructionStrategy::Savings => savings(instance, order),
        }
    }

    /// Command-line name of the strategy.
    pub fn name(&self) -> &'static str {
        match self {
            ConstructionStrategy::CheapestInsertion => "cheapest-insertion",
            ConstructionStrategy::CheapestArc => "cheapest-arc",
            ConstructionStrategy::Savings => "savings",
        }
    }
}

impl fmt::Display for ConstructionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ConstructionStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.name() == s)
            .ok_or_else(|| format!("unknown construction strategy '{s}'"))
    }
}

/// Order in which a heuristic visits vehicles and scans candidate stops.
///
/// The canonical order (vehicles by identifier, stops ascending) makes every
/// tie resolve to the lowest identifier. Shuffled orders give independent
/// attempts a different starting point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructionOrder {
    vehicles: Vec<usize>,
    stops: Vec<usize>,
}

impl ConstructionOrder {
    /// Vehicles by identifier, stops ascending.
    pub fn canonical(instance: &ProblemInstance) -> Self {
        Self {
            vehicles: (0..instance.num_vehicles()).collect(),
            stops: instance.customers().collect(),
        }
    }

    /// Canonical order with vehicles and stops shuffled by `rng`.
    pub fn shuffled<R: Rng + ?Sized>(instance: &ProblemInstance, rng: &mut R) -> Self {
        let mut order = Self::canonical(instance);
        order.vehicles.shuffle(rng);
        order.stops.shuffle(rng);
        order
    }

    /// Vehicle indices (into [`ProblemInstance::vehicles`]) in visiting order.
    pub fn vehicles(&self) -> &[usize] {
        &self.vehicles
    }

    /// Non-depot stop identifiers in scanning order.
    pub fn stops(&self) -> &[usize] {
        &self.stops
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn instance() -> ProblemInstance {
        let rows: Vec<Vec<f64>> = (0..5)
            .map(|i| (0..5).map(|j| (i as f64 - j as f64).abs()).collect())
            .collect();
        ProblemInstance::from_parts(&[0, 1, 1, 1, 1], &[2, 2, 2], &rows, 0).expect("valid")
    }

    #[test]
    fn test_strategy_names_round_trip() {
        for strategy in ConstructionStrategy::ALL {
            assert_eq!(strategy.name().parse::<ConstructionStrategy>(), Ok(strategy));
        }
        assert!("sweep".parse::<ConstructionStrategy>().is_err());
        assert_eq!(ConstructionStrategy::default(), ConstructionStrategy::CheapestInsertion);
    }

    #[test]
    fn test_canonical_order() {
        let order = ConstructionOrder::canonical(&instance());
        assert_eq!(order.vehicles(), &[0, 1, 2]);
        assert_eq!(order.stops(), &[1, 2, 3, 4]);
    }

    #[test]
    fn test_shuffled_order_is_permutation_and_seeded() {
        let inst = instance();
        let a = ConstructionOrder::shuffled(&inst, &mut StdRng::seed_from_u64(7));
        let b = ConstructionOrder::shuffled(&inst, &mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
        let mut stops = a.stops().to_vec();
        stops.sort_unstable();
        assert_eq!(stops, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_every_strategy_serves_all() {
        let inst = instance();
        let order = ConstructionOrder::canonical(&inst);
        for strategy in ConstructionStrategy::ALL {
            let sol = strategy.build(&inst, &order);
            assert_eq!(sol.num_served(), 4, "{strategy}");
            assert_eq!(sol.num_routes(), 3, "{strategy}");
            assert!(crate::evaluation::check_solution(&inst, &sol).is_empty(), "{strategy}");
        }
    }
}
