//! Local search for improving CVRP solutions under capacity constraints.
//!
//! - [`two_opt`] — Intra-route segment reversal
//! - [`or_opt`] — Relocation of 1–3 consecutive stops within or across routes
//! - [`swap`] — Inter-route exchange of two single stops
//! - [`LocalSearch`] — First-improvement driver over the moves above, bounded
//!   by a [`Deadline`]
//!
//! Every operator shares one signature: it scans for the first improving move
//! in a fixed order, applies it, refreshes the affected routes and capacity
//! trackers, and reports what happened.

mod deadline;
mod optimizer;
mod or_opt;
mod swap;
mod two_opt;

use serde::{Deserialize, Serialize};

pub use deadline::Deadline;
pub use optimizer::{LocalSearch, SearchReport};
pub use or_opt::or_opt;
pub use swap::swap;
pub use two_opt::two_opt;

use crate::distance::DistanceModel;
use crate::evaluation::CapacityTracker;
use crate::models::{DemandModel, Route};

/// Maximum number of consecutive stops relocated by one Or-opt move.
pub const MAX_SEGMENT: usize = 3;

/// Result of one operator scan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MoveOutcome {
    /// An improving move was applied; carries the (negative) distance change.
    Applied(f64),
    /// The whole neighborhood was scanned without finding an improvement.
    Exhausted,
    /// The deadline passed before the scan finished. Nothing was changed.
    Expired,
}

/// Why a search stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// A full pass over all neighborhoods found no improvement.
    Converged,
    /// The deadline elapsed first; the result may be suboptimal.
    DeadlineReached,
}

/// A neighborhood move type, listed in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Neighborhood {
    /// Intra-route segment reversal.
    TwoOpt,
    /// Segment relocation within or across routes.
    OrOpt,
    /// Single-stop exchange between routes.
    Swap,
}

impl Neighborhood {
    /// Default priority order.
    pub const ALL: [Neighborhood; 3] = [Neighborhood::TwoOpt, Neighborhood::OrOpt, Neighborhood::Swap];

    /// Runs this neighborhood's operator once.
    pub fn apply<P>(
        &self,
        problem: &P,
        routes: &mut [Route],
        trackers: &mut [CapacityTracker],
        deadline: &Deadline,
    ) -> MoveOutcome
    where
        P: DistanceModel + DemandModel + ?Sized,
    {
        match self {
            Neighborhood::TwoOpt => two_opt(problem, routes, trackers, deadline),
            Neighborhood::OrOpt => or_opt(problem, routes, trackers, deadline),
            Neighborhood::Swap => swap(problem, routes, trackers, deadline),
        }
    }
}

/// Stop before `pos` in `route`, or the depot.
pub(crate) fn before(route: &Route, pos: usize) -> usize {
    if pos == 0 {
        route.depot()
    } else {
        route.stops()[pos - 1]
    }
}

/// Stop at `pos` in `route`, or the depot past the end.
pub(crate) fn at_or_depot(route: &Route, pos: usize) -> usize {
    route.stops().get(pos).copied().unwrap_or(route.depot())
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::evaluation::CapacityTracker;
    use crate::models::{ProblemInstance, Route};

    /// Euclidean instance over `points`, depot at index 0.
    pub fn points_instance(points: &[(f64, f64)], demands: &[i32], capacities: &[i32]) -> ProblemInstance {
        let rows: Vec<Vec<f64>> = points
            .iter()
            .map(|a| {
                points
                    .iter()
                    .map(|b| ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt())
                    .collect()
            })
            .collect();
        ProblemInstance::from_parts(demands, capacities, &rows, 0).expect("valid")
    }

    pub fn routes(inst: &ProblemInstance, stops: &[Vec<usize>]) -> (Vec<Route>, Vec<CapacityTracker>) {
        let routes: Vec<Route> = stops
            .iter()
            .enumerate()
            .map(|(k, s)| Route::with_stops(&inst.vehicles()[k], inst.depot(), s.clone(), inst, inst))
            .collect();
        let trackers = routes.iter().map(|r| CapacityTracker::for_route(r, inst)).collect();
        (routes, trackers)
    }
}
