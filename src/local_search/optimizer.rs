//! First-improvement local search driver.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::{Deadline, MoveOutcome, Neighborhood, Termination};
use crate::distance::DistanceModel;
use crate::evaluation::{CapacityTracker, EPSILON};
use crate::models::{DemandModel, Solution};

/// Summary of one [`LocalSearch::improve`] run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchReport {
    /// Why the search stopped.
    pub termination: Termination,
    /// Number of improving moves applied.
    pub moves: usize,
    /// Total distance before the search.
    pub initial_distance: f64,
    /// Total distance after the search.
    pub final_distance: f64,
}

/// Repeatedly applies the first improving move found across a list of
/// neighborhoods until none improves or the deadline passes.
///
/// After every accepted move the scan restarts from the first neighborhood.
/// Every move keeps all route loads within capacity and strictly shortens
/// the total distance, so the result is never worse than the input.
///
/// # Examples
///
/// ```
/// use u_cvrp::constructive::{cheapest_insertion, ConstructionOrder};
/// use u_cvrp::local_search::{Deadline, LocalSearch, Termination};
/// use u_cvrp::models::ProblemInstance;
///
/// let rows = vec![
///     vec![0.0, 2.0, 2.0, 3.0],
///     vec![2.0, 0.0, 3.0, 1.0],
///     vec![2.0, 3.0, 0.0, 4.0],
///     vec![3.0, 1.0, 4.0, 0.0],
/// ];
/// let instance = ProblemInstance::from_parts(&[0, 1, 1, 1], &[10], &rows, 0).unwrap();
/// let mut solution = cheapest_insertion(&instance, &ConstructionOrder::canonical(&instance));
///
/// let report = LocalSearch::new().improve(&instance, &mut solution, &Deadline::never());
/// assert_eq!(report.termination, Termination::Converged);
/// assert!(report.final_distance <= report.initial_distance);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalSearch {
    neighborhoods: Vec<Neighborhood>,
}

impl Default for LocalSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalSearch {
    /// Uses every neighborhood in [`Neighborhood::ALL`] order.
    pub fn new() -> Self {
        Self {
            neighborhoods: Neighborhood::ALL.to_vec(),
        }
    }

    /// Replaces the neighborhood list; order sets priority.
    pub fn with_neighborhoods(mut self, neighborhoods: &[Neighborhood]) -> Self {
        self.neighborhoods = neighborhoods.to_vec();
        self
    }

    /// Neighborhoods in priority order.
    pub fn neighborhoods(&self) -> &[Neighborhood] {
        &self.neighborhoods
    }

    /// Improves `solution` in place.
    ///
    /// Unassigned stops are left untouched. If the deadline has already
    /// passed, the solution is returned unchanged with
    /// [`Termination::DeadlineReached`].
    pub fn improve<P>(&self, problem: &P, solution: &mut Solution, deadline: &Deadline) -> SearchReport
    where
        P: DistanceModel + DemandModel + ?Sized,
    {
        let initial_distance = solution.total_distance();
        let snapshot = solution.clone();
        let mut trackers: Vec<CapacityTracker> = solution
            .routes()
            .iter()
            .map(|route| CapacityTracker::for_route(route, problem))
            .collect();
        let mut moves = 0;

        let termination = 'search: loop {
            if deadline.expired() {
                break Termination::DeadlineReached;
            }
            let mut improved = false;
            for neighborhood in &self.neighborhoods {
                match neighborhood.apply(problem, solution.routes_mut(), &mut trackers, deadline) {
                    MoveOutcome::Applied(delta) => {
                        moves += 1;
                        trace!(?neighborhood, delta, "move applied");
                        improved = true;
                        break;
                    }
                    MoveOutcome::Exhausted => {}
                    MoveOutcome::Expired => break 'search Termination::DeadlineReached,
                }
            }
            if !improved {
                break Termination::Converged;
            }
        };

        let mut final_distance = solution.total_distance();
        if final_distance > initial_distance + EPSILON {
            *solution = snapshot;
            final_distance = initial_distance;
        }

        debug!(
            ?termination,
            moves,
            initial_distance,
            final_distance,
            "local search finished"
        );

        SearchReport {
            termination,
            moves,
            initial_distance,
            final_distance,
        }
    }
}
