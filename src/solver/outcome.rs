//! Solver phases and the terminal result.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::local_search::Termination;
use crate::models::{DemandModel, ProblemInstance, Solution};

/// Lifecycle of one solve.
///
/// ```text
/// Initial → Validated → Constructed → Improving → Terminated
///    └─────→ Rejected
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolverPhase {
    Initial,
    Validated,
    Constructed,
    Improving,
    Terminated,
    Rejected,
}

impl SolverPhase {
    /// Returns `true` if `next` may follow `self`.
    pub fn can_advance_to(self, next: SolverPhase) -> bool {
        use SolverPhase::*;
        matches!(
            (self, next),
            (Initial, Validated)
                | (Initial, Rejected)
                | (Validated, Constructed)
                | (Constructed, Improving)
                | (Improving, Terminated)
        )
    }

    /// Returns `true` for phases with no successor.
    pub fn is_terminal(self) -> bool {
        matches!(self, SolverPhase::Terminated | SolverPhase::Rejected)
    }
}

/// Ordered record of the phases a solve went through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PhaseLog {
    phases: Vec<SolverPhase>,
}

impl PhaseLog {
    pub(crate) fn new() -> Self {
        Self {
            phases: vec![SolverPhase::Initial],
        }
    }

    pub(crate) fn current(&self) -> SolverPhase {
        self.phases.last().copied().unwrap_or(SolverPhase::Initial)
    }

    /// Moves to `next`; illegal transitions are ignored and logged.
    pub(crate) fn advance(&mut self, next: SolverPhase) {
        let current = self.current();
        if current.can_advance_to(next) {
            tracing::debug!(from = ?current, to = ?next, "phase transition");
            self.phases.push(next);
        } else {
            tracing::warn!(from = ?current, to = ?next, "illegal phase transition ignored");
        }
    }

    pub(crate) fn into_vec(self) -> Vec<SolverPhase> {
        self.phases
    }
}

/// Why some demand could not be served.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Infeasibility {
    /// Total demand exceeds the combined fleet capacity.
    DemandExceedsFleet { demand: i64, capacity: i64 },
    /// These stops are heavier than every single vehicle.
    OversizedStops(Vec<usize>),
    /// The fleet could carry the demand in total, but the stops did not pack.
    Fragmented,
}

impl Infeasibility {
    /// Explains why `solution` leaves stops unassigned, or `None` if it
    /// serves everything.
    pub fn diagnose(instance: &ProblemInstance, solution: &Solution) -> Option<Self> {
        if solution.is_complete() {
            return None;
        }
        let demand = instance.total_demand();
        let capacity = instance.total_capacity();
        if demand > capacity {
            return Some(Infeasibility::DemandExceedsFleet { demand, capacity });
        }
        let limit = instance.max_capacity();
        let oversized: Vec<usize> = instance
            .customers()
            .filter(|&stop| instance.demand(stop) > limit)
            .collect();
        if !oversized.is_empty() {
            return Some(Infeasibility::OversizedStops(oversized));
        }
        Some(Infeasibility::Fragmented)
    }
}

impl fmt::Display for Infeasibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Infeasibility::DemandExceedsFleet { demand, capacity } => {
                write!(f, "total demand {demand} exceeds fleet capacity {capacity}")
            }
            Infeasibility::OversizedStops(stops) => {
                write!(f, "stops {stops:?} exceed every vehicle's capacity")
            }
            Infeasibility::Fragmented => write!(f, "remaining stops do not fit any vehicle's residual capacity"),
        }
    }
}

/// Terminal result of a solve.
#[derive(Debug, Clone)]
pub struct SolveOutcome {
    /// Best solution found.
    pub solution: Solution,
    /// Total distance of that solution right after construction.
    pub initial_distance: f64,
    /// Whether the search converged or ran out of time.
    pub termination: Termination,
    /// Set when some stops remain unassigned.
    pub infeasibility: Option<Infeasibility>,
    /// Number of attempts run.
    pub attempts: usize,
    /// Index of the attempt that produced [`solution`](Self::solution).
    pub best_attempt: usize,
    /// Wall-clock time spent.
    pub elapsed: Duration,
    /// Phases passed through, in order.
    pub phases: Vec<SolverPhase>,
}

impl SolveOutcome {
    /// `true` when every stop is served.
    pub fn feasible(&self) -> bool {
        self.solution.is_complete()
    }

    /// `true` when the search stopped on its deadline, so the solution may
    /// not be a local optimum.
    pub fn deadline_reached(&self) -> bool {
        self.termination == Termination::DeadlineReached
    }

    pub fn total_distance(&self) -> f64 {
        self.solution.total_distance()
    }

    pub fn total_load(&self) -> i64 {
        self.solution.total_load()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Route;

    fn instance(demands: &[i32], capacities: &[i32]) -> ProblemInstance {
        let n = demands.len();
        let rows: Vec<Vec<f64>> = (0..n)
            .map(|i| (0..n).map(|j| (i as f64 - j as f64).abs()).collect())
            .collect();
        ProblemInstance::from_parts(demands, capacities, &rows, 0).expect("valid")
    }

    fn with_unassigned(inst: &ProblemInstance, stops: &[usize]) -> Solution {
        let mut sol = Solution::new();
        for vehicle in inst.vehicles() {
            sol.add_route(Route::new(vehicle, inst.depot()));
        }
        for &stop in stops {
            sol.add_unassigned(stop);
        }
        sol
    }

    #[test]
    fn test_phase_transitions() {
        use SolverPhase::*;
        assert!(Initial.can_advance_to(Validated));
        assert!(Initial.can_advance_to(Rejected));
        assert!(Improving.can_advance_to(Terminated));
        assert!(!Initial.can_advance_to(Constructed));
        assert!(!Terminated.can_advance_to(Initial));
        assert!(!Validated.can_advance_to(Rejected));
        assert!(Rejected.is_terminal());
        assert!(!Improving.is_terminal());
    }

    #[test]
    fn test_phase_log_ignores_illegal() {
        let mut log = PhaseLog::new();
        log.advance(SolverPhase::Validated);
        log.advance(SolverPhase::Terminated);
        assert_eq!(log.current(), SolverPhase::Validated);
        assert_eq!(log.into_vec(), vec![SolverPhase::Initial, SolverPhase::Validated]);
    }

    #[test]
    fn test_diagnose_complete() {
        let inst = instance(&[0, 5], &[10]);
        let mut sol = with_unassigned(&inst, &[]);
        sol.routes_mut()[0] = Route::with_stops(&inst.vehicles()[0], 0, vec![1], &inst, &inst);
        assert_eq!(Infeasibility::diagnose(&inst, &sol), None);
    }

    #[test]
    fn test_diagnose_fleet_too_small() {
        let inst = instance(&[0, 20, 20], &[15, 15]);
        let sol = with_unassigned(&inst, &[1, 2]);
        assert_eq!(
            Infeasibility::diagnose(&inst, &sol),
            Some(Infeasibility::DemandExceedsFleet {
                demand: 40,
                capacity: 30
            })
        );
    }

    #[test]
    fn test_diagnose_oversized() {
        let inst = instance(&[0, 25, 1], &[20, 20]);
        let sol = with_unassigned(&inst, &[1]);
        assert_eq!(
            Infeasibility::diagnose(&inst, &sol),
            Some(Infeasibility::OversizedStops(vec![1]))
        );
    }

    #[test]
    fn test_diagnose_fragmented() {
        let inst = instance(&[0, 6, 6, 6], &[10, 10]);
        let sol = with_unassigned(&inst, &[3]);
        assert_eq!(Infeasibility::diagnose(&inst, &sol), Some(Infeasibility::Fragmented));
    }
}
