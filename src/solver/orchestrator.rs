//! The solver orchestrator.

use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use super::outcome::PhaseLog;
use super::{Infeasibility, SolveOutcome, SolverConfig, SolverPhase};
use crate::constructive::ConstructionOrder;
use crate::error::CvrpError;
use crate::evaluation::SolutionEvaluator;
use crate::io::InstanceData;
use crate::local_search::{Deadline, LocalSearch, SearchReport};
use crate::models::{ProblemInstance, Solution};

/// Result of one construction + local-search attempt.
#[derive(Debug)]
struct Attempt {
    index: usize,
    solution: Solution,
    initial_distance: f64,
    report: SearchReport,
}

/// Runs validation, construction and local search under a deadline.
///
/// With more than one worker, independent attempts run in parallel on the
/// rayon pool. Attempt 0 always uses the canonical construction order;
/// attempt `k` shuffles vehicle and stop order with a generator seeded from
/// `seed + k`. Every attempt is constructed before any of them starts local
/// search, so the phase log follows the real transitions. Each attempt owns
/// its solution and only reads the shared instance. The best result is picked once every attempt has returned:
/// fewest unassigned stops, then shortest distance, then lowest attempt
/// index.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use u_cvrp::models::ProblemInstance;
/// use u_cvrp::solver::{Solver, SolverConfig};
///
/// let rows: Vec<Vec<f64>> = (0..5)
///     .map(|i| (0..5).map(|j| (i as f64 - j as f64).abs()).collect())
///     .collect();
/// let instance = ProblemInstance::from_parts(&[0, 4, 4, 4, 4], &[8, 8], &rows, 0).unwrap();
///
/// let solver = Solver::new(SolverConfig::default().with_time_limit(Duration::from_secs(1)));
/// let outcome = solver.solve_instance(&instance);
/// assert!(outcome.feasible());
/// assert!(outcome.total_distance() <= outcome.initial_distance);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Solver {
    config: SolverConfig,
}

impl Solver {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Validates raw instance data, then solves it.
    ///
    /// Invalid input is rejected immediately with
    /// [`CvrpError::InvalidInstance`]; no search is attempted.
    pub fn solve(&self, data: &InstanceData) -> Result<SolveOutcome, CvrpError> {
        let mut phases = PhaseLog::new();
        let instance = match data.to_instance() {
            Ok(instance) => instance,
            Err(violation) => {
                phases.advance(SolverPhase::Rejected);
                warn!(%violation, "instance rejected");
                return Err(violation.into());
            }
        };
        Ok(self.run(&instance, phases))
    }

    /// Solves an already validated instance.
    pub fn solve_instance(&self, instance: &ProblemInstance) -> SolveOutcome {
        self.run(instance, PhaseLog::new())
    }

    fn run(&self, instance: &ProblemInstance, mut phases: PhaseLog) -> SolveOutcome {
        let started = Instant::now();
        let deadline = Deadline::after(self.config.time_limit());
        phases.advance(SolverPhase::Validated);

        let workers = self.config.workers();
        let seed = self.config.seed().unwrap_or_else(|| rand::rng().random());
        info!(
            stops = instance.num_stops(),
            vehicles = instance.num_vehicles(),
            workers,
            seed,
            strategy = %self.config.strategy(),
            "solving"
        );

        let constructed: Vec<(usize, Solution)> = if workers == 1 {
            vec![(0, self.construct(instance, 0, seed))]
        } else {
            (0..workers)
                .into_par_iter()
                .map(|index| (index, self.construct(instance, index, seed)))
                .collect()
        };
        phases.advance(SolverPhase::Constructed);

        phases.advance(SolverPhase::Improving);
        let attempts: Vec<Attempt> = if workers == 1 {
            constructed
                .into_iter()
                .map(|(index, solution)| self.improve(instance, index, solution, &deadline))
                .collect()
        } else {
            constructed
                .into_par_iter()
                .map(|(index, solution)| self.improve(instance, index, solution, &deadline))
                .collect()
        };

        let evaluator = SolutionEvaluator::for_instance(instance);
        let count = attempts.len();
        let best = attempts
            .into_iter()
            .min_by(|a, b| {
                evaluator
                    .compare(&a.solution, &b.solution)
                    .then_with(|| a.index.cmp(&b.index))
            })
            .unwrap_or_else(|| self.improve(instance, 0, self.construct(instance, 0, seed), &deadline));
        phases.advance(SolverPhase::Terminated);

        let infeasibility = Infeasibility::diagnose(instance, &best.solution);
        let elapsed = started.elapsed();
        info!(
            best_attempt = best.index,
            distance = best.solution.total_distance(),
            unassigned = best.solution.num_unassigned(),
            termination = ?best.report.termination,
            elapsed_ms = elapsed.as_millis() as u64,
            "solve finished"
        );
        if let Some(reason) = &infeasibility {
            warn!(%reason, unassigned = ?best.solution.unassigned(), "demand not fully served");
        }

        SolveOutcome {
            solution: best.solution,
            initial_distance: best.initial_distance,
            termination: best.report.termination,
            infeasibility,
            attempts: count,
            best_attempt: best.index,
            elapsed,
            phases: phases.into_vec(),
        }
    }

    fn construct(&self, instance: &ProblemInstance, index: usize, seed: u64) -> Solution {
        let order = if index == 0 {
            ConstructionOrder::canonical(instance)
        } else {
            let mut rng = StdRng::seed_from_u64(seed.wrapping_add(index as u64));
            ConstructionOrder::shuffled(instance, &mut rng)
        };
        self.config.strategy().build(instance, &order)
    }

    fn improve(&self, instance: &ProblemInstance, index: usize, mut solution: Solution, deadline: &Deadline) -> Attempt {
        let initial_distance = solution.total_distance();
        let report = LocalSearch::new()
            .with_neighborhoods(self.config.neighborhoods())
            .improve(instance, &mut solution, deadline);

        debug!(
            attempt = index,
            initial_distance,
            final_distance = report.final_distance,
            moves = report.moves,
            unassigned = solution.num_unassigned(),
            "attempt finished"
        );

        Attempt {
            index,
            solution,
            initial_distance,
            report,
        }
    }
}
