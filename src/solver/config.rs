//! Solver configuration.

use std::time::Duration;

use crate::constructive::ConstructionStrategy;
use crate::local_search::Neighborhood;

/// Default wall-clock limit of one solve.
pub const DEFAULT_TIME_LIMIT: Duration = Duration::from_secs(10);

/// Configuration for [`Solver`](super::Solver).
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use u_cvrp::constructive::ConstructionStrategy;
/// use u_cvrp::solver::SolverConfig;
///
/// let config = SolverConfig::default()
///     .with_time_limit(Duration::from_secs(2))
///     .with_workers(4)
///     .with_seed(42)
///     .with_strategy(ConstructionStrategy::Savings);
/// assert_eq!(config.workers(), 4);
/// assert_eq!(config.seed(), Some(42));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SolverConfig {
    time_limit: Duration,
    workers: usize,
    seed: Option<u64>,
    strategy: ConstructionStrategy,
    neighborhoods: Vec<Neighborhood>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            time_limit: DEFAULT_TIME_LIMIT,
            workers: 1,
            seed: None,
            strategy: ConstructionStrategy::default(),
            neighborhoods: Neighborhood::ALL.to_vec(),
        }
    }
}

impl SolverConfig {
    /// Sets the wall-clock limit shared by construction and local search.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = limit;
        self
    }

    /// Sets the number of independent attempts (at least 1).
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Fixes the seed that perturbs attempts after the first.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the construction heuristic.
    pub fn with_strategy(mut self, strategy: ConstructionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets the local-search neighborhoods in priority order.
    pub fn with_neighborhoods(mut self, neighborhoods: &[Neighborhood]) -> Self {
        self.neighborhoods = neighborhoods.to_vec();
        self
    }

    pub fn time_limit(&self) -> Duration {
        self.time_limit
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn strategy(&self) -> ConstructionStrategy {
        self.strategy
    }

    pub fn neighborhoods(&self) -> &[Neighborhood] {
        &self.neighborhoods
    }
}
