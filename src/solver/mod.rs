//! Solver orchestration.
//!
//! [`Solver`] drives one instance through validation, construction and
//! deadline-bounded local search, optionally running several independent
//! attempts in parallel, and reports the best result as a [`SolveOutcome`].
//! Running out of capacity or time is part of the outcome, not an error.

mod config;
mod orchestrator;
mod outcome;

pub use config::{SolverConfig, DEFAULT_TIME_LIMIT};
pub use orchestrator::Solver;
pub use outcome::{Infeasibility, SolveOutcome, SolverPhase};
