//! Capacity feasibility and solution evaluation.
//!
//! - [`CapacityTracker`] — O(1) prefix-load checks for insertions and exchanges
//! - [`SolutionEvaluator`] — total distance/load and solution ranking
//! - [`check_solution`] — full invariant check of a solution against its instance

mod capacity;
mod evaluator;

pub use capacity::CapacityTracker;
pub use evaluator::{check_solution, SolutionCost, SolutionEvaluator, EPSILON};
