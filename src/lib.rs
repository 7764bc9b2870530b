//! # u-cvrp
//!
//! Capacitated vehicle routing: assign demand points to a fixed, possibly
//! heterogeneous fleet of capacity-limited vehicles that start and end at a
//! depot, minimizing total travel distance.
//!
//! A solve validates the instance, builds a capacity-feasible first solution
//! greedily, then improves it with first-improvement local search until it
//! converges or a wall-clock deadline passes.
//!
//! ## Modules
//!
//! - [`models`] — Domain types (Stop, Vehicle, Route, Solution, ProblemInstance)
//! - [`distance`] — Distance model trait and dense matrix
//! - [`evaluation`] — Prefix-load capacity tracking, cost and invariant checks
//! - [`constructive`] — Construction heuristics (cheapest insertion, cheapest arc, savings)
//! - [`local_search`] — 2-opt, Or-opt and swap under a deadline
//! - [`solver`] — Orchestration, parallel attempts and the solve outcome
//! - [`io`] — JSON instance and report formats
//! - [`providers`] — Demand forecast and pricing collaborators
//! - [`cli`] — The `solve` command
//!
//! ## Example
//!
//! ```
//! use std::time::Duration;
//! use u_cvrp::io::InstanceData;
//! use u_cvrp::solver::{Solver, SolverConfig};
//!
//! let data = InstanceData::new(
//!     vec![0, 10, 15, 10],
//!     vec![20, 20],
//!     vec![
//!         vec![0.0, 5.0, 7.0, 6.0],
//!         vec![5.0, 0.0, 4.0, 9.0],
//!         vec![7.0, 4.0, 0.0, 3.0],
//!         vec![6.0, 9.0, 3.0, 0.0],
//!     ],
//! );
//! let outcome = Solver::new(SolverConfig::default().with_time_limit(Duration::from_secs(1)))
//!     .solve(&data)
//!     .unwrap();
//!
//! assert!(outcome.feasible());
//! for route in outcome.solution.routes() {
//!     assert!(route.load() <= i64::from(route.capacity()));
//! }
//! ```

pub mod cli;
pub mod constructive;
pub mod distance;
pub mod error;
pub mod evaluation;
pub mod io;
pub mod local_search;
pub mod models;
pub mod providers;
pub mod solver;

pub use error::{CvrpError, InstanceViolation};
