//! Domain model types for capacitated vehicle routing.
//!
//! Provides stops with demands, capacity-limited vehicles, routes as ordered
//! stop sequences, solutions, and the validated [`ProblemInstance`] that ties
//! everything together.

mod instance;
mod route;
mod solution;
mod stop;
mod vehicle;

pub use instance::{validate, DemandModel, ProblemInstance};
pub use route::Route;
pub use solution::{Solution, Violation, ViolationType};
pub use stop::Stop;
pub use vehicle::Vehicle;
