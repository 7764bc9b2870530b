//! File formats.
//!
//! - [`InstanceData`]: the JSON instance file, validated into a
//!   [`ProblemInstance`](crate::models::ProblemInstance) by
//!   [`InstanceData::to_instance`]
//! - [`SolveReport`]: the JSON result written by the CLI, from which the
//!   solution can be rebuilt exactly

mod instance;
mod report;

pub use instance::InstanceData;
pub use report::SolveReport;
