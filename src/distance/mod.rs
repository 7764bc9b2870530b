//! Travel cost between stops.
//!
//! Provides the read-only [`DistanceModel`] interface that every search
//! component consumes, and a dense [`DistanceMatrix`] implementing it.

mod matrix;
mod model;

pub use matrix::DistanceMatrix;
pub use model::DistanceModel;
