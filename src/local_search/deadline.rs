//! Wall-clock search deadline.

use std::time::{Duration, Instant};

/// A wall-clock bound shared by every search loop of one solve.
///
/// Checked cooperatively between move evaluations; no evaluation is ever
/// interrupted. `Copy`, so each worker holds its own handle to the same
/// instant.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use u_cvrp::local_search::Deadline;
///
/// assert!(!Deadline::never().expired());
/// assert!(Deadline::after(Duration::ZERO).expired());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    at: Option<Instant>,
}

impl Deadline {
    /// Deadline `limit` from now.
    pub fn after(limit: Duration) -> Self {
        Self {
            at: Instant::now().checked_add(limit),
        }
    }

    /// Deadline at a fixed instant.
    pub fn at(instant: Instant) -> Self {
        Self { at: Some(instant) }
    }

    /// A deadline that never expires.
    pub fn never() -> Self {
        Self { at: None }
    }

    /// Returns `true` once the deadline has passed.
    pub fn expired(&self) -> bool {
        self.at.is_some_and(|at| Instant::now() >= at)
    }

    /// Time left, or `None` for an unbounded deadline.
    pub fn remaining(&self) -> Option<Duration> {
        self.at.map(|at| at.saturating_duration_since(Instant::now()))
    }
}
