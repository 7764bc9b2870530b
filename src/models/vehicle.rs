//! Vehicle type.

use serde::{Deserialize, Serialize};

/// A capacity-limited vehicle that serves one route from the depot.
///
/// # Examples
///
/// ```
/// use u_cvrp::models::Vehicle;
///
/// let v = Vehicle::new(0, 30);
/// assert_eq!(v.id(), 0);
/// assert_eq!(v.capacity(), 30);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    id: usize,
    capacity: i32,
}

impl Vehicle {
    /// Creates a vehicle with the given ID and capacity.
    pub fn new(id: usize, capacity: i32) -> Self {
        Self { id, capacity }
    }

    /// Vehicle ID.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Maximum load capacity.
    pub fn capacity(&self) -> i32 {
        self.capacity
    }

    /// Returns `true` if a load of `load` fits this vehicle.
    pub fn fits(&self, load: i64) -> bool {
        load <= i64::from(self.capacity)
    }
}
