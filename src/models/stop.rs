//! Stop type.

use serde::{Deserialize, Serialize};

/// A demand point (or the depot) in a routing problem.
///
/// A stop's identifier is its index in the instance. Coordinates and price
/// are carried for reporting only; the search never reads them.
///
/// # Examples
///
/// ```
/// use u_cvrp::models::Stop;
///
/// let depot = Stop::depot(0);
/// assert_eq!(depot.demand(), 0);
///
/// let s = Stop::new(1, 10).with_location(2.0, 3.0);
/// assert_eq!(s.id(), 1);
/// assert_eq!(s.demand(), 10);
/// assert_eq!(s.location(), Some((2.0, 3.0)));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    id: usize,
    demand: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    location: Option<(f64, f64)>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    price: Option<f64>,
}

impl Stop {
    /// Creates a stop with the given identifier and demand.
    pub fn new(id: usize, demand: i32) -> Self {
        Self {
            id,
            demand,
            location: None,
            price: None,
        }
    }

    /// Creates a depot stop (demand 0).
    pub fn depot(id: usize) -> Self {
        Self::new(id, 0)
    }

    /// Sets planar coordinates for external renderers.
    pub fn with_location(mut self, x: f64, y: f64) -> Self {
        self.location = Some((x, y));
        self
    }

    /// Attaches a quoted price for reporting.
    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    /// Stop identifier (its index in the instance).
    pub fn id(&self) -> usize {
        self.id
    }

    /// Quantity to deliver at this stop.
    pub fn demand(&self) -> i32 {
        self.demand
    }

    /// Coordinates, if known.
    pub fn location(&self) -> Option<(f64, f64)> {
        self.location
    }

    /// Quoted price, if one was attached.
    pub fn price(&self) -> Option<f64> {
        self.price
    }

    pub(crate) fn set_price(&mut self, price: f64) {
        self.price = Some(price);
    }
}
