//! Route type.

use serde::{Deserialize, Serialize};

use super::{DemandModel, Vehicle};
use crate::distance::DistanceModel;

/// An ordered sequence of stops served by a single vehicle.
///
/// The route starts and ends at the depot; the depot is not stored in
/// [`stops`](Route::stops) but is included in [`sequence`](Route::sequence).
/// Load and distance are cached and kept current by whoever mutates the
/// stop order.
///
/// # Examples
///
/// ```
/// use u_cvrp::distance::DistanceMatrix;
/// use u_cvrp::models::{Route, Vehicle};
///
/// let dm = DistanceMatrix::from_points(&[(0.0, 0.0), (3.0, 4.0)]);
/// let demands = vec![0, 10];
/// let route = Route::with_stops(&Vehicle::new(0, 30), 0, vec![1], &dm, &demands);
/// assert_eq!(route.sequence(), vec![0, 1, 0]);
/// assert_eq!(route.load(), 10);
/// assert!((route.distance() - 10.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "RouteRecord", try_from = "RouteRecord")]
pub struct Route {
    vehicle_id: usize,
    capacity: i32,
    depot: usize,
    stops: Vec<usize>,
    load: i64,
    distance: f64,
}

impl Route {
    /// Creates an empty route (depot → depot) for the given vehicle.
    pub fn new(vehicle: &Vehicle, depot: usize) -> Self {
        Self {
            vehicle_id: vehicle.id(),
            capacity: vehicle.capacity(),
            depot,
            stops: Vec::new(),
            load: 0,
            distance: 0.0,
        }
    }

    /// Creates a route visiting `stops` in order and computes its load and distance.
    pub fn with_stops<D, M>(vehicle: &Vehicle, depot: usize, stops: Vec<usize>, distances: &D, demands: &M) -> Self
    where
        D: DistanceModel + ?Sized,
        M: DemandModel + ?Sized,
    {
        let mut route = Self::new(vehicle, depot);
        route.stops = stops;
        route.refresh(distances, demands);
        route
    }

    /// Appends a stop, updating the cached load and distance incrementally.
    pub fn push<D: DistanceModel + ?Sized>(&mut self, stop: usize, demand: i32, distances: &D) {
        let last = self.last();
        self.distance += distances.cost(last, stop) + distances.cost(stop, self.depot) - distances.cost(last, self.depot);
        self.load += i64::from(demand);
        self.stops.push(stop);
    }

    /// Recomputes load and distance from the current stop order.
    pub fn refresh<D, M>(&mut self, distances: &D, demands: &M)
    where
        D: DistanceModel + ?Sized,
        M: DemandModel + ?Sized,
    {
        self.load = self.stops.iter().map(|&s| i64::from(demands.demand(s))).sum();
        self.distance = distances.path_cost(self.depot, &self.stops);
    }

    /// Vehicle that owns this route.
    pub fn vehicle_id(&self) -> usize {
        self.vehicle_id
    }

    /// Capacity of the owning vehicle.
    pub fn capacity(&self) -> i32 {
        self.capacity
    }

    /// Depot the route starts and ends at.
    pub fn depot(&self) -> usize {
        self.depot
    }

    /// Stops in visit order, excluding the depot.
    pub fn stops(&self) -> &[usize] {
        &self.stops
    }

    /// Mutable access to the stop order. Callers must call
    /// [`refresh`](Route::refresh) or [`set_metrics`](Route::set_metrics) afterwards.
    pub fn stops_mut(&mut self) -> &mut Vec<usize> {
        &mut self.stops
    }

    /// Full visit sequence: depot, stops..., depot.
    pub fn sequence(&self) -> Vec<usize> {
        let mut seq = Vec::with_capacity(self.stops.len() + 2);
        seq.push(self.depot);
        seq.extend_from_slice(&self.stops);
        seq.push(self.depot);
        seq
    }

    /// Last stop visited, or the depot if the route is empty.
    pub fn last(&self) -> usize {
        self.stops.last().copied().unwrap_or(self.depot)
    }

    /// Number of stops (excluding depot).
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    /// Returns `true` if the route visits no stops.
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Sum of demands of visited stops.
    pub fn load(&self) -> i64 {
        self.load
    }

    /// Capacity not yet used.
    pub fn residual(&self) -> i64 {
        i64::from(self.capacity) - self.load
    }

    /// Sum of consecutive arc costs, depot to depot.
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// Overwrites the cached metrics after an incremental edit.
    pub fn set_metrics(&mut self, load: i64, distance: f64) {
        self.load = load;
        self.distance = distance;
    }
}

/// Wire form of a route.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RouteRecord {
    vehicle_id: usize,
    capacity: i32,
    sequence: Vec<usize>,
    load: i64,
    distance: f64,
}

impl From<Route> for RouteRecord {
    fn from(route: Route) -> Self {
        Self {
            vehicle_id: route.vehicle_id,
            capacity: route.capacity,
            sequence: route.sequence(),
            load: route.load,
            distance: route.distance,
        }
    }
}

impl TryFrom<RouteRecord> for Route {
    type Error = String;

    fn try_from(record: RouteRecord) -> Result<Self, Self::Error> {
        let seq = record.sequence;
        if seq.len() < 2 {
            return Err(format!("route of vehicle {} has fewer than two entries", record.vehicle_id));
        }
        let depot = seq[0];
        if seq[seq.len() - 1] != depot {
            return Err(format!(
                "route of vehicle {} does not return to depot {depot}",
                record.vehicle_id
            ));
        }
        let stops = seq[1..seq.len() - 1].to_vec();
        if stops.contains(&depot) {
            return Err(format!("route of vehicle {} revisits the depot", record.vehicle_id));
        }
        Ok(Self {
            vehicle_id: record.vehicle_id,
            capacity: record.capacity,
            depot,
            stops,
            load: record.load,
            distance: record.distance,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::DistanceMatrix;

    fn line() -> (DistanceMatrix, Vec<i32>) {
        let dm = DistanceMatrix::from_points(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0)]);
        (dm, vec![0, 10, 5, 7])
    }

    #[test]
    fn test_route_empty() {
        let r = Route::new(&Vehicle::new(4, 30), 0);
        assert!(r.is_empty());
        assert_eq!(r.len(), 0);
        assert_eq!(r.vehicle_id(), 4);
        assert_eq!(r.distance(), 0.0);
        assert_eq!(r.load(), 0);
        assert_eq!(r.sequence(), vec![0, 0]);
        assert_eq!(r.last(), 0);
    }

    #[test]
    fn test_route_push_matches_refresh() {
        let (dm, demands) = line();
        let mut r = Route::new(&Vehicle::new(0, 30), 0);
        r.push(2, demands[2], &dm);
        r.push(1, demands[1], &dm);
        r.push(3, demands[3], &dm);
        let pushed = (r.load(), r.distance());
        r.refresh(&dm, &demands);
        assert_eq!(pushed.0, r.load());
        assert!((pushed.1 - r.distance()).abs() < 1e-10);
        assert_eq!(r.load(), 22);
        assert_eq!(r.residual(), 8);
    }

    #[test]
    fn test_route_sequence_includes_depot() {
        let (dm, demands) = line();
        let r = Route::with_stops(&Vehicle::new(0, 30), 0, vec![1, 2, 3], &dm, &demands);
        assert_eq!(r.sequence(), vec![0, 1, 2, 3, 0]);
        assert!((r.distance() - 6.0).abs() < 1e-10);
    }

    #[test]
    fn test_route_serde_round_trip() {
        let (dm, demands) = line();
        let r = Route::with_stops(&Vehicle::new(1, 30), 0, vec![3, 1], &dm, &demands);
        let json = serde_json::to_string(&r).expect("serialize");
        assert!(json.contains(r#""sequence":[0,3,1,0]"#));
        let back: Route = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, r);
    }

    #[test]
    fn test_route_rejects_open_sequence() {
        let json = r#"{"vehicle_id":0,"capacity":30,"sequence":[0,1,2],"load":15,"distance":4.0}"#;
        assert!(serde_json::from_str::<Route>(json).is_err());
    }
}
