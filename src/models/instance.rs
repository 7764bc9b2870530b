//! Problem instance, its validator, and the demand model.

use std::collections::HashSet;

use super::{Stop, Vehicle};
use crate::distance::{DistanceMatrix, DistanceModel};
use crate::error::InstanceViolation;

/// Read-only demand quantity of each stop.
pub trait DemandModel: Send + Sync {
    /// Demand at `stop`. The depot has demand 0.
    fn demand(&self, stop: usize) -> i32;
}

impl DemandModel for [i32] {
    fn demand(&self, stop: usize) -> i32 {
        self[stop]
    }
}

impl DemandModel for Vec<i32> {
    fn demand(&self, stop: usize) -> i32 {
        self[stop]
    }
}

impl<T: DemandModel + ?Sized> DemandModel for &T {
    fn demand(&self, stop: usize) -> i32 {
        (**self).demand(stop)
    }
}

/// A validated, immutable CVRP instance.
///
/// Holds the stops (index = identifier), the fleet, the distance matrix and
/// the depot. Construction runs every validation check; once built the
/// instance is never mutated and may be shared by reference across threads.
///
/// # Examples
///
/// ```
/// use u_cvrp::models::ProblemInstance;
///
/// let instance = ProblemInstance::from_parts(
///     &[0, 4, 6],
///     &[10],
///     &[vec![0.0, 2.0, 3.0], vec![2.0, 0.0, 1.0], vec![3.0, 1.0, 0.0]],
///     0,
/// ).unwrap();
/// assert_eq!(instance.num_stops(), 3);
/// assert_eq!(instance.total_demand(), 10);
///
/// assert!(ProblemInstance::from_parts(&[0, 4], &[], &[vec![0.0, 1.0], vec![1.0, 0.0]], 0).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct ProblemInstance {
    stops: Vec<Stop>,
    vehicles: Vec<Vehicle>,
    distances: DistanceMatrix,
    depot: usize,
    demands: Vec<i32>,
}

impl ProblemInstance {
    /// Validates the parts and builds an instance.
    ///
    /// Vehicles are kept sorted by identifier.
    pub fn new(
        stops: Vec<Stop>,
        mut vehicles: Vec<Vehicle>,
        distances: DistanceMatrix,
        depot: usize,
    ) -> Result<Self, InstanceViolation> {
        validate(&stops, &vehicles, &distances, depot)?;
        vehicles.sort_by_key(|v| v.id());
        let demands = stops.iter().map(|s| s.demand()).collect();
        Ok(Self {
            stops,
            vehicles,
            distances,
            depot,
            demands,
        })
    }

    /// Builds an instance from raw demands, capacities and matrix rows.
    ///
    /// Stop `i` gets demand `demands[i]`; vehicle `k` gets capacity
    /// `capacities[k]`.
    pub fn from_parts(
        demands: &[i32],
        capacities: &[i32],
        rows: &[Vec<f64>],
        depot: usize,
    ) -> Result<Self, InstanceViolation> {
        if rows.len() != demands.len() {
            return Err(InstanceViolation::MatrixRowCount {
                rows: rows.len(),
                stops: demands.len(),
            });
        }
        let distances = DistanceMatrix::from_rows(rows)?;
        let stops = demands
            .iter()
            .enumerate()
            .map(|(i, &d)| Stop::new(i, d))
            .collect();
        let vehicles = capacities
            .iter()
            .enumerate()
            .map(|(k, &c)| Vehicle::new(k, c))
            .collect();
        Self::new(stops, vehicles, distances, depot)
    }

    /// All stops, index = identifier.
    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    /// Vehicles sorted by identifier.
    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    /// The distance matrix.
    pub fn distances(&self) -> &DistanceMatrix {
        &self.distances
    }

    /// Per-stop demands, index = identifier.
    pub fn demands(&self) -> &[i32] {
        &self.demands
    }

    /// Depot identifier.
    pub fn depot(&self) -> usize {
        self.depot
    }

    /// Number of stops including the depot.
    pub fn num_stops(&self) -> usize {
        self.stops.len()
    }

    /// Number of vehicles.
    pub fn num_vehicles(&self) -> usize {
        self.vehicles.len()
    }

    /// Identifiers of all non-depot stops, ascending.
    pub fn customers(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.stops.len()).filter(move |&i| i != self.depot)
    }

    /// Vehicle with the given identifier.
    pub fn vehicle(&self, id: usize) -> Option<&Vehicle> {
        self.vehicles.iter().find(|v| v.id() == id)
    }

    /// Sum of all stop demands.
    pub fn total_demand(&self) -> i64 {
        self.demands.iter().map(|&d| i64::from(d)).sum()
    }

    /// Sum of all vehicle capacities.
    pub fn total_capacity(&self) -> i64 {
        self.vehicles.iter().map(|v| i64::from(v.capacity())).sum()
    }

    /// Largest single-vehicle capacity.
    pub fn max_capacity(&self) -> i32 {
        self.vehicles.iter().map(|v| v.capacity()).max().unwrap_or(0)
    }
}

impl DistanceModel for ProblemInstance {
    fn size(&self) -> usize {
        self.distances.size()
    }

    fn cost(&self, from: usize, to: usize) -> f64 {
        self.distances.get(from, to)
    }

    fn is_symmetric(&self) -> bool {
        self.distances.is_symmetric()
    }
}

impl DemandModel for ProblemInstance {
    fn demand(&self, stop: usize) -> i32 {
        self.demands[stop]
    }
}

/// Checks every instance invariant, returning the first one violated.
pub fn validate(
    stops: &[Stop],
    vehicles: &[Vehicle],
    distances: &DistanceMatrix,
    depot: usize,
) -> Result<(), InstanceViolation> {
    if stops.is_empty() {
        return Err(InstanceViolation::NoStops);
    }
    if depot >= stops.len() {
        return Err(InstanceViolation::DepotOutOfRange {
            depot,
            stops: stops.len(),
        });
    }
    if distances.size() != stops.len() {
        return Err(InstanceViolation::MatrixRowCount {
            rows: distances.size(),
            stops: stops.len(),
        });
    }
    for (index, stop) in stops.iter().enumerate() {
        if stop.id() != index {
            return Err(InstanceViolation::StopIdMismatch { index, id: stop.id() });
        }
        if stop.demand() < 0 {
            return Err(InstanceViolation::NegativeDemand {
                stop: index,
                demand: stop.demand(),
            });
        }
    }
    if stops[depot].demand() != 0 {
        return Err(InstanceViolation::DepotDemand {
            demand: stops[depot].demand(),
        });
    }
    if vehicles.is_empty() {
        return Err(InstanceViolation::NoVehicles);
    }
    let mut seen = HashSet::with_capacity(vehicles.len());
    for vehicle in vehicles {
        if !seen.insert(vehicle.id()) {
            return Err(InstanceViolation::DuplicateVehicle { id: vehicle.id() });
        }
        if vehicle.capacity() <= 0 {
            return Err(InstanceViolation::NonPositiveCapacity {
                vehicle: vehicle.id(),
                capacity: vehicle.capacity(),
            });
        }
    }
    Ok(())
}
