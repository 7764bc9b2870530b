//! JSON instance format.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::distance::DistanceMatrix;
use crate::error::{CvrpError, InstanceViolation};
use crate::models::{ProblemInstance, Stop, Vehicle};

/// Raw, unvalidated instance as read from a file.
///
/// Stop `i` has demand `demands[i]`; vehicle `k` has capacity
/// `vehicle_capacities[k]`. `stop_count`, when present, must match the
/// number of demands. Coordinates and prices are optional per-stop
/// attributes carried through for reporting.
///
/// # Examples
///
/// ```
/// use u_cvrp::io::InstanceData;
///
/// let json = r#"{
///     "depot": 0,
///     "demands": [0, 5, 7],
///     "vehicle_capacities": [10, 10],
///     "distance_matrix": [[0, 4, 6], [4, 0, 3], [6, 3, 0]]
/// }"#;
/// let data = InstanceData::from_json_str(json).unwrap();
/// let instance = data.to_instance().unwrap();
/// assert_eq!(instance.num_stops(), 3);
/// assert_eq!(instance.num_vehicles(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_count: Option<usize>,
    #[serde(default)]
    pub depot: usize,
    pub demands: Vec<i32>,
    pub vehicle_capacities: Vec<i32>,
    pub distance_matrix: Vec<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Vec<(f64, f64)>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prices: Option<Vec<f64>>,
}

impl InstanceData {
    /// Instance data with the depot at stop 0 and no optional attributes.
    pub fn new(demands: Vec<i32>, vehicle_capacities: Vec<i32>, distance_matrix: Vec<Vec<f64>>) -> Self {
        Self {
            stop_count: None,
            depot: 0,
            demands,
            vehicle_capacities,
            distance_matrix,
            coordinates: None,
            prices: None,
        }
    }

    pub fn with_depot(mut self, depot: usize) -> Self {
        self.depot = depot;
        self
    }

    pub fn with_coordinates(mut self, coordinates: Vec<(f64, f64)>) -> Self {
        self.coordinates = Some(coordinates);
        self
    }

    pub fn with_prices(mut self, prices: Vec<f64>) -> Self {
        self.prices = Some(prices);
        self
    }

    /// Parses instance data from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, CvrpError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parses instance data from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CvrpError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Reads instance data from a JSON file.
    pub fn read(path: &Path) -> Result<Self, CvrpError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Captures a validated instance in file form.
    pub fn from_instance(instance: &ProblemInstance) -> Self {
        let stops = instance.stops();
        let coordinates: Option<Vec<(f64, f64)>> = stops.iter().map(Stop::location).collect();
        let prices: Option<Vec<f64>> = stops.iter().map(Stop::price).collect();
        Self {
            stop_count: Some(instance.num_stops()),
            depot: instance.depot(),
            demands: instance.demands().to_vec(),
            vehicle_capacities: instance.vehicles().iter().map(Vehicle::capacity).collect(),
            distance_matrix: instance.distances().to_rows(),
            coordinates,
            prices,
        }
    }

    /// Validates the data and builds a [`ProblemInstance`].
    pub fn to_instance(&self) -> Result<ProblemInstance, InstanceViolation> {
        let n = self.demands.len();
        if let Some(declared) = self.stop_count {
            if declared != n {
                return Err(InstanceViolation::StopCountMismatch { declared, actual: n });
            }
        }
        if n == 0 {
            return Err(InstanceViolation::NoStops);
        }
        if self.distance_matrix.len() != n {
            return Err(InstanceViolation::MatrixRowCount {
                rows: self.distance_matrix.len(),
                stops: n,
            });
        }
        check_length("coordinates", self.coordinates.as_ref().map(Vec::len), n)?;
        check_length("prices", self.prices.as_ref().map(Vec::len), n)?;

        let distances = DistanceMatrix::from_rows(&self.distance_matrix)?;
        let stops = self
            .demands
            .iter()
            .enumerate()
            .map(|(i, &demand)| {
                let mut stop = Stop::new(i, demand);
                if let Some(&(x, y)) = self.coordinates.as_ref().and_then(|c| c.get(i)) {
                    stop = stop.with_location(x, y);
                }
                if let Some(&price) = self.prices.as_ref().and_then(|p| p.get(i)) {
                    stop = stop.with_price(price);
                }
                stop
            })
            .collect();
        let vehicles = self
            .vehicle_capacities
            .iter()
            .enumerate()
            .map(|(k, &capacity)| Vehicle::new(k, capacity))
            .collect();

        ProblemInstance::new(stops, vehicles, distances, self.depot)
    }
}

fn check_length(attribute: &'static str, len: Option<usize>, stops: usize) -> Result<(), InstanceViolation> {
    match len {
        Some(len) if len != stops => Err(InstanceViolation::AttributeLength { attribute, len, stops }),
        _ => Ok(()),
    }
}
