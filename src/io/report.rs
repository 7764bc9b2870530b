//! Solution report written by the CLI.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CvrpError;
use crate::io::InstanceData;
use crate::local_search::Termination;
use crate::models::{ProblemInstance, Route, Solution, Stop};
use crate::solver::{Infeasibility, SolveOutcome};

/// Serializable summary of a solve: one route per vehicle (empty vehicles
/// included as `[depot, depot]`), totals, feasibility and unassigned stops.
///
/// Coordinates and prices are copied from the instance when present, for
/// external renderers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolveReport {
    pub routes: Vec<Route>,
    pub total_distance: f64,
    pub total_load: i64,
    pub feasible: bool,
    pub unassigned: Vec<usize>,
    pub termination: Termination,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub infeasibility: Option<Infeasibility>,
    pub initial_distance: f64,
    pub elapsed_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Vec<(f64, f64)>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prices: Option<Vec<f64>>,
}

impl SolveReport {
    pub fn new(instance: &ProblemInstance, outcome: &SolveOutcome) -> Self {
        let stops = instance.stops();
        Self::with_attributes(
            outcome,
            stops.iter().map(Stop::location).collect(),
            stops.iter().map(Stop::price).collect(),
        )
    }

    /// Builds the report from the raw instance file the outcome was solved
    /// from, copying its coordinates and prices.
    pub fn for_data(data: &InstanceData, outcome: &SolveOutcome) -> Self {
        Self::with_attributes(outcome, data.coordinates.clone(), data.prices.clone())
    }

    fn with_attributes(outcome: &SolveOutcome, coordinates: Option<Vec<(f64, f64)>>, prices: Option<Vec<f64>>) -> Self {
        let solution = &outcome.solution;
        Self {
            routes: solution.routes().to_vec(),
            total_distance: solution.total_distance(),
            total_load: solution.total_load(),
            feasible: outcome.feasible(),
            unassigned: solution.unassigned().to_vec(),
            termination: outcome.termination,
            infeasibility: outcome.infeasibility.clone(),
            initial_distance: outcome.initial_distance,
            elapsed_ms: outcome.elapsed.as_millis() as u64,
            coordinates,
            prices,
        }
    }

    /// Rebuilds the solution carried by this report.
    pub fn to_solution(&self) -> Solution {
        let mut solution = Solution::new();
        for route in &self.routes {
            solution.add_route(route.clone());
        }
        for &stop in &self.unassigned {
            solution.add_unassigned(stop);
        }
        solution
    }

    /// Writes the report as pretty-printed JSON.
    pub fn write_to<W: Write>(&self, writer: W) -> Result<(), CvrpError> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Writes the report to a file, replacing it if present.
    pub fn write(&self, path: &Path) -> Result<(), CvrpError> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_to(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    pub fn from_json_str(json: &str) -> Result<Self, CvrpError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::solver::{Solver, SolverConfig};

    fn solved(data: &InstanceData) -> (ProblemInstance, SolveOutcome) {
        let inst = data.to_instance().expect("valid");
        let outcome = Solver::new(SolverConfig::default().with_time_limit(Duration::from_secs(2))).solve_instance(&inst);
        (inst, outcome)
    }

    fn data() -> InstanceData {
        InstanceData::new(
            vec![0, 5, 7, 4],
            vec![10, 10, 10],
            vec![
                vec![0.0, 4.0, 6.0, 5.0],
                vec![4.0, 0.0, 3.0, 7.0],
                vec![6.0, 3.0, 0.0, 2.0],
                vec![5.0, 7.0, 2.0, 0.0],
            ],
        )
    }

    #[test]
    fn test_report_lists_every_vehicle() {
        let (inst, outcome) = solved(&data());
        let report = SolveReport::new(&inst, &outcome);
        assert_eq!(report.routes.len(), 3);
        assert!(report.feasible);
        assert!(report.unassigned.is_empty());
        assert_eq!(report.total_load, 16);
        assert!(report.coordinates.is_none());
        for route in &report.routes {
            let seq = route.sequence();
            assert_eq!(seq.first(), Some(&0));
            assert_eq!(seq.last(), Some(&0));
        }
    }

    #[test]
    fn test_report_from_data_matches_instance() {
        let data = data()
            .with_coordinates(vec![(0.0, 0.0), (4.0, 0.0), (5.0, 3.0), (4.0, 5.0)])
            .with_prices(vec![0.0, 12.5, 7.0, 9.25]);
        let (inst, outcome) = solved(&data);
        assert_eq!(SolveReport::for_data(&data, &outcome), SolveReport::new(&inst, &outcome));
    }

    #[test]
    fn test_report_json_round_trip() {
        let (inst, outcome) = solved(&data().with_coordinates(vec![(0.0, 0.0), (4.0, 0.0), (5.0, 3.0), (4.0, 5.0)]));
        let report = SolveReport::new(&inst, &outcome);

        let mut buf = Vec::new();
        report.write_to(&mut buf).expect("write");
        let json = String::from_utf8(buf).expect("utf8");
        assert!(json.contains("\"sequence\""));
        assert!(json.contains("\"coordinates\""));
        assert!(!json.contains("\"prices\""));

        let back = SolveReport::from_json_str(&json).expect("parse");
        assert_eq!(back, report);
        let solution = back.to_solution();
        assert_eq!(solution, outcome.solution);
        assert_eq!(solution.total_distance(), outcome.solution.total_distance());
    }
}
