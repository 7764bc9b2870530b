//! Dense distance matrix.

use serde::{Deserialize, Serialize};

use super::DistanceModel;
use crate::error::InstanceViolation;

/// A dense n×n distance matrix stored in row-major order.
///
/// Built either from explicit rows (validated) or from planar coordinates
/// (Euclidean). Once built it is never mutated.
///
/// # Examples
///
/// ```
/// use u_cvrp::distance::{DistanceMatrix, DistanceModel};
///
/// let dm = DistanceMatrix::from_rows(&[
///     vec![0.0, 5.0],
///     vec![5.0, 0.0],
/// ]).unwrap();
/// assert_eq!(dm.cost(0, 1), 5.0);
/// assert!(dm.is_symmetric());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")]
pub struct DistanceMatrix {
    data: Vec<f64>,
    size: usize,
    symmetric: bool,
}

impl DistanceMatrix {
    /// Creates a matrix from explicit rows.
    ///
    /// Fails if the rows are ragged, if any entry is negative or non-finite,
    /// or if any stop has a non-zero cost to itself.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, InstanceViolation> {
        let size = rows.len();
        let mut data = Vec::with_capacity(size * size);
        for (from, row) in rows.iter().enumerate() {
            if row.len() != size {
                return Err(InstanceViolation::MatrixRowLength {
                    row: from,
                    len: row.len(),
                    expected: size,
                });
            }
            for (to, &value) in row.iter().enumerate() {
                if !value.is_finite() {
                    return Err(InstanceViolation::NonFiniteDistance { from, to });
                }
                if value < 0.0 {
                    return Err(InstanceViolation::NegativeDistance { from, to, value });
                }
                if from == to && value != 0.0 {
                    return Err(InstanceViolation::NonZeroSelfCost { stop: from, value });
                }
                data.push(value);
            }
        }
        let symmetric = (0..size).all(|i| (i + 1..size).all(|j| data[i * size + j] == data[j * size + i]));
        Ok(Self {
            data,
            size,
            symmetric,
        })
    }

    /// Computes a Euclidean distance matrix from planar coordinates.
    pub fn from_points(points: &[(f64, f64)]) -> Self {
        let size = points.len();
        let mut data = vec![0.0; size * size];
        for i in 0..size {
            for j in (i + 1)..size {
                let dx = points[i].0 - points[j].0;
                let dy = points[i].1 - points[j].1;
                let d = (dx * dx + dy * dy).sqrt();
                data[i * size + j] = d;
                data[j * size + i] = d;
            }
        }
        Self {
            data,
            size,
            symmetric: true,
        }
    }

    /// Returns the distance from location `from` to location `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    /// Returns row `from` of the matrix.
    pub fn row(&self, from: usize) -> &[f64] {
        &self.data[from * self.size..(from + 1) * self.size]
    }

    /// Returns all rows as nested vectors.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        (0..self.size).map(|i| self.row(i).to_vec()).collect()
    }
}

impl DistanceModel for DistanceMatrix {
    fn size(&self) -> usize {
        self.size
    }

    fn cost(&self, from: usize, to: usize) -> f64 {
        self.get(from, to)
    }

    fn is_symmetric(&self) -> bool {
        self.symmetric
    }
}

impl TryFrom<Vec<Vec<f64>>> for DistanceMatrix {
    type Error = InstanceViolation;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self, Self::Error> {
        Self::from_rows(&rows)
    }
}

impl From<DistanceMatrix> for Vec<Vec<f64>> {
    fn from(matrix: DistanceMatrix) -> Self {
        matrix.to_rows()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_points() -> Vec<(f64, f64)> {
        vec![(0.0, 0.0), (3.0, 4.0), (0.0, 8.0)]
    }

    #[test]
    fn test_from_points() {
        let dm = DistanceMatrix::from_points(&sample_points());
        assert_eq!(dm.size(), 3);
        assert!((dm.get(0, 1) - 5.0).abs() < 1e-10);
        assert!((dm.get(0, 2) - 8.0).abs() < 1e-10);
        assert!((dm.get(0, 0)).abs() < 1e-10);
        assert!(dm.is_symmetric());
    }

    #[test]
    fn test_from_rows_asymmetric() {
        let dm = DistanceMatrix::from_rows(&[vec![0.0, 10.0], vec![15.0, 0.0]]).expect("valid");
        assert_eq!(dm.cost(0, 1), 10.0);
        assert_eq!(dm.cost(1, 0), 15.0);
        assert!(!dm.is_symmetric());
    }

    #[test]
    fn test_from_rows_ragged() {
        let err = DistanceMatrix::from_rows(&[vec![0.0, 1.0], vec![1.0]]).unwrap_err();
        assert_eq!(
            err,
            InstanceViolation::MatrixRowLength {
                row: 1,
                len: 1,
                expected: 2
            }
        );
    }

    #[test]
    fn test_from_rows_negative() {
        let err = DistanceMatrix::from_rows(&[vec![0.0, -1.0], vec![1.0, 0.0]]).unwrap_err();
        assert!(matches!(err, InstanceViolation::NegativeDistance { from: 0, to: 1, .. }));
    }

    #[test]
    fn test_from_rows_non_finite() {
        let err = DistanceMatrix::from_rows(&[vec![0.0, f64::NAN], vec![1.0, 0.0]]).unwrap_err();
        assert_eq!(err, InstanceViolation::NonFiniteDistance { from: 0, to: 1 });
    }

    #[test]
    fn test_from_rows_self_cost() {
        let err = DistanceMatrix::from_rows(&[vec![2.0, 1.0], vec![1.0, 0.0]]).unwrap_err();
        assert!(matches!(err, InstanceViolation::NonZeroSelfCost { stop: 0, .. }));
    }

    #[test]
    fn test_path_cost() {
        let dm = DistanceMatrix::from_points(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0)]);
        assert!((dm.path_cost(0, &[1, 2, 3]) - 6.0).abs() < 1e-10);
        assert_eq!(dm.path_cost(0, &[]), 0.0);
    }

    #[test]
    fn test_rows_round_trip() {
        let rows = vec![vec![0.0, 7.0, 9.0], vec![7.0, 0.0, 10.0], vec![9.0, 10.0, 0.0]];
        let dm = DistanceMatrix::from_rows(&rows).expect("valid");
        assert_eq!(dm.to_rows(), rows);
        assert_eq!(dm.row(2), &[9.0, 10.0, 0.0]);
    }
}
