//! Error types.
//!
//! Only malformed input and I/O failures are errors. An instance whose demand
//! cannot be fully served, or a search cut short by its deadline, still
//! produces a [`SolveOutcome`](crate::solver::SolveOutcome).

use std::fmt;

/// An invariant of a problem instance that failed validation.
#[derive(Debug, Clone, PartialEq)]
pub enum InstanceViolation {
    /// The instance has no stops at all (not even a depot).
    NoStops,
    /// The declared stop count disagrees with the demand list.
    StopCountMismatch {
        /// Declared stop count.
        declared: usize,
        /// Number of demands supplied.
        actual: usize,
    },
    /// The depot index does not name a stop.
    DepotOutOfRange {
        /// Depot index.
        depot: usize,
        /// Number of stops.
        stops: usize,
    },
    /// The distance matrix does not have one row per stop.
    MatrixRowCount {
        /// Rows in the matrix.
        rows: usize,
        /// Number of stops.
        stops: usize,
    },
    /// A matrix row does not have one column per stop.
    MatrixRowLength {
        /// Row index.
        row: usize,
        /// Row length.
        len: usize,
        /// Expected length.
        expected: usize,
    },
    /// A distance is negative.
    NegativeDistance {
        /// Origin stop.
        from: usize,
        /// Destination stop.
        to: usize,
        /// Offending value.
        value: f64,
    },
    /// A distance is NaN or infinite.
    NonFiniteDistance {
        /// Origin stop.
        from: usize,
        /// Destination stop.
        to: usize,
    },
    /// A stop has a non-zero cost to itself.
    NonZeroSelfCost {
        /// Stop index.
        stop: usize,
        /// Offending value.
        value: f64,
    },
    /// A stop has a negative demand.
    NegativeDemand {
        /// Stop index.
        stop: usize,
        /// Offending demand.
        demand: i32,
    },
    /// A stop's identifier does not match its position.
    StopIdMismatch {
        /// Position in the stop list.
        index: usize,
        /// Identifier found there.
        id: usize,
    },
    /// The depot carries demand.
    DepotDemand {
        /// Depot demand.
        demand: i32,
    },
    /// No vehicles were supplied.
    NoVehicles,
    /// Two vehicles share an identifier.
    DuplicateVehicle {
        /// Repeated identifier.
        id: usize,
    },
    /// A vehicle has zero or negative capacity.
    NonPositiveCapacity {
        /// Vehicle index.
        vehicle: usize,
        /// Offending capacity.
        capacity: i32,
    },
    /// An optional per-stop attribute list has the wrong length.
    AttributeLength {
        /// Attribute name.
        attribute: &'static str,
        /// List length.
        len: usize,
        /// Number of stops.
        stops: usize,
    },
}

impl fmt::Display for InstanceViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoStops => write!(f, "instance has no stops"),
            Self::StopCountMismatch { declared, actual } => {
                write!(f, "stop count is {declared} but {actual} demands were given")
            }
            Self::DepotOutOfRange { depot, stops } => {
                write!(f, "depot index {depot} is out of range for {stops} stops")
            }
            Self::MatrixRowCount { rows, stops } => {
                write!(f, "distance matrix has {rows} rows, expected {stops}")
            }
            Self::MatrixRowLength { row, len, expected } => {
                write!(f, "distance matrix row {row} has {len} columns, expected {expected}")
            }
            Self::NegativeDistance { from, to, value } => {
                write!(f, "distance {from} -> {to} is negative ({value})")
            }
            Self::NonFiniteDistance { from, to } => {
                write!(f, "distance {from} -> {to} is not finite")
            }
            Self::NonZeroSelfCost { stop, value } => {
                write!(f, "self cost of stop {stop} is {value}, expected 0")
            }
            Self::NegativeDemand { stop, demand } => {
                write!(f, "stop {stop} has negative demand {demand}")
            }
            Self::StopIdMismatch { index, id } => {
                write!(f, "stop at position {index} has identifier {id}")
            }
            Self::DepotDemand { demand } => write!(f, "depot demand is {demand}, expected 0"),
            Self::NoVehicles => write!(f, "at least one vehicle is required"),
            Self::DuplicateVehicle { id } => write!(f, "vehicle identifier {id} is used twice"),
            Self::NonPositiveCapacity { vehicle, capacity } => {
                write!(f, "vehicle {vehicle} has non-positive capacity {capacity}")
            }
            Self::AttributeLength {
                attribute,
                len,
                stops,
            } => write!(f, "{attribute} has {len} entries, expected {stops}"),
        }
    }
}

/// Error type for the routing engine.
#[derive(Debug)]
pub enum CvrpError {
    /// The problem instance failed validation. Never retried.
    InvalidInstance(InstanceViolation),
    /// Reading or writing a file failed.
    Io(std::io::Error),
    /// JSON could not be parsed or produced.
    Format(serde_json::Error),
    /// A command-line argument could not be interpreted.
    InvalidArgument(String),
}

impl fmt::Display for CvrpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CvrpError::InvalidInstance(violation) => write!(f, "invalid instance: {violation}"),
            CvrpError::Io(e) => write!(f, "I/O error: {e}"),
            CvrpError::Format(e) => write!(f, "format error: {e}"),
            CvrpError::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
        }
    }
}

impl std::error::Error for CvrpError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CvrpError::Io(e) => Some(e),
            CvrpError::Format(e) => Some(e),
            _ => None,
        }
    }
}

impl From<InstanceViolation> for CvrpError {
    fn from(violation: InstanceViolation) -> Self {
        CvrpError::InvalidInstance(violation)
    }
}

impl From<std::io::Error> for CvrpError {
    fn from(e: std::io::Error) -> Self {
        CvrpError::Io(e)
    }
}

impl From<serde_json::Error> for CvrpError {
    fn from(e: serde_json::Error) -> Self {
        CvrpError::Format(e)
    }
}
