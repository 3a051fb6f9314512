use thiserror::Error;

/// Errors raised at the configuration and host-control boundary.
///
/// The simulation itself has no failure modes: running out of money is a
/// lifecycle transition, not an error.
#[derive(Debug, Error, PartialEq)]
pub enum WorldError {
    #[error("speed multiplier must be 1, 2, 4 or 8 (got {0})")]
    InvalidSpeed(u32),
    #[error("activity log capacity must be non-zero")]
    ZeroLogCapacity,
    #[error("activity log capacity {capacity} exceeds the maximum of {max}")]
    LogCapacityTooLarge { capacity: usize, max: usize },
    #[error("founding population {founders} exceeds population cap {cap}")]
    FoundersExceedCap { founders: usize, cap: usize },
    #[error("{field} must be finite and non-negative (got {value})")]
    InvalidRate { field: &'static str, value: f64 },
    #[error("{field} must be a probability between 0 and 1 (got {value})")]
    InvalidProbability { field: &'static str, value: f64 },
    #[error("automaton grid must be at least 3x3 (got {cols}x{rows})")]
    AutomatonTooSmall { cols: usize, rows: usize },
    #[error("automaton grid {cols}x{rows} exceeds the maximum of {max} cells")]
    AutomatonTooLarge { cols: usize, rows: usize, max: usize },
    #[error("replication cost {cost} must be below the replication threshold {threshold}")]
    ReplicateCostExceedsThreshold { cost: f64, threshold: f64 },
    #[error("view refresh interval must be at least one frame")]
    ZeroRefreshInterval,
    #[error("unknown activity filter `{0}`")]
    UnknownFilter(String),
    #[error("invalid config: {0}")]
    Config(String),
}

impl From<serde_json::Error> for WorldError {
    fn from(err: serde_json::Error) -> Self {
        WorldError::Config(err.to_string())
    }
}
