use thiserror::Error;

use crate::domain::{InstanceError, SolutionStatus, SolverError, ValidationError};

pub type Result<T> = std::result::Result<T, PlacementError>;

#[derive(Debug, Error)]
pub enum PlacementError {
    #[error(transparent)]
    Instance(#[from] InstanceError),

    #[error("Solver error: {0}")]
    Solver(#[from] SolverError),

    /// Self-covering towers always satisfy the coverage rows, so this points
    /// at a broken model or an over-tight coverage mode.
    #[error("Exact formulation reported {status}: {message}")]
    InfeasibleFormulation {
        status: SolutionStatus,
        message: String,
    },

    #[error("Solver stopped without an incumbent: {0}")]
    NoIncumbent(String),

    #[error("Solver returned {got} values for {expected} variables")]
    MalformedResult { expected: usize, got: usize },

    #[error("{strategy} produced an invalid solution: {source}")]
    InvalidSolution {
        strategy: String,
        #[source]
        source: ValidationError,
    },
}
