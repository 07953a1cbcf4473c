use thiserror::Error;

use crate::planner::SolveStatus;

/// Planning errors
#[derive(Debug, Error)]
pub enum PlanningError {
    #[error("Invalid plan: {0}")]
    InvalidPlan(String),
    #[error("Unknown product: {0}")]
    UnknownProduct(String),
    #[error("No optimal solution ({status}): {message}")]
    NotOptimal { status: SolveStatus, message: String },
    #[error("Solver error: {0}")]
    Solver(String),
    #[error("Solver {backend} unavailable: {message}")]
    SolverUnavailable { backend: String, message: String },
}

pub type Result<T, E = PlanningError> = std::result::Result<T, E>;
