use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum SolverError {
    #[error("No solution satisfying every hard constraint was found")]
    NoSolutionFound,

    #[error("Invalid problem: {0}")]
    InvalidProblem(String),
}
