use thiserror::Error;

/// Inputs missing before a run can start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("A location must be selected before querying")]
    MissingLocation,

    #[error("A date must be selected before querying")]
    MissingDate,

    #[error("At least one condition must be queried")]
    NoConditions,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
}
