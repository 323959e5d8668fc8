use thiserror::Error;

/// Top-level error type for the tubeline crate.
#[derive(Debug, Error)]
pub enum TubelineError {
    #[error(transparent)]
    Section(#[from] SectionError),

    #[error(transparent)]
    Operation(#[from] OperationError),
}

/// Errors raised when a section record is malformed.
///
/// These are rejected at construction so that the geometry pipeline never
/// sees them.
#[derive(Debug, Error)]
pub enum SectionError {
    #[error("contour arrays differ in length: {lateral} lateral vs {depth} depth values")]
    ContourLengthMismatch { lateral: usize, depth: usize },

    #[error("{which} scale must be positive, got {value}")]
    NonPositiveScale { which: &'static str, value: f64 },

    #[error("non-finite value in {0}")]
    NonFinite(&'static str),
}

/// Errors related to reconstruction operations.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("operation failed: {0}")]
    Failed(String),
}

/// Convenience type alias for results using [`TubelineError`].
pub type Result<T> = std::result::Result<T, TubelineError>;
