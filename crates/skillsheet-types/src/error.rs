use thiserror::Error;

/// Errors from repository operations (used by trait definitions in
/// skillsheet-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,
}

/// Errors from the skill-evaluation operations.
///
/// Every variant is request-terminal: the operation aborts and the failure
/// is reported upward as-is. Nothing is swallowed or recovered locally.
#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error("access denied")]
    Forbidden,

    #[error("enrollment not found")]
    EnrollmentNotFound,

    #[error("course not found")]
    CourseNotFound,

    #[error("storage error: {0}")]
    Storage(String),
}

impl From<RepositoryError> for EvaluationError {
    fn from(e: RepositoryError) -> Self {
        EvaluationError::Storage(e.to_string())
    }
}
