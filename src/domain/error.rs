use std::collections::BTreeMap;

use thiserror::Error;

/// Field-keyed validation messages, keyed by wire field name
pub type FieldErrors = BTreeMap<String, Vec<String>>;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Authentication failed")]
    AuthenticationFailed,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Weak password (minimum 8 characters required)")]
    WeakPassword,

    #[error("Invalid session token: {0}")]
    InvalidToken(String),
}

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Not found")]
    NotFound,

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Object not found")]
    NotFound,

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Storage error: {0}")]
    Backend(String),
}

#[derive(Debug, Error)]
pub enum RecommendationError {
    #[error("Recommendation request failed: {0}")]
    Request(String),

    #[error("Malformed recommendation response: {0}")]
    MalformedResponse(String),
}

/// Failure of a registration pipeline operation.
///
/// Handlers consume this directly; permission failures are kept apart from
/// transient ones so they can be reported differently per environment.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Validation failed. Please check your inputs.")]
    Validation(FieldErrors),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("{0}")]
    Transient(String),
}

impl From<RepositoryError> for PipelineError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::PermissionDenied(detail) => Self::PermissionDenied(detail),
            other => Self::Transient(other.to_string()),
        }
    }
}

impl From<StorageError> for PipelineError {
    fn from(error: StorageError) -> Self {
        match error {
            StorageError::PermissionDenied(detail) => Self::PermissionDenied(detail),
            other => Self::Transient(other.to_string()),
        }
    }
}
