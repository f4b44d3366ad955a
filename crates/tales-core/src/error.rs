//! Error types for the domain, the store port and the repository boundary.

use thiserror::Error;

/// Domain errors - business rule failures raised before touching the store.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Errors reported by a `PostStore` implementation.
///
/// The hosted store does not tell "missing" apart from "not yours", so a
/// row-level authorization failure is reported as `NotFound`.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("Store connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Row not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

/// Classification of a failure as seen by repository consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A mutation was attempted without a signed-in identity.
    Unauthenticated,
    /// The target row is absent or not owned by the caller.
    NotFound,
    /// Network or service failure.
    Transient,
}

impl From<&StoreError> for ErrorKind {
    fn from(err: &StoreError) -> Self {
        match err {
            StoreError::NotFound => ErrorKind::NotFound,
            StoreError::Connection(_) | StoreError::Query(_) | StoreError::Constraint(_) => {
                ErrorKind::Transient
            }
        }
    }
}

/// Uniform error shape returned across the repository boundary.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct RepositoryError {
    pub kind: ErrorKind,
    pub message: String,
    #[source]
    pub cause: Option<StoreError>,
}

impl RepositoryError {
    pub fn unauthenticated() -> Self {
        Self {
            kind: ErrorKind::Unauthenticated,
            message: "You must be signed in to do that.".to_string(),
            cause: None,
        }
    }

    /// Wrap a store failure with the operation's generic message.
    pub fn from_store(message: impl Into<String>, cause: StoreError) -> Self {
        Self {
            kind: ErrorKind::from(&cause),
            message: message.into(),
            cause: Some(cause),
        }
    }

    /// Text shown to the user: the store's own message when there is one,
    /// otherwise the generic one.
    pub fn description(&self) -> String {
        match &self.cause {
            Some(cause) => cause.to_string(),
            None => self.message.clone(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == ErrorKind::NotFound
    }
}
