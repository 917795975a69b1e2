use thiserror::Error;

/// Failure reported by a backing store collaborator.
///
/// Propagated unchanged through the authenticator and password layers so
/// callers keep the original cause.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Backing store unavailable: {0}")]
    Unavailable(String),

    #[error("Backing store operation timed out: {0}")]
    Timeout(String),

    #[error("Backing store error: {0}")]
    Backend(String),
}
