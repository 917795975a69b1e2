use thiserror::Error;

use crate::repositories::RepositoryError;

/// Error type for password operations.
#[derive(Debug, Clone, Error)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Password verification failed: {0}")]
    VerificationFailed(String),

    #[error("Invalid hasher parameters: {0}")]
    InvalidParameters(String),

    #[error("Hasher `{0}` is configured as both current and deprecated")]
    RegistryConflict(String),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Error returned by providers that authenticate submitted credentials.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("Invalid password: {0}")]
    InvalidPassword(String),

    #[error("Identity not found: {0}")]
    IdentityNotFound(String),

    #[error("Unsupported hasher: {0}")]
    UnsupportedHasher(String),

    #[error("Password error: {0}")]
    Password(#[from] PasswordError),
}
