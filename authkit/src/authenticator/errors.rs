use thiserror::Error;

use crate::jwt::JwtError;
use crate::repositories::RepositoryError;

/// Error for authenticator transformation and lifecycle operations.
#[derive(Debug, Clone, Error)]
pub enum AuthenticatorError {
    #[error("JWT error: {0}")]
    Jwt(#[from] JwtError),

    #[error("Token is missing required claim: {0}")]
    MissingClaim(&'static str),

    #[error("Cannot parse login info from `{value}`: {cause}")]
    InvalidLoginInfo { value: String, cause: String },

    #[error("Missing authenticator for token: {0}")]
    MissingAuthenticator(String),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}
