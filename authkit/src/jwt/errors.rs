use thiserror::Error;

/// Error type for JWT operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JwtError {
    #[error("Custom claim `{key}` collides with a reserved claim (reserved: {reserved})")]
    ReservedClaim { key: String, reserved: String },

    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Invalid key material: {0}")]
    InvalidKey(String),

    /// Every decode failure. Malformed, tampered and expired tokens are
    /// deliberately indistinguishable at this layer.
    #[error("Fraudulent token `{token}`: {cause}")]
    FraudulentToken { token: String, cause: String },
}

impl JwtError {
    pub(crate) fn fraudulent(token: &str, cause: impl ToString) -> Self {
        JwtError::FraudulentToken {
            token: token.to_string(),
            cause: cause.to_string(),
        }
    }
}
