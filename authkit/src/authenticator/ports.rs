use async_trait::async_trait;

use crate::authenticator::errors::AuthenticatorError;
use crate::authenticator::models::Authenticator;
use crate::authenticator::models::LoginInfo;
use crate::repositories::RepositoryError;

/// Turns an authenticator into a token string.
pub trait AuthenticatorWriter: Send + Sync + 'static {
    /// Serialize an authenticator into the token handed to the client.
    ///
    /// # Arguments
    /// * `authenticator` - Authenticator to serialize
    ///
    /// # Returns
    /// Token string
    ///
    /// # Errors
    /// * `Jwt` - Token encoding failed
    fn write(&self, authenticator: &Authenticator) -> Result<String, AuthenticatorError>;
}

/// Turns a token string received from a client back into an authenticator.
#[async_trait]
pub trait AuthenticatorReader: Send + Sync + 'static {
    /// Reconstruct the authenticator a token stands for.
    ///
    /// # Arguments
    /// * `token` - Token string received from the client
    ///
    /// # Returns
    /// Reconstructed authenticator (not yet validated)
    ///
    /// # Errors
    /// * `Jwt` - Token could not be decoded
    /// * `MissingClaim` - Token lacks `jti` or `sub`
    /// * `InvalidLoginInfo` - Subject is not an encoded login info
    /// * `MissingAuthenticator` - No stored authenticator for the token
    /// * `Repository` - Backing store failed
    async fn read(&self, token: &str) -> Result<Authenticator, AuthenticatorError>;

    /// Whether `read` already resolves tokens through a backing store.
    fn is_stateful(&self) -> bool {
        false
    }
}

/// Backing store for authenticators, keyed by authenticator id.
#[async_trait]
pub trait AuthenticatorRepository: Send + Sync + 'static {
    /// Retrieve authenticator by id (the opaque token).
    ///
    /// # Returns
    /// Optional authenticator (None if not found)
    ///
    /// # Errors
    /// * `RepositoryError` - Store operation failed
    async fn find(&self, id: &str) -> Result<Option<Authenticator>, RepositoryError>;

    /// Insert or replace the authenticator stored under `id`.
    ///
    /// # Returns
    /// Stored authenticator
    ///
    /// # Errors
    /// * `RepositoryError` - Store operation failed
    async fn save(
        &self,
        id: &str,
        authenticator: Authenticator,
    ) -> Result<Authenticator, RepositoryError>;

    /// Remove the authenticator stored under `id`. Removing a missing id is not an error.
    ///
    /// # Errors
    /// * `RepositoryError` - Store operation failed
    async fn remove(&self, id: &str) -> Result<(), RepositoryError>;
}

/// Lookup of the application's identity for a login info.
#[async_trait]
pub trait IdentityService: Send + Sync + 'static {
    type Identity: Send + Sync + 'static;

    /// Retrieve the identity bound to a login info.
    ///
    /// # Returns
    /// Optional identity (None if the subject is unknown)
    ///
    /// # Errors
    /// * `RepositoryError` - Lookup failed
    async fn retrieve(&self, login_info: &LoginInfo)
        -> Result<Option<Self::Identity>, RepositoryError>;
}
