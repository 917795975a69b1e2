use std::sync::Arc;

use async_trait::async_trait;

use crate::authenticator::errors::AuthenticatorError;
use crate::authenticator::models::Authenticator;
use crate::authenticator::ports::AuthenticatorReader;
use crate::authenticator::ports::AuthenticatorRepository;
use crate::authenticator::ports::AuthenticatorWriter;

/// Writes opaque (stateful) tokens: the authenticator id itself.
///
/// Persisting the authenticator is left to whoever owns the backing store.
#[derive(Debug, Clone, Copy, Default)]
pub struct SatWriter;

impl AuthenticatorWriter for SatWriter {
    fn write(&self, authenticator: &Authenticator) -> Result<String, AuthenticatorError> {
        Ok(authenticator.id.clone())
    }
}

/// Resolves opaque tokens through the backing store.
pub struct SatReader<AR>
where
    AR: AuthenticatorRepository,
{
    repository: Arc<AR>,
}

impl<AR> SatReader<AR>
where
    AR: AuthenticatorRepository,
{
    pub fn new(repository: Arc<AR>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<AR> AuthenticatorReader for SatReader<AR>
where
    AR: AuthenticatorRepository,
{
    async fn read(&self, token: &str) -> Result<Authenticator, AuthenticatorError> {
        self.repository
            .find(token)
            .await?
            .ok_or_else(|| AuthenticatorError::MissingAuthenticator(token.to_string()))
    }

    fn is_stateful(&self) -> bool {
        true
    }
}
