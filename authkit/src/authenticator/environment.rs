use std::sync::Arc;

use http::Request;

use crate::authenticator::carrier::TokenCarrier;
use crate::authenticator::errors::AuthenticatorError;
use crate::authenticator::models::Authenticator;
use crate::authenticator::ports::AuthenticatorReader;
use crate::authenticator::ports::AuthenticatorWriter;
use crate::authenticator::ports::IdentityService;
use crate::authenticator::service::AuthenticatorService;

/// A request whose authenticator is valid and whose subject is known.
#[derive(Debug, Clone)]
pub struct SecuredRequest<I> {
    pub identity: I,
    pub authenticator: Authenticator,
}

/// Binds an authenticator service to the application's identity lookup.
pub struct Environment<IS, W, R, K>
where
    IS: IdentityService,
    W: AuthenticatorWriter,
    R: AuthenticatorReader,
    K: TokenCarrier,
{
    identity_service: Arc<IS>,
    authenticator_service: Arc<AuthenticatorService<W, R, K>>,
}

impl<IS, W, R, K> Environment<IS, W, R, K>
where
    IS: IdentityService,
    W: AuthenticatorWriter,
    R: AuthenticatorReader,
    K: TokenCarrier,
{
    pub fn new(
        identity_service: Arc<IS>,
        authenticator_service: Arc<AuthenticatorService<W, R, K>>,
    ) -> Self {
        Self {
            identity_service,
            authenticator_service,
        }
    }

    pub fn authenticator_service(&self) -> &AuthenticatorService<W, R, K> {
        &self.authenticator_service
    }

    /// Resolve the identity behind a request.
    ///
    /// # Arguments
    /// * `request` - Incoming request
    ///
    /// # Returns
    /// The identity and its authenticator, or `None` when the request has no
    /// valid authenticator or the subject is no longer known
    ///
    /// # Errors
    /// * `AuthenticatorError` - Token is fraudulent or a store failed
    pub async fn secured<B>(
        &self,
        request: &Request<B>,
    ) -> Result<Option<SecuredRequest<IS::Identity>>, AuthenticatorError> {
        let Some(authenticator) = self.authenticator_service.retrieve(request).await? else {
            return Ok(None);
        };

        match self
            .identity_service
            .retrieve(&authenticator.login_info)
            .await?
        {
            Some(identity) => Ok(Some(SecuredRequest {
                identity,
                authenticator,
            })),
            None => {
                tracing::debug!(
                    login_info = %authenticator.login_info,
                    "No identity for authenticated subject"
                );
                Ok(None)
            }
        }
    }
}
