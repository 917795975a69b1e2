use std::sync::Arc;

use chrono::Duration;
use http::Request;
use http::Response;

use crate::authenticator::carrier::TokenCarrier;
use crate::authenticator::errors::AuthenticatorError;
use crate::authenticator::models::Authenticator;
use crate::authenticator::models::LoginInfo;
use crate::authenticator::ports::AuthenticatorReader;
use crate::authenticator::ports::AuthenticatorRepository;
use crate::authenticator::ports::AuthenticatorWriter;
use crate::authenticator::validators::AuthenticatorValidator;
use crate::authenticator::validators::ExpirationValidator;
use crate::authenticator::validators::FingerprintValidator;
use crate::authenticator::validators::SlidingWindowValidator;
use crate::authenticator::validators::ValidationContext;
use crate::authenticator::validators::ValidatorChain;
use crate::authenticator::validators::Validity;
use crate::util::Clock;
use crate::util::DefaultFingerprintGenerator;
use crate::util::FingerprintGenerator;
use crate::util::IdGenerator;
use crate::util::SecureRandomIdGenerator;
use crate::util::SystemClock;

/// Lifetime policy for authenticators issued by a service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuthenticatorSettings {
    /// Absolute lifetime; `None` issues authenticators that never expire
    pub expiry: Option<Duration>,

    /// Maximum idle time between two uses; `None` disables sliding expiry
    pub idle_timeout: Option<Duration>,

    /// Bind authenticators to the client fingerprint of the issuing request
    pub fingerprinting: bool,
}

/// Authenticator lifecycle: create, hand out, retrieve, refresh and revoke.
///
/// Generic over the token format (writer/reader pair) and the transport
/// (carrier). A backing store is optional for JWTs, where it enables
/// server-side revocation, and implied for opaque tokens.
pub struct AuthenticatorService<W, R, K>
where
    W: AuthenticatorWriter,
    R: AuthenticatorReader,
    K: TokenCarrier,
{
    writer: W,
    reader: R,
    carrier: K,
    repository: Option<Arc<dyn AuthenticatorRepository>>,
    validators: ValidatorChain,
    id_generator: Arc<dyn IdGenerator>,
    fingerprint_generator: Arc<dyn FingerprintGenerator>,
    clock: Arc<dyn Clock>,
    settings: AuthenticatorSettings,
}

impl<W, R, K> AuthenticatorService<W, R, K>
where
    W: AuthenticatorWriter,
    R: AuthenticatorReader,
    K: TokenCarrier,
{
    /// Create a new authenticator service.
    ///
    /// The validator chain starts with expiration, plus the sliding window
    /// when an idle timeout is set and the fingerprint check when
    /// fingerprinting is on.
    ///
    /// # Arguments
    /// * `writer` - Authenticator to token serialization
    /// * `reader` - Token to authenticator deserialization
    /// * `carrier` - Where tokens travel in HTTP messages
    /// * `settings` - Lifetime policy
    pub fn new(writer: W, reader: R, carrier: K, settings: AuthenticatorSettings) -> Self {
        let mut validators = ValidatorChain::new().with(ExpirationValidator);
        if let Some(window) = settings.idle_timeout {
            validators = validators.with(SlidingWindowValidator::new(window));
        }
        if settings.fingerprinting {
            validators = validators.with(FingerprintValidator);
        }

        Self {
            writer,
            reader,
            carrier,
            repository: None,
            validators,
            id_generator: Arc::new(SecureRandomIdGenerator::default()),
            fingerprint_generator: Arc::new(DefaultFingerprintGenerator),
            clock: Arc::new(SystemClock),
            settings,
        }
    }

    /// Persist authenticators in a backing store.
    pub fn with_repository(mut self, repository: Arc<dyn AuthenticatorRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    /// Append a validator to the default chain.
    pub fn with_validator(mut self, validator: impl AuthenticatorValidator) -> Self {
        self.validators = self.validators.with(validator);
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_id_generator(mut self, id_generator: Arc<dyn IdGenerator>) -> Self {
        self.id_generator = id_generator;
        self
    }

    pub fn with_fingerprint_generator(
        mut self,
        fingerprint_generator: Arc<dyn FingerprintGenerator>,
    ) -> Self {
        self.fingerprint_generator = fingerprint_generator;
        self
    }

    pub fn settings(&self) -> &AuthenticatorSettings {
        &self.settings
    }

    /// Create a fresh authenticator for a subject authenticated on `request`.
    ///
    /// # Arguments
    /// * `login_info` - Subject the authenticator is issued for
    /// * `request` - Request the subject authenticated with (fingerprint source)
    ///
    /// # Returns
    /// New, not yet persisted authenticator
    pub fn create<B>(&self, login_info: LoginInfo, request: &Request<B>) -> Authenticator {
        let now = self.clock.now();
        let mut authenticator = Authenticator::new(self.id_generator.generate(), login_info);

        match (self.settings.expiry, self.settings.idle_timeout) {
            (Some(expiry), _) => authenticator = authenticator.issued_at(now, expiry),
            (None, Some(_)) => authenticator = authenticator.with_touched(now),
            (None, None) => {}
        }

        if self.settings.fingerprinting {
            let fingerprint = self.fingerprint_generator.generate(request.headers());
            authenticator.fingerprint = Some(fingerprint);
        }

        tracing::debug!(
            authenticator_id = %authenticator.id,
            login_info = %authenticator.login_info,
            "Authenticator created"
        );

        authenticator
    }

    /// Persist the authenticator (when a store is configured) and serialize it.
    ///
    /// # Returns
    /// Token to hand to the client
    ///
    /// # Errors
    /// * `Repository` - Store failed; no token is produced
    /// * `Jwt` - Token encoding failed
    pub async fn init(&self, authenticator: &Authenticator) -> Result<String, AuthenticatorError> {
        if let Some(repository) = &self.repository {
            repository
                .save(&authenticator.id, authenticator.clone())
                .await?;
        }

        self.writer.write(authenticator)
    }

    /// Resolve and validate the authenticator sent with a request.
    ///
    /// # Returns
    /// The authenticator if the request carries a token that resolves to a
    /// valid one; `None` for no token, an unknown/revoked token or an
    /// authenticator rejected by the validator chain
    ///
    /// # Errors
    /// * `Jwt` - Token is fraudulent
    /// * `MissingClaim` / `InvalidLoginInfo` - Token is structurally wrong
    /// * `Repository` - Store failed
    pub async fn retrieve<B>(
        &self,
        request: &Request<B>,
    ) -> Result<Option<Authenticator>, AuthenticatorError> {
        let Some(token) = self.carrier.retrieve(request) else {
            return Ok(None);
        };

        let mut context = ValidationContext::new(self.clock.now());
        if self.settings.fingerprinting {
            context.fingerprint = Some(self.fingerprint_generator.generate(request.headers()));
        }

        let authenticator = match self.reader.read(&token).await {
            Ok(authenticator) => authenticator,
            Err(AuthenticatorError::MissingAuthenticator(_)) => {
                tracing::debug!("No stored authenticator for presented token");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        let authenticator = match &self.repository {
            Some(repository) if !self.reader.is_stateful() => {
                match repository.find(&authenticator.id).await? {
                    Some(stored) => stored,
                    None => {
                        tracing::debug!(
                            authenticator_id = %authenticator.id,
                            "Authenticator was revoked"
                        );
                        return Ok(None);
                    }
                }
            }
            _ => authenticator,
        };

        match self.validators.validate(&authenticator, &context) {
            Validity::Valid => Ok(Some(authenticator)),
            Validity::Invalid(reason) => {
                tracing::debug!(
                    authenticator_id = %authenticator.id,
                    reason = %reason,
                    "Authenticator is invalid"
                );
                Ok(None)
            }
        }
    }

    /// Record a use of the authenticator at the current instant.
    ///
    /// # Returns
    /// The touched authenticator and whether it must be written back via [`Self::update`]
    pub fn touch(&self, authenticator: &Authenticator) -> (Authenticator, bool) {
        authenticator.touch(self.clock.now())
    }

    /// Persist a changed authenticator and serialize it again.
    ///
    /// # Returns
    /// Token to hand to the client
    ///
    /// # Errors
    /// * `Repository` - Store failed
    /// * `Jwt` - Token encoding failed
    pub async fn update(
        &self,
        authenticator: &Authenticator,
    ) -> Result<String, AuthenticatorError> {
        self.init(authenticator).await
    }

    /// Replace an authenticator with a fresh one for the same subject.
    ///
    /// Tags, fingerprint and payload carry over; id and lifetime are new. The
    /// old record is removed from the store first.
    ///
    /// # Returns
    /// The new authenticator and its token
    ///
    /// # Errors
    /// * `Repository` - Store failed
    /// * `Jwt` - Token encoding failed
    pub async fn renew(
        &self,
        authenticator: &Authenticator,
    ) -> Result<(Authenticator, String), AuthenticatorError> {
        if let Some(repository) = &self.repository {
            repository.remove(&authenticator.id).await?;
        }

        let now = self.clock.now();
        let mut renewed = Authenticator {
            id: self.id_generator.generate(),
            touched: None,
            expires: None,
            ..authenticator.clone()
        };
        match (self.settings.expiry, self.settings.idle_timeout) {
            (Some(expiry), _) => renewed = renewed.issued_at(now, expiry),
            (None, Some(_)) => renewed = renewed.with_touched(now),
            (None, None) => {}
        }

        tracing::debug!(
            previous_id = %authenticator.id,
            authenticator_id = %renewed.id,
            "Authenticator renewed"
        );

        let token = self.init(&renewed).await?;
        Ok((renewed, token))
    }

    /// Hand a token to the client.
    pub fn embed<B>(&self, token: &str, response: Response<B>) -> Response<B> {
        self.carrier.embed(token, response)
    }

    /// Inject a token into a request, e.g. to authenticate a follow-up call.
    pub fn smuggle<B>(&self, token: &str, request: Request<B>) -> Request<B> {
        self.carrier.smuggle(token, request)
    }

    /// Revoke the authenticator and tell the client to drop its token.
    ///
    /// # Errors
    /// * `Repository` - Store failed; the response is not modified
    pub async fn discard<B>(
        &self,
        authenticator: &Authenticator,
        response: Response<B>,
    ) -> Result<Response<B>, AuthenticatorError> {
        if let Some(repository) = &self.repository {
            repository.remove(&authenticator.id).await?;
        }

        tracing::debug!(authenticator_id = %authenticator.id, "Authenticator discarded");

        Ok(self.carrier.discard(response))
    }
}
