use crate::authenticator::models::LoginInfo;
use crate::password::errors::ProviderError;
use crate::password::models::Credentials;
use crate::password::models::PasswordOutcome;
use crate::password::ports::PasswordInfoRepository;
use crate::password::provider::PasswordProvider;

/// Authenticates identifier/password pairs.
pub struct CredentialsProvider<R>
where
    R: PasswordInfoRepository,
{
    password_provider: PasswordProvider<R>,
}

impl<R> CredentialsProvider<R>
where
    R: PasswordInfoRepository,
{
    pub const ID: &'static str = "credentials";

    pub fn new(password_provider: PasswordProvider<R>) -> Self {
        Self { password_provider }
    }

    /// Login info a credentials identifier is stored under.
    pub fn login_info(identifier: &str) -> LoginInfo {
        LoginInfo::new(Self::ID, identifier)
    }

    /// Authenticate submitted credentials.
    ///
    /// # Arguments
    /// * `credentials` - Identifier and plaintext password
    ///
    /// # Returns
    /// Login info of the authenticated subject
    ///
    /// # Errors
    /// * `InvalidPassword` - Password does not match
    /// * `IdentityNotFound` - No password stored for the identifier
    /// * `UnsupportedHasher` - Stored password cannot be checked
    /// * `Password` - Store or hashing failure
    pub async fn authenticate(
        &self,
        credentials: &Credentials,
    ) -> Result<LoginInfo, ProviderError> {
        let login_info = Self::login_info(&credentials.identifier);

        match self
            .password_provider
            .authenticate(&login_info, &credentials.password)
            .await?
        {
            PasswordOutcome::Successful => {
                tracing::debug!(login_info = %login_info, "Credentials authenticated");
                Ok(login_info)
            }
            PasswordOutcome::InvalidPassword(reason) => Err(ProviderError::InvalidPassword(
                format!("{} for {}", reason, login_info),
            )),
            PasswordOutcome::NotFound(reason) => Err(ProviderError::IdentityNotFound(reason)),
            PasswordOutcome::UnsupportedHasher(reason) => {
                Err(ProviderError::UnsupportedHasher(reason))
            }
        }
    }
}
