use std::sync::Arc;

use crate::authenticator::models::LoginInfo;
use crate::password::errors::PasswordError;
use crate::password::models::PasswordOutcome;
use crate::password::ports::PasswordInfoRepository;
use crate::password::registry::PasswordHasherRegistry;

/// Verifies passwords against stored password info and upgrades outdated hashes.
pub struct PasswordProvider<R>
where
    R: PasswordInfoRepository,
{
    repository: Arc<R>,
    registry: PasswordHasherRegistry,
}

impl<R> PasswordProvider<R>
where
    R: PasswordInfoRepository,
{
    pub fn new(repository: Arc<R>, registry: PasswordHasherRegistry) -> Self {
        Self {
            repository,
            registry,
        }
    }

    pub fn registry(&self) -> &PasswordHasherRegistry {
        &self.registry
    }

    /// Check a password for a subject.
    ///
    /// On success with a deprecated hasher, or with stored settings the hasher
    /// reports as outdated, the password is rehashed with the current hasher
    /// and saved once.
    ///
    /// # Arguments
    /// * `login_info` - Subject whose stored password is checked
    /// * `password` - Plaintext password presented
    ///
    /// # Returns
    /// Outcome of the check; only `Successful` means the password matched
    ///
    /// # Errors
    /// * `Repository` - Lookup or rehash write failed
    /// * `VerificationFailed` - Stored info is malformed
    /// * `HashingFailed` - Rehashing failed
    pub async fn authenticate(
        &self,
        login_info: &LoginInfo,
        password: &str,
    ) -> Result<PasswordOutcome, PasswordError> {
        let Some(info) = self.repository.find(login_info).await? else {
            tracing::debug!(login_info = %login_info, "No password info stored");
            return Ok(PasswordOutcome::NotFound(format!(
                "No password info for {}",
                login_info
            )));
        };

        let Some(hasher) = self.registry.find(&info) else {
            tracing::warn!(
                login_info = %login_info,
                hasher = %info.hasher,
                "Stored password uses an unsupported hasher"
            );
            return Ok(PasswordOutcome::UnsupportedHasher(format!(
                "Stored password uses hasher `{}`, supported: {}",
                info.hasher,
                self.registry.ids()
            )));
        };

        if !hasher.matches(&info, password)? {
            return Ok(PasswordOutcome::InvalidPassword(
                "Password does not match".to_string(),
            ));
        }

        if self.registry.is_deprecated(hasher.id()) || hasher.is_deprecated(&info) {
            let current = self.registry.current();
            let upgraded = current.hash(password)?;
            self.repository.save(login_info, upgraded).await?;

            tracing::info!(
                login_info = %login_info,
                from = %info.hasher,
                to = %current.id(),
                "Password rehashed"
            );
        }

        Ok(PasswordOutcome::Successful)
    }
}
