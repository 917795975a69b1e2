use crate::password::errors::PasswordError;
use crate::password::models::PasswordInfo;

/// A password hashing algorithm.
pub trait PasswordHasher: Send + Sync + 'static {
    /// Identifier stored alongside every hash this hasher produces.
    fn id(&self) -> &'static str;

    /// Hash a plaintext password.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to hash
    ///
    /// # Returns
    /// Password info ready to be stored
    ///
    /// # Errors
    /// * `HashingFailed` - Hashing operation failed
    fn hash(&self, password: &str) -> Result<PasswordInfo, PasswordError>;

    /// Check a plaintext password against stored password info.
    ///
    /// # Returns
    /// True if the password matches, false otherwise
    ///
    /// # Errors
    /// * `VerificationFailed` - Stored info is malformed
    fn matches(&self, info: &PasswordInfo, password: &str) -> Result<bool, PasswordError>;

    /// Whether stored info was produced with weaker settings than the current ones.
    fn is_deprecated(&self, _info: &PasswordInfo) -> bool {
        false
    }

    /// Whether this hasher can check the stored info.
    fn is_suitable(&self, info: &PasswordInfo) -> bool {
        info.hasher == self.id()
    }
}
