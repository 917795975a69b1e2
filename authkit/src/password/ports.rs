use async_trait::async_trait;

use crate::authenticator::models::LoginInfo;
use crate::password::models::PasswordInfo;
use crate::repositories::RepositoryError;

/// Backing store for password info, keyed by login info.
#[async_trait]
pub trait PasswordInfoRepository: Send + Sync + 'static {
    /// Retrieve the password info stored for a subject.
    ///
    /// # Returns
    /// Optional password info (None if the subject has no password)
    ///
    /// # Errors
    /// * `RepositoryError` - Store operation failed
    async fn find(&self, login_info: &LoginInfo) -> Result<Option<PasswordInfo>, RepositoryError>;

    /// Insert or replace the password info stored for a subject.
    ///
    /// # Errors
    /// * `RepositoryError` - Store operation failed
    async fn save(
        &self,
        login_info: &LoginInfo,
        password_info: PasswordInfo,
    ) -> Result<(), RepositoryError>;
}
