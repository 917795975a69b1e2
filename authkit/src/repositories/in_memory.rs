use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::authenticator::models::Authenticator;
use crate::authenticator::models::LoginInfo;
use crate::authenticator::ports::AuthenticatorRepository;
use crate::password::models::PasswordInfo;
use crate::password::ports::PasswordInfoRepository;
use crate::repositories::RepositoryError;

/// Process-local authenticator store.
///
/// Intended for tests, tools and single-process deployments; records are lost
/// on restart.
#[derive(Debug, Default)]
pub struct InMemoryAuthenticatorRepository {
    authenticators: RwLock<HashMap<String, Authenticator>>,
}

impl InMemoryAuthenticatorRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.authenticators.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.authenticators.read().await.is_empty()
    }
}

#[async_trait]
impl AuthenticatorRepository for InMemoryAuthenticatorRepository {
    async fn find(&self, id: &str) -> Result<Option<Authenticator>, RepositoryError> {
        Ok(self.authenticators.read().await.get(id).cloned())
    }

    async fn save(
        &self,
        id: &str,
        authenticator: Authenticator,
    ) -> Result<Authenticator, RepositoryError> {
        self.authenticators
            .write()
            .await
            .insert(id.to_string(), authenticator.clone());
        Ok(authenticator)
    }

    async fn remove(&self, id: &str) -> Result<(), RepositoryError> {
        self.authenticators.write().await.remove(id);
        Ok(())
    }
}

/// Process-local password info store keyed by login info.
#[derive(Debug, Default)]
pub struct InMemoryPasswordInfoRepository {
    passwords: RwLock<HashMap<LoginInfo, PasswordInfo>>,
}

impl InMemoryPasswordInfoRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PasswordInfoRepository for InMemoryPasswordInfoRepository {
    async fn find(&self, login_info: &LoginInfo) -> Result<Option<PasswordInfo>, RepositoryError> {
        Ok(self.passwords.read().await.get(login_info).cloned())
    }

    async fn save(
        &self,
        login_info: &LoginInfo,
        password_info: PasswordInfo,
    ) -> Result<(), RepositoryError> {
        self.passwords
            .write()
            .await
            .insert(login_info.clone(), password_info);
        Ok(())
    }
}
