use serde::Deserialize;
use serde::Serialize;

/// Stored password of a subject, as produced by a password hasher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordInfo {
    /// Id of the hasher that produced `password`
    pub hasher: String,

    /// Hashed password, in the hasher's own format
    pub password: String,

    /// Salt, for hashers that do not embed it in `password`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salt: Option<String>,
}

impl PasswordInfo {
    pub fn new(
        hasher: impl Into<String>,
        password: impl Into<String>,
        salt: Option<String>,
    ) -> Self {
        Self {
            hasher: hasher.into(),
            password: password.into(),
            salt,
        }
    }
}

/// Identifier and plaintext password submitted by a user.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    pub identifier: String,
    pub password: String,
}

impl Credentials {
    pub fn new(identifier: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("identifier", &self.identifier)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Result of checking a password against stored password info.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasswordOutcome {
    Successful,
    InvalidPassword(String),
    UnsupportedHasher(String),
    NotFound(String),
}
