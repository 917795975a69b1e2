use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Digest;
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::password::errors::PasswordError;
use crate::password::hasher::PasswordHasher;
use crate::password::models::PasswordInfo;

const SALT_SIZE: usize = 16;

/// Legacy salted SHA-256 hasher.
///
/// Only meant to verify passwords stored by older systems so they get
/// rehashed on the next successful login; register it as deprecated.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256PasswordHasher;

impl Sha256PasswordHasher {
    pub const ID: &'static str = "sha256-salted";

    fn digest(salt: &str, password: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(salt.as_bytes());
        hasher.update(password.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

impl PasswordHasher for Sha256PasswordHasher {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn hash(&self, password: &str) -> Result<PasswordInfo, PasswordError> {
        let mut bytes = [0u8; SALT_SIZE];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))?;
        let salt = STANDARD.encode(bytes);

        Ok(PasswordInfo::new(
            Self::ID,
            Self::digest(&salt, password),
            Some(salt),
        ))
    }

    fn matches(&self, info: &PasswordInfo, password: &str) -> Result<bool, PasswordError> {
        let salt = info
            .salt
            .as_deref()
            .ok_or_else(|| PasswordError::VerificationFailed("Missing salt".to_string()))?;

        Ok(Self::digest(salt, password)
            .as_bytes()
            .ct_eq(info.password.as_bytes())
            .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_matches() {
        let info = Sha256PasswordHasher.hash("legacy").unwrap();

        assert_eq!(info.hasher, "sha256-salted");
        assert_eq!(info.password.len(), 64);
        assert!(info.salt.is_some());
        assert!(Sha256PasswordHasher.matches(&info, "legacy").unwrap());
        assert!(!Sha256PasswordHasher.matches(&info, "Legacy").unwrap());
    }

    #[test]
    fn test_known_digest() {
        // sha256("saltpassword")
        let info = PasswordInfo::new(
            "sha256-salted",
            "13601bda4ea78e55a07b98866d2be6be0744e3866f13c00c811cab608a28f322",
            Some("salt".to_string()),
        );

        assert!(Sha256PasswordHasher.matches(&info, "password").unwrap());
    }

    #[test]
    fn test_same_length_digest_mismatch() {
        // sha256("saltpassword") with the last nibble changed
        let info = PasswordInfo::new(
            "sha256-salted",
            "13601bda4ea78e55a07b98866d2be6be0744e3866f13c00c811cab608a28f323",
            Some("salt".to_string()),
        );

        assert!(!Sha256PasswordHasher.matches(&info, "password").unwrap());
    }

    #[test]
    fn test_missing_salt() {
        let info = PasswordInfo::new("sha256-salted", "abc", None);
        assert!(matches!(
            Sha256PasswordHasher.matches(&info, "password"),
            Err(PasswordError::VerificationFailed(_))
        ));
    }
}
