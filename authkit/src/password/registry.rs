use std::sync::Arc;

use crate::password::errors::PasswordError;
use crate::password::hasher::PasswordHasher;
use crate::password::models::PasswordInfo;

/// The hasher new passwords are hashed with, plus hashers only kept to
/// verify (and then upgrade) older passwords.
#[derive(Clone)]
pub struct PasswordHasherRegistry {
    current: Arc<dyn PasswordHasher>,
    deprecated: Vec<Arc<dyn PasswordHasher>>,
}

impl PasswordHasherRegistry {
    /// Create a registry.
    ///
    /// # Arguments
    /// * `current` - Hasher for new and upgraded passwords
    /// * `deprecated` - Hashers accepted for verification only, in lookup order
    ///
    /// # Errors
    /// * `RegistryConflict` - `current` is also listed as deprecated
    pub fn new(
        current: Arc<dyn PasswordHasher>,
        deprecated: Vec<Arc<dyn PasswordHasher>>,
    ) -> Result<Self, PasswordError> {
        if deprecated.iter().any(|hasher| hasher.id() == current.id()) {
            return Err(PasswordError::RegistryConflict(current.id().to_string()));
        }

        Ok(Self {
            current,
            deprecated,
        })
    }

    pub fn current(&self) -> &Arc<dyn PasswordHasher> {
        &self.current
    }

    pub fn deprecated(&self) -> &[Arc<dyn PasswordHasher>] {
        &self.deprecated
    }

    /// All hashers, current first.
    pub fn all(&self) -> impl Iterator<Item = &Arc<dyn PasswordHasher>> {
        std::iter::once(&self.current).chain(self.deprecated.iter())
    }

    /// First hasher able to check the stored info, current first.
    pub fn find(&self, info: &PasswordInfo) -> Option<&Arc<dyn PasswordHasher>> {
        self.all().find(|hasher| hasher.is_suitable(info))
    }

    /// Whether the hasher with this id is listed as deprecated.
    pub fn is_deprecated(&self, id: &str) -> bool {
        self.deprecated.iter().any(|hasher| hasher.id() == id)
    }

    /// Comma separated ids of all hashers.
    pub fn ids(&self) -> String {
        self.all()
            .map(|hasher| hasher.id())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::password::argon2::Argon2PasswordHasher;
    use crate::password::sha256::Sha256PasswordHasher;

    fn registry() -> PasswordHasherRegistry {
        PasswordHasherRegistry::new(
            Arc::new(Argon2PasswordHasher::default()),
            vec![Arc::new(Sha256PasswordHasher)],
        )
        .expect("Failed to create registry")
    }

    #[test]
    fn test_all_lists_current_first() {
        let ids: Vec<_> = registry().all().map(|hasher| hasher.id()).collect();
        assert_eq!(ids, vec!["argon2id", "sha256-salted"]);
        assert_eq!(registry().ids(), "argon2id, sha256-salted");
    }

    #[test]
    fn test_find_suitable_hasher() {
        let registry = registry();

        let legacy = PasswordInfo::new("sha256-salted", "x", Some("s".to_string()));
        assert_eq!(registry.find(&legacy).map(|h| h.id()), Some("sha256-salted"));
        assert!(registry.is_deprecated("sha256-salted"));

        let current = PasswordInfo::new("argon2id", "x", None);
        assert_eq!(registry.find(&current).map(|h| h.id()), Some("argon2id"));
        assert!(!registry.is_deprecated("argon2id"));

        assert!(registry.find(&PasswordInfo::new("bcrypt-v9", "x", None)).is_none());
    }

    #[test]
    fn test_current_cannot_be_deprecated() {
        let result = PasswordHasherRegistry::new(
            Arc::new(Sha256PasswordHasher),
            vec![Arc::new(Sha256PasswordHasher)],
        );

        assert!(matches!(
            result,
            Err(PasswordError::RegistryConflict(id)) if id == "sha256-salted"
        ));
    }
}
