use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as _;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Algorithm;
use argon2::Argon2;
use argon2::Params;
use argon2::Version;

use crate::password::errors::PasswordError;
use crate::password::hasher::PasswordHasher;
use crate::password::models::PasswordInfo;

/// Argon2id password hasher producing PHC strings.
///
/// The salt and parameters travel inside the PHC string, so stored
/// password info carries no separate salt.
#[derive(Debug, Clone)]
pub struct Argon2PasswordHasher {
    params: Params,
}

impl Argon2PasswordHasher {
    pub const ID: &'static str = "argon2id";

    /// Create a hasher with explicit cost parameters.
    ///
    /// # Arguments
    /// * `memory_kib` - Memory cost in KiB
    /// * `iterations` - Number of passes
    /// * `parallelism` - Degree of parallelism
    ///
    /// # Errors
    /// * `InvalidParameters` - Parameters are outside Argon2's accepted range
    pub fn new(memory_kib: u32, iterations: u32, parallelism: u32) -> Result<Self, PasswordError> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|e| PasswordError::InvalidParameters(e.to_string()))?;

        Ok(Self { params })
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl Default for Argon2PasswordHasher {
    fn default() -> Self {
        Self {
            params: Params::default(),
        }
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn hash(&self, password: &str) -> Result<PasswordInfo, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| PasswordInfo::new(Self::ID, hash.to_string(), None))
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    fn matches(&self, info: &PasswordInfo, password: &str) -> Result<bool, PasswordError> {
        let parsed_hash = PasswordHash::new(&info.password).map_err(|e| {
            PasswordError::VerificationFailed(format!("Invalid password hash: {}", e))
        })?;

        // Verification reads algorithm and parameters from the PHC string.
        Ok(self
            .argon2()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    fn is_deprecated(&self, info: &PasswordInfo) -> bool {
        let Ok(parsed_hash) = PasswordHash::new(&info.password) else {
            return false;
        };
        if parsed_hash.algorithm.as_str() != Self::ID {
            return true;
        }

        match Params::try_from(&parsed_hash) {
            Ok(stored) => {
                stored.m_cost() != self.params.m_cost()
                    || stored.t_cost() != self.params.t_cost()
                    || stored.p_cost() != self.params.p_cost()
            }
            Err(_) => false,
        }
    }
}
