use std::env;
use std::sync::Arc;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;
use thiserror::Error;

use crate::authenticator::carrier::HeaderCarrier;
use crate::authenticator::jwt::JwtSettings;
use crate::authenticator::service::AuthenticatorSettings;
use crate::jwt::AlgorithmConfig;
use crate::jwt::JwtCodec;
use crate::jwt::JwtError;
use crate::password::Argon2PasswordHasher;
use crate::password::PasswordError;
use crate::password::PasswordHasher;
use crate::password::PasswordHasherRegistry;
use crate::password::Sha256PasswordHasher;
use crate::util::SecureRandomIdGenerator;

/// Setting values that parse but cannot be used.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("`{key}` must be a positive number of seconds, got {value}")]
    InvalidDuration { key: &'static str, value: i64 },

    #[error("`authenticator.id_size` must be at least one byte")]
    InvalidIdSize,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub jwt: JwtConfig,
    pub authenticator: AuthenticatorConfig,
    pub password: PasswordConfig,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct JwtConfig {
    /// Signing algorithm and key material; tokens cannot be issued without it
    pub algorithm: Option<AlgorithmConfig>,
    pub issuer: Option<String>,
    pub audience: Option<Vec<String>>,
    pub not_before: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AuthenticatorConfig {
    pub expiry_seconds: Option<i64>,
    pub idle_timeout_seconds: Option<i64>,
    pub fingerprinting: bool,
    pub header_name: String,
    pub id_size: usize,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PasswordConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
    /// Ids of hashers only accepted to verify, then upgrade, stored passwords
    pub deprecated: Vec<String>,
}

impl Default for AuthenticatorConfig {
    fn default() -> Self {
        Self {
            expiry_seconds: Some(12 * 60 * 60),
            idle_timeout_seconds: None,
            fingerprinting: true,
            header_name: HeaderCarrier::DEFAULT_HEADER.to_string(),
            id_size: SecureRandomIdGenerator::DEFAULT_SIZE,
        }
    }
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            memory_kib: argon2::Params::DEFAULT_M_COST,
            iterations: argon2::Params::DEFAULT_T_COST,
            parallelism: argon2::Params::DEFAULT_P_COST,
            deprecated: vec![Sha256PasswordHasher::ID.to_string()],
        }
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (JWT__ISSUER, AUTHENTICATOR__EXPIRY_SECONDS, etc.);
    ///    list settings take comma separated values (JWT__AUDIENCE=web,mobile)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Same as [`Config::load`], reading config files from `directory`.
    pub fn load_from(directory: &str) -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name(&format!("{}/default", directory)).required(false))
            .add_source(File::with_name(&format!("{}/{}", directory, run_mode)).required(false))
            // Example: JWT__ISSUER=auth.example.com overrides jwt.issuer
            .add_source(environment())
            .build()?;

        configuration.try_deserialize()
    }
}

fn environment() -> Environment {
    Environment::default()
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("password.deprecated")
        .with_list_parse_key("jwt.audience")
}

fn seconds(
    key: &'static str,
    value: Option<i64>,
) -> Result<Option<Duration>, ConfigurationError> {
    value
        .map(|v| {
            Duration::try_seconds(v)
                .filter(|_| v > 0)
                .ok_or(ConfigurationError::InvalidDuration { key, value: v })
        })
        .transpose()
}

impl JwtConfig {
    /// Build the codec for the configured algorithm.
    ///
    /// # Errors
    /// * `InvalidKey` - No algorithm configured or key material is unusable
    pub fn codec(&self) -> Result<JwtCodec, JwtError> {
        let algorithm = self
            .algorithm
            .as_ref()
            .ok_or_else(|| JwtError::InvalidKey("No signing algorithm configured".to_string()))?;

        JwtCodec::from_config(algorithm)
    }

    pub fn settings(&self) -> JwtSettings {
        JwtSettings {
            issuer: self.issuer.clone(),
            audience: self.audience.clone(),
            not_before: self.not_before,
        }
    }
}

impl AuthenticatorConfig {
    /// # Errors
    /// * `InvalidDuration` - A lifetime is zero, negative or out of range
    pub fn settings(&self) -> Result<AuthenticatorSettings, ConfigurationError> {
        Ok(AuthenticatorSettings {
            expiry: seconds("authenticator.expiry_seconds", self.expiry_seconds)?,
            idle_timeout: seconds(
                "authenticator.idle_timeout_seconds",
                self.idle_timeout_seconds,
            )?,
            fingerprinting: self.fingerprinting,
        })
    }

    /// # Errors
    /// * `InvalidHeaderName` - `header_name` is not a valid HTTP header name
    pub fn carrier(&self) -> Result<HeaderCarrier, http::header::InvalidHeaderName> {
        HeaderCarrier::named(&self.header_name)
    }

    /// # Errors
    /// * `InvalidIdSize` - `id_size` is zero
    pub fn id_generator(&self) -> Result<SecureRandomIdGenerator, ConfigurationError> {
        if self.id_size == 0 {
            return Err(ConfigurationError::InvalidIdSize);
        }
        Ok(SecureRandomIdGenerator::new(self.id_size))
    }
}

impl PasswordConfig {
    /// Build the hasher registry: Argon2id as current, then the deprecated hashers.
    ///
    /// # Errors
    /// * `InvalidParameters` - Argon2 costs are out of range or a deprecated id is unknown
    /// * `RegistryConflict` - The current hasher is listed as deprecated
    pub fn registry(&self) -> Result<PasswordHasherRegistry, PasswordError> {
        let current =
            Argon2PasswordHasher::new(self.memory_kib, self.iterations, self.parallelism)?;

        let deprecated = self
            .deprecated
            .iter()
            .map(|id| -> Result<Arc<dyn PasswordHasher>, PasswordError> {
                match id.as_str() {
                    Sha256PasswordHasher::ID => Ok(Arc::new(Sha256PasswordHasher)),
                    Argon2PasswordHasher::ID => Ok(Arc::new(current.clone())),
                    other => Err(PasswordError::InvalidParameters(format!(
                        "Unknown password hasher `{}`",
                        other
                    ))),
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        PasswordHasherRegistry::new(Arc::new(current), deprecated)
    }
}
