//! Authentication toolkit library
//!
//! Provides the building blocks to authenticate requests with tokens:
//! - Authenticators bound to a login info, with expiry, sliding idle timeout and fingerprinting
//! - JWT encoding and decoding with reserved-claim protection and custom claims
//! - Opaque (stateful) tokens resolved through a backing store
//! - Password hashing (Argon2id) with rehash-on-upgrade of deprecated hashes
//!
//! Stores, identity lookup and HTTP transport are collaborators behind traits;
//! in-memory stores are provided for tests and tools.
//!
//! # Examples
//!
//! ## JWT Tokens
//! ```
//! use authkit::{AlgorithmConfig, Claims, JwtCodec};
//!
//! let algorithm = AlgorithmConfig::hmac("secret_key_at_least_32_bytes_long!");
//! let codec = JwtCodec::from_config(&algorithm).unwrap();
//! let claims = Claims::new().with_subject("user123").with_custom("role", "admin");
//! let token = codec.encode(&claims).unwrap();
//! let decoded = codec.decode(&token).unwrap();
//! assert_eq!(decoded, claims);
//! ```
//!
//! ## Authenticator Lifecycle
//! ```
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! use authkit::{
//!     AlgorithmConfig, AuthenticatorService, AuthenticatorSettings, HeaderCarrier, JwtCodec,
//!     JwtReader, JwtSettings, JwtWriter, LoginInfo,
//! };
//! use http::Request;
//!
//! let algorithm = AlgorithmConfig::hmac("secret_key_at_least_32_bytes_long!");
//! let codec = JwtCodec::from_config(&algorithm).unwrap();
//! let service = AuthenticatorService::new(
//!     JwtWriter::new(codec.clone(), JwtSettings::default()),
//!     JwtReader::new(codec),
//!     HeaderCarrier::default(),
//!     AuthenticatorSettings::default(),
//! );
//!
//! // Login: issue a token
//! let authenticator = service.create(LoginInfo::new("credentials", "alice"), &Request::new(()));
//! let token = service.init(&authenticator).await.unwrap();
//!
//! // Later: resolve it from a request
//! let request = service.smuggle(&token, Request::new(()));
//! let retrieved = service.retrieve(&request).await.unwrap();
//! assert_eq!(retrieved.map(|a| a.id), Some(authenticator.id));
//! # });
//! ```

pub mod authenticator;
pub mod config;
pub mod jwt;
pub mod password;
pub mod repositories;
pub mod util;

// Re-export commonly used items
pub use authenticator::Authenticator;
pub use authenticator::AuthenticatorError;
pub use authenticator::AuthenticatorService;
pub use authenticator::AuthenticatorSettings;
pub use authenticator::Environment;
pub use authenticator::HeaderCarrier;
pub use authenticator::JwtReader;
pub use authenticator::JwtSettings;
pub use authenticator::JwtWriter;
pub use authenticator::LoginInfo;
pub use authenticator::SatReader;
pub use authenticator::SatWriter;
pub use authenticator::SecuredRequest;
pub use jwt::AlgorithmConfig;
pub use jwt::Claims;
pub use jwt::JwtCodec;
pub use jwt::JwtError;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use password::PasswordOutcome;
pub use password::PasswordProvider;
pub use repositories::RepositoryError;
