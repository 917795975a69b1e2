pub mod argon2;
pub mod credentials;
pub mod errors;
pub mod hasher;
pub mod models;
pub mod ports;
pub mod provider;
pub mod registry;
pub mod sha256;

pub use self::argon2::Argon2PasswordHasher;
pub use self::credentials::CredentialsProvider;
pub use self::errors::PasswordError;
pub use self::errors::ProviderError;
pub use self::hasher::PasswordHasher;
pub use self::models::Credentials;
pub use self::models::PasswordInfo;
pub use self::models::PasswordOutcome;
pub use self::ports::PasswordInfoRepository;
pub use self::provider::PasswordProvider;
pub use self::registry::PasswordHasherRegistry;
pub use self::sha256::Sha256PasswordHasher;
