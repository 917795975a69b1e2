pub mod carrier;
pub mod environment;
pub mod errors;
pub mod jwt;
pub mod models;
pub mod ports;
pub mod sat;
pub mod service;
pub mod validators;

pub use carrier::HeaderCarrier;
pub use carrier::TokenCarrier;
pub use environment::Environment;
pub use environment::SecuredRequest;
pub use errors::AuthenticatorError;
pub use jwt::JwtReader;
pub use jwt::JwtSettings;
pub use jwt::JwtWriter;
pub use models::Authenticator;
pub use models::LoginInfo;
pub use ports::AuthenticatorReader;
pub use ports::AuthenticatorRepository;
pub use ports::AuthenticatorWriter;
pub use ports::IdentityService;
pub use sat::SatReader;
pub use sat::SatWriter;
pub use service::AuthenticatorService;
pub use service::AuthenticatorSettings;
pub use validators::AuthenticatorValidator;
pub use validators::ExpirationValidator;
pub use validators::FingerprintValidator;
pub use validators::SlidingWindowValidator;
pub use validators::ValidationContext;
pub use validators::ValidatorChain;
pub use validators::Validity;
