pub mod algorithm;
pub mod claims;
pub mod codec;
pub mod errors;
pub mod strategy;

pub use algorithm::AlgorithmConfig;
pub use algorithm::DigestSize;
pub use algorithm::EcCurve;
pub use claims::Claims;
pub use claims::RESERVED_CLAIMS;
pub use codec::JwtCodec;
pub use errors::JwtError;
pub use strategy::JsonWebTokenStrategy;
pub use strategy::SigningStrategy;
