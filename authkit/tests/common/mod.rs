#![allow(dead_code)]

use std::sync::Arc;

use authkit::authenticator::AuthenticatorService;
use authkit::authenticator::AuthenticatorSettings;
use authkit::authenticator::HeaderCarrier;
use authkit::authenticator::JwtReader;
use authkit::authenticator::JwtSettings;
use authkit::authenticator::JwtWriter;
use authkit::jwt::AlgorithmConfig;
use authkit::jwt::DigestSize;
use authkit::jwt::EcCurve;
use authkit::jwt::JwtCodec;
use authkit::password::Argon2PasswordHasher;
use authkit::password::CredentialsProvider;
use authkit::password::PasswordHasherRegistry;
use authkit::password::PasswordProvider;
use authkit::password::Sha256PasswordHasher;
use authkit::repositories::InMemoryAuthenticatorRepository;
use authkit::repositories::InMemoryPasswordInfoRepository;
use authkit::util::Clock;
use authkit::util::FixedClock;
use chrono::DateTime;
use chrono::TimeZone;
use chrono::Utc;

pub const RSA_PRIVATE_KEY: &str = include_str!("../fixtures/rsa_private.pem");
pub const RSA_PUBLIC_KEY: &str = include_str!("../fixtures/rsa_public.pem");
pub const EC_PRIVATE_KEY: &str = include_str!("../fixtures/ec_private.pem");
pub const EC_PUBLIC_KEY: &str = include_str!("../fixtures/ec_public.pem");

pub const HMAC_SECRET: &str = "integration_test_secret_32_bytes!";

pub type JwtAuthenticatorService = AuthenticatorService<JwtWriter, JwtReader, HeaderCarrier>;

pub fn rsa(private: bool) -> AlgorithmConfig {
    AlgorithmConfig::Rsa {
        private_key: private.then(|| RSA_PRIVATE_KEY.to_string()),
        public_key: RSA_PUBLIC_KEY.to_string(),
        digest: DigestSize::Sha256,
    }
}

pub fn rsa_pss(private: bool) -> AlgorithmConfig {
    AlgorithmConfig::RsaPss {
        private_key: private.then(|| RSA_PRIVATE_KEY.to_string()),
        public_key: RSA_PUBLIC_KEY.to_string(),
        digest: DigestSize::Sha384,
    }
}

pub fn ec(private: bool) -> AlgorithmConfig {
    AlgorithmConfig::Ec {
        private_key: private.then(|| EC_PRIVATE_KEY.to_string()),
        public_key: EC_PUBLIC_KEY.to_string(),
        curve: EcCurve::P256,
    }
}

/// Whole-second instant close to the wall clock, so JWT `exp` checks pass.
pub fn now() -> DateTime<Utc> {
    Utc.timestamp_opt(Utc::now().timestamp(), 0).unwrap()
}

/// Authenticator and credentials stack wired with in-memory stores
pub struct TestStack {
    pub clock: Arc<FixedClock>,
    pub authenticators: Arc<InMemoryAuthenticatorRepository>,
    pub passwords: Arc<InMemoryPasswordInfoRepository>,
    pub service: Arc<JwtAuthenticatorService>,
    pub credentials: CredentialsProvider<InMemoryPasswordInfoRepository>,
}

impl TestStack {
    pub fn new(algorithm: &AlgorithmConfig, settings: AuthenticatorSettings) -> Self {
        let clock = Arc::new(FixedClock::new(now()));
        let authenticators = Arc::new(InMemoryAuthenticatorRepository::new());
        let passwords = Arc::new(InMemoryPasswordInfoRepository::new());

        let codec = JwtCodec::from_config(algorithm).expect("Failed to create codec");
        let service = AuthenticatorService::new(
            JwtWriter::new(
                codec.clone(),
                JwtSettings {
                    issuer: Some("authkit-tests".to_string()),
                    ..Default::default()
                },
            ),
            JwtReader::new(codec),
            HeaderCarrier::default(),
            settings,
        )
        .with_clock(clock.clone())
        .with_repository(authenticators.clone());

        let registry = PasswordHasherRegistry::new(
            Arc::new(Argon2PasswordHasher::new(1024, 1, 1).expect("Failed to create hasher")),
            vec![Arc::new(Sha256PasswordHasher)],
        )
        .expect("Failed to create registry");
        let credentials =
            CredentialsProvider::new(PasswordProvider::new(Arc::clone(&passwords), registry));

        Self {
            clock,
            authenticators,
            passwords,
            service: Arc::new(service),
            credentials,
        }
    }

    pub fn clock_now(&self) -> DateTime<Utc> {
        self.clock.now()
    }
}
