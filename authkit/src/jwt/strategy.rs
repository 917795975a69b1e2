use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use serde_json::Map;
use serde_json::Value;

use super::algorithm::AlgorithmConfig;
use super::algorithm::DigestSize;
use super::algorithm::EcCurve;
use super::errors::JwtError;

/// Cryptographic half of the JWT codec.
///
/// Implementations sign a native claim map into a compact token and verify a
/// compact token back into its claim map. Key material is read-only, so a
/// strategy can be shared between concurrent encode/decode calls.
pub trait SigningStrategy: Send + Sync + 'static {
    /// Sign a claim map into a compact JWT.
    ///
    /// # Errors
    /// * `EncodingFailed` - Signing failed or no signing key is configured
    fn sign(&self, claims: &Map<String, Value>) -> Result<String, JwtError>;

    /// Verify a compact JWT and return its claim map.
    ///
    /// # Errors
    /// * `FraudulentToken` - Token is malformed, badly signed, expired or not yet valid
    fn verify(&self, token: &str) -> Result<Map<String, Value>, JwtError>;
}

/// Signing strategy backed by the `jsonwebtoken` crate.
///
/// Validates signature, `exp` and `nbf` with zero leeway. No claim is
/// required and issuer/audience are left to the caller.
pub struct JsonWebTokenStrategy {
    encoding_key: Option<EncodingKey>,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
}

impl JsonWebTokenStrategy {
    /// Create a strategy from an algorithm configuration.
    ///
    /// # Arguments
    /// * `config` - Algorithm choice and key material
    ///
    /// # Returns
    /// Strategy ready to sign (if a private key or secret is present) and verify
    ///
    /// # Errors
    /// * `InvalidKey` - PEM key material could not be parsed
    ///
    /// # Security Notes
    /// - HMAC secrets should be at least as long as the digest (32 bytes for HS256)
    /// - Store secrets in environment variables or secure vaults, never in code
    pub fn from_config(config: &AlgorithmConfig) -> Result<Self, JwtError> {
        match config {
            AlgorithmConfig::Hmac { secret, digest } => Ok(Self {
                encoding_key: Some(EncodingKey::from_secret(secret.as_bytes())),
                decoding_key: DecodingKey::from_secret(secret.as_bytes()),
                algorithm: match digest {
                    DigestSize::Sha256 => Algorithm::HS256,
                    DigestSize::Sha384 => Algorithm::HS384,
                    DigestSize::Sha512 => Algorithm::HS512,
                },
            }),
            AlgorithmConfig::Rsa {
                private_key,
                public_key,
                digest,
            } => Self::rsa(
                private_key.as_deref(),
                public_key,
                match digest {
                    DigestSize::Sha256 => Algorithm::RS256,
                    DigestSize::Sha384 => Algorithm::RS384,
                    DigestSize::Sha512 => Algorithm::RS512,
                },
            ),
            AlgorithmConfig::RsaPss {
                private_key,
                public_key,
                digest,
            } => Self::rsa(
                private_key.as_deref(),
                public_key,
                match digest {
                    DigestSize::Sha256 => Algorithm::PS256,
                    DigestSize::Sha384 => Algorithm::PS384,
                    DigestSize::Sha512 => Algorithm::PS512,
                },
            ),
            AlgorithmConfig::Ec {
                private_key,
                public_key,
                curve,
            } => {
                let encoding_key = private_key
                    .as_deref()
                    .map(|pem| EncodingKey::from_ec_pem(pem.as_bytes()))
                    .transpose()
                    .map_err(|e| JwtError::InvalidKey(format!("EC private key: {}", e)))?;
                let decoding_key = DecodingKey::from_ec_pem(public_key.as_bytes())
                    .map_err(|e| JwtError::InvalidKey(format!("EC public key: {}", e)))?;

                Ok(Self {
                    encoding_key,
                    decoding_key,
                    algorithm: match curve {
                        EcCurve::P256 => Algorithm::ES256,
                        EcCurve::P384 => Algorithm::ES384,
                    },
                })
            }
        }
    }

    fn rsa(
        private_key: Option<&str>,
        public_key: &str,
        algorithm: Algorithm,
    ) -> Result<Self, JwtError> {
        let encoding_key = private_key
            .map(|pem| EncodingKey::from_rsa_pem(pem.as_bytes()))
            .transpose()
            .map_err(|e| JwtError::InvalidKey(format!("RSA private key: {}", e)))?;
        let decoding_key = DecodingKey::from_rsa_pem(public_key.as_bytes())
            .map_err(|e| JwtError::InvalidKey(format!("RSA public key: {}", e)))?;

        Ok(Self {
            encoding_key,
            decoding_key,
            algorithm,
        })
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(self.algorithm);
        // Allow tokens without 'exp' claim; authenticators may never expire
        validation.required_spec_claims.clear();
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.validate_aud = false;
        validation
    }
}

impl SigningStrategy for JsonWebTokenStrategy {
    fn sign(&self, claims: &Map<String, Value>) -> Result<String, JwtError> {
        let encoding_key = self.encoding_key.as_ref().ok_or_else(|| {
            JwtError::EncodingFailed("no signing key configured (verify-only)".to_string())
        })?;
        let header = Header::new(self.algorithm);

        encode(&header, claims, encoding_key).map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    fn verify(&self, token: &str) -> Result<Map<String, Value>, JwtError> {
        decode::<Map<String, Value>>(token, &self.decoding_key, &self.validation())
            .map(|token_data| token_data.claims)
            .map_err(|e| JwtError::fraudulent(token, e))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use serde_json::json;

    use super::*;

    fn claims(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_sign_and_verify() {
        let strategy = JsonWebTokenStrategy::from_config(&AlgorithmConfig::hmac(
            "my_secret_key_at_least_32_bytes_long!",
        ))
        .unwrap();

        let payload = claims(json!({"sub": "user123", "role": "admin"}));
        let token = strategy.sign(&payload).expect("Failed to sign token");
        assert_eq!(token.split('.').count(), 3);

        let verified = strategy.verify(&token).expect("Failed to verify token");
        assert_eq!(verified, payload);
    }

    #[test]
    fn test_verify_invalid_token() {
        let strategy =
            JsonWebTokenStrategy::from_config(&AlgorithmConfig::hmac("secret")).unwrap();

        let result = strategy.verify("invalid.token.here");
        assert!(matches!(
            result,
            Err(JwtError::FraudulentToken { ref token, .. }) if token == "invalid.token.here"
        ));
    }

    #[test]
    fn test_verify_with_wrong_secret() {
        let signer = JsonWebTokenStrategy::from_config(&AlgorithmConfig::hmac(
            "secret1_at_least_32_bytes_long_key!",
        ))
        .unwrap();
        let verifier = JsonWebTokenStrategy::from_config(&AlgorithmConfig::hmac(
            "secret2_at_least_32_bytes_long_key!",
        ))
        .unwrap();

        let token = signer.sign(&claims(json!({"sub": "user123"}))).unwrap();
        assert!(matches!(
            verifier.verify(&token),
            Err(JwtError::FraudulentToken { .. })
        ));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let strategy =
            JsonWebTokenStrategy::from_config(&AlgorithmConfig::hmac("secret")).unwrap();

        let expired = Utc::now().timestamp() - 10;
        let token = strategy.sign(&claims(json!({"exp": expired}))).unwrap();
        assert!(matches!(
            strategy.verify(&token),
            Err(JwtError::FraudulentToken { .. })
        ));
    }

    #[test]
    fn test_not_yet_valid_token_is_rejected() {
        let strategy =
            JsonWebTokenStrategy::from_config(&AlgorithmConfig::hmac("secret")).unwrap();

        let future = Utc::now().timestamp() + 3600;
        let token = strategy.sign(&claims(json!({"nbf": future}))).unwrap();
        assert!(strategy.verify(&token).is_err());
    }

    #[test]
    fn test_invalid_pem_is_rejected() {
        let result = JsonWebTokenStrategy::from_config(&AlgorithmConfig::Rsa {
            private_key: None,
            public_key: "not a pem".to_string(),
            digest: DigestSize::Sha256,
        });
        assert!(matches!(result, Err(JwtError::InvalidKey(_))));
    }
}
