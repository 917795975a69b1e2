use serde::Deserialize;

/// Signing algorithm configuration.
///
/// Asymmetric variants take PEM encoded keys. The private key may be left out
/// by deployments that only verify tokens.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum AlgorithmConfig {
    /// HMAC with a shared secret (HS256/HS384/HS512).
    Hmac {
        secret: String,
        #[serde(default)]
        digest: DigestSize,
    },

    /// RSASSA-PKCS1-v1_5 (RS256/RS384/RS512).
    Rsa {
        #[serde(default)]
        private_key: Option<String>,
        public_key: String,
        #[serde(default)]
        digest: DigestSize,
    },

    /// ECDSA (ES256/ES384).
    Ec {
        #[serde(default)]
        private_key: Option<String>,
        public_key: String,
        #[serde(default)]
        curve: EcCurve,
    },

    /// RSASSA-PSS (PS256/PS384/PS512).
    RsaPss {
        #[serde(default)]
        private_key: Option<String>,
        public_key: String,
        #[serde(default)]
        digest: DigestSize,
    },
}

impl AlgorithmConfig {
    /// HMAC configuration with SHA-256.
    pub fn hmac(secret: impl Into<String>) -> Self {
        AlgorithmConfig::Hmac {
            secret: secret.into(),
            digest: DigestSize::default(),
        }
    }

    /// Short algorithm name as it appears in the JOSE header.
    pub fn name(&self) -> &'static str {
        match self {
            AlgorithmConfig::Hmac { digest, .. } => match digest {
                DigestSize::Sha256 => "HS256",
                DigestSize::Sha384 => "HS384",
                DigestSize::Sha512 => "HS512",
            },
            AlgorithmConfig::Rsa { digest, .. } => match digest {
                DigestSize::Sha256 => "RS256",
                DigestSize::Sha384 => "RS384",
                DigestSize::Sha512 => "RS512",
            },
            AlgorithmConfig::Ec { curve, .. } => match curve {
                EcCurve::P256 => "ES256",
                EcCurve::P384 => "ES384",
            },
            AlgorithmConfig::RsaPss { digest, .. } => match digest {
                DigestSize::Sha256 => "PS256",
                DigestSize::Sha384 => "PS384",
                DigestSize::Sha512 => "PS512",
            },
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DigestSize {
    #[default]
    Sha256,
    Sha384,
    Sha512,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum EcCurve {
    #[default]
    P256,
    P384,
}
