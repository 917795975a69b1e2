use http::header::ACCEPT_CHARSET;
use http::header::ACCEPT_LANGUAGE;
use http::header::USER_AGENT;
use http::HeaderMap;
use http::HeaderName;
use sha2::Digest;
use sha2::Sha256;

/// Derives a fingerprint of the client from request headers.
pub trait FingerprintGenerator: Send + Sync + 'static {
    fn generate(&self, headers: &HeaderMap) -> String;
}

/// Hex SHA-256 over `User-Agent`, `Accept-Language` and `Accept-Charset`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultFingerprintGenerator;

impl FingerprintGenerator for DefaultFingerprintGenerator {
    fn generate(&self, headers: &HeaderMap) -> String {
        let header = |name: HeaderName| {
            headers
                .get(name)
                .and_then(|value| value.to_str().ok())
                .unwrap_or_default()
        };
        let material = [
            header(USER_AGENT),
            header(ACCEPT_LANGUAGE),
            header(ACCEPT_CHARSET),
        ]
        .join(":");

        let mut hasher = Sha256::new();
        hasher.update(material.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}
