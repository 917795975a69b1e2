use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

/// Claim names defined by RFC 7519 that custom claims must never shadow.
pub const RESERVED_CLAIMS: [&str; 7] = ["iss", "sub", "aud", "exp", "nbf", "iat", "jti"];

/// JWT claims.
///
/// Reserved RFC 7519 claims are typed fields; everything else lives in the
/// insertion-ordered `custom` map and is flattened next to them on the wire.
/// Instants have second precision once encoded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Claims {
    /// Issuer
    pub issuer: Option<String>,

    /// Subject
    pub subject: Option<String>,

    /// Audience
    pub audience: Option<Vec<String>>,

    /// Expiration time
    pub expiration_time: Option<DateTime<Utc>>,

    /// Not before
    pub not_before: Option<DateTime<Utc>>,

    /// Issued at
    pub issued_at: Option<DateTime<Utc>>,

    /// JWT ID (unique token identifier)
    pub jwt_id: Option<String>,

    /// Custom claims
    pub custom: Map<String, Value>,
}

impl Claims {
    /// Create new empty claims.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set subject.
    pub fn with_subject(mut self, subject: impl ToString) -> Self {
        self.subject = Some(subject.to_string());
        self
    }

    /// Set issuer.
    pub fn with_issuer(mut self, issuer: impl ToString) -> Self {
        self.issuer = Some(issuer.to_string());
        self
    }

    /// Set audience.
    pub fn with_audience(mut self, audience: Vec<String>) -> Self {
        self.audience = Some(audience);
        self
    }

    /// Set expiration time.
    pub fn with_expiration_time(mut self, expiration_time: DateTime<Utc>) -> Self {
        self.expiration_time = Some(expiration_time);
        self
    }

    /// Set not before.
    pub fn with_not_before(mut self, not_before: DateTime<Utc>) -> Self {
        self.not_before = Some(not_before);
        self
    }

    /// Set issued at.
    pub fn with_issued_at(mut self, issued_at: DateTime<Utc>) -> Self {
        self.issued_at = Some(issued_at);
        self
    }

    /// Set JWT ID.
    pub fn with_jwt_id(mut self, jwt_id: impl ToString) -> Self {
        self.jwt_id = Some(jwt_id.to_string());
        self
    }

    /// Add a custom claim.
    ///
    /// Values that fail to serialize are skipped. Reserved names are accepted
    /// here and rejected when the claims are encoded.
    pub fn with_custom(mut self, key: impl ToString, value: impl Serialize) -> Self {
        if let Ok(json_value) = serde_json::to_value(value) {
            self.custom.insert(key.to_string(), json_value);
        }
        self
    }

    /// First custom claim key that collides with a reserved claim name.
    pub fn reserved_collision(&self) -> Option<&str> {
        self.custom
            .keys()
            .map(String::as_str)
            .find(|key| RESERVED_CLAIMS.contains(key))
    }
}
