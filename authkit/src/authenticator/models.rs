use std::fmt;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

/// Identifies a subject at the provider that authenticated it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LoginInfo {
    /// Provider that authenticated the subject (e.g. `credentials`)
    #[serde(rename = "providerID")]
    pub provider_id: String,

    /// Subject key at that provider (e.g. an email address)
    #[serde(rename = "providerKey")]
    pub provider_key: String,
}

impl LoginInfo {
    pub fn new(provider_id: impl Into<String>, provider_key: impl Into<String>) -> Self {
        Self {
            provider_id: provider_id.into(),
            provider_key: provider_key.into(),
        }
    }
}

impl fmt::Display for LoginInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.provider_id, self.provider_key)
    }
}

/// Token-backed record of an authenticated identity.
///
/// Plain value: every change produces a new instance. `touched` and
/// `expires` are UTC instants; when both are unset the authenticator never
/// expires and does not slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Authenticator {
    /// Unique identifier, also the token for opaque (stateful) authenticators
    pub id: String,

    pub login_info: LoginInfo,

    /// Last time the authenticator was used
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub touched: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires: Option<DateTime<Utc>>,

    /// Caller-defined labels in insertion order; duplicates allowed
    #[serde(default)]
    pub tags: Vec<String>,

    /// Opaque request fingerprint, compared by exact equality
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,

    /// Arbitrary caller data carried with the authenticator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
}

impl Authenticator {
    /// Create an authenticator that never expires and does not slide.
    pub fn new(id: impl Into<String>, login_info: LoginInfo) -> Self {
        Self {
            id: id.into(),
            login_info,
            touched: None,
            expires: None,
            tags: Vec::new(),
            fingerprint: None,
            payload: None,
        }
    }

    /// Set `touched` and `expires` from the issue instant and lifetime.
    pub fn issued_at(mut self, now: DateTime<Utc>, expiry: Duration) -> Self {
        self.touched = Some(now);
        self.expires = Some(now + expiry);
        self
    }

    pub fn with_touched(mut self, touched: DateTime<Utc>) -> Self {
        self.touched = Some(touched);
        self
    }

    pub fn with_expires(mut self, expires: DateTime<Utc>) -> Self {
        self.expires = Some(expires);
        self
    }

    /// Append a tag.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_fingerprint(mut self, fingerprint: impl Into<String>) -> Self {
        self.fingerprint = Some(fingerprint.into());
        self
    }

    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Record a use of the authenticator.
    ///
    /// Only authenticators that track `touched` change. The flag tells the
    /// caller whether the new value must be written back to the client or
    /// store.
    ///
    /// # Returns
    /// The (possibly) updated authenticator and whether it changed
    pub fn touch(&self, now: DateTime<Utc>) -> (Authenticator, bool) {
        match self.touched {
            Some(touched) if touched != now => (
                Authenticator {
                    touched: Some(now),
                    ..self.clone()
                },
                true,
            ),
            _ => (self.clone(), false),
        }
    }

    /// Check if the authenticator is past its expiry at the given instant.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires.map_or(false, |expires| now > expires)
    }

    /// Check if the authenticator sat idle longer than `window`.
    pub fn is_timed_out(&self, now: DateTime<Utc>, window: Duration) -> bool {
        self.touched
            .map_or(false, |touched| now.signed_duration_since(touched) > window)
    }
}
