use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::DateTime;
use chrono::Utc;
use serde_json::Map;
use serde_json::Value;

use crate::authenticator::errors::AuthenticatorError;
use crate::authenticator::models::Authenticator;
use crate::authenticator::models::LoginInfo;
use crate::authenticator::ports::AuthenticatorReader;
use crate::authenticator::ports::AuthenticatorWriter;
use crate::jwt::Claims;
use crate::jwt::JwtCodec;

const TAGS: &str = "tags";
const FINGERPRINT: &str = "fingerprint";
const PAYLOAD: &str = "payload";

/// Static claims stamped on every token written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JwtSettings {
    pub issuer: Option<String>,
    pub audience: Option<Vec<String>>,
    pub not_before: Option<DateTime<Utc>>,
}

/// Writes authenticators as self-contained JWTs.
///
/// The subject carries the base64 encoded login info JSON; tags,
/// fingerprint and payload travel as custom claims.
#[derive(Clone)]
pub struct JwtWriter {
    codec: JwtCodec,
    settings: JwtSettings,
}

impl JwtWriter {
    pub fn new(codec: JwtCodec, settings: JwtSettings) -> Self {
        Self { codec, settings }
    }

    fn claims(&self, authenticator: &Authenticator) -> Claims {
        let mut custom = Map::new();
        custom.insert(TAGS.to_string(), Value::from(authenticator.tags.clone()));
        if let Some(fingerprint) = &authenticator.fingerprint {
            custom.insert(FINGERPRINT.to_string(), Value::from(fingerprint.as_str()));
        }
        if let Some(payload) = &authenticator.payload {
            custom.insert(PAYLOAD.to_string(), payload.clone());
        }

        Claims {
            issuer: self.settings.issuer.clone(),
            subject: Some(encode_login_info(&authenticator.login_info)),
            audience: self.settings.audience.clone(),
            expiration_time: authenticator.expires,
            not_before: self.settings.not_before,
            issued_at: authenticator.touched,
            jwt_id: Some(authenticator.id.clone()),
            custom,
        }
    }
}

impl AuthenticatorWriter for JwtWriter {
    fn write(&self, authenticator: &Authenticator) -> Result<String, AuthenticatorError> {
        Ok(self.codec.encode(&self.claims(authenticator))?)
    }
}

/// Reads authenticators back from JWTs written by [`JwtWriter`].
#[derive(Clone)]
pub struct JwtReader {
    codec: JwtCodec,
}

impl JwtReader {
    pub fn new(codec: JwtCodec) -> Self {
        Self { codec }
    }

    /// Decode a token without going through the async reader interface.
    pub fn read_token(&self, token: &str) -> Result<Authenticator, AuthenticatorError> {
        let claims = self.codec.decode(token)?;

        let id = claims
            .jwt_id
            .ok_or(AuthenticatorError::MissingClaim("jti"))?;
        let subject = claims
            .subject
            .ok_or(AuthenticatorError::MissingClaim("sub"))?;
        let login_info = decode_login_info(&subject)?;

        Ok(Authenticator {
            id,
            login_info,
            touched: claims.issued_at,
            expires: claims.expiration_time,
            tags: read_tags(claims.custom.get(TAGS)),
            fingerprint: claims
                .custom
                .get(FINGERPRINT)
                .and_then(Value::as_str)
                .map(str::to_string),
            payload: claims.custom.get(PAYLOAD).cloned(),
        })
    }
}

#[async_trait]
impl AuthenticatorReader for JwtReader {
    async fn read(&self, token: &str) -> Result<Authenticator, AuthenticatorError> {
        self.read_token(token)
    }
}

fn encode_login_info(login_info: &LoginInfo) -> String {
    // LoginInfo is two strings; serialization cannot fail.
    let json = serde_json::to_string(login_info).unwrap_or_default();
    STANDARD.encode(json)
}

fn decode_login_info(subject: &str) -> Result<LoginInfo, AuthenticatorError> {
    let bytes = STANDARD
        .decode(subject)
        .map_err(|e| AuthenticatorError::InvalidLoginInfo {
            value: subject.to_string(),
            cause: e.to_string(),
        })?;
    let json = String::from_utf8(bytes).map_err(|e| AuthenticatorError::InvalidLoginInfo {
        value: subject.to_string(),
        cause: e.to_string(),
    })?;

    serde_json::from_str(&json).map_err(|e| AuthenticatorError::InvalidLoginInfo {
        value: json.clone(),
        cause: e.to_string(),
    })
}

/// Tags are read leniently: anything but an array of strings is no tags.
fn read_tags(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .and_then(|items| {
            items
                .iter()
                .map(|item| item.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;
    use crate::jwt::AlgorithmConfig;
    use crate::jwt::JwtError;

    const SECRET: &str = "jwt_authenticator_secret_32_bytes_long";

    fn codec() -> JwtCodec {
        JwtCodec::from_config(&AlgorithmConfig::hmac(SECRET)).unwrap()
    }

    fn authenticator() -> Authenticator {
        let now = Utc.timestamp_opt(Utc::now().timestamp(), 0).unwrap();
        Authenticator::new("auth-id-1", LoginInfo::new("credentials", "alice@example.com"))
            .issued_at(now, Duration::hours(12))
            .with_tag("admin")
            .with_tag("beta")
            .with_fingerprint("fp-123")
            .with_payload(json!({"locale": "en", "roles": ["a", "b"], "level": 3}))
    }

    #[tokio::test]
    async fn test_round_trip() {
        let writer = JwtWriter::new(codec(), JwtSettings::default());
        let reader = JwtReader::new(codec());

        let original = authenticator();
        let token = writer.write(&original).expect("Failed to write token");
        let read = reader.read(&token).await.expect("Failed to read token");

        assert_eq!(read, original);
    }

    #[tokio::test]
    async fn test_round_trip_truncates_to_seconds() {
        let writer = JwtWriter::new(codec(), JwtSettings::default());
        let reader = JwtReader::new(codec());

        let now = Utc::now();
        let original = Authenticator::new("id", LoginInfo::new("p", "k"))
            .issued_at(now, Duration::minutes(30));
        let read = reader.read(&writer.write(&original).unwrap()).await.unwrap();

        assert_eq!(read.touched.map(|t| t.timestamp()), Some(now.timestamp()));
        assert_eq!(
            read.expires.map(|t| t.timestamp()),
            original.expires.map(|t| t.timestamp())
        );
    }

    #[tokio::test]
    async fn test_absent_optionals_are_omitted() {
        let writer = JwtWriter::new(codec(), JwtSettings::default());
        let original = Authenticator::new("id", LoginInfo::new("p", "k"));

        let token = writer.write(&original).unwrap();
        let claims = codec().decode(&token).unwrap();

        assert_eq!(claims.custom.get(TAGS), Some(&json!([])));
        assert!(!claims.custom.contains_key(FINGERPRINT));
        assert!(!claims.custom.contains_key(PAYLOAD));
        assert!(claims.expiration_time.is_none());
        assert!(claims.issued_at.is_none());

        let read = JwtReader::new(codec()).read(&token).await.unwrap();
        assert_eq!(read, original);
    }

    #[test]
    fn test_subject_is_base64_login_info() {
        let writer = JwtWriter::new(
            codec(),
            JwtSettings {
                issuer: Some("authkit".to_string()),
                audience: Some(vec!["web".to_string()]),
                not_before: None,
            },
        );

        let token = writer.write(&authenticator()).unwrap();
        let claims = codec().decode(&token).unwrap();

        let subject = STANDARD.decode(claims.subject.unwrap()).unwrap();
        let json: Value = serde_json::from_slice(&subject).unwrap();
        assert_eq!(
            json,
            json!({"providerID": "credentials", "providerKey": "alice@example.com"})
        );
        assert_eq!(claims.jwt_id.as_deref(), Some("auth-id-1"));
        assert_eq!(claims.issuer.as_deref(), Some("authkit"));
        assert_eq!(claims.audience, Some(vec!["web".to_string()]));
    }

    #[test]
    fn test_missing_jwt_id() {
        let token = codec()
            .encode(&Claims::new().with_subject(encode_login_info(&LoginInfo::new("p", "k"))))
            .unwrap();

        let result = JwtReader::new(codec()).read_token(&token);
        assert!(matches!(result, Err(AuthenticatorError::MissingClaim("jti"))));
    }

    #[test]
    fn test_missing_subject() {
        let token = codec().encode(&Claims::new().with_jwt_id("id")).unwrap();

        let result = JwtReader::new(codec()).read_token(&token);
        assert!(matches!(result, Err(AuthenticatorError::MissingClaim("sub"))));
    }

    #[test]
    fn test_unparseable_subject() {
        let subject = STANDARD.encode("{\"providerID\": 1}");
        let token = codec()
            .encode(&Claims::new().with_jwt_id("id").with_subject(subject))
            .unwrap();

        match JwtReader::new(codec()).read_token(&token) {
            Err(AuthenticatorError::InvalidLoginInfo { value, .. }) => {
                assert_eq!(value, "{\"providerID\": 1}");
            }
            other => panic!("expected invalid login info, got {:?}", other),
        }
    }

    #[test]
    fn test_subject_not_base64() {
        let token = codec()
            .encode(&Claims::new().with_jwt_id("id").with_subject("%%%"))
            .unwrap();

        assert!(matches!(
            JwtReader::new(codec()).read_token(&token),
            Err(AuthenticatorError::InvalidLoginInfo { ref value, .. }) if value == "%%%"
        ));
    }

    #[test]
    fn test_subject_not_utf8() {
        let subject = STANDARD.encode([0xff, 0xfe, b'{', b'}']);
        let token = codec()
            .encode(&Claims::new().with_jwt_id("id").with_subject(subject.clone()))
            .unwrap();

        assert!(matches!(
            JwtReader::new(codec()).read_token(&token),
            Err(AuthenticatorError::InvalidLoginInfo { ref value, .. }) if *value == subject
        ));
    }

    #[test]
    fn test_lenient_optional_claims() {
        let claims = Claims::new()
            .with_jwt_id("id")
            .with_subject(encode_login_info(&LoginInfo::new("p", "k")))
            .with_custom(TAGS, json!(["ok", 7]))
            .with_custom(FINGERPRINT, json!(42));
        let token = codec().encode(&claims).unwrap();

        let read = JwtReader::new(codec()).read_token(&token).unwrap();
        assert!(read.tags.is_empty());
        assert!(read.fingerprint.is_none());
        assert!(read.payload.is_none());
    }

    #[test]
    fn test_codec_failures_propagate() {
        let token = JwtWriter::new(codec(), JwtSettings::default())
            .write(&authenticator())
            .unwrap();
        let other = JwtCodec::from_config(&AlgorithmConfig::hmac("another_secret_32_bytes_long!!"))
            .unwrap();

        assert!(matches!(
            JwtReader::new(other).read_token(&token),
            Err(AuthenticatorError::Jwt(JwtError::FraudulentToken { .. }))
        ));
    }
}
