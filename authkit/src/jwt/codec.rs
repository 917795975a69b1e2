use std::sync::Arc;

use chrono::DateTime;
use chrono::TimeZone;
use chrono::Utc;
use serde_json::Map;
use serde_json::Value;

use super::algorithm::AlgorithmConfig;
use super::claims::Claims;
use super::claims::RESERVED_CLAIMS;
use super::errors::JwtError;
use super::strategy::JsonWebTokenStrategy;
use super::strategy::SigningStrategy;

/// Encodes and decodes [`Claims`] as compact JWTs.
///
/// The codec owns the mapping between `Claims` and the native claim map; the
/// cryptography is delegated to a [`SigningStrategy`]. Cloning is cheap and
/// clones share the same key material.
#[derive(Clone)]
pub struct JwtCodec {
    strategy: Arc<dyn SigningStrategy>,
}

impl JwtCodec {
    /// Create a codec around a signing strategy.
    pub fn new(strategy: impl SigningStrategy) -> Self {
        Self {
            strategy: Arc::new(strategy),
        }
    }

    /// Create a codec backed by `jsonwebtoken` for the given algorithm.
    ///
    /// # Errors
    /// * `InvalidKey` - Key material could not be parsed
    pub fn from_config(config: &AlgorithmConfig) -> Result<Self, JwtError> {
        Ok(Self::new(JsonWebTokenStrategy::from_config(config)?))
    }

    /// Encode claims into a JWT token.
    ///
    /// # Arguments
    /// * `claims` - Claims to encode
    ///
    /// # Returns
    /// Compact JWT string
    ///
    /// # Errors
    /// * `ReservedClaim` - A custom claim shadows a reserved claim (checked before signing)
    /// * `EncodingFailed` - Signing failed
    pub fn encode(&self, claims: &Claims) -> Result<String, JwtError> {
        if let Some(key) = claims.reserved_collision() {
            return Err(JwtError::ReservedClaim {
                key: key.to_string(),
                reserved: RESERVED_CLAIMS.join(", "),
            });
        }

        self.strategy.sign(&to_native(claims))
    }

    /// Decode and verify a JWT token.
    ///
    /// # Arguments
    /// * `token` - Compact JWT string
    ///
    /// # Returns
    /// Decoded claims
    ///
    /// # Errors
    /// * `FraudulentToken` - Any verification or structural failure, carrying the token
    pub fn decode(&self, token: &str) -> Result<Claims, JwtError> {
        let native = self.strategy.verify(token)?;
        from_native(native).map_err(|cause| JwtError::fraudulent(token, cause))
    }
}

fn to_native(claims: &Claims) -> Map<String, Value> {
    let mut native = Map::new();

    if let Some(issuer) = &claims.issuer {
        native.insert("iss".to_string(), Value::from(issuer.as_str()));
    }
    if let Some(subject) = &claims.subject {
        native.insert("sub".to_string(), Value::from(subject.as_str()));
    }
    if let Some(audience) = &claims.audience {
        native.insert("aud".to_string(), Value::from(audience.clone()));
    }
    if let Some(exp) = claims.expiration_time {
        native.insert("exp".to_string(), Value::from(exp.timestamp()));
    }
    if let Some(nbf) = claims.not_before {
        native.insert("nbf".to_string(), Value::from(nbf.timestamp()));
    }
    if let Some(iat) = claims.issued_at {
        native.insert("iat".to_string(), Value::from(iat.timestamp()));
    }
    if let Some(jti) = &claims.jwt_id {
        native.insert("jti".to_string(), Value::from(jti.as_str()));
    }

    for (key, value) in &claims.custom {
        if let Some(value) = custom_to_native(value) {
            native.insert(key.clone(), value);
        }
    }

    native
}

/// Null is encoded as absence, everywhere in the tree.
fn custom_to_native(value: &Value) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::Array(items) => Some(Value::Array(
            items.iter().filter_map(custom_to_native).collect(),
        )),
        Value::Object(fields) => Some(Value::Object(
            fields
                .iter()
                .filter_map(|(k, v)| custom_to_native(v).map(|v| (k.clone(), v)))
                .collect(),
        )),
        scalar => Some(scalar.clone()),
    }
}

fn from_native(native: Map<String, Value>) -> Result<Claims, String> {
    let issuer = read_string(&native, "iss")?;
    let subject = read_string(&native, "sub")?;
    let audience = read_audience(&native)?;
    let expiration_time = read_instant(&native, "exp")?;
    let not_before = read_instant(&native, "nbf")?;
    let issued_at = read_instant(&native, "iat")?;
    let jwt_id = read_string(&native, "jti")?;

    let custom = native
        .into_iter()
        .filter(|(key, _)| !RESERVED_CLAIMS.contains(&key.as_str()))
        .map(|(key, value)| custom_from_native(&key, value).map(|value| (key, value)))
        .collect::<Result<Map<String, Value>, String>>()?;

    Ok(Claims {
        issuer,
        subject,
        audience,
        expiration_time,
        not_before,
        issued_at,
        jwt_id,
        custom,
    })
}

fn custom_from_native(path: &str, value: Value) -> Result<Value, String> {
    match value {
        Value::Null => Err(format!("unexpected value `null` in custom claim `{}`", path)),
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| custom_from_native(&format!("{}[{}]", path, i), item))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        Value::Object(fields) => fields
            .into_iter()
            .map(|(k, v)| custom_from_native(&format!("{}.{}", path, k), v).map(|v| (k, v)))
            .collect::<Result<Map<_, _>, _>>()
            .map(Value::Object),
        scalar => Ok(scalar),
    }
}

fn read_string(native: &Map<String, Value>, claim: &str) -> Result<Option<String>, String> {
    match native.get(claim) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(format!("claim `{}` must be a string, got {}", claim, other)),
    }
}

fn read_audience(native: &Map<String, Value>) -> Result<Option<Vec<String>>, String> {
    match native.get("aud") {
        None => Ok(None),
        Some(Value::String(single)) => Ok(Some(vec![single.clone()])),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => Ok(s.clone()),
                other => Err(format!("claim `aud` must contain strings, got {}", other)),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some),
        Some(other) => Err(format!("claim `aud` must be a string or array, got {}", other)),
    }
}

fn read_instant(native: &Map<String, Value>, claim: &str) -> Result<Option<DateTime<Utc>>, String> {
    let Some(value) = native.get(claim) else {
        return Ok(None);
    };

    let seconds = value
        .as_i64()
        .or_else(|| value.as_f64().map(|f| f.trunc() as i64))
        .ok_or_else(|| format!("claim `{}` must be a numeric date, got {}", claim, value))?;

    Utc.timestamp_opt(seconds, 0)
        .single()
        .map(Some)
        .ok_or_else(|| format!("claim `{}` is out of range: {}", claim, seconds))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;

    use chrono::Duration;
    use serde_json::json;

    use super::*;

    const SECRET: &str = "codec_test_secret_at_least_32_bytes!";

    fn codec() -> JwtCodec {
        JwtCodec::from_config(&AlgorithmConfig::hmac(SECRET)).unwrap()
    }

    /// Counts sign calls so tests can assert no cryptography happened.
    struct CountingStrategy {
        signed: Arc<AtomicUsize>,
    }

    impl SigningStrategy for CountingStrategy {
        fn sign(&self, _claims: &Map<String, Value>) -> Result<String, JwtError> {
            self.signed.fetch_add(1, Ordering::SeqCst);
            Ok("a.b.c".to_string())
        }

        fn verify(&self, token: &str) -> Result<Map<String, Value>, JwtError> {
            Err(JwtError::fraudulent(token, "not implemented"))
        }
    }

    /// Verifies nothing; returns a fixed claim map.
    struct FixedStrategy(Map<String, Value>);

    impl SigningStrategy for FixedStrategy {
        fn sign(&self, _claims: &Map<String, Value>) -> Result<String, JwtError> {
            Ok("fixed".to_string())
        }

        fn verify(&self, _token: &str) -> Result<Map<String, Value>, JwtError> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_encode_and_decode() {
        let now = Utc.timestamp_opt(Utc::now().timestamp(), 0).unwrap();
        let claims = Claims::new()
            .with_issuer("authkit")
            .with_subject("user123")
            .with_audience(vec!["web".to_string(), "mobile".to_string()])
            .with_issued_at(now)
            .with_not_before(now - Duration::seconds(5))
            .with_expiration_time(now + Duration::hours(1))
            .with_jwt_id("token-1")
            .with_custom("tags", vec!["a", "b"])
            .with_custom("payload", json!({"n": 1.5, "ok": true, "list": [1, "x"]}));

        let token = codec().encode(&claims).expect("Failed to encode token");
        let decoded = codec().decode(&token).expect("Failed to decode token");

        assert_eq!(decoded, claims);
    }

    #[test]
    fn test_reserved_claims_are_rejected_before_signing() {
        for reserved in RESERVED_CLAIMS {
            let signed = Arc::new(AtomicUsize::new(0));
            let codec = JwtCodec::new(CountingStrategy {
                signed: Arc::clone(&signed),
            });
            let claims = Claims::new()
                .with_subject("user123")
                .with_custom("tags", json!([]))
                .with_custom(reserved, "shadow");

            match codec.encode(&claims) {
                Err(JwtError::ReservedClaim { key, reserved: set }) => {
                    assert_eq!(key, reserved);
                    assert_eq!(set, "iss, sub, aud, exp, nbf, iat, jti");
                }
                other => panic!("expected reserved claim error, got {:?}", other),
            }
            assert_eq!(signed.load(Ordering::SeqCst), 0);
        }
    }

    #[test]
    fn test_nulls_are_encoded_as_absence() {
        let claims = Claims::new()
            .with_custom("gone", Value::Null)
            .with_custom("nested", json!({"keep": 1, "drop": null, "list": [null, 2]}));

        let native = to_native(&claims);

        assert!(!native.contains_key("gone"));
        assert_eq!(native["nested"], json!({"keep": 1, "list": [2]}));
    }

    #[test]
    fn test_decode_rejects_null_custom_values() {
        let native = json!({"sub": "s", "payload": {"inner": [1, null]}});
        let codec = JwtCodec::new(FixedStrategy(native.as_object().cloned().unwrap()));

        match codec.decode("fixed") {
            Err(JwtError::FraudulentToken { token, cause }) => {
                assert_eq!(token, "fixed");
                assert!(cause.contains("payload.inner[1]"), "cause was {}", cause);
            }
            other => panic!("expected fraudulent token, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_rejects_mistyped_reserved_claims() {
        let native = json!({"sub": 42});
        let codec = JwtCodec::new(FixedStrategy(native.as_object().cloned().unwrap()));

        assert!(matches!(
            codec.decode("fixed"),
            Err(JwtError::FraudulentToken { .. })
        ));
    }

    #[test]
    fn test_decode_accepts_single_audience_string() {
        let native = json!({"aud": "web"});
        let codec = JwtCodec::new(FixedStrategy(native.as_object().cloned().unwrap()));

        let claims = codec.decode("fixed").unwrap();
        assert_eq!(claims.audience, Some(vec!["web".to_string()]));
    }

    #[test]
    fn test_tampered_token_is_fraudulent() {
        let token = codec()
            .encode(&Claims::new().with_subject("user123"))
            .unwrap();
        let mut parts: Vec<&str> = token.split('.').collect();
        let forged = codec()
            .encode(&Claims::new().with_subject("admin"))
            .unwrap();
        let forged_payload = forged.split('.').nth(1).unwrap().to_string();
        parts[1] = &forged_payload;
        let tampered = parts.join(".");

        match codec().decode(&tampered) {
            Err(JwtError::FraudulentToken { token, .. }) => assert_eq!(token, tampered),
            other => panic!("expected fraudulent token, got {:?}", other),
        }
    }

    #[test]
    fn test_expired_and_malformed_tokens_share_one_error() {
        let expired = codec()
            .encode(&Claims::new().with_expiration_time(Utc::now() - Duration::minutes(5)))
            .unwrap();

        let expired_error = codec().decode(&expired).unwrap_err();
        let malformed_error = codec().decode("garbage").unwrap_err();

        assert!(matches!(expired_error, JwtError::FraudulentToken { .. }));
        assert!(matches!(malformed_error, JwtError::FraudulentToken { .. }));
    }
}
