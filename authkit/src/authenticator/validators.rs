use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use crate::authenticator::models::Authenticator;

/// Request-side facts a validator may compare an authenticator against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationContext {
    pub now: DateTime<Utc>,

    /// Fingerprint computed from the current request, if fingerprinting is on
    pub fingerprint: Option<String>,
}

impl ValidationContext {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now,
            fingerprint: None,
        }
    }

    pub fn with_fingerprint(mut self, fingerprint: impl Into<String>) -> Self {
        self.fingerprint = Some(fingerprint.into());
        self
    }
}

/// Outcome of a validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validity {
    Valid,
    Invalid(String),
}

impl Validity {
    pub fn is_valid(&self) -> bool {
        matches!(self, Validity::Valid)
    }
}

/// Predicate deciding whether an existing authenticator may still be trusted.
///
/// Implementations must be pure: no shared state, no ordering assumptions
/// relative to other validators.
pub trait AuthenticatorValidator: Send + Sync + 'static {
    fn validate(&self, authenticator: &Authenticator, context: &ValidationContext) -> Validity;

    fn is_valid(&self, authenticator: &Authenticator, context: &ValidationContext) -> bool {
        self.validate(authenticator, context).is_valid()
    }
}

/// Rejects authenticators strictly past their expiry.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpirationValidator;

impl AuthenticatorValidator for ExpirationValidator {
    fn validate(&self, authenticator: &Authenticator, context: &ValidationContext) -> Validity {
        match authenticator.expires {
            Some(expires) if authenticator.is_expired(context.now) => {
                Validity::Invalid(format!("authenticator expired at {}", expires))
            }
            _ => Validity::Valid,
        }
    }
}

/// Rejects authenticators idle for longer than the window.
#[derive(Debug, Clone, Copy)]
pub struct SlidingWindowValidator {
    window: Duration,
}

impl SlidingWindowValidator {
    pub fn new(window: Duration) -> Self {
        Self { window }
    }
}

impl AuthenticatorValidator for SlidingWindowValidator {
    fn validate(&self, authenticator: &Authenticator, context: &ValidationContext) -> Validity {
        if authenticator.is_timed_out(context.now, self.window) {
            Validity::Invalid(format!(
                "authenticator idle for more than {}s",
                self.window.num_seconds()
            ))
        } else {
            Validity::Valid
        }
    }
}

/// Rejects authenticators whose stored fingerprint differs from the request's.
///
/// An authenticator without a stored fingerprint is always valid.
#[derive(Debug, Clone, Copy, Default)]
pub struct FingerprintValidator;

impl AuthenticatorValidator for FingerprintValidator {
    fn validate(&self, authenticator: &Authenticator, context: &ValidationContext) -> Validity {
        match (&authenticator.fingerprint, &context.fingerprint) {
            (None, _) => Validity::Valid,
            (Some(stored), Some(presented)) if stored == presented => Validity::Valid,
            (Some(_), _) => Validity::Invalid("fingerprint mismatch".to_string()),
        }
    }
}

/// Logical AND over a set of validators.
#[derive(Default)]
pub struct ValidatorChain {
    validators: Vec<Box<dyn AuthenticatorValidator>>,
}

impl ValidatorChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a validator to the chain.
    pub fn with(mut self, validator: impl AuthenticatorValidator) -> Self {
        self.validators.push(Box::new(validator));
        self
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    /// Run every validator.
    ///
    /// # Returns
    /// `Valid` iff no validator reports invalid; otherwise all reasons joined
    pub fn validate(&self, authenticator: &Authenticator, context: &ValidationContext) -> Validity {
        let reasons: Vec<String> = self
            .validators
            .iter()
            .filter_map(|validator| match validator.validate(authenticator, context) {
                Validity::Valid => None,
                Validity::Invalid(reason) => Some(reason),
            })
            .collect();

        if reasons.is_empty() {
            Validity::Valid
        } else {
            Validity::Invalid(reasons.join("; "))
        }
    }

    pub fn is_valid(&self, authenticator: &Authenticator, context: &ValidationContext) -> bool {
        self.validators
            .iter()
            .all(|validator| validator.is_valid(authenticator, context))
    }
}
