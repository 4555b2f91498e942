//! OpenID Connect ID token claim validation.
//!
//! Signature checking happens when the token is parsed; this pass only
//! compares claims against what the flow expects.

use chrono::{DateTime, Duration, Utc};
use linesdk_domain::constants::ID_TOKEN_ALLOWED_CLOCK_SKEW;
use linesdk_domain::{LineApiError, LineApiResponseCode, LineIdToken};
use thiserror::Error;

/// First claim that failed, with the expected and received values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdTokenValidationError {
    #[error("OpenId {claim} does not match. expected: {expected}, but received: {received}")]
    Mismatch { claim: &'static str, expected: String, received: String },

    #[error("OpenId issuedAt is after current time: {issued_at}")]
    IssuedInFuture { issued_at: DateTime<Utc> },

    #[error("OpenId expiresAt is before current time: {expires_at}")]
    Expired { expires_at: DateTime<Utc> },

    #[error("Failed to get OpenId Discovery Document.  Response Code: {code} Error Data: {error}")]
    DiscoveryUnavailable { code: LineApiResponseCode, error: LineApiError },
}

fn display_optional(value: Option<&str>) -> String {
    value.unwrap_or("null").to_owned()
}

/// Expected claim values for one flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdTokenValidator {
    pub expected_issuer: String,
    /// Skipped when the profile was not fetched.
    pub expected_user_id: Option<String>,
    pub expected_channel_id: String,
    pub expected_nonce: Option<String>,
}

impl IdTokenValidator {
    /// Check `id_token` against the current wall clock.
    pub fn validate(&self, id_token: &LineIdToken) -> Result<(), IdTokenValidationError> {
        self.validate_at(id_token, Utc::now())
    }

    /// Check claims in order, stopping at the first mismatch.
    pub fn validate_at(
        &self,
        id_token: &LineIdToken,
        now: DateTime<Utc>,
    ) -> Result<(), IdTokenValidationError> {
        if id_token.issuer != self.expected_issuer {
            return Err(IdTokenValidationError::Mismatch {
                claim: "issuer",
                expected: self.expected_issuer.clone(),
                received: id_token.issuer.clone(),
            });
        }

        if let Some(user_id) = self.expected_user_id.as_deref() {
            if id_token.subject != user_id {
                return Err(IdTokenValidationError::Mismatch {
                    claim: "subject",
                    expected: user_id.to_owned(),
                    received: id_token.subject.clone(),
                });
            }
        }

        if id_token.audience != self.expected_channel_id {
            return Err(IdTokenValidationError::Mismatch {
                claim: "audience",
                expected: self.expected_channel_id.clone(),
                received: id_token.audience.clone(),
            });
        }

        if self.expected_nonce.as_deref() != id_token.nonce.as_deref() {
            return Err(IdTokenValidationError::Mismatch {
                claim: "nonce",
                expected: display_optional(self.expected_nonce.as_deref()),
                received: display_optional(id_token.nonce.as_deref()),
            });
        }

        let skew = Duration::from_std(ID_TOKEN_ALLOWED_CLOCK_SKEW).unwrap_or_else(|_| Duration::zero());
        if id_token.issued_at > now + skew {
            return Err(IdTokenValidationError::IssuedInFuture { issued_at: id_token.issued_at });
        }
        if id_token.expires_at < now - skew {
            return Err(IdTokenValidationError::Expired { expires_at: id_token.expires_at });
        }

        Ok(())
    }
}
