//! Access token values.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::id_token::LineIdToken;
use super::scope::Scope;

/// Full credential as persisted by the access token cache.
///
/// Superseded wholesale on refresh, never merged.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InternalAccessToken {
    pub access_token: String,
    pub expires_in_millis: i64,
    pub issued_client_time_millis: i64,
    pub refresh_token: String,
}

impl InternalAccessToken {
    pub fn new(
        access_token: impl Into<String>,
        expires_in_millis: i64,
        issued_client_time_millis: i64,
        refresh_token: impl Into<String>,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            expires_in_millis,
            issued_client_time_millis,
            refresh_token: refresh_token.into(),
        }
    }

    /// Public view without the refresh token.
    #[must_use]
    pub fn to_public(&self) -> LineAccessToken {
        LineAccessToken {
            token_string: self.access_token.clone(),
            expires_in_millis: self.expires_in_millis,
            issued_client_time_millis: self.issued_client_time_millis,
        }
    }
}

impl fmt::Debug for InternalAccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InternalAccessToken")
            .field("access_token", &"[REDACTED]")
            .field("expires_in_millis", &self.expires_in_millis)
            .field("issued_client_time_millis", &self.issued_client_time_millis)
            .field("refresh_token", &"[REDACTED]")
            .finish()
    }
}

/// Access token as handed to SDK callers.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineAccessToken {
    pub token_string: String,
    pub expires_in_millis: i64,
    pub issued_client_time_millis: i64,
}

impl LineAccessToken {
    /// Client-clock estimate of when the token stops working.
    #[must_use]
    pub fn estimated_expiration_time_millis(&self) -> i64 {
        self.issued_client_time_millis.saturating_add(self.expires_in_millis)
    }
}

impl fmt::Debug for LineAccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LineAccessToken")
            .field("token_string", &"[REDACTED]")
            .field("expires_in_millis", &self.expires_in_millis)
            .field("issued_client_time_millis", &self.issued_client_time_millis)
            .finish()
    }
}

/// Access token plus the scopes actually granted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineCredential {
    pub access_token: LineAccessToken,
    pub scopes: Vec<Scope>,
}

/// Outcome of exchanging an authorization code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueAccessTokenResult {
    pub access_token: InternalAccessToken,
    pub scopes: Vec<Scope>,
    pub id_token: Option<LineIdToken>,
}

/// Outcome of the refresh grant. `refresh_token` is empty when the server
/// did not rotate it.
#[derive(Clone, PartialEq, Eq)]
pub struct RefreshTokenResult {
    pub access_token: String,
    pub expires_in_millis: i64,
    pub refresh_token: String,
    pub scopes: Vec<Scope>,
}

impl fmt::Debug for RefreshTokenResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshTokenResult")
            .field("expires_in_millis", &self.expires_in_millis)
            .field("scopes", &self.scopes)
            .finish_non_exhaustive()
    }
}

/// Outcome of the verify endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessTokenVerificationResult {
    pub channel_id: String,
    pub expires_in_millis: i64,
    pub scopes: Vec<Scope>,
}
