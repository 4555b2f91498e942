//! Mutable state of one login attempt.
//!
//! The hosting screen serializes this on save and hands it back on restore so
//! a process death during the agent detour does not lose the flow.

use linesdk_common::PkceCode;
use serde::{Deserialize, Serialize};

/// Flow phase. Ordered: a flow only moves forward until it is restarted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthenticationPhase {
    /// Nothing launched yet.
    #[default]
    Init,
    /// Agent launched, waiting for the redirect.
    Started,
    RedirectReceived,
    /// The code exchange finished, successfully or not.
    RedirectHandled,
}

/// PKCE code, correlation values and phase of the current attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticationStatus {
    #[serde(default)]
    pkce_code: Option<PkceCode>,
    #[serde(default)]
    sent_redirect_uri: Option<String>,
    #[serde(default)]
    oauth_state: Option<String>,
    #[serde(default)]
    openid_nonce: Option<String>,
    #[serde(default)]
    phase: AuthenticationPhase,
}

impl AuthenticationStatus {
    /// Status of a flow that has not started.
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn phase(&self) -> AuthenticationPhase {
        self.phase
    }

    /// Begin a fresh attempt. Values from a previous attempt are dropped.
    pub fn authentication_started(&mut self, pkce_code: PkceCode) {
        *self = Self {
            pkce_code: Some(pkce_code),
            phase: AuthenticationPhase::Started,
            ..Self::default()
        };
    }

    /// Move to `RedirectReceived` unless already past it.
    pub fn authentication_redirect_received(&mut self) {
        self.advance(AuthenticationPhase::RedirectReceived);
    }

    /// Move to `RedirectHandled`.
    pub fn authentication_redirect_handled(&mut self) {
        self.advance(AuthenticationPhase::RedirectHandled);
    }

    fn advance(&mut self, next: AuthenticationPhase) {
        if next > self.phase {
            self.phase = next;
        }
    }

    #[must_use]
    pub fn pkce_code(&self) -> Option<&PkceCode> {
        self.pkce_code.as_ref()
    }

    /// Redirect URI sent with the authorization request.
    #[must_use]
    pub fn sent_redirect_uri(&self) -> Option<&str> {
        self.sent_redirect_uri.as_deref()
    }

    pub fn set_sent_redirect_uri(&mut self, redirect_uri: impl Into<String>) {
        self.sent_redirect_uri = Some(redirect_uri.into());
    }

    #[must_use]
    pub fn oauth_state(&self) -> Option<&str> {
        self.oauth_state.as_deref()
    }

    #[must_use]
    pub fn openid_nonce(&self) -> Option<&str> {
        self.openid_nonce.as_deref()
    }

    /// Record the correlation values sent with the authorization request.
    ///
    /// Returns `false` and keeps the existing values if they were already
    /// recorded for this attempt.
    pub fn record_request_values(&mut self, oauth_state: String, openid_nonce: Option<String>) -> bool {
        if self.oauth_state.is_some() {
            return false;
        }
        self.oauth_state = Some(oauth_state);
        self.openid_nonce = openid_nonce;
        true
    }
}
