//! Login request parameters and the terminal login result.

use serde::{Deserialize, Serialize};

use super::id_token::LineIdToken;
use super::profile::LineProfile;
use super::response::{LineApiError, LineApiResponse, LineApiResponseCode};
use super::scope::Scope;
use super::token::LineCredential;

/// Whether to offer adding the channel's bot as a friend during login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BotPrompt {
    Normal,
    Aggressive,
}

impl BotPrompt {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Aggressive => "aggressive",
        }
    }
}

/// What the caller asks for when starting a login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticationParams {
    pub scopes: Vec<Scope>,
    /// Used as the OpenID nonce when `openid` is requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bot_prompt: Option<BotPrompt>,
    /// BCP 47 tag forwarded as `ui_locales`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ui_locale: Option<String>,
}

impl AuthenticationParams {
    pub fn new(scopes: Vec<Scope>) -> Self {
        Self { scopes, nonce: None, bot_prompt: None, ui_locale: None }
    }

    #[must_use]
    pub fn with_nonce(mut self, nonce: impl Into<String>) -> Self {
        self.nonce = Some(nonce.into());
        self
    }

    #[must_use]
    pub fn with_bot_prompt(mut self, bot_prompt: BotPrompt) -> Self {
        self.bot_prompt = Some(bot_prompt);
        self
    }

    #[must_use]
    pub fn with_ui_locale(mut self, ui_locale: impl Into<String>) -> Self {
        self.ui_locale = Some(ui_locale.into());
        self
    }

    #[must_use]
    pub fn requests_openid(&self) -> bool {
        self.scopes.contains(&Scope::OpenIdConnect)
    }
}

/// Terminal outcome of one login flow. Exactly one is delivered per flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResult {
    pub response_code: LineApiResponseCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<LineProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_token: Option<LineIdToken>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub friendship_status_changed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential: Option<LineCredential>,
    #[serde(default)]
    pub error: LineApiError,
}

impl LoginResult {
    pub fn success(
        nonce: Option<String>,
        profile: Option<LineProfile>,
        id_token: Option<LineIdToken>,
        friendship_status_changed: Option<bool>,
        credential: LineCredential,
    ) -> Self {
        Self {
            response_code: LineApiResponseCode::Success,
            nonce,
            profile,
            id_token,
            friendship_status_changed,
            credential: Some(credential),
            error: LineApiError::default(),
        }
    }

    pub fn error(response_code: LineApiResponseCode, error: LineApiError) -> Self {
        Self {
            response_code,
            nonce: None,
            profile: None,
            id_token: None,
            friendship_status_changed: None,
            credential: None,
            error,
        }
    }

    /// Carry a failed remote call through verbatim.
    pub fn from_response<T>(response: &LineApiResponse<T>) -> Self {
        Self::error(response.response_code(), response.error_data())
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::error(LineApiResponseCode::InternalError, LineApiError::new(message))
    }

    pub fn authentication_agent_error(error: LineApiError) -> Self {
        Self::error(LineApiResponseCode::AuthenticationAgentError, error)
    }

    pub fn canceled() -> Self {
        Self::error(LineApiResponseCode::Cancel, LineApiError::default())
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.response_code == LineApiResponseCode::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canceled_result_has_no_payload() {
        let result = LoginResult::canceled();
        assert_eq!(result.response_code, LineApiResponseCode::Cancel);
        assert!(result.credential.is_none());
        assert_eq!(result.error, LineApiError::default());
    }

    #[test]
    fn from_response_copies_code_and_error() {
        let response: LineApiResponse<()> = LineApiResponse::server_error(400, "invalid_grant");
        let result = LoginResult::from_response(&response);
        assert_eq!(result.response_code, LineApiResponseCode::ServerError);
        assert_eq!(result.error.http_response_code, 400);
        assert_eq!(result.error.message(), "invalid_grant");
    }

    #[test]
    fn params_detect_openid_scope() {
        let params = AuthenticationParams::new(vec![Scope::Profile, Scope::OpenIdConnect])
            .with_bot_prompt(BotPrompt::Aggressive);
        assert!(params.requests_openid());
        assert_eq!(params.bot_prompt.map(|p| p.as_str()), Some("aggressive"));
        assert!(!AuthenticationParams::new(vec![Scope::Profile]).requests_openid());
    }

    #[test]
    fn login_result_survives_json() {
        let result = LoginResult::internal_error("Requested data is missing.");
        let json = serde_json::to_string(&result).unwrap();
        let back: LoginResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
    }
}
