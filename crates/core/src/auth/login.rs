//! Public entry/exit contract of the login flow.
//!
//! The caller builds a [`LoginIntent`], hands it to the hosting screen, and
//! converts whatever comes back with [`LoginApi::login_result_from_intent`].

use linesdk_domain::{AuthenticationParams, LineAuthConfig, LoginResult};
use serde::{Deserialize, Serialize};

/// Serializable request passed to the hosting screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginIntent {
    pub config: LineAuthConfig,
    pub params: AuthenticationParams,
}

impl LoginIntent {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Decode the extras the hosting screen was started with.
    ///
    /// Missing or malformed extras become the result to hand straight back.
    pub fn from_extras(extras: Option<&str>) -> Result<Self, LoginResult> {
        extras
            .and_then(|json| serde_json::from_str(json).ok())
            .ok_or_else(|| LoginResult::internal_error("The requested parameter is illegal."))
    }
}

/// What the hosting screen returns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResultIntent {
    #[serde(default)]
    pub result: Option<LoginResult>,
}

impl From<LoginResult> for LoginResultIntent {
    fn from(result: LoginResult) -> Self {
        Self { result: Some(result) }
    }
}

pub struct LoginApi;

impl LoginApi {
    #[must_use]
    pub fn login_intent(config: LineAuthConfig, params: AuthenticationParams) -> LoginIntent {
        LoginIntent { config, params }
    }

    /// Login with production endpoints for `channel_id`.
    #[must_use]
    pub fn login_intent_for_channel(
        channel_id: impl Into<String>,
        params: AuthenticationParams,
    ) -> LoginIntent {
        Self::login_intent(LineAuthConfig::new(channel_id), params)
    }

    /// Login that always goes through a browser.
    #[must_use]
    pub fn login_intent_without_line_app_auth(
        channel_id: impl Into<String>,
        params: AuthenticationParams,
    ) -> LoginIntent {
        Self::login_intent(
            LineAuthConfig::new(channel_id).with_line_app_auth_disabled(true),
            params,
        )
    }

    #[must_use]
    pub fn login_result_from_intent(intent: Option<LoginResultIntent>) -> LoginResult {
        match intent {
            None => LoginResult::internal_error("Callback intent is null"),
            Some(LoginResultIntent { result: None }) => {
                LoginResult::internal_error("Authentication result is not found.")
            }
            Some(LoginResultIntent { result: Some(result) }) => result,
        }
    }
}
