//! Response envelope shared by every remote call.
//!
//! Remote failures are values, not Rust errors: a call either yields its data
//! or a [`LineApiResponseCode`] plus a [`LineApiError`] describing what went
//! wrong. Lower layers wrap and return; only the auto-refresh decorator acts
//! on them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Outcome category of a remote call or a login flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LineApiResponseCode {
    Success,
    Cancel,
    NetworkError,
    ServerError,
    AuthenticationAgentError,
    InternalError,
}

impl fmt::Display for LineApiResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Success => "SUCCESS",
            Self::Cancel => "CANCEL",
            Self::NetworkError => "NETWORK_ERROR",
            Self::ServerError => "SERVER_ERROR",
            Self::AuthenticationAgentError => "AUTHENTICATION_AGENT_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        };
        f.write_str(label)
    }
}

/// Error detail: HTTP status when one exists, plus a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineApiError {
    /// `-1` when the failure did not come from an HTTP response.
    pub http_response_code: i32,
    pub message: Option<String>,
}

impl LineApiError {
    pub const NO_HTTP_RESPONSE: i32 = -1;

    pub fn new(message: impl Into<String>) -> Self {
        Self { http_response_code: Self::NO_HTTP_RESPONSE, message: Some(message.into()) }
    }

    pub fn with_http_code(http_response_code: i32, message: impl Into<String>) -> Self {
        Self { http_response_code, message: Some(message.into()) }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_deref().unwrap_or_default()
    }
}

impl Default for LineApiError {
    fn default() -> Self {
        Self { http_response_code: Self::NO_HTTP_RESPONSE, message: None }
    }
}

impl fmt::Display for LineApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "LineApiError{{httpResponseCode={}, message='{}'}}",
            self.http_response_code,
            self.message()
        )
    }
}

/// Result of one remote call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineApiResponse<T> {
    Success(T),
    Failure { code: LineApiResponseCode, error: LineApiError },
}

impl<T> LineApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self::Success(data)
    }

    pub fn error(code: LineApiResponseCode, error: LineApiError) -> Self {
        Self::Failure { code, error }
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::error(LineApiResponseCode::InternalError, LineApiError::new(message))
    }

    pub fn network_error(message: impl Into<String>) -> Self {
        Self::error(LineApiResponseCode::NetworkError, LineApiError::new(message))
    }

    pub fn server_error(http_response_code: i32, message: impl Into<String>) -> Self {
        Self::error(
            LineApiResponseCode::ServerError,
            LineApiError::with_http_code(http_response_code, message),
        )
    }

    #[must_use]
    pub fn response_code(&self) -> LineApiResponseCode {
        match self {
            Self::Success(_) => LineApiResponseCode::Success,
            Self::Failure { code, .. } => *code,
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    #[must_use]
    pub fn is_network_error(&self) -> bool {
        self.response_code() == LineApiResponseCode::NetworkError
    }

    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.response_code() == LineApiResponseCode::ServerError
    }

    /// A server rejection with HTTP 401.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            Self::Failure { code: LineApiResponseCode::ServerError, error }
                if error.http_response_code == 401
        )
    }

    #[must_use]
    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Success(data) => Some(data),
            Self::Failure { .. } => None,
        }
    }

    pub fn into_data(self) -> Option<T> {
        match self {
            Self::Success(data) => Some(data),
            Self::Failure { .. } => None,
        }
    }

    /// Error detail; empty for a success.
    #[must_use]
    pub fn error_data(&self) -> LineApiError {
        match self {
            Self::Success(_) => LineApiError::default(),
            Self::Failure { error, .. } => error.clone(),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> LineApiResponse<U> {
        match self {
            Self::Success(data) => LineApiResponse::Success(f(data)),
            Self::Failure { code, error } => LineApiResponse::Failure { code, error },
        }
    }

    /// Split into data or the failure pair.
    pub fn into_result(self) -> Result<T, (LineApiResponseCode, LineApiError)> {
        match self {
            Self::Success(data) => Ok(data),
            Self::Failure { code, error } => Err((code, error)),
        }
    }
}
