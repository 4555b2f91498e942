//! Redirect parsing and the pending-redirect relay.

use std::sync::Arc;

use linesdk_domain::constants::REDIRECT_SCHEME;
use linesdk_domain::LineApiError;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use serde_json::json;
use tracing::{debug, warn};
use url::Url;

/// An intent delivered back to the host; `data` is absent when the agent
/// returned without a URI.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RedirectIntent {
    pub data: Option<Url>,
}

impl RedirectIntent {
    pub fn new(data: Url) -> Self {
        Self { data: Some(data) }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse `uri` as the redirect data; an unparsable URI counts as absent.
    pub fn from_uri(uri: &str) -> Self {
        Self { data: Url::parse(uri).ok() }
    }
}

/// What the authorization server reported through the redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationResult {
    Success { request_token: String, friendship_status_changed: Option<bool> },
    AgentError { error: Option<String>, error_description: Option<String> },
    InternalError { message: String },
}

impl AuthorizationResult {
    /// Interpret a redirect against the state sent with the request.
    ///
    /// `state` is checked before anything else, so a provider error with a
    /// bad state is reported as an internal error.
    pub fn parse(intent: &RedirectIntent, sent_state: Option<&str>) -> Self {
        let Some(uri) = intent.data.as_ref() else {
            return Self::internal("Illegal redirection from external application.");
        };

        let param = |name: &str| {
            uri.query_pairs().find(|(key, _)| key == name).map(|(_, value)| value.into_owned())
        };

        let received_state = param("state");
        match (sent_state, received_state.as_deref()) {
            (Some(sent), Some(received)) if sent == received => {}
            _ => {
                warn!("Rejected redirect with unexpected state");
                return Self::internal("Illegal parameter value of 'state'.");
            }
        }

        let friendship_status_changed = param("friendship_status_changed")
            .filter(|value| !value.is_empty())
            .map(|value| value.eq_ignore_ascii_case("true"));

        match param("code").filter(|code| !code.is_empty()) {
            Some(request_token) => Self::Success { request_token, friendship_status_changed },
            None => Self::AgentError { error: param("error"), error_description: param("error_description") },
        }
    }

    fn internal(message: &str) -> Self {
        Self::InternalError { message: message.to_owned() }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Error detail for a failed result; agent errors carry the provider
    /// fields as a JSON object.
    #[must_use]
    pub fn line_api_error(&self) -> LineApiError {
        match self {
            Self::Success { .. } => LineApiError::default(),
            Self::AgentError { error, error_description } => {
                let mut body = serde_json::Map::new();
                if let Some(error) = error {
                    body.insert("error".into(), json!(error));
                }
                if let Some(description) = error_description {
                    body.insert("error_description".into(), json!(description));
                }
                LineApiError::new(serde_json::Value::Object(body).to_string())
            }
            Self::InternalError { message } => LineApiError::new(message.clone()),
        }
    }
}

static SHARED_RELAY: Lazy<Arc<RedirectRelay>> = Lazy::new(|| Arc::new(RedirectRelay::new()));

/// Last pending redirect from the LINE app.
///
/// A single slot: a new redirect replaces an unread one and reading clears
/// it, so one redirect is processed at most once.
#[derive(Debug, Default)]
pub struct RedirectRelay {
    slot: Mutex<Option<RedirectIntent>>,
}

impl RedirectRelay {
    /// An empty relay private to its owner.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide relay.
    pub fn shared() -> Arc<Self> {
        Arc::clone(&SHARED_RELAY)
    }

    /// Store `intent`, replacing any unread one.
    pub fn put(&self, intent: RedirectIntent) {
        if self.slot.lock().replace(intent).is_some() {
            warn!("Replacing an unread pending redirect");
        }
    }

    /// Remove and return the pending redirect.
    pub fn take(&self) -> Option<RedirectIntent> {
        self.slot.lock().take()
    }

    /// Stash `uri` if it is a login redirect; returns whether it was one.
    ///
    /// Called by the callback entry point that the LINE app starts, which
    /// only relays and then closes.
    pub fn capture_if_redirect(&self, uri: &Url) -> bool {
        if uri.scheme() != REDIRECT_SCHEME {
            return false;
        }
        debug!("Captured redirect from LINE app");
        self.put(RedirectIntent::new(uri.clone()));
        true
    }
}
