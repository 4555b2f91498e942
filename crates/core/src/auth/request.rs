//! Authorization request construction.

use linesdk_common::random;
use linesdk_common::PkceCode;
use linesdk_domain::constants::{
    AUTHORIZE_CONSENT_PATH, OAUTH_STATE_LENGTH, OPENID_NONCE_LENGTH, REDIRECT_SCHEME,
    REDIRECT_HOST, SDK_VERSION,
};
use linesdk_domain::{AuthenticationParams, LineAuthConfig, Scope};
use url::Url;

use super::status::AuthenticationStatus;

/// Everything the controller needs to launch the login agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationRequest {
    pub login_uri: Url,
    pub redirect_uri: String,
    pub oauth_state: String,
    pub openid_nonce: Option<String>,
}

/// Build the login URI for one attempt and record state/nonce on `status`.
///
/// `state` is only a correlation value; PKCE is what binds the code to this
/// client.
pub fn build_request(
    config: &LineAuthConfig,
    pkce_code: &PkceCode,
    params: &AuthenticationParams,
    host_package: &str,
    status: &mut AuthenticationStatus,
) -> AuthorizationRequest {
    let openid_nonce = if params.requests_openid() {
        match params.nonce.as_deref() {
            Some(nonce) if !nonce.is_empty() => Some(nonce.to_owned()),
            _ => Some(random::alphanumeric(OPENID_NONCE_LENGTH)),
        }
    } else {
        None
    };
    status.record_request_values(random::alphanumeric(OAUTH_STATE_LENGTH), openid_nonce);

    // Reread so a restored attempt keeps the values it already sent.
    let oauth_state = status.oauth_state().unwrap_or_default().to_owned();
    let openid_nonce = status.openid_nonce().map(str::to_owned);

    let redirect_uri = redirect_uri_for(host_package);
    let login_uri =
        login_uri(config, pkce_code, params, &oauth_state, openid_nonce.as_deref(), &redirect_uri);

    AuthorizationRequest { login_uri, redirect_uri, oauth_state, openid_nonce }
}

/// Redirect target for the host app.
///
/// A host part is required so browsers treat it as a hierarchical URI and
/// keep the query readable.
#[must_use]
pub fn redirect_uri_for(host_package: &str) -> String {
    format!("intent://{REDIRECT_HOST}#Intent;package={host_package};scheme={REDIRECT_SCHEME};end")
}

fn login_uri(
    config: &LineAuthConfig,
    pkce_code: &PkceCode,
    params: &AuthenticationParams,
    oauth_state: &str,
    openid_nonce: Option<&str>,
    redirect_uri: &str,
) -> Url {
    let scope = Scope::join(&params.scopes);
    let mut return_params: Vec<(&str, &str)> = vec![
        ("response_type", "code"),
        ("client_id", config.channel_id.as_str()),
        ("state", oauth_state),
        ("code_challenge", pkce_code.challenge()),
        ("code_challenge_method", pkce_code.challenge_method().as_str()),
        ("redirect_uri", redirect_uri),
        ("sdk_ver", SDK_VERSION),
        ("scope", scope.as_str()),
    ];
    if let Some(nonce) = openid_nonce.filter(|n| !n.is_empty()) {
        return_params.push(("nonce", nonce));
    }
    if let Some(bot_prompt) = params.bot_prompt {
        return_params.push(("bot_prompt", bot_prompt.as_str()));
    }

    let query = return_params
        .iter()
        .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&");
    let return_uri = format!("{AUTHORIZE_CONSENT_PATH}?{query}");

    let mut url = config.web_login_page_url.clone();
    {
        let mut pairs = url.query_pairs_mut();
        pairs.append_pair("returnUri", &return_uri);
        pairs.append_pair("loginChannelId", &config.channel_id);
        if let Some(locale) = params.ui_locale.as_deref() {
            pairs.append_pair("ui_locales", locale);
        }
    }
    url
}
