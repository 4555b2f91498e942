//! LINE Login OAuth 2.1 endpoints.

use async_trait::async_trait;
use chrono::Utc;
use linesdk_common::PkceCode;
use linesdk_core::AuthenticationApi;
use linesdk_domain::constants::SDK_VERSION;
use linesdk_domain::{
    AccessTokenVerificationResult, InternalAccessToken, IssueAccessTokenResult, JwkSet,
    LineApiResponse, LineAuthConfig, LineIdToken, OpenIdDiscoveryDocument, RefreshTokenResult,
    Scope,
};
use reqwest::Method;
use serde::Deserialize;
use tracing::{debug, instrument, warn};
use url::Url;

use super::id_token::{self, IdTokenError};
use crate::http::response::{json, no_content, read_response};
use crate::http::HttpClient;

const OAUTH_PATH: &str = "oauth2/v2.1/";
const BEARER: &str = "Bearer";

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    token_type: String,
    expires_in: i64,
    #[serde(default)]
    refresh_token: Option<String>,
    scope: String,
    #[serde(default)]
    id_token: Option<String>,
}

impl TokenResponse {
    fn check_token_type(&self) -> Result<(), String> {
        if self.token_type == BEARER {
            Ok(())
        } else {
            Err(format!("Illegal token type. token_type={}", self.token_type))
        }
    }
}

/// `expires_in` seconds as milliseconds; out-of-range values are a parse failure.
fn expires_in_millis(seconds: i64) -> Result<i64, String> {
    seconds
        .checked_mul(1000)
        .ok_or_else(|| "Failed to parse response: expires_in out of range".to_owned())
}

#[derive(Deserialize)]
struct VerifyResponse {
    client_id: String,
    expires_in: i64,
    scope: String,
}

/// Client for the token, verify, revoke and OpenID endpoints.
pub struct LineAuthApiClient {
    http: HttpClient,
    api_base_url: Url,
    openid_discovery_url: Url,
}

impl LineAuthApiClient {
    pub fn new(http: HttpClient, config: &LineAuthConfig) -> Self {
        Self {
            http,
            api_base_url: config.api_base_url.clone(),
            openid_discovery_url: config.openid_discovery_url.clone(),
        }
    }

    fn endpoint(&self, name: &str) -> Result<Url, String> {
        self.api_base_url
            .join(OAUTH_PATH)
            .and_then(|base| base.join(name))
            .map_err(|e| format!("Invalid API base URL: {e}"))
    }

    async fn post_form<T, F>(&self, name: &str, form: &[(&str, &str)], parse: F) -> LineApiResponse<T>
    where
        F: FnOnce(&str) -> Result<T, String>,
    {
        let url = match self.endpoint(name) {
            Ok(url) => url,
            Err(message) => return LineApiResponse::internal_error(message),
        };
        let sent = self.http.send(self.http.request(Method::POST, url).form(form)).await;
        read_response(sent, parse).await
    }

    /// Discovery document, then the key set it points at.
    #[instrument(skip(self))]
    pub async fn get_jwk_set(&self) -> LineApiResponse<JwkSet> {
        let document = match self.get_openid_discovery_document().await.into_result() {
            Ok(document) => document,
            Err((code, error)) => return LineApiResponse::error(code, error),
        };

        let sent = self.http.send(self.http.request(Method::GET, &document.jwks_uri)).await;
        let response = read_response(sent, json::<JwkSet>).await;
        if !response.is_success() {
            warn!(response_code = %response.response_code(), "Failed to get JWK set");
        }
        response
    }

    async fn parse_id_token(&self, raw_token: &str) -> Result<LineIdToken, IdTokenError> {
        let jwk_set = self
            .get_jwk_set()
            .await
            .into_result()
            .map_err(|(code, error)| IdTokenError::JwkSetUnavailable(format!("{code}: {error}")))?;
        let key = id_token::signing_key(&jwk_set, raw_token)?;
        id_token::verify_and_decode(raw_token, &key)
    }
}

#[async_trait]
impl AuthenticationApi for LineAuthApiClient {
    #[instrument(skip_all)]
    async fn issue_access_token(
        &self,
        channel_id: &str,
        request_token: &str,
        pkce_code: &PkceCode,
        redirect_uri: &str,
    ) -> LineApiResponse<IssueAccessTokenResult> {
        let client_version = format!("LINE SDK Rust v{SDK_VERSION}");
        let form = [
            ("grant_type", "authorization_code"),
            ("code", request_token),
            ("redirect_uri", redirect_uri),
            ("client_id", channel_id),
            ("code_verifier", pkce_code.verifier()),
            ("id_token_key_type", "JWK"),
            ("client_version", client_version.as_str()),
        ];
        let response = self.post_form("token", &form, json::<TokenResponse>).await;
        let token = match response.into_result() {
            Ok(token) => token,
            Err((code, error)) => return LineApiResponse::error(code, error),
        };
        if let Err(message) = token.check_token_type() {
            return LineApiResponse::internal_error(message);
        }
        let expires_in = match expires_in_millis(token.expires_in) {
            Ok(millis) => millis,
            Err(message) => return LineApiResponse::internal_error(message),
        };
        let Some(refresh_token) = token.refresh_token else {
            return LineApiResponse::internal_error("Failed to parse response: missing refresh_token");
        };

        let id_token = match token.id_token.as_deref().filter(|raw| !raw.is_empty()) {
            Some(raw) => match self.parse_id_token(raw).await {
                Ok(parsed) => Some(parsed),
                Err(err) => {
                    warn!(error = %err, "Failed to parse ID token");
                    return LineApiResponse::internal_error(err.to_string());
                }
            },
            None => None,
        };

        debug!("Access token issued");
        LineApiResponse::success(IssueAccessTokenResult {
            access_token: InternalAccessToken::new(
                token.access_token,
                expires_in,
                Utc::now().timestamp_millis(),
                refresh_token,
            ),
            scopes: Scope::parse_list(&token.scope),
            id_token,
        })
    }

    #[instrument(skip(self))]
    async fn get_openid_discovery_document(&self) -> LineApiResponse<OpenIdDiscoveryDocument> {
        let sent =
            self.http.send(self.http.request(Method::GET, self.openid_discovery_url.clone())).await;
        let response = read_response(sent, json::<OpenIdDiscoveryDocument>).await;
        if !response.is_success() {
            warn!(response_code = %response.response_code(), "Failed to get OpenID discovery document");
        }
        response
    }

    #[instrument(skip_all)]
    async fn refresh_token(
        &self,
        channel_id: &str,
        access_token: &InternalAccessToken,
    ) -> LineApiResponse<RefreshTokenResult> {
        let form = [
            ("grant_type", "refresh_token"),
            ("refresh_token", access_token.refresh_token.as_str()),
            ("client_id", channel_id),
        ];
        self.post_form("token", &form, |body| {
            let token = json::<TokenResponse>(body)?;
            token.check_token_type()?;
            Ok(RefreshTokenResult {
                access_token: token.access_token,
                expires_in_millis: expires_in_millis(token.expires_in)?,
                refresh_token: token.refresh_token.unwrap_or_default(),
                scopes: Scope::parse_list(&token.scope),
            })
        })
        .await
    }

    #[instrument(skip_all)]
    async fn verify_token(
        &self,
        access_token: &InternalAccessToken,
    ) -> LineApiResponse<AccessTokenVerificationResult> {
        let url = match self.endpoint("verify") {
            Ok(url) => url,
            Err(message) => return LineApiResponse::internal_error(message),
        };
        let request = self
            .http
            .request(Method::GET, url)
            .query(&[("access_token", access_token.access_token.as_str())]);
        let sent = self.http.send(request).await;
        read_response(sent, |body| {
            let verified = json::<VerifyResponse>(body)?;
            Ok(AccessTokenVerificationResult {
                channel_id: verified.client_id,
                expires_in_millis: expires_in_millis(verified.expires_in)?,
                scopes: Scope::parse_list(&verified.scope),
            })
        })
        .await
    }

    #[instrument(skip_all)]
    async fn revoke_refresh_token(
        &self,
        channel_id: &str,
        access_token: &InternalAccessToken,
    ) -> LineApiResponse<()> {
        let form =
            [("refresh_token", access_token.refresh_token.as_str()), ("client_id", channel_id)];
        self.post_form("revoke", &form, no_content).await
    }

    #[instrument(skip_all)]
    async fn revoke_access_token(
        &self,
        channel_id: &str,
        access_token: &InternalAccessToken,
    ) -> LineApiResponse<()> {
        let form = [("access_token", access_token.access_token.as_str()), ("client_id", channel_id)];
        self.post_form("revoke", &form, no_content).await
    }
}
