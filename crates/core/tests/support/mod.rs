//! Shared test helpers for `linesdk-core` integration tests.
//!
//! In-memory fakes for every port so the flow tests can script server
//! responses and observe what the controller hands to the host.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use linesdk_common::PkceCode;
use linesdk_core::{
    AccessTokenStore, AgentEnvironment, AgentIntent, AuthenticationApi, LaunchMode,
    LoginDependencies, LoginHost, RedirectRelay, TalkApi,
};
use linesdk_domain::{
    AccessTokenVerificationResult, IdTokenClaims, InternalAccessToken, IssueAccessTokenResult,
    LineApiResponse, LineFriendshipStatus, LineIdToken, LineProfile, LineSdkError, LoginResult,
    OpenIdDiscoveryDocument, RefreshTokenResult, Result as DomainResult, Scope,
};
use parking_lot::Mutex;

pub const CHANNEL_ID: &str = "1234567890";
pub const HOST_PACKAGE: &str = "com.example.app";
pub const ISSUER: &str = "https://access.line.me";
pub const USER_ID: &str = "U1234";

pub fn access_token() -> InternalAccessToken {
    InternalAccessToken::new("access-1", 2_592_000_000, Utc::now().timestamp_millis(), "refresh-1")
}

pub fn profile() -> LineProfile {
    LineProfile {
        user_id: USER_ID.into(),
        display_name: "Brown".into(),
        picture_url: None,
        status_message: Some("hello".into()),
    }
}

pub fn discovery_document() -> OpenIdDiscoveryDocument {
    OpenIdDiscoveryDocument {
        issuer: ISSUER.into(),
        authorization_endpoint: "https://access.line.me/oauth2/v2.1/authorize".into(),
        token_endpoint: "https://api.line.me/oauth2/v2.1/token".into(),
        jwks_uri: "https://api.line.me/oauth2/v2.1/certs".into(),
        response_types_supported: vec!["code".into()],
        subject_types_supported: vec!["pairwise".into()],
        id_token_signing_alg_values_supported: vec!["ES256".into()],
    }
}

/// ID token claims that pass validation for `nonce`.
pub fn id_token(nonce: Option<&str>, edit: impl FnOnce(&mut IdTokenClaims)) -> LineIdToken {
    let now = Utc::now().timestamp();
    let mut claims = IdTokenClaims {
        iss: ISSUER.into(),
        sub: USER_ID.into(),
        aud: CHANNEL_ID.into(),
        iat: now,
        exp: now + 3600,
        nonce: nonce.map(str::to_owned),
        ..IdTokenClaims::default()
    };
    edit(&mut claims);
    LineIdToken::from_claims("h.p.s", claims).expect("valid claims")
}

/// Arguments seen by `issue_access_token`.
#[derive(Debug, Clone)]
pub struct IssueCall {
    pub channel_id: String,
    pub request_token: String,
    pub verifier: String,
    pub redirect_uri: String,
}

pub struct FakeAuthApi {
    pub issue: Mutex<LineApiResponse<IssueAccessTokenResult>>,
    pub discovery: Mutex<LineApiResponse<OpenIdDiscoveryDocument>>,
    pub refresh: Mutex<LineApiResponse<RefreshTokenResult>>,
    pub verify: Mutex<LineApiResponse<AccessTokenVerificationResult>>,
    pub revoke: Mutex<LineApiResponse<()>>,
    pub issue_calls: Mutex<Vec<IssueCall>>,
    pub refresh_calls: AtomicUsize,
    pub revoke_calls: AtomicUsize,
}

impl FakeAuthApi {
    pub fn new(scopes: Vec<Scope>, id_token: Option<LineIdToken>) -> Self {
        Self {
            issue: Mutex::new(LineApiResponse::success(IssueAccessTokenResult {
                access_token: access_token(),
                scopes,
                id_token,
            })),
            discovery: Mutex::new(LineApiResponse::success(discovery_document())),
            refresh: Mutex::new(LineApiResponse::success(RefreshTokenResult {
                access_token: "access-2".into(),
                expires_in_millis: 2_592_000_000,
                refresh_token: String::new(),
                scopes: vec![Scope::Profile],
            })),
            verify: Mutex::new(LineApiResponse::success(AccessTokenVerificationResult {
                channel_id: CHANNEL_ID.into(),
                expires_in_millis: 1_000_000,
                scopes: vec![Scope::Profile, Scope::OpenIdConnect],
            })),
            revoke: Mutex::new(LineApiResponse::success(())),
            issue_calls: Mutex::new(Vec::new()),
            refresh_calls: AtomicUsize::new(0),
            revoke_calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl AuthenticationApi for FakeAuthApi {
    async fn issue_access_token(
        &self,
        channel_id: &str,
        request_token: &str,
        pkce_code: &PkceCode,
        redirect_uri: &str,
    ) -> LineApiResponse<IssueAccessTokenResult> {
        self.issue_calls.lock().push(IssueCall {
            channel_id: channel_id.into(),
            request_token: request_token.into(),
            verifier: pkce_code.verifier().into(),
            redirect_uri: redirect_uri.into(),
        });
        self.issue.lock().clone()
    }

    async fn get_openid_discovery_document(&self) -> LineApiResponse<OpenIdDiscoveryDocument> {
        self.discovery.lock().clone()
    }

    async fn refresh_token(
        &self,
        _channel_id: &str,
        _access_token: &InternalAccessToken,
    ) -> LineApiResponse<RefreshTokenResult> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        self.refresh.lock().clone()
    }

    async fn verify_token(
        &self,
        _access_token: &InternalAccessToken,
    ) -> LineApiResponse<AccessTokenVerificationResult> {
        self.verify.lock().clone()
    }

    async fn revoke_refresh_token(
        &self,
        _channel_id: &str,
        _access_token: &InternalAccessToken,
    ) -> LineApiResponse<()> {
        self.revoke_calls.fetch_add(1, Ordering::SeqCst);
        self.revoke.lock().clone()
    }

    async fn revoke_access_token(
        &self,
        _channel_id: &str,
        _access_token: &InternalAccessToken,
    ) -> LineApiResponse<()> {
        self.revoke_calls.fetch_add(1, Ordering::SeqCst);
        self.revoke.lock().clone()
    }
}

/// Talk API whose profile responses are scripted in order.
///
/// Once the script runs out every call succeeds with [`profile`].
#[derive(Default)]
pub struct FakeTalkApi {
    pub profile_script: Mutex<VecDeque<LineApiResponse<LineProfile>>>,
    pub profile_calls: AtomicUsize,
    pub seen_tokens: Mutex<Vec<String>>,
}

impl FakeTalkApi {
    pub fn scripted(responses: Vec<LineApiResponse<LineProfile>>) -> Self {
        Self { profile_script: Mutex::new(responses.into()), ..Self::default() }
    }
}

#[async_trait]
impl TalkApi for FakeTalkApi {
    async fn get_profile(&self, access_token: &InternalAccessToken) -> LineApiResponse<LineProfile> {
        self.profile_calls.fetch_add(1, Ordering::SeqCst);
        self.seen_tokens.lock().push(access_token.access_token.clone());
        self.profile_script
            .lock()
            .pop_front()
            .unwrap_or_else(|| LineApiResponse::success(profile()))
    }

    async fn get_friendship_status(
        &self,
        _access_token: &InternalAccessToken,
    ) -> LineApiResponse<LineFriendshipStatus> {
        LineApiResponse::success(LineFriendshipStatus { friend_flag: true })
    }
}

#[derive(Default)]
pub struct InMemoryTokenStore {
    pub token: Mutex<Option<InternalAccessToken>>,
    pub fail_saves: AtomicBool,
}

impl InMemoryTokenStore {
    pub fn with_token(token: InternalAccessToken) -> Self {
        Self { token: Mutex::new(Some(token)), ..Self::default() }
    }
}

impl AccessTokenStore for InMemoryTokenStore {
    fn save(&self, access_token: &InternalAccessToken) -> DomainResult<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(LineSdkError::Internal("disk full".into()));
        }
        *self.token.lock() = Some(access_token.clone());
        Ok(())
    }

    fn load(&self) -> DomainResult<Option<InternalAccessToken>> {
        Ok(self.token.lock().clone())
    }

    fn clear(&self) -> DomainResult<()> {
        *self.token.lock() = None;
        Ok(())
    }
}

pub struct FakeEnvironment {
    pub line_app_version: Option<String>,
    pub browsers: Vec<String>,
}

impl FakeEnvironment {
    pub fn browsers(browsers: &[&str]) -> Self {
        Self { line_app_version: None, browsers: browsers.iter().map(|b| (*b).to_owned()).collect() }
    }

    pub fn with_line_app(version: &str) -> Self {
        Self { line_app_version: Some(version.into()), browsers: vec!["com.android.chrome".into()] }
    }
}

impl AgentEnvironment for FakeEnvironment {
    fn host_package_name(&self) -> String {
        HOST_PACKAGE.into()
    }

    fn installed_version(&self, package: &str) -> Option<String> {
        if package == linesdk_domain::constants::LINE_APP_PACKAGE_NAME {
            self.line_app_version.clone()
        } else {
            None
        }
    }

    fn can_handle(&self, package: &str, _uri: &str) -> bool {
        package == linesdk_domain::constants::LINE_APP_PACKAGE_NAME && self.line_app_version.is_some()
    }

    fn browser_packages(&self) -> Vec<String> {
        self.browsers.clone()
    }
}

/// Hosting screen that records launches and results.
#[derive(Default)]
pub struct RecordingHost {
    pub launches: Mutex<Vec<(AgentIntent, LaunchMode)>>,
    pub results: Mutex<Vec<LoginResult>>,
    pub finishing: AtomicBool,
    pub fail_launch: AtomicBool,
}

impl RecordingHost {
    pub fn results(&self) -> Vec<LoginResult> {
        self.results.lock().clone()
    }
}

impl LoginHost for RecordingHost {
    fn launch(&self, intent: &AgentIntent, mode: LaunchMode) -> DomainResult<()> {
        if self.fail_launch.load(Ordering::SeqCst) {
            return Err(LineSdkError::NotFound("No activity found to handle intent".into()));
        }
        self.launches.lock().push((intent.clone(), mode));
        Ok(())
    }

    fn is_finishing(&self) -> bool {
        self.finishing.load(Ordering::SeqCst)
    }

    fn finish(&self, result: LoginResult) {
        self.finishing.store(true, Ordering::SeqCst);
        self.results.lock().push(result);
    }
}

/// All fakes for one flow, plus a private relay.
pub struct Harness {
    pub auth_api: Arc<FakeAuthApi>,
    pub talk_api: Arc<FakeTalkApi>,
    pub store: Arc<InMemoryTokenStore>,
    pub environment: Arc<FakeEnvironment>,
    pub host: Arc<RecordingHost>,
    pub relay: Arc<RedirectRelay>,
}

impl Harness {
    pub fn new(auth_api: FakeAuthApi, environment: FakeEnvironment) -> Self {
        Self {
            auth_api: Arc::new(auth_api),
            talk_api: Arc::new(FakeTalkApi::default()),
            store: Arc::new(InMemoryTokenStore::default()),
            environment: Arc::new(environment),
            host: Arc::new(RecordingHost::default()),
            relay: Arc::new(RedirectRelay::new()),
        }
    }

    pub fn dependencies(&self) -> LoginDependencies {
        LoginDependencies::new(
            self.auth_api.clone(),
            self.talk_api.clone(),
            self.store.clone(),
            self.environment.clone(),
            self.host.clone(),
        )
        .with_relay(Arc::clone(&self.relay))
    }

    /// Wait until the host has received a result.
    pub async fn wait_for_result(&self) -> LoginResult {
        tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                if let Some(result) = self.host.results.lock().first().cloned() {
                    return result;
                }
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("login result delivered")
    }
}
