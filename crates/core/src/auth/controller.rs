//! Authentication controller - the login state machine.
//!
//! The flow resumes through three independent host callbacks (new intent,
//! activity result, resume without redirect). All of them go through the
//! phase guard on [`AuthenticationStatus`]; only the first to see `Started`
//! moves the flow on, and a result is handed to the host at most once.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use linesdk_common::PkceCode;
use linesdk_domain::constants::{CANCEL_DELAY, LOGIN_REQUEST_CODE};
use linesdk_domain::{
    AuthenticationParams, LineApiResponseCode, LineAuthConfig, LineCredential, LineIdToken,
    LineSdkError, LoginResult, Result, Scope,
};
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::agent::AgentResolver;
use super::ports::{
    AccessTokenStore, AgentEnvironment, AuthenticationApi, LaunchMode, LoginHost, TalkApi,
};
use super::redirect::{AuthorizationResult, RedirectIntent, RedirectRelay};
use super::request::build_request;
use super::status::{AuthenticationPhase, AuthenticationStatus};
use super::validator::{IdTokenValidationError, IdTokenValidator};

/// Collaborators the controller talks to.
#[derive(Clone)]
pub struct LoginDependencies {
    /// Code exchange and ID token discovery.
    pub auth_api: Arc<dyn AuthenticationApi>,
    /// Profile fetch after the exchange.
    pub talk_api: Arc<dyn TalkApi>,
    /// Where the issued token is cached.
    pub token_store: Arc<dyn AccessTokenStore>,
    /// Installed packages, for picking the agent.
    pub environment: Arc<dyn AgentEnvironment>,
    /// Screen that launches the agent and receives the result.
    pub host: Arc<dyn LoginHost>,
    /// Slot for redirects relayed from the LINE app.
    pub relay: Arc<RedirectRelay>,
}

impl LoginDependencies {
    /// Wire the collaborators using the process-wide redirect relay.
    pub fn new(
        auth_api: Arc<dyn AuthenticationApi>,
        talk_api: Arc<dyn TalkApi>,
        token_store: Arc<dyn AccessTokenStore>,
        environment: Arc<dyn AgentEnvironment>,
        host: Arc<dyn LoginHost>,
    ) -> Self {
        Self { auth_api, talk_api, token_store, environment, host, relay: RedirectRelay::shared() }
    }

    /// Use a private relay instead of the shared one.
    #[must_use]
    pub fn with_relay(mut self, relay: Arc<RedirectRelay>) -> Self {
        self.relay = relay;
        self
    }
}

struct ControllerInner {
    config: LineAuthConfig,
    params: AuthenticationParams,
    deps: LoginDependencies,
    resolver: AgentResolver,
    runtime: Handle,
    status: Mutex<AuthenticationStatus>,
    host_stopped: AtomicBool,
    delivered: AtomicBool,
    pending_cancels: Mutex<Vec<JoinHandle<()>>>,
}

/// Drives one login attempt for one hosting screen.
///
/// Cheap to clone; clones share the same flow.
#[derive(Clone)]
pub struct AuthenticationController {
    inner: Arc<ControllerInner>,
}

impl AuthenticationController {
    /// Create a controller for a fresh flow.
    ///
    /// Must be called from within a Tokio runtime; background work is
    /// spawned onto it.
    pub fn new(
        config: LineAuthConfig,
        params: AuthenticationParams,
        deps: LoginDependencies,
    ) -> Result<Self> {
        Self::restore(config, params, deps, AuthenticationStatus::new())
    }

    /// Recreate a controller from a status saved by the host.
    pub fn restore(
        config: LineAuthConfig,
        params: AuthenticationParams,
        deps: LoginDependencies,
        status: AuthenticationStatus,
    ) -> Result<Self> {
        config.validate()?;
        let runtime = Handle::try_current()
            .map_err(|e| LineSdkError::Internal(format!("No Tokio runtime available: {e}")))?;
        let resolver = AgentResolver::new(Arc::clone(&deps.environment));

        Ok(Self {
            inner: Arc::new(ControllerInner {
                config,
                params,
                deps,
                resolver,
                runtime,
                status: Mutex::new(status),
                host_stopped: AtomicBool::new(false),
                delivered: AtomicBool::new(false),
                pending_cancels: Mutex::new(Vec::new()),
            }),
        })
    }

    #[must_use]
    pub fn phase(&self) -> AuthenticationPhase {
        self.inner.status.lock().phase()
    }

    /// Copy of the status for the host's save hook.
    #[must_use]
    pub fn status_snapshot(&self) -> AuthenticationStatus {
        self.inner.status.lock().clone()
    }

    /// INIT -> STARTED: build the request, pick an agent and launch it.
    pub fn start(&self) {
        let inner = &self.inner;
        let pkce_code = PkceCode::new_code();
        let host_package = inner.resolver.host_package_name();

        let request = {
            let mut status = inner.status.lock();
            status.authentication_started(pkce_code.clone());
            build_request(&inner.config, &pkce_code, &inner.params, &host_package, &mut status)
        };
        debug!(channel_id = %inner.config.channel_id, "Login flow started");

        let agent =
            match inner.resolver.resolve(&request.login_uri, !inner.config.line_app_auth_disabled) {
                Ok(agent) => agent,
                Err(err) => {
                    warn!(error = %err, "No login agent available");
                    self.finish_handled(LoginResult::internal_error(err.to_string()));
                    return;
                }
            };

        // Recorded before launch so a fast redirect finds it.
        inner.status.lock().set_sent_redirect_uri(request.redirect_uri);

        let mode = if agent.is_app_authentication {
            LaunchMode::Direct
        } else {
            LaunchMode::ForResult(LOGIN_REQUEST_CODE)
        };
        if let Err(err) = inner.deps.host.launch(&agent.intent, mode) {
            warn!(error = %err, "Failed to launch login agent");
            self.finish_handled(LoginResult::internal_error(err.to_string()));
        }
    }

    /// Host resumed; starts the flow or checks for a user cancel.
    pub fn on_host_resumed(&self) {
        match self.phase() {
            AuthenticationPhase::Init => self.start(),
            AuthenticationPhase::RedirectReceived => {}
            _ => self.on_host_restarted_without_redirect(),
        }
        self.inner.host_stopped.store(false, Ordering::SeqCst);
    }

    pub fn on_host_stopped(&self) {
        self.inner.host_stopped.store(true, Ordering::SeqCst);
    }

    /// A new intent reached the running host.
    pub fn on_new_intent(&self, intent: RedirectIntent) {
        if self.phase() == AuthenticationPhase::Started {
            self.on_redirect_received(intent);
        }
    }

    /// The redirect came back; only acts while the flow is `Started`.
    pub fn on_redirect_received(&self, intent: RedirectIntent) {
        let inner = &self.inner;
        let sent_state = {
            let mut status = inner.status.lock();
            if status.phase() != AuthenticationPhase::Started {
                debug!(phase = ?status.phase(), "Ignoring redirect");
                return;
            }
            status.authentication_redirect_received();
            status.oauth_state().map(str::to_owned)
        };
        self.abort_pending_cancels();

        match AuthorizationResult::parse(&intent, sent_state.as_deref()) {
            AuthorizationResult::Success { request_token, friendship_status_changed } => {
                let controller = self.clone();
                inner.runtime.spawn(async move {
                    let result = controller
                        .exchange_and_assemble(request_token, friendship_status_changed)
                        .await;
                    controller.finish_handled(result);
                });
            }
            agent_error @ AuthorizationResult::AgentError { .. } => {
                self.finish_handled(LoginResult::authentication_agent_error(
                    agent_error.line_api_error(),
                ));
            }
            internal @ AuthorizationResult::InternalError { .. } => {
                self.finish_handled(LoginResult::error(
                    LineApiResponseCode::InternalError,
                    internal.line_api_error(),
                ));
            }
        }
    }

    /// Activity result from a browser agent.
    ///
    /// The redirect can land slightly after the synthetic back-out result,
    /// so this waits out the grace window instead of cancelling. The result
    /// code and data are not used; the redirect is the only source of truth.
    pub fn on_activity_result(
        &self,
        request_code: i32,
        _result_code: i32,
        _data: Option<RedirectIntent>,
    ) {
        if request_code != LOGIN_REQUEST_CODE || self.phase() != AuthenticationPhase::Started {
            return;
        }
        self.schedule_delayed_cancel();
    }

    /// Host came back without a redirect, e.g. back pressed in the LINE app.
    pub fn on_host_restarted_without_redirect(&self) {
        self.schedule_delayed_cancel();
    }

    fn schedule_delayed_cancel(&self) {
        let controller = self.clone();
        let handle = self.inner.runtime.spawn(async move {
            tokio::time::sleep(CANCEL_DELAY).await;
            controller.run_cancel_check();
        });

        let mut pending = self.inner.pending_cancels.lock();
        pending.retain(|task| !task.is_finished());
        pending.push(handle);
    }

    fn abort_pending_cancels(&self) {
        for task in self.inner.pending_cancels.lock().drain(..) {
            task.abort();
        }
    }

    fn run_cancel_check(&self) {
        if self.phase() == AuthenticationPhase::RedirectReceived || self.inner.deps.host.is_finishing()
        {
            return;
        }

        if let Some(intent) = self.inner.deps.relay.take() {
            debug!("Processing redirect relayed from LINE app");
            self.on_redirect_received(intent);
            return;
        }

        self.finalize(LoginResult::canceled());
    }

    fn finish_handled(&self, result: LoginResult) {
        self.inner.status.lock().authentication_redirect_handled();
        self.finalize(result);
    }

    /// Deliver `result` if the flow is in a deliverable state.
    ///
    /// A stopped host in `Started` means the user left mid-consent and may
    /// still come back with a redirect, so that result is dropped.
    fn finalize(&self, result: LoginResult) {
        let inner = &self.inner;
        let phase = self.phase();
        let stopped = inner.host_stopped.load(Ordering::SeqCst);
        let deliverable = (phase == AuthenticationPhase::Started && !stopped)
            || phase == AuthenticationPhase::RedirectHandled;
        if !deliverable {
            debug!(?phase, stopped, "Dropping login result");
            return;
        }
        if inner.delivered.swap(true, Ordering::SeqCst) {
            debug!("Login result already delivered");
            return;
        }

        info!(response_code = %result.response_code, "Login flow finished");
        inner.deps.host.finish(result);
    }

    async fn exchange_and_assemble(
        &self,
        request_token: String,
        friendship_status_changed: Option<bool>,
    ) -> LoginResult {
        let inner = &self.inner;
        let (pkce_code, sent_redirect_uri, openid_nonce) = {
            let status = inner.status.lock();
            (
                status.pkce_code().cloned(),
                status.sent_redirect_uri().filter(|uri| !uri.is_empty()).map(str::to_owned),
                status.openid_nonce().map(str::to_owned),
            )
        };
        let (Some(pkce_code), Some(sent_redirect_uri)) = (pkce_code, sent_redirect_uri) else {
            return LoginResult::internal_error("Requested data is missing.");
        };
        if request_token.is_empty() {
            return LoginResult::internal_error("Requested data is missing.");
        }

        let response = inner
            .deps
            .auth_api
            .issue_access_token(
                &inner.config.channel_id,
                &request_token,
                &pkce_code,
                &sent_redirect_uri,
            )
            .await;
        let issued = match response.into_result() {
            Ok(issued) => issued,
            Err((code, error)) => return LoginResult::error(code, error),
        };

        let mut profile = None;
        if issued.scopes.contains(&Scope::Profile) {
            match inner.deps.talk_api.get_profile(&issued.access_token).await.into_result() {
                Ok(fetched) => profile = Some(fetched),
                Err((code, error)) => return LoginResult::error(code, error),
            }
        }

        if let Err(err) = inner.deps.token_store.save(&issued.access_token) {
            warn!(error = %err, "Failed to cache access token");
        }

        if let Some(id_token) = issued.id_token.as_ref() {
            let user_id = profile.as_ref().map(|p| p.user_id.clone());
            if let Err(err) = self.validate_id_token(id_token, user_id, openid_nonce.clone()).await {
                warn!(error = %err, "ID token rejected");
                return LoginResult::internal_error(err.to_string());
            }
        }

        let credential =
            LineCredential { access_token: issued.access_token.to_public(), scopes: issued.scopes };
        LoginResult::success(
            openid_nonce,
            profile,
            issued.id_token,
            friendship_status_changed,
            credential,
        )
    }

    async fn validate_id_token(
        &self,
        id_token: &LineIdToken,
        expected_user_id: Option<String>,
        expected_nonce: Option<String>,
    ) -> std::result::Result<(), IdTokenValidationError> {
        let document = self
            .inner
            .deps
            .auth_api
            .get_openid_discovery_document()
            .await
            .into_result()
            .map_err(|(code, error)| IdTokenValidationError::DiscoveryUnavailable { code, error })?;

        IdTokenValidator {
            expected_issuer: document.issuer,
            expected_user_id,
            expected_channel_id: self.inner.config.channel_id.clone(),
            expected_nonce,
        }
        .validate(id_token)
    }
}
