//! Production wiring of the core ports.
//!
//! [`LineSdk`] owns one HTTP client, the two API clients and the encrypted
//! token cache for a single channel, and hands out the core facades built
//! on top of them.

use std::sync::Arc;

use linesdk_core::{
    AccessTokenStore, AgentEnvironment, AuthenticationApi, AuthenticationController,
    AutoRefreshLineApiClient, LineApiClientImpl, LoginDependencies, LoginHost, TalkApi,
};
use linesdk_domain::{AuthenticationParams, Result, SdkConfig};
use tokio::runtime::Handle;
use tracing::{debug, info, warn};

use crate::api::{LineAuthApiClient, TalkApiClient};
use crate::http::HttpClient;
use crate::storage::{AccessTokenCache, EncryptorHolder, KeyValueStore};

pub struct LineSdk {
    config: SdkConfig,
    auth_api: Arc<LineAuthApiClient>,
    talk_api: Arc<TalkApiClient>,
    encryptor: Arc<EncryptorHolder>,
    token_cache: Arc<AccessTokenCache>,
}

impl LineSdk {
    /// Wire the SDK for `config.auth.channel_id`.
    ///
    /// Unless `encryptor_preparation_disabled` is set and a Tokio runtime is
    /// current, the token cipher is derived on a blocking worker right away.
    pub fn new(
        config: SdkConfig,
        store: Arc<dyn KeyValueStore>,
        install_secret: impl Into<String>,
    ) -> Result<Self> {
        config.validate()?;

        let http = HttpClient::from_settings(&config.http)?;
        let auth_api = Arc::new(LineAuthApiClient::new(http.clone(), &config.auth));
        let talk_api = Arc::new(TalkApiClient::new(http, &config.auth));
        let encryptor = Arc::new(EncryptorHolder::new(Arc::clone(&store), install_secret));
        let token_cache =
            Arc::new(AccessTokenCache::new(&config.auth.channel_id, store, Arc::clone(&encryptor)));

        let sdk = Self { config, auth_api, talk_api, encryptor, token_cache };
        if !sdk.config.auth.encryptor_preparation_disabled {
            sdk.prepare_encryptor();
        }
        info!(channel_id = %sdk.config.auth.channel_id, "LINE SDK initialized");
        Ok(sdk)
    }

    fn prepare_encryptor(&self) {
        let Ok(runtime) = Handle::try_current() else {
            debug!("No Tokio runtime, token cipher will be derived on first use");
            return;
        };

        let encryptor = Arc::clone(&self.encryptor);
        runtime.spawn_blocking(move || {
            if let Err(err) = encryptor.initialize() {
                warn!(error = %err, "Failed to prepare token cipher");
            }
        });
    }

    #[must_use]
    pub fn config(&self) -> &SdkConfig {
        &self.config
    }

    #[must_use]
    pub fn token_cache(&self) -> Arc<AccessTokenCache> {
        Arc::clone(&self.token_cache)
    }

    /// API facade that refreshes once and retries on an expired token.
    #[must_use]
    pub fn api_client(&self) -> AutoRefreshLineApiClient<LineApiClientImpl> {
        AutoRefreshLineApiClient::new(LineApiClientImpl::new(
            self.config.auth.channel_id.clone(),
            self.auth_api(),
            self.talk_api(),
            self.token_store(),
        ))
    }

    pub fn login_dependencies(
        &self,
        environment: Arc<dyn AgentEnvironment>,
        host: Arc<dyn LoginHost>,
    ) -> LoginDependencies {
        LoginDependencies::new(
            self.auth_api(),
            self.talk_api(),
            self.token_store(),
            environment,
            host,
        )
    }

    /// Controller for one login attempt; requires a current Tokio runtime.
    pub fn login_controller(
        &self,
        params: AuthenticationParams,
        environment: Arc<dyn AgentEnvironment>,
        host: Arc<dyn LoginHost>,
    ) -> Result<AuthenticationController> {
        AuthenticationController::new(
            self.config.auth.clone(),
            params,
            self.login_dependencies(environment, host),
        )
    }

    fn auth_api(&self) -> Arc<dyn AuthenticationApi> {
        self.auth_api.clone()
    }

    fn talk_api(&self) -> Arc<dyn TalkApi> {
        self.talk_api.clone()
    }

    fn token_store(&self) -> Arc<dyn AccessTokenStore> {
        self.token_cache.clone()
    }
}
