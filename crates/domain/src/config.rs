//! SDK configuration

use serde::{Deserialize, Serialize};
use url::Url;

use crate::constants::{API_SERVER_BASE_URI, OPENID_DISCOVERY_DOCUMENT_URL, WEB_LOGIN_PAGE_URL};
use crate::errors::{LineSdkError, Result};

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SdkConfig {
    pub auth: LineAuthConfig,
    #[serde(default)]
    pub http: HttpSettings,
}

impl SdkConfig {
    pub fn new(auth: LineAuthConfig) -> Self {
        Self { auth, http: HttpSettings::default() }
    }

    /// Check values that serde cannot.
    pub fn validate(&self) -> Result<()> {
        self.auth.validate()?;
        self.http.validate()
    }
}

/// Login channel and endpoint configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineAuthConfig {
    pub channel_id: String,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: Url,
    #[serde(default = "default_openid_discovery_url")]
    pub openid_discovery_url: Url,
    #[serde(default = "default_web_login_page_url")]
    pub web_login_page_url: Url,
    /// Always use a browser even when the LINE app is installed.
    #[serde(default)]
    pub line_app_auth_disabled: bool,
    /// Skip warming up the token cache cipher when the SDK is built.
    #[serde(default)]
    pub encryptor_preparation_disabled: bool,
}

impl LineAuthConfig {
    pub fn new(channel_id: impl Into<String>) -> Self {
        Self {
            channel_id: channel_id.into(),
            api_base_url: default_api_base_url(),
            openid_discovery_url: default_openid_discovery_url(),
            web_login_page_url: default_web_login_page_url(),
            line_app_auth_disabled: false,
            encryptor_preparation_disabled: false,
        }
    }

    #[must_use]
    pub fn with_api_base_url(mut self, url: Url) -> Self {
        self.api_base_url = url;
        self
    }

    #[must_use]
    pub fn with_openid_discovery_url(mut self, url: Url) -> Self {
        self.openid_discovery_url = url;
        self
    }

    #[must_use]
    pub fn with_web_login_page_url(mut self, url: Url) -> Self {
        self.web_login_page_url = url;
        self
    }

    #[must_use]
    pub fn with_line_app_auth_disabled(mut self, disabled: bool) -> Self {
        self.line_app_auth_disabled = disabled;
        self
    }

    #[must_use]
    pub fn with_encryptor_preparation_disabled(mut self, disabled: bool) -> Self {
        self.encryptor_preparation_disabled = disabled;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.channel_id.trim().is_empty() {
            return Err(LineSdkError::Config("channel_id must not be empty".into()));
        }
        if self.api_base_url.cannot_be_a_base() {
            return Err(LineSdkError::Config(format!(
                "api_base_url is not a base URL: {}",
                self.api_base_url
            )));
        }
        Ok(())
    }
}

/// HTTP transport configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpSettings {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl HttpSettings {
    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(LineSdkError::Config("timeout_secs must be greater than zero".into()));
        }
        Ok(())
    }
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self { timeout_secs: default_timeout_secs(), user_agent: None }
    }
}

fn parse_constant(value: &str) -> Url {
    match Url::parse(value) {
        Ok(url) => url,
        Err(_) => unreachable!("endpoint constants are valid URLs"),
    }
}

fn default_api_base_url() -> Url {
    parse_constant(API_SERVER_BASE_URI)
}

fn default_openid_discovery_url() -> Url {
    parse_constant(OPENID_DISCOVERY_DOCUMENT_URL)
}

fn default_web_login_page_url() -> Url {
    parse_constant(WEB_LOGIN_PAGE_URL)
}

fn default_timeout_secs() -> u64 {
    30
}
