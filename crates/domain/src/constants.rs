//! SDK constants
//!
//! Endpoints, package identifiers and flow timings shared by all layers.

use std::time::Duration;

// Default endpoints
pub const OPENID_DISCOVERY_DOCUMENT_URL: &str =
    "https://access.line.me/.well-known/openid-configuration";
pub const API_SERVER_BASE_URI: &str = "https://api.line.me/";
pub const WEB_LOGIN_PAGE_URL: &str = "https://access.line.me/oauth2/v2.1/login";

// Native companion app
pub const LINE_APP_PACKAGE_NAME: &str = "jp.naver.line.android";
/// Oldest app build that understands `scope` in app-to-app login.
pub const MIN_LINE_APP_VERSION: (u32, u32, u32) = (6, 9, 0);

// Authorization request
pub const REDIRECT_SCHEME: &str = "lineauth";
pub const REDIRECT_HOST: &str = "result";
pub const AUTHORIZE_CONSENT_PATH: &str = "/oauth2/v2.1/authorize/consent";
pub const OAUTH_STATE_LENGTH: usize = 16;
pub const OPENID_NONCE_LENGTH: usize = 16;

// Flow control
pub const LOGIN_REQUEST_CODE: i32 = 3;
/// Grace window between a "user left the agent" signal and reporting CANCEL.
pub const CANCEL_DELAY: Duration = Duration::from_millis(1000);
/// Clock skew tolerated when checking `iat`/`exp` of an ID token.
pub const ID_TOKEN_ALLOWED_CLOCK_SKEW: Duration = Duration::from_secs(5 * 60);

// Persistence
pub const ACCESS_TOKEN_CACHE_NAMESPACE_PREFIX: &str = "com.linecorp.linesdk.accesstoken.";

pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");
