//! Port interfaces for the login flow
//!
//! These traits define the boundaries between the flow logic and the
//! HTTP clients, the credential store and the hosting screen.

use async_trait::async_trait;
use linesdk_common::PkceCode;
use linesdk_domain::{
    AccessTokenVerificationResult, InternalAccessToken, IssueAccessTokenResult,
    LineApiResponse, LineFriendshipStatus, LineProfile, LoginResult, OpenIdDiscoveryDocument,
    RefreshTokenResult, Result,
};

use super::agent::AgentIntent;

/// OAuth2 / OpenID endpoints of the LINE Platform
#[async_trait]
pub trait AuthenticationApi: Send + Sync {
    /// Exchange an authorization code for tokens.
    ///
    /// A returned ID token has already had its signature checked.
    async fn issue_access_token(
        &self,
        channel_id: &str,
        request_token: &str,
        pkce_code: &PkceCode,
        redirect_uri: &str,
    ) -> LineApiResponse<IssueAccessTokenResult>;

    /// Fetch the provider metadata
    async fn get_openid_discovery_document(&self) -> LineApiResponse<OpenIdDiscoveryDocument>;

    /// Run the refresh grant
    async fn refresh_token(
        &self,
        channel_id: &str,
        access_token: &InternalAccessToken,
    ) -> LineApiResponse<RefreshTokenResult>;

    /// Ask the server whether the access token is still valid
    async fn verify_token(
        &self,
        access_token: &InternalAccessToken,
    ) -> LineApiResponse<AccessTokenVerificationResult>;

    async fn revoke_refresh_token(
        &self,
        channel_id: &str,
        access_token: &InternalAccessToken,
    ) -> LineApiResponse<()>;

    async fn revoke_access_token(
        &self,
        channel_id: &str,
        access_token: &InternalAccessToken,
    ) -> LineApiResponse<()>;
}

/// Credential-bearing user endpoints
#[async_trait]
pub trait TalkApi: Send + Sync {
    async fn get_profile(&self, access_token: &InternalAccessToken) -> LineApiResponse<LineProfile>;

    async fn get_friendship_status(
        &self,
        access_token: &InternalAccessToken,
    ) -> LineApiResponse<LineFriendshipStatus>;
}

/// Per-channel credential storage
///
/// Every write replaces the whole record.
pub trait AccessTokenStore: Send + Sync {
    fn save(&self, access_token: &InternalAccessToken) -> Result<()>;

    /// `Ok(None)` when nothing usable is cached.
    fn load(&self) -> Result<Option<InternalAccessToken>>;

    fn clear(&self) -> Result<()>;
}

/// What the device has installed
pub trait AgentEnvironment: Send + Sync {
    /// Package identifier of the application hosting the SDK
    fn host_package_name(&self) -> String;

    /// Version name of an installed package, `None` when absent
    fn installed_version(&self, package: &str) -> Option<String>;

    /// Whether `package` has an activity that views `uri`
    fn can_handle(&self, package: &str, uri: &str) -> bool;

    /// Packages able to open an `https://` URI, in system order
    fn browser_packages(&self) -> Vec<String>;
}

/// How the hosting screen should start the login agent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchMode {
    /// Fire and forget; the result comes back as a new intent.
    Direct,
    /// Start for a result delivered to `on_activity_result` with this code.
    ForResult(i32),
}

/// The screen that owns the login flow
pub trait LoginHost: Send + Sync {
    /// Start the agent. Fails when nothing on the device can handle it.
    fn launch(&self, intent: &AgentIntent, mode: LaunchMode) -> Result<()>;

    /// Whether the screen is already going away
    fn is_finishing(&self) -> bool;

    /// Hand back the terminal result and close the screen
    fn finish(&self, result: LoginResult);
}
