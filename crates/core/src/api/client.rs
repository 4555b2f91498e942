//! API client facade over the cached credential.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use linesdk_domain::{
    InternalAccessToken, LineAccessToken, LineApiResponse, LineCredential, LineFriendshipStatus,
    LineProfile,
};
use tracing::{debug, warn};

use crate::auth::ports::{AccessTokenStore, AuthenticationApi, TalkApi};

const NO_TOKEN_MESSAGE: &str = "access token is null";

/// Calls available once a credential is cached for the channel.
#[async_trait]
pub trait LineApiClient: Send + Sync {
    /// Revoke the refresh token and forget the credential.
    async fn logout(&self) -> LineApiResponse<()>;

    async fn get_current_access_token(&self) -> LineApiResponse<LineAccessToken>;

    /// Ask the server and re-cache with the reported expiry.
    async fn verify_token(&self) -> LineApiResponse<LineCredential>;

    async fn refresh_access_token(&self) -> LineApiResponse<LineAccessToken>;

    async fn get_profile(&self) -> LineApiResponse<LineProfile>;

    async fn get_friendship_status(&self) -> LineApiResponse<LineFriendshipStatus>;
}

pub struct LineApiClientImpl {
    channel_id: String,
    auth_api: Arc<dyn AuthenticationApi>,
    talk_api: Arc<dyn TalkApi>,
    token_store: Arc<dyn AccessTokenStore>,
}

impl LineApiClientImpl {
    pub fn new(
        channel_id: impl Into<String>,
        auth_api: Arc<dyn AuthenticationApi>,
        talk_api: Arc<dyn TalkApi>,
        token_store: Arc<dyn AccessTokenStore>,
    ) -> Self {
        Self { channel_id: channel_id.into(), auth_api, talk_api, token_store }
    }

    /// Cached credential or the failure to hand back.
    fn cached_token<T>(&self) -> Result<Option<InternalAccessToken>, LineApiResponse<T>> {
        self.token_store.load().map_err(|err| {
            warn!(error = %err, "Failed to read cached access token");
            LineApiResponse::internal_error(err.to_string())
        })
    }

    fn require_token<T>(&self) -> Result<InternalAccessToken, LineApiResponse<T>> {
        self.cached_token::<T>()?.ok_or_else(|| LineApiResponse::internal_error(NO_TOKEN_MESSAGE))
    }

    fn save(&self, access_token: &InternalAccessToken) {
        if let Err(err) = self.token_store.save(access_token) {
            warn!(error = %err, "Failed to cache access token");
        }
    }
}

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

#[async_trait]
impl LineApiClient for LineApiClientImpl {
    async fn logout(&self) -> LineApiResponse<()> {
        let access_token = match self.require_token() {
            Ok(token) => token,
            Err(response) => return response,
        };
        let response = self.auth_api.revoke_refresh_token(&self.channel_id, &access_token).await;
        if response.is_success() {
            if let Err(err) = self.token_store.clear() {
                warn!(error = %err, "Failed to clear cached access token");
            }
            debug!("Logged out");
        }
        response
    }

    async fn get_current_access_token(&self) -> LineApiResponse<LineAccessToken> {
        match self.cached_token() {
            Ok(Some(token)) => LineApiResponse::success(token.to_public()),
            Ok(None) => LineApiResponse::internal_error("The cached access token does not exist."),
            Err(response) => response,
        }
    }

    async fn verify_token(&self) -> LineApiResponse<LineCredential> {
        let access_token = match self.require_token() {
            Ok(token) => token,
            Err(response) => return response,
        };
        let verification = match self.auth_api.verify_token(&access_token).await.into_result() {
            Ok(result) => result,
            Err((code, error)) => return LineApiResponse::error(code, error),
        };

        let verified = InternalAccessToken::new(
            access_token.access_token,
            verification.expires_in_millis,
            now_millis(),
            access_token.refresh_token,
        );
        self.save(&verified);
        LineApiResponse::success(LineCredential {
            access_token: verified.to_public(),
            scopes: verification.scopes,
        })
    }

    async fn refresh_access_token(&self) -> LineApiResponse<LineAccessToken> {
        let access_token = match self.cached_token() {
            Ok(Some(token)) if !token.refresh_token.is_empty() => token,
            Ok(_) => {
                return LineApiResponse::internal_error(
                    "access token or refresh token is not found.",
                )
            }
            Err(response) => return response,
        };

        let refreshed =
            match self.auth_api.refresh_token(&self.channel_id, &access_token).await.into_result() {
                Ok(result) => result,
                Err((code, error)) => return LineApiResponse::error(code, error),
            };

        // The server only rotates the refresh token when it has to.
        let refresh_token = if refreshed.refresh_token.is_empty() {
            access_token.refresh_token
        } else {
            refreshed.refresh_token
        };
        let new_token = InternalAccessToken::new(
            refreshed.access_token,
            refreshed.expires_in_millis,
            now_millis(),
            refresh_token,
        );
        self.save(&new_token);
        debug!("Access token refreshed");
        LineApiResponse::success(new_token.to_public())
    }

    async fn get_profile(&self) -> LineApiResponse<LineProfile> {
        match self.require_token() {
            Ok(token) => self.talk_api.get_profile(&token).await,
            Err(response) => response,
        }
    }

    async fn get_friendship_status(&self) -> LineApiResponse<LineFriendshipStatus> {
        match self.require_token() {
            Ok(token) => self.talk_api.get_friendship_status(&token).await,
            Err(response) => response,
        }
    }
}
