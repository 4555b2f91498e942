//! Token auto-refresh decorator.
//!
//! A refreshable call that fails with HTTP 401 triggers one refresh and, if
//! that succeeds, one retry. Nothing loops.

use std::future::Future;

use async_trait::async_trait;
use linesdk_domain::{
    LineAccessToken, LineApiResponse, LineApiResponseCode, LineCredential, LineFriendshipStatus,
    LineProfile,
};
use tracing::{debug, warn};

use super::client::LineApiClient;

/// Run `call`, refreshing and retrying once on an unauthorized response.
///
/// When the refresh itself fails, a network failure is reported as such;
/// any other refresh failure hands back the original 401.
pub async fn call_with_auto_refresh<T, C, CF, R, RF>(mut call: C, refresh: R) -> LineApiResponse<T>
where
    C: FnMut() -> CF,
    CF: Future<Output = LineApiResponse<T>>,
    R: FnOnce() -> RF,
    RF: Future<Output = LineApiResponse<LineAccessToken>>,
{
    let first = call().await;
    if !first.is_unauthorized() {
        return first;
    }

    debug!("Unauthorized response, refreshing access token");
    let refreshed = refresh().await;
    match refreshed {
        LineApiResponse::Success(_) => call().await,
        LineApiResponse::Failure { code, error } => {
            warn!(%code, "Access token refresh failed");
            if code == LineApiResponseCode::NetworkError {
                LineApiResponse::error(code, error)
            } else {
                first
            }
        }
    }
}

/// Wraps a [`LineApiClient`] so profile and friendship calls survive an
/// expired access token.
///
/// Logout, verify and refresh go straight to the inner client.
pub struct AutoRefreshLineApiClient<C> {
    inner: C,
}

impl<C: LineApiClient> AutoRefreshLineApiClient<C> {
    pub fn new(inner: C) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> C {
        self.inner
    }
}

#[async_trait]
impl<C: LineApiClient> LineApiClient for AutoRefreshLineApiClient<C> {
    async fn logout(&self) -> LineApiResponse<()> {
        self.inner.logout().await
    }

    async fn get_current_access_token(&self) -> LineApiResponse<LineAccessToken> {
        self.inner.get_current_access_token().await
    }

    async fn verify_token(&self) -> LineApiResponse<LineCredential> {
        self.inner.verify_token().await
    }

    async fn refresh_access_token(&self) -> LineApiResponse<LineAccessToken> {
        self.inner.refresh_access_token().await
    }

    async fn get_profile(&self) -> LineApiResponse<LineProfile> {
        call_with_auto_refresh(|| self.inner.get_profile(), || self.inner.refresh_access_token())
            .await
    }

    async fn get_friendship_status(&self) -> LineApiResponse<LineFriendshipStatus> {
        call_with_auto_refresh(
            || self.inner.get_friendship_status(),
            || self.inner.refresh_access_token(),
        )
        .await
    }
}
