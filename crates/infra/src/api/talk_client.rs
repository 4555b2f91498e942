//! Profile and friendship endpoints.

use async_trait::async_trait;
use linesdk_core::TalkApi;
use linesdk_domain::{
    InternalAccessToken, LineApiResponse, LineAuthConfig, LineFriendshipStatus, LineProfile,
};
use reqwest::Method;
use serde::de::DeserializeOwned;
use tracing::instrument;
use url::Url;

use crate::http::response::{json, read_response};
use crate::http::HttpClient;

pub struct TalkApiClient {
    http: HttpClient,
    api_base_url: Url,
}

impl TalkApiClient {
    pub fn new(http: HttpClient, config: &LineAuthConfig) -> Self {
        Self { http, api_base_url: config.api_base_url.clone() }
    }

    async fn get_with_bearer<T: DeserializeOwned>(
        &self,
        path: &str,
        access_token: &InternalAccessToken,
    ) -> LineApiResponse<T> {
        let url = match self.api_base_url.join(path) {
            Ok(url) => url,
            Err(e) => return LineApiResponse::internal_error(format!("Invalid API base URL: {e}")),
        };
        let request =
            self.http.request(Method::GET, url).bearer_auth(&access_token.access_token);
        let sent = self.http.send(request).await;
        read_response(sent, json::<T>).await
    }
}

#[async_trait]
impl TalkApi for TalkApiClient {
    #[instrument(skip_all)]
    async fn get_profile(&self, access_token: &InternalAccessToken) -> LineApiResponse<LineProfile> {
        self.get_with_bearer("v2/profile", access_token).await
    }

    #[instrument(skip_all)]
    async fn get_friendship_status(
        &self,
        access_token: &InternalAccessToken,
    ) -> LineApiResponse<LineFriendshipStatus> {
        self.get_with_bearer("friendship/v1/status", access_token).await
    }
}
