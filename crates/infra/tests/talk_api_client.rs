//! Integration tests for the profile and friendship endpoints.

mod support;

use linesdk_core::TalkApi;
use linesdk_domain::LineApiResponseCode;
use linesdk_infra::TalkApiClient;
use serde_json::json;
use support::{auth_config, cached_token, http_client};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> TalkApiClient {
    TalkApiClient::new(http_client(), &auth_config(server))
}

/// Validates the profile request.
///
/// Assertions:
/// - Confirms the cached access token is sent as a bearer credential.
/// - Confirms the camelCase payload maps onto `LineProfile`.
#[tokio::test]
async fn get_profile_sends_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/profile"))
        .and(header("authorization", "Bearer access-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "userId": "U1234",
            "displayName": "Brown",
            "pictureUrl": "https://profile.line-scdn.net/abc",
            "statusMessage": "hello",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let profile = client(&server).get_profile(&cached_token()).await.into_data().expect("profile");

    assert_eq!(profile.user_id, "U1234");
    assert_eq!(profile.display_name, "Brown");
    assert_eq!(profile.status_message.as_deref(), Some("hello"));
}

#[tokio::test]
async fn expired_token_is_reported_as_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/profile"))
        .respond_with(ResponseTemplate::new(401).set_body_string(r#"{"message":"expired"}"#))
        .mount(&server)
        .await;

    let response = client(&server).get_profile(&cached_token()).await;

    assert!(response.is_unauthorized());
    assert_eq!(response.error_data().message(), r#"{"message":"expired"}"#);
}

#[tokio::test]
async fn get_friendship_status_reads_flag() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/friendship/v1/status"))
        .and(header("authorization", "Bearer access-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"friendFlag": true})))
        .mount(&server)
        .await;

    let status = client(&server).get_friendship_status(&cached_token()).await;

    assert!(status.into_data().expect("friendship status").friend_flag);
}

#[tokio::test]
async fn malformed_profile_is_an_internal_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/profile"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let response = client(&server).get_profile(&cached_token()).await;

    assert_eq!(response.response_code(), LineApiResponseCode::InternalError);
    assert!(response.error_data().message().starts_with("Failed to parse response"));
}
