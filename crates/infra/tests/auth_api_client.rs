//! Integration tests for the LINE auth API client against a mock server.

mod support;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use linesdk_common::PkceCode;
use linesdk_core::AuthenticationApi;
use linesdk_domain::{LineApiResponseCode, Scope};
use linesdk_infra::LineAuthApiClient;
use serde_json::json;
use support::{
    auth_config, cached_token, claims, http_client, mount_openid, signed_id_token, token_body,
    CHANNEL_ID,
};
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const REDIRECT_URI: &str = "intent://result#Intent;package=com.example.app;scheme=lineauth;end";

fn client(server: &MockServer) -> LineAuthApiClient {
    LineAuthApiClient::new(http_client(), &auth_config(server))
}

/// Validates the authorization code exchange with an ID token.
///
/// Assertions:
/// - Confirms the form carries the code, verifier and client id.
/// - Confirms `expires_in` is converted to milliseconds.
/// - Confirms the ID token is verified against the published key set.
#[tokio::test]
async fn issue_access_token_verifies_id_token() {
    let server = MockServer::start().await;
    mount_openid(&server).await;
    let id_token = signed_id_token(&claims("nonce-1"));
    let pkce = PkceCode::from_verifier("verifier-123");

    Mock::given(method("POST"))
        .and(path("/oauth2/v2.1/token"))
        .and(body_string_contains("grant_type=authorization_code"))
        .and(body_string_contains("code=request-token"))
        .and(body_string_contains("code_verifier=verifier-123"))
        .and(body_string_contains("client_id=1234567890"))
        .and(body_string_contains("id_token_key_type=JWK"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(token_body("Bearer", Some(&id_token))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let response =
        client(&server).issue_access_token(CHANNEL_ID, "request-token", &pkce, REDIRECT_URI).await;

    let result = response.into_data().expect("issue should succeed");
    assert_eq!(result.access_token.access_token, "access-1");
    assert_eq!(result.access_token.refresh_token, "refresh-1");
    assert_eq!(result.access_token.expires_in_millis, 2_592_000_000);
    assert_eq!(result.scopes, vec![Scope::Profile, Scope::OpenIdConnect]);

    let id_token = result.id_token.expect("id token parsed");
    assert_eq!(id_token.subject, "U1234");
    assert_eq!(id_token.audience, CHANNEL_ID);
    assert_eq!(id_token.nonce.as_deref(), Some("nonce-1"));
    assert_eq!(id_token.name.as_deref(), Some("Brown"));
}

#[tokio::test]
async fn issue_without_id_token_skips_key_lookup() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth2/v2.1/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("Bearer", None)))
        .mount(&server)
        .await;

    let response = client(&server)
        .issue_access_token(CHANNEL_ID, "request-token", &PkceCode::new_code(), REDIRECT_URI)
        .await;

    let result = response.into_data().expect("issue should succeed");
    assert!(result.id_token.is_none());
}

#[tokio::test]
async fn non_bearer_token_type_is_an_internal_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth2/v2.1/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("MAC", None)))
        .mount(&server)
        .await;

    let response = client(&server)
        .issue_access_token(CHANNEL_ID, "request-token", &PkceCode::new_code(), REDIRECT_URI)
        .await;

    assert_eq!(response.response_code(), LineApiResponseCode::InternalError);
    assert_eq!(response.error_data().message(), "Illegal token type. token_type=MAC");
}

/// Validates an ID token signed by a key the server does not publish.
///
/// Assertions:
/// - Confirms the exchange fails with INTERNAL_ERROR naming the kid.
#[tokio::test]
async fn id_token_with_unknown_key_fails_issue() {
    let server = MockServer::start().await;
    mount_openid(&server).await;

    let id_token = {
        let token = signed_id_token(&claims("nonce-1"));
        let mut parts: Vec<String> = token.split('.').map(str::to_owned).collect();
        let header = json!({"alg": "ES256", "typ": "JWT", "kid": "rotated-key"});
        parts[0] = URL_SAFE_NO_PAD.encode(header.to_string());
        parts.join(".")
    };
    Mock::given(method("POST"))
        .and(path("/oauth2/v2.1/token"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(token_body("Bearer", Some(&id_token))),
        )
        .mount(&server)
        .await;

    let response = client(&server)
        .issue_access_token(CHANNEL_ID, "request-token", &PkceCode::new_code(), REDIRECT_URI)
        .await;

    assert_eq!(response.response_code(), LineApiResponseCode::InternalError);
    assert!(response.error_data().message().contains("rotated-key"));
}

/// Validates a token lifetime too large to express in milliseconds.
///
/// Assertions:
/// - Confirms issue, refresh and verify report INTERNAL_ERROR instead of
///   overflowing.
#[tokio::test]
async fn oversized_expires_in_is_a_parse_failure() {
    let server = MockServer::start().await;
    let mut body = token_body("Bearer", None);
    body["expires_in"] = json!(i64::MAX);
    Mock::given(method("POST"))
        .and(path("/oauth2/v2.1/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/oauth2/v2.1/verify"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "client_id": CHANNEL_ID,
            "expires_in": i64::MAX,
            "scope": "profile",
        })))
        .mount(&server)
        .await;
    let client = client(&server);

    let issued = client
        .issue_access_token(CHANNEL_ID, "request-token", &PkceCode::new_code(), REDIRECT_URI)
        .await;
    let refreshed = client.refresh_token(CHANNEL_ID, &cached_token()).await;
    let verified = client.verify_token(&cached_token()).await;

    for (code, error) in [
        (issued.response_code(), issued.error_data()),
        (refreshed.response_code(), refreshed.error_data()),
        (verified.response_code(), verified.error_data()),
    ] {
        assert_eq!(code, LineApiResponseCode::InternalError);
        assert_eq!(error.message(), "Failed to parse response: expires_in out of range");
    }
}

#[tokio::test]
async fn token_endpoint_error_is_a_server_error() {
    let server = MockServer::start().await;
    let body = r#"{"error":"invalid_grant","error_description":"code expired"}"#;
    Mock::given(method("POST"))
        .and(path("/oauth2/v2.1/token"))
        .respond_with(ResponseTemplate::new(400).set_body_string(body))
        .mount(&server)
        .await;

    let response = client(&server)
        .issue_access_token(CHANNEL_ID, "request-token", &PkceCode::new_code(), REDIRECT_URI)
        .await;

    assert_eq!(response.response_code(), LineApiResponseCode::ServerError);
    let error = response.error_data();
    assert_eq!(error.http_response_code, 400);
    assert_eq!(error.message(), body);
}

/// Validates the refresh grant.
///
/// Assertions:
/// - Confirms the stored refresh token is sent.
/// - Confirms a response without `refresh_token` yields an empty one.
#[tokio::test]
async fn refresh_token_posts_refresh_grant() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth2/v2.1/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=refresh-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "access-2",
            "token_type": "Bearer",
            "expires_in": 3600,
            "scope": "profile",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = client(&server).refresh_token(CHANNEL_ID, &cached_token()).await;

    let refreshed = response.into_data().expect("refresh should succeed");
    assert_eq!(refreshed.access_token, "access-2");
    assert_eq!(refreshed.expires_in_millis, 3_600_000);
    assert_eq!(refreshed.refresh_token, "");
    assert_eq!(refreshed.scopes, vec![Scope::Profile]);
}

#[tokio::test]
async fn expired_refresh_token_is_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth2/v2.1/token"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid refresh token"))
        .mount(&server)
        .await;

    let response = client(&server).refresh_token(CHANNEL_ID, &cached_token()).await;

    assert!(response.is_unauthorized());
}

#[tokio::test]
async fn verify_token_queries_access_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/oauth2/v2.1/verify"))
        .and(query_param("access_token", "access-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "client_id": CHANNEL_ID,
            "expires_in": 1000,
            "scope": "profile openid unknown",
        })))
        .mount(&server)
        .await;

    let response = client(&server).verify_token(&cached_token()).await;

    let verified = response.into_data().expect("verify should succeed");
    assert_eq!(verified.channel_id, CHANNEL_ID);
    assert_eq!(verified.expires_in_millis, 1_000_000);
    assert_eq!(verified.scopes, vec![Scope::Profile, Scope::OpenIdConnect]);
}

#[tokio::test]
async fn revoke_calls_send_the_matching_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth2/v2.1/revoke"))
        .and(body_string_contains("refresh_token=refresh-1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/oauth2/v2.1/revoke"))
        .and(body_string_contains("access_token=access-1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    assert!(client.revoke_refresh_token(CHANNEL_ID, &cached_token()).await.is_success());
    assert!(client.revoke_access_token(CHANNEL_ID, &cached_token()).await.is_success());
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() {
    let server = MockServer::start().await;
    let client = client(&server);
    drop(server);

    let response = client.get_openid_discovery_document().await;

    assert_eq!(response.response_code(), LineApiResponseCode::NetworkError);
}
