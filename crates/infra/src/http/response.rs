//! Mapping HTTP outcomes onto [`LineApiResponse`].
//!
//! | Outcome                 | Response                               |
//! |-------------------------|----------------------------------------|
//! | 200 / 204 + parsed body | `SUCCESS`                              |
//! | body does not parse     | `INTERNAL_ERROR` with the parse error  |
//! | any other status        | `SERVER_ERROR` with status and body    |
//! | transport failure       | `NETWORK_ERROR`                        |

use linesdk_domain::{LineApiResponse, LineSdkError};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

/// Convert a sent request into a response envelope, parsing the body with
/// `parse` on success.
pub async fn read_response<T, F>(sent: Result<Response, LineSdkError>, parse: F) -> LineApiResponse<T>
where
    F: FnOnce(&str) -> Result<T, String>,
{
    let response = match sent {
        Ok(response) => response,
        Err(err) => return LineApiResponse::network_error(err.to_string()),
    };

    let status = response.status();
    let body = match response.text().await {
        Ok(body) => body,
        Err(err) => return LineApiResponse::network_error(err.to_string()),
    };

    if status != StatusCode::OK && status != StatusCode::NO_CONTENT {
        debug!(%status, "LINE API returned an error status");
        return LineApiResponse::server_error(i32::from(status.as_u16()), body);
    }

    match parse(&body) {
        Ok(data) => LineApiResponse::success(data),
        Err(message) => LineApiResponse::internal_error(message),
    }
}

/// Body parser for JSON payloads.
pub fn json<T: DeserializeOwned>(body: &str) -> Result<T, String> {
    serde_json::from_str(body).map_err(|err| format!("Failed to parse response: {err}"))
}

/// Body parser for endpoints without a meaningful payload.
pub fn no_content(_body: &str) -> Result<(), String> {
    Ok(())
}
