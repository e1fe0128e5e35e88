//! Shared HTTP helpers: headers, URL joining, tolerant body reads.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::{Map, Value};

/// Status the backend uses to say "access token expired, refresh and retry".
pub const EXPIRY_SENTINEL: u16 = 299;

/// Whether a status counts as success for the request protocol.
pub fn is_success(status: u16) -> bool {
    matches!(status, 200 | 201)
}

/// Build default headers for a Bearer-token request.
///
/// Callers check [`is_valid_token`] first; an unusable token is logged and
/// left out.
pub fn bearer_headers(access_token: &str) -> HeaderMap {
    let mut headers = json_headers();
    match HeaderValue::from_str(&format!("Bearer {access_token}")) {
        Ok(val) => {
            headers.insert(AUTHORIZATION, val);
        }
        Err(e) => tracing::warn!(error = %e, "Dropping unusable Authorization header"),
    }
    headers
}

/// Whether a token can be carried in an `Authorization: Bearer` header.
pub fn is_valid_token(access_token: &str) -> bool {
    HeaderValue::from_str(&format!("Bearer {access_token}")).is_ok()
}

/// Build headers for an unauthenticated JSON request.
pub fn json_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers
}

/// Join a base URL and a server-relative path with exactly one slash.
pub fn join_url(base_url: &str, path: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{base}/{path}")
}

/// Read an error body, yielding an empty object when it is missing or not JSON.
pub async fn read_error_body(response: reqwest::Response) -> Value {
    let bytes = match response.bytes().await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::debug!(error = %e, "Failed to read error body");
            return Value::Object(Map::new());
        }
    };
    serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::Object(Map::new()))
}

/// Parse a success body; an empty body is `null`.
pub fn parse_success_body(bytes: &[u8]) -> Result<Value, serde_json::Error> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(bytes)
}
