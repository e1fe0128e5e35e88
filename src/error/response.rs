//! Error bodies returned by the backend and code resolution.

use serde_json::Value;

use super::codes::ErrorCode;

/// Normalized view of a failed response.
///
/// The backend sends `{"error": {"code": ..., "message": ...}}`; older
/// endpoints send `{"success": false, "error": "<text>"}`, which yields a
/// message and no code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorResponse {
    pub code: Option<String>,
    pub message: Option<String>,
    pub status: Option<u16>,
}

impl ErrorResponse {
    pub fn new(code: Option<String>, status: Option<u16>) -> Self {
        Self {
            code,
            message: None,
            status,
        }
    }

    /// Extract code and message from a parsed error body.
    pub fn from_body(body: &Value, status: Option<u16>) -> Self {
        let (code, message) = match body.get("error") {
            Some(Value::Object(error)) => (
                error.get("code").and_then(Value::as_str).map(String::from),
                error
                    .get("message")
                    .and_then(Value::as_str)
                    .map(String::from),
            ),
            Some(Value::String(text)) => (None, Some(text.clone())),
            _ => (None, None),
        };
        Self {
            code,
            message,
            status,
        }
    }

    /// The body's code, if it names a code with a descriptor.
    pub fn known_code(&self) -> Option<ErrorCode> {
        self.code.as_deref().and_then(ErrorCode::from_known)
    }

    /// The body's code parsed without the descriptor filter.
    pub fn parsed_code(&self) -> Option<ErrorCode> {
        self.code.as_deref().and_then(|code| code.parse().ok())
    }
}

/// Resolve the code to surface for a failed response.
///
/// A known descriptive code wins over the HTTP-status fallback; with
/// neither, the result is `INTERNAL_ERROR`.
pub fn resolve_code(response: &ErrorResponse) -> ErrorCode {
    if let Some(code) = response.known_code() {
        return code;
    }
    response
        .status
        .and_then(ErrorCode::from_status)
        .unwrap_or(ErrorCode::InternalError)
}
