//! Result of one authenticated call.

use serde_json::Value;

use crate::error::{resolve_code, ClientError, ErrorCode, ErrorResponse, Result};

/// Normalized outcome of [`super::AuthClient::request`].
#[derive(Debug, Clone, PartialEq)]
pub enum RequestOutcome {
    /// 200/201 response. `new_access_token` is set when the call went
    /// through a refresh cycle; persisting it is the caller's decision.
    Success {
        data: Value,
        new_access_token: Option<String>,
    },
    /// The call failed. Unless the failure was unclassified, the shared
    /// error slot already holds the corresponding error.
    Failure { error_code: ErrorCode },
    /// Domain error handed back untouched for the caller to render.
    PassthroughError { body: Value },
}

impl RequestOutcome {
    pub fn success(data: Value, new_access_token: Option<String>) -> Self {
        Self::Success {
            data,
            new_access_token,
        }
    }

    pub fn failure(error_code: ErrorCode) -> Self {
        Self::Failure { error_code }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Response data on success.
    pub fn data(&self) -> Option<&Value> {
        match self {
            Self::Success { data, .. } => Some(data),
            _ => None,
        }
    }

    /// Access token issued by a refresh during this call.
    pub fn new_access_token(&self) -> Option<&str> {
        match self {
            Self::Success {
                new_access_token, ..
            } => new_access_token.as_deref(),
            _ => None,
        }
    }

    /// Consume into the response data, discarding failures.
    pub fn into_data(self) -> Option<Value> {
        match self {
            Self::Success { data, .. } => Some(data),
            _ => None,
        }
    }

    /// Convert into a `Result` for typed helpers.
    ///
    /// Failures become [`ClientError::Rejected`]; a pass-through body keeps
    /// its code and message.
    pub fn into_result(self) -> Result<Value> {
        match self {
            Self::Success { data, .. } => Ok(data),
            Self::Failure { error_code } => Err(ClientError::rejected(error_code, None)),
            Self::PassthroughError { body } => {
                let error = ErrorResponse::from_body(&body, None);
                Err(ClientError::rejected(resolve_code(&error), error.message))
            }
        }
    }
}
