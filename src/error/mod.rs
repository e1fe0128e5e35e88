//! Error types, the server error-code taxonomy, and the shared error slot.

pub mod center;
pub mod codes;
pub mod descriptor;
pub mod response;

pub use center::{CurrentError, ErrorCenter, ErrorSignal};
pub use codes::{ErrorCategory, ErrorCode, PASSTHROUGH_CODES};
pub use descriptor::{
    descriptors, ActionKind, ErrorDescriptor, Navigator, RecoveryAction, ResolvedAction,
};
pub use response::{resolve_code, ErrorResponse};

use thiserror::Error;

/// Primary error type for operations that return `Result`.
///
/// The authenticated request protocol itself never fails with this type;
/// its failures surface as [`crate::client::RequestOutcome::Failure`] and
/// through the [`ErrorCenter`].
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Credential store error: {0}")]
    Store(String),

    #[error("Request rejected ({code}): {message}")]
    Rejected { code: ErrorCode, message: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl ClientError {
    /// Build a rejection from a failed response, using the descriptor
    /// message when the body carried none.
    pub fn rejected(code: ErrorCode, message: Option<String>) -> Self {
        Self::Rejected {
            code,
            message: message.unwrap_or_else(|| code.display_descriptor().message.to_string()),
        }
    }

    /// Server error code behind this error, when there is one.
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            Self::Rejected { code, .. } => Some(*code),
            Self::Network(_) => Some(ErrorCode::NetworkError),
            _ => None,
        }
    }

    /// Whether the failed operation is worth retrying.
    pub fn is_retryable(&self) -> bool {
        self.code().is_some_and(ErrorCode::is_retryable)
    }
}

impl From<toml::de::Error> for ClientError {
    fn from(error: toml::de::Error) -> Self {
        Self::Store(error.to_string())
    }
}

impl From<toml::ser::Error> for ClientError {
    fn from(error: toml::ser::Error) -> Self {
        Self::Store(error.to_string())
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, ClientError>;
