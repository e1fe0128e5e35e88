//! Static table of user-facing error descriptors and their recovery actions.

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::codes::ErrorCode;

/// What a recovery action does when the user picks it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    /// Navigate to a fixed route.
    Navigate(&'static str),
    /// Navigate to the organization named by the `org_id` context entry.
    NavigateToOrg,
    /// Go back in navigation history.
    GoBack,
    /// Reload the current page.
    Reload,
    /// Re-issue the failed call through the error's retry capability.
    Retry,
    /// Acknowledge only.
    Dismiss,
}

/// A labeled recovery action offered alongside an error message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecoveryAction {
    pub label: &'static str,
    pub kind: ActionKind,
}

/// User-facing description of an error code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorDescriptor {
    pub code: ErrorCode,
    pub message: &'static str,
    pub actions: &'static [RecoveryAction],
}

/// Concrete navigation step produced by resolving an [`ActionKind`] against error context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedAction {
    Navigate(String),
    Back,
    Reload,
    Retry,
    Dismiss,
}

impl ActionKind {
    /// Resolve against the context map attached to the current error.
    ///
    /// `NavigateToOrg` falls back to `/` when the context carries no `org_id`.
    pub fn resolve(self, context: &Map<String, Value>) -> ResolvedAction {
        match self {
            Self::Navigate(path) => ResolvedAction::Navigate(path.to_string()),
            Self::NavigateToOrg => {
                let org = context.get("org_id").and_then(|value| match value {
                    Value::String(s) => Some(s.clone()),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                });
                match org {
                    Some(org) => ResolvedAction::Navigate(format!("/org/{org}")),
                    None => ResolvedAction::Navigate("/".to_string()),
                }
            }
            Self::GoBack => ResolvedAction::Back,
            Self::Reload => ResolvedAction::Reload,
            Self::Retry => ResolvedAction::Retry,
            Self::Dismiss => ResolvedAction::Dismiss,
        }
    }
}

/// Navigation surface of the consuming UI.
#[async_trait]
pub trait Navigator: Send + Sync {
    async fn navigate(&self, path: &str);
    async fn back(&self);
    async fn reload(&self);
}

const fn action(label: &'static str, kind: ActionKind) -> RecoveryAction {
    RecoveryAction { label, kind }
}

const LOGIN: RecoveryAction = action("Login", ActionKind::Navigate("/login"));
const GO_BACK: RecoveryAction = action("Go Back", ActionKind::GoBack);
const GO_HOME: RecoveryAction = action("Go Home", ActionKind::Navigate("/"));
const TRY_AGAIN: RecoveryAction = action("Try Again", ActionKind::Retry);
const OK: RecoveryAction = action("OK", ActionKind::Dismiss);

const INTERNAL_ERROR: ErrorDescriptor = ErrorDescriptor {
    code: ErrorCode::InternalError,
    message: "The issue is on our end. Please try again later or contact support.",
    actions: &[
        TRY_AGAIN,
        action("Contact Support", ActionKind::Navigate("/home")),
    ],
};

static DESCRIPTORS: &[ErrorDescriptor] = &[
    ErrorDescriptor {
        code: ErrorCode::NoToken,
        message: "No token provided",
        actions: &[LOGIN],
    },
    ErrorDescriptor {
        code: ErrorCode::InvalidToken,
        message: "Invalid token",
        actions: &[LOGIN],
    },
    ErrorDescriptor {
        code: ErrorCode::AccessTokenExpired,
        message: "Access token has expired",
        actions: &[action("Refresh Page", ActionKind::Reload)],
    },
    ErrorDescriptor {
        code: ErrorCode::RefreshTokenExpired,
        message: "Your login session has expired. Please log in again.",
        actions: &[action("Login Again", ActionKind::Navigate("/login"))],
    },
    ErrorDescriptor {
        code: ErrorCode::InsufficientPermissions,
        message: "You do not have permission to perform this action.",
        actions: &[GO_BACK],
    },
    ErrorDescriptor {
        code: ErrorCode::UserNotInOrg,
        message: "You are not a member of this organization.",
        actions: &[GO_BACK],
    },
    ErrorDescriptor {
        code: ErrorCode::InvalidCredentials,
        message: "Invalid username or password",
        actions: &[
            action("Try Again", ActionKind::Dismiss),
            action("Sign up", ActionKind::Navigate("/signup")),
        ],
    },
    ErrorDescriptor {
        code: ErrorCode::NotFound,
        message: "The requested resource was not found.",
        actions: &[GO_BACK],
    },
    ErrorDescriptor {
        code: ErrorCode::StoryNotFound,
        message: "The story you're looking for doesn't exist",
        actions: &[action("Go to Projects", ActionKind::NavigateToOrg), GO_HOME],
    },
    ErrorDescriptor {
        code: ErrorCode::ProjectNotFound,
        message: "The requested project was not found.",
        actions: &[GO_HOME],
    },
    ErrorDescriptor {
        code: ErrorCode::OrgNotFound,
        message: "The organization you're looking for doesn't exist",
        actions: &[GO_HOME],
    },
    ErrorDescriptor {
        code: ErrorCode::UserNotFound,
        message: "The requested user was not found.",
        actions: &[GO_BACK],
    },
    ErrorDescriptor {
        code: ErrorCode::InvalidJson,
        message: "The request body is not valid.",
        actions: &[TRY_AGAIN],
    },
    ErrorDescriptor {
        code: ErrorCode::MissingRequiredFields,
        message: "Missing required fields",
        actions: &[OK],
    },
    ErrorDescriptor {
        code: ErrorCode::InvalidFieldFormat,
        message: "Invalid field format",
        actions: &[OK],
    },
    ErrorDescriptor {
        code: ErrorCode::DuplicateUsername,
        message: "Username already exists",
        actions: &[action("Try Different Username", ActionKind::Dismiss)],
    },
    ErrorDescriptor {
        code: ErrorCode::DuplicateOrgName,
        message: "Organization name already exists",
        actions: &[action("Try Different Name", ActionKind::Dismiss)],
    },
    INTERNAL_ERROR,
    ErrorDescriptor {
        code: ErrorCode::DatabaseError,
        message: "The database operation failed. Please try again later or contact support.",
        actions: &[TRY_AGAIN],
    },
    ErrorDescriptor {
        code: ErrorCode::S3Error,
        message: "The file operation failed. Please try again later or contact support.",
        actions: &[TRY_AGAIN],
    },
    ErrorDescriptor {
        code: ErrorCode::NetworkError,
        message: "Unable to connect to server. Check your internet connection.",
        actions: &[TRY_AGAIN],
    },
    ErrorDescriptor {
        code: ErrorCode::StoryNotInOrg,
        message: "This story doesn't belong to this organization",
        actions: &[GO_BACK, GO_HOME],
    },
];

impl ErrorCode {
    /// Descriptor for this code, if the table has one.
    pub fn descriptor(self) -> Option<&'static ErrorDescriptor> {
        DESCRIPTORS.iter().find(|d| d.code == self)
    }

    /// Descriptor to display for this code, falling back to `INTERNAL_ERROR`.
    pub fn display_descriptor(self) -> &'static ErrorDescriptor {
        self.descriptor().unwrap_or(&INTERNAL_ERROR)
    }
}

/// All descriptors, in table order.
pub fn descriptors() -> &'static [ErrorDescriptor] {
    DESCRIPTORS
}
