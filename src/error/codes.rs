//! Server error codes, their taxonomy, and the HTTP-status fallback table.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

/// Machine-readable error code reported by the backend (or synthesized locally).
///
/// The string form is the wire form, e.g. `ErrorCode::StoryNotFound` is `"STORY_NOT_FOUND"`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, IntoStaticStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    NoToken,
    InvalidToken,
    AccessTokenExpired,
    RefreshTokenExpired,
    InsufficientPermissions,
    UserNotInOrg,
    InvalidCredentials,
    NotFound,
    StoryNotFound,
    ProjectNotFound,
    OrgNotFound,
    UserNotFound,
    StoryNotInOrg,
    InvalidJson,
    MissingRequiredFields,
    InvalidFieldFormat,
    DuplicateUsername,
    DuplicateOrgName,
    AlreadyExists,
    InvalidStateTransition,
    InternalError,
    DatabaseError,
    #[serde(rename = "S3_ERROR")]
    #[strum(serialize = "S3_ERROR")]
    S3Error,
    NetworkError,
}

/// Broad error category for routing recovery logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Token missing, invalid or expired, or the caller lacks permission.
    Authentication,
    /// A looked-up resource does not exist or is not reachable from the caller's org.
    Lookup,
    /// The request itself was malformed or conflicts with existing data.
    Validation,
    /// Server-side failure; retryable, not user-fixable.
    Server,
    /// No response was received.
    Network,
}

/// Codes handed back to the caller instead of being routed to the shared error slot.
pub const PASSTHROUGH_CODES: &[ErrorCode] = &[
    ErrorCode::ProjectNotFound,
    ErrorCode::StoryNotFound,
    ErrorCode::OrgNotFound,
    ErrorCode::UserNotFound,
    ErrorCode::InvalidCredentials,
    ErrorCode::InsufficientPermissions,
    ErrorCode::UserNotInOrg,
];

/// Fallback codes used when a response carries no descriptive code.
const STATUS_FALLBACKS: &[(u16, ErrorCode)] = &[
    (400, ErrorCode::InvalidJson),
    (401, ErrorCode::InvalidToken),
    (403, ErrorCode::InsufficientPermissions),
    (404, ErrorCode::NotFound),
    (409, ErrorCode::AlreadyExists),
    (422, ErrorCode::InvalidStateTransition),
    (500, ErrorCode::InternalError),
    (503, ErrorCode::DatabaseError),
];

impl ErrorCode {
    /// Wire form of the code.
    pub fn as_str(self) -> &'static str {
        self.into()
    }

    /// Map an HTTP status to its fallback code, if the status has one.
    pub fn from_status(status: u16) -> Option<Self> {
        STATUS_FALLBACKS
            .iter()
            .find(|(s, _)| *s == status)
            .map(|(_, code)| *code)
    }

    /// Parse a wire code, accepting only codes that have a descriptor.
    ///
    /// `ALREADY_EXISTS` and `INVALID_STATE_TRANSITION` exist only as status
    /// fallbacks and are not accepted here.
    pub fn from_known(code: &str) -> Option<Self> {
        code.parse::<Self>()
            .ok()
            .filter(|parsed| parsed.descriptor().is_some())
    }

    /// Whether responses carrying this code bypass the shared error slot.
    pub fn is_passthrough(self) -> bool {
        PASSTHROUGH_CODES.contains(&self)
    }

    /// Classify this code into a category.
    pub fn category(self) -> ErrorCategory {
        match self {
            Self::NoToken
            | Self::InvalidToken
            | Self::AccessTokenExpired
            | Self::RefreshTokenExpired
            | Self::InsufficientPermissions
            | Self::UserNotInOrg
            | Self::InvalidCredentials => ErrorCategory::Authentication,
            Self::NotFound
            | Self::StoryNotFound
            | Self::ProjectNotFound
            | Self::OrgNotFound
            | Self::UserNotFound
            | Self::StoryNotInOrg => ErrorCategory::Lookup,
            Self::InvalidJson
            | Self::MissingRequiredFields
            | Self::InvalidFieldFormat
            | Self::DuplicateUsername
            | Self::DuplicateOrgName
            | Self::AlreadyExists
            | Self::InvalidStateTransition => ErrorCategory::Validation,
            Self::InternalError | Self::DatabaseError | Self::S3Error => ErrorCategory::Server,
            Self::NetworkError => ErrorCategory::Network,
        }
    }

    /// Whether retrying the same call might succeed.
    pub fn is_retryable(self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Server | ErrorCategory::Network
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_form_round_trips_through_strum() {
        assert_eq!(ErrorCode::StoryNotFound.as_str(), "STORY_NOT_FOUND");
        assert_eq!(ErrorCode::S3Error.as_str(), "S3_ERROR");
        assert_eq!(
            "USER_NOT_IN_ORG".parse::<ErrorCode>().unwrap(),
            ErrorCode::UserNotInOrg
        );
    }

    #[test]
    fn serde_uses_wire_form() {
        let json = serde_json::to_string(&ErrorCode::S3Error).unwrap();
        assert_eq!(json, "\"S3_ERROR\"");
        let parsed: ErrorCode = serde_json::from_str("\"INVALID_JSON\"").unwrap();
        assert_eq!(parsed, ErrorCode::InvalidJson);
    }

    #[test]
    fn status_fallbacks_match_table() {
        assert_eq!(ErrorCode::from_status(400), Some(ErrorCode::InvalidJson));
        assert_eq!(ErrorCode::from_status(401), Some(ErrorCode::InvalidToken));
        assert_eq!(
            ErrorCode::from_status(403),
            Some(ErrorCode::InsufficientPermissions)
        );
        assert_eq!(ErrorCode::from_status(404), Some(ErrorCode::NotFound));
        assert_eq!(ErrorCode::from_status(409), Some(ErrorCode::AlreadyExists));
        assert_eq!(
            ErrorCode::from_status(422),
            Some(ErrorCode::InvalidStateTransition)
        );
        assert_eq!(ErrorCode::from_status(500), Some(ErrorCode::InternalError));
        assert_eq!(ErrorCode::from_status(503), Some(ErrorCode::DatabaseError));
        assert_eq!(ErrorCode::from_status(418), None);
        assert_eq!(ErrorCode::from_status(299), None);
    }

    #[test]
    fn fallback_only_codes_are_not_known() {
        assert_eq!(ErrorCode::from_known("ALREADY_EXISTS"), None);
        assert_eq!(ErrorCode::from_known("INVALID_STATE_TRANSITION"), None);
        assert_eq!(ErrorCode::from_known("SOMETHING_ELSE"), None);
        assert_eq!(
            ErrorCode::from_known("DUPLICATE_ORG_NAME"),
            Some(ErrorCode::DuplicateOrgName)
        );
    }

    #[test]
    fn passthrough_set_is_exact() {
        let expected = [
            "PROJECT_NOT_FOUND",
            "STORY_NOT_FOUND",
            "ORG_NOT_FOUND",
            "USER_NOT_FOUND",
            "INVALID_CREDENTIALS",
            "INSUFFICIENT_PERMISSIONS",
            "USER_NOT_IN_ORG",
        ];
        for code in expected {
            assert!(code.parse::<ErrorCode>().unwrap().is_passthrough(), "{code}");
        }
        assert!(!ErrorCode::NotFound.is_passthrough());
        assert!(!ErrorCode::StoryNotInOrg.is_passthrough());
        assert!(!ErrorCode::RefreshTokenExpired.is_passthrough());
    }

    #[test]
    fn retryable_codes_are_server_and_network() {
        assert!(ErrorCode::NetworkError.is_retryable());
        assert!(ErrorCode::DatabaseError.is_retryable());
        assert!(ErrorCode::S3Error.is_retryable());
        assert!(!ErrorCode::InvalidToken.is_retryable());
        assert!(!ErrorCode::MissingRequiredFields.is_retryable());
        assert_eq!(ErrorCode::StoryNotInOrg.category(), ErrorCategory::Lookup);
    }
}
