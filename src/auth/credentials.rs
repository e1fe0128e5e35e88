use std::fmt;

use serde::{Deserialize, Serialize};

/// Access/refresh token pair held by the calling context.
///
/// Empty strings mean "not authenticated"; they are still sent as-is so
/// the server can answer with `NO_TOKEN`/`INVALID_TOKEN`.
///
/// # Example
/// ```
/// use commonthread_client::auth::Credentials;
///
/// let credentials = Credentials::new("tok-A", "ref-A");
/// assert!(credentials.is_authenticated());
/// assert_eq!(credentials.with_access_token("tok-B").access_token, "tok-B");
/// ```
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub access_token: String,
    pub refresh_token: String,
}

impl Credentials {
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        !self.access_token.is_empty() || !self.refresh_token.is_empty()
    }

    /// Same refresh token, new access token.
    pub fn with_access_token(&self, access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: self.refresh_token.clone(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn redact(token: &str) -> &'static str {
            if token.is_empty() {
                "<empty>"
            } else {
                "<redacted>"
            }
        }
        f.debug_struct("Credentials")
            .field("access_token", &redact(&self.access_token))
            .field("refresh_token", &redact(&self.refresh_token))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_never_prints_tokens() {
        let rendered = format!("{:?}", Credentials::new("secret-a", ""));
        assert!(!rendered.contains("secret-a"));
        assert!(rendered.contains("<redacted>"));
        assert!(rendered.contains("<empty>"));
    }

    #[test]
    fn default_is_unauthenticated() {
        assert!(!Credentials::default().is_authenticated());
        assert!(Credentials::new("", "ref").is_authenticated());
    }
}
