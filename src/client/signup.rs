//! Account creation.

use bon::Builder;
use serde::{Deserialize, Serialize};

use super::http::{is_success, join_url, json_headers, read_error_body};
use super::AuthClient;
use crate::error::{resolve_code, ClientError, ErrorCode, ErrorResponse, Result};

const SIGNUP_PATH: &str = "/user/create";

/// Legacy message the backend sends for a taken username.
const USERNAME_TAKEN: &str = "Username already exists";

/// Registration form for a new account.
///
/// # Example
/// ```
/// use commonthread_client::client::NewUser;
///
/// let user = NewUser::builder()
///     .username("ada")
///     .password("lovelace")
///     .email("ada@example.org")
///     .build();
/// assert_eq!(user.city, None);
/// ```
#[derive(Debug, Clone, Serialize, Builder)]
pub struct NewUser {
    #[builder(into)]
    pub username: String,
    #[builder(into)]
    pub password: String,
    #[builder(into)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[builder(into)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[builder(into)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[builder(into)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SignupResponse {
    user_id: i64,
}

impl AuthClient {
    /// Create an account and return its user id.
    ///
    /// No tokens are issued; log in afterwards. Like login, failures are
    /// returned to the caller and never touch the error slot.
    pub async fn signup(&self, user: &NewUser) -> Result<i64> {
        if user.username.is_empty() || user.password.is_empty() {
            return Err(ClientError::rejected(ErrorCode::MissingRequiredFields, None));
        }

        let url = join_url(&self.inner.base_url, SIGNUP_PATH);
        let response = self
            .inner
            .http
            .post(&url)
            .headers(json_headers())
            .json(user)
            .send()
            .await?;

        let status = response.status().as_u16();
        if is_success(status) {
            let body: SignupResponse = serde_json::from_slice(&response.bytes().await?)?;
            tracing::info!(username = %user.username, user_id = body.user_id, "Account created");
            return Ok(body.user_id);
        }

        let body = read_error_body(response).await;
        let error = ErrorResponse::from_body(&body, Some(status));
        let code = match error.known_code() {
            Some(code) => code,
            None if error.message.as_deref() == Some(USERNAME_TAKEN) => ErrorCode::DuplicateUsername,
            None => resolve_code(&error),
        };
        tracing::info!(username = %user.username, status, code = %code, "Signup rejected");
        Err(ClientError::rejected(code, error.message))
    }
}
