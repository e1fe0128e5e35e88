//! Username/password login returning a fresh credential pair.

use serde::{Deserialize, Serialize};

use super::http::{join_url, json_headers, read_error_body};
use super::AuthClient;
use crate::auth::Credentials;
use crate::error::{resolve_code, ClientError, ErrorCode, ErrorResponse, Result};

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    post_data: LoginFields<'a>,
}

#[derive(Debug, Serialize)]
struct LoginFields<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    access_token: String,
    refresh_token: String,
}

impl AuthClient {
    /// Log in with a username and password.
    ///
    /// Failures are returned to the caller and never touch the error slot;
    /// a 401/403 without a descriptive code is `INVALID_CREDENTIALS`.
    pub async fn login(&self, username: &str, password: &str) -> Result<Credentials> {
        if username.is_empty() || password.is_empty() {
            return Err(ClientError::rejected(ErrorCode::MissingRequiredFields, None));
        }

        let url = join_url(&self.inner.base_url, &self.inner.login_path);
        let response = self
            .inner
            .http
            .post(&url)
            .headers(json_headers())
            .json(&LoginRequest {
                post_data: LoginFields { username, password },
            })
            .send()
            .await?;

        let status = response.status().as_u16();
        if status == 200 {
            let body: LoginResponse = serde_json::from_slice(&response.bytes().await?)?;
            tracing::info!(username, "Logged in");
            return Ok(Credentials::new(body.access_token, body.refresh_token));
        }

        let body = read_error_body(response).await;
        let error = ErrorResponse::from_body(&body, Some(status));
        let code = match error.known_code() {
            Some(code) => code,
            None if matches!(status, 401 | 403) => ErrorCode::InvalidCredentials,
            None => resolve_code(&error),
        };
        tracing::info!(username, status, code = %code, "Login rejected");
        Err(ClientError::rejected(code, error.message))
    }
}
