//! Access-token refresh against the backend's refresh endpoint.

use serde::{Deserialize, Serialize};

use super::http::{is_valid_token, join_url, json_headers, read_error_body};
use super::AuthClient;
use crate::error::{ClientError, ErrorResponse, Result};

#[derive(Debug, Serialize)]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access_token: Option<String>,
}

impl AuthClient {
    /// Exchange a refresh token for a new access token.
    ///
    /// Returns `Ok(None)` when the server declines; the declining response
    /// has already been reported to the error slot. Never retried.
    pub async fn refresh(&self, refresh_token: &str) -> Result<Option<String>> {
        self.refresh_token(refresh_token)
            .await
            .map_err(ClientError::Network)
    }

    pub(super) async fn refresh_token(
        &self,
        refresh_token: &str,
    ) -> std::result::Result<Option<String>, reqwest::Error> {
        let url = join_url(&self.inner.base_url, &self.inner.refresh_path);
        let response = self
            .inner
            .http
            .post(&url)
            .headers(json_headers())
            .json(&RefreshRequest { refresh_token })
            .send()
            .await?;

        let status = response.status().as_u16();
        if status == 200 {
            let bytes = response.bytes().await?;
            let token = serde_json::from_slice::<RefreshResponse>(&bytes)
                .ok()
                .and_then(|body| body.access_token)
                .filter(|token| !token.is_empty() && is_valid_token(token));
            if token.is_none() {
                tracing::warn!("Refresh response carried no usable access token");
            }
            return Ok(token);
        }

        let body = read_error_body(response).await;
        let error = ErrorResponse::from_body(&body, Some(status));
        tracing::info!(status, code = ?error.code, "Token refresh rejected");
        self.inner.errors.report(error, None, Default::default());
        Ok(None)
    }
}
