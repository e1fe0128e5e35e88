//! Authenticated request client: bearer auth, expiry detection, one
//! refresh-and-retry cycle, and error routing.

pub mod http;
mod login;
pub mod outcome;
mod refresh;
pub mod retry;
mod signup;

pub use outcome::RequestOutcome;
pub use retry::RetryCapability;
pub use signup::NewUser;

use std::fmt;
use std::sync::Arc;

use futures::future::BoxFuture;
use reqwest::Method;
use serde_json::{Map, Value};

use crate::auth::Credentials;
use crate::config::ClientConfig;
use crate::error::{resolve_code, ClientError, ErrorCenter, ErrorCode, ErrorResponse, Result};
use http::{
    bearer_headers, is_success, is_valid_token, join_url, parse_success_body, read_error_body,
    EXPIRY_SENTINEL,
};

/// One logical API call: method, server-relative path, optional JSON body.
///
/// The body is sent only for non-GET methods.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::POST, path).json(body)
    }

    pub fn put(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::PUT, path).json(body)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Callback receiving access tokens issued by a refresh cycle.
pub type TokenObserver = Arc<dyn Fn(&str) + Send + Sync>;

struct ClientInner {
    http: reqwest::Client,
    base_url: String,
    refresh_path: String,
    login_path: String,
    errors: ErrorCenter,
}

/// HTTP client for the CommonThread API.
///
/// Cheap to clone; clones share the connection pool and the error slot.
///
/// # Example
/// ```no_run
/// use commonthread_client::auth::Credentials;
/// use commonthread_client::client::{ApiRequest, AuthClient, RequestOutcome};
/// use commonthread_client::config::ClientConfig;
/// use commonthread_client::error::ErrorCenter;
/// use serde_json::json;
///
/// # async fn example() -> commonthread_client::error::Result<()> {
/// let client = AuthClient::new(&ClientConfig::default(), ErrorCenter::new())?;
/// let credentials = Credentials::new("tok-A", "ref-A");
/// let request = ApiRequest::post("/project/42/chat", json!({ "user_message": "hi" }));
/// if let RequestOutcome::Success { data, .. } = client.request(request, &credentials).await {
///     println!("{data}");
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct AuthClient {
    inner: Arc<ClientInner>,
}

impl fmt::Debug for AuthClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthClient")
            .field("base_url", &self.inner.base_url)
            .field("refresh_path", &self.inner.refresh_path)
            .field("login_path", &self.inner.login_path)
            .finish()
    }
}

impl AuthClient {
    /// Build a client with its own connection pool.
    pub fn new(config: &ClientConfig, errors: ErrorCenter) -> Result<Self> {
        config.validate()?;
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .pool_max_idle_per_host(10)
            .build()
            .map_err(|e| ClientError::Configuration(format!("failed to build HTTP client: {e}")))?;
        Ok(Self::with_http_client(http, config, errors))
    }

    /// Build a client around an existing `reqwest::Client`.
    pub fn with_http_client(
        http: reqwest::Client,
        config: &ClientConfig,
        errors: ErrorCenter,
    ) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                http,
                base_url: config.base_url.trim().to_string(),
                refresh_path: config.refresh_path.clone(),
                login_path: config.login_path.clone(),
                errors,
            }),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// The error slot this client reports into.
    pub fn errors(&self) -> &ErrorCenter {
        &self.inner.errors
    }

    /// Perform one authenticated call, handling at most one refresh cycle.
    ///
    /// Never returns an error: failures become [`RequestOutcome::Failure`]
    /// (usually with a report in the error slot) or
    /// [`RequestOutcome::PassthroughError`].
    pub fn request(
        &self,
        request: ApiRequest,
        credentials: &Credentials,
    ) -> BoxFuture<'static, RequestOutcome> {
        self.dispatch(request, credentials.clone(), None)
    }

    /// Like [`AuthClient::request`], but `observer` sees every access token
    /// issued by a refresh cycle, including one run by a later
    /// [`RetryCapability::invoke`] of this call.
    pub fn request_observed(
        &self,
        request: ApiRequest,
        credentials: &Credentials,
        observer: TokenObserver,
    ) -> BoxFuture<'static, RequestOutcome> {
        self.dispatch(request, credentials.clone(), Some(observer))
    }

    fn dispatch(
        &self,
        request: ApiRequest,
        credentials: Credentials,
        observer: Option<TokenObserver>,
    ) -> BoxFuture<'static, RequestOutcome> {
        let client = self.clone();
        Box::pin(async move { client.run(request, credentials, observer).await })
    }

    async fn run(
        &self,
        request: ApiRequest,
        credentials: Credentials,
        observer: Option<TokenObserver>,
    ) -> RequestOutcome {
        if !is_valid_token(&credentials.access_token) {
            tracing::warn!(path = %request.path, "Access token is not a valid header value");
            return RequestOutcome::failure(ErrorCode::InvalidToken);
        }

        match self.execute(&request, &credentials).await {
            Ok(outcome) => {
                if let (Some(observer), Some(token)) = (&observer, outcome.new_access_token()) {
                    (**observer)(token);
                }
                outcome
            }
            Err(e) => {
                tracing::warn!(
                    method = %request.method,
                    path = %request.path,
                    error = %e,
                    "Request never reached the server"
                );
                let mut context = Map::new();
                context.insert("method".to_string(), Value::from(request.method.as_str()));
                context.insert("path".to_string(), Value::from(request.path.as_str()));

                let client = self.clone();
                let retry = RetryCapability::new(move || {
                    client.dispatch(request.clone(), credentials.clone(), observer.clone())
                });
                self.inner
                    .errors
                    .report(ErrorCode::NetworkError, Some(retry), context);
                RequestOutcome::failure(ErrorCode::NetworkError)
            }
        }
    }

    /// The request state machine. `Err` means a transport failure anywhere
    /// along the way.
    async fn execute(
        &self,
        request: &ApiRequest,
        credentials: &Credentials,
    ) -> std::result::Result<RequestOutcome, reqwest::Error> {
        let response = self.send(request, &credentials.access_token).await?;
        let status = response.status().as_u16();
        tracing::debug!(method = %request.method, path = %request.path, status, "Primary response");

        if is_success(status) {
            return self.read_success(response, None).await;
        }

        if status == EXPIRY_SENTINEL {
            return self.refresh_and_retry(request, credentials).await;
        }

        let body = read_error_body(response).await;
        let error = ErrorResponse::from_body(&body, Some(status));

        if error.parsed_code().is_some_and(ErrorCode::is_passthrough) {
            tracing::debug!(status, code = ?error.code, "Passing domain error to caller");
            return Ok(RequestOutcome::PassthroughError { body });
        }

        if error.parsed_code() == Some(ErrorCode::RefreshTokenExpired) {
            self.inner.errors.report_code(ErrorCode::RefreshTokenExpired);
            return Ok(RequestOutcome::failure(ErrorCode::RefreshTokenExpired));
        }

        let code = resolve_code(&error);
        tracing::debug!(status, code = %code, "Unclassified failure, not reported");
        Ok(RequestOutcome::failure(code))
    }

    async fn refresh_and_retry(
        &self,
        request: &ApiRequest,
        credentials: &Credentials,
    ) -> std::result::Result<RequestOutcome, reqwest::Error> {
        let Some(new_token) = self.refresh_token(&credentials.refresh_token).await? else {
            tracing::info!(path = %request.path, "Refresh yielded no token");
            self.inner.errors.report_code(ErrorCode::RefreshTokenExpired);
            return Ok(RequestOutcome::failure(ErrorCode::RefreshTokenExpired));
        };

        let response = self.send(request, &new_token).await?;
        let status = response.status().as_u16();
        tracing::debug!(method = %request.method, path = %request.path, status, "Retry response");

        if is_success(status) {
            return self.read_success(response, Some(new_token)).await;
        }

        let body = read_error_body(response).await;
        let code = resolve_code(&ErrorResponse::from_body(&body, None));
        self.inner.errors.report_code(code);
        Ok(RequestOutcome::failure(code))
    }

    async fn send(
        &self,
        request: &ApiRequest,
        access_token: &str,
    ) -> std::result::Result<reqwest::Response, reqwest::Error> {
        let url = join_url(&self.inner.base_url, &request.path);
        let mut builder = self
            .inner
            .http
            .request(request.method.clone(), &url)
            .headers(bearer_headers(access_token));
        if request.method != Method::GET {
            if let Some(body) = &request.body {
                builder = builder.json(body);
            }
        }
        builder.send().await
    }

    async fn read_success(
        &self,
        response: reqwest::Response,
        new_access_token: Option<String>,
    ) -> std::result::Result<RequestOutcome, reqwest::Error> {
        let bytes = response.bytes().await?;
        match parse_success_body(&bytes) {
            Ok(data) => Ok(RequestOutcome::success(data, new_access_token)),
            Err(e) => {
                tracing::warn!(error = %e, "Success response was not valid JSON");
                self.inner.errors.report_code(ErrorCode::InternalError);
                Ok(RequestOutcome::failure(ErrorCode::InternalError))
            }
        }
    }
}
