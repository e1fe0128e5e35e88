//! Client configuration (layered: code > env > defaults).

use std::path::PathBuf;
use std::time::Duration;

use bon::Builder;

use crate::error::{ClientError, Result};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_REFRESH_PATH: &str = "/create_access";
pub const DEFAULT_LOGIN_PATH: &str = "/login";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for the CommonThread backend.
///
/// # Example
/// ```
/// use commonthread_client::config::ClientConfig;
///
/// let config = ClientConfig::builder()
///     .base_url("https://api.example.org")
///     .build();
/// assert_eq!(config.refresh_path, "/create_access");
/// ```
#[derive(Debug, Clone, Builder)]
pub struct ClientConfig {
    #[builder(into, default = DEFAULT_BASE_URL.to_string())]
    pub base_url: String,
    #[builder(into, default = DEFAULT_REFRESH_PATH.to_string())]
    pub refresh_path: String,
    #[builder(into, default = DEFAULT_LOGIN_PATH.to_string())]
    pub login_path: String,
    #[builder(default = DEFAULT_TIMEOUT)]
    pub timeout: Duration,
    /// Directory for persisted credentials; `None` uses `~/.commonthread`.
    pub credentials_dir: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ClientConfig {
    /// Load from environment variables, reading `.env` first if present.
    ///
    /// Recognized: `COMMONTHREAD_BASE_URL`, `COMMONTHREAD_REFRESH_PATH`,
    /// `COMMONTHREAD_LOGIN_PATH`, `COMMONTHREAD_TIMEOUT_SECS`,
    /// `COMMONTHREAD_CREDENTIALS_DIR`.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup, starting from defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(url) = lookup("COMMONTHREAD_BASE_URL") {
            config.base_url = url;
        }
        if let Some(path) = lookup("COMMONTHREAD_REFRESH_PATH") {
            config.refresh_path = path;
        }
        if let Some(path) = lookup("COMMONTHREAD_LOGIN_PATH") {
            config.login_path = path;
        }
        if let Some(raw) = lookup("COMMONTHREAD_TIMEOUT_SECS") {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                ClientError::Configuration(format!(
                    "COMMONTHREAD_TIMEOUT_SECS must be a whole number of seconds, got {raw:?}"
                ))
            })?;
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(dir) = lookup("COMMONTHREAD_CREDENTIALS_DIR") {
            config.credentials_dir = Some(PathBuf::from(dir));
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject settings the client cannot work with.
    pub fn validate(&self) -> Result<()> {
        let base = self.base_url.trim();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ClientError::Configuration(format!(
                "base URL must start with http:// or https://, got {:?}",
                self.base_url
            )));
        }
        if self.timeout.is_zero() {
            return Err(ClientError::Configuration(
                "timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
