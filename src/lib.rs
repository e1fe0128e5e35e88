//! Client for the CommonThread storytelling API.
//!
//! The core is [`client::AuthClient::request`]: a bearer-token call that
//! detects the backend's access-token expiry sentinel (HTTP 299), refreshes
//! the token, and retries exactly once. Failures are routed to a single
//! shared [`error::ErrorCenter`] slot, except domain lookup and permission
//! errors, which are handed back to the caller.
//!
//! # Quick Start
//!
//! ```no_run
//! use commonthread_client::prelude::*;
//! use serde_json::json;
//!
//! # async fn example() -> commonthread_client::error::Result<()> {
//! let config = ClientConfig::from_env()?;
//! let client = AuthClient::new(&config, ErrorCenter::new())?;
//! let session = Session::new(client, Credentials::default());
//! session.login("storyteller", "hunter2").await?;
//!
//! let outcome = session
//!     .request(ApiRequest::post("/project/42/chat", json!({ "user_message": "hi" })))
//!     .await;
//! match outcome {
//!     RequestOutcome::Success { data, .. } => println!("{data}"),
//!     RequestOutcome::PassthroughError { body } => println!("{body}"),
//!     RequestOutcome::Failure { .. } => {
//!         if let Some(error) = session.errors().current() {
//!             eprintln!("{}", error.message());
//!         }
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod chat;
pub mod client;
pub mod config;
pub mod error;
pub mod prelude;
pub mod stories;

#[cfg(feature = "cli")]
pub mod cli;
