//! Convenience re-exports.

pub use crate::auth::{CredentialStore, Credentials, FileCredentialStore, Session};
pub use crate::chat::{ChatBox, ChatMessage, Sender};
pub use crate::client::{ApiRequest, AuthClient, NewUser, RequestOutcome, RetryCapability};
pub use crate::config::ClientConfig;
pub use crate::error::{ClientError, CurrentError, ErrorCenter, ErrorCode, Navigator};
pub use crate::stories::{NewStory, Stories, Story, StoryFilter, StoryTag};
