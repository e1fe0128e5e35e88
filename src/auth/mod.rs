//! Credential pair, its persistence, and the session that owns it.

pub mod credentials;
pub mod session;
pub mod store;

pub use credentials::Credentials;
pub use session::Session;
pub use store::{CredentialStore, FileCredentialStore, InMemoryCredentialStore};
