use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;

use super::credentials::Credentials;
use super::store::CredentialStore;
use crate::client::{ApiRequest, AuthClient, RequestOutcome, TokenObserver};
use crate::error::{ErrorCenter, Result};

/// Owner of the credential pair for one logged-in user.
///
/// Tokens issued by a refresh cycle are applied here, persisted when a
/// store is configured, and published to [`Session::subscribe`] receivers.
/// Cloning yields another handle to the same session.
#[derive(Clone)]
pub struct Session {
    client: AuthClient,
    credentials: Arc<watch::Sender<Credentials>>,
    store: Option<Arc<dyn CredentialStore>>,
    profile: String,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("client", &self.client)
            .field("credentials", &*self.credentials.borrow())
            .field("store", &self.store.as_ref().map(|_| ".."))
            .field("profile", &self.profile)
            .finish()
    }
}

impl Session {
    /// In-memory session; nothing is persisted.
    pub fn new(client: AuthClient, credentials: Credentials) -> Self {
        let (credentials, _) = watch::channel(credentials);
        Self {
            client,
            credentials: Arc::new(credentials),
            store: None,
            profile: "default".to_string(),
        }
    }

    /// Session backed by a store, starting from whatever it holds for `profile`.
    pub fn with_store(
        client: AuthClient,
        store: Arc<dyn CredentialStore>,
        profile: impl Into<String>,
    ) -> Result<Self> {
        let profile = profile.into();
        let initial = store.load(&profile)?.unwrap_or_default();
        let mut session = Self::new(client, initial);
        session.store = Some(store);
        session.profile = profile;
        Ok(session)
    }

    pub fn client(&self) -> &AuthClient {
        &self.client
    }

    pub fn errors(&self) -> &ErrorCenter {
        self.client.errors()
    }

    pub fn credentials(&self) -> Credentials {
        self.credentials.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.credentials.borrow().is_authenticated()
    }

    /// Observe credential changes (login, refresh, logout).
    pub fn subscribe(&self) -> watch::Receiver<Credentials> {
        self.credentials.subscribe()
    }

    /// Replace the credentials and persist them if a store is configured.
    pub fn set_credentials(&self, credentials: Credentials) -> Result<()> {
        if let Some(store) = &self.store {
            store.save(&self.profile, &credentials)?;
        }
        self.credentials.send_replace(credentials);
        Ok(())
    }

    /// Log in and adopt the returned credential pair.
    pub async fn login(&self, username: &str, password: &str) -> Result<Credentials> {
        let credentials = self.client.login(username, password).await?;
        self.set_credentials(credentials.clone())?;
        Ok(credentials)
    }

    /// Forget the credentials, including any persisted copy.
    pub fn logout(&self) -> Result<()> {
        if let Some(store) = &self.store {
            store.clear(&self.profile)?;
        }
        self.credentials.send_replace(Credentials::default());
        tracing::info!(profile = %self.profile, "Logged out");
        Ok(())
    }

    /// Perform an authenticated call with the current credentials.
    ///
    /// Access tokens issued along the way are adopted, persisted and
    /// published, also when the call is re-issued through the retry
    /// capability of a `NETWORK_ERROR` report.
    pub async fn request(&self, request: ApiRequest) -> RequestOutcome {
        self.client
            .request_observed(request, &self.credentials(), self.token_observer())
            .await
    }

    fn token_observer(&self) -> TokenObserver {
        let credentials = Arc::clone(&self.credentials);
        let store = self.store.clone();
        let profile = self.profile.clone();
        Arc::new(move |token: &str| {
            let updated = credentials.borrow().with_access_token(token);
            if let Some(store) = &store {
                if let Err(e) = store.save(&profile, &updated) {
                    tracing::warn!(error = %e, "Failed to persist refreshed access token");
                }
            }
            tracing::debug!(profile = %profile, "Adopted refreshed access token");
            credentials.send_replace(updated);
        })
    }
}
