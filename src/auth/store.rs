use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::credentials::Credentials;
use crate::error::{ClientError, Result};

/// Storage for credentials that should outlive the process.
///
/// A session persists nothing unless it was given a store.
pub trait CredentialStore: Send + Sync {
    fn load(&self, profile: &str) -> Result<Option<Credentials>>;
    fn save(&self, profile: &str, credentials: &Credentials) -> Result<()>;
    fn clear(&self, profile: &str) -> Result<()>;
}

/// File-backed credential store using TOML files, one per profile.
///
/// # Example
/// ```no_run
/// use commonthread_client::auth::{CredentialStore, Credentials, FileCredentialStore};
///
/// let store = FileCredentialStore::new_default();
/// store.save("default", &Credentials::new("access", "refresh"))?;
/// # Ok::<(), commonthread_client::error::ClientError>(())
/// ```
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    base_dir: PathBuf,
}

impl FileCredentialStore {
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn new_default() -> Self {
        Self {
            base_dir: default_credentials_dir(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn credentials_path(&self, profile: &str) -> PathBuf {
        let profile = normalize_label(profile);
        if profile == "default" {
            self.base_dir.join("credentials.toml")
        } else {
            self.base_dir.join(format!("credentials.{profile}.toml"))
        }
    }

    fn ensure_parent(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self, profile: &str) -> Result<Option<Credentials>> {
        let path = self.credentials_path(profile);
        let raw = match fs::read_to_string(&path) {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(ClientError::Io(err)),
        };
        let file: CredentialFile = toml::from_str(&raw)?;
        Ok(Some(file.credentials))
    }

    fn save(&self, profile: &str, credentials: &Credentials) -> Result<()> {
        let path = self.credentials_path(profile);
        Self::ensure_parent(&path)?;
        let file = CredentialFile {
            version: 1,
            profile: profile.to_string(),
            credentials: credentials.clone(),
            saved_at: Utc::now(),
        };
        let serialized = toml::to_string(&file)?;
        fs::write(&path, serialized)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o600))?;
        }
        tracing::debug!(path = %path.display(), "Saved credentials");
        Ok(())
    }

    fn clear(&self, profile: &str) -> Result<()> {
        let path = self.credentials_path(profile);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(ClientError::Io(err)),
        }
    }
}

/// Process-local store, mostly useful in tests.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    entries: Mutex<HashMap<String, Credentials>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Credentials>>> {
        self.entries
            .lock()
            .map_err(|_| ClientError::Store("credential store lock poisoned".to_string()))
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn load(&self, profile: &str) -> Result<Option<Credentials>> {
        Ok(self.entries()?.get(&normalize_label(profile)).cloned())
    }

    fn save(&self, profile: &str, credentials: &Credentials) -> Result<()> {
        self.entries()?
            .insert(normalize_label(profile), credentials.clone());
        Ok(())
    }

    fn clear(&self, profile: &str) -> Result<()> {
        self.entries()?.remove(&normalize_label(profile));
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CredentialFile {
    version: u32,
    profile: String,
    credentials: Credentials,
    saved_at: DateTime<Utc>,
}

fn default_credentials_dir() -> PathBuf {
    directories::UserDirs::new()
        .map(|dirs| dirs.home_dir().join(".commonthread"))
        .unwrap_or_else(|| PathBuf::from(".commonthread"))
}

fn normalize_label(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return "default".to_string();
    }
    let out: String = trimmed
        .chars()
        .map(|ch| {
            let lower = ch.to_ascii_lowercase();
            if lower.is_ascii_alphanumeric() || lower == '-' {
                lower
            } else {
                '-'
            }
        })
        .collect();
    if out.trim_matches('-').is_empty() {
        "default".to_string()
    } else {
        out
    }
}
