//! Persisted session token
//!
//! The token is the only client state that survives a restart. It is stored
//! under the name `token` with a fixed expiry of one day from the moment it
//! was written; an expired token reads as absent and is removed.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ClientError, ClientResult};

/// Name the token is stored under
pub const TOKEN_NAME: &str = "token";

/// Lifetime given to a freshly stored token
pub fn token_lifetime() -> Duration {
    Duration::days(1)
}

/// Stored token entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredToken {
    pub name: String,
    pub value: String,
    pub expires_at: DateTime<Utc>,
}

impl StoredToken {
    pub fn new(value: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            name: TOKEN_NAME.to_string(),
            value: value.into(),
            expires_at,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Storage for the session token
pub trait TokenStore: Send + Sync {
    /// Read the raw entry, expired or not
    fn load(&self) -> ClientResult<Option<StoredToken>>;

    /// Write the entry, replacing any previous one
    fn save(&self, token: &StoredToken) -> ClientResult<()>;

    /// Remove the entry; removing a missing entry is not an error
    fn remove(&self) -> ClientResult<()>;

    /// Current token value, or `None` when absent or expired
    fn get(&self) -> ClientResult<Option<String>> {
        match self.load()? {
            Some(token) if token.is_expired(Utc::now()) => {
                debug!("Stored token expired at {}", token.expires_at);
                self.remove()?;
                Ok(None)
            }
            Some(token) => Ok(Some(token.value)),
            None => Ok(None),
        }
    }

    /// Store `value` with the fixed one-day lifetime
    fn set(&self, value: &str) -> ClientResult<()> {
        self.save(&StoredToken::new(value, Utc::now() + token_lifetime()))
    }
}

/// In-process token store
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    entry: Mutex<Option<StoredToken>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> ClientResult<std::sync::MutexGuard<'_, Option<StoredToken>>> {
        self.entry
            .lock()
            .map_err(|_| ClientError::TokenStore("token store lock poisoned".to_string()))
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> ClientResult<Option<StoredToken>> {
        Ok(self.lock()?.clone())
    }

    fn save(&self, token: &StoredToken) -> ClientResult<()> {
        *self.lock()? = Some(token.clone());
        Ok(())
    }

    fn remove(&self) -> ClientResult<()> {
        *self.lock()? = None;
        Ok(())
    }
}

/// Token store backed by a small JSON file
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> ClientResult<Option<StoredToken>> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(ClientError::TokenStore(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    e
                )));
            }
        };

        match serde_json::from_str::<StoredToken>(&raw) {
            Ok(token) if token.name == TOKEN_NAME => Ok(Some(token)),
            Ok(_) | Err(_) => {
                warn!("Ignoring unreadable token file {}", self.path.display());
                Ok(None)
            }
        }
    }

    fn save(&self, token: &StoredToken) -> ClientResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                ClientError::TokenStore(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }

        let body = serde_json::to_string_pretty(token)
            .map_err(|e| ClientError::TokenStore(format!("Failed to encode token: {}", e)))?;

        std::fs::write(&self.path, body).map_err(|e| {
            ClientError::TokenStore(format!("Failed to write {}: {}", self.path.display(), e))
        })
    }

    fn remove(&self) -> ClientResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ClientError::TokenStore(format!(
                "Failed to remove {}: {}",
                self.path.display(),
                e
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_uses_one_day_expiry() {
        let store = MemoryTokenStore::new();
        store.set("abc").unwrap();

        let stored = store.load().unwrap().unwrap();
        assert_eq!(stored.name, TOKEN_NAME);
        let remaining = stored.expires_at - Utc::now();
        assert!(remaining <= Duration::days(1));
        assert!(remaining > Duration::hours(23));
        assert_eq!(store.get().unwrap().as_deref(), Some("abc"));
    }

    #[test]
    fn expired_tokens_read_as_absent_and_are_removed() {
        let store = MemoryTokenStore::new();
        store
            .save(&StoredToken::new("old", Utc::now() - Duration::minutes(1)))
            .unwrap();

        assert_eq!(store.get().unwrap(), None);
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn file_store_round_trips_and_removes() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("nested").join("session.json"));

        assert_eq!(store.get().unwrap(), None);
        store.set("file-token").unwrap();
        assert_eq!(
            FileTokenStore::new(store.path()).get().unwrap().as_deref(),
            Some("file-token")
        );

        store.remove().unwrap();
        store.remove().unwrap();
        assert_eq!(store.get().unwrap(), None);
    }

    #[test]
    fn corrupt_file_reads_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json").unwrap();

        assert_eq!(FileTokenStore::new(&path).get().unwrap(), None);
    }
}
