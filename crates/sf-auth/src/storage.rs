//! Token storage for persisting refreshed sessions.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, ErrorKind, Result};
use crate::notifier::TokenRefreshNotifier;
use crate::token::AccessToken;

/// Trait for token storage implementations.
pub trait TokenStorage: Send + Sync {
    /// Save a token.
    fn save(&self, key: &str, token: &AccessToken) -> Result<()>;

    /// Load a token.
    fn load(&self, key: &str) -> Result<Option<AccessToken>>;

    /// Delete a token.
    fn delete(&self, key: &str) -> Result<()>;

    /// Check if a token exists.
    fn exists(&self, key: &str) -> Result<bool>;

    /// List all stored token keys.
    fn list(&self) -> Result<Vec<String>>;
}

/// File-based token storage.
#[derive(Debug, Clone)]
pub struct FileTokenStorage {
    base_path: PathBuf,
}

impl FileTokenStorage {
    /// Create a new file token storage with the default path.
    ///
    /// Default path: `~/.restforce/tokens/`
    pub fn new() -> Result<Self> {
        let base_path = default_token_dir()?;
        Ok(Self { base_path })
    }

    /// Create a new file token storage with a custom path.
    pub fn with_path(path: impl AsRef<Path>) -> Self {
        Self {
            base_path: path.as_ref().to_path_buf(),
        }
    }

    /// A notifier that saves every refreshed token under `key`.
    pub fn notifier(&self, key: impl Into<String>) -> StorageNotifier<Self> {
        StorageNotifier::new(self.clone(), key)
    }

    /// Get the token file path for a key.
    fn token_path(&self, key: &str) -> PathBuf {
        let safe_key = key
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect::<String>();

        self.base_path.join(format!("{}.json", safe_key))
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.base_path.exists() {
            std::fs::create_dir_all(&self.base_path)?;
        }
        Ok(())
    }
}

impl TokenStorage for FileTokenStorage {
    fn save(&self, key: &str, token: &AccessToken) -> Result<()> {
        self.ensure_dir()?;

        let path = self.token_path(key);
        let stored = StoredToken {
            token: token.clone(),
            stored_at: chrono::Utc::now(),
        };

        let json = serde_json::to_string_pretty(&stored)?;
        std::fs::write(&path, json)?;

        // Set restrictive permissions on Unix
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&path, perms)?;
        }

        Ok(())
    }

    fn load(&self, key: &str) -> Result<Option<AccessToken>> {
        let path = self.token_path(key);

        if !path.exists() {
            return Ok(None);
        }

        let json = std::fs::read_to_string(&path)?;
        let stored: StoredToken = serde_json::from_str(&json)?;

        Ok(Some(stored.token))
    }

    fn delete(&self, key: &str) -> Result<()> {
        let path = self.token_path(key);

        if path.exists() {
            std::fs::remove_file(&path)?;
        }

        Ok(())
    }

    fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.token_path(key).exists())
    }

    fn list(&self) -> Result<Vec<String>> {
        if !self.base_path.exists() {
            return Ok(Vec::new());
        }

        let mut keys = Vec::new();
        for entry in std::fs::read_dir(&self.base_path)? {
            let path = entry?.path();

            if path.extension().map(|e| e == "json").unwrap_or(false) {
                if let Some(stem) = path.file_stem() {
                    keys.push(stem.to_string_lossy().to_string());
                }
            }
        }

        Ok(keys)
    }
}

/// Adapts any [`TokenStorage`] into a [`TokenRefreshNotifier`].
///
/// A failed save is logged and swallowed: losing persistence must not fail
/// the request that triggered the refresh.
#[derive(Debug, Clone)]
pub struct StorageNotifier<S> {
    storage: S,
    key: String,
}

impl<S: TokenStorage> StorageNotifier<S> {
    /// Save refreshed tokens into `storage` under `key`.
    pub fn new(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    /// The storage key tokens are saved under.
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl<S: TokenStorage> TokenRefreshNotifier for StorageNotifier<S> {
    fn on_token_refreshed(&self, token: &AccessToken) {
        match self.storage.save(&self.key, token) {
            Ok(()) => debug!(key = %self.key, "Persisted refreshed token"),
            Err(err) => warn!(key = %self.key, error = %err, "Failed to persist refreshed token"),
        }
    }
}

/// Token with storage metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredToken {
    token: AccessToken,
    stored_at: chrono::DateTime<chrono::Utc>,
}

/// Get the default token storage directory.
pub fn default_token_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| Error::new(ErrorKind::Config("Could not find home directory".to_string())))?;

    Ok(home.join(".restforce").join("tokens"))
}
