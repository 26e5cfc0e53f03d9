//! Persisted token storage.
//!
//! The client keeps exactly two strings between runs: the access token and
//! the refresh token. [`TokenStore`] abstracts where they live:
//!
//! - [`FileTokenStore`]: a JSON file on disk, written with 0600 permissions
//! - [`MemoryTokenStore`]: process memory, for tests and embedding
//!
//! Reads and writes are not coordinated across processes. Concurrent writers
//! race and the last write wins.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

/// Errors raised by token stores.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("token store lock poisoned")]
    Poisoned,
}

/// A freshly issued access/refresh token pair.
///
/// This is the body of a successful `POST /auth/refresh`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Whatever tokens are currently persisted. Either may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredTokens {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

impl From<TokenPair> for StoredTokens {
    fn from(pair: TokenPair) -> Self {
        Self {
            access_token: Some(pair.access_token),
            refresh_token: Some(pair.refresh_token),
        }
    }
}

/// Where the client persists its tokens.
pub trait TokenStore: Send + Sync {
    /// Read the currently persisted tokens.
    fn load(&self) -> Result<StoredTokens, StorageError>;

    /// Replace both tokens.
    fn save(&self, tokens: &TokenPair) -> Result<(), StorageError>;

    /// Remove both tokens.
    fn clear(&self) -> Result<(), StorageError>;
}

/// Tokens kept in memory only.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: Mutex<StoredTokens>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with tokens already present.
    pub fn with_tokens(tokens: StoredTokens) -> Self {
        Self {
            tokens: Mutex::new(tokens),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<StoredTokens, StorageError> {
        let tokens = self.tokens.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(tokens.clone())
    }

    fn save(&self, pair: &TokenPair) -> Result<(), StorageError> {
        let mut tokens = self.tokens.lock().map_err(|_| StorageError::Poisoned)?;
        *tokens = pair.clone().into();
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        let mut tokens = self.tokens.lock().map_err(|_| StorageError::Poisoned)?;
        *tokens = StoredTokens::default();
        Ok(())
    }
}

/// Tokens persisted as a JSON object in a file.
///
/// # File Format
///
/// ```json
/// { "access_token": "...", "refresh_token": "..." }
/// ```
///
/// A missing file reads as "no tokens". Clearing deletes the file.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<StoredTokens, StorageError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(StoredTokens::default());
            }
            Err(e) => return Err(self.io_error(e)),
        };

        serde_json::from_str(&contents).map_err(|source| StorageError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    fn save(&self, pair: &TokenPair) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
            }
        }

        let contents = serde_json::to_string_pretty(pair).map_err(|source| StorageError::Parse {
            path: self.path.clone(),
            source,
        })?;

        // Tokens are credentials: owner read/write only
        #[cfg(unix)]
        {
            use std::fs::OpenOptions;
            use std::io::Write;
            use std::os::unix::fs::OpenOptionsExt;

            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(&self.path)
                .map_err(|e| self.io_error(e))?;
            file.write_all(contents.as_bytes())
                .map_err(|e| self.io_error(e))?;
        }

        #[cfg(not(unix))]
        {
            fs::write(&self.path, contents).map_err(|e| self.io_error(e))?;
        }

        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }
}
