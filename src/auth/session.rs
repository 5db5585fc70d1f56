//! Credential persistence and the session handle

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use log::{debug, warn};

use crate::config::DEFAULT_TOKEN_KEY;
use crate::error::Error;

/// Key/value storage for the credential token
pub trait TokenStore: Send + Sync {
    /// Read the value stored under `key`
    fn load(&self, key: &str) -> Result<Option<String>, Error>;

    /// Store `token` under `key`, replacing any previous value
    fn save(&self, key: &str, token: &str) -> Result<(), Error>;

    /// Remove the value stored under `key`
    fn remove(&self, key: &str) -> Result<(), Error>;
}

/// In-process token storage
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryTokenStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self, key: &str) -> Result<Option<String>, Error> {
        let values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(values.get(key).cloned())
    }

    fn save(&self, key: &str, token: &str) -> Result<(), Error> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.insert(key.to_string(), token.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), Error> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.remove(key);
        Ok(())
    }
}

/// Token storage backed by a JSON object on disk
///
/// The file holds a flat `{ "key": "value" }` map, so several keys can
/// share one file. A missing file reads as empty.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    // serializes read-modify-write cycles within the process
    guard: Mutex<()>,
}

impl FileTokenStore {
    /// Create a store persisting to `path`
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            guard: Mutex::new(()),
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<HashMap<String, String>, Error> {
        match fs::read_to_string(&self.path) {
            Ok(text) if text.trim().is_empty() => Ok(HashMap::new()),
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(err) => Err(err.into()),
        }
    }

    fn write_map(&self, map: &HashMap<String, String>) -> Result<(), Error> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, serde_json::to_vec_pretty(map)?)?;
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self, key: &str) -> Result<Option<String>, Error> {
        let _guard = self.guard.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(self.read_map()?.remove(key))
    }

    fn save(&self, key: &str, token: &str) -> Result<(), Error> {
        let _guard = self.guard.lock().unwrap_or_else(PoisonError::into_inner);
        let mut map = self.read_map()?;
        map.insert(key.to_string(), token.to_string());
        self.write_map(&map)
    }

    fn remove(&self, key: &str) -> Result<(), Error> {
        let _guard = self.guard.lock().unwrap_or_else(PoisonError::into_inner);
        let mut map = self.read_map()?;
        if map.remove(key).is_some() {
            self.write_map(&map)?;
        }
        Ok(())
    }
}

/// Handle on the stored credential
///
/// Cloning is cheap; every clone reads and writes the same store, which
/// makes the store the single source of truth for the token.
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn TokenStore>,
    key: String,
}

impl Session {
    /// Create a session over `store`, using `key` as the storage key
    pub fn new(store: Arc<dyn TokenStore>, key: &str) -> Self {
        Self {
            store,
            key: key.to_string(),
        }
    }

    /// Create a session kept in memory only
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryTokenStore::new()), DEFAULT_TOKEN_KEY)
    }

    /// The storage key
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Current token, if one is stored
    ///
    /// Storage failures are logged and read as "no token".
    pub fn token(&self) -> Option<String> {
        match self.store.load(&self.key) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(err) => {
                warn!("Failed to read token '{}': {}", self.key, err);
                None
            }
        }
    }

    /// Whether a token is stored
    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Persist a new token
    pub fn store_token(&self, token: &str) -> Result<(), Error> {
        debug!("Storing token under '{}'", self.key);
        self.store.save(&self.key, token)
    }

    /// Forget the token
    pub fn clear(&self) -> Result<(), Error> {
        debug!("Clearing token under '{}'", self.key);
        self.store.remove(&self.key)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("key", &self.key)
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}
