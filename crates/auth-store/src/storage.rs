//! Persistent key-value storage for session tokens.

use crate::error::AuthStoreError;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use tracing::{debug, info};

/// String key-value storage that survives between runs.
pub trait TokenStorage: Send + Sync {
    /// Read a value. `Ok(None)` when the key is absent.
    fn get_item(&self, key: &str) -> Result<Option<String>, AuthStoreError>;

    /// Insert or overwrite a value.
    fn set_item(&self, key: &str, value: &str) -> Result<(), AuthStoreError>;

    /// Remove a value, returning whether one was present.
    fn remove_item(&self, key: &str) -> Result<bool, AuthStoreError>;
}

/// Process-local storage (nothing is written to disk).
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RwLock<BTreeMap<String, String>>,
}

impl MemoryStorage {
    /// Create an empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a storage pre-populated with a single entry.
    pub fn with_item(key: impl Into<String>, value: impl Into<String>) -> Self {
        let storage = Self::new();
        storage
            .items
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into(), value.into());
        storage
    }
}

impl TokenStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, AuthStoreError> {
        let items = self.items.read().unwrap_or_else(PoisonError::into_inner);
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), AuthStoreError> {
        let mut items = self.items.write().unwrap_or_else(PoisonError::into_inner);
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<bool, AuthStoreError> {
        let mut items = self.items.write().unwrap_or_else(PoisonError::into_inner);
        Ok(items.remove(key).is_some())
    }
}

/// Storage backed by a single JSON object on disk.
///
/// The file is read on every access so that writes made by another process
/// (for example a login command) are observed. A missing file reads as an
/// empty storage.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Create a storage rooted at `path`. The file is not touched until first use.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>, AuthStoreError> {
        if !self.path.exists() {
            debug!("Storage file {:?} not found, treating as empty", self.path);
            return Ok(BTreeMap::new());
        }

        let contents = fs::read_to_string(&self.path)?;
        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        Ok(serde_json::from_str(&contents)?)
    }

    fn save(&self, items: &BTreeMap<String, String>) -> Result<(), AuthStoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let contents = serde_json::to_string_pretty(items)?;

        // Write atomically using temp file + rename
        let temp_path = self.path.with_extension("tmp");
        write_private(&temp_path, contents.as_bytes())?;
        fs::rename(&temp_path, &self.path)?;

        debug!("Saved {} storage entries to {:?}", items.len(), self.path);
        Ok(())
    }
}

impl TokenStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, AuthStoreError> {
        Ok(self.load()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), AuthStoreError> {
        let mut items = self.load()?;
        items.insert(key.to_string(), value.to_string());
        self.save(&items)
    }

    fn remove_item(&self, key: &str) -> Result<bool, AuthStoreError> {
        let mut items = self.load()?;
        if items.remove(key).is_none() {
            return Ok(false);
        }
        self.save(&items)?;
        info!("Removed '{}' from {:?}", key, self.path);
        Ok(true)
    }
}

/// Write with owner-only permissions where the platform supports it.
fn write_private(path: &Path, contents: &[u8]) -> Result<(), AuthStoreError> {
    #[cfg(unix)]
    {
        use std::io::Write;
        use std::os::unix::fs::OpenOptionsExt;

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(path)?;
        file.write_all(contents)?;
    }

    #[cfg(not(unix))]
    {
        fs::write(path, contents)?;
    }

    Ok(())
}
