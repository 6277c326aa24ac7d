use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

pub const COOKIE_CONSENT_KEY: &str = "cookie-consent";
pub const INSTALL_DISMISSED_AT_KEY: &str = "pwa-install-dismissed-at";
pub const HINT_DISMISSED_KEY: &str = "hint-dismissed";
pub const TOOL_USAGE_KEY: &str = "tool-usage";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage is unavailable")]
    Unavailable,
    #[error("storage i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// String key-value store for one-shot dismissal flags and small counters.
pub trait FlagStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    fn has(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.get(key)?.is_some())
    }
}

/// In-process store. `unavailable()` builds one that rejects every access,
/// the way a browser with storage disabled behaves.
#[derive(Debug, Default)]
pub struct MemoryFlagStore {
    values: BTreeMap<String, String>,
    unavailable: bool,
}

impl MemoryFlagStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unavailable() -> Self {
        Self {
            values: BTreeMap::new(),
            unavailable: true,
        }
    }

    pub fn with_value(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }
}

impl FlagStore for MemoryFlagStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.unavailable {
            return Err(StorageError::Unavailable);
        }
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.unavailable {
            return Err(StorageError::Unavailable);
        }
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredFlags {
    #[serde(default)]
    flags: BTreeMap<String, String>,
}

/// Store persisted as a JSON document; every `set` writes the whole file.
#[derive(Debug)]
pub struct FileFlagStore {
    path: PathBuf,
    stored: StoredFlags,
}

impl FileFlagStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let stored = if path.exists() {
            let content = fs::read_to_string(&path)?;
            serde_json::from_str(&content)?
        } else {
            StoredFlags::default()
        };
        Ok(Self { path, stored })
    }

    /// Opens `path`, starting over with an empty store if the file is
    /// unreadable or corrupt.
    pub fn open_or_empty(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self::open(path.clone()).unwrap_or_else(|e| {
            log::error!("Failed to load flag store from {path:?}: {e}");
            Self {
                path,
                stored: StoredFlags::default(),
            }
        })
    }

    fn save(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(&self.stored)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

impl FlagStore for FileFlagStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.stored.flags.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.stored.flags.insert(key.to_string(), value.to_string());
        self.save()
    }
}

/// Reads a flag, treating any storage failure as "absent".
pub fn read_flag(store: &dyn FlagStore, key: &str) -> Option<String> {
    match store.get(key) {
        Ok(value) => value,
        Err(e) => {
            log::debug!("Ignoring storage read failure for {key}: {e}");
            None
        }
    }
}

/// Writes a flag, ignoring storage failures. Returns whether it persisted.
pub fn write_flag(store: &mut dyn FlagStore, key: &str, value: &str) -> bool {
    match store.set(key, value) {
        Ok(()) => true,
        Err(e) => {
            log::debug!("Ignoring storage write failure for {key}: {e}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn memory_store_get_set_has() {
        let mut store = MemoryFlagStore::new();
        assert!(!store.has(COOKIE_CONSENT_KEY).unwrap());

        store.set(COOKIE_CONSENT_KEY, "accepted").unwrap();

        assert!(store.has(COOKIE_CONSENT_KEY).unwrap());
        assert_eq!(
            store.get(COOKIE_CONSENT_KEY).unwrap().as_deref(),
            Some("accepted")
        );
    }

    #[test]
    fn unavailable_store_degrades_through_helpers() {
        let mut store = MemoryFlagStore::unavailable();

        assert!(store.get(HINT_DISMISSED_KEY).is_err());
        assert_eq!(read_flag(&store, HINT_DISMISSED_KEY), None);
        assert!(!write_flag(&mut store, HINT_DISMISSED_KEY, "true"));
    }

    #[test]
    fn file_store_persists_across_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("storage.json");

        let mut store = FileFlagStore::open(&path).unwrap();
        store.set(INSTALL_DISMISSED_AT_KEY, "1700000000000").unwrap();
        drop(store);

        let reopened = FileFlagStore::open(&path).unwrap();
        assert_eq!(
            reopened.get(INSTALL_DISMISSED_AT_KEY).unwrap().as_deref(),
            Some("1700000000000")
        );
    }

    #[test]
    fn corrupt_file_opens_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            FileFlagStore::open(&path),
            Err(StorageError::Corrupt(_))
        ));
        let store = FileFlagStore::open_or_empty(&path);
        assert_eq!(store.get(COOKIE_CONSENT_KEY).unwrap(), None);
    }
}
