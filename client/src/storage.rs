//! Key-value storage adapter.
//!
//! Both the local collection and the mock "server" collection live under
//! string keys in the same store, next to the category preference. Values
//! are opaque strings; the controller decides what they contain.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Well-known storage keys.
pub mod keys {
    /// Local quote collection (compact JSON array)
    pub const LOCAL_QUOTES: &str = "quotes";
    /// Mock remote quote collection (compact JSON array)
    pub const SERVER_QUOTES: &str = "serverQuotes";
    /// Last category chosen in the filter
    pub const LAST_CATEGORY: &str = "lastSelectedCategory";
}

/// Storage errors.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("storage file {path} is corrupt: {reason}")]
    Corrupt { path: PathBuf, reason: String },
}

/// Synchronous string key-value store.
///
/// Methods take `&self` so one store can back the local collection and the
/// mock remote at the same time.
pub trait KeyValueStore: Send + Sync {
    /// Read a value, `None` when the key was never set.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// In-memory store, lost on exit.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store wrapped in Arc for sharing.
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(lock(&self.values).get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        lock(&self.values).insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// File-backed store: a single JSON object mapping keys to string values.
///
/// The whole file is rewritten on every `set`, through a temporary file
/// renamed into place.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    values: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open the store at `path`, starting empty when the file does not exist.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();

        let values = match fs::read_to_string(&path) {
            Ok(contents) if contents.trim().is_empty() => BTreeMap::new(),
            Ok(contents) => {
                serde_json::from_str(&contents).map_err(|e| StorageError::Corrupt {
                    path: path.clone(),
                    reason: e.to_string(),
                })?
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        tracing::debug!(path = %path.display(), keys = values.len(), "Opened file store");

        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_file(&self, values: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let contents = serde_json::to_string_pretty(values).map_err(|e| StorageError::Corrupt {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;

        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, contents)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(lock(&self.values).get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut values = lock(&self.values);
        let previous = values.insert(key.to_string(), value.to_string());

        if let Err(e) = self.write_file(&values) {
            // Keep memory and disk in agreement
            match previous {
                Some(old) => values.insert(key.to_string(), old),
                None => values.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_get_set() {
        let store = MemoryStore::new();
        assert_eq!(store.get("missing").unwrap(), None);

        store.set(keys::LOCAL_QUOTES, "[]").unwrap();
        assert_eq!(store.get(keys::LOCAL_QUOTES).unwrap().as_deref(), Some("[]"));

        store.set(keys::LOCAL_QUOTES, "[1]").unwrap();
        assert_eq!(store.get(keys::LOCAL_QUOTES).unwrap().as_deref(), Some("[1]"));
    }

    #[test]
    fn shared_handle_sees_writes() {
        let store = MemoryStore::new_shared();
        let other = Arc::clone(&store);

        store.set(keys::SERVER_QUOTES, "[]").unwrap();
        assert_eq!(other.get(keys::SERVER_QUOTES).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn file_store_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quotebook.json");

        {
            let store = FileStore::open(&path).unwrap();
            assert_eq!(store.get(keys::LOCAL_QUOTES).unwrap(), None);
            store.set(keys::LOCAL_QUOTES, r#"[{"text":"T1","category":"work"}]"#).unwrap();
            store.set(keys::LAST_CATEGORY, "work").unwrap();
        }

        let store = FileStore::open(&path).unwrap();
        assert_eq!(
            store.get(keys::LOCAL_QUOTES).unwrap().as_deref(),
            Some(r#"[{"text":"T1","category":"work"}]"#)
        );
        assert_eq!(store.get(keys::LAST_CATEGORY).unwrap().as_deref(), Some("work"));
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn file_store_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quotebook.json");
        fs::write(&path, "not json").unwrap();

        assert!(matches!(
            FileStore::open(&path),
            Err(StorageError::Corrupt { .. })
        ));
    }

    #[test]
    fn file_store_treats_empty_file_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quotebook.json");
        fs::write(&path, "").unwrap();

        let store = FileStore::open(&path).unwrap();
        assert_eq!(store.get(keys::LOCAL_QUOTES).unwrap(), None);
    }

    #[test]
    fn file_store_rolls_back_on_write_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("quotebook.json");

        let store = FileStore::open(&path).unwrap();
        assert!(store.set(keys::LAST_CATEGORY, "work").is_err());
        assert_eq!(store.get(keys::LAST_CATEGORY).unwrap(), None);
    }
}
