/// Durable key-value storage for store records
///
/// Stores serialize themselves into a single named record (a JSON string)
/// and hand it to a [`Persistence`] backend. Backends only move strings
/// around; they know nothing about the records they hold.
use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};

/// Error types for persistence backends
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("Invalid record key: {0:?}")]
    InvalidKey(String),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Encoding error: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Synchronous key-value backend scoped to the application
///
/// `load` returns `Ok(None)` when no record was ever saved under `key`.
pub trait Persistence: Send + Sync {
    fn load(&self, key: &str) -> Result<Option<String>, PersistError>;

    fn save(&self, key: &str, value: &str) -> Result<(), PersistError>;
}

/// In-memory storage
///
/// Clones share the same map, so a clone handed to a store and a clone
/// kept by a test observe the same records. Useful for testing and for
/// sessions that should not outlive the process.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    records: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw record, bypassing any store
    pub fn get(&self, key: &str) -> Option<String> {
        let records = self.records.read().unwrap_or_else(PoisonError::into_inner);
        records.get(key).cloned()
    }

    /// Write a raw record, e.g. to simulate a previous session
    pub fn insert(&self, key: impl Into<String>, value: impl Into<String>) {
        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);
        records.insert(key.into(), value.into());
    }

    pub fn remove(&self, key: &str) -> bool {
        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);
        records.remove(key).is_some()
    }
}

impl Persistence for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<String>, PersistError> {
        Ok(self.get(key))
    }

    fn save(&self, key: &str, value: &str) -> Result<(), PersistError> {
        self.insert(key, value);
        Ok(())
    }
}

/// Filesystem storage: one `<key>.json` file per record
///
/// The directory is created on first save.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// # Example
    /// ```no_run
    /// use list_selector::persist::FileStorage;
    /// use std::path::PathBuf;
    ///
    /// let storage = FileStorage::new(PathBuf::from(".list-selector"));
    /// ```
    pub fn new(dir: PathBuf) -> Self {
        FileStorage { dir }
    }

    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, PersistError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(PersistError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl Persistence for FileStorage {
    fn load(&self, key: &str) -> Result<Option<String>, PersistError> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, key: &str, value: &str) -> Result<(), PersistError> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.dir)?;

        // Write then rename so a crash never leaves a half-written record
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_missing_record() {
        let storage = MemoryStorage::new();
        assert!(storage.load("list-store").unwrap().is_none());
    }

    #[test]
    fn test_memory_storage_clones_share_records() {
        let storage = MemoryStorage::new();
        let other = storage.clone();
        storage.save("list-store", "{}").unwrap();
        assert_eq!(other.load("list-store").unwrap().as_deref(), Some("{}"));
        assert!(other.remove("list-store"));
        assert!(!storage.remove("list-store"));
    }

    #[test]
    fn test_file_storage_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("state"));

        assert!(storage.load("preferences").unwrap().is_none());
        storage.save("preferences", r#"{"lang":"ru"}"#).unwrap();
        assert_eq!(
            storage.load("preferences").unwrap().as_deref(),
            Some(r#"{"lang":"ru"}"#)
        );
        assert!(dir.path().join("state/preferences.json").exists());
    }

    #[test]
    fn test_file_storage_rejects_path_keys() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf());

        assert!(matches!(
            storage.save("../escape", "x"),
            Err(PersistError::InvalidKey(_))
        ));
        assert!(matches!(storage.load(""), Err(PersistError::InvalidKey(_))));
    }
}
