use std::{
    collections::HashMap,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Mutex,
};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("storage file {path} is not a JSON object of strings: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("storage lock poisoned")]
    LockPoisoned,
}

/// A string key-value slot store, the shape of browser local storage
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, `None` when the key was never written
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    /// Overwrites the value stored under `key`
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Volatile store, used by tests and when no file location is available
#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let slots = self.slots.lock().map_err(|_| StorageError::LockPoisoned)?;

        Ok(slots.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut slots = self.slots.lock().map_err(|_| StorageError::LockPoisoned)?;
        slots.insert(String::from(key), String::from(value));

        Ok(())
    }
}

/// Store backed by a single JSON object file on disk.
///
/// Every call re-reads the file so that edits made by another process are picked up.
/// Writes replace the whole file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    // serializes read-modify-write cycles within this process
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_slots(&self) -> Result<HashMap<String, String>, StorageError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(HashMap::new()),
            Err(source) => {
                return Err(StorageError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        serde_json::from_str(&raw).map_err(|source| StorageError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    fn write_slots(&self, slots: &HashMap<String, String>) -> Result<(), StorageError> {
        let io_err = |source| StorageError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let serialized = serde_json::to_string_pretty(slots).map_err(|source| {
            StorageError::Corrupt {
                path: self.path.clone(),
                source,
            }
        })?;

        fs::write(&self.path, serialized).map_err(io_err)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_slots()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| StorageError::LockPoisoned)?;

        let mut slots = match self.read_slots() {
            Ok(slots) => slots,
            Err(StorageError::Corrupt { path, source }) => {
                tracing::warn!("discarding unreadable storage file {}: {}", path.display(), source);
                HashMap::new()
            }
            Err(err) => return Err(err),
        };

        slots.insert(String::from(key), String::from(value));
        self.write_slots(&slots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("settings-storage-test-{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn test_memory_store_overwrites() {
        let store = MemoryStore::new();

        assert_eq!(store.get("k").unwrap(), None);

        store.set("k", "one").unwrap();
        store.set("k", "two").unwrap();

        assert_eq!(store.get("k").unwrap().as_deref(), Some("two"));
    }

    #[test]
    fn test_file_store_missing_file_reads_empty() {
        let store = FileStore::new(temp_path("missing.json"));

        assert_eq!(store.get("settings").unwrap(), None);
    }

    #[test]
    fn test_file_store_keeps_other_keys() {
        let path = temp_path("keeps-other-keys.json");
        let _ = fs::remove_file(&path);
        let store = FileStore::new(&path);

        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();
        store.set("a", "3").unwrap();

        assert_eq!(store.get("a").unwrap().as_deref(), Some("3"));
        assert_eq!(store.get("b").unwrap().as_deref(), Some("2"));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_file_store_recovers_from_corrupt_file_on_write() {
        let path = temp_path("corrupt.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "not json at all").unwrap();
        let store = FileStore::new(&path);

        assert!(matches!(
            store.get("settings"),
            Err(StorageError::Corrupt { .. })
        ));

        store.set("settings", "{}").unwrap();

        assert_eq!(store.get("settings").unwrap().as_deref(), Some("{}"));

        let _ = fs::remove_file(&path);
    }
}
