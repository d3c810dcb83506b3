//! Namespaced key-value persistence.
//!
//! The playground persists a handful of structured values (last color, noise
//! settings, the history log and its cursor) under string keys. Values are
//! opaque `serde_json::Value`s to this layer; shape validation happens in the
//! engine when they are read back.
//!
//! [`JsonFileStore`] keeps one JSON object per namespace on disk
//! (`<dir>/<namespace>.json`), and [`InMemoryStore`] backs tests and
//! ephemeral sessions.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use indexmap::IndexMap;
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

/// Namespace used by the playground widget.
pub const DEFAULT_NAMESPACE: &str = "colorPlayground";

/// Errors surfaced by store writes.
#[derive(Debug, Error)]
pub enum StoreError {
    /// I/O failure while reading or writing the store file.
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization or deserialization failure.
    #[error("store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// The store refuses writes (read-only medium, quota exhausted).
    #[error("store is read-only")]
    ReadOnly,
}

/// Shared trait implemented by persistence backends.
pub trait KeyValueStore: Send + Sync {
    /// Retrieve the value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<Value>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: Value) -> Result<(), StoreError>;

    /// Retrieve the value stored under `key`, or `fallback` when missing.
    fn get_or(&self, key: &str, fallback: Value) -> Value {
        self.get(key).unwrap_or(fallback)
    }
}

type Entries = IndexMap<String, Value>;

/// JSON-backed store persisted on disk, one file per namespace.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: Mutex<Entries>,
}

impl JsonFileStore {
    /// Open (or lazily create) the store for `namespace` inside `dir`.
    pub fn open(dir: impl AsRef<Path>, namespace: &str) -> Result<Self, StoreError> {
        let path = dir.as_ref().join(format!("{namespace}.json"));
        let entries = load_entries(&path)?;
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// Access the underlying store path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save_locked(&self, entries: &Entries) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<Value> {
        let entries = self.entries.lock().expect("store lock poisoned");
        entries.get(key).cloned()
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().expect("store lock poisoned");
        entries.insert(key.to_string(), value);
        self.save_locked(&entries)
    }
}

/// In-memory store used by tests and when no config directory is available.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    entries: Mutex<Entries>,
    read_only: bool,
}

impl InMemoryStore {
    /// Create an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that rejects every write, as when the storage quota is exhausted.
    pub fn read_only() -> Self {
        Self {
            entries: Mutex::new(Entries::default()),
            read_only: true,
        }
    }

    /// Seed a value without going through the write path.
    pub fn with_value(self, key: &str, value: Value) -> Self {
        self.entries.lock().expect("store lock poisoned").insert(key.to_string(), value);
        self
    }
}

impl KeyValueStore for InMemoryStore {
    fn get(&self, key: &str) -> Option<Value> {
        let entries = self.entries.lock().expect("store lock poisoned");
        entries.get(key).cloned()
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        if self.read_only {
            return Err(StoreError::ReadOnly);
        }
        let mut entries = self.entries.lock().expect("store lock poisoned");
        entries.insert(key.to_string(), value);
        Ok(())
    }
}

fn load_entries(path: &Path) -> Result<Entries, StoreError> {
    match fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str::<Entries>(&content) {
            Ok(entries) => Ok(entries),
            Err(error) => {
                warn!(
                    path = %path.display(),
                    error = %error,
                    "Failed to parse store file; starting empty"
                );
                Ok(Entries::default())
            }
        },
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(Entries::default()),
        Err(error) => Err(StoreError::Io(error)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;
    use std::thread;
    use tempfile::tempdir;

    #[test]
    fn in_memory_store_round_trip() {
        let store = InMemoryStore::new();
        assert!(store.get("noise").is_none());
        assert_eq!(store.get_or("noise", json!(35)), json!(35));

        store.set("noise", json!(12)).unwrap();
        assert_eq!(store.get("noise"), Some(json!(12)));
    }

    #[test]
    fn read_only_store_rejects_writes() {
        let store = InMemoryStore::read_only().with_value("lastColor", json!("#808080"));
        assert!(matches!(store.set("noise", json!(1)), Err(StoreError::ReadOnly)));
        assert_eq!(store.get("lastColor"), Some(json!("#808080")));
    }

    #[test]
    fn json_store_persists_entries() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::open(dir.path(), DEFAULT_NAMESPACE).unwrap();
        store.set("history", json!([{"color": "#FFFFFF"}])).unwrap();
        store.set("historyIndex", json!(0)).unwrap();
        assert_eq!(store.path(), dir.path().join("colorPlayground.json"));

        drop(store);
        let reloaded = JsonFileStore::open(dir.path(), DEFAULT_NAMESPACE).unwrap();
        assert_eq!(reloaded.get("historyIndex"), Some(json!(0)));
        assert_eq!(reloaded.get("history"), Some(json!([{"color": "#FFFFFF"}])));
    }

    #[test]
    fn namespaces_are_isolated() {
        let dir = tempdir().unwrap();
        let playground = JsonFileStore::open(dir.path(), "colorPlayground").unwrap();
        let wall = JsonFileStore::open(dir.path(), "htmlColorsWall").unwrap();
        playground.set("lastColor", json!("#123456")).unwrap();
        assert!(wall.get("lastColor").is_none());
    }

    #[test]
    fn invalid_json_returns_empty_store() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("colorPlayground.json"), "not json").unwrap();

        let store = JsonFileStore::open(dir.path(), DEFAULT_NAMESPACE).unwrap();
        assert!(store.get("history").is_none());
    }

    #[test]
    fn concurrent_writes_keep_a_value() {
        let dir = tempdir().unwrap();
        let store = Arc::new(JsonFileStore::open(dir.path(), DEFAULT_NAMESPACE).unwrap());
        let mut handles = Vec::new();
        for index in 0..5 {
            let handle_store = Arc::clone(&store);
            handles.push(thread::spawn(move || {
                handle_store.set("noise", json!(index)).unwrap();
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }
        assert!(store.get("noise").unwrap().is_number());
    }
}
