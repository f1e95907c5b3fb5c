//! Key-value storage capability
//!
//! A small async trait with a JSON-file-per-key backend for the real thing
//! and an in-memory backend for tests.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::StoreError;

/// Key-value store with string values (JSON documents by convention)
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// One JSON file per key under a data directory
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn file_path(&self, key: &str) -> PathBuf {
        // Keys are well-known constants; the filter guards against path tricks
        let safe: String = key
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
            .collect();
        self.dir.join(format!("{}.json", safe))
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match tokio::fs::read_to_string(self.file_path(key)).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        if let Err(e) = tokio::fs::write(self.file_path(key), value).await {
            // ENOSPC deserves an actionable hint
            if e.raw_os_error() == Some(28) {
                tracing::error!(
                    key = %key,
                    "Storage is full; free space in the data directory or point \
                     storage.data_dir at a larger volume"
                );
            }
            return Err(e.into());
        }
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        match tokio::fs::remove_file(self.file_path(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory store for tests and ephemeral sessions
#[derive(Default)]
pub struct MemoryStore {
    map: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.map.read().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.map.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.map.write().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert_eq!(store.get("missing").await.unwrap(), None);

        store.set("language", "\"uk\"").await.unwrap();
        assert_eq!(store.get("language").await.unwrap().as_deref(), Some("\"uk\""));

        store.remove("language").await.unwrap();
        assert_eq!(store.get("language").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path()).unwrap();

        assert_eq!(store.get("bookings").await.unwrap(), None);
        store.set("bookings", "[]").await.unwrap();
        assert_eq!(store.get("bookings").await.unwrap().as_deref(), Some("[]"));

        // Removing twice is fine
        store.remove("bookings").await.unwrap();
        store.remove("bookings").await.unwrap();
        assert_eq!(store.get("bookings").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_file_store_key_sanitization() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path()).unwrap();

        store.set("../escape", "{}").await.unwrap();
        assert!(dir.path().join("escape.json").exists());
    }
}
