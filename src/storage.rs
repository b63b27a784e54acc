use async_trait::async_trait;
use directories::ProjectDirs;
use log::debug;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

use crate::BrowserError;

/// A tiny persistent key-value store holding string slots
#[async_trait]
pub trait SlotStore: Send + Sync {
    /// Read the value stored under `key`, `None` if nothing was saved yet
    async fn load(&self, key: &str) -> Result<Option<String>, BrowserError>;

    /// Overwrite the value stored under `key`
    async fn save(&self, key: &str, value: &str) -> Result<(), BrowserError>;
}

/// Stores each slot as a file named after its key inside `dir`
#[derive(Debug, Clone)]
pub struct FileSlotStore {
    dir: PathBuf,
}

impl FileSlotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store rooted in the platform data directory, if one can be determined
    pub fn default_location() -> Option<Self> {
        ProjectDirs::from("com", "recipe-browser", "recipe-browser")
            .map(|dirs| Self::new(dirs.data_dir()))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn slot_path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

#[async_trait]
impl SlotStore for FileSlotStore {
    async fn load(&self, key: &str) -> Result<Option<String>, BrowserError> {
        match tokio::fs::read_to_string(self.slot_path(key)).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, key: &str, value: &str) -> Result<(), BrowserError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.slot_path(key);
        tokio::fs::write(&path, value).await?;
        debug!("Saved slot '{}' to {}", key, path.display());
        Ok(())
    }
}

/// Process-local store, forgotten on exit
#[derive(Debug, Default)]
pub struct MemorySlotStore {
    slots: Mutex<HashMap<String, String>>,
}

impl MemorySlotStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SlotStore for MemorySlotStore {
    async fn load(&self, key: &str) -> Result<Option<String>, BrowserError> {
        Ok(self.slots.lock().await.get(key).cloned())
    }

    async fn save(&self, key: &str, value: &str) -> Result<(), BrowserError> {
        self.slots
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSlotStore::new(dir.path().join("nested"));

        assert_eq!(store.load("currentPage").await.unwrap(), None);
        store.save("currentPage", "3").await.unwrap();
        assert_eq!(
            store.load("currentPage").await.unwrap().as_deref(),
            Some("3")
        );

        store.save("currentPage", "4").await.unwrap();
        assert_eq!(
            std::fs::read_to_string(dir.path().join("nested").join("currentPage")).unwrap(),
            "4"
        );
    }

    #[tokio::test]
    async fn test_memory_store_roundtrip() {
        let store = MemorySlotStore::new();
        assert_eq!(store.load("currentPage").await.unwrap(), None);
        store.save("currentPage", "2").await.unwrap();
        assert_eq!(
            store.load("currentPage").await.unwrap().as_deref(),
            Some("2")
        );
    }
}
