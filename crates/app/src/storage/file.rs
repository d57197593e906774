//! JSON file store.

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use rustc_hash::FxHashMap;
use tokio::{fs, sync::Mutex};
use tracing::debug;

use super::{LocalStore, StorageError};

type Entries = FxHashMap<String, String>;

/// Store persisted as a single JSON object on disk.
///
/// The file is read on every access and rewritten through a sibling temporary
/// file on every change, so a crash mid-write leaves the previous contents.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Store backed by `path`. The file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Entries, StorageError> {
        match fs::read(&self.path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(Entries::default()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(Entries::default()),
            Err(error) => Err(error.into()),
        }
    }

    async fn save(&self, entries: &Entries) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let staging = self.path.with_extension("tmp");

        fs::write(&staging, serde_json::to_vec_pretty(entries)?).await?;
        fs::rename(&staging, &self.path).await?;

        debug!(path = %self.path.display(), keys = entries.len(), "saved local store");

        Ok(())
    }

    async fn update(&self, apply: impl FnOnce(&mut Entries)) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;

        let mut entries = self.load().await?;
        apply(&mut entries);

        self.save(&entries).await
    }
}

#[async_trait]
impl LocalStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.load().await?.remove(key))
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        self.update(|entries| {
            entries.insert(key.to_string(), value);
        })
        .await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.update(|entries| {
            entries.remove(key);
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[tokio::test]
    async fn values_survive_a_new_store() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("state").join("storefront.json");

        FileStore::new(&path).set("token", "abc".to_string()).await?;

        let reopened = FileStore::new(&path);

        assert_eq!(reopened.get("token").await?.as_deref(), Some("abc"));
        assert_eq!(reopened.get("user").await?, None);

        Ok(())
    }

    #[tokio::test]
    async fn missing_file_reads_as_empty() -> TestResult {
        let dir = tempfile::tempdir()?;
        let store = FileStore::new(dir.path().join("absent.json"));

        assert_eq!(store.get("guest_cart").await?, None);

        store.remove("guest_cart").await?;

        Ok(())
    }

    #[tokio::test]
    async fn remove_deletes_only_that_key() -> TestResult {
        let dir = tempfile::tempdir()?;
        let store = FileStore::new(dir.path().join("store.json"));

        store.set("token", "abc".to_string()).await?;
        store.set("user", "{}".to_string()).await?;
        store.remove("token").await?;

        assert_eq!(store.get("token").await?, None);
        assert_eq!(store.get("user").await?.as_deref(), Some("{}"));

        Ok(())
    }

    #[tokio::test]
    async fn corrupt_file_is_reported() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("store.json");

        tokio::fs::write(&path, b"not json").await?;

        let result = FileStore::new(&path).get("token").await;

        assert!(matches!(result, Err(StorageError::Malformed(_))));

        Ok(())
    }
}
