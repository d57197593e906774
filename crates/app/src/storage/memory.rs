//! In-memory store.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use rustc_hash::FxHashMap;

use super::{LocalStore, StorageError};

/// Store that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<FxHashMap<String, String>>,
}

impl MemoryStore {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-filled with `entries`.
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: Mutex::new(
                entries
                    .into_iter()
                    .map(|(key, value)| (key.into(), value.into()))
                    .collect(),
            ),
        }
    }

    /// Whether `key` holds a value.
    pub fn contains(&self, key: &str) -> bool {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(key)
    }

    /// Current value of `key`.
    pub fn peek(&self, key: &str) -> Option<String> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }
}

#[async_trait]
impl LocalStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.peek(key))
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value);

        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[tokio::test]
    async fn set_get_remove() -> TestResult {
        let store = MemoryStore::new();

        store.set("token", "abc".to_string()).await?;

        assert_eq!(store.get("token").await?.as_deref(), Some("abc"));

        store.remove("token").await?;
        store.remove("token").await?;

        assert_eq!(store.get("token").await?, None);

        Ok(())
    }
}
