use crate::{
    error::StateStoreError,
    state::{KeyValueStore, models::StoredEntry},
};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;

/// Process-local store, for previews and tests.
#[derive(Default)]
pub struct InMemoryKeyValueStore {
    entries: Mutex<HashMap<String, StoredEntry>>,
}

impl InMemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryKeyValueStore {
    async fn put(&self, key: &str, value: &str) -> Result<u64, StateStoreError> {
        let mut entries = self.entries.lock().await;
        let entry = StoredEntry::successor(entries.get(key), value);
        let version = entry.version;
        entries.insert(key.to_string(), entry);
        Ok(version)
    }

    async fn get_entry(&self, key: &str) -> Result<Option<StoredEntry>, StateStoreError> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn put_if_version(
        &self,
        key: &str,
        expected: Option<u64>,
        value: &str,
    ) -> Result<Option<u64>, StateStoreError> {
        let mut entries = self.entries.lock().await;
        let current = entries.get(key);
        if current.map(|entry| entry.version) != expected {
            return Ok(None);
        }

        let entry = StoredEntry::successor(current, value);
        let version = entry.version;
        entries.insert(key.to_string(), entry);
        Ok(Some(version))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn get_and_put() {
        let store = InMemoryKeyValueStore::new();
        assert_eq!(store.get("row_number").await.unwrap(), None);

        assert_eq!(store.put("row_number", "4").await.unwrap(), 1);
        assert_eq!(store.put("row_number", "7").await.unwrap(), 2);
        assert_eq!(store.get("row_number").await.unwrap().as_deref(), Some("7"));
    }

    #[tokio::test]
    async fn conditional_put_checks_version() {
        let store = InMemoryKeyValueStore::new();
        assert_eq!(store.put_if_version("k", Some(1), "x").await.unwrap(), None);
        assert_eq!(store.put_if_version("k", None, "x").await.unwrap(), Some(1));
        assert_eq!(store.put_if_version("k", None, "y").await.unwrap(), None);
        assert_eq!(store.put_if_version("k", Some(1), "y").await.unwrap(), Some(2));
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("y"));
    }
}
