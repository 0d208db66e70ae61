use crate::{error::StateStoreError, state::models::StoredEntry};
use async_trait::async_trait;

pub mod memory;
pub mod models;
pub mod sled_store;

/// Key-value storage scoped to a single flow.
///
/// Values are plain strings. Every write bumps the entry's version, which
/// callers can use for optimistic concurrency through `put_if_version`.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StateStoreError> {
        Ok(self.get_entry(key).await?.map(|entry| entry.value))
    }

    /// Unconditional write. Returns the new version.
    async fn put(&self, key: &str, value: &str) -> Result<u64, StateStoreError>;

    async fn get_entry(&self, key: &str) -> Result<Option<StoredEntry>, StateStoreError>;

    /// Writes only if the current version equals `expected` (`None` meaning
    /// the key must be absent). Returns the new version, or `None` when the
    /// entry changed in the meantime and nothing was written.
    async fn put_if_version(
        &self,
        key: &str,
        expected: Option<u64>,
        value: &str,
    ) -> Result<Option<u64>, StateStoreError>;
}
