use crate::{
    error::StateStoreError,
    state::{KeyValueStore, models::StoredEntry},
};
use async_trait::async_trait;
use model::core::identifiers::FlowId;
use sled::transaction::{ConflictableTransactionError, TransactionError};
use std::path::Path;
use tracing::debug;

/// Durable key-value store. One sled database can hold the state of many
/// flows; each handle only sees the keys of its own flow.
#[derive(Clone)]
pub struct SledKeyValueStore {
    db: sled::Db,
    flow: FlowId,
}

impl SledKeyValueStore {
    pub fn open(path: impl AsRef<Path>, flow: FlowId) -> Result<Self, StateStoreError> {
        let path = path.as_ref();
        let db = sled::open(path).map_err(|source| StateStoreError::Open {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self { db, flow })
    }

    /// A handle on the same database scoped to another flow.
    pub fn for_flow(&self, flow: FlowId) -> Self {
        Self {
            db: self.db.clone(),
            flow,
        }
    }

    pub fn flow(&self) -> &FlowId {
        &self.flow
    }

    /// Keys are length-prefixed by flow id so `("a:b", "c")` and
    /// `("a", "b:c")` never collide.
    #[inline]
    fn kv_key(flow: &FlowId, key: &str) -> String {
        format!("kv:{}:{}:{}", flow.as_str().len(), flow.as_str(), key)
    }

    /// Writes `value` if the current version matches `expected`. With
    /// `expected = None` the check is skipped.
    async fn write(
        &self,
        key: &str,
        value: &str,
        expected: Option<Option<u64>>,
    ) -> Result<Option<u64>, StateStoreError> {
        let db_key = Self::kv_key(&self.flow, key);

        let result = self
            .db
            .transaction::<_, _, StateStoreError>(|tx_db| {
                let current = match tx_db.get(&db_key)? {
                    Some(bytes) => Some(
                        bincode::deserialize::<StoredEntry>(&bytes)
                            .map_err(|e| ConflictableTransactionError::Abort(e.into()))?,
                    ),
                    None => None,
                };

                if let Some(expected) = expected
                    && current.as_ref().map(|entry| entry.version) != expected
                {
                    // Lost the race, not an error.
                    return Ok(None);
                }

                let entry = StoredEntry::successor(current.as_ref(), value);
                let bytes = bincode::serialize(&entry)
                    .map_err(|e| ConflictableTransactionError::Abort(e.into()))?;
                tx_db.insert(db_key.as_str(), bytes)?;
                Ok(Some(entry.version))
            });

        let version = match result {
            Ok(version) => version,
            Err(TransactionError::Abort(e)) => return Err(e),
            Err(TransactionError::Storage(e)) => return Err(e.into()),
        };

        if version.is_some() {
            // The cursor must be durable before the caller acts on it.
            self.db.flush_async().await?;
            debug!(flow = %self.flow, key, ?version, "Stored value");
        }

        Ok(version)
    }
}

#[async_trait]
impl KeyValueStore for SledKeyValueStore {
    async fn put(&self, key: &str, value: &str) -> Result<u64, StateStoreError> {
        let version = self.write(key, value, None).await?;
        // Unconditional writes always produce a version.
        Ok(version.unwrap_or_default())
    }

    async fn get_entry(&self, key: &str) -> Result<Option<StoredEntry>, StateStoreError> {
        let db_key = Self::kv_key(&self.flow, key);
        match self.db.get(db_key)? {
            Some(bytes) => Ok(Some(bincode::deserialize(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn put_if_version(
        &self,
        key: &str,
        expected: Option<u64>,
        value: &str,
    ) -> Result<Option<u64>, StateStoreError> {
        self.write(key, value, Some(expected)).await
    }
}
