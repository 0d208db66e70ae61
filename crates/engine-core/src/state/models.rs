use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct StoredEntry {
    pub value: String,
    /// Starts at 1, incremented by every write.
    pub version: u64,
    pub updated_at: DateTime<Utc>,
}

impl StoredEntry {
    /// The entry that replaces `current` when `value` is written.
    pub fn successor(current: Option<&StoredEntry>, value: &str) -> Self {
        StoredEntry {
            value: value.to_string(),
            version: current.map_or(1, |entry| entry.version + 1),
            updated_at: Utc::now(),
        }
    }
}
