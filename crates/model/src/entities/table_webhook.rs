use crate::core::{error::ModelError, identifiers::ApId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Table events a webhook can subscribe a flow to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TableWebhookEventType {
    RecordCreated,
    RecordUpdated,
    RecordDeleted,
}

impl TableWebhookEventType {
    pub const ALL: [TableWebhookEventType; 3] = [
        TableWebhookEventType::RecordCreated,
        TableWebhookEventType::RecordUpdated,
        TableWebhookEventType::RecordDeleted,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TableWebhookEventType::RecordCreated => "RECORD_CREATED",
            TableWebhookEventType::RecordUpdated => "RECORD_UPDATED",
            TableWebhookEventType::RecordDeleted => "RECORD_DELETED",
        }
    }
}

impl fmt::Display for TableWebhookEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TableWebhookEventType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|event| event.as_str() == s)
            .ok_or_else(|| ModelError::UnknownEventType(s.to_string()))
    }
}

/// A webhook row binding a table event to the flow it triggers.
/// Deleting the owning project, table or flow deletes the webhook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableWebhook {
    pub id: ApId,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    pub project_id: ApId,
    pub table_id: ApId,
    pub event_type: TableWebhookEventType,
    pub flow_id: ApId,
}

impl TableWebhook {
    pub fn new(
        project_id: ApId,
        table_id: ApId,
        event_type: TableWebhookEventType,
        flow_id: ApId,
    ) -> Self {
        let now = Utc::now();
        TableWebhook {
            id: ApId::generate(),
            created: now,
            updated: now,
            project_id,
            table_id,
            event_type,
            flow_id,
        }
    }

    /// Whether removing the referenced parent row cascades to this webhook.
    pub fn depends_on(&self, id: &ApId) -> bool {
        &self.project_id == id || &self.table_id == id || &self.flow_id == id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn event_type_round_trips_through_strings() {
        for event in TableWebhookEventType::ALL {
            assert_eq!(event.as_str().parse::<TableWebhookEventType>(), Ok(event));
        }
        assert!("RECORD_MOVED".parse::<TableWebhookEventType>().is_err());
    }

    #[test]
    fn serializes_with_camel_case_columns() {
        let project = ApId::generate();
        let table = ApId::generate();
        let flow = ApId::generate();
        let hook = TableWebhook::new(
            project.clone(),
            table.clone(),
            TableWebhookEventType::RecordCreated,
            flow.clone(),
        );

        let encoded = serde_json::to_value(&hook).unwrap();
        assert_eq!(encoded["projectId"], json!(project.as_str()));
        assert_eq!(encoded["tableId"], json!(table.as_str()));
        assert_eq!(encoded["flowId"], json!(flow.as_str()));
        assert_eq!(encoded["eventType"], json!("RECORD_CREATED"));
    }

    #[test]
    fn depends_on_each_parent() {
        let hook = TableWebhook::new(
            ApId::generate(),
            ApId::generate(),
            TableWebhookEventType::RecordDeleted,
            ApId::generate(),
        );
        assert!(hook.depends_on(&hook.project_id));
        assert!(hook.depends_on(&hook.table_id));
        assert!(hook.depends_on(&hook.flow_id));
        assert!(!hook.depends_on(&ApId::generate()));
    }
}
