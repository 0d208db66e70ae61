//! Table declarations for platform entities.

use crate::ast::{
    ColumnDef, ColumnType, CreateTable, DefaultValue, ReferentialAction, TableConstraint,
};
use model::{core::identifiers::ApId, entities::table_webhook::TableWebhookEventType};

pub const TABLE_WEBHOOK: &str = "table_webhook";

/// Column holding an [`ApId`].
pub fn ap_id_column(name: &str) -> ColumnDef {
    ColumnDef::new(name, ColumnType::VarChar(Some(ApId::LENGTH)))
}

/// Columns every entity starts with: `id`, `created`, `updated`.
pub fn base_columns() -> Vec<ColumnDef> {
    vec![
        ap_id_column("id"),
        ColumnDef::new("created", ColumnType::Timestamp)
            .default_value(DefaultValue::CurrentTimestamp),
        ColumnDef::new("updated", ColumnType::Timestamp)
            .default_value(DefaultValue::CurrentTimestamp),
    ]
}

/// Many-to-one relation from `table.column` to `target.id`, deleted along
/// with its target.
fn cascading_relation(table: &str, column: &str, target: &str) -> TableConstraint {
    TableConstraint::ForeignKey {
        name: format!("fk_{table}_{target}_id"),
        columns: vec![column.to_string()],
        references: target.to_string(),
        referenced_columns: vec!["id".to_string()],
        on_delete: ReferentialAction::Cascade,
    }
}

/// The `table_webhook` entity: binds a table event to the flow it triggers.
pub fn table_webhook() -> CreateTable {
    let mut columns = base_columns();
    columns.extend([
        ap_id_column("projectId"),
        ap_id_column("tableId"),
        ColumnDef::new("eventType", ColumnType::VarChar(None)),
        ap_id_column("flowId"),
    ]);

    CreateTable {
        table: TABLE_WEBHOOK.to_string(),
        columns,
        constraints: vec![
            TableConstraint::PrimaryKey {
                name: format!("pk_{TABLE_WEBHOOK}"),
                columns: vec!["id".to_string()],
            },
            cascading_relation(TABLE_WEBHOOK, "projectId", "project"),
            cascading_relation(TABLE_WEBHOOK, "tableId", "table"),
            cascading_relation(TABLE_WEBHOOK, "flowId", "flow"),
            TableConstraint::OneOf {
                name: format!("chk_{TABLE_WEBHOOK}_event_type"),
                column: "eventType".to_string(),
                values: TableWebhookEventType::ALL
                    .iter()
                    .map(|event| event.as_str().to_string())
                    .collect(),
            },
        ],
        if_not_exists: true,
    }
}
