use crate::{error::ActionError, paginator::RowPaginator, props::GetRowsProps};
use model::records::row::SheetRow;
use tracing::info;

/// The "get next row(s)" flow action.
///
/// `run` advances the stored cursor; `test` previews the same rows without
/// writing anything, so a flow can be tested repeatedly without consuming
/// rows.
pub struct GetNextRowsAction {
    paginator: RowPaginator,
}

impl GetNextRowsAction {
    pub const NAME: &'static str = "get_next_rows";

    pub fn new(paginator: RowPaginator) -> Self {
        Self { paginator }
    }

    pub async fn run(&self, props: GetRowsProps) -> Result<Vec<SheetRow>, ActionError> {
        self.execute(props, false).await
    }

    pub async fn test(&self, props: GetRowsProps) -> Result<Vec<SheetRow>, ActionError> {
        self.execute(props, true).await
    }

    async fn execute(
        &self,
        props: GetRowsProps,
        testing: bool,
    ) -> Result<Vec<SheetRow>, ActionError> {
        let (sheet, request) = props.into_request(testing)?;
        info!(
            action = Self::NAME,
            spreadsheet = %sheet.spreadsheet_id,
            sheet_id = sheet.sheet_id,
            testing,
            "Executing action"
        );

        let page = self.paginator.next_rows(&sheet, &request).await?;
        Ok(page.into_rows())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PaginationError;
    use connectors::memory::InMemoryWorkbook;
    use engine_core::state::{KeyValueStore, memory::InMemoryKeyValueStore};
    use serde_json::json;
    use std::sync::Arc;

    async fn action(rows: usize) -> (Arc<InMemoryWorkbook>, Arc<InMemoryKeyValueStore>, GetNextRowsAction) {
        let book = Arc::new(InMemoryWorkbook::new());
        book.put_sheet(
            "ss",
            3,
            "Contacts",
            (1..=rows).map(|i| vec![json!(i.to_string())]).collect(),
        )
        .await;
        let store = Arc::new(InMemoryKeyValueStore::new());
        let action = GetNextRowsAction::new(RowPaginator::new(book.clone(), store.clone()));
        (book, store, action)
    }

    fn props(group_size: i64) -> GetRowsProps {
        let mut props = GetRowsProps::new("ss", 3);
        props.group_size = group_size;
        props
    }

    #[tokio::test]
    async fn run_advances_and_test_does_not() {
        let (_book, store, action) = action(5).await;

        let preview = action.test(props(2)).await.unwrap();
        assert_eq!(preview.len(), 2);
        assert_eq!(store.get("row_number").await.unwrap(), None);

        let first = action.run(props(2)).await.unwrap();
        assert_eq!(first, preview);
        assert_eq!(store.get("row_number").await.unwrap().as_deref(), Some("3"));

        let preview = action.test(props(2)).await.unwrap();
        assert_eq!(preview[0].row, 3);
        assert_eq!(store.get("row_number").await.unwrap().as_deref(), Some("3"));
    }

    #[tokio::test]
    async fn validation_runs_before_any_io() {
        let (book, store, action) = action(5).await;

        let err = action.run(props(0)).await.unwrap_err();
        assert!(matches!(err, ActionError::InvalidProperty { field: "groupSize", .. }));
        let err = action.test(props(-3)).await.unwrap_err();
        assert!(matches!(err, ActionError::InvalidProperty { field: "groupSize", .. }));

        assert!(book.fetch_log().await.is_empty());
        assert_eq!(store.get("row_number").await.unwrap(), None);
    }

    #[tokio::test]
    async fn api_errors_surface_their_message() {
        let (book, _store, action) = action(5).await;
        book.fail_fetches_with(
            403,
            json!({ "error": { "code": 403, "message": "The caller does not have permission", "status": "PERMISSION_DENIED" } }),
        )
        .await;

        let err = action.run(props(1)).await.unwrap_err();
        assert_eq!(err.to_string(), "The caller does not have permission");
    }

    #[tokio::test]
    async fn other_errors_pass_through() {
        let (_book, store, action) = action(5).await;
        store.put("row_number", "x1").await.unwrap();

        let err = action.test(props(1)).await.unwrap_err();
        assert!(matches!(
            err,
            ActionError::Pagination(PaginationError::CorruptedCursor { .. })
        ));
    }
}
