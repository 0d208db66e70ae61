use crate::error::PaginationError;
use connectors::source::RowSource;
use engine_core::state::KeyValueStore;
use model::pagination::{
    cursor::StoredCursor,
    request::{PageRequest, PageResult, SheetRef},
    window::FetchWindow,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// How cursor writes deal with concurrent runs on the same key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CursorGuard {
    /// Plain last-writer-wins puts. Overlapping runs can read the same
    /// cursor and deliver the same window twice.
    #[default]
    None,

    /// Writes are conditional on the version read at the start of the run.
    /// A run that lost the race fails before fetching anything.
    Versioned,
}

/// Hands out consecutive groups of sheet rows across runs, remembering the
/// next unread row in the key-value store.
///
/// The cursor is advanced *before* the fetch. A crash between the write and
/// the fetch skips one group on the next run instead of delivering it twice.
/// When a window comes back empty the cursor is re-derived from the live
/// sheet length, so rows deleted or appended outside the flow cannot leave
/// it stuck past the end of data.
pub struct RowPaginator {
    source: Arc<dyn RowSource>,
    store: Arc<dyn KeyValueStore>,
    guard: CursorGuard,
}

impl RowPaginator {
    pub fn new(source: Arc<dyn RowSource>, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            source,
            store,
            guard: CursorGuard::None,
        }
    }

    pub fn with_guard(mut self, guard: CursorGuard) -> Self {
        self.guard = guard;
        self
    }

    pub async fn next_rows(
        &self,
        sheet: &SheetRef,
        request: &PageRequest,
    ) -> Result<PageResult, PaginationError> {
        if request.group_size == 0 {
            return Err(PaginationError::EmptyGroup);
        }

        let sheet_name = self
            .source
            .resolve_sheet_name(&sheet.spreadsheet_id, sheet.sheet_id)
            .await?;

        let entry = self.store.get_entry(&request.mem_key).await?;
        let raw = entry.as_ref().map(|entry| entry.value.as_str());
        let stored =
            StoredCursor::parse(raw).map_err(|_| PaginationError::CorruptedCursor {
                key: request.mem_key.clone(),
                value: raw.unwrap_or_default().to_string(),
            })?;

        let starting_row = stored.starting_row(request.start_row);
        if starting_row < 1 {
            return Err(PaginationError::InvalidStartingRow(starting_row));
        }

        let window = FetchWindow::new(starting_row.unsigned_abs(), request.group_size);
        debug!(
            sheet = %sheet_name,
            key = %request.mem_key,
            cursor = ?stored,
            start = window.start,
            end = window.end,
            testing = request.testing,
            "Resolved fetch window"
        );

        let mut version = entry.as_ref().map(|entry| entry.version);
        let mut cursor_written = None;
        if !request.testing {
            version = Some(
                self.advance(&request.mem_key, version, window.next_cursor())
                    .await?,
            );
            cursor_written = Some(window.next_cursor());
        }

        let rows = self
            .source
            .fetch_range(&sheet.spreadsheet_id, &sheet_name, window.start, window.end)
            .await?;

        let resynced = rows.is_empty();
        if resynced {
            let all_rows = self
                .source
                .fetch_all(&sheet.spreadsheet_id, &sheet_name)
                .await?;
            let last_row = all_rows.len() as u64 + 1;

            warn!(
                sheet = %sheet_name,
                key = %request.mem_key,
                start = window.start,
                end = window.end,
                resync_to = last_row,
                "Fetch window is past the end of data, re-syncing cursor"
            );

            if !request.testing {
                self.advance(&request.mem_key, version, last_row).await?;
                cursor_written = Some(last_row);
            }
        }

        info!(
            sheet = %sheet_name,
            key = %request.mem_key,
            rows = rows.len(),
            start = window.start,
            end = window.end,
            cursor = ?cursor_written,
            "Fetched next rows"
        );

        Ok(PageResult {
            sheet_name,
            window,
            rows,
            cursor_written,
            resynced,
        })
    }

    /// Stores `next` as the cursor, returning the entry's new version.
    async fn advance(
        &self,
        key: &str,
        expected: Option<u64>,
        next: u64,
    ) -> Result<u64, PaginationError> {
        let value = next.to_string();
        match self.guard {
            CursorGuard::None => Ok(self.store.put(key, &value).await?),
            CursorGuard::Versioned => self
                .store
                .put_if_version(key, expected, &value)
                .await?
                .ok_or_else(|| PaginationError::CursorConflict {
                    key: key.to_string(),
                    expected,
                }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use connectors::memory::{FetchCall, InMemoryWorkbook};
    use engine_core::{
        error::StateStoreError,
        state::{memory::InMemoryKeyValueStore, models::StoredEntry},
    };
    use serde_json::json;
    use std::sync::atomic::{AtomicBool, Ordering};

    const SS: &str = "spreadsheet";

    async fn setup(rows: usize) -> (Arc<InMemoryWorkbook>, Arc<InMemoryKeyValueStore>, RowPaginator) {
        let book = Arc::new(InMemoryWorkbook::new());
        book.put_sheet(
            SS,
            0,
            "Sheet1",
            (1..=rows).map(|i| vec![json!(format!("r{i}"))]).collect(),
        )
        .await;
        let store = Arc::new(InMemoryKeyValueStore::new());
        let paginator = RowPaginator::new(book.clone(), store.clone());
        (book, store, paginator)
    }

    fn sheet() -> SheetRef {
        SheetRef::new(SS, 0)
    }

    fn rows_of(result: &PageResult) -> Vec<u64> {
        result.rows.iter().map(|row| row.row).collect()
    }

    #[tokio::test]
    async fn first_call_starts_at_start_row() {
        let (book, store, paginator) = setup(10).await;
        let request = PageRequest::new("row_number", 3).with_start_row(2);

        let result = paginator.next_rows(&sheet(), &request).await.unwrap();
        assert_eq!(rows_of(&result), vec![2, 3, 4]);
        assert_eq!(result.cursor_written, Some(5));
        assert!(!result.resynced);
        assert_eq!(store.get("row_number").await.unwrap().as_deref(), Some("5"));
        assert_eq!(
            book.fetch_log().await,
            vec![FetchCall::Range {
                sheet_name: "Sheet1".into(),
                start: 2,
                end: 4
            }]
        );
    }

    #[tokio::test]
    async fn stored_cursor_wins_over_start_row() {
        let (_book, store, paginator) = setup(10).await;
        store.put("row_number", "6").await.unwrap();
        let request = PageRequest::new("row_number", 2).with_start_row(1);

        let result = paginator.next_rows(&sheet(), &request).await.unwrap();
        assert_eq!(rows_of(&result), vec![6, 7]);
        assert_eq!(store.get("row_number").await.unwrap().as_deref(), Some("8"));
    }

    #[tokio::test]
    async fn empty_string_counts_as_no_cursor() {
        let (_book, store, paginator) = setup(10).await;
        store.put("row_number", "").await.unwrap();
        let request = PageRequest::new("row_number", 1).with_start_row(3);

        let result = paginator.next_rows(&sheet(), &request).await.unwrap();
        assert_eq!(rows_of(&result), vec![3]);
    }

    #[tokio::test]
    async fn testing_never_writes() {
        let (_book, store, paginator) = setup(3).await;
        let request = PageRequest::new("row_number", 2).testing(true);

        let result = paginator.next_rows(&sheet(), &request).await.unwrap();
        assert_eq!(rows_of(&result), vec![1, 2]);
        assert_eq!(result.cursor_written, None);
        assert_eq!(store.get_entry("row_number").await.unwrap(), None);

        // Past the end: the recovery path runs but still does not write.
        store.put("row_number", "9").await.unwrap();
        let result = paginator.next_rows(&sheet(), &request).await.unwrap();
        assert!(result.rows.is_empty());
        assert!(result.resynced);
        let entry = store.get_entry("row_number").await.unwrap().unwrap();
        assert_eq!(entry.value, "9");
        assert_eq!(entry.version, 1);
    }

    #[tokio::test]
    async fn exhausted_window_resyncs_to_sheet_length() {
        let (book, store, paginator) = setup(4).await;
        store.put("row_number", "20").await.unwrap();
        let request = PageRequest::new("row_number", 5);

        let result = paginator.next_rows(&sheet(), &request).await.unwrap();
        assert!(result.rows.is_empty());
        assert!(result.resynced);
        assert_eq!(result.cursor_written, Some(5));
        assert_eq!(store.get("row_number").await.unwrap().as_deref(), Some("5"));
        assert_eq!(
            book.fetch_log().await,
            vec![
                FetchCall::Range {
                    sheet_name: "Sheet1".into(),
                    start: 20,
                    end: 24
                },
                FetchCall::All {
                    sheet_name: "Sheet1".into()
                },
            ]
        );
    }

    #[tokio::test]
    async fn non_numeric_cursor_is_fatal() {
        let (book, store, paginator) = setup(4).await;
        store.put("row_number", "abc").await.unwrap();

        let err = paginator
            .next_rows(&sheet(), &PageRequest::new("row_number", 1))
            .await
            .unwrap_err();
        assert!(matches!(
            &err,
            PaginationError::CorruptedCursor { key, value } if key == "row_number" && value == "abc"
        ));
        let message = err.to_string();
        assert!(message.contains("row_number"));
        assert!(message.contains("abc"));
        assert!(book.fetch_log().await.is_empty());
        assert_eq!(store.get("row_number").await.unwrap().as_deref(), Some("abc"));
    }

    #[tokio::test]
    async fn zero_or_negative_cursor_fails_before_fetching() {
        for stored in ["0", "-2"] {
            let (book, store, paginator) = setup(4).await;
            store.put("row_number", stored).await.unwrap();

            let err = paginator
                .next_rows(&sheet(), &PageRequest::new("row_number", 1))
                .await
                .unwrap_err();
            assert!(matches!(err, PaginationError::InvalidStartingRow(row) if row.to_string() == stored));
            assert!(err.to_string().contains(stored));
            assert!(book.fetch_log().await.is_empty());
            assert_eq!(store.get("row_number").await.unwrap().as_deref(), Some(stored));
        }
    }

    #[tokio::test]
    async fn zero_group_size_is_rejected() {
        let (book, _store, paginator) = setup(4).await;
        let err = paginator
            .next_rows(&sheet(), &PageRequest::new("row_number", 0))
            .await
            .unwrap_err();
        assert!(matches!(err, PaginationError::EmptyGroup));
        assert!(book.fetch_log().await.is_empty());
    }

    #[tokio::test]
    async fn unknown_sheet_fails_without_touching_the_cursor() {
        let (_book, store, paginator) = setup(4).await;
        let err = paginator
            .next_rows(&SheetRef::new(SS, 99), &PageRequest::new("row_number", 1))
            .await
            .unwrap_err();
        assert!(matches!(err, PaginationError::Source(_)));
        assert_eq!(store.get_entry("row_number").await.unwrap(), None);
    }

    #[tokio::test]
    async fn fetch_failure_keeps_the_advanced_cursor() {
        let (book, store, paginator) = setup(10).await;
        book.fail_fetches_with(500, json!({ "error": { "message": "backend down" } }))
            .await;

        let err = paginator
            .next_rows(&sheet(), &PageRequest::new("row_number", 3))
            .await
            .unwrap_err();
        assert!(matches!(err, PaginationError::Source(_)));
        // Write-ahead: the group is skipped, not retried.
        assert_eq!(store.get("row_number").await.unwrap().as_deref(), Some("4"));
    }

    /// Store where another run advances the cursor right after our read.
    struct RacingStore {
        inner: InMemoryKeyValueStore,
        raced: AtomicBool,
    }

    #[async_trait]
    impl KeyValueStore for RacingStore {
        async fn put(&self, key: &str, value: &str) -> Result<u64, StateStoreError> {
            self.inner.put(key, value).await
        }

        async fn get_entry(&self, key: &str) -> Result<Option<StoredEntry>, StateStoreError> {
            let entry = self.inner.get_entry(key).await?;
            if !self.raced.swap(true, Ordering::SeqCst) {
                self.inner.put(key, "50").await?;
            }
            Ok(entry)
        }

        async fn put_if_version(
            &self,
            key: &str,
            expected: Option<u64>,
            value: &str,
        ) -> Result<Option<u64>, StateStoreError> {
            self.inner.put_if_version(key, expected, value).await
        }
    }

    async fn racing_setup(guard: CursorGuard) -> (Arc<InMemoryWorkbook>, Arc<RacingStore>, RowPaginator) {
        let (book, _, _) = setup(10).await;
        let store = Arc::new(RacingStore {
            inner: InMemoryKeyValueStore::new(),
            raced: AtomicBool::new(false),
        });
        let paginator = RowPaginator::new(book.clone(), store.clone()).with_guard(guard);
        (book, store, paginator)
    }

    #[tokio::test]
    async fn versioned_guard_detects_concurrent_advance() {
        let (book, store, paginator) = racing_setup(CursorGuard::Versioned).await;

        let err = paginator
            .next_rows(&sheet(), &PageRequest::new("row_number", 2))
            .await
            .unwrap_err();
        assert!(matches!(
            &err,
            PaginationError::CursorConflict { key, expected: None } if key == "row_number"
        ));
        assert!(book.fetch_log().await.is_empty());
        assert_eq!(store.get("row_number").await.unwrap().as_deref(), Some("50"));
    }

    #[tokio::test]
    async fn unguarded_runs_overwrite_concurrent_advance() {
        let (_book, store, paginator) = racing_setup(CursorGuard::None).await;

        let result = paginator
            .next_rows(&sheet(), &PageRequest::new("row_number", 2))
            .await
            .unwrap();
        assert_eq!(rows_of(&result), vec![1, 2]);
        assert_eq!(store.get("row_number").await.unwrap().as_deref(), Some("3"));
    }

    #[tokio::test]
    async fn versioned_guard_resync_uses_version_from_advance() {
        let (_book, store, paginator) = setup(2).await;
        let paginator = paginator.with_guard(CursorGuard::Versioned);
        store.put("row_number", "8").await.unwrap();

        let result = paginator
            .next_rows(&sheet(), &PageRequest::new("row_number", 1))
            .await
            .unwrap();
        assert!(result.resynced);
        let entry = store.get_entry("row_number").await.unwrap().unwrap();
        assert_eq!(entry.value, "3");
        assert_eq!(entry.version, 3);
    }
}
