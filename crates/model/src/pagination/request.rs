use crate::{
    pagination::{cursor::DEFAULT_MEM_KEY, window::FetchWindow},
    records::row::SheetRow,
};
use serde::{Deserialize, Serialize};

/// Identifies the sheet being paged through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetRef {
    pub spreadsheet_id: String,
    pub sheet_id: u64,
}

impl SheetRef {
    pub fn new(spreadsheet_id: impl Into<String>, sheet_id: u64) -> Self {
        SheetRef {
            spreadsheet_id: spreadsheet_id.into(),
            sheet_id,
        }
    }
}

/// One "get next rows" invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Used only when no cursor is stored yet.
    pub start_row: Option<u64>,
    pub group_size: u64,
    pub mem_key: String,
    /// Preview mode: the cursor is read but never written.
    pub testing: bool,
}

impl PageRequest {
    pub fn new(mem_key: impl Into<String>, group_size: u64) -> Self {
        PageRequest {
            start_row: None,
            group_size,
            mem_key: mem_key.into(),
            testing: false,
        }
    }

    pub fn with_start_row(mut self, start_row: u64) -> Self {
        self.start_row = Some(start_row);
        self
    }

    pub fn testing(mut self, testing: bool) -> Self {
        self.testing = testing;
        self
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        PageRequest::new(DEFAULT_MEM_KEY, 1)
    }
}

/// Outcome of one invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResult {
    pub sheet_name: String,
    pub window: FetchWindow,
    pub rows: Vec<SheetRow>,
    /// Cursor value persisted by this call, `None` in preview mode.
    pub cursor_written: Option<u64>,
    /// Set when the window was past the end of data and the cursor was
    /// re-derived from the sheet length.
    pub resynced: bool,
}

impl PageResult {
    pub fn into_rows(self) -> Vec<SheetRow> {
        self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}
