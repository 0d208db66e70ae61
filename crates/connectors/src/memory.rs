use crate::{error::ConnectorError, source::RowSource};
use async_trait::async_trait;
use model::records::row::SheetRow;
use std::collections::HashMap;
use tokio::sync::Mutex;

/// A fetch issued against an [`InMemoryWorkbook`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchCall {
    Range {
        sheet_name: String,
        start: u64,
        end: u64,
    },
    All {
        sheet_name: String,
    },
}

#[derive(Debug, Clone)]
struct MemorySheet {
    sheet_id: u64,
    name: String,
    rows: Vec<Vec<serde_json::Value>>,
}

#[derive(Default)]
struct WorkbookState {
    spreadsheets: HashMap<String, Vec<MemorySheet>>,
    log: Vec<FetchCall>,
    failure: Option<(u16, serde_json::Value)>,
}

/// Row source holding sheets in memory. Records every row fetch so callers
/// can assert which windows were read.
#[derive(Default)]
pub struct InMemoryWorkbook {
    state: Mutex<WorkbookState>,
}

impl InMemoryWorkbook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a sheet.
    pub async fn put_sheet(
        &self,
        spreadsheet_id: &str,
        sheet_id: u64,
        name: &str,
        rows: Vec<Vec<serde_json::Value>>,
    ) {
        let mut state = self.state.lock().await;
        let sheets = state
            .spreadsheets
            .entry(spreadsheet_id.to_string())
            .or_default();
        sheets.retain(|sheet| sheet.sheet_id != sheet_id);
        sheets.push(MemorySheet {
            sheet_id,
            name: name.to_string(),
            rows,
        });
    }

    /// Replaces the rows of an existing sheet, e.g. to simulate external edits.
    pub async fn set_rows(
        &self,
        spreadsheet_id: &str,
        sheet_name: &str,
        rows: Vec<Vec<serde_json::Value>>,
    ) -> Result<(), ConnectorError> {
        let mut state = self.state.lock().await;
        let sheet = find_sheet_mut(&mut state, spreadsheet_id, sheet_name)?;
        sheet.rows = rows;
        Ok(())
    }

    /// Makes every following row fetch fail with an API error.
    pub async fn fail_fetches_with(&self, status: u16, body: serde_json::Value) {
        self.state.lock().await.failure = Some((status, body));
    }

    pub async fn fetch_log(&self) -> Vec<FetchCall> {
        self.state.lock().await.log.clone()
    }
}

fn find_sheet_mut<'a>(
    state: &'a mut WorkbookState,
    spreadsheet_id: &str,
    sheet_name: &str,
) -> Result<&'a mut MemorySheet, ConnectorError> {
    state
        .spreadsheets
        .get_mut(spreadsheet_id)
        .ok_or_else(|| ConnectorError::SpreadsheetNotFound(spreadsheet_id.to_string()))?
        .iter_mut()
        .find(|sheet| sheet.name == sheet_name)
        .ok_or_else(|| ConnectorError::SheetNotFound {
            spreadsheet_id: spreadsheet_id.to_string(),
            sheet: format!("'{sheet_name}'"),
        })
}

fn rows_between(sheet: &MemorySheet, start: u64, end: Option<u64>) -> Vec<SheetRow> {
    sheet
        .rows
        .iter()
        .zip(1u64..)
        .filter(|(_, row)| *row >= start && end.is_none_or(|end| *row <= end))
        .map(|(cells, row)| SheetRow::from_cells(row, cells.iter().cloned()))
        .collect()
}

#[async_trait]
impl RowSource for InMemoryWorkbook {
    async fn resolve_sheet_name(
        &self,
        spreadsheet_id: &str,
        sheet_id: u64,
    ) -> Result<String, ConnectorError> {
        let state = self.state.lock().await;
        state
            .spreadsheets
            .get(spreadsheet_id)
            .ok_or_else(|| ConnectorError::SpreadsheetNotFound(spreadsheet_id.to_string()))?
            .iter()
            .find(|sheet| sheet.sheet_id == sheet_id)
            .map(|sheet| sheet.name.clone())
            .ok_or_else(|| ConnectorError::SheetNotFound {
                spreadsheet_id: spreadsheet_id.to_string(),
                sheet: format!("id {sheet_id}"),
            })
    }

    async fn fetch_range(
        &self,
        spreadsheet_id: &str,
        sheet_name: &str,
        start: u64,
        end: u64,
    ) -> Result<Vec<SheetRow>, ConnectorError> {
        let mut state = self.state.lock().await;
        state.log.push(FetchCall::Range {
            sheet_name: sheet_name.to_string(),
            start,
            end,
        });
        if let Some((status, body)) = state.failure.clone() {
            return Err(ConnectorError::Api { status, body });
        }
        if start == 0 || end < start {
            return Err(ConnectorError::InvalidRange { start, end });
        }

        let sheet = find_sheet_mut(&mut state, spreadsheet_id, sheet_name)?;
        Ok(rows_between(sheet, start, Some(end)))
    }

    async fn fetch_all(
        &self,
        spreadsheet_id: &str,
        sheet_name: &str,
    ) -> Result<Vec<SheetRow>, ConnectorError> {
        let mut state = self.state.lock().await;
        state.log.push(FetchCall::All {
            sheet_name: sheet_name.to_string(),
        });
        if let Some((status, body)) = state.failure.clone() {
            return Err(ConnectorError::Api { status, body });
        }

        let sheet = find_sheet_mut(&mut state, spreadsheet_id, sheet_name)?;
        Ok(rows_between(sheet, 1, None))
    }
}
