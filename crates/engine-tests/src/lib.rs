#![allow(dead_code)]

use connectors::{memory::InMemoryWorkbook, source::RowSource};
use engine_core::state::{KeyValueStore, sled_store::SledKeyValueStore};
use engine_processing::{action::GetNextRowsAction, paginator::RowPaginator};
use model::core::identifiers::FlowId;
use serde_json::json;
use std::{path::Path, sync::Arc};

pub mod utils;

// Fixture spreadsheet
const SPREADSHEET_ID: &str = "1BxiMVs0XRA5nFMdKvBdBZjgmUUqptlbs74OgvE2upms";
const SHEET_ID: u64 = 1_384_245_116;
const SHEET_NAME: &str = "Leads";

/// One row per lead: `[name, email]`.
fn lead_rows(count: usize) -> Vec<Vec<serde_json::Value>> {
    (1..=count)
        .map(|i| vec![json!(format!("lead-{i}")), json!(format!("lead{i}@example.com"))])
        .collect()
}

/// Workbook holding the `Leads` sheet with `rows` leads.
async fn leads_workbook(rows: usize) -> Arc<InMemoryWorkbook> {
    let book = Arc::new(InMemoryWorkbook::new());
    book.put_sheet(SPREADSHEET_ID, SHEET_ID, SHEET_NAME, lead_rows(rows))
        .await;
    book
}

fn sled_store(dir: &Path, flow: &str) -> Arc<SledKeyValueStore> {
    Arc::new(SledKeyValueStore::open(dir, FlowId::new(flow)).expect("open sled store"))
}

fn action(source: Arc<dyn RowSource>, store: Arc<dyn KeyValueStore>) -> GetNextRowsAction {
    GetNextRowsAction::new(RowPaginator::new(source, store))
}
