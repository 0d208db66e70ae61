#![allow(dead_code)]

use super::{SHEET_ID, SPREADSHEET_ID};
use engine_core::state::KeyValueStore;
use engine_processing::props::GetRowsProps;
use model::records::row::SheetRow;
use std::{fs, path::Path};

pub fn leads_props(group_size: i64) -> GetRowsProps {
    let mut props = GetRowsProps::new(SPREADSHEET_ID, SHEET_ID);
    props.group_size = group_size;
    props
}

pub fn row_numbers(rows: &[SheetRow]) -> Vec<u64> {
    rows.iter().map(|row| row.row).collect()
}

pub fn first_cells(rows: &[SheetRow]) -> Vec<String> {
    rows.iter()
        .filter_map(|row| row.get("A").and_then(|v| v.as_str()).map(str::to_string))
        .collect()
}

pub async fn stored_cursor(store: &dyn KeyValueStore, key: &str) -> Option<String> {
    store.get(key).await.expect("read cursor")
}

/// Writes `root/<spreadsheet>/<sheet>.csv` with one line per record.
pub fn write_csv_sheet(root: &Path, spreadsheet: &str, sheet: &str, records: &[&str]) {
    let dir = root.join(spreadsheet);
    fs::create_dir_all(&dir).expect("create spreadsheet dir");
    let mut contents = records.join("\n");
    contents.push('\n');
    fs::write(dir.join(format!("{sheet}.csv")), contents).expect("write csv sheet");
}
