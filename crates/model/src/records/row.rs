use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single sheet row. `values` is keyed by column label (`A`, `B`, ...,
/// `AA`, ...); empty trailing cells are absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetRow {
    pub row: u64,
    pub values: BTreeMap<String, serde_json::Value>,
}

impl SheetRow {
    pub fn new(row: u64, values: BTreeMap<String, serde_json::Value>) -> Self {
        SheetRow { row, values }
    }

    /// Builds a row from positional cells, labelling them `A`, `B`, ...
    pub fn from_cells<I>(row: u64, cells: I) -> Self
    where
        I: IntoIterator<Item = serde_json::Value>,
    {
        let values = cells
            .into_iter()
            .enumerate()
            .map(|(idx, cell)| (column_label(idx), cell))
            .collect();
        SheetRow { row, values }
    }

    pub fn get(&self, column: &str) -> Option<&serde_json::Value> {
        self.values.get(&column.to_ascii_uppercase())
    }

    pub fn is_blank(&self) -> bool {
        self.values.is_empty()
    }
}

/// Spreadsheet column label for a zero-based column index.
pub fn column_label(index: usize) -> String {
    let mut n = index + 1;
    let mut label = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        label.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    label.reverse();
    String::from_utf8_lossy(&label).into_owned()
}
