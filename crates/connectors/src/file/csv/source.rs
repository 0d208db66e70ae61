use crate::{error::ConnectorError, source::RowSource};
use async_trait::async_trait;
use model::records::row::SheetRow;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::debug;

/// Row source over CSV files on disk.
///
/// Each subdirectory of `root` is a spreadsheet named after the directory.
/// Its `*.csv` files are the sheets: the sheet name is the file stem and the
/// sheet id is the file's position when sorted by name, starting at 0.
/// Every record is a row; there is no header handling.
#[derive(Debug, Clone)]
pub struct CsvDataSource {
    root: PathBuf,
}

impl CsvDataSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        CsvDataSource { root: root.into() }
    }

    fn spreadsheet_dir(&self, spreadsheet_id: &str) -> Result<PathBuf, ConnectorError> {
        let is_plain_name = !spreadsheet_id.is_empty()
            && spreadsheet_id != "."
            && spreadsheet_id != ".."
            && !spreadsheet_id.contains(['/', '\\']);

        let dir = self.root.join(spreadsheet_id);
        if !is_plain_name || !dir.is_dir() {
            return Err(ConnectorError::SpreadsheetNotFound(spreadsheet_id.to_string()));
        }
        Ok(dir)
    }

    /// Sheet files of a spreadsheet, sorted by file name.
    fn sheet_files(&self, spreadsheet_id: &str) -> Result<Vec<PathBuf>, ConnectorError> {
        let dir = self.spreadsheet_dir(spreadsheet_id)?;
        let mut files = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            let is_csv = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
            if path.is_file() && is_csv {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    fn sheet_path(&self, spreadsheet_id: &str, sheet_name: &str) -> Result<PathBuf, ConnectorError> {
        self.sheet_files(spreadsheet_id)?
            .into_iter()
            .find(|path| sheet_name_of(path).as_deref() == Some(sheet_name))
            .ok_or_else(|| ConnectorError::SheetNotFound {
                spreadsheet_id: spreadsheet_id.to_string(),
                sheet: format!("'{sheet_name}'"),
            })
    }

    /// Reads rows `[start, end]` (1-based, inclusive); `end = None` reads to
    /// the end of the file.
    ///
    /// The reader skips blank lines, but each one is still a sheet row: it is
    /// returned as a blank row so later records keep their position.
    fn read_rows(path: &Path, start: u64, end: Option<u64>) -> Result<Vec<SheetRow>, ConnectorError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)?;

        let in_window = |row: u64| row >= start && end.is_none_or(|end| row <= end);

        let mut rows = Vec::new();
        let mut row = 0u64;
        let mut next_line = 1u64;
        let mut record = csv::StringRecord::new();
        while reader.read_record(&mut record)? {
            let line = record.position().map_or(next_line, |pos| pos.line());
            let blank_lines = line.saturating_sub(next_line);
            next_line = line + 1 + record_newlines(&record);

            for blank in row + 1..=row + blank_lines {
                if in_window(blank) {
                    rows.push(SheetRow::from_cells(blank, Vec::new()));
                }
            }
            row += blank_lines + 1;

            if end.is_some_and(|end| row > end) {
                break;
            }
            if in_window(row) {
                rows.push(SheetRow::from_cells(row, trimmed_cells(&record)));
            }
        }

        debug!(path = %path.display(), start, ?end, rows = rows.len(), "Read CSV rows");
        Ok(rows)
    }
}

/// Line breaks inside quoted fields; a record spans this many extra lines.
fn record_newlines(record: &csv::StringRecord) -> u64 {
    record
        .iter()
        .map(|field| field.matches('\n').count() as u64)
        .sum()
}

fn sheet_name_of(path: &Path) -> Option<String> {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
}

/// Cells of a record with trailing empty cells dropped, the way the Sheets
/// API omits them.
fn trimmed_cells(record: &csv::StringRecord) -> Vec<serde_json::Value> {
    let mut cells: Vec<&str> = record.iter().collect();
    while cells.last().is_some_and(|cell| cell.is_empty()) {
        cells.pop();
    }
    cells
        .into_iter()
        .map(|cell| serde_json::Value::String(cell.to_string()))
        .collect()
}

#[async_trait]
impl RowSource for CsvDataSource {
    async fn resolve_sheet_name(
        &self,
        spreadsheet_id: &str,
        sheet_id: u64,
    ) -> Result<String, ConnectorError> {
        let files = self.sheet_files(spreadsheet_id)?;
        usize::try_from(sheet_id)
            .ok()
            .and_then(|idx| files.get(idx))
            .and_then(|path| sheet_name_of(path))
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
        if start == 0 || end < start {
            return Err(ConnectorError::InvalidRange { start, end });
        }
        let path = self.sheet_path(spreadsheet_id, sheet_name)?;
        Self::read_rows(&path, start, Some(end))
    }

    async fn fetch_all(
        &self,
        spreadsheet_id: &str,
        sheet_name: &str,
    ) -> Result<Vec<SheetRow>, ConnectorError> {
        let path = self.sheet_path(spreadsheet_id, sheet_name)?;
        Self::read_rows(&path, 1, None)
    }
}
