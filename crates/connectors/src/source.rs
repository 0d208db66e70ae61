use crate::error::ConnectorError;
use async_trait::async_trait;
use model::records::row::SheetRow;

/// Read access to the rows of a spreadsheet.
#[async_trait]
pub trait RowSource: Send + Sync {
    /// Resolves the human-readable sheet name from its numeric id.
    async fn resolve_sheet_name(
        &self,
        spreadsheet_id: &str,
        sheet_id: u64,
    ) -> Result<String, ConnectorError>;

    /// Rows in the inclusive window `[start, end]` that exist. A window past
    /// the end of data yields an empty vec.
    async fn fetch_range(
        &self,
        spreadsheet_id: &str,
        sheet_name: &str,
        start: u64,
        end: u64,
    ) -> Result<Vec<SheetRow>, ConnectorError>;

    /// Every row of the sheet.
    async fn fetch_all(
        &self,
        spreadsheet_id: &str,
        sheet_name: &str,
    ) -> Result<Vec<SheetRow>, ConnectorError>;
}
