use crate::{
    error::ConnectorError,
    sheets::{
        range::{row_range, sheet_range},
        types::{SpreadsheetMeta, ValueRange},
    },
    source::RowSource,
};
use async_trait::async_trait;
use model::records::row::SheetRow;
use reqwest::Url;
use serde::de::DeserializeOwned;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// Row source backed by the Google Sheets v4 REST API.
///
/// Authentication is out of scope: the caller supplies an OAuth access token
/// which is sent as a bearer token on every request.
#[derive(Clone)]
pub struct GoogleSheetsClient {
    http: reqwest::Client,
    base_url: Url,
    access_token: String,
}

impl GoogleSheetsClient {
    pub fn new(access_token: impl Into<String>) -> Result<Self, ConnectorError> {
        Self::with_base_url(access_token, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(
        access_token: impl Into<String>,
        base_url: &str,
    ) -> Result<Self, ConnectorError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ConnectorError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ConnectorError::InvalidUrl(base_url.to_string()));
        }

        Ok(GoogleSheetsClient {
            http: reqwest::Client::new(),
            base_url,
            access_token: access_token.into(),
        })
    }

    /// Appends path segments to the base URL, percent-encoding each one.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, ConnectorError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ConnectorError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ConnectorError> {
        debug!(%url, "Sheets API request");
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.access_token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ConnectorError::api(status.as_u16(), &body));
        }

        Ok(response.json::<T>().await?)
    }

    async fn get_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
    ) -> Result<Vec<Vec<serde_json::Value>>, ConnectorError> {
        let url = self.endpoint(&[spreadsheet_id, "values", range])?;
        let body: ValueRange = self.get_json(url).await?;
        Ok(body.values)
    }
}

/// Numbers returned value arrays consecutively from `first_row`.
fn number_rows(first_row: u64, values: Vec<Vec<serde_json::Value>>) -> Vec<SheetRow> {
    values
        .into_iter()
        .zip(first_row..)
        .map(|(cells, row)| SheetRow::from_cells(row, cells))
        .collect()
}

#[async_trait]
impl RowSource for GoogleSheetsClient {
    async fn resolve_sheet_name(
        &self,
        spreadsheet_id: &str,
        sheet_id: u64,
    ) -> Result<String, ConnectorError> {
        let mut url = self.endpoint(&[spreadsheet_id])?;
        url.query_pairs_mut()
            .append_pair("fields", "sheets.properties");

        let meta: SpreadsheetMeta = self.get_json(url).await?;
        meta.sheets
            .into_iter()
            .find(|sheet| sheet.properties.sheet_id == sheet_id)
            .map(|sheet| sheet.properties.title)
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

        let values = self
            .get_values(spreadsheet_id, &row_range(sheet_name, start, end))
            .await?;
        Ok(number_rows(start, values))
    }

    async fn fetch_all(
        &self,
        spreadsheet_id: &str,
        sheet_name: &str,
    ) -> Result<Vec<SheetRow>, ConnectorError> {
        let values = self
            .get_values(spreadsheet_id, &sheet_range(sheet_name))
            .await?;
        Ok(number_rows(1, values))
    }
}
