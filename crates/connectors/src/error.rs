use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConnectorError {
    /// The spreadsheet itself does not exist.
    #[error("Spreadsheet not found: {0}")]
    SpreadsheetNotFound(String),

    /// No sheet matches the given id or name.
    #[error("Sheet {sheet} not found in spreadsheet {spreadsheet_id}")]
    SheetNotFound {
        spreadsheet_id: String,
        sheet: String,
    },

    /// The remote API answered with a non-success status.
    #[error("API request failed with status {status}: {body}")]
    Api {
        status: u16,
        body: serde_json::Value,
    },

    /// Transport-level HTTP failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid row range {start}..={end}")]
    InvalidRange { start: u64, end: u64 },

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConnectorError {
    /// Builds an `Api` error from a raw response body, keeping it structured
    /// when it is JSON.
    pub fn api(status: u16, body: &str) -> Self {
        let body = serde_json::from_str(body)
            .unwrap_or_else(|_| serde_json::Value::String(body.to_string()));
        ConnectorError::Api { status, body }
    }

    /// The `error.message` embedded in a structured API error body, if any.
    pub fn api_message(&self) -> Option<&str> {
        match self {
            ConnectorError::Api { body, .. } => body.get("error")?.get("message")?.as_str(),
            _ => None,
        }
    }
}
