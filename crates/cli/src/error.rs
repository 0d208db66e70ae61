use connectors::error::ConnectorError;
use engine_core::error::StateStoreError;
use engine_processing::error::ActionError;
use schema::error::SchemaError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing SHEETS_ACCESS_TOKEN: required to read from Google Sheets")]
    MissingAccessToken,

    #[error("{0}")]
    Action(#[from] ActionError),

    #[error("Failed to open the state store: {0}")]
    StateStore(#[from] StateStoreError),

    #[error("Failed to set up the row source: {0}")]
    Connector(#[from] ConnectorError),

    #[error("{0}")]
    Schema(#[from] SchemaError),

    #[error("Failed to serialize data to JSON: {0}")]
    JsonSerialize(#[from] serde_json::Error),
}
