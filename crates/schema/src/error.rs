use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Unsupported SQL dialect: {0}")]
    UnsupportedDialect(String),
}
