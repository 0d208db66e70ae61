use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("Invalid id '{value}': expected {expected} alphanumeric characters")]
    InvalidId { value: String, expected: usize },

    #[error("Unknown table webhook event type: {0}")]
    UnknownEventType(String),
}
