use connectors::error::ConnectorError;
use engine_core::error::StateStoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PaginationError {
    #[error("The value stored in memory key '{key}' is '{value}' and it is not a number")]
    CorruptedCursor { key: String, value: String },

    #[error("Starting row {0} is less than 1")]
    InvalidStartingRow(i64),

    #[error("Group size must be at least 1")]
    EmptyGroup,

    #[error("Cursor '{key}' was advanced by another run (expected version {expected:?})")]
    CursorConflict { key: String, expected: Option<u64> },

    #[error("State store operation failed: {0}")]
    StateStore(#[from] StateStoreError),

    #[error("Row source error: {0}")]
    Source(#[from] ConnectorError),
}

#[derive(Error, Debug)]
pub enum ActionError {
    #[error("Invalid property '{field}': {reason}")]
    InvalidProperty { field: &'static str, reason: String },

    /// Message unwrapped from a structured API error body.
    #[error("{0}")]
    Transport(String),

    #[error(transparent)]
    Pagination(PaginationError),
}

impl From<PaginationError> for ActionError {
    /// Surfaces the `error.message` of structured API failures on its own;
    /// every other error passes through unchanged.
    fn from(err: PaginationError) -> Self {
        if let PaginationError::Source(source) = &err
            && let Some(message) = source.api_message()
        {
            return ActionError::Transport(message.to_string());
        }
        ActionError::Pagination(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unwraps_structured_api_messages() {
        let err = PaginationError::Source(ConnectorError::Api {
            status: 400,
            body: json!({ "error": { "code": 400, "message": "Unable to parse range" } }),
        });
        let action_err = ActionError::from(err);
        assert!(matches!(&action_err, ActionError::Transport(m) if m == "Unable to parse range"));
        assert_eq!(action_err.to_string(), "Unable to parse range");
    }

    #[test]
    fn passes_other_errors_through() {
        let err = PaginationError::Source(ConnectorError::Api {
            status: 502,
            body: json!("Bad Gateway"),
        });
        assert!(matches!(
            ActionError::from(err),
            ActionError::Pagination(PaginationError::Source(ConnectorError::Api { status: 502, .. }))
        ));

        let err = PaginationError::InvalidStartingRow(0);
        let action_err = ActionError::from(err);
        assert_eq!(action_err.to_string(), "Starting row 0 is less than 1");
    }
}
