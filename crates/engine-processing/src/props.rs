use crate::error::ActionError;
use model::pagination::{
    cursor::DEFAULT_MEM_KEY,
    request::{PageRequest, SheetRef},
};
use serde::{Deserialize, Serialize};

/// Input of the "get next rows" action, as submitted by the flow builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetRowsProps {
    pub spreadsheet_id: String,
    pub sheet_id: u64,
    #[serde(rename = "startRow", default = "default_start_row")]
    pub start_row: i64,
    #[serde(rename = "memKey", default = "default_mem_key")]
    pub mem_key: String,
    #[serde(rename = "groupSize", default = "default_group_size")]
    pub group_size: i64,
    /// Only affects spreadsheet discovery; ignored when paging.
    #[serde(default)]
    pub include_team_drives: bool,
}

fn default_start_row() -> i64 {
    1
}

fn default_mem_key() -> String {
    DEFAULT_MEM_KEY.to_string()
}

fn default_group_size() -> i64 {
    1
}

impl GetRowsProps {
    pub fn new(spreadsheet_id: impl Into<String>, sheet_id: u64) -> Self {
        GetRowsProps {
            spreadsheet_id: spreadsheet_id.into(),
            sheet_id,
            start_row: default_start_row(),
            mem_key: default_mem_key(),
            group_size: default_group_size(),
            include_team_drives: false,
        }
    }

    /// Checks bounds and builds the engine request.
    pub fn into_request(self, testing: bool) -> Result<(SheetRef, PageRequest), ActionError> {
        let start_row = at_least_one("startRow", self.start_row)?;
        let group_size = at_least_one("groupSize", self.group_size)?;
        if self.mem_key.is_empty() {
            return Err(ActionError::InvalidProperty {
                field: "memKey",
                reason: "must not be empty".to_string(),
            });
        }

        let sheet = SheetRef::new(self.spreadsheet_id, self.sheet_id);
        let request = PageRequest::new(self.mem_key, group_size)
            .with_start_row(start_row)
            .testing(testing);
        Ok((sheet, request))
    }
}

fn at_least_one(field: &'static str, value: i64) -> Result<u64, ActionError> {
    u64::try_from(value)
        .ok()
        .filter(|value| *value >= 1)
        .ok_or_else(|| ActionError::InvalidProperty {
            field,
            reason: format!("must be at least 1, got {value}"),
        })
}
