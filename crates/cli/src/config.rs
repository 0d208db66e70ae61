use crate::{env::EnvManager, error::CliError};
use connectors::sheets::client::DEFAULT_BASE_URL;
use model::core::identifiers::FlowId;
use std::path::PathBuf;
use tracing::debug;

pub const ACCESS_TOKEN_VAR: &str = "SHEETS_ACCESS_TOKEN";
pub const API_BASE_VAR: &str = "SHEETS_API_BASE";
pub const STATE_DIR_VAR: &str = "SHEETCURSOR_STATE_DIR";
pub const FLOW_ID_VAR: &str = "SHEETCURSOR_FLOW_ID";

const DEFAULT_FLOW_ID: &str = "default";

/// Settings resolved from the environment. Command-line flags override them.
#[derive(Clone)]
pub struct AppConfig {
    pub access_token: Option<String>,
    pub api_base: String,
    pub state_dir: PathBuf,
    pub flow_id: FlowId,
}

impl AppConfig {
    pub fn from_env(env: &EnvManager) -> Result<Self, CliError> {
        for key in [ACCESS_TOKEN_VAR, API_BASE_VAR, STATE_DIR_VAR, FLOW_ID_VAR] {
            debug!(key, value = ?env.describe(key), "Config variable");
        }

        let state_dir = match env.get(STATE_DIR_VAR) {
            Some(dir) => PathBuf::from(dir),
            None => dirs::home_dir()
                .ok_or_else(|| {
                    CliError::Config(format!(
                        "Could not determine home directory; set {STATE_DIR_VAR}"
                    ))
                })?
                .join(".sheetcursor/state"),
        };

        Ok(AppConfig {
            access_token: env.get(ACCESS_TOKEN_VAR).map(str::to_string),
            api_base: env.get(API_BASE_VAR).unwrap_or(DEFAULT_BASE_URL).to_string(),
            state_dir,
            flow_id: FlowId::new(env.get(FLOW_ID_VAR).unwrap_or(DEFAULT_FLOW_ID)),
        })
    }

    /// The flow to scope the store to: the override if given, else the
    /// configured one.
    pub fn flow(&self, flow_override: Option<&str>) -> FlowId {
        flow_override
            .map(FlowId::from)
            .unwrap_or_else(|| self.flow_id.clone())
    }
}
