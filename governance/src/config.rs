//! Governance configuration with TOML file support.

use crate::error::GovernanceError;
use crate::proposal::ProposalParams;
use serde::{Deserialize, Serialize};
use stakevote_utils::LogFormat;
use std::path::Path;

/// Configuration for a governance instance.
///
/// Can be loaded from a TOML file via [`GovernanceConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceConfig {
    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Description and schedule override. Production instances leave this
    /// unset and run on the baked-in constants.
    #[serde(default)]
    pub proposal: Option<ProposalParams>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl GovernanceConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, GovernanceError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| GovernanceError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, GovernanceError> {
        let config: Self = toml::from_str(s).map_err(|e| GovernanceError::Config(e.to_string()))?;
        if let Some(params) = &config.proposal {
            params.validate()?;
        }
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, GovernanceError> {
        toml::to_string_pretty(self).map_err(|e| GovernanceError::Config(e.to_string()))
    }

    /// Install the global tracing subscriber described by this config.
    pub fn init_logging(&self) -> Result<(), GovernanceError> {
        stakevote_utils::init_logging(self.log_format, &self.log_level)
            .map_err(|e| GovernanceError::Config(e.to_string()))
    }
}

impl Default for GovernanceConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::default(),
            log_level: default_log_level(),
            proposal: None,
        }
    }
}
