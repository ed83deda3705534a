//! Per-machine configuration.

use serde::{Deserialize, Serialize};

/// Default template for audit log entity names.
pub const DEFAULT_LOG_SCHEMA_NAME: &str = "{model_name}{field_name}Log";

/// Configuration carried by every machine.
///
/// # Example
///
/// ```rust
/// use stately::config::MachineConfig;
///
/// let config = MachineConfig::from_json_str(r#"{"log_transitions": false}"#).unwrap();
/// assert!(!config.log_transitions);
/// assert_eq!(config.log_schema_name, "{model_name}{field_name}Log");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MachineConfig {
    /// Record every transition attempt in an audit log.
    pub log_transitions: bool,

    /// Template for the audit entity name. `{model_name}` and `{field_name}`
    /// are replaced by the schema factory.
    pub log_schema_name: String,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            log_transitions: true,
            log_schema_name: DEFAULT_LOG_SCHEMA_NAME.to_string(),
        }
    }
}

impl MachineConfig {
    /// Configuration with audit logging switched off.
    pub fn without_logging() -> Self {
        Self {
            log_transitions: false,
            ..Self::default()
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
