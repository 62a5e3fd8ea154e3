//! Configuration structures for gamgmt-core.
//!
//! The core crate itself does not read environment variables. All
//! configuration must be provided explicitly by the caller.

use serde::{Deserialize, Serialize};

use crate::defaults;
use crate::errors::{MgmtError, MgmtResult};

/// Template conventions used by the column expander.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpansionConfig {
    /// Literal token replaced during expansion.
    #[serde(default = "ExpansionConfig::default_placeholder")]
    pub placeholder: String,

    /// Column id expanded once per custom metric.
    #[serde(default = "ExpansionConfig::default_custom_metric_template")]
    pub custom_metric_template: String,

    /// Column id expanded once per custom dimension.
    #[serde(default = "ExpansionConfig::default_custom_dimension_template")]
    pub custom_dimension_template: String,

    /// Case-insensitive substring selecting goal templates.
    #[serde(default = "ExpansionConfig::default_goal_pattern")]
    pub goal_pattern: String,
}

impl ExpansionConfig {
    fn default_placeholder() -> String {
        defaults::PLACEHOLDER.to_string()
    }

    fn default_custom_metric_template() -> String {
        defaults::CUSTOM_METRIC_TEMPLATE.to_string()
    }

    fn default_custom_dimension_template() -> String {
        defaults::CUSTOM_DIMENSION_TEMPLATE.to_string()
    }

    fn default_goal_pattern() -> String {
        defaults::GOAL_PATTERN.to_string()
    }
}

impl Default for ExpansionConfig {
    fn default() -> Self {
        Self {
            placeholder: Self::default_placeholder(),
            custom_metric_template: Self::default_custom_metric_template(),
            custom_dimension_template: Self::default_custom_dimension_template(),
            goal_pattern: Self::default_goal_pattern(),
        }
    }
}

/// Validate an expansion configuration.
pub fn validate_config(cfg: &ExpansionConfig) -> MgmtResult<()> {
    if cfg.placeholder.is_empty() {
        return Err(MgmtError::invalid_argument("placeholder must not be empty"));
    }

    if cfg.goal_pattern.is_empty() {
        return Err(MgmtError::invalid_argument("goal pattern must not be empty"));
    }

    if cfg.custom_metric_template == cfg.custom_dimension_template {
        return Err(MgmtError::invalid_argument(
            "custom metric and custom dimension templates must differ",
        ));
    }

    Ok(())
}
