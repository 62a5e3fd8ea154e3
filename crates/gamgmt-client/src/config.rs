//! Client configuration.
//!
//! Like the core crate, the client never reads the environment. Binaries map
//! their flags onto `ClientConfig` and call `validate_config`.

use gamgmt_core::config::{validate_config as validate_expansion, ExpansionConfig};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{ClientError, ClientResult};

pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    /// API root; request paths start with `/analytics/v3/...`.
    #[serde(default = "ClientConfig::default_base_url")]
    pub base_url: String,

    /// Page size for account summaries. `None` lets the API decide.
    #[serde(default)]
    pub max_results: Option<u32>,

    #[serde(default = "ClientConfig::default_user_agent")]
    pub user_agent: String,

    #[serde(default = "ClientConfig::default_timeout_ms")]
    pub timeout_ms: u64,

    /// OAuth bearer token sent with every request.
    #[serde(default, skip_serializing)]
    pub access_token: Option<String>,

    #[serde(default)]
    pub expansion: ExpansionConfig,
}

impl ClientConfig {
    fn default_base_url() -> String {
        DEFAULT_BASE_URL.to_string()
    }

    fn default_user_agent() -> String {
        format!("gamgmt/{}", env!("CARGO_PKG_VERSION"))
    }

    fn default_timeout_ms() -> u64 {
        30_000
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: Self::default_base_url(),
            max_results: None,
            user_agent: Self::default_user_agent(),
            timeout_ms: Self::default_timeout_ms(),
            access_token: None,
            expansion: ExpansionConfig::default(),
        }
    }
}

pub fn validate_config(cfg: &ClientConfig) -> ClientResult<()> {
    let url = Url::parse(&cfg.base_url)?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ClientError::Config(format!(
            "base url must be http or https, got {}",
            url.scheme()
        )));
    }

    if cfg.max_results == Some(0) {
        return Err(ClientError::Config("max results must be greater than zero".into()));
    }

    if cfg.timeout_ms == 0 {
        return Err(ClientError::Config("timeout must be greater than zero".into()));
    }

    validate_expansion(&cfg.expansion)?;
    Ok(())
}
