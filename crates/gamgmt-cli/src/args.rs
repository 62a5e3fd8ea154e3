use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use gamgmt_client::config::DEFAULT_BASE_URL;

#[derive(Parser, Debug, Clone)]
#[command(name = "gamgmt", version, about = "Analytics account summaries and column metadata")]
pub struct Cli {
    /// Emit JSON output on stdout.
    #[arg(long, global = true)]
    pub json: bool,

    /// Log filter (e.g. "info", "gamgmt_client=debug").
    #[arg(long, global = true, env = "GAMGMT_LOG", default_value = "warn")]
    pub log_level: String,

    /// API root.
    #[arg(long, global = true, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// OAuth bearer token.
    #[arg(long, global = true, env = "GAMGMT_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,

    /// Page size for account summary requests.
    #[arg(long, global = true)]
    pub max_results: Option<u32>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print the account → property → view tree.
    Accounts {
        /// Read account summaries from a JSON file instead of the API.
        #[arg(long)]
        summaries: Option<PathBuf>,
    },

    /// Find one account, property or view by id.
    Lookup {
        #[command(flatten)]
        ids: LookupIds,

        /// Read account summaries from a JSON file instead of the API.
        #[arg(long)]
        summaries: Option<PathBuf>,
    },

    /// List column metadata, expanding templated columns.
    Columns(ColumnsArgs),
}

/// Exactly one id is expected; passing several is reported as ambiguous.
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = true)]
pub struct LookupIds {
    #[arg(long)]
    pub account_id: Option<String>,
    #[arg(long)]
    pub web_property_id: Option<String>,
    #[arg(long)]
    pub property_id: Option<String>,
    #[arg(long)]
    pub profile_id: Option<String>,
    #[arg(long)]
    pub view_id: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct ColumnsArgs {
    /// Only metrics.
    #[arg(long, conflicts_with = "dimensions")]
    pub metrics: bool,

    /// Only dimensions.
    #[arg(long)]
    pub dimensions: bool,

    /// Attribute filter `key=value`; repeat to require several.
    #[arg(long = "where", value_name = "KEY=VALUE")]
    pub filters: Vec<String>,

    /// Skip template expansion.
    #[arg(
        long,
        conflicts_with_all = ["custom_metrics", "custom_dimensions", "goals", "account_id", "property_id", "view_id", "premium"]
    )]
    pub raw: bool,

    /// Columns response file. Switches to offline mode.
    #[arg(long)]
    pub columns: Option<PathBuf>,

    #[arg(long, requires = "columns")]
    pub custom_metrics: Option<PathBuf>,

    #[arg(long, requires = "columns")]
    pub custom_dimensions: Option<PathBuf>,

    #[arg(long, requires = "columns")]
    pub goals: Option<PathBuf>,

    #[arg(long, requires_all = ["property_id", "view_id"], conflicts_with = "columns")]
    pub account_id: Option<String>,

    #[arg(long, requires = "account_id", conflicts_with = "columns")]
    pub property_id: Option<String>,

    /// View to expand for; alone, its account and property are looked up.
    #[arg(long, conflicts_with = "columns")]
    pub view_id: Option<String>,

    /// Use premium template bounds.
    #[arg(long)]
    pub premium: bool,
}
