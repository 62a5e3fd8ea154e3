use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use gamgmt_client::{ClientConfig, ManagementClient};
use gamgmt_core::summaries::AccountSummaries;
use indicatif::{ProgressBar, ProgressStyle};

use crate::args::{Cli, Command};
use crate::io::input;
use crate::output;

mod accounts;
mod columns;
mod lookup;

pub async fn dispatch(cli: Cli) -> Result<()> {
    match &cli.command {
        Command::Accounts { summaries } => accounts::run(&cli, summaries.as_deref()).await,
        Command::Lookup { ids, summaries } => lookup::run(&cli, ids, summaries.as_deref()).await,
        Command::Columns(args) => columns::run(&cli, args).await,
    }
}

fn client(cli: &Cli) -> Result<ManagementClient> {
    let cfg = ClientConfig {
        base_url: cli.base_url.clone(),
        max_results: cli.max_results,
        access_token: cli.access_token.clone(),
        ..ClientConfig::default()
    };
    ManagementClient::new(cfg).context("building API client")
}

fn spinner(msg: &'static str) -> Result<ProgressBar> {
    if output::is_json() {
        return Ok(ProgressBar::hidden());
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(80));
    pb.set_message(msg);
    Ok(pb)
}

/// Account summaries from `file`, or from the API when no file is given.
async fn load_summaries(cli: &Cli, file: Option<&Path>) -> Result<Arc<AccountSummaries>> {
    if let Some(path) = file {
        tracing::debug!(path = %path.display(), "reading account summaries from file");
        return Ok(Arc::new(input::load_summaries(path)?));
    }

    let client = client(cli)?;
    let pb = spinner("fetching account summaries")?;
    let res = client.account_summaries(false).await;
    pb.finish_and_clear();
    Ok(res?)
}
