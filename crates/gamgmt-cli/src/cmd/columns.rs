use std::io::Write;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use gamgmt_core::metadata::expand::{ColumnExpander, ExpansionContext};
use gamgmt_core::metadata::{ColumnCatalog, ColumnFilter};
use gamgmt_core::model::{Column, ColumnType, EntityId};
use serde_json::Value;
use termcolor::{Color, ColorSpec, WriteColor};

use crate::args::{Cli, ColumnsArgs};
use crate::io::input;
use crate::output;

pub async fn run(cli: &Cli, args: &ColumnsArgs) -> Result<()> {
    let filter = parse_filters(&args.filters)?;
    let catalog = match &args.columns {
        Some(_) => Arc::new(offline_catalog(args)?),
        None => online_catalog(cli, args).await?,
    };

    let columns = if args.metrics {
        catalog.all_metrics(filter.as_ref())
    } else if args.dimensions {
        catalog.all_dimensions(filter.as_ref())
    } else {
        catalog.all(filter.as_ref())
    };

    if output::is_json() {
        return output::print(&columns);
    }

    print_table(&columns)?;
    output::eprintln_line(&format!("{} columns", columns.len()));
    Ok(())
}

/// `key=value` pairs become one strict attribute filter. Values are compared
/// as JSON strings.
fn parse_filters(raw: &[String]) -> Result<Option<ColumnFilter<'static>>> {
    if raw.is_empty() {
        return Ok(None);
    }

    let pairs = raw
        .iter()
        .map(|kv| {
            kv.split_once('=')
                .filter(|(k, _)| !k.is_empty())
                .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
                .ok_or_else(|| anyhow!("invalid filter {kv:?}, expected KEY=VALUE"))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Some(ColumnFilter::attributes(pairs)))
}

fn offline_catalog(args: &ColumnsArgs) -> Result<ColumnCatalog> {
    let path = args
        .columns
        .as_deref()
        .ok_or_else(|| anyhow!("--columns is required offline"))?;
    let columns = input::load_columns(path)?;
    tracing::debug!(path = %path.display(), columns = columns.len(), "read columns from file");
    if args.raw {
        return Ok(ColumnCatalog::new(columns));
    }

    let custom_metrics = input::load_sources(args.custom_metrics.as_deref())?;
    let custom_dimensions = input::load_sources(args.custom_dimensions.as_deref())?;
    let goals = input::load_sources(args.goals.as_deref())?;
    let ctx = ExpansionContext {
        custom_metrics: &custom_metrics,
        custom_dimensions: &custom_dimensions,
        goals: &goals,
        is_premium: args.premium,
    };
    Ok(ColumnCatalog::new(ColumnExpander::default().expand(&columns, &ctx)))
}

async fn online_catalog(cli: &Cli, args: &ColumnsArgs) -> Result<Arc<ColumnCatalog>> {
    let client = super::client(cli)?;
    let pb = super::spinner("fetching column metadata")?;

    let res = match (&args.account_id, &args.property_id, &args.view_id) {
        _ if args.raw => client.metadata().await,
        (Some(a), Some(p), Some(v)) => client
            .authenticated_metadata(a, p, v, args.premium)
            .await
            .map(Arc::new),
        (None, None, Some(v)) => {
            if args.premium {
                tracing::warn!(view_id = %v, "--premium ignored; the view's property decides the premium level");
            }
            client
                .metadata_for_view(EntityId::from(v))
                .await
                .map(Arc::new)
        }
        _ => client.metadata().await,
    };
    pb.finish_and_clear();
    Ok(res?)
}

fn print_table(columns: &[&Column]) -> Result<()> {
    let mut out = output::stdout();
    for c in columns {
        let ty = c.column_type();
        let color = match ty {
            ColumnType::Metric => Color::Green,
            ColumnType::Dimension => Color::Blue,
            ColumnType::Other => Color::White,
        };
        out.set_color(ColorSpec::new().set_fg(Some(color)))?;
        write!(out, "{:<10}", ty.as_str())?;
        out.reset()?;
        writeln!(out, " {:<36} {}", c.id, c.attributes.ui_name().unwrap_or(""))?;
    }
    Ok(())
}
