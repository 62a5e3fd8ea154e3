use std::io::Write;
use std::path::Path;

use anyhow::Result;
use gamgmt_core::model::HierarchyNode;
use gamgmt_core::summaries::AccountSummaries;
use termcolor::{Color, ColorSpec, WriteColor};

use crate::args::Cli;
use crate::output;

pub async fn run(cli: &Cli, file: Option<&Path>) -> Result<()> {
    let summaries = super::load_summaries(cli, file).await?;

    if output::is_json() {
        return output::print(&summaries.all());
    }

    print_tree(&summaries)?;
    output::eprintln_line(&format!(
        "{} accounts, {} properties, {} views",
        summaries.len(),
        summaries.web_property_count(),
        summaries.profile_count()
    ));
    Ok(())
}

fn print_tree(summaries: &AccountSummaries) -> Result<()> {
    let mut out = output::stdout();

    for account in summaries.all() {
        out.set_color(ColorSpec::new().set_bold(true))?;
        write!(out, "{}", account.name().unwrap_or("(unnamed)"))?;
        out.reset()?;
        writeln!(out, "  [{}]", account.id)?;

        for property in account.web_properties() {
            out.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)))?;
            write!(out, "  {}", property.name().unwrap_or("(unnamed)"))?;
            out.reset()?;
            write!(out, "  [{}]", property.id)?;
            if property.is_premium() {
                out.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)))?;
                write!(out, " premium")?;
                out.reset()?;
            }
            writeln!(out)?;

            for view in property.views() {
                writeln!(out, "    {}  [{}]", view.name().unwrap_or("(unnamed)"), view.id)?;
            }
        }
    }
    Ok(())
}
