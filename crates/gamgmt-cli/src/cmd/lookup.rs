use std::path::Path;

use anyhow::{bail, Result};
use gamgmt_core::model::EntityId;
use gamgmt_core::summaries::{AccountSummaries, Entity, Selector};
use serde::Serialize;
use serde_json::Value;

use crate::args::{Cli, LookupIds};
use crate::output;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LookupOut {
    level: &'static str,
    id: EntityId,
    name: Option<String>,
    account_id: Option<EntityId>,
    property_id: Option<EntityId>,
    entity: Value,
}

pub async fn run(cli: &Cli, ids: &LookupIds, file: Option<&Path>) -> Result<()> {
    let summaries = super::load_summaries(cli, file).await?;

    let Some(entity) = resolve(&summaries, ids)? else {
        bail!("no account, property or view matches");
    };
    let out = describe(&summaries, entity)?;

    if output::is_json() {
        return output::print(&out);
    }

    println!("{} {} ({})", out.level, out.id, out.name.as_deref().unwrap_or("unnamed"));
    if let Some(p) = &out.property_id {
        println!("  property {p}");
    }
    if let Some(a) = &out.account_id {
        println!("  account {a}");
    }
    Ok(())
}

/// Ids are matched as text first. When nothing matches and every supplied id
/// is an integer, they are retried as integers.
fn resolve<'a>(summaries: &'a AccountSummaries, ids: &LookupIds) -> Result<Option<Entity<'a>>> {
    if let Some(found) = summaries.get(&selector(ids, |s| Some(EntityId::from(s))))? {
        return Ok(Some(found));
    }

    let numeric = selector(ids, |s| s.parse::<i64>().ok().map(EntityId::from));
    if numeric.supplied_keys().is_empty() {
        return Ok(None);
    }
    Ok(summaries.get(&numeric)?)
}

fn selector(ids: &LookupIds, conv: impl Fn(&str) -> Option<EntityId>) -> Selector {
    let f = |v: &Option<String>| v.as_deref().and_then(&conv);
    Selector {
        account_id: f(&ids.account_id),
        web_property_id: f(&ids.web_property_id),
        property_id: f(&ids.property_id),
        profile_id: f(&ids.profile_id),
        view_id: f(&ids.view_id),
    }
}

fn describe(summaries: &AccountSummaries, entity: Entity<'_>) -> Result<LookupOut> {
    let (account_id, property_id) = match entity {
        Entity::Account(_) => (None, None),
        Entity::WebProperty(p) => (summaries.get_account_by_property_id(&p.id).map(|a| a.id.clone()), None),
        Entity::Profile(v) => (
            summaries.get_account_by_view_id(&v.id).map(|a| a.id.clone()),
            summaries.get_property_by_view_id(&v.id).map(|p| p.id.clone()),
        ),
    };

    Ok(LookupOut {
        level: entity.level(),
        id: entity.id().clone(),
        name: entity.name().map(str::to_string),
        account_id,
        property_id,
        entity: entity.to_json()?,
    })
}
