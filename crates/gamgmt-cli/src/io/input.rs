use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use gamgmt_core::model::{Column, TemplateSource};
use gamgmt_core::summaries::AccountSummaries;
use serde::de::DeserializeOwned;
use serde_json::Value;

pub fn read_json_file<P: AsRef<Path>>(path: P) -> Result<Value> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let v: Value = serde_json::from_str(&raw)
        .map_err(|e| anyhow!("invalid json in {}: {e}", path.display()))?;
    Ok(v)
}

/// Account summaries from a list response or a bare items array.
pub fn load_summaries(path: &Path) -> Result<AccountSummaries> {
    let v = read_json_file(path)?;
    AccountSummaries::from_response_json(v).with_context(|| format!("decoding {}", path.display()))
}

pub fn load_columns(path: &Path) -> Result<Vec<Column>> {
    load_items(path)
}

/// Custom metrics, custom dimensions or goals. A missing file means none.
pub fn load_sources(path: Option<&Path>) -> Result<Vec<TemplateSource>> {
    match path {
        Some(p) => load_items(p),
        None => Ok(Vec::new()),
    }
}

fn load_items<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let v = read_json_file(path)?;
    let items = match v {
        Value::Array(_) => v,
        Value::Object(mut obj) => obj.remove("items").unwrap_or(Value::Array(Vec::new())),
        other => return Err(anyhow!("{}: expected an object or array, got {other}", path.display())),
    };
    serde_json::from_value(items).with_context(|| format!("decoding items in {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn items_from_object_or_array() {
        let mut obj = tempfile::NamedTempFile::new().unwrap();
        write!(obj, r#"{{"items": [{{"id": "1", "name": "Signup"}}]}}"#).unwrap();
        let goals = load_sources(Some(obj.path())).unwrap();
        assert_eq!(goals[0].name, "Signup");

        let mut arr = tempfile::NamedTempFile::new().unwrap();
        write!(arr, r#"[{{"id": "ga:users", "attributes": {{"type": "METRIC"}}}}]"#).unwrap();
        let cols = load_columns(arr.path()).unwrap();
        assert_eq!(cols[0].id, "ga:users");

        assert!(load_sources(None).unwrap().is_empty());
    }

    #[test]
    fn rejects_scalars() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, "42").unwrap();
        assert!(load_columns(f.path()).is_err());
    }
}
