//! Metadata and management request paths, cache keys and response decoding.

use std::fmt::Display;

use gamgmt_core::model::{Column, TemplateSource};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ClientError, ClientResult};

pub const COLUMNS_PATH: &str = "/analytics/v3/metadata/ga/columns";
pub const COLUMNS_CACHE_KEY: &str = "columns";
pub const REPORT_TYPE: &str = "ga";

pub fn custom_metrics_path(account_id: impl Display, property_id: impl Display) -> String {
    format!("/analytics/v3/management/accounts/{account_id}/webproperties/{property_id}/customMetrics")
}

pub fn custom_dimensions_path(account_id: impl Display, property_id: impl Display) -> String {
    format!("/analytics/v3/management/accounts/{account_id}/webproperties/{property_id}/customDimensions")
}

pub fn goals_path(account_id: impl Display, property_id: impl Display, view_id: impl Display) -> String {
    format!("/analytics/v3/management/accounts/{account_id}/webproperties/{property_id}/profiles/{view_id}/goals")
}

pub fn custom_metrics_key(account_id: impl Display, property_id: impl Display) -> String {
    format!("customMetrics:{account_id}:{property_id}")
}

pub fn custom_dimensions_key(account_id: impl Display, property_id: impl Display) -> String {
    format!("customDimensions:{account_id}:{property_id}")
}

pub fn goals_key(account_id: impl Display, property_id: impl Display, view_id: impl Display) -> String {
    format!("goals:{account_id}:{property_id}:{view_id}")
}

/// Decode the `items` of a columns response. A missing list is an error.
pub fn columns_from_response(mut resp: Value) -> ClientResult<Vec<Column>> {
    match resp.get_mut("items").map(Value::take) {
        Some(items) => decode_items(items),
        None => Err(ClientError::UnexpectedResponse(
            "columns response has no items".into(),
        )),
    }
}

/// Decode custom metrics, custom dimensions or goals. A property without any
/// yields an empty list.
pub fn sources_from_response(mut resp: Value) -> ClientResult<Vec<TemplateSource>> {
    match resp.get_mut("items").map(Value::take) {
        Some(items) => decode_items(items),
        None => Ok(Vec::new()),
    }
}

fn decode_items<T: DeserializeOwned>(items: Value) -> ClientResult<Vec<T>> {
    Ok(serde_json::from_value(items)?)
}
