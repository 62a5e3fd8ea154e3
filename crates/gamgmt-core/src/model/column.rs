//! Metadata column models.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::EntityId;

/// Attribute keys interpreted by the core.
pub mod keys {
    pub const TYPE: &str = "type";
    pub const UI_NAME: &str = "uiName";
    pub const MIN_TEMPLATE_INDEX: &str = "minTemplateIndex";
    pub const MAX_TEMPLATE_INDEX: &str = "maxTemplateIndex";
    pub const PREMIUM_MIN_TEMPLATE_INDEX: &str = "premiumMinTemplateIndex";
    pub const PREMIUM_MAX_TEMPLATE_INDEX: &str = "premiumMaxTemplateIndex";
}

/// Column kind derived from the `type` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Metric,
    Dimension,
    Other,
}

impl ColumnType {
    pub fn parse(s: &str) -> Self {
        match s {
            "METRIC" => Self::Metric,
            "DIMENSION" => Self::Dimension,
            _ => Self::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Metric => "METRIC",
            Self::Dimension => "DIMENSION",
            Self::Other => "OTHER",
        }
    }
}

/// Ordered attribute map of a column.
///
/// Values are kept as raw JSON; template bounds arrive as strings (`"1"`)
/// from the API but numbers are accepted too.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes(Map<String, Value>);

impl Attributes {
    pub fn new() -> Self {
        Self(Map::new())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn column_type(&self) -> ColumnType {
        self.get(keys::TYPE)
            .and_then(Value::as_str)
            .map(ColumnType::parse)
            .unwrap_or(ColumnType::Other)
    }

    pub fn ui_name(&self) -> Option<&str> {
        self.get(keys::UI_NAME).and_then(Value::as_str)
    }

    pub fn set_ui_name(&mut self, name: impl Into<String>) {
        self.insert(keys::UI_NAME, Value::String(name.into()));
    }

    /// True when `minTemplateIndex` carries a non-empty value.
    pub fn has_template_bounds(&self) -> bool {
        self.get(keys::MIN_TEMPLATE_INDEX).is_some_and(is_present)
    }

    /// True when `premiumMinTemplateIndex` carries a non-empty value.
    pub fn has_premium_bounds(&self) -> bool {
        self.get(keys::PREMIUM_MIN_TEMPLATE_INDEX).is_some_and(is_present)
    }

    /// Standard `(min, max)` template bounds, if both parse as integers.
    pub fn template_bounds(&self) -> Option<(i64, i64)> {
        Some((
            self.template_index(keys::MIN_TEMPLATE_INDEX)?,
            self.template_index(keys::MAX_TEMPLATE_INDEX)?,
        ))
    }

    /// Premium `(min, max)` template bounds, if both parse as integers.
    pub fn premium_template_bounds(&self) -> Option<(i64, i64)> {
        Some((
            self.template_index(keys::PREMIUM_MIN_TEMPLATE_INDEX)?,
            self.template_index(keys::PREMIUM_MAX_TEMPLATE_INDEX)?,
        ))
    }

    fn template_index(&self, key: &str) -> Option<i64> {
        match self.get(key)? {
            Value::String(s) => s.trim().parse().ok(),
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
            _ => None,
        }
    }

    /// True when every `(key, value)` of `expected` is present and strictly equal.
    pub fn matches(&self, expected: &Map<String, Value>) -> bool {
        expected.iter().all(|(k, v)| self.0.get(k) == Some(v))
    }
}

impl From<Map<String, Value>> for Attributes {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

fn is_present(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64() != Some(0.0),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// A metadata column (metric or dimension definition).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub id: String,

    #[serde(default)]
    pub attributes: Attributes,

    /// Record-level fields other than `id`/`attributes` (e.g. `kind`).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Column {
    pub fn new(id: impl Into<String>, attributes: Attributes) -> Self {
        Self {
            id: id.into(),
            attributes,
            extra: Map::new(),
        }
    }

    pub fn column_type(&self) -> ColumnType {
        self.attributes.column_type()
    }
}

/// A concrete entity that replaces a templated column: custom metric,
/// custom dimension, or goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateSource {
    pub id: EntityId,

    #[serde(default)]
    pub name: String,

    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl TemplateSource {
    pub fn new(id: impl Into<EntityId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            attributes: Map::new(),
        }
    }
}
