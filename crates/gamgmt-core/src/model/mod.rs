//! gamgmt data models.
//!
//! Strongly-typed Rust representations of the management API records consumed
//! by the core:
//! - account summaries: `Account` → `WebProperty` → `Profile`
//! - metadata columns: `Column` with opaque `Attributes`
//! - template sources: custom metrics, custom dimensions, goals
//!
//! Models keep every attribute they do not interpret in an ordered JSON map so
//! that a decoded record serializes back to the same JSON object.
//!
//! The API uses two vocabularies for the same levels: "webProperty"/"profile"
//! and "property"/"view". Records store one canonical field and expose both
//! accessor names, so the two can never diverge.

use std::fmt;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

mod column;

pub use column::{Attributes, Column, ColumnType, TemplateSource};

/// Alias for the "property" vocabulary.
pub type Property = WebProperty;

/// Alias for the "view" vocabulary.
pub type View = Profile;

/// An entity id as it appears in the API: either an integer or a string.
///
/// Ids are compared by exact value. `EntityId::Int(1001)` and
/// `EntityId::Text("1001")` are different ids.
///
/// Integral numbers that fit `i64` (including `1001.0`) decode as `Int`; any
/// other number keeps its JSON text.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(untagged)]
pub enum EntityId {
    Int(i64),
    Text(String),
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::String(s) => Ok(Self::Text(s)),
            Value::Number(n) => Ok(n
                .as_i64()
                .or_else(|| {
                    n.as_f64()
                        .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
                        .map(|f| f as i64)
                })
                .map_or_else(|| Self::Text(n.to_string()), Self::Int)),
            other => Err(de::Error::invalid_type(
                unexpected(&other),
                &"an integer or string id",
            )),
        }
    }
}

fn unexpected(v: &Value) -> de::Unexpected<'_> {
    match v {
        Value::Null => de::Unexpected::Unit,
        Value::Bool(b) => de::Unexpected::Bool(*b),
        Value::Array(_) => de::Unexpected::Seq,
        _ => de::Unexpected::Map,
    }
}

impl EntityId {
    /// Returns true for the values treated as "not supplied" by selectors:
    /// the empty string and the integer zero.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Int(n) => *n == 0,
            Self::Text(s) => s.is_empty(),
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for EntityId {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&String> for EntityId {
    fn from(s: &String) -> Self {
        Self::Text(s.clone())
    }
}

impl From<&EntityId> for EntityId {
    fn from(id: &EntityId) -> Self {
        id.clone()
    }
}

/// Shared read access for the three hierarchy levels.
pub trait HierarchyNode {
    fn id(&self) -> &EntityId;

    /// Attributes not interpreted by the core (name, kind, level, ...).
    fn attributes(&self) -> &Map<String, Value>;

    fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes().get(key)
    }

    fn name(&self) -> Option<&str> {
        self.attribute("name").and_then(Value::as_str)
    }
}

/// Top-level account summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "AccountRecord")]
pub struct Account {
    pub id: EntityId,

    #[serde(rename = "webProperties", skip_serializing_if = "Option::is_none")]
    web_properties: Option<Vec<WebProperty>>,

    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Account {
    pub fn new(id: impl Into<EntityId>, name: impl Into<String>) -> Self {
        let mut attributes = Map::new();
        attributes.insert("name".to_string(), Value::String(name.into()));
        Self {
            id: id.into(),
            web_properties: None,
            attributes,
        }
    }

    pub fn with_web_property(mut self, property: WebProperty) -> Self {
        self.web_properties.get_or_insert_with(Vec::new).push(property);
        self
    }

    /// Web properties owned by this account (empty when the list is absent).
    pub fn web_properties(&self) -> &[WebProperty] {
        self.web_properties.as_deref().unwrap_or(&[])
    }

    /// Same sequence as [`Account::web_properties`].
    pub fn properties(&self) -> &[Property] {
        self.web_properties()
    }

    /// Returns false when the source record carried no property list at all.
    pub fn has_web_properties(&self) -> bool {
        self.web_properties.is_some()
    }
}

impl HierarchyNode for Account {
    fn id(&self) -> &EntityId {
        &self.id
    }

    fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }
}

/// Web property (a.k.a. property) summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "WebPropertyRecord")]
pub struct WebProperty {
    pub id: EntityId,

    #[serde(skip_serializing_if = "Option::is_none")]
    profiles: Option<Vec<Profile>>,

    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl WebProperty {
    pub fn new(id: impl Into<EntityId>, name: impl Into<String>) -> Self {
        let mut attributes = Map::new();
        attributes.insert("name".to_string(), Value::String(name.into()));
        Self {
            id: id.into(),
            profiles: None,
            attributes,
        }
    }

    pub fn with_profile(mut self, profile: Profile) -> Self {
        self.profiles.get_or_insert_with(Vec::new).push(profile);
        self
    }

    /// Profiles owned by this property (empty when the list is absent).
    pub fn profiles(&self) -> &[Profile] {
        self.profiles.as_deref().unwrap_or(&[])
    }

    /// Same sequence as [`WebProperty::profiles`].
    pub fn views(&self) -> &[View] {
        self.profiles()
    }

    pub fn has_profiles(&self) -> bool {
        self.profiles.is_some()
    }

    /// Property level ("STANDARD" or "PREMIUM") when reported.
    pub fn level(&self) -> Option<&str> {
        self.attribute("level").and_then(Value::as_str)
    }

    pub fn is_premium(&self) -> bool {
        self.level() == Some("PREMIUM")
    }
}

impl HierarchyNode for WebProperty {
    fn id(&self) -> &EntityId {
        &self.id
    }

    fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }
}

/// Wire shape of an account. Either child list name may appear, or both;
/// `webProperties` wins.
#[derive(Deserialize)]
struct AccountRecord {
    id: EntityId,
    #[serde(default, rename = "webProperties")]
    web_properties: Option<Vec<WebProperty>>,
    #[serde(default)]
    properties: Option<Vec<WebProperty>>,
    #[serde(flatten)]
    attributes: Map<String, Value>,
}

impl From<AccountRecord> for Account {
    fn from(r: AccountRecord) -> Self {
        Self {
            id: r.id,
            web_properties: r.web_properties.or(r.properties),
            attributes: r.attributes,
        }
    }
}

/// Wire shape of a web property; `profiles` wins over `views`.
#[derive(Deserialize)]
struct WebPropertyRecord {
    id: EntityId,
    #[serde(default)]
    profiles: Option<Vec<Profile>>,
    #[serde(default)]
    views: Option<Vec<Profile>>,
    #[serde(flatten)]
    attributes: Map<String, Value>,
}

impl From<WebPropertyRecord> for WebProperty {
    fn from(r: WebPropertyRecord) -> Self {
        Self {
            id: r.id,
            profiles: r.profiles.or(r.views),
            attributes: r.attributes,
        }
    }
}

/// Profile (a.k.a. view) summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: EntityId,

    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Profile {
    pub fn new(id: impl Into<EntityId>, name: impl Into<String>) -> Self {
        let mut attributes = Map::new();
        attributes.insert("name".to_string(), Value::String(name.into()));
        Self {
            id: id.into(),
            attributes,
        }
    }
}

impl HierarchyNode for Profile {
    fn id(&self) -> &EntityId {
        &self.id
    }

    fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }
}
