//! gamgmt-core
//!
//! Core primitives for gamgmt:
//! - Account summary models (account → web property → profile)
//! - Parent-aware id indexes over the account hierarchy
//! - Column metadata models and templated column expansion
//! - Filterable column catalogs
//!
//! The core crate does not do network or filesystem I/O. Higher-level crates
//! fetch raw JSON and pass fully materialized values in.

pub mod config;
pub mod errors;
pub mod metadata;
pub mod model;
pub mod summaries;

pub use crate::errors::{MgmtError, MgmtResult};

/// Default template conventions used by the metadata API.
pub mod defaults {
    /// Placeholder token embedded in templated column ids and names.
    pub const PLACEHOLDER: &str = "XX";
    /// Generic custom metric template column.
    pub const CUSTOM_METRIC_TEMPLATE: &str = "ga:metricXX";
    /// Generic custom dimension template column.
    pub const CUSTOM_DIMENSION_TEMPLATE: &str = "ga:dimensionXX";
    /// Case-insensitive substring marking goal template columns.
    pub const GOAL_PATTERN: &str = "goal";
}

/// Convenience re-exports.
pub mod prelude {
    pub use crate::config::ExpansionConfig;
    pub use crate::metadata::expand::{populate_columns, ColumnExpander, ExpansionContext, ExpansionRule};
    pub use crate::metadata::{ColumnCatalog, ColumnFilter};
    pub use crate::model::{
        Account, Attributes, Column, ColumnType, EntityId, Profile, Property, TemplateSource, View,
        WebProperty,
    };
    pub use crate::summaries::{AccountSummaries, Entity, Selector};
    pub use crate::{MgmtError, MgmtResult};
}
