//! Column metadata catalog.
//!
//! `ColumnCatalog` wraps a column list (raw from the metadata API, or the
//! output of [`expand::ColumnExpander`]) and exposes:
//! - all columns, metric columns, dimension columns (input order preserved)
//! - optional filtering by exact attribute values or by predicate
//! - attribute lookup by column id
//!
//! Columns whose `type` is neither METRIC nor DIMENSION appear only in the
//! full list.

use std::collections::HashMap;
use std::fmt;

use serde_json::{Map, Value};

use crate::errors::{MgmtError, MgmtResult};
use crate::model::{Attributes, Column, ColumnType};

pub mod expand;

/// Filter accepted by the catalog listing methods.
pub enum ColumnFilter<'f> {
    /// Every key must be present with a strictly equal JSON value.
    Attributes(Map<String, Value>),
    /// Invoked with the column attributes and the column id.
    Predicate(Box<dyn Fn(&Attributes, &str) -> bool + 'f>),
}

impl<'f> ColumnFilter<'f> {
    /// Build an attribute filter from `(key, value)` pairs.
    pub fn attributes<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Self::Attributes(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&Attributes, &str) -> bool + 'f,
    {
        Self::Predicate(Box::new(f))
    }

    pub fn accepts(&self, column: &Column) -> bool {
        match self {
            Self::Attributes(expected) => column.attributes.matches(expected),
            Self::Predicate(f) => f(&column.attributes, &column.id),
        }
    }
}

impl fmt::Debug for ColumnFilter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Attributes(m) => f.debug_tuple("Attributes").field(m).finish(),
            Self::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// Indexed, filterable column list.
#[derive(Debug, Clone)]
pub struct ColumnCatalog {
    columns: Vec<Column>,
    metrics: Vec<usize>,
    dimensions: Vec<usize>,
    ids: HashMap<String, usize>,
}

impl ColumnCatalog {
    pub fn new(columns: Vec<Column>) -> Self {
        let mut metrics = Vec::new();
        let mut dimensions = Vec::new();
        let mut ids = HashMap::with_capacity(columns.len());

        for (i, column) in columns.iter().enumerate() {
            ids.insert(column.id.clone(), i);

            match column.column_type() {
                ColumnType::Metric => metrics.push(i),
                ColumnType::Dimension => dimensions.push(i),
                ColumnType::Other => {}
            }
        }

        tracing::debug!(
            columns = columns.len(),
            metrics = metrics.len(),
            dimensions = dimensions.len(),
            "built column catalog"
        );

        Self {
            columns,
            metrics,
            dimensions,
            ids,
        }
    }

    /// Decode and wrap a raw `items` array of columns.
    pub fn from_items_json(items: Value) -> MgmtResult<Self> {
        let columns: Vec<Column> = serde_json::from_value(items)
            .map_err(|e| MgmtError::serialization(format!("failed to decode columns: {e}")))?;
        Ok(Self::new(columns))
    }

    /// The underlying column list.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// All columns, optionally filtered.
    pub fn all(&self, filter: Option<&ColumnFilter<'_>>) -> Vec<&Column> {
        self.columns
            .iter()
            .filter(|c| filter.map_or(true, |f| f.accepts(c)))
            .collect()
    }

    /// Metric columns, optionally filtered.
    pub fn all_metrics(&self, filter: Option<&ColumnFilter<'_>>) -> Vec<&Column> {
        self.select(&self.metrics, filter)
    }

    /// Dimension columns, optionally filtered.
    pub fn all_dimensions(&self, filter: Option<&ColumnFilter<'_>>) -> Vec<&Column> {
        self.select(&self.dimensions, filter)
    }

    /// Attributes of the column with the given id.
    pub fn get(&self, id: &str) -> Option<&Attributes> {
        self.ids.get(id).map(|&i| &self.columns[i].attributes)
    }

    fn select(&self, positions: &[usize], filter: Option<&ColumnFilter<'_>>) -> Vec<&Column> {
        positions
            .iter()
            .map(|&i| &self.columns[i])
            .filter(|c| filter.map_or(true, |f| f.accepts(c)))
            .collect()
    }
}
