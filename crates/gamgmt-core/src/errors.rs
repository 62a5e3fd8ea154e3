//! Error types for gamgmt-core.
//!
//! Lookups that miss return `None`; the variants here are reserved for caller
//! mistakes and undecodable input.

use thiserror::Error;

/// Result alias used across the core crate.
pub type MgmtResult<T> = Result<T, MgmtError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MgmtError {
    /// More than one selector key carried a value.
    #[error(
        "get() only accepts a single selector key: either \"accountId\", \"webPropertyId\", \
         \"propertyId\", \"profileId\" or \"viewId\" (got {})",
        .keys.join(", ")
    )]
    AmbiguousSelector { keys: Vec<&'static str> },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl MgmtError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }
}

impl From<serde_json::Error> for MgmtError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}
