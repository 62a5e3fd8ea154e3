//! gamgmt-client
//!
//! Async client for the analytics management and metadata APIs.
//!
//! It includes:
//! - a transport seam (`ManagementTransport`) with a reqwest implementation
//! - paginated account summary retrieval
//! - memoized requests keyed the same way for every caller
//! - account-specific column metadata (custom metrics, dimensions, goals)
//!
//! Authentication is out of scope: callers supply a ready bearer token.

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod metadata;
pub mod summaries;
pub mod transport;

pub use client::ManagementClient;
pub use config::{validate_config, ClientConfig};
pub use error::{ClientError, ClientResult};
pub use transport::{HttpTransport, ManagementTransport};
