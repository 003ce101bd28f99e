//! A retrying client for the DynamoDB `2011-12-05` JSON API.
//!
//! ```no_run
//! use rustdyn_client::{Client, options::GetItemOptions};
//! use rustdyn_core::ClientConfig;
//!
//! # async fn demo() -> Result<(), rustdyn_client::ClientError> {
//! let client = Client::new(ClientConfig::from_env()?)?;
//! let (item, _meta) = client.get_item("users", "u-1", GetItemOptions::default()).await?;
//! println!("{item:?}");
//! # Ok(())
//! # }
//! ```
//!
//! Requests flow through four layers:
//!
//! - [`Client`]: native values, table-name prefixing, composite operations.
//! - [`RetryPolicy`]: exponential backoff for retryable failures.
//! - [`RequestExecutor`]: headers, signing, status handling.
//! - [`HttpTransport`]: the network, `reqwest` by default.

pub mod client;
pub mod error;
pub mod executor;
pub mod options;
pub mod prefix;
pub mod retry;
#[cfg(test)]
pub(crate) mod testing;
pub mod transport;

pub use client::{
    Client, ClientBuilder, DEFAULT_MAX_BATCH_ROUNDS, DEFAULT_TRUNCATE_CONCURRENCY,
    MAX_BATCH_WRITE_ENTRIES,
};
pub use error::{ClientError, ClientResult};
pub use executor::RequestExecutor;
pub use prefix::TableNamePrefix;
pub use retry::RetryPolicy;
pub use transport::{HttpTransport, ReqwestTransport, TransportError};
