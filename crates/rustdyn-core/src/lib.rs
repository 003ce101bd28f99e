//! Configuration and shared types for the rustdyn DynamoDB client.
//!
//! This crate holds the pieces every other rustdyn crate needs: the client
//! configuration (credentials, region, transport and signing choices), the
//! region type and the configuration error.

mod config;
mod error;
mod types;

pub use config::{ClientConfig, DEFAULT_API_VERSION};
pub use error::{ConfigError, ConfigResult};
pub use types::{AwsRegion, SigningScheme};
