//! Common AWS type definitions shared across the client crates.

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// AWS Region identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct AwsRegion(String);

impl AwsRegion {
    /// Region used when none is configured.
    pub const DEFAULT: &str = "us-east-1";

    /// Create a new region.
    #[must_use]
    pub fn new(region: impl Into<String>) -> Self {
        Self(region.into())
    }

    /// Get the region as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The regional DynamoDB host name, e.g. `dynamodb.us-east-1.amazonaws.com`.
    #[must_use]
    pub fn dynamodb_host(&self) -> String {
        format!("dynamodb.{}.amazonaws.com", self.0)
    }
}

impl Default for AwsRegion {
    fn default() -> Self {
        Self(Self::DEFAULT.to_owned())
    }
}

impl fmt::Display for AwsRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which request-signing algorithm the client uses.
///
/// The service accepted the legacy `AWS3` header scheme first and later moved
/// to the scoped Signature Version 4 scheme. Neither is detected
/// automatically; the configuration picks one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub enum SigningScheme {
    /// `AWS3` HMAC-SHA256 over the canonical `host`/`x-amz-*` headers and body.
    Legacy,
    /// `AWS4-HMAC-SHA256` with a `date/region/service/aws4_request` scope.
    #[default]
    V4,
}

impl SigningScheme {
    /// Returns the configuration string for this scheme.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Legacy => "legacy",
            Self::V4 => "v4",
        }
    }
}

impl fmt::Display for SigningScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SigningScheme {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "legacy" | "aws3" | "v3" => Ok(Self::Legacy),
            "v4" | "aws4" | "sigv4" => Ok(Self::V4),
            _ => Err(ConfigError::InvalidOption {
                option: "signing_scheme",
                value: s.to_owned(),
            }),
        }
    }
}
