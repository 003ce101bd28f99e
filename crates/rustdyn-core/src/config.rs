//! Client configuration.
//!
//! Configuration is either assembled in code with [`ClientConfig::new`] and
//! the `with_*` methods, or read from environment variables with
//! [`ClientConfig::from_env`].

use crate::error::{ConfigError, ConfigResult};
use crate::types::{AwsRegion, SigningScheme};

/// Target prefix of the JSON API version this client speaks.
pub const DEFAULT_API_VERSION: &str = "DynamoDB_20111205";

/// Configuration for a DynamoDB client.
#[derive(Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    /// Long-lived access key id.
    pub access_key_id: String,
    /// Long-lived secret access key.
    pub secret_access_key: String,
    /// Region the service endpoint lives in.
    #[serde(default)]
    pub region: AwsRegion,
    /// Use `https` instead of `http`.
    #[serde(default = "default_https")]
    pub https: bool,
    /// Host (and optional port) overriding the regional endpoint.
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Prefix added to every outgoing table name and stripped from responses.
    #[serde(default)]
    pub table_name_prefix: Option<String>,
    /// Session token sent with the long-lived keys; skips the token service.
    #[serde(default)]
    pub security_token: Option<String>,
    /// Signing algorithm.
    #[serde(default)]
    pub signing_scheme: SigningScheme,
    /// Fetch temporary credentials from the token service before signing.
    #[serde(default)]
    pub session_credentials: bool,
    /// `x-amz-target` prefix, e.g. `DynamoDB_20111205`.
    #[serde(default = "default_api_version")]
    pub api_version: String,
}

fn default_https() -> bool {
    true
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_owned()
}

// Secrets stay out of logs.
impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("region", &self.region)
            .field("https", &self.https)
            .field("endpoint", &self.endpoint)
            .field("table_name_prefix", &self.table_name_prefix)
            .field("security_token", &self.security_token.as_ref().map(|_| "<redacted>"))
            .field("signing_scheme", &self.signing_scheme)
            .field("session_credentials", &self.session_credentials)
            .field("api_version", &self.api_version)
            .finish()
    }
}

impl ClientConfig {
    /// Create a configuration from long-lived credentials with default options.
    #[must_use]
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            region: AwsRegion::default(),
            https: true,
            endpoint: None,
            table_name_prefix: None,
            security_token: None,
            signing_scheme: SigningScheme::default(),
            session_credentials: false,
            api_version: default_api_version(),
        }
    }

    /// Set the region.
    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = AwsRegion::new(region);
        self
    }

    /// Select `https` (true) or plain `http` (false).
    #[must_use]
    pub fn with_https(mut self, https: bool) -> Self {
        self.https = https;
        self
    }

    /// Override the endpoint host, e.g. `localhost:8000`.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the table name prefix.
    #[must_use]
    pub fn with_table_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.table_name_prefix = Some(prefix.into());
        self
    }

    /// Attach a session token to the long-lived credentials.
    #[must_use]
    pub fn with_security_token(mut self, token: impl Into<String>) -> Self {
        self.security_token = Some(token.into());
        self
    }

    /// Select the signing scheme.
    #[must_use]
    pub fn with_signing_scheme(mut self, scheme: SigningScheme) -> Self {
        self.signing_scheme = scheme;
        self
    }

    /// Enable or disable fetching temporary credentials from the token service.
    #[must_use]
    pub fn with_session_credentials(mut self, enabled: bool) -> Self {
        self.session_credentials = enabled;
        self
    }

    /// Host the client sends requests to.
    #[must_use]
    pub fn host(&self) -> String {
        self.endpoint
            .clone()
            .unwrap_or_else(|| self.region.dynamodb_host())
    }

    /// Full endpoint URL including the scheme.
    #[must_use]
    pub fn endpoint_url(&self) -> String {
        let scheme = if self.https { "https" } else { "http" };
        format!("{scheme}://{}/", self.host())
    }

    /// Check that the required credentials are present.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.access_key_id.trim().is_empty() || self.secret_access_key.trim().is_empty() {
            return Err(ConfigError::MissingCredentials);
        }
        Ok(())
    }

    /// Load configuration from environment variables.
    ///
    /// | Variable | Field |
    /// |----------|-------|
    /// | `AWS_ACCESS_KEY_ID` | `access_key_id` |
    /// | `AWS_SECRET_ACCESS_KEY` | `secret_access_key` |
    /// | `AWS_SECURITY_TOKEN` / `AWS_SESSION_TOKEN` | `security_token` |
    /// | `AWS_REGION` / `DEFAULT_REGION` | `region` |
    /// | `DYNAMODB_ENDPOINT` | `endpoint` |
    /// | `DYNAMODB_HTTPS` | `https` |
    /// | `DYNAMODB_TABLE_PREFIX` | `table_name_prefix` |
    /// | `DYNAMODB_SIGNING_SCHEME` | `signing_scheme` |
    /// | `DYNAMODB_SESSION_CREDENTIALS` | `session_credentials` |
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ConfigResult<Self> {
        let mut config = Self::new(
            lookup("AWS_ACCESS_KEY_ID").unwrap_or_default(),
            lookup("AWS_SECRET_ACCESS_KEY").unwrap_or_default(),
        );

        if let Some(v) = lookup("AWS_SECURITY_TOKEN").or_else(|| lookup("AWS_SESSION_TOKEN")) {
            config.security_token = Some(v);
        }
        if let Some(v) = lookup("AWS_REGION").or_else(|| lookup("DEFAULT_REGION")) {
            config.region = AwsRegion::new(v);
        }
        if let Some(v) = lookup("DYNAMODB_ENDPOINT") {
            config.endpoint = Some(v);
        }
        if let Some(v) = lookup("DYNAMODB_HTTPS") {
            config.https = parse_bool("DYNAMODB_HTTPS", &v)?;
        }
        if let Some(v) = lookup("DYNAMODB_TABLE_PREFIX") {
            config.table_name_prefix = Some(v);
        }
        if let Some(v) = lookup("DYNAMODB_SIGNING_SCHEME") {
            config.signing_scheme = v.parse()?;
        }
        if let Some(v) = lookup("DYNAMODB_SESSION_CREDENTIALS") {
            config.session_credentials = parse_bool("DYNAMODB_SESSION_CREDENTIALS", &v)?;
        }

        config.validate()?;
        tracing::debug!(region = %config.region, host = %config.host(), "loaded client config from environment");
        Ok(config)
    }
}

fn parse_bool(option: &'static str, value: &str) -> ConfigResult<bool> {
    match value {
        "1" | "true" | "yes" | "TRUE" | "YES" => Ok(true),
        "0" | "false" | "no" | "FALSE" | "NO" => Ok(false),
        _ => Err(ConfigError::InvalidOption {
            option,
            value: value.to_owned(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_should_create_default_config() {
        let config = ClientConfig::new("AKID", "secret");
        assert_eq!(config.region.as_str(), "us-east-1");
        assert!(config.https);
        assert_eq!(config.api_version, "DynamoDB_20111205");
        assert_eq!(config.signing_scheme, SigningScheme::V4);
        assert_eq!(config.endpoint_url(), "https://dynamodb.us-east-1.amazonaws.com/");
    }

    #[test]
    fn test_should_reject_missing_credentials() {
        assert!(matches!(
            ClientConfig::new("", "secret").validate(),
            Err(ConfigError::MissingCredentials)
        ));
        assert!(matches!(
            ClientConfig::new("AKID", " ").validate(),
            Err(ConfigError::MissingCredentials)
        ));
    }

    #[test]
    fn test_should_prefer_endpoint_override() {
        let config = ClientConfig::new("AKID", "secret")
            .with_endpoint("localhost:8000")
            .with_https(false);
        assert_eq!(config.host(), "localhost:8000");
        assert_eq!(config.endpoint_url(), "http://localhost:8000/");
    }

    #[test]
    fn test_should_load_from_lookup() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            ("AWS_ACCESS_KEY_ID", "AKID"),
            ("AWS_SECRET_ACCESS_KEY", "secret"),
            ("AWS_SESSION_TOKEN", "token"),
            ("DEFAULT_REGION", "eu-west-1"),
            ("DYNAMODB_HTTPS", "false"),
            ("DYNAMODB_TABLE_PREFIX", "Test_"),
            ("DYNAMODB_SIGNING_SCHEME", "legacy"),
        ]))
        .unwrap();

        assert_eq!(config.security_token.as_deref(), Some("token"));
        assert_eq!(config.region.as_str(), "eu-west-1");
        assert!(!config.https);
        assert_eq!(config.table_name_prefix.as_deref(), Some("Test_"));
        assert_eq!(config.signing_scheme, SigningScheme::Legacy);
        assert!(!config.session_credentials);
    }

    #[test]
    fn test_should_fail_lookup_without_credentials() {
        let result = ClientConfig::from_lookup(lookup_from(&[("AWS_REGION", "us-west-2")]));
        assert!(matches!(result, Err(ConfigError::MissingCredentials)));
    }

    #[test]
    fn test_should_reject_invalid_bool() {
        let result = ClientConfig::from_lookup(lookup_from(&[
            ("AWS_ACCESS_KEY_ID", "AKID"),
            ("AWS_SECRET_ACCESS_KEY", "secret"),
            ("DYNAMODB_HTTPS", "maybe"),
        ]));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidOption { option: "DYNAMODB_HTTPS", .. })
        ));
    }

    #[test]
    fn test_should_redact_secrets_in_debug_output() {
        let config = ClientConfig::new("AKID", "super-secret").with_security_token("tok");
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert!(!debug.contains("tok\""));
        assert!(debug.contains("AKID"));
    }

    #[test]
    fn test_should_deserialize_camel_case_config() {
        let config: ClientConfig = serde_json::from_str(
            r#"{"accessKeyId":"AKID","secretAccessKey":"secret","tableNamePrefix":"Dev_"}"#,
        )
        .unwrap();
        assert!(config.https);
        assert_eq!(config.table_name_prefix.as_deref(), Some("Dev_"));
        assert_eq!(config.api_version, DEFAULT_API_VERSION);
    }
}
