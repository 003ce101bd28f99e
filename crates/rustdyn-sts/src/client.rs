//! The `GetSessionToken` call.

use std::fmt;

use chrono::{DateTime, Utc};
use rustdyn_auth::Credentials;
use rustdyn_auth::sigv2::{SIGNATURE_METHOD, SIGNATURE_VERSION, sign_query};
use tracing::{debug, warn};

use crate::error::StsError;
use crate::provider::CredentialsFuture;
use crate::xml::{parse_error_response, parse_session_credentials};

/// Default token-service host.
pub const DEFAULT_HOST: &str = "sts.amazonaws.com";

/// Token-service API version.
pub const API_VERSION: &str = "2011-06-15";

/// Default lifetime requested for session credentials (12 hours).
pub const DEFAULT_DURATION_SECONDS: u32 = 43_200;

/// A source of temporary credentials.
pub trait TokenService: Send + Sync + fmt::Debug {
    /// Exchange long-lived `credentials` for session credentials.
    fn get_session_token<'a>(&'a self, credentials: &'a Credentials) -> CredentialsFuture<'a>;
}

/// HTTPS client for the token service.
#[derive(Debug, Clone)]
pub struct StsClient {
    http: reqwest::Client,
    host: String,
    https: bool,
    duration_seconds: u32,
}

impl Default for StsClient {
    fn default() -> Self {
        Self::new(reqwest::Client::new())
    }
}

impl StsClient {
    /// Create a client for the public endpoint using `http`.
    #[must_use]
    pub fn new(http: reqwest::Client) -> Self {
        Self {
            http,
            host: DEFAULT_HOST.to_owned(),
            https: true,
            duration_seconds: DEFAULT_DURATION_SECONDS,
        }
    }

    /// Use a different host, for example a local emulator.
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>, https: bool) -> Self {
        self.host = host.into();
        self.https = https;
        self
    }

    /// Request credentials valid for `seconds`.
    #[must_use]
    pub fn with_duration_seconds(mut self, seconds: u32) -> Self {
        self.duration_seconds = seconds;
        self
    }

    /// The signed query string for a `GetSessionToken` request at `timestamp`.
    #[must_use]
    pub fn signed_query(&self, credentials: &Credentials, timestamp: DateTime<Utc>) -> String {
        let duration = self.duration_seconds.to_string();
        let timestamp = timestamp.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string();
        let params = [
            ("AWSAccessKeyId", credentials.access_key_id.as_str()),
            ("Action", "GetSessionToken"),
            ("DurationSeconds", duration.as_str()),
            ("SignatureMethod", SIGNATURE_METHOD),
            ("SignatureVersion", SIGNATURE_VERSION),
            ("Timestamp", timestamp.as_str()),
            ("Version", API_VERSION),
        ];
        sign_query(
            "GET",
            &self.host,
            "/",
            &params,
            &credentials.secret_access_key,
        )
    }

    /// The full request URL for a `GetSessionToken` request at `timestamp`.
    #[must_use]
    pub fn request_url(&self, credentials: &Credentials, timestamp: DateTime<Utc>) -> String {
        let scheme = if self.https { "https" } else { "http" };
        format!(
            "{scheme}://{}/?{}",
            self.host,
            self.signed_query(credentials, timestamp)
        )
    }

    async fn fetch(&self, credentials: &Credentials) -> Result<Credentials, StsError> {
        let url = self.request_url(credentials, Utc::now());
        debug!(host = %self.host, "requesting session token");

        let response = self.http.get(url).send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;
        parse_response(status, &body)
    }
}

impl TokenService for StsClient {
    fn get_session_token<'a>(&'a self, credentials: &'a Credentials) -> CredentialsFuture<'a> {
        Box::pin(self.fetch(credentials))
    }
}

/// Interpret a token-service response.
pub fn parse_response(status: u16, body: &[u8]) -> Result<Credentials, StsError> {
    if status == 200 {
        return parse_session_credentials(body);
    }
    let error = parse_error_response(body, status);
    warn!(status, error_type = %error.error_type, "token service rejected request");
    Err(StsError::Service(error))
}
