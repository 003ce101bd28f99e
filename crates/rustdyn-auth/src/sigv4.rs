//! AWS Signature Version 4 signing.
//!
//! 1. Build the canonical request from every header except `authorization`.
//! 2. Build the string to sign from the timestamp, the credential scope
//!    (`date/region/service/aws4_request`) and the canonical request hash.
//! 3. Derive the signing key with an HMAC-SHA256 chain over the secret key
//!    and the scope components.
//! 4. Sign the string to sign and emit
//!    `AWS4-HMAC-SHA256 Credential=<id>/<scope>, SignedHeaders=<list>, Signature=<hex>`.

use chrono::{DateTime, Utc};
use hmac::{Hmac, KeyInit, Mac};
use rustdyn_core::{AwsRegion, SigningScheme};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::canonical::{build_canonical_request, build_signed_headers_string, collect_headers};
use crate::credentials::Credentials;
use crate::error::AuthError;
use crate::signer::{RequestSigner, SignableRequest, SignedHeader};

/// The signing algorithm name.
pub const ALGORITHM: &str = "AWS4-HMAC-SHA256";

/// Service name used in the credential scope for DynamoDB.
pub const DYNAMODB_SERVICE: &str = "dynamodb";

type HmacSha256 = Hmac<Sha256>;

/// Format a timestamp as ISO 8601 basic, e.g. `20120228T022210Z`.
#[must_use]
pub fn format_amz_date(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y%m%dT%H%M%SZ").to_string()
}

/// Format the date part of the credential scope, e.g. `20120228`.
#[must_use]
pub fn format_date_stamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y%m%d").to_string()
}

/// Build the SigV4 string to sign.
///
/// ```text
/// AWS4-HMAC-SHA256\n
/// <ISO8601 timestamp>\n
/// <credential_scope>\n
/// <hex(SHA256(canonical_request))>
/// ```
#[must_use]
pub fn build_string_to_sign(
    timestamp: &str,
    credential_scope: &str,
    canonical_request_hash: &str,
) -> String {
    format!("{ALGORITHM}\n{timestamp}\n{credential_scope}\n{canonical_request_hash}")
}

/// Derive the SigV4 signing key.
///
/// ```text
/// DateKey              = HMAC-SHA256("AWS4" + secret_key, date)
/// DateRegionKey        = HMAC-SHA256(DateKey, region)
/// DateRegionServiceKey = HMAC-SHA256(DateRegionKey, service)
/// SigningKey           = HMAC-SHA256(DateRegionServiceKey, "aws4_request")
/// ```
#[must_use]
pub fn derive_signing_key(secret_key: &str, date: &str, region: &str, service: &str) -> Vec<u8> {
    let date_key = hmac_sha256(format!("AWS4{secret_key}").as_bytes(), date.as_bytes());
    let date_region_key = hmac_sha256(&date_key, region.as_bytes());
    let date_region_service_key = hmac_sha256(&date_region_key, service.as_bytes());
    hmac_sha256(&date_region_service_key, b"aws4_request")
}

/// HMAC-SHA256 `data` with `signing_key` and hex-encode the result.
#[must_use]
pub fn compute_signature(signing_key: &[u8], data: &str) -> String {
    hex::encode(hmac_sha256(signing_key, data.as_bytes()))
}

/// Hex-encoded SHA-256 of `payload`.
///
/// # Examples
///
/// ```
/// use rustdyn_auth::sigv4::hash_payload;
///
/// assert_eq!(
///     hash_payload(b""),
///     "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
/// );
/// ```
#[must_use]
pub fn hash_payload(payload: &[u8]) -> String {
    hex::encode(Sha256::digest(payload))
}

/// Signature Version 4 signer scoped to one region and service.
#[derive(Debug, Clone)]
pub struct V4Signer {
    region: AwsRegion,
    service: String,
}

impl V4Signer {
    /// Create a signer for an arbitrary service.
    #[must_use]
    pub fn new(region: AwsRegion, service: impl Into<String>) -> Self {
        Self {
            region,
            service: service.into(),
        }
    }

    /// Create a signer for the `dynamodb` service.
    #[must_use]
    pub fn dynamodb(region: AwsRegion) -> Self {
        Self::new(region, DYNAMODB_SERVICE)
    }

    /// `date/region/service/aws4_request`.
    #[must_use]
    pub fn credential_scope(&self, timestamp: DateTime<Utc>) -> String {
        format!(
            "{}/{}/{}/aws4_request",
            format_date_stamp(timestamp),
            self.region,
            self.service
        )
    }

    /// Returns the canonical request and its signed-headers list.
    pub fn canonical_request(
        &self,
        request: &SignableRequest<'_>,
    ) -> Result<(String, String), AuthError> {
        let headers = collect_headers(request.headers, |name| name != "authorization")?;
        let canonical = build_canonical_request(
            request.method,
            request.uri,
            request.query,
            &headers,
            &hash_payload(request.body),
        );
        Ok((canonical, build_signed_headers_string(&headers)))
    }

    /// The string to sign for `request` at `timestamp`.
    pub fn string_to_sign(
        &self,
        request: &SignableRequest<'_>,
        timestamp: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        let (canonical, _) = self.canonical_request(request)?;
        debug!(canonical_request = %canonical, "built canonical request");
        Ok(build_string_to_sign(
            &format_amz_date(timestamp),
            &self.credential_scope(timestamp),
            &hash_payload(canonical.as_bytes()),
        ))
    }

    /// Hex-encoded signature of `request`.
    pub fn signature(
        &self,
        request: &SignableRequest<'_>,
        credentials: &Credentials,
        timestamp: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        let string_to_sign = self.string_to_sign(request, timestamp)?;
        debug!(string_to_sign = %string_to_sign, "built string to sign");
        let signing_key = derive_signing_key(
            &credentials.secret_access_key,
            &format_date_stamp(timestamp),
            self.region.as_str(),
            &self.service,
        );
        Ok(compute_signature(&signing_key, &string_to_sign))
    }

    /// The full `authorization` header value.
    pub fn authorization(
        &self,
        request: &SignableRequest<'_>,
        credentials: &Credentials,
        timestamp: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        let (_, signed_headers) = self.canonical_request(request)?;
        let signature = self.signature(request, credentials, timestamp)?;
        Ok(format!(
            "{ALGORITHM} Credential={}/{}, SignedHeaders={signed_headers}, Signature={signature}",
            credentials.access_key_id,
            self.credential_scope(timestamp),
        ))
    }
}

impl RequestSigner for V4Signer {
    fn scheme(&self) -> SigningScheme {
        SigningScheme::V4
    }

    fn date_header(&self, timestamp: DateTime<Utc>) -> String {
        format_amz_date(timestamp)
    }

    fn sign(
        &self,
        request: &SignableRequest<'_>,
        credentials: &Credentials,
        timestamp: DateTime<Utc>,
    ) -> Result<SignedHeader, AuthError> {
        Ok(SignedHeader {
            name: "authorization",
            value: self.authorization(request, credentials, timestamp)?,
        })
    }
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can accept keys of any length");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}
