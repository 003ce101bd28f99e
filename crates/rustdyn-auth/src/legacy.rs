//! The legacy `AWS3` header signing scheme.
//!
//! Only `host` and `x-amz-*` headers are signed. The string to sign is
//!
//! ```text
//! HTTP-Verb + "\n" +
//! URI + "\n" +
//! Query + "\n" +
//! CanonicalHeaders + "\n" +
//! Body
//! ```
//!
//! where every canonical header line is `lowercase-name:trimmed-value\n`, in
//! sorted order. The signature is
//! `Base64(HMAC-SHA256(secret, SHA256(StringToSign)))` and travels in
//!
//! ```text
//! x-amzn-authorization: AWS3 AWSAccessKeyId=<id>,Algorithm=HmacSHA256,SignedHeaders=<names>,Signature=<base64>
//! ```

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, Utc};
use hmac::{Hmac, KeyInit, Mac};
use rustdyn_core::SigningScheme;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::canonical::collect_headers;
use crate::credentials::Credentials;
use crate::error::AuthError;
use crate::signer::{RequestSigner, SignableRequest, SignedHeader};

/// Header that carries the legacy signature.
pub const AUTHORIZATION_HEADER: &str = "x-amzn-authorization";

type HmacSha256 = Hmac<Sha256>;

/// Returns `true` for header names the legacy scheme signs.
#[must_use]
pub fn is_signed_header(name: &str) -> bool {
    name == "host" || name.starts_with("x-amz-")
}

/// Signer for the `AWS3` scheme.
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacySigner;

impl LegacySigner {
    /// Canonical header lines and the `;`-joined signed header names.
    pub fn canonical_headers(
        &self,
        request: &SignableRequest<'_>,
    ) -> Result<(String, String), AuthError> {
        let headers = collect_headers(request.headers, is_signed_header)?;
        if headers.is_empty() {
            return Err(AuthError::MissingHeader("host".to_owned()));
        }

        let canonical: String = headers
            .iter()
            .map(|(name, value)| format!("{name}:{}\n", value.trim()))
            .collect();
        let signed = headers
            .iter()
            .map(|(name, _)| name.as_str())
            .collect::<Vec<_>>()
            .join(";");
        Ok((canonical, signed))
    }

    /// The string to sign for `request`.
    pub fn string_to_sign(&self, request: &SignableRequest<'_>) -> Result<String, AuthError> {
        let (canonical, _) = self.canonical_headers(request)?;
        Ok(format!(
            "{}\n{}\n{}\n{canonical}\n{}",
            request.method.to_ascii_uppercase(),
            request.uri,
            request.query,
            String::from_utf8_lossy(request.body),
        ))
    }

    /// Base64 signature of `request`.
    pub fn signature(
        &self,
        request: &SignableRequest<'_>,
        credentials: &Credentials,
    ) -> Result<String, AuthError> {
        let string_to_sign = self.string_to_sign(request)?;
        debug!(string_to_sign = %string_to_sign, "built legacy string to sign");
        Ok(generate_signature(
            &string_to_sign,
            &credentials.secret_access_key,
        ))
    }

    /// The full `x-amzn-authorization` header value.
    pub fn authorization(
        &self,
        request: &SignableRequest<'_>,
        credentials: &Credentials,
    ) -> Result<String, AuthError> {
        let (_, signed_headers) = self.canonical_headers(request)?;
        let signature = self.signature(request, credentials)?;
        Ok(format!(
            "AWS3 AWSAccessKeyId={},Algorithm=HmacSHA256,SignedHeaders={signed_headers},Signature={signature}",
            credentials.access_key_id
        ))
    }
}

impl RequestSigner for LegacySigner {
    fn scheme(&self) -> SigningScheme {
        SigningScheme::Legacy
    }

    fn date_header(&self, timestamp: DateTime<Utc>) -> String {
        timestamp.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
    }

    fn sign(
        &self,
        request: &SignableRequest<'_>,
        credentials: &Credentials,
        _timestamp: DateTime<Utc>,
    ) -> Result<SignedHeader, AuthError> {
        Ok(SignedHeader {
            name: AUTHORIZATION_HEADER,
            value: self.authorization(request, credentials)?,
        })
    }
}

/// `Base64(HMAC-SHA256(key, SHA256(string_to_sign)))`.
#[must_use]
pub fn generate_signature(string_to_sign: &str, key: &str) -> String {
    let digest = Sha256::digest(string_to_sign.as_bytes());
    let mut mac =
        HmacSha256::new_from_slice(key.as_bytes()).expect("HMAC can accept any key length");
    mac.update(&digest);
    BASE64.encode(mac.finalize().into_bytes())
}
