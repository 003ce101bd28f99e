//! The signing strategy seam shared by both header schemes.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use http::HeaderMap;
use rustdyn_core::{AwsRegion, SigningScheme};

use crate::credentials::Credentials;
use crate::error::AuthError;
use crate::legacy::LegacySigner;
use crate::sigv4::V4Signer;

/// The parts of an outgoing request that enter a signature.
#[derive(Debug, Clone, Copy)]
pub struct SignableRequest<'a> {
    /// HTTP method.
    pub method: &'a str,
    /// Request path.
    pub uri: &'a str,
    /// Raw query string without the leading `?`.
    pub query: &'a str,
    /// Request headers. Names are case-insensitive.
    pub headers: &'a HeaderMap,
    /// The exact body bytes that will be sent.
    pub body: &'a [u8],
}

impl<'a> SignableRequest<'a> {
    /// A `POST /` request with an empty query, the shape of every JSON API call.
    #[must_use]
    pub fn post(headers: &'a HeaderMap, body: &'a [u8]) -> Self {
        Self {
            method: "POST",
            uri: "/",
            query: "",
            headers,
            body,
        }
    }
}

/// An authorization header produced by a signer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeader {
    /// Lowercase header name.
    pub name: &'static str,
    /// Header value.
    pub value: String,
}

/// A request-signing algorithm.
///
/// Signing is a pure function of the request, the credentials and the
/// timestamp: the same inputs always produce the same header.
pub trait RequestSigner: Send + Sync + fmt::Debug {
    /// The scheme this signer implements.
    fn scheme(&self) -> SigningScheme;

    /// The `x-amz-date` value this scheme expects for `timestamp`.
    fn date_header(&self, timestamp: DateTime<Utc>) -> String;

    /// Compute the authorization header for `request`.
    fn sign(
        &self,
        request: &SignableRequest<'_>,
        credentials: &Credentials,
        timestamp: DateTime<Utc>,
    ) -> Result<SignedHeader, AuthError>;
}

/// Build the signer for `scheme`. The v4 signer scopes signatures to `region`.
#[must_use]
pub fn signer_for(scheme: SigningScheme, region: &AwsRegion) -> Arc<dyn RequestSigner> {
    match scheme {
        SigningScheme::Legacy => Arc::new(LegacySigner),
        SigningScheme::V4 => Arc::new(V4Signer::dynamodb(region.clone())),
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_should_select_signer_by_scheme() {
        let region = AwsRegion::default();
        assert_eq!(
            signer_for(SigningScheme::Legacy, &region).scheme(),
            SigningScheme::Legacy
        );
        assert_eq!(signer_for(SigningScheme::V4, &region).scheme(), SigningScheme::V4);
    }

    #[test]
    fn test_should_format_date_header_per_scheme() {
        let ts = Utc.with_ymd_and_hms(2012, 2, 28, 2, 22, 10).unwrap();
        let region = AwsRegion::default();
        assert_eq!(
            signer_for(SigningScheme::V4, &region).date_header(ts),
            "20120228T022210Z"
        );
        assert_eq!(
            signer_for(SigningScheme::Legacy, &region).date_header(ts),
            "Tue, 28 Feb 2012 02:22:10 GMT"
        );
    }
}
