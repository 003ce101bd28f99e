//! Request signing for the rustdyn DynamoDB client.
//!
//! This crate computes the authentication headers the service checks on
//! every request. Two header schemes are supported, selected by
//! [`SigningScheme`]:
//!
//! - [`legacy`] - the `AWS3` scheme: HMAC-SHA256 over the SHA-256 digest of
//!   the canonical `host`/`x-amz-*` headers and the body, sent in
//!   `x-amzn-authorization`.
//! - [`sigv4`] - the scoped `AWS4-HMAC-SHA256` scheme, sent in
//!   `authorization`.
//!
//! The token service is authenticated with query-string signing, see
//! [`sigv2`].
//!
//! # Usage
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use rustdyn_auth::{Credentials, SignableRequest, signer_for};
//! use rustdyn_core::{AwsRegion, SigningScheme};
//!
//! let signer = signer_for(SigningScheme::V4, &AwsRegion::default());
//! let timestamp = Utc.with_ymd_and_hms(2012, 2, 28, 2, 22, 10).unwrap();
//!
//! let mut headers = http::HeaderMap::new();
//! headers.insert("host", "dynamodb.us-east-1.amazonaws.com".parse().unwrap());
//! headers.insert("x-amz-date", signer.date_header(timestamp).parse().unwrap());
//!
//! let request = SignableRequest::post(&headers, b"{}");
//! let credentials = Credentials::new("fakeKeyId", "secret");
//! let signed = signer.sign(&request, &credentials, timestamp).unwrap();
//! assert_eq!(signed.name, "authorization");
//! ```

pub mod canonical;
pub mod credentials;
pub mod error;
pub mod legacy;
pub mod signer;
pub mod sigv2;
pub mod sigv4;

pub use credentials::Credentials;
pub use error::AuthError;
pub use legacy::LegacySigner;
pub use signer::{RequestSigner, SignableRequest, SignedHeader, signer_for};
pub use sigv4::{V4Signer, hash_payload};
