//! Signature Version 2 query-string signing.
//!
//! Query API services such as the token service take the signature as a
//! query parameter:
//!
//! ```text
//! StringToSign = HTTP-Verb + "\n" +
//!                Host + "\n" +
//!                Path + "\n" +
//!                CanonicalizedQueryString
//! Signature    = Base64(HMAC-SHA256(SecretKey, StringToSign))
//! ```
//!
//! The canonical query string holds the parameters sorted by name, with
//! names and values percent-encoded using the unreserved set.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use hmac::{Hmac, KeyInit, Mac};
use sha2::Sha256;
use tracing::debug;

use crate::canonical::uri_encode;

/// `SignatureMethod` parameter value.
pub const SIGNATURE_METHOD: &str = "HmacSHA256";

/// `SignatureVersion` parameter value.
pub const SIGNATURE_VERSION: &str = "2";

type HmacSha256 = Hmac<Sha256>;

/// Encode and sort `params` into the canonical query string.
///
/// # Examples
///
/// ```
/// use rustdyn_auth::sigv2::canonical_query_string;
///
/// let query = canonical_query_string(&[("b", "x y"), ("a", "1")]);
/// assert_eq!(query, "a=1&b=x%20y");
/// ```
#[must_use]
pub fn canonical_query_string<K: AsRef<str>, V: AsRef<str>>(params: &[(K, V)]) -> String {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| (uri_encode(k.as_ref()), uri_encode(v.as_ref())))
        .collect();
    encoded.sort_unstable();
    encoded
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

/// Build the SigV2 string to sign.
#[must_use]
pub fn string_to_sign(method: &str, host: &str, path: &str, canonical_query: &str) -> String {
    format!(
        "{}\n{}\n{path}\n{canonical_query}",
        method.to_ascii_uppercase(),
        host.to_ascii_lowercase()
    )
}

/// Sign `params` and return the full query string with `Signature` appended.
#[must_use]
pub fn sign_query<K: AsRef<str>, V: AsRef<str>>(
    method: &str,
    host: &str,
    path: &str,
    params: &[(K, V)],
    secret_key: &str,
) -> String {
    let canonical = canonical_query_string(params);
    let to_sign = string_to_sign(method, host, path, &canonical);
    debug!(string_to_sign = %to_sign, "built query string to sign");
    let signature = compute_signature(secret_key, &to_sign);
    format!("{canonical}&Signature={}", uri_encode(&signature))
}

/// `Base64(HMAC-SHA256(secret_key, string_to_sign))`.
#[must_use]
pub fn compute_signature(secret_key: &str, string_to_sign: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret_key.as_bytes()).expect("HMAC can accept any key length");
    mac.update(string_to_sign.as_bytes());
    BASE64.encode(mac.finalize().into_bytes())
}
