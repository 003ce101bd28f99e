//! Canonical request construction for Signature Version 4.
//!
//! ```text
//! HTTPRequestMethod\n
//! CanonicalURI\n
//! CanonicalQueryString\n
//! CanonicalHeaders\n\n
//! SignedHeaders\n
//! HashedPayload
//! ```
//!
//! Every component is normalized so that the client and the service derive
//! the same bytes from the same request.

use std::collections::BTreeMap;

use http::HeaderMap;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::error::AuthError;

/// Characters that must be percent-encoded in URI path segments and query
/// components: everything except `A-Z a-z 0-9 - _ . ~`.
pub const URI_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Collect `(lowercase-name, value)` pairs for every header accepted by
/// `include`, sorted by name. Repeated headers are joined with commas.
pub fn collect_headers(
    headers: &HeaderMap,
    include: impl Fn(&str) -> bool,
) -> Result<Vec<(String, String)>, AuthError> {
    let mut collected: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in headers {
        let name = name.as_str().trim().to_ascii_lowercase();
        if !include(&name) {
            continue;
        }
        let value = value
            .to_str()
            .map_err(|_| AuthError::InvalidHeaderValue(name.clone()))?;
        collected
            .entry(name)
            .and_modify(|existing| {
                existing.push(',');
                existing.push_str(value);
            })
            .or_insert_with(|| value.to_owned());
    }
    Ok(collected.into_iter().collect())
}

/// Build the full canonical request string from its components.
///
/// `headers` must already be sorted by lowercase name, as returned by
/// [`collect_headers`]. Every signed request targets a fixed path with a
/// query string that is already in canonical order, so both are used as
/// given; an empty path becomes `/`.
///
/// # Examples
///
/// ```
/// use rustdyn_auth::canonical::build_canonical_request;
///
/// let headers = vec![("host".to_owned(), "dynamodb.us-east-1.amazonaws.com".to_owned())];
/// let canonical = build_canonical_request(
///     "POST",
///     "/",
///     "",
///     &headers,
///     "44136fa355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a",
/// );
/// assert!(canonical.starts_with("POST\n/\n\nhost:dynamodb.us-east-1.amazonaws.com\n\nhost\n"));
/// ```
#[must_use]
pub fn build_canonical_request(
    method: &str,
    uri: &str,
    query_string: &str,
    headers: &[(String, String)],
    payload_hash: &str,
) -> String {
    let method = method.to_ascii_uppercase();
    let canonical_uri = if uri.is_empty() { "/" } else { uri };
    let canonical_headers = build_canonical_headers(headers);
    let signed_headers = build_signed_headers_string(headers);

    format!(
        "{method}\n{canonical_uri}\n{query_string}\n{canonical_headers}\n\n{signed_headers}\n{payload_hash}"
    )
}

/// Build the canonical headers block: `name:value` lines joined by `\n`.
///
/// Values are trimmed and inner runs of whitespace collapse to one space. The
/// result has no trailing newline; [`build_canonical_request`] adds it.
#[must_use]
pub fn build_canonical_headers(headers: &[(String, String)]) -> String {
    headers
        .iter()
        .map(|(name, value)| format!("{name}:{}", collapse_whitespace(value.trim())))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build the `SignedHeaders` list: lowercase names joined by `;`.
#[must_use]
pub fn build_signed_headers_string(headers: &[(String, String)]) -> String {
    headers
        .iter()
        .map(|(name, _)| name.as_str())
        .collect::<Vec<_>>()
        .join(";")
}

/// URI-encode a string using the AWS unreserved set.
#[must_use]
pub fn uri_encode(input: &str) -> String {
    utf8_percent_encode(input, URI_ENCODE_SET).to_string()
}

fn collapse_whitespace(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut prev_was_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_was_space {
                result.push(' ');
                prev_was_space = true;
            }
        } else {
            result.push(ch);
            prev_was_space = false;
        }
    }
    result
}
