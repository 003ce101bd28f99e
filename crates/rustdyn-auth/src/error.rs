//! Error types for request signing.

/// Errors that can occur while signing an outgoing request.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// A header value is not visible ASCII and cannot be canonicalized.
    #[error("header {0} has a value that cannot be signed")]
    InvalidHeaderValue(String),

    /// A header the scheme requires is absent.
    #[error("Missing required header: {0}")]
    MissingHeader(String),

    /// The computed authorization value is not a valid header value.
    #[error("invalid authorization header value")]
    InvalidAuthHeader,
}
