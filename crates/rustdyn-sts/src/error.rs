//! Token-service errors.

use rustdyn_model::AmazonError;

/// Errors raised while obtaining credentials.
#[derive(Debug, thiserror::Error)]
pub enum StsError {
    /// The token service answered with an error document.
    #[error(transparent)]
    Service(#[from] AmazonError),

    /// The request could not be sent or the response could not be read.
    #[error("token service request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body is not well-formed XML.
    #[error("XML processing error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// A required element is missing from the response.
    #[error("missing required XML element: {0}")]
    MissingElement(&'static str),

    /// An element holds a value that cannot be parsed.
    #[error("failed to parse value: {0}")]
    Parse(String),
}
