//! Service and marshalling errors.
//!
//! A non-200 DynamoDB response carries a JSON body with a `__type` field
//! holding the fully-qualified error type
//! (`com.amazonaws.dynamodb.v20111205#ResourceNotFoundException`) and a
//! `message`. The token service reports the same information in XML.

use std::fmt;

use serde::Deserialize;

/// Well-known DynamoDB and token-service error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorCode {
    /// Table already exists or is being modified.
    ResourceInUseException,
    /// Table not found.
    ResourceNotFoundException,
    /// Expected-value check failed.
    ConditionalCheckFailedException,
    /// Provisioned throughput exceeded.
    ProvisionedThroughputExceededException,
    /// Request throttled.
    Throttling,
    /// Too many tables or capacity changes.
    LimitExceededException,
    /// Validation error.
    ValidationException,
    /// Malformed request body.
    SerializationException,
    /// Internal server error.
    InternalServerError,
    /// Access denied.
    AccessDeniedException,
    /// Unknown access key.
    UnrecognizedClientException,
    /// Signature mismatch or malformed authorization header.
    IncompleteSignatureException,
    /// Session token expired.
    ExpiredTokenException,
}

impl ErrorCode {
    /// Returns the short error code string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ResourceInUseException => "ResourceInUseException",
            Self::ResourceNotFoundException => "ResourceNotFoundException",
            Self::ConditionalCheckFailedException => "ConditionalCheckFailedException",
            Self::ProvisionedThroughputExceededException => {
                "ProvisionedThroughputExceededException"
            }
            Self::Throttling => "Throttling",
            Self::LimitExceededException => "LimitExceededException",
            Self::ValidationException => "ValidationException",
            Self::SerializationException => "SerializationException",
            Self::InternalServerError => "InternalServerError",
            Self::AccessDeniedException => "AccessDeniedException",
            Self::UnrecognizedClientException => "UnrecognizedClientException",
            Self::IncompleteSignatureException => "IncompleteSignatureException",
            Self::ExpiredTokenException => "ExpiredTokenException",
        }
    }

    /// Parse a short error code string.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "ResourceInUseException" => Some(Self::ResourceInUseException),
            "ResourceNotFoundException" => Some(Self::ResourceNotFoundException),
            "ConditionalCheckFailedException" => Some(Self::ConditionalCheckFailedException),
            "ProvisionedThroughputExceededException" => {
                Some(Self::ProvisionedThroughputExceededException)
            }
            "Throttling" => Some(Self::Throttling),
            "LimitExceededException" => Some(Self::LimitExceededException),
            "ValidationException" => Some(Self::ValidationException),
            "SerializationException" => Some(Self::SerializationException),
            "InternalServerError" => Some(Self::InternalServerError),
            "AccessDeniedException" => Some(Self::AccessDeniedException),
            "UnrecognizedClientException" => Some(Self::UnrecognizedClientException),
            "IncompleteSignatureException" => Some(Self::IncompleteSignatureException),
            "ExpiredTokenException" => Some(Self::ExpiredTokenException),
            _ => None,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// JSON body of a DynamoDB error response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    /// Fully-qualified error type.
    #[serde(rename = "__type", default)]
    pub error_type: Option<String>,
    /// Human-readable message.
    #[serde(default)]
    pub message: Option<String>,
    /// The same message as spelled by some errors.
    #[serde(rename = "Message", default)]
    pub capitalized_message: Option<String>,
}

impl ErrorBody {
    /// The message under either spelling, preferring `message`.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message
            .as_deref()
            .or(self.capitalized_message.as_deref())
    }
}

/// A structured error returned by an AWS service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmazonError {
    /// The part of `__type` before `#`, or `"Unknown"`.
    pub service_name: String,
    /// The part of `__type` after the last `#`, or `"UnknownError"`.
    pub error_type: String,
    /// Human-readable message.
    pub message: String,
    /// HTTP status of the response.
    pub status_code: u16,
    /// The action that failed, when known.
    pub action: Option<String>,
}

impl AmazonError {
    /// Build an error from a raw `__type` string such as
    /// `com.amazonaws.dynamodb.v20111205#ResourceNotFoundException`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rustdyn_model::AmazonError;
    ///
    /// let err = AmazonError::new(
    ///     Some("com.amazonaws.dynamodb.v20111205#ProvisionedThroughputExceededException"),
    ///     "slow down",
    ///     400,
    /// );
    /// assert_eq!(err.service_name, "com.amazonaws.dynamodb.v20111205");
    /// assert_eq!(err.error_type, "ProvisionedThroughputExceededException");
    /// assert!(err.is_retryable());
    /// ```
    #[must_use]
    pub fn new(raw_type: Option<&str>, message: impl Into<String>, status_code: u16) -> Self {
        let (service_name, error_type) = match raw_type.filter(|t| !t.is_empty()) {
            Some(raw) => match raw.rsplit_once('#') {
                Some((prefix, ty)) => {
                    let service = prefix
                        .rsplit('#')
                        .next()
                        .filter(|s| !s.is_empty())
                        .unwrap_or("Unknown");
                    (service.to_owned(), ty.to_owned())
                }
                None => ("Unknown".to_owned(), raw.to_owned()),
            },
            None => ("Unknown".to_owned(), "UnknownError".to_owned()),
        };
        let error_type = if error_type.is_empty() {
            "UnknownError".to_owned()
        } else {
            error_type
        };

        Self {
            service_name,
            error_type,
            message: message.into(),
            status_code,
            action: None,
        }
    }

    /// Build an error from a DynamoDB JSON error body.
    #[must_use]
    pub fn from_body(body: &ErrorBody, status_code: u16) -> Self {
        Self::new(
            body.error_type.as_deref(),
            body.message().unwrap_or_default(),
            status_code,
        )
    }

    /// Attach the action that failed.
    #[must_use]
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    /// The well-known code, when the type is one the client recognizes.
    #[must_use]
    pub fn code(&self) -> Option<ErrorCode> {
        ErrorCode::from_name(&self.error_type)
    }

    /// Returns `true` if the request may succeed when repeated unchanged:
    /// server errors (500) and throughput throttling.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        self.status_code == 500
            || matches!(
                self.code(),
                Some(ErrorCode::ProvisionedThroughputExceededException | ErrorCode::Throttling)
            )
    }

    /// Returns `true` if the error reports a missing table.
    #[must_use]
    pub fn is_resource_not_found(&self) -> bool {
        self.code() == Some(ErrorCode::ResourceNotFoundException)
    }
}

impl fmt::Display for AmazonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AmazonError - {} {} {}: {}",
            self.action.as_deref().unwrap_or("undefined"),
            self.status_code,
            self.error_type,
            self.message
        )
    }
}

impl std::error::Error for AmazonError {}

/// Errors raised while converting between native and wire values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MarshalError {
    /// The value kind or wire tag has no counterpart on the other side.
    #[error("Unsupported Data type: {0}")]
    UnsupportedType(String),
    /// A key value is not a non-empty string or number.
    #[error("invalid key: {0}")]
    InvalidKey(String),
    /// A wire number could not be parsed.
    #[error("invalid number: {0:?}")]
    InvalidNumber(String),
    /// A float is NaN or infinite and cannot be stored as a number.
    #[error("non-finite number: {0}")]
    NonFiniteNumber(String),
    /// An update action that needs a value was given an empty one.
    #[error("update of attribute {0} requires a non-empty value")]
    EmptyUpdateValue(String),
}
