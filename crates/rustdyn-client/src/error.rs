//! Client errors.

use std::time::Duration;

use rustdyn_auth::AuthError;
use rustdyn_core::ConfigError;
use rustdyn_model::types::BatchWriteRequestItems;
use rustdyn_model::{AmazonError, MarshalError};
use rustdyn_sts::StsError;

use crate::transport::TransportError;

/// Every way a client call can fail.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The configuration is incomplete.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A native value could not be converted to or from its wire form.
    #[error(transparent)]
    Marshal(#[from] MarshalError),

    /// The request could not be signed.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// The request never produced a response.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The service answered with an error.
    #[error(transparent)]
    Service(#[from] AmazonError),

    /// Session credentials could not be obtained.
    #[error("failed to obtain credentials: {0}")]
    Credentials(#[from] StsError),

    /// A request or response body is not the expected JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The request could not be assembled.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A successful response lacks a field the operation needs.
    #[error("malformed response: {0}")]
    MalformedResponse(&'static str),

    /// Every attempt failed with a retryable error.
    #[error("gave up after {attempts} attempts: {last}")]
    RetryExhausted {
        /// Attempts made.
        attempts: u32,
        /// The error of the final attempt.
        #[source]
        last: Box<ClientError>,
    },

    /// Batch writes were still unprocessed after the allowed rounds.
    #[error("batch write left items unprocessed after {rounds} rounds")]
    BatchWriteNotConverged {
        /// Rounds sent.
        rounds: usize,
        /// Writes the service never accepted.
        unprocessed: BatchWriteRequestItems,
    },

    /// A table did not reach the awaited state in time.
    #[error("table {table} did not reach the expected state after {polls} polls")]
    TableWaitTimeout {
        /// Table name.
        table: String,
        /// Polls made.
        polls: u32,
    },

    /// The call did not finish within its deadline.
    #[error("deadline of {0:?} exceeded")]
    DeadlineExceeded(Duration),
}

impl ClientError {
    /// Returns `true` if repeating the same request may succeed: retryable
    /// service errors and transport failures, including those raised while
    /// fetching session credentials.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Service(err) | Self::Credentials(StsError::Service(err)) => err.is_retryable(),
            Self::Transport(_) | Self::Credentials(StsError::Http(_)) => true,
            _ => false,
        }
    }

    /// The service error behind this error, looking through retry exhaustion.
    #[must_use]
    pub fn service_error(&self) -> Option<&AmazonError> {
        match self {
            Self::Service(err) => Some(err),
            Self::RetryExhausted { last, .. } => last.service_error(),
            _ => None,
        }
    }

    /// Returns `true` if the service reported a missing table.
    #[must_use]
    pub fn is_resource_not_found(&self) -> bool {
        self.service_error()
            .is_some_and(AmazonError::is_resource_not_found)
    }
}

/// Result alias for client calls.
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_classify_retryable_errors() {
        let throttled = ClientError::Service(AmazonError::new(
            Some("com.amazonaws.dynamodb.v20111205#ProvisionedThroughputExceededException"),
            "slow down",
            400,
        ));
        assert!(throttled.is_retryable());

        let invalid = ClientError::Service(AmazonError::new(
            Some("com.amazon.coral.validate#ValidationException"),
            "bad",
            400,
        ));
        assert!(!invalid.is_retryable());

        assert!(ClientError::Transport(TransportError::new("connection reset")).is_retryable());
        assert!(!ClientError::Marshal(MarshalError::InvalidKey("x".to_owned())).is_retryable());
        assert!(!ClientError::Config(ConfigError::MissingCredentials).is_retryable());
    }

    #[test]
    fn test_should_classify_credential_failures() {
        let unavailable = ClientError::Credentials(StsError::Service(AmazonError::new(
            Some("InternalFailure"),
            "try again",
            500,
        )));
        assert!(unavailable.is_retryable());

        let rejected = ClientError::Credentials(StsError::Service(AmazonError::new(
            Some("InvalidClientTokenId"),
            "bad key",
            403,
        )));
        assert!(!rejected.is_retryable());
        assert!(!ClientError::Credentials(StsError::MissingElement("Credentials")).is_retryable());
    }

    #[test]
    fn test_should_find_service_error_through_exhaustion() {
        let err = ClientError::RetryExhausted {
            attempts: 10,
            last: Box::new(ClientError::Service(AmazonError::new(
                Some("x#ResourceNotFoundException"),
                "gone",
                400,
            ))),
        };
        assert!(err.is_resource_not_found());
        assert!(!err.is_retryable());
    }
}
