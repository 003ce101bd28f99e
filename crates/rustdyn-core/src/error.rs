//! Error types for client configuration.

/// Errors raised while building or validating a [`crate::ClientConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The access key id or secret access key is missing.
    #[error("You must set the AWS credentials: accessKeyId + secretAccessKey")]
    MissingCredentials,

    /// An option carries a value that cannot be interpreted.
    #[error("invalid value for {option}: {value}")]
    InvalidOption {
        /// The option (or environment variable) name.
        option: &'static str,
        /// The rejected value.
        value: String,
    },
}

/// Convenience result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
