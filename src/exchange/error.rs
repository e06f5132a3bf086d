// Error types for the exchange client

use thiserror::Error;

/// Errors that can occur while talking to the exchange backend
#[derive(Debug, Error)]
pub enum ExchangeError {
    /// Credential exchange failed (transport, status or malformed body)
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Send or receive failed (transport or non-success status)
    #[error("transport error: {0}")]
    Transport(String),

    /// Local file could not be read or written
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// Hash algorithm name is not one of md5, sha1, sha256, sha512
    #[error("unsupported hash algorithm: '{0}' (expected md5, sha1, sha256 or sha512)")]
    UnsupportedAlgorithm(String),

    /// Receive was requested without a network ID
    #[error("you must set a network ID with '--network-id [your network ID]'")]
    MissingNetworkId,

    /// No token stored and no credentials to obtain one
    #[error("could not find access token; authenticate with '--email' and '--password'")]
    MissingToken,

    /// Send was requested with neither '--message' nor '--file'
    #[error("nothing to send; set '--message' or '--file'")]
    MissingMessage,
}

impl ExchangeError {
    /// Wrap an I/O error with a short description of what was attempted
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        ExchangeError::Io {
            context: context.into(),
            source,
        }
    }

    /// Whether the error was caused by the invocation itself rather than
    /// the backend or the local filesystem
    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            ExchangeError::MissingNetworkId
                | ExchangeError::MissingToken
                | ExchangeError::MissingMessage
                | ExchangeError::UnsupportedAlgorithm(_)
        )
    }

    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        if self.is_usage() {
            2
        } else {
            1
        }
    }
}

/// Result type for exchange operations
pub type ExchangeResult<T> = Result<T, ExchangeError>;
