// Connection settings for the exchange backend

use crate::exchange::error::{ExchangeError, ExchangeResult};
use std::time::Duration;

/// Default backend host
pub const DEFAULT_HOST: &str = "catswords.re.kr";

/// Default URL scheme
pub const DEFAULT_PROTOCOL: &str = "https";

/// Default per-request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Where and how to reach the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Hostname, optionally with port (e.g. `catswords.re.kr`, `127.0.0.1:8080`)
    pub host: String,

    /// URL scheme (`https`, `http`, ...)
    pub protocol: String,

    /// Upper bound for a single request, connect included
    pub timeout: Duration,
}

impl ClientConfig {
    /// Create a configuration with the default timeout
    pub fn new(host: impl Into<String>, protocol: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            protocol: protocol.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Override the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Full URL for a backend path, e.g. `_/auth/authenticate`
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}://{}/{}",
            self.protocol,
            self.host,
            path.trim_start_matches('/')
        )
    }

    /// Build the HTTP client shared by the authenticator and exchange client
    pub fn http_client(&self) -> ExchangeResult<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| ExchangeError::Transport(format!("Failed to build HTTP client: {}", e)))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_HOST, DEFAULT_PROTOCOL)
    }
}
