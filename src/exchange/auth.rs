// Credential exchange against the backend's auth endpoint

use crate::exchange::config::ClientConfig;
use crate::exchange::error::{ExchangeError, ExchangeResult};
use crate::exchange::token::Token;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

/// Path of the authentication endpoint
pub const AUTH_PATH: &str = "_/auth/authenticate";

/// User credentials, used once per authentication call
#[derive(Clone, Serialize)]
pub struct Credential {
    pub email: String,
    pub password: String,
}

impl Credential {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct AuthToken {
    token: String,
}

/// Successful response of the auth endpoint
#[derive(Debug, Deserialize)]
struct AuthSuccess {
    data: AuthToken,
    #[serde(default)]
    #[allow(dead_code)]
    public: bool,
}

/// Exchanges credentials for a bearer token
pub struct Authenticator {
    http: reqwest::Client,
    config: ClientConfig,
}

impl Authenticator {
    /// Create an authenticator with its own HTTP client
    pub fn new(config: ClientConfig) -> ExchangeResult<Self> {
        let http = config.http_client()?;
        Ok(Self::with_client(http, config))
    }

    /// Create an authenticator sharing an existing HTTP client
    pub fn with_client(http: reqwest::Client, config: ClientConfig) -> Self {
        Self { http, config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// POST the credentials and return the issued token.
    ///
    /// Every failure (unreachable host, non-2xx status, unexpected body)
    /// surfaces as [`ExchangeError::Auth`]; the cause is only told apart in
    /// the logs. Persisting the token is left to the caller.
    pub async fn authenticate(&self, credential: &Credential) -> ExchangeResult<Token> {
        let url = self.config.endpoint(AUTH_PATH);
        info!("Authenticating {} against {}", credential.email, self.config.host);
        debug!("POST {}", url);

        let response = self
            .http
            .post(&url)
            .json(credential)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    warn!("Auth request timed out: {}", e);
                } else if e.is_connect() {
                    warn!("Cannot connect to {}: {}", self.config.host, e);
                } else {
                    warn!("Auth request failed: {}", e);
                }
                ExchangeError::Auth(format!("request to {} failed: {}", url, e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Auth endpoint answered {}: {}", status, body);
            return Err(ExchangeError::Auth(format!("server answered {}", status)));
        }

        let success: AuthSuccess = response.json().await.map_err(|e| {
            warn!("Malformed auth response: {}", e);
            ExchangeError::Auth(format!("malformed response: {}", e))
        })?;

        let token = Token::new(success.data.token).ok_or_else(|| {
            warn!("Auth response carried an empty token");
            ExchangeError::Auth("server returned an empty token".to_string())
        })?;

        info!("Authenticated {}", credential.email);
        Ok(token)
    }
}
