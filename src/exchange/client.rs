// Authenticated send/receive against the message collection

use crate::exchange::config::ClientConfig;
use crate::exchange::context::MessageContext;
use crate::exchange::error::{ExchangeError, ExchangeResult};
use crate::exchange::token::Token;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use tracing::{debug, info, warn};

/// Path of the message collection
pub const ITEMS_PATH: &str = "_/items/catswords_cli";

/// Default number of messages fetched by a receive
pub const DEFAULT_LIMIT: u32 = 128;

/// Scope of a receive query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkFilter {
    network_id: String,
    limit: u32,
}

impl NetworkFilter {
    /// Build a filter; an empty network ID is rejected here so no request is
    /// ever made without one
    pub fn new(network_id: impl Into<String>, limit: u32) -> ExchangeResult<Self> {
        let network_id = network_id.into();
        if network_id.trim().is_empty() {
            return Err(ExchangeError::MissingNetworkId);
        }
        Ok(Self { network_id, limit })
    }

    pub fn network_id(&self) -> &str {
        &self.network_id
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Query parameters understood by the collection endpoint
    fn query(&self) -> [(&'static str, String); 3] {
        [
            ("filter[network_id][eq]", self.network_id.clone()),
            ("limit", self.limit.to_string()),
            ("sort", "-id".to_string()),
        ]
    }
}

/// Client for the message collection
pub struct ExchangeClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl ExchangeClient {
    /// Create a client with its own HTTP client
    pub fn new(config: ClientConfig) -> ExchangeResult<Self> {
        let http = config.http_client()?;
        Ok(Self::with_client(http, config))
    }

    /// Create a client sharing an existing HTTP client
    pub fn with_client(http: reqwest::Client, config: ClientConfig) -> Self {
        Self { http, config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Publish a message. Returns the raw response body.
    pub async fn send(&self, context: &MessageContext, token: &Token) -> ExchangeResult<String> {
        let url = self.config.endpoint(ITEMS_PATH);
        info!(
            "Sending message ({} bytes) to {}",
            context.message.len(),
            self.config.host
        );
        debug!("POST {}", url);

        let request = self
            .http
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .bearer_auth(token.as_str())
            .json(context);

        let body = self.execute(request, &url).await?;
        info!("Message sent");
        Ok(body)
    }

    /// Fetch the newest messages of a network. Returns the raw response body.
    pub async fn receive(&self, filter: &NetworkFilter, token: &Token) -> ExchangeResult<String> {
        let url = self.config.endpoint(ITEMS_PATH);
        info!(
            "Receiving up to {} messages for network {}",
            filter.limit(),
            filter.network_id()
        );
        debug!("GET {} {:?}", url, filter.query());

        let request = self
            .http
            .get(&url)
            .header(ACCEPT, "application/json")
            .bearer_auth(token.as_str())
            .query(&filter.query());

        self.execute(request, &url).await
    }

    async fn execute(&self, request: reqwest::RequestBuilder, url: &str) -> ExchangeResult<String> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                warn!("Request to {} timed out", url);
            } else if e.is_connect() {
                warn!("Cannot connect to {}", self.config.host);
            }
            ExchangeError::Transport(format!("request to {} failed: {}", url, e))
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ExchangeError::Transport(format!("Failed to read response body: {}", e)))?;

        if !status.is_success() {
            warn!("{} answered {}: {}", url, status, body);
            return Err(ExchangeError::Transport(format!(
                "server answered {}: {}",
                status, body
            )));
        }

        Ok(body)
    }
}
