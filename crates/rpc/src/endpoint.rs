//! HTTP JSON-RPC endpoint.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use corelib::{CallRequest, ConfigurationError, GovernanceConfig, ReadEndpoint, RemoteReadError};
use reqwest::{Client, Url};
use serde_json::Value;
use tracing::trace;

use crate::protocol::{decode_data, RpcRequest, RpcResponse};

/// Bound on a single HTTP round trip.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// `ReadEndpoint` backed by a JSON-RPC node over HTTP(S).
#[derive(Debug)]
pub struct HttpEndpoint {
    url: Url,
    client: Client,
    timeout: Duration,
    next_id: AtomicU64,
}

impl HttpEndpoint {
    /// Validate `url` and build the HTTP client.
    ///
    /// A malformed or non-HTTP URL is a `ConfigurationError`.
    pub fn new(url: &str, timeout: Duration) -> Result<Self, ConfigurationError> {
        let malformed = |reason: String| ConfigurationError::MalformedEndpoint {
            value: url.to_string(),
            reason,
        };
        let parsed = Url::parse(url.trim()).map_err(|e| malformed(e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(malformed(format!("unsupported scheme `{}`", parsed.scheme())));
        }
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| malformed(e.to_string()))?;

        Ok(Self {
            url: parsed,
            client,
            timeout,
            next_id: AtomicU64::new(1),
        })
    }

    pub fn from_config(config: &GovernanceConfig) -> Result<Self, ConfigurationError> {
        Self::new(config.gateway(), DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Send one JSON-RPC request and return its `result` member.
    pub async fn request(&self, method: &str, params: Value) -> Result<Value, RemoteReadError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.send(&RpcRequest::new(id, method, params)).await
    }

    async fn send(&self, body: &RpcRequest<'_>) -> Result<Value, RemoteReadError> {
        trace!(id = body.id, method = body.method, url = %self.url, "rpc request");

        let response = self
            .client
            .post(self.url.clone())
            .json(body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(RemoteReadError::Transport(format!(
                "HTTP {}: {}",
                status,
                text.trim()
            )));
        }

        let envelope: RpcResponse = response
            .json()
            .await
            .map_err(|e| RemoteReadError::Decode(format!("invalid JSON-RPC response: {}", e)))?;
        envelope.into_result(body.id)
    }

    fn transport_error(&self, error: reqwest::Error) -> RemoteReadError {
        if error.is_timeout() {
            RemoteReadError::Timeout(self.timeout)
        } else {
            RemoteReadError::Transport(error.to_string())
        }
    }
}

#[async_trait]
impl ReadEndpoint for HttpEndpoint {
    async fn call(&self, request: CallRequest) -> Result<Bytes, RemoteReadError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let result = self.send(&RpcRequest::eth_call(id, &request)).await?;
        decode_data(&result)
    }

    fn describe(&self) -> String {
        self.url.to_string()
    }
}
