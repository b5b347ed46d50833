// HTTP client for the remote analysis webhook.
//
// One POST per analysis: the validated match request is sent as JSON and the
// reply body is decoded into a `serde_json::Value` for the reconciler. No
// retries, no timeout beyond reqwest's defaults.

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::Config;
use crate::remote::payload::MatchRequest;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum RemoteError {
    /// No endpoint configured; nothing was sent.
    #[error("analysis endpoint is not configured")]
    NotConfigured,

    #[error("network error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("analysis service returned status {0}")]
    Status(u16),

    #[error("analysis service returned malformed JSON: {0}")]
    Decode(#[source] serde_json::Error),
}

impl RemoteError {
    /// Whether the caller should fall back to local analysis. False only when
    /// no request was attempted.
    pub fn is_fallback_eligible(&self) -> bool {
        !matches!(self, RemoteError::NotConfigured)
    }
}

// ---------------------------------------------------------------------------
// WebhookClient
// ---------------------------------------------------------------------------

/// Low-level client bound to one webhook URL.
pub struct WebhookClient {
    http: reqwest::Client,
    endpoint: String,
}

impl WebhookClient {
    pub fn new(endpoint: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Post the request and decode the reply body as JSON.
    pub async fn send(&self, request: &MatchRequest) -> Result<Value, RemoteError> {
        if self.endpoint.trim().is_empty() {
            return Err(RemoteError::NotConfigured);
        }

        let payload = request.to_payload();
        info!(
            endpoint = %self.endpoint,
            mode = payload.analysis_mode,
            "Sending match to analysis service"
        );

        let response = self
            .http
            .post(&self.endpoint)
            .json(&payload)
            .send()
            .await
            .map_err(RemoteError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Status(status.as_u16()));
        }

        let body = response.bytes().await.map_err(RemoteError::Transport)?;
        debug!(bytes = body.len(), %status, "analysis reply received");

        serde_json::from_slice(&body).map_err(RemoteError::Decode)
    }
}

// ---------------------------------------------------------------------------
// RemoteClient wrapper
// ---------------------------------------------------------------------------

/// Either a configured webhook client or a disabled placeholder.
pub enum RemoteClient {
    Active(WebhookClient),
    /// No endpoint configured.
    Disabled,
}

impl RemoteClient {
    /// `Active` when the config carries a non-empty endpoint, otherwise `Disabled`.
    pub fn from_config(config: &Config) -> Self {
        Self::from_endpoint(&config.remote.endpoint)
    }

    pub fn from_endpoint(endpoint: &str) -> Self {
        let endpoint = endpoint.trim();
        if endpoint.is_empty() {
            RemoteClient::Disabled
        } else {
            RemoteClient::Active(WebhookClient::new(endpoint.to_string()))
        }
    }

    pub fn is_configured(&self) -> bool {
        matches!(self, RemoteClient::Active(_))
    }

    pub async fn send(&self, request: &MatchRequest) -> Result<Value, RemoteError> {
        match self {
            RemoteClient::Active(client) => client.send(request).await,
            RemoteClient::Disabled => Err(RemoteError::NotConfigured),
        }
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
