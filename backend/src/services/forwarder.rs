//! Relay of analysis requests to the external backend.
//!
//! The relay is stateless: [`forward`] sends one request through an
//! [`AnalysisBackend`] and classifies the outcome. A 2xx reply is passed
//! through untouched; anything else becomes a [`RelayError`] that the HTTP
//! layer renders as `{ "error": ..., "details": ... }`.

use std::time::Duration;

use async_trait::async_trait;
use log::{info, warn};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::models::RelayRequest;

/// Path appended to the backend base URL.
pub const PROCESS_CSV_PATH: &str = "/process-csv";

/// Base URL used when none is configured.
pub const DEFAULT_BACKEND_URL: &str = "https://tower-jumps-backend-production.up.railway.app";

/// Error label for replies where the backend signalled a failure.
pub const BACKEND_FAILURE: &str = "Failed to process CSV";

/// Error label for transport and unexpected failures.
pub const INTERNAL_FAILURE: &str = "Internal Server Error";

/// Status and JSON body of a backend reply.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendReply {
    pub status: u16,
    pub body: Value,
}

impl BackendReply {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The backend could not be reached or answered with something unreadable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct TransportError(pub String);

/// Something that can run the CSV analysis.
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    async fn process_csv(&self, request: &RelayRequest) -> Result<BackendReply, TransportError>;

    /// Human-readable location of the backend, for logs and health output.
    fn describe(&self) -> String;
}

/// Failure of a relayed call.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RelayError {
    /// The backend answered with a non-2xx status.
    #[error("Backend responded with status {status}")]
    Backend { status: u16, details: Value },

    /// The backend was unreachable or its reply could not be used.
    #[error("Transport failure: {0}")]
    Transport(String),
}

impl RelayError {
    /// Status code the relay answers with.
    pub fn status(&self) -> u16 {
        match self {
            RelayError::Backend { status, .. } => *status,
            RelayError::Transport(_) => 500,
        }
    }

    /// JSON body the relay answers with.
    pub fn body(&self) -> Value {
        match self {
            RelayError::Backend { details, .. } => json!({
                "error": BACKEND_FAILURE,
                "details": details,
            }),
            RelayError::Transport(message) => json!({
                "error": INTERNAL_FAILURE,
                "details": message,
            }),
        }
    }
}

impl From<TransportError> for RelayError {
    fn from(err: TransportError) -> Self {
        RelayError::Transport(err.0)
    }
}

/// Send `request` to `backend` once. No retries.
pub async fn forward(
    backend: &dyn AnalysisBackend,
    request: &RelayRequest,
) -> Result<Value, RelayError> {
    let request_id = Uuid::new_v4();
    info!(
        "[{}] Forwarding CSV to {} ({} bytes, sha256={}, weights={}, time_gap={}, date_filter={})",
        request_id,
        backend.describe(),
        request.csv_len(),
        request.csv_checksum().as_deref().unwrap_or("-"),
        shown(&request.weights),
        shown(&request.time_gap),
        shown(&request.date_filter),
    );

    let reply = backend.process_csv(request).await.map_err(|err| {
        warn!("[{}] Backend unreachable: {}", request_id, err);
        RelayError::from(err)
    })?;

    if !reply.is_success() {
        warn!(
            "[{}] Backend rejected request with status {}: {}",
            request_id, reply.status, reply.body
        );
        return Err(RelayError::Backend {
            status: reply.status,
            details: reply.body,
        });
    }

    info!("[{}] Backend answered {}", request_id, reply.status);
    Ok(reply.body)
}

fn shown(value: &Option<Value>) -> String {
    value.as_ref().map_or_else(|| "<absent>".to_string(), Value::to_string)
}

/// [`AnalysisBackend`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpBackend {
    /// Create a backend client for `base_url`.
    ///
    /// `timeout` of `None` leaves reqwest's default (no overall timeout).
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| TransportError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), PROCESS_CSV_PATH),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl AnalysisBackend for HttpBackend {
    async fn process_csv(&self, request: &RelayRequest) -> Result<BackendReply, TransportError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| TransportError(format!("Failed to reach analysis backend: {}", e)))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| TransportError(format!("Failed to read backend response: {}", e)))?;

        let body = if status.is_success() {
            serde_json::from_slice(&bytes)
                .map_err(|e| TransportError(format!("Malformed backend response: {}", e)))?
        } else {
            // Error bodies are passed on even when they are not JSON.
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).trim().to_string())
            })
        };

        Ok(BackendReply::new(status.as_u16(), body))
    }

    fn describe(&self) -> String {
        self.endpoint.clone()
    }
}
