//! HTTP handlers for the REST API.

use axum::{body::Bytes, extract::State, Json};
use serde_json::Value;
use tracing::{info, warn};

use super::dto::{HealthResponse, RelayRequest};
use super::error::AppError;
use super::state::AppState;
use crate::services::forward;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        backend: state.backend.describe(),
    }))
}

// =============================================================================
// Relay
// =============================================================================

/// POST /api/process-csv
///
/// Forward the analysis request to the backend and pass its reply through.
/// Only a body that is not a JSON object fails locally (500); missing or
/// mistyped fields are left for the backend to reject.
pub async fn process_csv(State(state): State<AppState>, body: Bytes) -> HandlerResult<Value> {
    let request = serde_json::from_slice::<Value>(&body)
        .and_then(RelayRequest::from_json)
        .map_err(|e| {
            warn!("Rejected relay request body: {}", e);
            AppError::Internal(format!("Invalid request body: {}", e))
        })?;

    info!(
        has_weights = request.weights.is_some(),
        date_filter = request.date_filter.is_some(),
        csv_bytes = request.csv_len(),
        "Relaying CSV analysis request"
    );

    let data = forward(state.backend.as_ref(), &request).await?;
    Ok(Json(data))
}
