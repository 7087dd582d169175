//! Data Transfer Objects for the HTTP API.
//!
//! The relay reads its request body as a [`RelayRequest`] and forwards it;
//! the form client sends an [`AnalysisRequest`]. Replies are the backend's
//! JSON, passed through.

use serde::{Deserialize, Serialize};

pub use crate::models::{AnalysisRecord, AnalysisRequest, DateFilter, RelayRequest, WeightSet};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Crate version
    pub version: String,
    /// Where relayed requests are sent
    pub backend: String,
}
