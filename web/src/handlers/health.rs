//! Health check handler.

use axum::Json;
use serde::Serialize;

/// Health check response body.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Always `"healthy"` while the process is serving.
    pub status: &'static str,
}

/// Liveness probe.
///
/// # Endpoint
///
/// ```text
/// GET /health
/// ```
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "healthy" })
}
