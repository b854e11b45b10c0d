//! HTTP route handlers for the scoring server.

use axum::Json;

use crate::dto::HealthResponse;

pub mod index;
pub mod predict;

/// Health check endpoint. Does not consult the artifact.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
