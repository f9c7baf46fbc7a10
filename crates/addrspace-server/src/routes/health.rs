//! Health check endpoint.

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::error::ApiResult;
use crate::state::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Number of nodes in the address space.
    pub nodes: usize,
}

/// GET /health - Health check endpoint.
///
/// Fails with 500 if the address space lock is poisoned.
async fn health_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    let nodes = state.space().len()?;
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        nodes,
    }))
}

/// Build health check routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
