//! Route definitions for the HTTP API.

pub mod health;
pub mod services;

use axum::Router;

use crate::state::AppState;

/// Build the complete router with all routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(health::routes())
        .merge(services::routes())
        .with_state(state)
}
