//! HTTP API handlers and routing.

pub mod error;
mod health;
mod invoke;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Create the runtime router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health endpoints
        .merge(health::routes())
        // Invocation protocol
        .merge(invoke::routes())
        // Middleware
        .layer(TraceLayer::new_for_http())
        // Application state
        .with_state(state)
}
