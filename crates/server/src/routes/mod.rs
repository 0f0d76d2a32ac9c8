//! API route handlers for the watchdeck server.

pub mod calendar;
pub mod health;
pub mod history;

use std::sync::Arc;

use axum::Router;

use crate::state::AppState;

/// Create the combined API router with all routes under /api prefix.
///
/// Routes:
/// - GET /api/health - Health check
/// - GET /api/calendar - Dense month of viewing activity for the caller
/// - GET /api/history - Recent watch sessions for the caller
/// - POST /api/history - Record a watch session
pub fn api_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/api", health::router())
        .nest("/api", calendar::router())
        .nest("/api", history::router())
        .with_state(state)
}
