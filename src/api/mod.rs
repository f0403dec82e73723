//! HTTP API module
//!
//! The message channel UI surfaces use to reach the coordinator: request and
//! response over `POST /message`, broadcasts over `GET /events`.

pub mod commands;
pub mod handlers;
pub mod protocol;

use std::sync::Arc;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

pub use commands::dispatch;
pub use protocol::{Request, Response};

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/message", post(message_handler))
        .route("/events", get(events_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
