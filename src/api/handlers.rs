//! HTTP endpoint handlers

use std::{convert::Infallible, sync::Arc};

use axum::{
    extract::State,
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Json, Response,
    },
};
use futures::stream::Stream;
use serde_json::Value;
use tokio_stream::{wrappers::BroadcastStream, StreamExt};
use tracing::{debug, error, info, warn};

use super::{
    commands::dispatch,
    protocol::{HealthResponse, Request},
};
use crate::state::AppState;

/// Handle POST /message - the UI message channel
///
/// Unknown request types are logged and answered with `204 No Content`.
pub async fn message_handler(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> Result<Response, StatusCode> {
    let kind = body
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or("<missing>")
        .to_string();

    let request: Request = match serde_json::from_value(body) {
        Ok(request) => request,
        Err(e) => {
            warn!("Unknown message type: {} ({})", kind, e);
            return Ok(StatusCode::NO_CONTENT.into_response());
        }
    };

    if request.is_mutation() {
        info!("{} received", kind);
    } else {
        debug!("{} received", kind);
    }

    match dispatch(&state, request).await {
        Ok(response) => Ok(Json(response).into_response()),
        Err(e) => {
            error!("Failed to handle {}: {}", kind, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /events - broadcast updates as server-sent events
pub async fn events_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let stream = BroadcastStream::new(state.subscribe()).filter_map(|received| match received {
        Ok(event) => match serde_json::to_string(&event) {
            Ok(data) => Some(Ok(Event::default().data(data))),
            Err(e) => {
                warn!("Failed to encode broadcast event: {}", e);
                None
            }
        },
        // lagged listeners just miss updates
        Err(_) => None,
    });
    Sse::new(stream).keep_alive(KeepAlive::default())
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse::ok(state.uptime()))
}
