//! Axum router construction for the Observer API.
//!
//! Assembles all routes (REST + `WebSocket` + operator) into a single
//! [`Router`] with CORS middleware enabled for cross-origin dashboard
//! access.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::operator;
use crate::state::AppState;
use crate::ws;

/// Build the complete Axum router for the Observer server.
///
/// The router includes:
/// - `GET /` -- minimal HTML status page
/// - `GET /ws/frames` -- `WebSocket` frame summary stream
/// - `GET /api/frame` -- full current frame (arcs + markers)
/// - `GET /api/markers` -- list accumulated markers
/// - `GET /api/markers/:key` -- single marker by location key
/// - `GET /api/catalog` -- flight catalog statistics
/// - `POST /api/operator/*` -- playback control commands
/// - `GET /api/operator/status` -- playback session status
///
/// CORS is configured to allow any origin for development. In
/// production this should be restricted.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Status page
        .route("/", get(handlers::index))
        // WebSocket
        .route("/ws/frames", get(ws::ws_frames))
        // REST API
        .route("/api/frame", get(handlers::get_frame))
        .route("/api/markers", get(handlers::list_markers))
        .route("/api/markers/{key}", get(handlers::get_marker))
        .route("/api/catalog", get(handlers::get_catalog))
        // Operator API
        .route("/api/operator/play", post(operator::play))
        .route("/api/operator/pause", post(operator::pause))
        .route("/api/operator/direction", post(operator::set_direction))
        .route("/api/operator/reset", post(operator::reset))
        .route("/api/operator/speed", post(operator::set_speed))
        .route("/api/operator/status", get(operator::status))
        .route("/api/operator/stop", post(operator::stop))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
