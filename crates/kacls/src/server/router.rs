//! Axum router construction.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use common::protocol::DISCOVERY_PATH;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use super::{handlers, middleware, state::AppState};

/// Build the application [`Router`] with all routes and middleware attached.
///
/// The CORS gate wraps every route and the fallback, so preflights and 404s
/// carry the same cross-origin headers as successful calls.
pub fn build(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/status", get(handlers::status))
        .route(DISCOVERY_PATH, get(handlers::discovery))
        .route("/wrap", post(handlers::wrap))
        .route("/unwrap", post(handlers::unwrap))
        .fallback(handlers::not_found)
        .layer(axum::middleware::from_fn(middleware::cors_gate))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .with_state(state)
}
