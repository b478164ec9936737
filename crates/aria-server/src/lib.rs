//! Aria server library logic.

pub mod api;
pub mod api_history;
pub mod api_ws;
pub mod config;
pub mod spool;

use aria_dialogue::TurnPipeline;
use aria_store::DbPool;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Extension, Json, Router,
};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool (interaction log + history reads).
    pub pool: DbPool,
    /// The shared turn pipeline.
    pub pipeline: Arc<TurnPipeline>,
    /// Directory for transient audio spool files.
    pub spool_dir: PathBuf,
}

/// Maximum request body size (1 MiB) for plain API routes.
const MAX_REQUEST_BODY_BYTES: usize = 1024 * 1024;

/// Maximum body size for audio uploads (10 MiB), matching the
/// transcription engine's input bound.
const MAX_AUDIO_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Health check handler.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Builds the application router with all routes.
pub fn app(state: AppState) -> Router {
    // The upload route needs a larger body limit than everything else.
    let conversation_routes = Router::new()
        .route("/conversation", post(api::conversation_handler))
        .layer(DefaultBodyLimit::max(MAX_AUDIO_UPLOAD_BYTES));

    Router::new()
        .route("/health", get(health))
        .route(
            "/api/interactions",
            get(api_history::recent_interactions_handler),
        )
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .merge(conversation_routes)
        .route("/ws/{userId}", get(api_ws::ws_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(Extension(Arc::new(state)))
}
