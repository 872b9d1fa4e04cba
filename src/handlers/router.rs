//! Relay routes mounted under one router

use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post};
use axum::{Extension, Json, Router};
use serde_json::{Value, json};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::files::{delete_file_handler, list_files_handler};
use super::generate::{generate_handler, generate_multimodal_handler};
use super::state::RelayState;
use super::upload::upload_file_handler;

/// Headroom for multipart framing and text fields around the file
const FORM_OVERHEAD_BYTES: usize = 1024 * 1024;

/// GET /health
pub async fn health_handler(Extension(state): Extension<RelayState>) -> Json<Value> {
    Json(json!({ "status": "ok", "model": state.provider.model() }))
}

/// All relay routes with their state, body limit, CORS and request tracing.
///
/// NOTE: Axum 0.8 uses {param} syntax instead of :param
pub fn relay_router(state: RelayState) -> Router {
    let body_limit = state.max_upload_bytes + FORM_OVERHEAD_BYTES;

    Router::new()
        .route("/generate", post(generate_handler))
        .route("/generate-multimodal", post(generate_multimodal_handler))
        .route("/upload-file", post(upload_file_handler))
        .route("/files/{session_id}", get(list_files_handler))
        .route("/files/{session_id}/{*file_name}", delete(delete_file_handler))
        .route("/health", get(health_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(Extension(state))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
