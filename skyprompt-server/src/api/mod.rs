//! API Module
//!
//! HTTP API layer for the server.
//! Each submodule handles endpoints for a specific concern.

pub mod error;
pub mod health;
pub mod prompt;

use axum::{Router, routing::get};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::service::JobManager;

/// Create the main API router with all endpoints
pub fn create_router(manager: JobManager) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Prompt endpoints
        .route(
            "/prompt",
            get(prompt::get_images).post(prompt::submit_prompt),
        )
        .route("/prompt/status", get(prompt::get_status))
        // Add state and middleware
        .with_state(manager)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
