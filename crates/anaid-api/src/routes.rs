//! Router setup with all API routes and middleware.
//!
//! Configures the axum Router with CORS, tracing, compression,
//! and all endpoint handlers.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use anaid_core::error::AnaidError;

use crate::handlers;
use crate::state::AppState;

/// Largest accepted request body. Transcripts are the biggest payload.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Create the axum Router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // The chat widget is embedded on the public website, served from
    // another origin.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/api/status", get(handlers::status))
        .route("/api/chat", post(handlers::chat))
        .route("/api/send-email", post(handlers::send_email))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Bind `addr` and serve until the process is stopped.
///
/// Failing to bind is the only startup error surfaced to the caller.
pub async fn start_server(addr: &str, state: AppState) -> Result<(), AnaidError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AnaidError::Server(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!("Starting API server on {}", addr);

    axum::serve(listener, create_router(state))
        .await
        .map_err(|e| AnaidError::Server(format!("Server error: {}", e)))?;

    Ok(())
}
