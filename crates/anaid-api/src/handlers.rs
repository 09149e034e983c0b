//! Route handler functions for all API endpoints.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

pub const BANNER: &str = "API Chatbot Mandrinados Anaid está en línea 🚀";

// =============================================================================
// Request types
// =============================================================================

/// Request body for POST /api/chat.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    /// Session key; omitted or blank means the shared guest session.
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Request body for POST /api/send-email.
#[derive(Debug, Deserialize)]
pub struct EmailRequest {
    /// Full conversation transcript as rendered by the widget.
    #[serde(default)]
    pub history: String,
}

// =============================================================================
// Response types
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct BannerResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    pub framework: String,
    pub version: String,
    pub uptime_secs: u64,
    pub active_sessions: usize,
    pub chat_configured: bool,
    pub mail_configured: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub environment: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EmailResponse {
    pub status: String,
}

// =============================================================================
// Handler functions
// =============================================================================

/// GET / - liveness banner.
pub async fn root() -> Json<BannerResponse> {
    Json(BannerResponse {
        message: BANNER.to_string(),
    })
}

/// GET /api/status
pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok".to_string(),
        framework: "axum".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        active_sessions: state.relay.store().session_count().await,
        chat_configured: state.relay.is_configured(),
        mail_configured: state.mailer.is_configured(),
    })
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        environment: state.environment.clone(),
    })
}

/// POST /api/chat - relay one message and return the model's reply.
///
/// The relay call runs in its own task so a client that disconnects
/// mid-request does not cancel the upstream call or the history commit.
pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let Json(req) = payload?;

    let relay = Arc::clone(&state.relay);
    let reply = tokio::spawn(async move { relay.chat(req.user_id.as_deref(), &req.message).await })
        .await??;

    Ok(Json(ChatResponse { reply }))
}

/// POST /api/send-email - email the conversation transcript to the company.
pub async fn send_email(
    State(state): State<AppState>,
    payload: Result<Json<EmailRequest>, JsonRejection>,
) -> Result<Json<EmailResponse>, ApiError> {
    let Json(req) = payload?;

    state.mailer.send_summary(&req.history).await?;

    Ok(Json(EmailResponse {
        status: "success".to_string(),
    }))
}
