//! API error types and JSON error response formatting.
//!
//! Every failure leaving a handler goes through `ApiError`, which picks the
//! HTTP status and the short Spanish message shown by the chat widget.
//! Diagnostic detail is logged here and never returned to the client.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use anaid_chat::ChatError;
use anaid_mail::MailError;

pub const MSG_CHAT_NOT_CONFIGURED: &str = "El asistente no está configurado (Falta API Key).";
pub const MSG_EMPTY_MESSAGE: &str = "Mensaje vacío";
pub const MSG_CHAT_FAILED: &str = "Error al procesar tu mensaje.";
pub const MSG_EMPTY_HISTORY: &str = "No hay historial para enviar.";
pub const MSG_MAIL_NOT_CONFIGURED: &str =
    "Servidor no configurado (Falta EMAIL_PASSWORD o email_key.txt)";
pub const MSG_MAIL_FAILED: &str = "Error al enviar correo.";
pub const MSG_BAD_BODY: &str = "Petición inválida.";

/// JSON error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable message.
    pub error: String,
    /// Machine-readable error kind (e.g., "invalid_input").
    pub code: String,
}

/// API error type that maps to HTTP status codes and JSON responses.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// 503 - a required credential was not supplied at startup.
    #[error("{0}")]
    NotConfigured(String),
    /// 400 - empty or oversized input, or an unparseable body.
    #[error("{0}")]
    InvalidInput(String),
    /// 502 - the completion model failed.
    #[error("{0}")]
    Upstream(String),
    /// 502 - the mail transport failed.
    #[error("{0}")]
    Delivery(String),
    /// 500 - anything else.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotConfigured(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream(_) | ApiError::Delivery(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::NotConfigured(_) => "not_configured",
            ApiError::InvalidInput(_) => "invalid_input",
            ApiError::Upstream(_) => "upstream_error",
            ApiError::Delivery(_) => "delivery_error",
            ApiError::Internal(_) => "internal_error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            code: self.code().to_string(),
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<ChatError> for ApiError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::NotConfigured => ApiError::NotConfigured(MSG_CHAT_NOT_CONFIGURED.to_string()),
            ChatError::EmptyMessage => ApiError::InvalidInput(MSG_EMPTY_MESSAGE.to_string()),
            ChatError::MessageTooLong(max) => ApiError::InvalidInput(format!(
                "Mensaje demasiado largo (máximo {} caracteres).",
                max
            )),
            ChatError::Upstream(detail) => {
                tracing::error!(error = %detail, "Chat request failed upstream");
                ApiError::Upstream(MSG_CHAT_FAILED.to_string())
            }
            ChatError::SessionNotFound(key) => {
                tracing::error!(session = %key, "Session vanished before commit");
                ApiError::Internal(MSG_CHAT_FAILED.to_string())
            }
        }
    }
}

impl From<MailError> for ApiError {
    fn from(err: MailError) -> Self {
        match err {
            MailError::EmptyTranscript => ApiError::InvalidInput(MSG_EMPTY_HISTORY.to_string()),
            MailError::NotConfigured => ApiError::NotConfigured(MSG_MAIL_NOT_CONFIGURED.to_string()),
            MailError::Address(_) | MailError::Delivery(_) => {
                tracing::error!(error = %err, "Transcript email failed");
                ApiError::Delivery(MSG_MAIL_FAILED.to_string())
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(reason = %rejection.body_text(), "Rejected request body");
        ApiError::InvalidInput(MSG_BAD_BODY.to_string())
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        tracing::error!(error = %err, "Chat task did not complete");
        ApiError::Internal(MSG_CHAT_FAILED.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_of(err: ApiError) -> (StatusCode, ErrorBody) {
        let resp = err.into_response();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), 64 * 1024).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_chat_error_mapping() {
        let (status, body) = body_of(ChatError::NotConfigured.into()).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body.code, "not_configured");
        assert_eq!(body.error, MSG_CHAT_NOT_CONFIGURED);

        let (status, body) = body_of(ChatError::EmptyMessage.into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error, "Mensaje vacío");

        let (status, body) = body_of(ChatError::MessageTooLong(10).into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.error.contains("10"));

        let (status, body) = body_of(ChatError::SessionNotFound("k".to_string()).into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.code, "internal_error");
    }

    #[tokio::test]
    async fn test_upstream_detail_not_leaked() {
        let err: ApiError = ChatError::Upstream("HTTP 403: API key invalid".to_string()).into();
        let (status, body) = body_of(err).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body.code, "upstream_error");
        assert_eq!(body.error, MSG_CHAT_FAILED);
        assert!(!body.error.contains("403"));
    }

    #[tokio::test]
    async fn test_mail_error_mapping() {
        let (status, body) = body_of(MailError::EmptyTranscript.into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error, MSG_EMPTY_HISTORY);

        let (status, body) = body_of(MailError::NotConfigured.into()).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body.error, MSG_MAIL_NOT_CONFIGURED);

        let (status, body) = body_of(MailError::Delivery("535".to_string()).into()).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body.code, "delivery_error");
        assert_eq!(body.error, MSG_MAIL_FAILED);
    }
}
