//! Integration tests for the Anaid API.
//!
//! Each test drives a fresh router with `oneshot`, backed by an in-memory
//! session store, a scripted completion model and a recording mail
//! transport.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use anaid_api::error::ErrorBody;
use anaid_api::handlers::{
    BannerResponse, ChatResponse, EmailResponse, HealthResponse, StatusResponse, BANNER,
};
use anaid_api::{create_router, AppState};
use anaid_chat::store::{InMemorySessionStore, SessionStore};
use anaid_chat::{ChatError, ChatRelay, CompletionModel, DEFAULT_SESSION_KEY};
use anaid_core::config::MailConfig;
use anaid_core::types::Turn;
use anaid_mail::{MailError, MailTransport, TranscriptEnvelope, TranscriptMailer};

// =============================================================================
// Fakes
// =============================================================================

struct FakeModel {
    reply: Result<String, String>,
    calls: Mutex<Vec<Vec<Turn>>>,
}

impl FakeModel {
    fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(text.to_string()),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn failing(detail: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(detail.to_string()),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl CompletionModel for FakeModel {
    fn model_name(&self) -> &str {
        "fake"
    }

    async fn complete(&self, context: &[Turn]) -> Result<String, ChatError> {
        self.calls.lock().unwrap().push(context.to_vec());
        self.reply.clone().map_err(ChatError::Upstream)
    }
}

#[derive(Default)]
struct FakeTransport {
    sent: Mutex<Vec<TranscriptEnvelope>>,
    fail: bool,
}

impl FakeTransport {
    fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl MailTransport for FakeTransport {
    async fn deliver(&self, envelope: &TranscriptEnvelope) -> Result<(), MailError> {
        self.sent.lock().unwrap().push(envelope.clone());
        if self.fail {
            Err(MailError::Delivery("connection refused".to_string()))
        } else {
            Ok(())
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

struct Harness {
    app: axum::Router,
    store: Arc<InMemorySessionStore>,
}

fn harness(model: Option<Arc<FakeModel>>, transport: Option<Arc<FakeTransport>>) -> Harness {
    let store = Arc::new(InMemorySessionStore::default());
    let model = model.map(|m| m as Arc<dyn CompletionModel>);
    let transport = transport.map(|t| t as Arc<dyn MailTransport>);
    let relay = ChatRelay::new(store.clone(), model);
    let mailer = TranscriptMailer::new(&MailConfig::default(), transport);
    let app = create_router(AppState::new(relay, mailer, "test"));
    Harness { app, store }
}

fn post_json(uri: &str, json: &str) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(json.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

async fn body_bytes(resp: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(resp.into_body(), 1024 * 1024)
        .await
        .unwrap()
        .to_vec()
}

async fn error_body(resp: axum::response::Response) -> ErrorBody {
    serde_json::from_slice(&body_bytes(resp).await).unwrap()
}

// =============================================================================
// Informational endpoints
// =============================================================================

#[tokio::test]
async fn test_root_banner() {
    let h = harness(None, None);
    let resp = h.app.oneshot(get("/")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let banner: BannerResponse = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(banner.message, BANNER);
}

#[tokio::test]
async fn test_health_reports_environment() {
    let h = harness(None, None);
    let resp = h.app.oneshot(get("/health")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let health: HealthResponse = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(health.status, "ok");
    assert_eq!(health.environment, "test");
}

#[tokio::test]
async fn test_status_unconfigured() {
    let h = harness(None, None);
    let resp = h.app.oneshot(get("/api/status")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let status: StatusResponse = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(status.status, "ok");
    assert_eq!(status.framework, "axum");
    assert_eq!(status.active_sessions, 0);
    assert!(!status.chat_configured);
    assert!(!status.mail_configured);
}

#[tokio::test]
async fn test_status_counts_sessions() {
    let h = harness(
        Some(FakeModel::replying("ok")),
        Some(Arc::new(FakeTransport::default())),
    );
    h.app
        .clone()
        .oneshot(post_json("/api/chat", r#"{"message":"Hola","user_id":"a"}"#))
        .await
        .unwrap();
    h.app
        .clone()
        .oneshot(post_json("/api/chat", r#"{"message":"Hola","user_id":"b"}"#))
        .await
        .unwrap();

    let resp = h.app.oneshot(get("/api/status")).await.unwrap();
    let status: StatusResponse = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(status.active_sessions, 2);
    assert!(status.chat_configured);
    assert!(status.mail_configured);
}

#[tokio::test]
async fn test_unknown_route_404() {
    let h = harness(None, None);
    let resp = h.app.oneshot(get("/api/nope")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// POST /api/chat
// =============================================================================

#[tokio::test]
async fn test_chat_happy_path() {
    let model = FakeModel::replying("¡Hola! ¿En qué puedo ayudarte?");
    let h = harness(Some(model.clone()), None);

    let resp = h
        .app
        .oneshot(post_json("/api/chat", r#"{"message":"Hola","user_id":"abc"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let chat: ChatResponse = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(chat.reply, "¡Hola! ¿En qué puedo ayudarte?");

    let history = h.store.history("abc").await.unwrap();
    assert_eq!(history.len(), 4);
    assert_eq!(history[2], Turn::caller("Hola"));
    assert_eq!(model.call_count(), 1);
}

#[tokio::test]
async fn test_chat_without_user_id_uses_guest_session() {
    let h = harness(Some(FakeModel::replying("ok")), None);

    let resp = h
        .app
        .oneshot(post_json("/api/chat", r#"{"message":"Hola"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(h.store.history(DEFAULT_SESSION_KEY).await.unwrap().len(), 4);
}

#[tokio::test]
async fn test_chat_empty_message() {
    let model = FakeModel::replying("x");
    let h = harness(Some(model.clone()), None);

    let resp = h
        .app
        .oneshot(post_json("/api/chat", r#"{"message":""}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = error_body(resp).await;
    assert_eq!(body.error, "Mensaje vacío");
    assert_eq!(body.code, "invalid_input");
    assert_eq!(model.call_count(), 0);
}

#[tokio::test]
async fn test_chat_missing_message_field() {
    let model = FakeModel::replying("x");
    let h = harness(Some(model.clone()), None);

    let resp = h
        .app
        .oneshot(post_json("/api/chat", r#"{"user_id":"abc"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_body(resp).await.error, "Mensaje vacío");
    assert_eq!(model.call_count(), 0);
}

#[tokio::test]
async fn test_chat_malformed_json() {
    let model = FakeModel::replying("x");
    let h = harness(Some(model.clone()), None);

    let resp = h
        .app
        .oneshot(post_json("/api/chat", "{not json"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_body(resp).await.code, "invalid_input");
    assert_eq!(model.call_count(), 0);
}

#[tokio::test]
async fn test_chat_not_configured() {
    let h = harness(None, None);

    let resp = h
        .app
        .oneshot(post_json("/api/chat", r#"{"message":"Hola","user_id":"abc"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = error_body(resp).await;
    assert_eq!(body.code, "not_configured");
    assert_eq!(body.error, "El asistente no está configurado (Falta API Key).");
    assert!(h.store.history("abc").await.is_none());
}

#[tokio::test]
async fn test_chat_upstream_failure() {
    let h = harness(Some(FakeModel::failing("HTTP 500: internal")), None);

    let resp = h
        .app
        .oneshot(post_json("/api/chat", r#"{"message":"Hola","user_id":"abc"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    let body = error_body(resp).await;
    assert_eq!(body.code, "upstream_error");
    assert_eq!(body.error, "Error al procesar tu mensaje.");
    // Only the persona seed; the failed turn was not committed.
    assert_eq!(h.store.history("abc").await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_chat_sessions_are_isolated() {
    let model = FakeModel::replying("ok");
    let h = harness(Some(model.clone()), None);

    h.app
        .clone()
        .oneshot(post_json("/api/chat", r#"{"message":"pedido 123","user_id":"k1"}"#))
        .await
        .unwrap();
    h.app
        .oneshot(post_json("/api/chat", r#"{"message":"hola","user_id":"k2"}"#))
        .await
        .unwrap();

    let calls = model.calls.lock().unwrap();
    assert!(calls[1].iter().all(|t| t.text() != "pedido 123"));
}

// =============================================================================
// POST /api/send-email
// =============================================================================

#[tokio::test]
async fn test_send_email_happy_path() {
    let transport = Arc::new(FakeTransport::default());
    let h = harness(None, Some(transport.clone()));

    let resp = h
        .app
        .oneshot(post_json(
            "/api/send-email",
            r#"{"history":"Cliente: Hola\nAsistente: Buenas"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let email: EmailResponse = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(email.status, "success");

    let sent = transport.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].body.contains("Cliente: Hola\nAsistente: Buenas"));
    assert!(sent[0].body.contains("Fecha: "));
}

#[tokio::test]
async fn test_send_email_empty_history() {
    let transport = Arc::new(FakeTransport::default());
    let h = harness(None, Some(transport.clone()));

    let resp = h
        .app
        .oneshot(post_json("/api/send-email", r#"{"history":""}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = error_body(resp).await;
    assert_eq!(body.error, "No hay historial para enviar.");
    assert_eq!(body.code, "invalid_input");
    assert_eq!(transport.sent_count(), 0);
}

#[tokio::test]
async fn test_send_email_not_configured() {
    let h = harness(None, None);

    let resp = h
        .app
        .oneshot(post_json("/api/send-email", r#"{"history":"algo"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        error_body(resp).await.error,
        "Servidor no configurado (Falta EMAIL_PASSWORD o email_key.txt)"
    );
}

#[tokio::test]
async fn test_send_email_delivery_failure() {
    let transport = Arc::new(FakeTransport {
        sent: Mutex::new(Vec::new()),
        fail: true,
    });
    let h = harness(None, Some(transport.clone()));

    let resp = h
        .app
        .oneshot(post_json("/api/send-email", r#"{"history":"algo"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    let body = error_body(resp).await;
    assert_eq!(body.code, "delivery_error");
    assert_eq!(body.error, "Error al enviar correo.");
    assert_eq!(transport.sent_count(), 1);
}

// =============================================================================
// Middleware
// =============================================================================

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let h = harness(None, None);

    let req = Request::builder()
        .method("OPTIONS")
        .uri("/api/chat")
        .header("origin", "https://mandrinadosanaid.com")
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "content-type")
        .body(Body::empty())
        .unwrap();
    let resp = h.app.oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}

#[tokio::test]
async fn test_oversized_body_rejected() {
    let model = FakeModel::replying("x");
    let h = harness(Some(model.clone()), None);

    let big = "a".repeat(anaid_api::routes::MAX_BODY_BYTES + 1);
    let resp = h
        .app
        .oneshot(post_json("/api/chat", &format!(r#"{{"message":"{}"}}"#, big)))
        .await
        .unwrap();

    assert!(resp.status().is_client_error());
    assert_eq!(model.call_count(), 0);
}
