//! Anaid API crate - axum HTTP server and route handlers.
//!
//! Exposes the chat relay and transcript mailer over a small JSON API
//! consumed by the company website's chat widget.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::{create_router, start_server};
pub use state::AppState;
