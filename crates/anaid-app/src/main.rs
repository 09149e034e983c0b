//! Anaid relay binary - composition root.
//!
//! 1. Load configuration from TOML
//! 2. Resolve the model API key and SMTP password
//! 3. Build the chat relay and transcript mailer
//! 4. Start the session expiry sweeper
//! 5. Serve the axum API

mod cli;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use anaid_api::AppState;
use anaid_chat::store::{InMemorySessionStore, SessionStore};
use anaid_chat::{ChatRelay, CompletionModel, GeminiClient};
use anaid_core::config::AnaidConfig;
use anaid_core::credentials::{
    log_resolution, resolve_secret, MAIL_PASSWORD_VARS, MODEL_KEY_VARS,
};
use anaid_mail::{MailTransport, SmtpMailTransport, TranscriptMailer};

use cli::CliArgs;

/// Periodically drop sessions idle past their timeout.
async fn session_sweeper(store: Arc<dyn SessionStore>, period: Duration) {
    let mut interval = tokio::time::interval(period);
    // The first tick completes immediately.
    interval.tick().await;
    loop {
        interval.tick().await;
        let purged = store.purge_expired().await;
        if purged > 0 {
            let remaining = store.session_count().await;
            tracing::info!(purged, remaining, "Expired idle sessions");
        }
    }
}

fn build_model(config: &AnaidConfig) -> Option<Arc<dyn CompletionModel>> {
    let resolved = resolve_secret(MODEL_KEY_VARS, &config.llm.api_key_file);
    log_resolution("model_api_key", &resolved);
    let (key, _) = resolved?;
    match GeminiClient::new(key, &config.llm) {
        Ok(client) => Some(Arc::new(client)),
        Err(e) => {
            tracing::error!(error = %e, "Failed to build completion client; chat disabled");
            None
        }
    }
}

fn build_transport(config: &AnaidConfig) -> Option<Arc<dyn MailTransport>> {
    let resolved = resolve_secret(MAIL_PASSWORD_VARS, &config.mail.password_file);
    log_resolution("mail_password", &resolved);
    let (password, _) = resolved?;
    match SmtpMailTransport::new(&config.mail, password) {
        Ok(transport) => {
            tracing::info!(
                host = %config.mail.smtp_host,
                port = config.mail.smtp_port,
                "Mail transport configured"
            );
            Some(Arc::new(transport))
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to build mail transport; email disabled");
            None
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config is read before tracing so its log level can seed the filter.
    let config_file = args.resolve_config_path();
    let loaded = if config_file.exists() {
        Some(AnaidConfig::load(&config_file))
    } else {
        None
    };
    let config = match &loaded {
        Some(Ok(config)) => config.clone(),
        _ => AnaidConfig::default(),
    };

    // Tracing. RUST_LOG > --log-level > config.
    let log_level = args.resolve_log_level(&config.general.log_level);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level)),
        )
        .init();

    tracing::info!("Starting Anaid relay v{}", env!("CARGO_PKG_VERSION"));

    match loaded {
        Some(Ok(_)) => tracing::info!(path = %config_file.display(), "Configuration loaded"),
        Some(Err(e)) => tracing::warn!(
            path = %config_file.display(),
            error = %e,
            "Failed to load config, using defaults"
        ),
        None => tracing::info!(path = %config_file.display(), "No config file, using defaults"),
    }

    if args.init_config {
        config.save(&config_file)?;
        return Ok(());
    }

    // Services.
    let store: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new(
        config.sessions.max_sessions,
        config.sessions.idle_timeout(),
    ));
    let relay = ChatRelay::new(Arc::clone(&store), build_model(&config))
        .with_max_message_chars(config.llm.max_message_chars);
    let mailer = TranscriptMailer::new(&config.mail, build_transport(&config));
    tracing::info!(
        model = relay.model_name().unwrap_or("none"),
        chat = relay.is_configured(),
        email = mailer.is_configured(),
        "Services ready"
    );

    let environment = config
        .general
        .resolve_environment(|name| std::env::var(name).ok());
    let state = AppState::new(relay, mailer, environment.clone());

    // === Background tasks ===

    tokio::spawn(session_sweeper(
        Arc::clone(&store),
        config.sessions.sweep_interval(),
    ));

    // === API server ===

    let port = args.resolve_port(config.server.port);
    let addr = format!("{}:{}", config.server.host, port);
    tracing::info!(addr = %addr, environment = %environment, "API server listening");

    if let Err(e) = anaid_api::start_server(&addr, state).await {
        tracing::error!(addr = %addr, error = %e, "Server stopped");
        return Err(e.into());
    }

    Ok(())
}
