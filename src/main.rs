//! AuditHub server: multi-tenant audit event service.
//!
//! Main entry point that wires all crates together and starts the server.

use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{fmt, EnvFilter};

use audithub_core::config::AppConfig;
use audithub_core::error::AppError;
use audithub_notify::{
    EmailSender, HttpWebhookSender, SlackSender, SlackWebhookSender, SmtpEmailSender,
    WebhookSender,
};

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}

/// Load configuration from file and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("AUDITHUB_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting AuditHub v{}", env!("CARGO_PKG_VERSION"));

    // Database connection + migrations
    let db = audithub_database::DatabasePool::connect(&config.database).await?;
    audithub_database::migration::run_migrations(db.pool()).await?;
    let db_pool = db.into_pool();

    // Persistence port
    let store = Arc::new(
        audithub_database::repositories::audit::AuditEventRepository::new(db_pool.clone()),
    );

    // Auth
    let jwt_decoder = Arc::new(audithub_auth::jwt::decoder::JwtDecoder::new(&config.auth));
    let api_keys = Arc::new(audithub_auth::api_key::ApiKeyValidator::new(&config.auth));
    if !api_keys.is_enabled() {
        tracing::warn!("No API keys configured; only JWT authentication is available");
    }

    // Notification channels
    let notifier = build_notifier(&config);

    // Services
    let audit_service = Arc::new(audithub_service::audit::service::AuditService::new(
        store,
        notifier,
        config.audit.clone(),
    ));

    let app_state = audithub_api::state::AppState {
        config: Arc::new(config.clone()),
        db_pool,
        jwt_decoder,
        api_keys,
        audit_service,
    };

    let app = audithub_api::router::build_router(app_state);

    let addr = config.server.address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("AuditHub server listening on {addr}");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, starting graceful shutdown...");
    })
    .await
    .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    tracing::info!("AuditHub server shut down gracefully");
    Ok(())
}

/// Constructs the notification dispatcher from configuration.
///
/// A channel whose transport fails to build is logged and left
/// unconfigured rather than aborting startup.
fn build_notifier(
    config: &AppConfig,
) -> Option<Arc<audithub_service::notification::NotificationService>> {
    let nc = &config.notification;
    if !nc.email.enabled && !nc.slack.enabled && !nc.webhook.enabled {
        tracing::info!("All notification channels disabled");
        return None;
    }

    let email: Option<Arc<dyn EmailSender>> = if nc.email.enabled {
        match SmtpEmailSender::new(&nc.email) {
            Ok(sender) => Some(Arc::new(sender)),
            Err(e) => {
                tracing::warn!("Email channel unavailable: {e}");
                None
            }
        }
    } else {
        None
    };

    let slack: Option<Arc<dyn SlackSender>> = if nc.slack.enabled {
        match SlackWebhookSender::new(&nc.slack, nc.webhook.timeout_seconds) {
            Ok(sender) => Some(Arc::new(sender)),
            Err(e) => {
                tracing::warn!("Slack channel unavailable: {e}");
                None
            }
        }
    } else {
        None
    };

    let webhook: Option<Arc<dyn WebhookSender>> = if nc.webhook.enabled {
        match HttpWebhookSender::new(&nc.webhook) {
            Ok(sender) => Some(Arc::new(sender)),
            Err(e) => {
                tracing::warn!("Webhook channel unavailable: {e}");
                None
            }
        }
    } else {
        None
    };

    Some(Arc::new(
        audithub_service::notification::NotificationService::new(
            nc.clone(),
            email,
            slack,
            webhook,
        ),
    ))
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::error!("Failed to install SIGTERM handler: {e}"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
