mod config;
mod http;
mod signature;
mod state;

use anyhow::Context;
use dotenvy::dotenv;
use std::{sync::Arc, time::Duration};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use config::{Settings, DEFAULT_ADMIN_TOKEN, DEFAULT_WEBHOOK_SECRET};
use http::router::build_router;
use signature::WebhookVerifier;
use state::AppState;
use storage::{Db, SolutionStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = Settings::new().context("Failed to load configuration")?;

    if settings.platform.webhook_secret == DEFAULT_WEBHOOK_SECRET {
        warn!("Using the default webhook secret, set PINNER_PLATFORM__WEBHOOK_SECRET");
    }
    if settings.security.admin_token == DEFAULT_ADMIN_TOKEN {
        warn!("Using the default admin token, set PINNER_SECURITY__ADMIN_TOKEN");
    }

    let db = Db::new(&settings.database.url).await?;
    let store = SolutionStore::new(Arc::new(db));

    let workflow = adapter::connect(
        adapter::RestConfig {
            api_url: settings.platform.api_url.clone(),
            token: settings.platform.token.clone(),
            request_timeout: Duration::from_secs(settings.platform.request_timeout_secs),
        },
        store,
        &settings.platform.public_base_url,
    )
    .context("Failed to build platform client")?;

    let (tx_cmd, rx_cmd) = mpsc::channel(100);
    let cancel_token = CancellationToken::new();
    let worker = tokio::spawn(adapter::run_command_worker(
        workflow.clone(),
        rx_cmd,
        cancel_token.clone(),
    ));

    let state = AppState {
        workflow,
        sender: tx_cmd,
        verifier: WebhookVerifier::new(&settings.platform.webhook_secret),
        admin_token: settings.security.admin_token.clone(),
        poll_interval: Duration::from_secs(settings.summary.poll_interval_secs.max(1)),
    };

    let app = build_router(state, &settings.server.cors_origins);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to address: {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    cancel_token.cancel();
    if let Err(e) = worker.await {
        tracing::error!("Command worker panicked: {:?}", e);
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down gracefully...");
        },
        _ = terminate => {
            info!("Received SIGTERM, shutting down gracefully...");
        },
    }
}
