//! Concierge proxy server entry point

use std::path::PathBuf;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use concierge_config::Settings;
use concierge_server::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    let config_path = std::env::var("CONCIERGE_CONFIG")
        .ok()
        .map(PathBuf::from)
        .or_else(|| std::env::args().nth(1).map(PathBuf::from));

    let settings = Settings::load(config_path.as_deref()).context("failed to load settings")?;
    tracing::info!(
        endpoint = %settings.llm.endpoint,
        model = %settings.llm.model,
        config = ?config_path,
        "Configuration loaded"
    );
    if settings.llm.api_key.is_none() {
        tracing::warn!("No completion API key configured, /api/chat will return 500");
    }

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let app = create_router(AppState::new(settings));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, "Concierge server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => tracing::error!(error = %e, "Failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
