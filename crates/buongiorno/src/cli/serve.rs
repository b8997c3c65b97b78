//! The `buongiorno serve` command: HTTP trigger for scheduled runs.
//!
//! `POST /` runs the pipeline once and `GET /health` answers `OK`. Each
//! request gets its own cancellation token, cancelled if the request is
//! dropped before the run completes. Concurrent requests run concurrently.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Router,
};
use buongiorno_core::{Config, Orchestrator};
use clap::Args;
use tokio_util::sync::CancellationToken;

/// Arguments for the `serve` command.
#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Address to bind (defaults to `server.host`)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (defaults to `server.port`, or PORT)
    #[arg(short, long)]
    pub port: Option<u16>,
}

/// Build the trigger router around a shared orchestrator.
pub fn router(orchestrator: Arc<Orchestrator>) -> Router {
    Router::new()
        .route("/", post(trigger))
        .route("/health", get(health))
        .with_state(orchestrator)
}

async fn health() -> &'static str {
    "OK"
}

async fn trigger(State(orchestrator): State<Arc<Orchestrator>>) -> (StatusCode, String) {
    let cancel = CancellationToken::new();
    let guard = cancel.clone().drop_guard();

    let result = orchestrator.run(&cancel).await;
    guard.disarm();

    match result {
        Ok(summary) => (
            StatusCode::OK,
            format!(
                "Buongiornissimo bot executed successfully ({}/{} deliveries)",
                summary.broadcast.delivered(),
                summary.broadcast.total()
            ),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Bot execution failed: {e}"),
        ),
    }
}

/// Execute the serve command until Ctrl-C.
pub async fn execute(args: ServeArgs, config: Config) -> anyhow::Result<()> {
    config.validate()?;
    let orchestrator = Arc::new(Orchestrator::from_config(&config)?);

    let host = args.host.unwrap_or_else(|| config.server.host.clone());
    let port = args.port.unwrap_or(config.server.port);
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid listen address {host}:{port}: {e}"))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to {addr}: {e}"))?;
    let telegram = &config.telegram;
    tracing::info!(
        "Listening on http://{addr} for {} chats ({} regular + {} admin)",
        telegram.destination_count(),
        telegram.chat_ids.len(),
        telegram.destination_count() - telegram.chat_ids.len()
    );

    axum::serve(listener, router(orchestrator))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Received shutdown signal");
}
