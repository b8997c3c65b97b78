//! The `buongiorno run` command: one direct invocation.

use buongiorno_core::{Config, Orchestrator};
use tokio_util::sync::CancellationToken;

/// Execute a single run, printing the summary as JSON on stdout.
///
/// Ctrl-C cancels the run in flight.
pub async fn execute(config: Config) -> anyhow::Result<()> {
    config.validate()?;
    let orchestrator = Orchestrator::from_config(&config)?;

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, cancelling run");
            on_interrupt.cancel();
        }
    });

    let summary = orchestrator
        .run(&cancel)
        .await
        .map_err(|e| anyhow::anyhow!("Bot execution failed: {e}"))?;
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
