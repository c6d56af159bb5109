use anyhow::{Context, Result};
use prometheus::Registry;
use tracing::info;

use crate::observability::routes::MetricsState;

/// Start the axum server exposing `/metrics` on the configured address.
/// Runs until the process exits.
pub async fn start(host: &str, port: u16, registry: Registry) -> Result<()> {
    let state = MetricsState::new(registry);
    let app = state.router();

    let listener = tokio::net::TcpListener::bind(format!("{host}:{port}"))
        .await
        .with_context(|| format!("Failed to bind metrics endpoint on {host}:{port}"))?;
    info!("Metrics endpoint listening on {host}:{port}");
    axum::serve(listener, app)
        .await
        .context("Metrics server terminated")?;
    Ok(())
}
