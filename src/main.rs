use anyhow::{Context, Result};
use clap::Parser;
use reqwest::Client;
use std::time::Duration;
use tracing::info;

use osu_exporter::config::loader::load_config;
use osu_exporter::observability::metrics::MetricSink;
use osu_exporter::refresh::error_tracker::ErrorTracker;
use osu_exporter::refresh::orchestrator::RefreshOrchestrator;
use osu_exporter::server;
use osu_exporter::sources::oauth2::{Credentials, TokenClient};
use osu_exporter::sources::stats::StatsFetcher;
use osu_exporter::utils::logging;
use osu_exporter::utils::logging::LogLevel;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, env = "CONFIG", default_value = "config.json")]
    config: String,
    #[arg(long, env = "LOG_LEVEL", value_enum)]
    log_level: Option<LogLevel>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // -------------------------------
    // 1. Load JSON config, init logging
    // -------------------------------

    let args = Args::parse();
    let config = load_config(&args.config)?;
    logging::run(config.logging.as_ref(), args.log_level);

    // -------------------------------
    // 2. Create request client and sources
    // -------------------------------

    let client = Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .context("Failed to build HTTP client")?;
    let credentials = Credentials {
        client_id: config.client_id.clone(),
        client_secret: config.client_secret.clone(),
    };
    let token_client = TokenClient::new(&config.api_base_url, client.clone());
    let fetcher = StatsFetcher::new(&config.api_base_url, client);

    // -------------------------------
    // 3. Build the gauge sink and start the metrics endpoint
    // -------------------------------

    let sink = MetricSink::new();
    let http_server = server::start(&config.host, config.port, sink.registry().clone());

    // -------------------------------
    // 4. Fetch the initial token; failure here is a startup failure
    // -------------------------------

    let initial_token = token_client
        .obtain_token(&credentials)
        .await
        .context("Initial token fetch failed")?;

    // -------------------------------
    // 5. Run the refresh loop next to the server until one of them dies
    // -------------------------------

    let orchestrator = RefreshOrchestrator::new(
        credentials,
        token_client,
        fetcher,
        sink,
        ErrorTracker::new(config.max_intervals_with_errors),
        config.user_ids.clone(),
        initial_token,
    );
    let interval = Duration::from_secs(config.refresh_interval_seconds);

    let refresh_loop = async move {
        orchestrator.run(interval).await?;
        Ok::<(), anyhow::Error>(())
    };

    info!("Exporter starting, polling {} users.", config.user_ids.len());
    tokio::try_join!(http_server, refresh_loop)?;

    Ok(())
}
