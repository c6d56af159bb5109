// tests/common/mod.rs
pub use axum::Router;
pub use tokio::task::JoinHandle;

use std::net::SocketAddr;

use reqwest::Client;
use serde_json::json;

use crate::observability::metrics::MetricSink;
use crate::refresh::error_tracker::ErrorTracker;
use crate::refresh::orchestrator::RefreshOrchestrator;
use crate::sources::oauth2::{Credentials, TokenClient};
use crate::sources::stats::StatsFetcher;

/// Spawn an Axum router on an ephemeral port and return (JoinHandle, SocketAddr)
pub async fn spawn_axum(router: Router) -> (JoinHandle<()>, SocketAddr) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind failed");
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server failed");
    });
    (handle, addr)
}

pub fn build_reqwest_client() -> Client {
    Client::builder()
        .timeout(std::time::Duration::from_secs(5))
        .build()
        .expect("reqwest client")
}

pub fn test_credentials() -> Credentials {
    Credentials {
        client_id: "1234".to_string(),
        client_secret: "s3cr3t".to_string(),
    }
}

/// Orchestrator wired against `base_url` with a fresh client.
pub fn build_orchestrator(
    base_url: &str,
    user_ids: Vec<u64>,
    max_intervals_with_errors: u32,
    initial_token: &str,
    sink: MetricSink,
) -> RefreshOrchestrator {
    let client = build_reqwest_client();
    RefreshOrchestrator::new(
        test_credentials(),
        TokenClient::new(base_url, client.clone()),
        StatsFetcher::new(base_url, client),
        sink,
        ErrorTracker::new(max_intervals_with_errors),
        user_ids,
        initial_token.to_string(),
    )
}

/// A well-formed stats record for `user_id`.
pub fn user_record(user_id: u64, username: &str, pp: f64) -> serde_json::Value {
    json!({
        "id": user_id,
        "username": username,
        "statistics": {
            "pp": pp,
            "play_count": 1000,
            "level": {"current": 42, "progress": 16},
            "grade_counts": {"ss": 1, "ssh": 0, "s": 3, "sh": 2, "a": 7}
        }
    })
}

/// Read one gauge value back out of the registry.
pub fn gauge_value(
    registry: &prometheus::Registry,
    name: &str,
    user_id: &str,
    username: &str,
) -> Option<f64> {
    registry
        .gather()
        .iter()
        .find(|family| family.get_name() == name)
        .and_then(|family| {
            family.get_metric().iter().find(|metric| {
                let labels = metric.get_label();
                labels
                    .iter()
                    .any(|l| l.get_name() == "user_id" && l.get_value() == user_id)
                    && labels
                        .iter()
                        .any(|l| l.get_name() == "username" && l.get_value() == username)
            })
        })
        .map(|metric| metric.get_gauge().get_value())
}
