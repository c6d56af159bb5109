use std::time::Duration;

use tracing::{info, warn};

use crate::observability::metrics::MetricSink;
use crate::parser::map_user_stats;
use crate::refresh::error_tracker::{ErrorTracker, ThresholdExceeded};
use crate::sources::oauth2::{Credentials, TokenClient};
use crate::sources::stats::{FetchError, StatsFetcher};

/// Outcome of one per-user fetch after the 401-refresh-retry policy ran.
enum UserFetch {
    Body(String),
    /// Non-fatal per-user failure, move on to the next user.
    Skip,
    /// Transport failure or repeated auth denial, stop the current pass.
    AbortCycle,
}

/// The control loop: one sequential pass over the tracked users per cycle,
/// one token owned wholesale and replaced only on a 401.
pub struct RefreshOrchestrator {
    credentials: Credentials,
    token_client: TokenClient,
    fetcher: StatsFetcher,
    sink: MetricSink,
    tracker: ErrorTracker,
    user_ids: Vec<u64>,
    token: String,
}

impl RefreshOrchestrator {
    pub fn new(
        credentials: Credentials,
        token_client: TokenClient,
        fetcher: StatsFetcher,
        sink: MetricSink,
        tracker: ErrorTracker,
        user_ids: Vec<u64>,
        initial_token: String,
    ) -> Self {
        Self {
            credentials,
            token_client,
            fetcher,
            sink,
            tracker,
            user_ids,
            token: initial_token,
        }
    }

    /// Run forever, sleeping `interval` between cycles. Returns only when
    /// the error threshold is exceeded.
    pub async fn run(mut self, interval: Duration) -> Result<(), ThresholdExceeded> {
        loop {
            self.run_cycle().await?;
            tokio::time::sleep(interval).await;
        }
    }

    /// One full pass over the tracked users. Split out from `run` so cycle
    /// semantics are testable without wall-clock sleeps.
    pub async fn run_cycle(&mut self) -> Result<(), ThresholdExceeded> {
        for user_id in self.user_ids.clone() {
            let body = match self.fetch_with_refresh(user_id).await? {
                UserFetch::Body(body) => body,
                UserFetch::Skip => continue,
                UserFetch::AbortCycle => break,
            };

            match map_user_stats(&body) {
                Ok(stats) => {
                    for (key, value) in &stats.values {
                        self.sink.record(stats.user_id, &stats.username, key, *value);
                    }
                    info!("Update for user {} ({user_id}) completed.", stats.username);
                }
                Err(e) => {
                    warn!("Skipping malformed record for user id {user_id}: {e}");
                }
            }
        }

        self.tracker.finish_cycle();
        Ok(())
    }

    /// Fetch one user, refreshing the token and retrying exactly once on a
    /// 401. Only transport failures and auth failures feed the tracker;
    /// other HTTP errors are per-user warnings.
    async fn fetch_with_refresh(&mut self, user_id: u64) -> Result<UserFetch, ThresholdExceeded> {
        let first = self.fetcher.fetch(&self.token, user_id).await;
        let retried = match first {
            Err(FetchError::Unauthorized) => {
                // Token probably invalid, refresh and retry
                warn!("Authentication failed, trying new token...");
                match self.token_client.obtain_token(&self.credentials).await {
                    Ok(token) => self.token = token,
                    Err(e) => {
                        self.tracker
                            .process_error(&format!("Token refresh failed, aborting update: {e}"))?;
                        return Ok(UserFetch::AbortCycle);
                    }
                }
                match self.fetcher.fetch(&self.token, user_id).await {
                    Err(FetchError::Unauthorized) => {
                        self.tracker.process_error(
                            "Authentication still denied after fetching new token. Aborting update.",
                        )?;
                        return Ok(UserFetch::AbortCycle);
                    }
                    other => other,
                }
            }
            other => other,
        };

        match retried {
            Ok(body) => Ok(UserFetch::Body(body)),
            Err(FetchError::Transport(e)) => {
                self.tracker
                    .process_error(&format!("Transport failure on user data request, aborting update: {e}"))?;
                Ok(UserFetch::AbortCycle)
            }
            Err(FetchError::Http { status, body }) => {
                warn!("Failed to fetch user info for user id {user_id}: {status} - {body}");
                Ok(UserFetch::Skip)
            }
            // handled above, a second 401 never reaches here
            Err(FetchError::Unauthorized) => Ok(UserFetch::AbortCycle),
        }
    }
}
