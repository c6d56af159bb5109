use http::StatusCode;
use reqwest::Client;
use thiserror::Error;

/// Classified failure of a single per-user stats request.
///
/// The orchestrator reacts to each variant differently: `Unauthorized`
/// triggers a one-shot token refresh, `Http` skips the user, `Transport`
/// aborts the whole cycle.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("authentication rejected (401)")]
    Unauthorized,
    #[error("stats request returned {status}: {body}")]
    Http { status: StatusCode, body: String },
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Debug, Clone)]
pub struct StatsFetcher {
    base_url: String,
    client: Client,
}

impl StatsFetcher {
    pub fn new(base_url: &str, client: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// One bearer-authenticated read for one user. `key=id` pins the lookup
    /// to numeric ids so an all-digit username cannot shadow another player.
    /// Returns the raw 200 body; decoding is the parser's job.
    pub async fn fetch(&self, token: &str, user_id: u64) -> Result<String, FetchError> {
        let response = self
            .client
            .get(format!("{}/api/v2/users/{}/osu", self.base_url, user_id))
            .bearer_auth(token)
            .query(&[("key", "id")])
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(FetchError::Unauthorized);
        }

        let body = response.text().await?;
        if status != StatusCode::OK {
            return Err(FetchError::Http { status, body });
        }
        Ok(body)
    }
}
