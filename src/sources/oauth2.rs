use reqwest::Client;
use serde_json::json;
use thiserror::Error;

/// Service credentials for the client-credentials grant. Loaded once from
/// config, never mutated.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

#[derive(Debug, Error)]
#[error("failed to obtain token: {0}")]
pub struct AuthenticationError(pub String);

#[derive(Debug, Clone)]
pub struct TokenClient {
    base_url: String,
    client: Client,
}

impl TokenClient {
    pub fn new(base_url: &str, client: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Exchange the service credentials for a bearer token. No internal
    /// retry; the caller decides whether a failure is fatal.
    pub async fn obtain_token(
        &self,
        credentials: &Credentials,
    ) -> Result<String, AuthenticationError> {
        let response = self
            .client
            .post(format!("{}/oauth/token", self.base_url))
            .json(&json!({
                "client_id": credentials.client_id,
                "client_secret": credentials.client_secret,
                "grant_type": "client_credentials",
                "scope": "public",
            }))
            .send()
            .await
            .map_err(|e| AuthenticationError(format!("token request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AuthenticationError(format!(
                "token endpoint returned {}",
                response.status()
            )));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AuthenticationError(format!("invalid token response body: {e}")))?;

        body.get("access_token")
            .and_then(|v| v.as_str())
            .map(str::to_owned)
            .ok_or_else(|| AuthenticationError("response is missing 'access_token'".to_string()))
    }
}
