use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::config::settings::ExporterConfig;

/// Read and validate the JSON config file. Any failure here is a startup
/// failure and the process exits non-zero.
pub fn load_config(config_path: &str) -> Result<ExporterConfig> {
    let path = Path::new(config_path);
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", config_path))?;
    let config: ExporterConfig = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid config format in '{}'", config_path))?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &ExporterConfig) -> Result<()> {
    if config.client_id.trim().is_empty() {
        bail!("'client_id' must not be empty");
    }
    if config.client_secret.trim().is_empty() {
        bail!("'client_secret' must not be empty");
    }
    if config.user_ids.is_empty() {
        bail!("'user_ids' must contain at least one user id");
    }
    if config.refresh_interval_seconds == 0 {
        bail!("'refresh_interval_seconds' must be positive");
    }
    Ok(())
}
