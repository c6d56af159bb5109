use serde::Deserialize;

/// ================================
/// Exporter configuration
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct ExporterConfig {
    pub client_id: String,
    pub client_secret: String,
    /// Ordered polling universe, fixed for the process lifetime.
    pub user_ids: Vec<u64>,
    pub refresh_interval_seconds: u64,
    pub port: u16,
    #[serde(default = "default_host")]
    pub host: String,
    /// Consecutive intervals-with-errors tolerated before the process exits.
    #[serde(default)]
    pub max_intervals_with_errors: u32,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    pub logging: Option<LoggingConfig>,
}

/// ================================
/// Logging
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String, // allowed: trace, debug, info, warn, error
    pub format: LogFormat,
}

impl LoggingConfig {
    pub fn new(level: String, format: LogFormat) -> Self {
        Self { level, format }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Compact,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_api_base_url() -> String {
    "https://osu.ppy.sh".to_string()
}
