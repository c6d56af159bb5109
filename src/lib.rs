//! # osu! statistics exporter
//!
//! Polls the osu! v2 API for per-user statistics and exposes them as
//! Prometheus gauges on a pull endpoint.
//!
//! Modules:
//! - `config` — exporter configuration and the JSON file loader
//! - `sources` — OAuth2 token client and the per-user stats fetcher
//! - `parser` — flattening a raw user record into metric values
//! - `observability` — the metric catalog, gauge sink and `/metrics` route
//! - `refresh` — the refresh loop and its error circuit breaker

pub mod config;
pub mod sources;
pub mod parser;
pub mod observability;
pub mod server;
pub mod refresh;
pub mod utils;
pub mod tests;

pub use crate::config::settings::ExporterConfig;
pub use crate::parser::map_user_stats;
