/// Sources module
///
/// The two upstream endpoints this exporter talks to: the OAuth2 token
/// endpoint and the per-user stats endpoint.
pub mod oauth2;
pub mod stats;
