use serde::Deserialize;

use reserva_core::config::Config;

fn default_auth_port() -> u16 {
    3117
}

/// Session-token lifetime default: 4 hours.
fn default_session_ttl_secs() -> u64 {
    14400
}

/// Auth service configuration loaded from environment variables.
#[derive(Debug, Deserialize)]
pub struct AuthConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// HMAC secret for signing session and pending tokens.
    pub jwt_secret: String,
    /// Mail relay base URL; codes are delivered via `POST {MAILER_URL}/send`.
    pub mailer_url: String,
    /// Web app base URL — the default post-login redirect target.
    pub web_app_url: String,
    /// TCP port to listen on (default 3117). Env var: `AUTH_PORT`.
    #[serde(default = "default_auth_port")]
    pub auth_port: u16,
    /// Session-token TTL in seconds (default 14400).
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,
}

impl Config for AuthConfig {}
