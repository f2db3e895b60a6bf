use anyhow::Context as _;

use bazaar_auth_types::cookie::SESSION_TTL_SECS;

/// Store service configuration loaded from environment variables.
#[derive(Debug)]
pub struct StoreConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// HMAC secret for signing session tokens.
    pub session_secret: String,
    /// Cookie domain attribute. Empty means host-only cookies.
    pub cookie_domain: String,
    /// TCP port to listen on (default 3000). Env var: `STORE_PORT`.
    pub store_port: u16,
    /// Session lifetime in seconds (default one week).
    pub session_ttl_secs: u64,
    /// Apply pending migrations at startup. Env var: `RUN_MIGRATIONS`.
    pub run_migrations: bool,
}

impl StoreConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            database_url: std::env::var("DATABASE_URL").context("DATABASE_URL")?,
            session_secret: std::env::var("SESSION_SECRET").context("SESSION_SECRET")?,
            cookie_domain: std::env::var("COOKIE_DOMAIN").unwrap_or_default(),
            store_port: std::env::var("STORE_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            session_ttl_secs: std::env::var("SESSION_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(SESSION_TTL_SECS),
            run_migrations: std::env::var("RUN_MIGRATIONS")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        })
    }
}
