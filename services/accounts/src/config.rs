use serde::Deserialize;

use ecodes_core::config::Config;

fn default_port() -> u16 {
    3121
}

fn default_sweep_secs() -> u64 {
    300
}

fn default_stale_secs() -> i64 {
    120
}

/// Accounts service configuration loaded from environment variables.
#[derive(Debug, Deserialize)]
pub struct AccountsConfig {
    /// PostgreSQL connection URL. Env var: `ECODES_DATABASE_URL`.
    pub database_url: String,
    /// TCP port for the HTTP server (default 3121). Env var: `ECODES_ACCOUNTS_PORT`.
    #[serde(default = "default_port")]
    pub accounts_port: u16,
    /// Base URL of the identity provider admin API. Env var: `ECODES_IDP_BASE_URL`.
    pub idp_base_url: String,
    /// Bearer token for the identity provider admin API. Env var: `ECODES_IDP_API_KEY`.
    pub idp_api_key: String,
    /// Seconds between outbox reconciliation sweeps (default 300).
    #[serde(default = "default_sweep_secs")]
    pub outbox_sweep_secs: u64,
    /// Age in seconds after which a pending outbox entry counts as stale
    /// (default 120).
    #[serde(default = "default_stale_secs")]
    pub outbox_stale_secs: i64,
}

impl Config for AccountsConfig {}
