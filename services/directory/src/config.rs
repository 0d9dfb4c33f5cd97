use serde::Deserialize;

use ecodes_core::config::Config;

fn default_port() -> u16 {
    3120
}

/// Directory service configuration loaded from environment variables.
#[derive(Debug, Deserialize)]
pub struct DirectoryConfig {
    /// PostgreSQL connection URL. Env var: `ECODES_DATABASE_URL`.
    pub database_url: String,
    /// TCP port for the HTTP server (default 3120). Env var: `ECODES_DIRECTORY_PORT`.
    #[serde(default = "default_port")]
    pub directory_port: u16,
}

impl Config for DirectoryConfig {}
