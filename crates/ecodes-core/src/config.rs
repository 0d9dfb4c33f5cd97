/// Env prefix shared by every service: `database_url` loads from
/// `ECODES_DATABASE_URL` and so on.
pub const ENV_PREFIX: &str = "ECODES_";

/// Trait for loading service configuration from environment variables.
///
/// Implementors should derive `serde::Deserialize` and then call
/// `Config::from_env()` to load configuration at startup.
///
/// # Panics
///
/// Panics if any required env var is missing or cannot be deserialized.
pub trait Config: Sized + serde::de::DeserializeOwned {
    fn from_env() -> Self {
        envy::prefixed(ENV_PREFIX)
            .from_env()
            .expect("failed to load config from environment")
    }
}
