use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter applied when `RUST_LOG` is not set. sqlx statement logging is
/// noisy at `info` and gets demoted.
const DEFAULT_FILTER: &str = "info,sqlx=warn";

/// Initialize structured JSON tracing on stdout. Call once at service
/// startup; `RUST_LOG` overrides [`DEFAULT_FILTER`].
///
/// Safe to call multiple times — subsequent calls are silently ignored.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json())
        .try_init();
}
