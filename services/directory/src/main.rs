use sea_orm::Database;
use tracing::info;

use ecodes_core::config::Config;
use ecodes_core::tracing::init_tracing;
use ecodes_directory::config::DirectoryConfig;
use ecodes_directory::router::build_router;
use ecodes_directory::state::AppState;
use ecodes_store::PgStore;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = DirectoryConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");
    let store = PgStore::new(db);

    let router = build_router(AppState { store: store.into() });
    let addr = format!("0.0.0.0:{}", config.directory_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("directory service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
