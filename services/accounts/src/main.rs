use std::time::Duration;

use sea_orm::Database;
use tracing::{info, warn};
use uuid::Uuid;

use ecodes_accounts::config::AccountsConfig;
use ecodes_accounts::infra::idp::HttpIdentityProvider;
use ecodes_accounts::router::build_router;
use ecodes_accounts::state::AppState;
use ecodes_accounts::usecase::reconcile::ReconcileOutboxUseCase;
use ecodes_core::config::Config;
use ecodes_core::tracing::init_tracing;
use ecodes_store::{DocPath, DocumentStore, PgStore};

#[tokio::main]
async fn main() {
    init_tracing();

    let config = AccountsConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");
    let store = PgStore::new(db);
    let provider = HttpIdentityProvider::new(&config.idp_base_url, &config.idp_api_key);

    // Periodic outbox sweep across every organization.
    let sweep = ReconcileOutboxUseCase {
        store: store.clone(),
        provider: provider.clone(),
        stale_after: chrono::Duration::seconds(config.outbox_stale_secs),
    };
    let sweep_interval = Duration::from_secs(config.outbox_sweep_secs);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(sweep_interval);
        loop {
            ticker.tick().await;
            let orgs = match sweep.store.list(&DocPath::new("orgs")).await {
                Ok(orgs) => orgs,
                Err(e) => {
                    warn!(error = %e, "outbox sweep could not list organizations");
                    continue;
                }
            };
            for (path, _) in orgs {
                let Ok(org_id) = Uuid::parse_str(path.leaf()) else {
                    continue;
                };
                match sweep.execute(org_id).await {
                    Ok(report) if report.processed + report.rolled_back > 0 => {
                        info!(
                            %org_id,
                            processed = report.processed,
                            rolled_back = report.rolled_back,
                            "outbox sweep finished"
                        );
                    }
                    Ok(_) => {}
                    Err(e) => warn!(error = %e, %org_id, "outbox sweep failed"),
                }
            }
        }
    });

    let state = AppState {
        store: store.into(),
        provider,
    };
    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.accounts_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("accounts service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
