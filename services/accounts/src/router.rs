use axum::{
    Router,
    routing::{delete, get, patch, post},
};
use tower_http::trace::TraceLayer;

use ecodes_core::health::{healthz, readyz};
use ecodes_core::middleware::request_id_layer;

use crate::handlers::user::{create_user, delete_user, update_user};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Users
        .route("/orgs/{org_id}/users", post(create_user))
        .route("/orgs/{org_id}/users/{user_id}", patch(update_user))
        .route(
            "/orgs/{org_id}/users/{user_id}",
            delete(delete_user),
        )
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}
