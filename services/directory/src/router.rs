use axum::{
    Router,
    routing::{delete, get, patch, post},
};
use tower_http::trace::TraceLayer;

use ecodes_core::health::{healthz, readyz};
use ecodes_core::middleware::request_id_layer;

use crate::handlers::{
    building::{create_building, delete_building, list_buildings, update_building},
    code::{create_code, delete_code, get_codes, update_code},
    department::{
        create_department, delete_department, list_department_users, list_departments,
        update_department,
    },
    floor::{create_floor, delete_floor, list_floors, update_floor},
    org::{create_org, delete_org, get_org, list_org_users, update_org},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Organizations
        .route("/orgs", post(create_org))
        .route("/orgs/{org_id}", get(get_org))
        .route("/orgs/{org_id}", patch(update_org))
        .route("/orgs/{org_id}", delete(delete_org))
        .route("/orgs/{org_id}/users", get(list_org_users))
        // Departments
        .route("/orgs/{org_id}/departments", get(list_departments))
        .route("/orgs/{org_id}/departments", post(create_department))
        .route(
            "/orgs/{org_id}/departments/{dept_id}",
            patch(update_department),
        )
        .route(
            "/orgs/{org_id}/departments/{dept_id}",
            delete(delete_department),
        )
        .route(
            "/orgs/{org_id}/departments/{dept_id}/users",
            get(list_department_users),
        )
        // Buildings
        .route("/orgs/{org_id}/buildings", get(list_buildings))
        .route("/orgs/{org_id}/buildings", post(create_building))
        .route(
            "/orgs/{org_id}/buildings/{building_id}",
            patch(update_building),
        )
        .route(
            "/orgs/{org_id}/buildings/{building_id}",
            delete(delete_building),
        )
        // Floors
        .route(
            "/orgs/{org_id}/buildings/{building_id}/floors",
            get(list_floors),
        )
        .route(
            "/orgs/{org_id}/buildings/{building_id}/floors",
            post(create_floor),
        )
        .route(
            "/orgs/{org_id}/buildings/{building_id}/floors/{floor_id}",
            patch(update_floor),
        )
        .route(
            "/orgs/{org_id}/buildings/{building_id}/floors/{floor_id}",
            delete(delete_floor),
        )
        // Codes
        .route("/orgs/{org_id}/codes", get(get_codes))
        .route("/orgs/{org_id}/codes", post(create_code))
        .route("/orgs/{org_id}/codes/{code_id}", patch(update_code))
        .route("/orgs/{org_id}/codes/{code_id}", delete(delete_code))
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}
