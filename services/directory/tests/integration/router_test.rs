use axum_test::{TestRequest, TestServer};
use serde_json::json;
use uuid::Uuid;

use ecodes_directory::router::build_router;
use ecodes_directory::state::AppState;
use ecodes_store::MemoryStore;
use ecodes_testing::auth::MockAuth;
use ecodes_testing::seed::{seed_department, seed_org};

fn server(store: MemoryStore) -> TestServer {
    TestServer::new(build_router(AppState { store: store.into() })).unwrap()
}

fn with_auth(mut request: TestRequest, auth: &MockAuth) -> TestRequest {
    for (name, value) in auth.headers().iter() {
        request = request.add_header(name.clone(), value.clone());
    }
    request
}

#[tokio::test]
async fn should_reject_unauthenticated_requests() {
    let store = MemoryStore::new();
    let org_id = seed_org(&store, "St Mary").await;
    let server = server(store);

    let response = server.get(&format!("/orgs/{org_id}/departments")).await;
    assert_eq!(response.status_code(), 401);
}

#[tokio::test]
async fn should_let_members_read_but_not_mutate() {
    let store = MemoryStore::new();
    let org_id = seed_org(&store, "St Mary").await;
    seed_department(&store, org_id, "Security").await;
    let server = server(store);
    let member = MockAuth::member(org_id);

    let response = with_auth(server.get(&format!("/orgs/{org_id}/departments")), &member).await;
    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body.as_object().unwrap().len(), 1);

    let response = with_auth(
        server
            .post(&format!("/orgs/{org_id}/departments"))
            .json(&json!({ "name": "Radiology" })),
        &member,
    )
    .await;
    assert_eq!(response.status_code(), 403);
    let body: serde_json::Value = response.json();
    assert_eq!(body["kind"], "FORBIDDEN");
}

#[tokio::test]
async fn should_let_org_admin_create_department() {
    let store = MemoryStore::new();
    let org_id = seed_org(&store, "St Mary").await;
    let server = server(store);
    let admin = MockAuth::org_admin(org_id);

    let response = with_auth(
        server
            .post(&format!("/orgs/{org_id}/departments"))
            .json(&json!({ "name": "Radiology" })),
        &admin,
    )
    .await;
    assert_eq!(response.status_code(), 201);
    let body: serde_json::Value = response.json();
    assert_eq!(body["name"], "Radiology");
    assert!(body["id"].is_string());
    assert!(body["createdAt"].is_string());
}

#[tokio::test]
async fn should_reject_admin_of_another_org() {
    let store = MemoryStore::new();
    let org_id = seed_org(&store, "St Mary").await;
    let server = server(store);
    let foreign_admin = MockAuth::org_admin(Uuid::new_v4());

    let response = with_auth(
        server
            .post(&format!("/orgs/{org_id}/departments"))
            .json(&json!({ "name": "Radiology" })),
        &foreign_admin,
    )
    .await;
    assert_eq!(response.status_code(), 403);
}

#[tokio::test]
async fn should_surface_name_conflict_as_409() {
    let store = MemoryStore::new();
    let org_id = seed_org(&store, "St Mary").await;
    seed_department(&store, org_id, "Security").await;
    let server = server(store);
    let admin = MockAuth::org_admin(org_id);

    let response = with_auth(
        server
            .post(&format!("/orgs/{org_id}/departments"))
            .json(&json!({ "name": "security" })),
        &admin,
    )
    .await;
    assert_eq!(response.status_code(), 409);
    let body: serde_json::Value = response.json();
    assert_eq!(body["kind"], "NAME_EXISTS");
    assert_eq!(body["message"], "Department with same name already exists");
}

#[tokio::test]
async fn should_restrict_org_lifecycle_to_super_admin() {
    let store = MemoryStore::new();
    let org_id = seed_org(&store, "St Mary").await;
    let server = server(store);

    let org_admin = MockAuth::org_admin(org_id);
    let response = with_auth(
        server.post("/orgs").json(&json!({ "name": "New Site" })),
        &org_admin,
    )
    .await;
    assert_eq!(response.status_code(), 403);

    let super_admin = MockAuth::super_admin();
    let response = with_auth(
        server.post("/orgs").json(&json!({ "name": "New Site" })),
        &super_admin,
    )
    .await;
    assert_eq!(response.status_code(), 201);

    let response = with_auth(server.delete(&format!("/orgs/{org_id}")), &super_admin).await;
    assert_eq!(response.status_code(), 204);
}
