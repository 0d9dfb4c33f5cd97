use axum_test::{TestRequest, TestServer};
use serde_json::json;
use uuid::Uuid;

use ecodes_accounts::infra::idp::HttpIdentityProvider;
use ecodes_accounts::router::build_router;
use ecodes_accounts::state::AppState;
use ecodes_store::MemoryStore;
use ecodes_testing::auth::MockAuth;
use ecodes_testing::seed::seed_org;

// The provider base URL is never contacted: every request below is
// rejected by the access check or payload validation first.
fn server(store: MemoryStore) -> TestServer {
    let state = AppState {
        store: store.into(),
        provider: HttpIdentityProvider::new("http://127.0.0.1:9", "test-key"),
    };
    TestServer::new(build_router(state)).unwrap()
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

    let response = server
        .post(&format!("/orgs/{org_id}/users"))
        .json(&json!({}))
        .await;
    assert_eq!(response.status_code(), 401);
}

#[tokio::test]
async fn should_deny_members_and_foreign_admins() {
    let store = MemoryStore::new();
    let org_id = seed_org(&store, "St Mary").await;
    let server = server(store);

    let member = MockAuth::member(org_id);
    let response = with_auth(
        server.post(&format!("/orgs/{org_id}/users")).json(&json!({})),
        &member,
    )
    .await;
    assert_eq!(response.status_code(), 403);
    let body: serde_json::Value = response.json();
    assert_eq!(body["kind"], "ACCESS_DENIED");

    let foreign_admin = MockAuth::org_admin(Uuid::new_v4());
    let response = with_auth(
        server
            .delete(&format!("/orgs/{org_id}/users/{}", Uuid::new_v4()))
            .json(&json!({})),
        &foreign_admin,
    )
    .await;
    assert_eq!(response.status_code(), 403);
}

#[tokio::test]
async fn should_surface_validation_failure_as_400() {
    let store = MemoryStore::new();
    let org_id = seed_org(&store, "St Mary").await;
    let server = server(store);
    let admin = MockAuth::org_admin(org_id);

    let response = with_auth(
        server
            .post(&format!("/orgs/{org_id}/users"))
            .json(&json!({ "firstName": "Ada", "lastName": "Shaw", "role": "User" })),
        &admin,
    )
    .await;
    assert_eq!(response.status_code(), 400);
    let body: serde_json::Value = response.json();
    assert_eq!(body["kind"], "INVALID_ARGUMENT");
    assert_eq!(body["message"], "email cannot be blank");
}
