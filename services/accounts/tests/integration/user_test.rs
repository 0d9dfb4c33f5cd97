use uuid::Uuid;

use ecodes_accounts::error::AccountsServiceError;
use ecodes_accounts::outbox::{OpStatus, PendingOp};
use ecodes_accounts::usecase::user::{CreateUserUseCase, DeleteUserUseCase, UpdateUserUseCase};
use ecodes_accounts::validate::UserPayload;
use ecodes_domain::maps::DepartmentUsersDoc;
use ecodes_domain::user::{Role, UserRecord};
use ecodes_store::{DocumentStore, MemoryStore, layout};
use ecodes_testing::seed::{seed_department, seed_org};

use crate::helpers::{MockIdentityProvider, department_payload, user_payload};

async fn outbox_entries(store: &MemoryStore, org_id: Uuid) -> Vec<PendingOp> {
    store
        .list(&layout::outbox(org_id))
        .await
        .unwrap()
        .into_iter()
        .map(|(_, doc)| serde_json::from_value(doc).unwrap())
        .collect()
}

async fn users_doc(store: &MemoryStore, org_id: Uuid) -> DepartmentUsersDoc {
    store
        .get(&layout::department_users_doc(org_id))
        .await
        .unwrap()
        .unwrap_or_default()
}

// ── CreateUser ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_provision_account_claims_record_and_map_entry() {
    let store = MemoryStore::new();
    let provider = MockIdentityProvider::new();
    let org_id = seed_org(&store, "St Mary").await;
    let dept_id = seed_department(&store, org_id, "Security").await;
    let dept = department_payload(&store, org_id, dept_id).await;

    let (uid, user) = CreateUserUseCase {
        store: store.clone(),
        provider: provider.clone(),
    }
    .execute(org_id, user_payload("a.nurse@hospital.org", "User", dept))
    .await
    .unwrap();

    assert_eq!(user.role, Role::User);
    assert_eq!(user.department.id, dept_id);

    // Provider side: account exists and carries the claims.
    let account = provider.account(uid).expect("provisioned account");
    assert_eq!(account.email, "a.nurse@hospital.org");
    let claims = account.claims.expect("claims set");
    assert_eq!(claims.org_id, org_id);
    assert!(claims.roles.user && !claims.roles.org_admin);

    // Store side: primary record, bucket entry and index agree.
    let primary: UserRecord = store
        .get(&layout::user_doc(org_id, uid))
        .await
        .unwrap()
        .expect("primary user document");
    assert_eq!(primary, user);
    let doc = users_doc(&store, org_id).await;
    assert_eq!(
        doc.department_users_map[&dept_id].users_map.get(&uid),
        Some(&user)
    );
    assert_eq!(doc.user_index.get(&uid), Some(&dept_id));

    // The outbox entry ended processed.
    let ops = outbox_entries(&store, org_id).await;
    assert_eq!(ops.len(), 1);
    assert_eq!(ops[0].status, OpStatus::Processed);
    assert_eq!(ops[0].subject, Some(uid));
}

#[tokio::test]
async fn should_map_admin_role_to_org_admin_claim() {
    let store = MemoryStore::new();
    let provider = MockIdentityProvider::new();
    let org_id = seed_org(&store, "St Mary").await;
    let dept_id = seed_department(&store, org_id, "Security").await;
    let dept = department_payload(&store, org_id, dept_id).await;

    let (uid, _) = CreateUserUseCase {
        store: store.clone(),
        provider: provider.clone(),
    }
    .execute(org_id, user_payload("boss@hospital.org", "Admin", dept))
    .await
    .unwrap();

    let claims = provider.account(uid).unwrap().claims.unwrap();
    assert!(claims.roles.org_admin);
    assert!(!claims.roles.user);
}

#[tokio::test]
async fn should_reject_invalid_role_before_any_side_effect() {
    let store = MemoryStore::new();
    let provider = MockIdentityProvider::new();
    let org_id = seed_org(&store, "St Mary").await;
    let dept_id = seed_department(&store, org_id, "Security").await;
    let dept = department_payload(&store, org_id, dept_id).await;

    let result = CreateUserUseCase {
        store: store.clone(),
        provider: provider.clone(),
    }
    .execute(
        org_id,
        user_payload("a.nurse@hospital.org", "SuperUser", dept),
    )
    .await;

    match result {
        Err(AccountsServiceError::InvalidArgument(msg)) => {
            assert_eq!(msg, "Invalid user role");
        }
        other => panic!("expected InvalidArgument, got {other:?}"),
    }
    assert!(provider.calls().is_empty(), "provider must not be touched");
    assert!(outbox_entries(&store, org_id).await.is_empty());
    assert!(users_doc(&store, org_id).await.user_index.is_empty());
}

#[tokio::test]
async fn should_reject_blank_and_malformed_fields() {
    let store = MemoryStore::new();
    let provider = MockIdentityProvider::new();
    let org_id = seed_org(&store, "St Mary").await;
    let dept_id = seed_department(&store, org_id, "Security").await;
    let usecase = CreateUserUseCase {
        store: store.clone(),
        provider: provider.clone(),
    };

    let dept = department_payload(&store, org_id, dept_id).await;
    let mut payload = user_payload("  ", "User", dept.clone());
    let result = usecase.execute(org_id, payload.clone()).await;
    assert!(
        matches!(result, Err(AccountsServiceError::InvalidArgument(ref m)) if m == "email cannot be blank")
    );

    payload.email = "Not.An.Email@Hospital".to_owned();
    let result = usecase.execute(org_id, payload.clone()).await;
    assert!(
        matches!(result, Err(AccountsServiceError::InvalidArgument(ref m)) if m == "Invalid email address")
    );

    payload.email = "a.nurse@hospital.org".to_owned();
    payload.first_name = "".to_owned();
    let result = usecase.execute(org_id, payload.clone()).await;
    assert!(
        matches!(result, Err(AccountsServiceError::InvalidArgument(ref m)) if m == "firstName cannot be blank")
    );

    payload.first_name = "Ada".to_owned();
    payload.department = None;
    let result = usecase.execute(org_id, payload).await;
    assert!(
        matches!(result, Err(AccountsServiceError::InvalidArgument(ref m)) if m == "department cannot be empty")
    );
    assert!(provider.calls().is_empty());
}

#[tokio::test]
async fn should_reject_department_whose_name_does_not_match() {
    let store = MemoryStore::new();
    let provider = MockIdentityProvider::new();
    let org_id = seed_org(&store, "St Mary").await;
    let dept_id = seed_department(&store, org_id, "Security").await;

    let mut dept = department_payload(&store, org_id, dept_id).await;
    dept.name = "Old Security".to_owned();
    let result = CreateUserUseCase {
        store: store.clone(),
        provider: provider.clone(),
    }
    .execute(org_id, user_payload("a.nurse@hospital.org", "User", dept))
    .await;

    assert!(
        matches!(result, Err(AccountsServiceError::InvalidArgument(ref m)) if m == "Invalid department or department does not exist")
    );
}

// ── UpdateUser ───────────────────────────────────────────────────────────────

async fn created_user(
    store: &MemoryStore,
    provider: &MockIdentityProvider,
    org_id: Uuid,
    dept_id: Uuid,
) -> (Uuid, UserPayload) {
    let dept = department_payload(store, org_id, dept_id).await;
    let payload = user_payload("a.nurse@hospital.org", "User", dept);
    let (uid, _) = CreateUserUseCase {
        store: store.clone(),
        provider: provider.clone(),
    }
    .execute(org_id, payload.clone())
    .await
    .unwrap();
    (uid, payload)
}

#[tokio::test]
async fn should_refuse_email_change_as_unimplemented() {
    let store = MemoryStore::new();
    let provider = MockIdentityProvider::new();
    let org_id = seed_org(&store, "St Mary").await;
    let dept_id = seed_department(&store, org_id, "Security").await;
    let (uid, mut payload) = created_user(&store, &provider, org_id, dept_id).await;

    payload.email = "new.address@hospital.org".to_owned();
    let result = UpdateUserUseCase {
        store: store.clone(),
        provider: provider.clone(),
    }
    .execute(org_id, uid, payload)
    .await;

    assert!(matches!(result, Err(AccountsServiceError::Unimplemented)));
    // The stored record kept the old address.
    let stored: UserRecord = store
        .get(&layout::user_doc(org_id, uid))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.email, "a.nurse@hospital.org");
}

#[tokio::test]
async fn should_move_user_between_department_buckets() {
    let store = MemoryStore::new();
    let provider = MockIdentityProvider::new();
    let org_id = seed_org(&store, "St Mary").await;
    let security = seed_department(&store, org_id, "Security").await;
    let radiology = seed_department(&store, org_id, "Radiology").await;
    let (uid, mut payload) = created_user(&store, &provider, org_id, security).await;

    payload.department = Some(department_payload(&store, org_id, radiology).await);
    let merged = UpdateUserUseCase {
        store: store.clone(),
        provider: provider.clone(),
    }
    .execute(org_id, uid, payload)
    .await
    .unwrap();

    assert_eq!(merged.department.id, radiology);
    let doc = users_doc(&store, org_id).await;
    assert!(
        doc.department_users_map[&security].users_map.is_empty(),
        "old bucket keeps existing but loses the entry"
    );
    assert!(
        doc.department_users_map[&radiology]
            .users_map
            .contains_key(&uid)
    );
    assert_eq!(doc.user_index.get(&uid), Some(&radiology));
}

#[tokio::test]
async fn should_update_claims_only_when_role_changes() {
    let store = MemoryStore::new();
    let provider = MockIdentityProvider::new();
    let org_id = seed_org(&store, "St Mary").await;
    let dept_id = seed_department(&store, org_id, "Security").await;
    let (uid, payload) = created_user(&store, &provider, org_id, dept_id).await;

    // Same role: no further set_claims beyond the one from create.
    let before = provider
        .calls()
        .iter()
        .filter(|c| *c == "set_claims")
        .count();
    UpdateUserUseCase {
        store: store.clone(),
        provider: provider.clone(),
    }
    .execute(org_id, uid, payload.clone())
    .await
    .unwrap();
    let after = provider
        .calls()
        .iter()
        .filter(|c| *c == "set_claims")
        .count();
    assert_eq!(before, after);

    // Role change rewrites the claims.
    let mut promoted = payload;
    promoted.role = "RotaAdmin".to_owned();
    UpdateUserUseCase {
        store: store.clone(),
        provider: provider.clone(),
    }
    .execute(org_id, uid, promoted)
    .await
    .unwrap();
    let claims = provider.account(uid).unwrap().claims.unwrap();
    assert!(claims.roles.rota_admin);
    assert!(!claims.roles.user);
}

#[tokio::test]
async fn should_keep_phone_number_when_omitted() {
    let store = MemoryStore::new();
    let provider = MockIdentityProvider::new();
    let org_id = seed_org(&store, "St Mary").await;
    let dept_id = seed_department(&store, org_id, "Security").await;
    let dept = department_payload(&store, org_id, dept_id).await;

    let mut payload = user_payload("a.nurse@hospital.org", "User", dept);
    payload.phone_number = Some("+441234567890".to_owned());
    let (uid, _) = CreateUserUseCase {
        store: store.clone(),
        provider: provider.clone(),
    }
    .execute(org_id, payload.clone())
    .await
    .unwrap();

    payload.phone_number = None;
    let merged = UpdateUserUseCase {
        store: store.clone(),
        provider: provider.clone(),
    }
    .execute(org_id, uid, payload)
    .await
    .unwrap();
    assert_eq!(merged.phone_number.as_deref(), Some("+441234567890"));
}

#[tokio::test]
async fn should_reject_update_of_unknown_subject() {
    let store = MemoryStore::new();
    let provider = MockIdentityProvider::new();
    let org_id = seed_org(&store, "St Mary").await;
    let dept_id = seed_department(&store, org_id, "Security").await;
    let dept = department_payload(&store, org_id, dept_id).await;

    let result = UpdateUserUseCase {
        store: store.clone(),
        provider: provider.clone(),
    }
    .execute(
        org_id,
        Uuid::new_v4(),
        user_payload("a.nurse@hospital.org", "User", dept),
    )
    .await;
    assert!(
        matches!(result, Err(AccountsServiceError::InvalidArgument(ref m)) if m == "Invalid user id")
    );
}

// ── DeleteUser ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_delete_account_record_and_map_entry() {
    let store = MemoryStore::new();
    let provider = MockIdentityProvider::new();
    let org_id = seed_org(&store, "St Mary").await;
    let dept_id = seed_department(&store, org_id, "Security").await;
    let (uid, _) = created_user(&store, &provider, org_id, dept_id).await;

    DeleteUserUseCase {
        store: store.clone(),
        provider: provider.clone(),
    }
    .execute(org_id, uid)
    .await
    .unwrap();

    assert!(provider.account(uid).is_none());
    assert!(
        store
            .get::<UserRecord>(&layout::user_doc(org_id, uid))
            .await
            .unwrap()
            .is_none()
    );
    let doc = users_doc(&store, org_id).await;
    assert!(doc.user_index.get(&uid).is_none());
    // The emptied bucket itself survives.
    assert!(doc.department_users_map.contains_key(&dept_id));
}

#[tokio::test]
async fn should_reject_delete_of_unknown_subject() {
    let store = MemoryStore::new();
    let provider = MockIdentityProvider::new();
    let org_id = seed_org(&store, "St Mary").await;

    let result = DeleteUserUseCase {
        store: store.clone(),
        provider: provider.clone(),
    }
    .execute(org_id, Uuid::new_v4())
    .await;
    assert!(
        matches!(result, Err(AccountsServiceError::InvalidArgument(ref m)) if m == "Invalid user id")
    );
}
