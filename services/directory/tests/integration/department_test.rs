use std::collections::BTreeMap;

use uuid::Uuid;

use ecodes_directory::error::DirectoryServiceError;
use ecodes_directory::usecase::department::{
    CreateDepartmentUseCase, DepartmentInput, ListDepartmentsUseCase, RemoveDepartmentUseCase,
    UpdateDepartmentUseCase,
};
use ecodes_domain::maps::{DepartmentBucket, DepartmentUsersDoc};
use ecodes_domain::org::Organization;
use ecodes_domain::user::{DepartmentRef, Role, UserRecord};
use ecodes_store::{DocumentStore, MemoryStore, WriteBatch, layout};
use ecodes_testing::seed::{seed_department, seed_org, seed_time};

fn input(name: &str) -> DepartmentInput {
    DepartmentInput {
        name: name.to_owned(),
    }
}

async fn org_doc(store: &MemoryStore, org_id: Uuid) -> Organization {
    store
        .get(&layout::org_doc(org_id))
        .await
        .unwrap()
        .expect("org document")
}

// ── CreateDepartment ─────────────────────────────────────────────────────────

#[tokio::test]
async fn should_write_primary_document_and_aggregate_entry_together() {
    let store = MemoryStore::new();
    let org_id = seed_org(&store, "St Mary").await;

    let (dept_id, dept) = CreateDepartmentUseCase {
        store: store.clone(),
    }
    .execute(org_id, input("Radiology"))
    .await
    .unwrap();

    assert_eq!(dept.name, "Radiology");
    assert_eq!(dept.created_at, dept.updated_at);

    let primary: ecodes_domain::org::Department = store
        .get(&layout::department_doc(org_id, dept_id))
        .await
        .unwrap()
        .expect("primary department document");
    let org = org_doc(&store, org_id).await;
    assert_eq!(primary, dept);
    assert_eq!(org.departments_map.get(&dept_id), Some(&dept));
}

#[tokio::test]
async fn should_reject_duplicate_name_case_insensitively() {
    let store = MemoryStore::new();
    let org_id = seed_org(&store, "St Mary").await;
    seed_department(&store, org_id, "Security").await;

    let result = CreateDepartmentUseCase {
        store: store.clone(),
    }
    .execute(org_id, input("sEcUrItY"))
    .await;

    assert!(
        matches!(
            result,
            Err(DirectoryServiceError::NameExists {
                entity: "Department"
            })
        ),
        "expected NameExists, got {result:?}"
    );
    // Nothing was written.
    let org = org_doc(&store, org_id).await;
    assert_eq!(org.departments_map.len(), 1);
}

#[tokio::test]
async fn should_reject_create_under_missing_org() {
    let store = MemoryStore::new();
    let result = CreateDepartmentUseCase {
        store: store.clone(),
    }
    .execute(Uuid::new_v4(), input("Radiology"))
    .await;
    assert!(matches!(result, Err(DirectoryServiceError::OrgNotFound)));
}

// ── UpdateDepartment ─────────────────────────────────────────────────────────

#[tokio::test]
async fn should_keep_name_when_rename_targets_own_name() {
    let store = MemoryStore::new();
    let org_id = seed_org(&store, "St Mary").await;
    let dept_id = seed_department(&store, org_id, "Security").await;

    let dept = UpdateDepartmentUseCase {
        store: store.clone(),
    }
    .execute(org_id, dept_id, input("Security"))
    .await
    .unwrap();

    assert_eq!(dept.name, "Security");
    assert_eq!(dept.created_at, seed_time());
    assert!(dept.updated_at > dept.created_at);
}

#[tokio::test]
async fn should_reject_rename_onto_sibling_name() {
    let store = MemoryStore::new();
    let org_id = seed_org(&store, "St Mary").await;
    seed_department(&store, org_id, "Security").await;
    let dept_id = seed_department(&store, org_id, "Radiology").await;

    let result = UpdateDepartmentUseCase {
        store: store.clone(),
    }
    .execute(org_id, dept_id, input("SECURITY"))
    .await;

    assert!(matches!(
        result,
        Err(DirectoryServiceError::NameExists { .. })
    ));
}

#[tokio::test]
async fn should_fail_update_of_unknown_department() {
    let store = MemoryStore::new();
    let org_id = seed_org(&store, "St Mary").await;

    let result = UpdateDepartmentUseCase {
        store: store.clone(),
    }
    .execute(org_id, Uuid::new_v4(), input("Security"))
    .await;

    assert!(matches!(
        result,
        Err(DirectoryServiceError::DepartmentNotFound)
    ));
}

// ── RemoveDepartment ─────────────────────────────────────────────────────────

fn test_user(dept_id: Uuid) -> UserRecord {
    UserRecord {
        email: "nurse@hospital.org".to_owned(),
        first_name: "Ada".to_owned(),
        last_name: "Nurse".to_owned(),
        phone_number: None,
        job_title: None,
        role: Role::User,
        department: DepartmentRef {
            id: dept_id,
            name: "Security".to_owned(),
        },
        created_at: seed_time(),
        updated_at: seed_time(),
    }
}

async fn seed_bucket(store: &MemoryStore, org_id: Uuid, dept_id: Uuid, users: Vec<UserRecord>) {
    let mut doc = DepartmentUsersDoc::default();
    let mut users_map = BTreeMap::new();
    let mut index = BTreeMap::new();
    for user in users {
        let uid = Uuid::new_v4();
        index.insert(uid, dept_id);
        users_map.insert(uid, user);
    }
    doc.department_users_map.insert(
        dept_id,
        DepartmentBucket {
            name: "Security".to_owned(),
            users_map,
        },
    );
    doc.user_index = index;
    let mut batch = WriteBatch::new();
    batch
        .set(&layout::department_users_doc(org_id), &doc)
        .unwrap();
    batch.commit(store).await.unwrap();
}

#[tokio::test]
async fn should_refuse_removal_while_users_are_assigned() {
    let store = MemoryStore::new();
    let org_id = seed_org(&store, "St Mary").await;
    let dept_id = seed_department(&store, org_id, "Security").await;
    seed_bucket(&store, org_id, dept_id, vec![test_user(dept_id)]).await;

    let result = RemoveDepartmentUseCase {
        store: store.clone(),
    }
    .execute(org_id, dept_id)
    .await;

    assert!(matches!(
        result,
        Err(DirectoryServiceError::DepartmentInUse)
    ));
    // Both the primary document and the aggregate entry survive.
    assert!(
        store
            .get::<ecodes_domain::org::Department>(&layout::department_doc(org_id, dept_id))
            .await
            .unwrap()
            .is_some()
    );
    assert!(
        org_doc(&store, org_id)
            .await
            .departments_map
            .contains_key(&dept_id)
    );
}

#[tokio::test]
async fn should_remove_department_and_its_empty_bucket() {
    let store = MemoryStore::new();
    let org_id = seed_org(&store, "St Mary").await;
    let dept_id = seed_department(&store, org_id, "Security").await;
    seed_bucket(&store, org_id, dept_id, vec![]).await;

    RemoveDepartmentUseCase {
        store: store.clone(),
    }
    .execute(org_id, dept_id)
    .await
    .unwrap();

    assert!(
        store
            .get::<ecodes_domain::org::Department>(&layout::department_doc(org_id, dept_id))
            .await
            .unwrap()
            .is_none()
    );
    assert!(
        !org_doc(&store, org_id)
            .await
            .departments_map
            .contains_key(&dept_id)
    );
    let doc: DepartmentUsersDoc = store
        .get(&layout::department_users_doc(org_id))
        .await
        .unwrap()
        .unwrap();
    assert!(!doc.department_users_map.contains_key(&dept_id));
}

// ── ListDepartments ──────────────────────────────────────────────────────────

#[tokio::test]
async fn should_list_from_cached_aggregate_without_store_hit() {
    let store = MemoryStore::new();
    let org_id = seed_org(&store, "St Mary").await;
    let dept_id = seed_department(&store, org_id, "Security").await;

    // The cached copy wins even if it disagrees with the store.
    let mut cached = org_doc(&store, org_id).await;
    cached.departments_map.clear();

    let listed = ListDepartmentsUseCase {
        store: store.clone(),
    }
    .execute(org_id, Some(cached))
    .await
    .unwrap();
    assert!(listed.is_empty());

    let listed = ListDepartmentsUseCase {
        store: store.clone(),
    }
    .execute(org_id, None)
    .await
    .unwrap();
    assert!(listed.contains_key(&dept_id));
}

#[tokio::test]
async fn should_list_empty_for_missing_org() {
    let store = MemoryStore::new();
    let listed = ListDepartmentsUseCase {
        store: store.clone(),
    }
    .execute(Uuid::new_v4(), None)
    .await
    .unwrap();
    assert!(listed.is_empty());
}
