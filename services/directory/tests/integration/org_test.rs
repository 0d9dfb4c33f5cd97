use uuid::Uuid;

use ecodes_directory::error::DirectoryServiceError;
use ecodes_directory::usecase::org::{
    CreateOrgInput, CreateOrgUseCase, GetOrgUseCase, RemoveOrgUseCase, UpdateOrgInput,
    UpdateOrgUseCase,
};
use ecodes_domain::org::Department;
use ecodes_store::{DocumentStore, MemoryStore, layout};
use ecodes_testing::seed::{seed_department, seed_org};

#[tokio::test]
async fn should_create_and_fetch_org() {
    let store = MemoryStore::new();
    let (org_id, created) = CreateOrgUseCase {
        store: store.clone(),
    }
    .execute(CreateOrgInput {
        name: "St Mary".to_owned(),
        address: Some("1 Hospital Rd".to_owned()),
    })
    .await
    .unwrap();

    let fetched = GetOrgUseCase {
        store: store.clone(),
    }
    .execute(org_id)
    .await
    .unwrap();
    assert_eq!(fetched, created);
    assert!(fetched.departments_map.is_empty());
}

#[tokio::test]
async fn should_reject_duplicate_org_name() {
    let store = MemoryStore::new();
    seed_org(&store, "St Mary").await;

    let result = CreateOrgUseCase {
        store: store.clone(),
    }
    .execute(CreateOrgInput {
        name: "st mary".to_owned(),
        address: None,
    })
    .await;
    assert!(matches!(
        result,
        Err(DirectoryServiceError::NameExists {
            entity: "Organization"
        })
    ));
}

#[tokio::test]
async fn should_merge_partial_update() {
    let store = MemoryStore::new();
    let org_id = seed_org(&store, "St Mary").await;

    let org = UpdateOrgUseCase {
        store: store.clone(),
    }
    .execute(
        org_id,
        UpdateOrgInput {
            name: None,
            address: Some("2 Hospital Rd".to_owned()),
        },
    )
    .await
    .unwrap();

    assert_eq!(org.name, "St Mary");
    assert_eq!(org.address.as_deref(), Some("2 Hospital Rd"));
}

#[tokio::test]
async fn should_fail_get_of_missing_org() {
    let store = MemoryStore::new();
    let result = GetOrgUseCase {
        store: store.clone(),
    }
    .execute(Uuid::new_v4())
    .await;
    assert!(matches!(result, Err(DirectoryServiceError::OrgNotFound)));
}

#[tokio::test]
async fn should_remove_org_and_every_descendant() {
    let store = MemoryStore::new();
    let org_id = seed_org(&store, "St Mary").await;
    let dept_id = seed_department(&store, org_id, "Security").await;

    RemoveOrgUseCase {
        store: store.clone(),
    }
    .execute(org_id)
    .await
    .unwrap();

    assert!(
        store
            .get::<ecodes_domain::org::Organization>(&layout::org_doc(org_id))
            .await
            .unwrap()
            .is_none()
    );
    assert!(
        store
            .get::<Department>(&layout::department_doc(org_id, dept_id))
            .await
            .unwrap()
            .is_none()
    );
}
