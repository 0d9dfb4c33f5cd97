//! Store seeding helpers: build a consistent organization tree in a
//! `MemoryStore` without going through the record services.

use chrono::{TimeZone, Utc};
use uuid::Uuid;

use ecodes_domain::org::{Department, Organization};
use ecodes_store::{DocumentStore, MemoryStore, WriteBatch, layout};

/// Fixed timestamp so seeded documents compare deterministically.
pub fn seed_time() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 5, 8, 0, 0).unwrap()
}

/// Create an empty organization document and return its id.
pub async fn seed_org(store: &MemoryStore, name: &str) -> Uuid {
    let org_id = Uuid::new_v4();
    let org = Organization {
        name: name.to_owned(),
        address: None,
        departments_map: Default::default(),
        buildings_map: Default::default(),
        created_at: seed_time(),
        updated_at: seed_time(),
    };
    let mut batch = WriteBatch::new();
    batch.set(&layout::org_doc(org_id), &org).unwrap();
    batch.commit(store).await.unwrap();
    org_id
}

/// Insert a department both as a primary document and as an aggregate
/// entry, the way the record service would.
pub async fn seed_department(store: &MemoryStore, org_id: Uuid, name: &str) -> Uuid {
    let dept_id = Uuid::new_v4();
    let dept = Department {
        name: name.to_owned(),
        created_at: seed_time(),
        updated_at: seed_time(),
    };
    let mut org: Organization = store
        .get(&layout::org_doc(org_id))
        .await
        .unwrap()
        .expect("seed_org first");
    org.departments_map.insert(dept_id, dept.clone());
    let mut batch = WriteBatch::new();
    batch
        .set(&layout::department_doc(org_id, dept_id), &dept)
        .unwrap();
    batch.set(&layout::org_doc(org_id), &org).unwrap();
    batch.commit(store).await.unwrap();
    dept_id
}
