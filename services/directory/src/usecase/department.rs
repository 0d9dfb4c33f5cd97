use std::collections::BTreeMap;

use chrono::Utc;
use uuid::Uuid;

use ecodes_domain::maps::DepartmentUsersDoc;
use ecodes_domain::name::ensure_unique_name;
use ecodes_domain::org::{Department, Organization};
use ecodes_domain::user::UserRecord;
use ecodes_store::{DocumentStore, layout, run_transaction};

use crate::error::DirectoryServiceError;
use crate::usecase::access::{validate_department_users, validate_org};

#[derive(Clone)]
pub struct DepartmentInput {
    pub name: String,
}

// ── ListDepartments ──────────────────────────────────────────────────────────

pub struct ListDepartmentsUseCase<S: DocumentStore> {
    pub store: S,
}

impl<S: DocumentStore> ListDepartmentsUseCase<S> {
    pub async fn execute(
        &self,
        org_id: Uuid,
        cached: Option<Organization>,
    ) -> Result<BTreeMap<Uuid, Department>, DirectoryServiceError> {
        let org = validate_org(&self.store, org_id, cached).await?;
        Ok(org.map(|org| org.departments_map).unwrap_or_default())
    }
}

// ── CreateDepartment ─────────────────────────────────────────────────────────

/// Writes the primary department document and the parent aggregate's
/// `departmentsMap` entry in one atomic commit.
pub struct CreateDepartmentUseCase<S: DocumentStore> {
    pub store: S,
}

impl<S: DocumentStore> CreateDepartmentUseCase<S> {
    pub async fn execute(
        &self,
        org_id: Uuid,
        input: DepartmentInput,
    ) -> Result<(Uuid, Department), DirectoryServiceError> {
        let dept_id = Uuid::new_v4();
        let dept = run_transaction(&self.store, |txn| {
            let input = input.clone();
            Box::pin(async move {
            let mut org: Organization = txn
                .get(&layout::org_doc(org_id))
                .await?
                .ok_or(DirectoryServiceError::OrgNotFound)?;
            ensure_unique_name(
                &input.name,
                None,
                org.departments_map
                    .iter()
                    .map(|(id, d)| (id, d.name.as_str())),
            )
            .map_err(|_| DirectoryServiceError::NameExists {
                entity: "Department",
            })?;

            let now = Utc::now();
            let dept = Department {
                name: input.name.clone(),
                created_at: now,
                updated_at: now,
            };
            org.departments_map.insert(dept_id, dept.clone());
            org.updated_at = now;

            txn.set(&layout::department_doc(org_id, dept_id), &dept)?;
            txn.set(&layout::org_doc(org_id), &org)?;
            Ok::<_, DirectoryServiceError>(dept)
        })
        })
        .await?;
        Ok((dept_id, dept))
    }
}

// ── UpdateDepartment ─────────────────────────────────────────────────────────

pub struct UpdateDepartmentUseCase<S: DocumentStore> {
    pub store: S,
}

impl<S: DocumentStore> UpdateDepartmentUseCase<S> {
    pub async fn execute(
        &self,
        org_id: Uuid,
        dept_id: Uuid,
        input: DepartmentInput,
    ) -> Result<Department, DirectoryServiceError> {
        run_transaction(&self.store, |txn| {
            let input = input.clone();
            Box::pin(async move {
            let mut org: Organization = txn
                .get(&layout::org_doc(org_id))
                .await?
                .ok_or(DirectoryServiceError::OrgNotFound)?;
            let existing = org
                .departments_map
                .get(&dept_id)
                .ok_or(DirectoryServiceError::DepartmentNotFound)?;

            // An unchanged name never conflicts with itself and is not
            // rewritten, only the timestamps move.
            let name = if input.name == existing.name {
                existing.name.clone()
            } else {
                ensure_unique_name(
                    &input.name,
                    Some(dept_id),
                    org.departments_map
                        .iter()
                        .map(|(id, d)| (id, d.name.as_str())),
                )
                .map_err(|_| DirectoryServiceError::NameExists {
                    entity: "Department",
                })?;
                input.name.clone()
            };

            let now = Utc::now();
            let dept = Department {
                name,
                created_at: existing.created_at,
                updated_at: now,
            };
            org.departments_map.insert(dept_id, dept.clone());
            org.updated_at = now;

            txn.set(&layout::department_doc(org_id, dept_id), &dept)?;
            txn.set(&layout::org_doc(org_id), &org)?;
            Ok::<_, DirectoryServiceError>(dept)
        })
        })
        .await
    }
}

// ── RemoveDepartment ─────────────────────────────────────────────────────────

/// Refuses to remove a department that still has users bucketed under it in
/// the departmentUsers map. The check runs inside the same transaction as the
/// delete, so a concurrent user assignment forces a retry rather than leaving
/// a dangling bucket.
pub struct RemoveDepartmentUseCase<S: DocumentStore> {
    pub store: S,
}

impl<S: DocumentStore> RemoveDepartmentUseCase<S> {
    pub async fn execute(&self, org_id: Uuid, dept_id: Uuid) -> Result<(), DirectoryServiceError> {
        run_transaction(&self.store, |txn| Box::pin(async move {
            let mut org: Organization = txn
                .get(&layout::org_doc(org_id))
                .await?
                .ok_or(DirectoryServiceError::OrgNotFound)?;
            if !org.departments_map.contains_key(&dept_id) {
                return Err(DirectoryServiceError::DepartmentNotFound);
            }

            let mut users_doc: DepartmentUsersDoc = txn
                .get(&layout::department_users_doc(org_id))
                .await?
                .unwrap_or_default();
            if users_doc.users_in_department(dept_id) > 0 {
                return Err(DirectoryServiceError::DepartmentInUse);
            }

            org.departments_map.remove(&dept_id);
            org.updated_at = Utc::now();
            txn.delete(&layout::department_doc(org_id, dept_id));
            txn.set(&layout::org_doc(org_id), &org)?;
            // Drop the (empty) bucket so the map does not accumulate entries
            // for departments that no longer exist.
            if users_doc.department_users_map.remove(&dept_id).is_some() {
                txn.set(&layout::department_users_doc(org_id), &users_doc)?;
            }
            Ok::<_, DirectoryServiceError>(())
        }))
        .await
    }
}

// ── ListDepartmentUsers ──────────────────────────────────────────────────────

/// Users currently assigned to one department, straight out of the
/// departmentUsers map document.
pub struct ListDepartmentUsersUseCase<S: DocumentStore> {
    pub store: S,
}

impl<S: DocumentStore> ListDepartmentUsersUseCase<S> {
    pub async fn execute(
        &self,
        org_id: Uuid,
        dept_id: Uuid,
    ) -> Result<BTreeMap<Uuid, UserRecord>, DirectoryServiceError> {
        let doc = validate_department_users(&self.store, org_id, None).await?;
        Ok(doc
            .department_users_map
            .get(&dept_id)
            .map(|bucket| bucket.users_map.clone())
            .unwrap_or_default())
    }
}
