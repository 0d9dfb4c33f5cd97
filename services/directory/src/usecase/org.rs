use std::collections::BTreeMap;

use chrono::Utc;
use uuid::Uuid;

use ecodes_domain::org::Organization;
use ecodes_domain::user::UserRecord;
use ecodes_store::{DocPath, DocumentStore, WriteBatch, layout, run_transaction};

use crate::error::DirectoryServiceError;
use crate::usecase::access::{validate_department_users, validate_org};

pub struct CreateOrgInput {
    pub name: String,
    pub address: Option<String>,
}

#[derive(Clone)]
pub struct UpdateOrgInput {
    pub name: Option<String>,
    pub address: Option<String>,
}

// ── GetOrg ───────────────────────────────────────────────────────────────────

pub struct GetOrgUseCase<S: DocumentStore> {
    pub store: S,
}

impl<S: DocumentStore> GetOrgUseCase<S> {
    pub async fn execute(&self, org_id: Uuid) -> Result<Organization, DirectoryServiceError> {
        validate_org(&self.store, org_id, None)
            .await?
            .ok_or(DirectoryServiceError::OrgNotFound)
    }
}

// ── CreateOrg ────────────────────────────────────────────────────────────────

/// Organizations are root documents, so name uniqueness is checked against a
/// listing of the `orgs` collection rather than a parent aggregate.
pub struct CreateOrgUseCase<S: DocumentStore> {
    pub store: S,
}

impl<S: DocumentStore> CreateOrgUseCase<S> {
    pub async fn execute(
        &self,
        input: CreateOrgInput,
    ) -> Result<(Uuid, Organization), DirectoryServiceError> {
        let wanted = input.name.to_lowercase();
        for (_, doc) in self.store.list(&DocPath::new("orgs")).await? {
            let existing: Organization = serde_json::from_value(doc)
                .map_err(|e| DirectoryServiceError::Internal(e.into()))?;
            if existing.name.to_lowercase() == wanted {
                return Err(DirectoryServiceError::NameExists {
                    entity: "Organization",
                });
            }
        }

        let now = Utc::now();
        let org = Organization {
            name: input.name,
            address: input.address,
            departments_map: BTreeMap::new(),
            buildings_map: BTreeMap::new(),
            created_at: now,
            updated_at: now,
        };
        let org_id = Uuid::new_v4();
        let mut batch = WriteBatch::new();
        batch.set(&layout::org_doc(org_id), &org)?;
        batch.commit(&self.store).await?;
        Ok((org_id, org))
    }
}

// ── UpdateOrg ────────────────────────────────────────────────────────────────

pub struct UpdateOrgUseCase<S: DocumentStore> {
    pub store: S,
}

impl<S: DocumentStore> UpdateOrgUseCase<S> {
    pub async fn execute(
        &self,
        org_id: Uuid,
        input: UpdateOrgInput,
    ) -> Result<Organization, DirectoryServiceError> {
        run_transaction(&self.store, |txn| {
            let input = input.clone();
            Box::pin(async move {
            let mut org: Organization = txn
                .get(&layout::org_doc(org_id))
                .await?
                .ok_or(DirectoryServiceError::OrgNotFound)?;
            if let Some(name) = &input.name {
                org.name = name.clone();
            }
            if let Some(address) = &input.address {
                org.address = Some(address.clone());
            }
            org.updated_at = Utc::now();
            txn.set(&layout::org_doc(org_id), &org)?;
            Ok::<_, DirectoryServiceError>(org)
        })
        })
        .await
    }
}

// ── RemoveOrg ────────────────────────────────────────────────────────────────

/// Deletes the organization document and everything under it: departments,
/// buildings, floors, users, map documents and outbox entries.
pub struct RemoveOrgUseCase<S: DocumentStore> {
    pub store: S,
}

impl<S: DocumentStore> RemoveOrgUseCase<S> {
    pub async fn execute(&self, org_id: Uuid) -> Result<(), DirectoryServiceError> {
        self.store.recursive_delete(&layout::org_doc(org_id)).await?;
        Ok(())
    }
}

// ── ListOrgUsers ─────────────────────────────────────────────────────────────

/// Every user in the organization, flattened from the departmentUsers map.
pub struct ListOrgUsersUseCase<S: DocumentStore> {
    pub store: S,
}

impl<S: DocumentStore> ListOrgUsersUseCase<S> {
    pub async fn execute(
        &self,
        org_id: Uuid,
    ) -> Result<BTreeMap<Uuid, UserRecord>, DirectoryServiceError> {
        let doc = validate_department_users(&self.store, org_id, None).await?;
        Ok(doc
            .all_users()
            .into_iter()
            .map(|(uid, user)| (uid, user.clone()))
            .collect())
    }
}
