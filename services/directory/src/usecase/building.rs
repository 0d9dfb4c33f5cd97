use std::collections::BTreeMap;

use chrono::Utc;
use uuid::Uuid;

use ecodes_domain::name::ensure_unique_name;
use ecodes_domain::org::{Building, Organization};
use ecodes_store::{DocumentStore, layout, run_transaction};

use crate::error::DirectoryServiceError;
use crate::usecase::access::validate_org;

#[derive(Clone)]
pub struct BuildingInput {
    pub name: String,
}

// ── ListBuildings ────────────────────────────────────────────────────────────

pub struct ListBuildingsUseCase<S: DocumentStore> {
    pub store: S,
}

impl<S: DocumentStore> ListBuildingsUseCase<S> {
    pub async fn execute(
        &self,
        org_id: Uuid,
        cached: Option<Organization>,
    ) -> Result<BTreeMap<Uuid, Building>, DirectoryServiceError> {
        let org = validate_org(&self.store, org_id, cached).await?;
        Ok(org.map(|org| org.buildings_map).unwrap_or_default())
    }
}

// ── CreateBuilding ───────────────────────────────────────────────────────────

pub struct CreateBuildingUseCase<S: DocumentStore> {
    pub store: S,
}

impl<S: DocumentStore> CreateBuildingUseCase<S> {
    pub async fn execute(
        &self,
        org_id: Uuid,
        input: BuildingInput,
    ) -> Result<(Uuid, Building), DirectoryServiceError> {
        let building_id = Uuid::new_v4();
        let building = run_transaction(&self.store, |txn| {
            let input = input.clone();
            Box::pin(async move {
            let mut org: Organization = txn
                .get(&layout::org_doc(org_id))
                .await?
                .ok_or(DirectoryServiceError::OrgNotFound)?;
            ensure_unique_name(
                &input.name,
                None,
                org.buildings_map.iter().map(|(id, b)| (id, b.name.as_str())),
            )
            .map_err(|_| DirectoryServiceError::NameExists { entity: "Building" })?;

            let now = Utc::now();
            let building = Building {
                name: input.name.clone(),
                floors_map: BTreeMap::new(),
                created_at: now,
                updated_at: now,
            };
            org.buildings_map.insert(building_id, building.clone());
            org.updated_at = now;

            txn.set(&layout::building_doc(org_id, building_id), &building)?;
            txn.set(&layout::org_doc(org_id), &org)?;
            Ok::<_, DirectoryServiceError>(building)
        })
        })
        .await?;
        Ok((building_id, building))
    }
}

// ── UpdateBuilding ───────────────────────────────────────────────────────────

pub struct UpdateBuildingUseCase<S: DocumentStore> {
    pub store: S,
}

impl<S: DocumentStore> UpdateBuildingUseCase<S> {
    pub async fn execute(
        &self,
        org_id: Uuid,
        building_id: Uuid,
        input: BuildingInput,
    ) -> Result<Building, DirectoryServiceError> {
        run_transaction(&self.store, |txn| {
            let input = input.clone();
            Box::pin(async move {
            let mut org: Organization = txn
                .get(&layout::org_doc(org_id))
                .await?
                .ok_or(DirectoryServiceError::OrgNotFound)?;
            let existing = org
                .buildings_map
                .get(&building_id)
                .ok_or(DirectoryServiceError::BuildingNotFound)?;

            let name = if input.name == existing.name {
                existing.name.clone()
            } else {
                ensure_unique_name(
                    &input.name,
                    Some(building_id),
                    org.buildings_map.iter().map(|(id, b)| (id, b.name.as_str())),
                )
                .map_err(|_| DirectoryServiceError::NameExists { entity: "Building" })?;
                input.name.clone()
            };

            let now = Utc::now();
            let building = Building {
                name,
                floors_map: existing.floors_map.clone(),
                created_at: existing.created_at,
                updated_at: now,
            };
            org.buildings_map.insert(building_id, building.clone());
            org.updated_at = now;

            txn.set(&layout::building_doc(org_id, building_id), &building)?;
            txn.set(&layout::org_doc(org_id), &org)?;
            Ok::<_, DirectoryServiceError>(building)
        })
        })
        .await
    }
}

// ── RemoveBuilding ───────────────────────────────────────────────────────────

/// Deletes the building primary document and its aggregate entry atomically,
/// then sweeps the orphaned floor documents under it. The sweep is outside the
/// transaction and idempotent: re-running the delete finishes the job if the
/// process dies in between.
pub struct RemoveBuildingUseCase<S: DocumentStore> {
    pub store: S,
}

impl<S: DocumentStore> RemoveBuildingUseCase<S> {
    pub async fn execute(
        &self,
        org_id: Uuid,
        building_id: Uuid,
    ) -> Result<(), DirectoryServiceError> {
        run_transaction(&self.store, |txn| Box::pin(async move {
            let mut org: Organization = txn
                .get(&layout::org_doc(org_id))
                .await?
                .ok_or(DirectoryServiceError::OrgNotFound)?;
            if org.buildings_map.remove(&building_id).is_none() {
                return Err(DirectoryServiceError::BuildingNotFound);
            }
            org.updated_at = Utc::now();
            txn.delete(&layout::building_doc(org_id, building_id));
            txn.set(&layout::org_doc(org_id), &org)?;
            Ok::<_, DirectoryServiceError>(())
        }))
        .await?;

        if let Err(e) = self
            .store
            .recursive_delete(&layout::floors(org_id, building_id))
            .await
        {
            tracing::warn!(
                error = %e,
                %org_id,
                %building_id,
                "failed to sweep floor documents after building removal",
            );
        }
        Ok(())
    }
}
