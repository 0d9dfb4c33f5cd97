use std::collections::BTreeMap;

use chrono::Utc;
use uuid::Uuid;

use ecodes_domain::name::ensure_unique_name;
use ecodes_domain::org::{Floor, Organization};
use ecodes_store::{DocumentStore, layout, run_transaction};

use crate::error::DirectoryServiceError;
use crate::usecase::access::validate_org;

#[derive(Clone)]
pub struct FloorInput {
    pub name: String,
}

// ── ListFloors ───────────────────────────────────────────────────────────────

pub struct ListFloorsUseCase<S: DocumentStore> {
    pub store: S,
}

impl<S: DocumentStore> ListFloorsUseCase<S> {
    pub async fn execute(
        &self,
        org_id: Uuid,
        building_id: Uuid,
        cached: Option<Organization>,
    ) -> Result<BTreeMap<Uuid, Floor>, DirectoryServiceError> {
        let org = validate_org(&self.store, org_id, cached)
            .await?
            .ok_or(DirectoryServiceError::OrgNotFound)?;
        let building = org
            .buildings_map
            .get(&building_id)
            .ok_or(DirectoryServiceError::BuildingNotFound)?;
        Ok(building.floors_map.clone())
    }
}

// ── CreateFloor ──────────────────────────────────────────────────────────────

/// Floors live under their building: the primary floor document, the parent
/// building document's `floorsMap`, and the organization aggregate all change
/// in one commit.
pub struct CreateFloorUseCase<S: DocumentStore> {
    pub store: S,
}

impl<S: DocumentStore> CreateFloorUseCase<S> {
    pub async fn execute(
        &self,
        org_id: Uuid,
        building_id: Uuid,
        input: FloorInput,
    ) -> Result<(Uuid, Floor), DirectoryServiceError> {
        let floor_id = Uuid::new_v4();
        let floor = run_transaction(&self.store, |txn| {
            let input = input.clone();
            Box::pin(async move {
            let mut org: Organization = txn
                .get(&layout::org_doc(org_id))
                .await?
                .ok_or(DirectoryServiceError::OrgNotFound)?;
            let building = org
                .buildings_map
                .get_mut(&building_id)
                .ok_or(DirectoryServiceError::BuildingNotFound)?;
            ensure_unique_name(
                &input.name,
                None,
                building.floors_map.iter().map(|(id, f)| (id, f.name.as_str())),
            )
            .map_err(|_| DirectoryServiceError::NameExists { entity: "Floor" })?;

            let now = Utc::now();
            let floor = Floor {
                name: input.name.clone(),
                created_at: now,
                updated_at: now,
            };
            building.floors_map.insert(floor_id, floor.clone());
            building.updated_at = now;
            let building = building.clone();
            org.updated_at = now;

            txn.set(&layout::floor_doc(org_id, building_id, floor_id), &floor)?;
            txn.set(&layout::building_doc(org_id, building_id), &building)?;
            txn.set(&layout::org_doc(org_id), &org)?;
            Ok::<_, DirectoryServiceError>(floor)
        })
        })
        .await?;
        Ok((floor_id, floor))
    }
}

// ── UpdateFloor ──────────────────────────────────────────────────────────────

pub struct UpdateFloorUseCase<S: DocumentStore> {
    pub store: S,
}

impl<S: DocumentStore> UpdateFloorUseCase<S> {
    pub async fn execute(
        &self,
        org_id: Uuid,
        building_id: Uuid,
        floor_id: Uuid,
        input: FloorInput,
    ) -> Result<Floor, DirectoryServiceError> {
        run_transaction(&self.store, |txn| {
            let input = input.clone();
            Box::pin(async move {
            let mut org: Organization = txn
                .get(&layout::org_doc(org_id))
                .await?
                .ok_or(DirectoryServiceError::OrgNotFound)?;
            let building = org
                .buildings_map
                .get_mut(&building_id)
                .ok_or(DirectoryServiceError::BuildingNotFound)?;
            let existing = building
                .floors_map
                .get(&floor_id)
                .ok_or(DirectoryServiceError::FloorNotFound)?;

            let name = if input.name == existing.name {
                existing.name.clone()
            } else {
                ensure_unique_name(
                    &input.name,
                    Some(floor_id),
                    building.floors_map.iter().map(|(id, f)| (id, f.name.as_str())),
                )
                .map_err(|_| DirectoryServiceError::NameExists { entity: "Floor" })?;
                input.name.clone()
            };

            let now = Utc::now();
            let floor = Floor {
                name,
                created_at: existing.created_at,
                updated_at: now,
            };
            building.floors_map.insert(floor_id, floor.clone());
            building.updated_at = now;
            let building = building.clone();
            org.updated_at = now;

            txn.set(&layout::floor_doc(org_id, building_id, floor_id), &floor)?;
            txn.set(&layout::building_doc(org_id, building_id), &building)?;
            txn.set(&layout::org_doc(org_id), &org)?;
            Ok::<_, DirectoryServiceError>(floor)
        })
        })
        .await
    }
}

// ── RemoveFloor ──────────────────────────────────────────────────────────────

pub struct RemoveFloorUseCase<S: DocumentStore> {
    pub store: S,
}

impl<S: DocumentStore> RemoveFloorUseCase<S> {
    pub async fn execute(
        &self,
        org_id: Uuid,
        building_id: Uuid,
        floor_id: Uuid,
    ) -> Result<(), DirectoryServiceError> {
        run_transaction(&self.store, |txn| Box::pin(async move {
            let mut org: Organization = txn
                .get(&layout::org_doc(org_id))
                .await?
                .ok_or(DirectoryServiceError::OrgNotFound)?;
            let building = org
                .buildings_map
                .get_mut(&building_id)
                .ok_or(DirectoryServiceError::BuildingNotFound)?;
            if building.floors_map.remove(&floor_id).is_none() {
                return Err(DirectoryServiceError::FloorNotFound);
            }
            let now = Utc::now();
            building.updated_at = now;
            let building = building.clone();
            org.updated_at = now;

            txn.delete(&layout::floor_doc(org_id, building_id, floor_id));
            txn.set(&layout::building_doc(org_id, building_id), &building)?;
            txn.set(&layout::org_doc(org_id), &org)?;
            Ok::<_, DirectoryServiceError>(())
        }))
        .await
    }
}
