use std::collections::BTreeMap;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use ecodes_auth_types::identity::CallerIdentity;
use ecodes_domain::org::Building;

use crate::error::DirectoryServiceError;
use crate::handlers::{require_admin, require_member};
use crate::state::AppState;
use crate::usecase::building::{
    BuildingInput, CreateBuildingUseCase, ListBuildingsUseCase, RemoveBuildingUseCase,
    UpdateBuildingUseCase,
};

#[derive(Serialize)]
pub struct BuildingResponse {
    pub id: Uuid,
    #[serde(flatten)]
    pub building: Building,
}

#[derive(Deserialize)]
pub struct BuildingRequest {
    pub name: String,
}

pub async fn list_buildings(
    identity: CallerIdentity,
    State(state): State<AppState>,
    Path(org_id): Path<Uuid>,
) -> Result<Json<BTreeMap<Uuid, Building>>, DirectoryServiceError> {
    require_member(&identity, org_id)?;
    let buildings = ListBuildingsUseCase { store: state.store }
        .execute(org_id, None)
        .await?;
    Ok(Json(buildings))
}

pub async fn create_building(
    identity: CallerIdentity,
    State(state): State<AppState>,
    Path(org_id): Path<Uuid>,
    Json(body): Json<BuildingRequest>,
) -> Result<(StatusCode, Json<BuildingResponse>), DirectoryServiceError> {
    require_admin(&identity, org_id)?;
    let (id, building) = CreateBuildingUseCase { store: state.store }
        .execute(org_id, BuildingInput { name: body.name })
        .await?;
    Ok((StatusCode::CREATED, Json(BuildingResponse { id, building })))
}

pub async fn update_building(
    identity: CallerIdentity,
    State(state): State<AppState>,
    Path((org_id, building_id)): Path<(Uuid, Uuid)>,
    Json(body): Json<BuildingRequest>,
) -> Result<Json<BuildingResponse>, DirectoryServiceError> {
    require_admin(&identity, org_id)?;
    let building = UpdateBuildingUseCase { store: state.store }
        .execute(org_id, building_id, BuildingInput { name: body.name })
        .await?;
    Ok(Json(BuildingResponse {
        id: building_id,
        building,
    }))
}

pub async fn delete_building(
    identity: CallerIdentity,
    State(state): State<AppState>,
    Path((org_id, building_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, DirectoryServiceError> {
    require_admin(&identity, org_id)?;
    RemoveBuildingUseCase { store: state.store }
        .execute(org_id, building_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
