use std::collections::BTreeMap;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use ecodes_auth_types::identity::CallerIdentity;
use ecodes_domain::org::Floor;

use crate::error::DirectoryServiceError;
use crate::handlers::{require_admin, require_member};
use crate::state::AppState;
use crate::usecase::floor::{
    CreateFloorUseCase, FloorInput, ListFloorsUseCase, RemoveFloorUseCase, UpdateFloorUseCase,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FloorResponse {
    pub id: Uuid,
    pub name: String,
    #[serde(serialize_with = "ecodes_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "ecodes_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl FloorResponse {
    fn new(id: Uuid, floor: Floor) -> Self {
        Self {
            id,
            name: floor.name,
            created_at: floor.created_at,
            updated_at: floor.updated_at,
        }
    }
}

#[derive(Deserialize)]
pub struct FloorRequest {
    pub name: String,
}

pub async fn list_floors(
    identity: CallerIdentity,
    State(state): State<AppState>,
    Path((org_id, building_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<BTreeMap<Uuid, Floor>>, DirectoryServiceError> {
    require_member(&identity, org_id)?;
    let floors = ListFloorsUseCase { store: state.store }
        .execute(org_id, building_id, None)
        .await?;
    Ok(Json(floors))
}

pub async fn create_floor(
    identity: CallerIdentity,
    State(state): State<AppState>,
    Path((org_id, building_id)): Path<(Uuid, Uuid)>,
    Json(body): Json<FloorRequest>,
) -> Result<(StatusCode, Json<FloorResponse>), DirectoryServiceError> {
    require_admin(&identity, org_id)?;
    let (id, floor) = CreateFloorUseCase { store: state.store }
        .execute(org_id, building_id, FloorInput { name: body.name })
        .await?;
    Ok((StatusCode::CREATED, Json(FloorResponse::new(id, floor))))
}

pub async fn update_floor(
    identity: CallerIdentity,
    State(state): State<AppState>,
    Path((org_id, building_id, floor_id)): Path<(Uuid, Uuid, Uuid)>,
    Json(body): Json<FloorRequest>,
) -> Result<Json<FloorResponse>, DirectoryServiceError> {
    require_admin(&identity, org_id)?;
    let floor = UpdateFloorUseCase { store: state.store }
        .execute(org_id, building_id, floor_id, FloorInput { name: body.name })
        .await?;
    Ok(Json(FloorResponse::new(floor_id, floor)))
}

pub async fn delete_floor(
    identity: CallerIdentity,
    State(state): State<AppState>,
    Path((org_id, building_id, floor_id)): Path<(Uuid, Uuid, Uuid)>,
) -> Result<StatusCode, DirectoryServiceError> {
    require_admin(&identity, org_id)?;
    RemoveFloorUseCase { store: state.store }
        .execute(org_id, building_id, floor_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
