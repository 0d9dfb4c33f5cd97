use std::collections::BTreeMap;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use ecodes_auth_types::identity::CallerIdentity;
use ecodes_domain::org::Organization;
use ecodes_domain::user::UserRecord;

use crate::error::DirectoryServiceError;
use crate::handlers::{require_admin, require_member};
use crate::state::AppState;
use crate::usecase::org::{
    CreateOrgInput, CreateOrgUseCase, GetOrgUseCase, ListOrgUsersUseCase, RemoveOrgUseCase,
    UpdateOrgInput, UpdateOrgUseCase,
};

#[derive(Serialize)]
pub struct OrgResponse {
    pub id: Uuid,
    #[serde(flatten)]
    pub org: Organization,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrgRequest {
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrgRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

pub async fn get_org(
    identity: CallerIdentity,
    State(state): State<AppState>,
    Path(org_id): Path<Uuid>,
) -> Result<Json<OrgResponse>, DirectoryServiceError> {
    require_member(&identity, org_id)?;
    let org = GetOrgUseCase { store: state.store }.execute(org_id).await?;
    Ok(Json(OrgResponse { id: org_id, org }))
}

pub async fn create_org(
    identity: CallerIdentity,
    State(state): State<AppState>,
    Json(body): Json<CreateOrgRequest>,
) -> Result<(StatusCode, Json<OrgResponse>), DirectoryServiceError> {
    if !identity.roles.super_admin {
        return Err(DirectoryServiceError::Forbidden);
    }
    let (id, org) = CreateOrgUseCase { store: state.store }
        .execute(CreateOrgInput {
            name: body.name,
            address: body.address,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(OrgResponse { id, org })))
}

pub async fn update_org(
    identity: CallerIdentity,
    State(state): State<AppState>,
    Path(org_id): Path<Uuid>,
    Json(body): Json<UpdateOrgRequest>,
) -> Result<Json<OrgResponse>, DirectoryServiceError> {
    require_admin(&identity, org_id)?;
    let org = UpdateOrgUseCase { store: state.store }
        .execute(
            org_id,
            UpdateOrgInput {
                name: body.name,
                address: body.address,
            },
        )
        .await?;
    Ok(Json(OrgResponse { id: org_id, org }))
}

pub async fn delete_org(
    identity: CallerIdentity,
    State(state): State<AppState>,
    Path(org_id): Path<Uuid>,
) -> Result<StatusCode, DirectoryServiceError> {
    if !identity.roles.super_admin {
        return Err(DirectoryServiceError::Forbidden);
    }
    RemoveOrgUseCase { store: state.store }.execute(org_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_org_users(
    identity: CallerIdentity,
    State(state): State<AppState>,
    Path(org_id): Path<Uuid>,
) -> Result<Json<BTreeMap<Uuid, UserRecord>>, DirectoryServiceError> {
    require_member(&identity, org_id)?;
    let users = ListOrgUsersUseCase { store: state.store }
        .execute(org_id)
        .await?;
    Ok(Json(users))
}
