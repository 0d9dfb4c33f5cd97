use std::collections::BTreeMap;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use ecodes_auth_types::identity::CallerIdentity;
use ecodes_domain::org::Department;
use ecodes_domain::user::UserRecord;

use crate::error::DirectoryServiceError;
use crate::handlers::{require_admin, require_member};
use crate::state::AppState;
use crate::usecase::department::{
    CreateDepartmentUseCase, DepartmentInput, ListDepartmentUsersUseCase, ListDepartmentsUseCase,
    RemoveDepartmentUseCase, UpdateDepartmentUseCase,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentResponse {
    pub id: Uuid,
    pub name: String,
    #[serde(serialize_with = "ecodes_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "ecodes_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl DepartmentResponse {
    fn new(id: Uuid, dept: Department) -> Self {
        Self {
            id,
            name: dept.name,
            created_at: dept.created_at,
            updated_at: dept.updated_at,
        }
    }
}

#[derive(Deserialize)]
pub struct DepartmentRequest {
    pub name: String,
}

pub async fn list_departments(
    identity: CallerIdentity,
    State(state): State<AppState>,
    Path(org_id): Path<Uuid>,
) -> Result<Json<BTreeMap<Uuid, Department>>, DirectoryServiceError> {
    require_member(&identity, org_id)?;
    let departments = ListDepartmentsUseCase { store: state.store }
        .execute(org_id, None)
        .await?;
    Ok(Json(departments))
}

pub async fn create_department(
    identity: CallerIdentity,
    State(state): State<AppState>,
    Path(org_id): Path<Uuid>,
    Json(body): Json<DepartmentRequest>,
) -> Result<(StatusCode, Json<DepartmentResponse>), DirectoryServiceError> {
    require_admin(&identity, org_id)?;
    let (id, dept) = CreateDepartmentUseCase { store: state.store }
        .execute(org_id, DepartmentInput { name: body.name })
        .await?;
    Ok((StatusCode::CREATED, Json(DepartmentResponse::new(id, dept))))
}

pub async fn update_department(
    identity: CallerIdentity,
    State(state): State<AppState>,
    Path((org_id, dept_id)): Path<(Uuid, Uuid)>,
    Json(body): Json<DepartmentRequest>,
) -> Result<Json<DepartmentResponse>, DirectoryServiceError> {
    require_admin(&identity, org_id)?;
    let dept = UpdateDepartmentUseCase { store: state.store }
        .execute(org_id, dept_id, DepartmentInput { name: body.name })
        .await?;
    Ok(Json(DepartmentResponse::new(dept_id, dept)))
}

pub async fn delete_department(
    identity: CallerIdentity,
    State(state): State<AppState>,
    Path((org_id, dept_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, DirectoryServiceError> {
    require_admin(&identity, org_id)?;
    RemoveDepartmentUseCase { store: state.store }
        .execute(org_id, dept_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_department_users(
    identity: CallerIdentity,
    State(state): State<AppState>,
    Path((org_id, dept_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<BTreeMap<Uuid, UserRecord>>, DirectoryServiceError> {
    require_member(&identity, org_id)?;
    let users = ListDepartmentUsersUseCase { store: state.store }
        .execute(org_id, dept_id)
        .await?;
    Ok(Json(users))
}
