use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use ecodes_auth_types::identity::CallerIdentity;
use ecodes_domain::code::EmergencyCode;
use ecodes_domain::maps::CodesDoc;
use ecodes_domain::user::DepartmentRef;

use crate::error::DirectoryServiceError;
use crate::handlers::{require_admin, require_member};
use crate::state::AppState;
use crate::usecase::code::{
    CodeInput, CreateCodeUseCase, GetCodesUseCase, RemoveCodeUseCase, UpdateCodeUseCase,
};

#[derive(Serialize)]
pub struct CodeResponse {
    pub id: Uuid,
    #[serde(flatten)]
    pub code: EmergencyCode,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeRequest {
    pub name: String,
    pub color: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub departments: Vec<DepartmentRef>,
}

pub async fn get_codes(
    identity: CallerIdentity,
    State(state): State<AppState>,
    Path(org_id): Path<Uuid>,
) -> Result<Json<CodesDoc>, DirectoryServiceError> {
    require_member(&identity, org_id)?;
    let doc = GetCodesUseCase { store: state.store }
        .execute(org_id, None)
        .await?;
    Ok(Json(doc))
}

pub async fn create_code(
    identity: CallerIdentity,
    State(state): State<AppState>,
    Path(org_id): Path<Uuid>,
    Json(body): Json<CodeRequest>,
) -> Result<(StatusCode, Json<CodeResponse>), DirectoryServiceError> {
    require_admin(&identity, org_id)?;
    let (id, code) = CreateCodeUseCase { store: state.store }
        .execute(
            org_id,
            CodeInput {
                name: body.name,
                color: body.color,
                description: body.description,
                departments: body.departments,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(CodeResponse { id, code })))
}

pub async fn update_code(
    identity: CallerIdentity,
    State(state): State<AppState>,
    Path((org_id, code_id)): Path<(Uuid, Uuid)>,
    Json(body): Json<CodeRequest>,
) -> Result<Json<CodeResponse>, DirectoryServiceError> {
    require_admin(&identity, org_id)?;
    let code = UpdateCodeUseCase { store: state.store }
        .execute(
            org_id,
            code_id,
            CodeInput {
                name: body.name,
                color: body.color,
                description: body.description,
                departments: body.departments,
            },
        )
        .await?;
    Ok(Json(CodeResponse { id: code_id, code }))
}

pub async fn delete_code(
    identity: CallerIdentity,
    State(state): State<AppState>,
    Path((org_id, code_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, DirectoryServiceError> {
    require_admin(&identity, org_id)?;
    RemoveCodeUseCase { store: state.store }
        .execute(org_id, code_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
