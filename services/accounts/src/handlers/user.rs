use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Serialize;
use uuid::Uuid;

use ecodes_auth_types::identity::CallerIdentity;
use ecodes_domain::user::UserRecord;

use crate::error::AccountsServiceError;
use crate::handlers::verify_access;
use crate::state::AppState;
use crate::usecase::user::{CreateUserUseCase, DeleteUserUseCase, UpdateUserUseCase};
use crate::validate::UserPayload;

#[derive(Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    #[serde(flatten)]
    pub user: UserRecord,
}

pub async fn create_user(
    identity: CallerIdentity,
    State(state): State<AppState>,
    Path(org_id): Path<Uuid>,
    Json(body): Json<UserPayload>,
) -> Result<(StatusCode, Json<UserResponse>), AccountsServiceError> {
    verify_access(&identity, org_id)?;
    let (id, user) = CreateUserUseCase {
        store: state.store,
        provider: state.provider,
    }
    .execute(org_id, body)
    .await?;
    Ok((StatusCode::CREATED, Json(UserResponse { id, user })))
}

pub async fn update_user(
    identity: CallerIdentity,
    State(state): State<AppState>,
    Path((org_id, user_id)): Path<(Uuid, Uuid)>,
    Json(body): Json<UserPayload>,
) -> Result<Json<UserResponse>, AccountsServiceError> {
    verify_access(&identity, org_id)?;
    let user = UpdateUserUseCase {
        store: state.store,
        provider: state.provider,
    }
    .execute(org_id, user_id, body)
    .await?;
    Ok(Json(UserResponse { id: user_id, user }))
}

pub async fn delete_user(
    identity: CallerIdentity,
    State(state): State<AppState>,
    Path((org_id, user_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AccountsServiceError> {
    verify_access(&identity, org_id)?;
    DeleteUserUseCase {
        store: state.store,
        provider: state.provider,
    }
    .execute(org_id, user_id)
    .await?;
    Ok(StatusCode::NO_CONTENT)
}
