use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use ecodes_store::StoreError;

/// Directory service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryServiceError {
    #[error("organization not found")]
    OrgNotFound,
    #[error("department not found")]
    DepartmentNotFound,
    #[error("building not found")]
    BuildingNotFound,
    #[error("floor not found")]
    FloorNotFound,
    #[error("code not found")]
    CodeNotFound,
    #[error("{entity} with same name already exists")]
    NameExists { entity: &'static str },
    #[error("department still has assigned users")]
    DepartmentInUse,
    #[error("forbidden")]
    Forbidden,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl DirectoryServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::OrgNotFound => "ORG_NOT_FOUND",
            Self::DepartmentNotFound => "DEPARTMENT_NOT_FOUND",
            Self::BuildingNotFound => "BUILDING_NOT_FOUND",
            Self::FloorNotFound => "FLOOR_NOT_FOUND",
            Self::CodeNotFound => "CODE_NOT_FOUND",
            Self::NameExists { .. } => "NAME_EXISTS",
            Self::DepartmentInUse => "DEPARTMENT_IN_USE",
            Self::Forbidden => "FORBIDDEN",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl From<StoreError> for DirectoryServiceError {
    fn from(err: StoreError) -> Self {
        Self::Internal(anyhow::Error::new(err))
    }
}

impl IntoResponse for DirectoryServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::OrgNotFound
            | Self::DepartmentNotFound
            | Self::BuildingNotFound
            | Self::FloorNotFound
            | Self::CodeNotFound => StatusCode::NOT_FOUND,
            Self::NameExists { .. } | Self::DepartmentInUse => StatusCode::CONFLICT,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, kind = "INTERNAL", "internal error");
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
