use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use ecodes_store::StoreError;

/// Accounts service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum AccountsServiceError {
    #[error("{0}")]
    InvalidArgument(String),
    #[error("access not granted")]
    AccessDenied,
    #[error("user not found")]
    UserNotFound,
    #[error("user record out of sync")]
    OutOfSync,
    #[error("changing email for users is not supported yet")]
    Unimplemented,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl AccountsServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "INVALID_ARGUMENT",
            Self::AccessDenied => "ACCESS_DENIED",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::OutOfSync => "OUT_OF_SYNC",
            Self::Unimplemented => "UNIMPLEMENTED",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}

impl From<StoreError> for AccountsServiceError {
    fn from(err: StoreError) -> Self {
        Self::Internal(anyhow::Error::new(err))
    }
}

impl IntoResponse for AccountsServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            Self::AccessDenied => StatusCode::FORBIDDEN,
            Self::UserNotFound => StatusCode::NOT_FOUND,
            Self::OutOfSync => StatusCode::CONFLICT,
            Self::Unimplemented => StatusCode::NOT_IMPLEMENTED,
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
