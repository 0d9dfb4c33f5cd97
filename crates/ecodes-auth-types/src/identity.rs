//! Gateway-injected identity headers extractor.

use axum::extract::FromRequestParts;
use http::StatusCode;
use http::request::Parts;
use uuid::Uuid;

use crate::roles::RoleFlags;

/// Caller identity injected by the gateway via `x-ecodes-user-id`,
/// `x-ecodes-org-id`, and `x-ecodes-roles` headers.
///
/// Returns 401 if the user id is absent or unparsable, or the role list
/// contains an unknown flag. The org binding is optional (SuperAdmins have
/// none). Access decisions (403) are made by handlers after extraction.
#[derive(Debug, Clone)]
pub struct CallerIdentity {
    pub user_id: Uuid,
    pub org_id: Option<Uuid>,
    pub roles: RoleFlags,
}

impl CallerIdentity {
    /// Privileged-mutation access rule: the caller must hold OrgAdmin or
    /// SuperAdmin, and unless SuperAdmin their bound organization must be
    /// the requested one.
    pub fn allows_org(&self, org_id: Uuid) -> bool {
        if !(self.roles.org_admin || self.roles.super_admin) {
            return false;
        }
        self.roles.super_admin || self.org_id == Some(org_id)
    }
}

impl<S> FromRequestParts<S> for CallerIdentity
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    // axum-core 0.5 defines this as `fn -> impl Future + Send` (not `async fn`).
    // In Rust 1.82+ precise capturing, `async fn` captures lifetimes differently,
    // causing E0195. Fix: extract values synchronously, return a 'static async move block.
    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let user_id = parts
            .headers
            .get("x-ecodes-user-id")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<Uuid>().ok());

        let org_id = parts
            .headers
            .get("x-ecodes-org-id")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<Uuid>().ok());

        let roles = parts
            .headers
            .get("x-ecodes-roles")
            .and_then(|v| v.to_str().ok())
            .map(RoleFlags::parse)
            .unwrap_or(Some(RoleFlags::default()));

        async move {
            let user_id = user_id.ok_or(StatusCode::UNAUTHORIZED)?;
            let roles = roles.ok_or(StatusCode::UNAUTHORIZED)?;
            Ok(Self {
                user_id,
                org_id,
                roles,
            })
        }
    }
}
