//! Mock auth helpers for integration tests.
//!
//! Services behind the gateway receive `x-ecodes-user-id`,
//! `x-ecodes-org-id`, and `x-ecodes-roles` headers injected by the gateway.
//! In tests, `MockAuth` injects these headers directly so no real gateway
//! or session is needed.

use axum::http::{HeaderMap, HeaderName, HeaderValue};
use uuid::Uuid;

use ecodes_auth_types::roles::RoleFlags;

/// Configurable identity injected into test requests.
pub struct MockAuth {
    pub user_id: Uuid,
    pub org_id: Option<Uuid>,
    pub roles: RoleFlags,
}

impl MockAuth {
    /// An OrgAdmin bound to `org_id` — the usual console operator.
    pub fn org_admin(org_id: Uuid) -> Self {
        Self {
            user_id: Uuid::new_v4(),
            org_id: Some(org_id),
            roles: RoleFlags {
                org_admin: true,
                ..Default::default()
            },
        }
    }

    /// A SuperAdmin with no organization binding.
    pub fn super_admin() -> Self {
        Self {
            user_id: Uuid::new_v4(),
            org_id: None,
            roles: RoleFlags {
                super_admin: true,
                ..Default::default()
            },
        }
    }

    /// A plain member of `org_id` with no admin flags.
    pub fn member(org_id: Uuid) -> Self {
        Self {
            user_id: Uuid::new_v4(),
            org_id: Some(org_id),
            roles: RoleFlags {
                user: true,
                ..Default::default()
            },
        }
    }

    /// Return headers as if the gateway injected them.
    pub fn headers(&self) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(
            HeaderName::from_static("x-ecodes-user-id"),
            HeaderValue::from_str(&self.user_id.to_string()).unwrap(),
        );
        if let Some(org_id) = self.org_id {
            map.insert(
                HeaderName::from_static("x-ecodes-org-id"),
                HeaderValue::from_str(&org_id.to_string()).unwrap(),
            );
        }
        map.insert(
            HeaderName::from_static("x-ecodes-roles"),
            HeaderValue::from_str(&self.roles.names().join(",")).unwrap(),
        );
        map
    }
}
