pub mod building;
pub mod code;
pub mod department;
pub mod floor;
pub mod org;

use uuid::Uuid;

use ecodes_auth_types::identity::CallerIdentity;

use crate::error::DirectoryServiceError;

/// Mutations require an org admin bound to the target organization, or a
/// super admin.
pub(crate) fn require_admin(
    identity: &CallerIdentity,
    org_id: Uuid,
) -> Result<(), DirectoryServiceError> {
    if identity.allows_org(org_id) {
        Ok(())
    } else {
        Err(DirectoryServiceError::Forbidden)
    }
}

/// Reads only require membership of the target organization.
pub(crate) fn require_member(
    identity: &CallerIdentity,
    org_id: Uuid,
) -> Result<(), DirectoryServiceError> {
    if identity.roles.super_admin || identity.org_id == Some(org_id) {
        Ok(())
    } else {
        Err(DirectoryServiceError::Forbidden)
    }
}
