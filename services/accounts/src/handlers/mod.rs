pub mod user;

use uuid::Uuid;

use ecodes_auth_types::identity::CallerIdentity;

use crate::error::AccountsServiceError;

/// User mutations require an org admin bound to the target organization, or
/// a super admin.
pub(crate) fn verify_access(
    identity: &CallerIdentity,
    org_id: Uuid,
) -> Result<(), AccountsServiceError> {
    if identity.allows_org(org_id) {
        Ok(())
    } else {
        Err(AccountsServiceError::AccessDenied)
    }
}
