//! Cache-or-fetch helpers for the per-organization map documents.
//!
//! Read paths accept an optional already-held copy of the document (for
//! example from a live subscription) and only hit the store when none is
//! supplied. An absent document resolves to its empty default: readers see
//! "no entries" rather than an error, and the document is created lazily by
//! the first mutation.

use uuid::Uuid;

use ecodes_domain::maps::{CodesDoc, DepartmentUsersDoc};
use ecodes_domain::org::Organization;
use ecodes_store::{DocumentStore, layout};

use crate::error::DirectoryServiceError;

/// The organization aggregate, or `None` when the document does not exist.
pub async fn validate_org<S: DocumentStore>(
    store: &S,
    org_id: Uuid,
    cached: Option<Organization>,
) -> Result<Option<Organization>, DirectoryServiceError> {
    if cached.is_some() {
        return Ok(cached);
    }
    Ok(store.get(&layout::org_doc(org_id)).await?)
}

/// The codes map document, defaulting to empty when absent.
pub async fn validate_codes<S: DocumentStore>(
    store: &S,
    org_id: Uuid,
    cached: Option<CodesDoc>,
) -> Result<CodesDoc, DirectoryServiceError> {
    if let Some(doc) = cached {
        return Ok(doc);
    }
    Ok(store
        .get(&layout::codes_doc(org_id))
        .await?
        .unwrap_or_default())
}

/// The departmentUsers map document, defaulting to empty when absent.
pub async fn validate_department_users<S: DocumentStore>(
    store: &S,
    org_id: Uuid,
    cached: Option<DepartmentUsersDoc>,
) -> Result<DepartmentUsersDoc, DirectoryServiceError> {
    if let Some(doc) = cached {
        return Ok(doc);
    }
    Ok(store
        .get(&layout::department_users_doc(org_id))
        .await?
        .unwrap_or_default())
}
