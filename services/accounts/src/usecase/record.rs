//! User record synchronization: keeps the primary user document and the
//! `departmentUsers` map document in step. Every function runs as one
//! transaction covering both documents, so the map's `userIndex` is always
//! consistent with the buckets.

use chrono::Utc;
use uuid::Uuid;

use ecodes_domain::maps::{DepartmentBucket, DepartmentUsersDoc};
use ecodes_domain::user::UserRecord;
use ecodes_store::{DocumentStore, layout, run_transaction};

use crate::error::AccountsServiceError;
use crate::validate::ValidatedUser;

/// Insert a new user record into its primary document and the map.
pub async fn add_user<S: DocumentStore>(
    store: &S,
    org_id: Uuid,
    uid: Uuid,
    user: &UserRecord,
) -> Result<(), AccountsServiceError> {
    run_transaction(store, |txn| {
        let user = user.clone();
        Box::pin(async move {
        let mut doc: DepartmentUsersDoc = txn
            .get(&layout::department_users_doc(org_id))
            .await?
            .unwrap_or_default();
        let bucket = doc
            .department_users_map
            .entry(user.department.id)
            .or_insert_with(|| DepartmentBucket {
                name: user.department.name.clone(),
                ..Default::default()
            });
        bucket.name = user.department.name.clone();
        bucket.users_map.insert(uid, user.clone());
        doc.user_index.insert(uid, user.department.id);

        txn.set(&layout::user_doc(org_id, uid), &user)?;
        txn.set(&layout::department_users_doc(org_id), &doc)?;
        Ok::<_, AccountsServiceError>(())
        })
    })
    .await
}

/// Merge validated changes into an existing record, moving it between
/// department buckets when the department changed. The `userIndex` locates
/// the current bucket; an index entry pointing at a bucket that no longer
/// holds the user means the map has drifted, and the edit is refused.
pub async fn edit_user<S: DocumentStore>(
    store: &S,
    org_id: Uuid,
    uid: Uuid,
    changes: &ValidatedUser,
) -> Result<UserRecord, AccountsServiceError> {
    run_transaction(store, |txn| {
        let changes = changes.clone();
        Box::pin(async move {
        let stored: UserRecord = txn
            .get(&layout::user_doc(org_id, uid))
            .await?
            .ok_or(AccountsServiceError::UserNotFound)?;
        let mut doc: DepartmentUsersDoc = txn
            .get(&layout::department_users_doc(org_id))
            .await?
            .unwrap_or_default();
        let old_dept = *doc
            .user_index
            .get(&uid)
            .ok_or(AccountsServiceError::OutOfSync)?;

        let merged = UserRecord {
            email: changes.email.clone(),
            first_name: changes.first_name.clone(),
            last_name: changes.last_name.clone(),
            phone_number: changes
                .phone_number
                .clone()
                .or_else(|| stored.phone_number.clone()),
            job_title: changes.job_title.clone().or_else(|| stored.job_title.clone()),
            role: changes.role,
            department: changes.department.clone(),
            created_at: stored.created_at,
            updated_at: Utc::now(),
        };

        if old_dept != merged.department.id {
            let old_bucket = doc
                .department_users_map
                .get_mut(&old_dept)
                .ok_or(AccountsServiceError::OutOfSync)?;
            if old_bucket.users_map.remove(&uid).is_none() {
                return Err(AccountsServiceError::OutOfSync);
            }
        }
        let bucket = doc
            .department_users_map
            .entry(merged.department.id)
            .or_insert_with(|| DepartmentBucket {
                name: merged.department.name.clone(),
                ..Default::default()
            });
        bucket.name = merged.department.name.clone();
        bucket.users_map.insert(uid, merged.clone());
        doc.user_index.insert(uid, merged.department.id);

        txn.set(&layout::user_doc(org_id, uid), &merged)?;
        txn.set(&layout::department_users_doc(org_id), &doc)?;
        Ok::<_, AccountsServiceError>(merged)
        })
    })
    .await
}

/// Delete the primary document and the map entry. The bucket itself stays:
/// an empty bucket only disappears when its department is removed. Any
/// documents nested under the user are swept afterwards, best effort.
pub async fn remove_user<S: DocumentStore>(
    store: &S,
    org_id: Uuid,
    uid: Uuid,
) -> Result<(), AccountsServiceError> {
    run_transaction(store, |txn| Box::pin(async move {
        let mut doc: DepartmentUsersDoc = txn
            .get(&layout::department_users_doc(org_id))
            .await?
            .unwrap_or_default();
        let dept_id = doc
            .user_index
            .remove(&uid)
            .ok_or(AccountsServiceError::UserNotFound)?;
        let bucket = doc
            .department_users_map
            .get_mut(&dept_id)
            .ok_or(AccountsServiceError::OutOfSync)?;
        if bucket.users_map.remove(&uid).is_none() {
            return Err(AccountsServiceError::OutOfSync);
        }

        txn.delete(&layout::user_doc(org_id, uid));
        txn.set(&layout::department_users_doc(org_id), &doc)?;
        Ok::<_, AccountsServiceError>(())
    }))
    .await?;

    if let Err(e) = store.recursive_delete(&layout::user_doc(org_id, uid)).await {
        tracing::warn!(error = %e, %org_id, %uid, "failed to sweep user subtree");
    }
    Ok(())
}
