//! Denormalized map documents: the fast-path read structures kept in sync
//! with the primary per-entity documents by the record services.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::code::EmergencyCode;
use crate::user::UserRecord;

/// Per-department bucket inside the `departmentUsers` map document:
/// the department's copied fields plus its member map.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentBucket {
    pub name: String,
    #[serde(default)]
    pub users_map: BTreeMap<Uuid, UserRecord>,
}

/// The `orgs/{orgId}/maps/departmentUsers` document.
///
/// `userIndex` maps each user id to the department bucket currently holding
/// their entry, so mutations can locate the bucket without scanning every
/// department. Both fields are written in the same transaction; a user id
/// present in one but not the other means the document has drifted and the
/// mutation must fail as a precondition error.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentUsersDoc {
    #[serde(default)]
    pub department_users_map: BTreeMap<Uuid, DepartmentBucket>,
    #[serde(default)]
    pub user_index: BTreeMap<Uuid, Uuid>,
}

impl DepartmentUsersDoc {
    /// All users across every bucket, keyed by user id.
    pub fn all_users(&self) -> BTreeMap<Uuid, &UserRecord> {
        self.department_users_map
            .values()
            .flat_map(|bucket| bucket.users_map.iter().map(|(uid, user)| (*uid, user)))
            .collect()
    }

    /// Number of users currently bucketed under `dept_id`.
    pub fn users_in_department(&self, dept_id: Uuid) -> usize {
        self.department_users_map
            .get(&dept_id)
            .map(|bucket| bucket.users_map.len())
            .unwrap_or(0)
    }
}

/// The `orgs/{orgId}/maps/ecodes` document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodesDoc {
    #[serde(default)]
    pub codes_map: BTreeMap<Uuid, EmergencyCode>,
}
