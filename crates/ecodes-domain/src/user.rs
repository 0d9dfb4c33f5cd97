use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Application role of a user, as submitted through the admin console.
/// Stored externally as access-control claims; `Admin` maps to the
/// `OrgAdmin` claim flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Admin,
    RotaAdmin,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::RotaAdmin => "RotaAdmin",
            Self::User => "User",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Admin" => Some(Self::Admin),
            "RotaAdmin" => Some(Self::RotaAdmin),
            "User" => Some(Self::User),
            _ => None,
        }
    }
}

/// Department reference embedded in a user record: a copy of id + name,
/// not a live join. Validated against the primary department document
/// before any user mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentRef {
    pub id: Uuid,
    pub name: String,
}

/// User record. Lives both as a standalone document under its organization
/// and duplicated inside `departmentUsersMap[deptId].usersMap[uid]`.
/// The document key matches the identity-provider subject id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    pub role: Role,
    pub department: DepartmentRef,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
