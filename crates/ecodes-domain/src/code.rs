use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::user::DepartmentRef;

/// Emergency-code definition ("E-Code"). Codes have no standalone primary
/// collection: the per-organization `codesMap` document is the sole source
/// of truth. Name is unique per organization, case-insensitively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyCode {
    pub name: String,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Departments this code applies to; empty means organization-wide.
    #[serde(default)]
    pub departments: Vec<DepartmentRef>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
