//! Request validation for user mutations. Every field is checked before any
//! side effect runs: an invalid payload must never reach the identity
//! provider or the store.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use ecodes_domain::org::Department;
use ecodes_domain::user::{DepartmentRef, Role};
use ecodes_store::{DocumentStore, layout};

use crate::error::AccountsServiceError;

/// Raw user payload as submitted by the console. All fields are optional at
/// the wire level so validation can produce field-specific messages instead
/// of deserialization failures. Serializable so the outbox can replay it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserPayload {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub job_title: Option<String>,
    pub role: String,
    pub department: Option<DepartmentPayload>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DepartmentPayload {
    pub id: Option<Uuid>,
    pub name: String,
}

/// A fully validated user payload, ready to be written as a record.
#[derive(Debug, Clone)]
pub struct ValidatedUser {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub job_title: Option<String>,
    pub role: Role,
    pub department: DepartmentRef,
}

/// Lowercase-only address shape: dot-separated alphanumeric local part, an
/// alphanumeric first domain label and at least one alphabetic TLD label of
/// two or more characters.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    let local_ok = !local.is_empty()
        && local.split('.').all(|seg| {
            !seg.is_empty()
                && seg
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        });
    if !local_ok {
        return false;
    }
    let mut labels = domain.split('.');
    let Some(first) = labels.next() else {
        return false;
    };
    if first.is_empty()
        || !first
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
    {
        return false;
    }
    let mut tld_labels = 0;
    for label in labels {
        if label.len() < 2 || !label.chars().all(|c| c.is_ascii_lowercase()) {
            return false;
        }
        tld_labels += 1;
    }
    tld_labels >= 1
}

fn non_blank(value: &str, field: &str) -> Result<String, AccountsServiceError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AccountsServiceError::invalid(format!(
            "{field} cannot be blank"
        )));
    }
    Ok(trimmed.to_owned())
}

fn optional(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

/// Validate a user payload against the organization's departments.
///
/// The department is resolved from its primary document, not from any cached
/// aggregate, and the submitted name must match the stored one so a stale
/// console pick cannot attach a user to a renamed department.
pub async fn validate_user_payload<S: DocumentStore>(
    store: &S,
    org_id: Uuid,
    payload: &UserPayload,
) -> Result<ValidatedUser, AccountsServiceError> {
    let email = non_blank(&payload.email, "email")?;
    let first_name = non_blank(&payload.first_name, "firstName")?;
    let last_name = non_blank(&payload.last_name, "lastName")?;
    let role_str = non_blank(&payload.role, "role")?;

    if !is_valid_email(&email) {
        return Err(AccountsServiceError::invalid("Invalid email address"));
    }
    let role =
        Role::parse(&role_str).ok_or_else(|| AccountsServiceError::invalid("Invalid user role"))?;

    let department = payload
        .department
        .as_ref()
        .and_then(|d| d.id.map(|id| (id, d.name.trim().to_owned())))
        .filter(|(_, name)| !name.is_empty())
        .ok_or_else(|| AccountsServiceError::invalid("department cannot be empty"))?;
    let (dept_id, dept_name) = department;

    let stored: Option<Department> = store
        .get_from_primary(&layout::department_doc(org_id, dept_id))
        .await?
        .map(serde_json::from_value)
        .transpose()
        .map_err(|e| AccountsServiceError::Internal(e.into()))?;
    match stored {
        Some(dept) if dept.name == dept_name => {}
        _ => {
            return Err(AccountsServiceError::invalid(
                "Invalid department or department does not exist",
            ));
        }
    }

    Ok(ValidatedUser {
        email,
        first_name,
        last_name,
        phone_number: optional(&payload.phone_number),
        job_title: optional(&payload.job_title),
        role,
        department: DepartmentRef {
            id: dept_id,
            name: dept_name,
        },
    })
}
