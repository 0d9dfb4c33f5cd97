use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Access-control role flags, mirroring the identity provider's custom
/// claims. A caller can hold several flags; `SuperAdmin` is not bound to
/// any organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct RoleFlags {
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub super_admin: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub org_admin: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub rota_admin: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub user: bool,
}

impl RoleFlags {
    /// Parse a comma-separated flag list (`"OrgAdmin,RotaAdmin"`).
    /// Unknown flag names are rejected.
    pub fn parse(s: &str) -> Option<Self> {
        let mut flags = Self::default();
        for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            match part {
                "SuperAdmin" => flags.super_admin = true,
                "OrgAdmin" => flags.org_admin = true,
                "RotaAdmin" => flags.rota_admin = true,
                "User" => flags.user = true,
                _ => return None,
            }
        }
        Some(flags)
    }

    pub fn names(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        if self.super_admin {
            out.push("SuperAdmin");
        }
        if self.org_admin {
            out.push("OrgAdmin");
        }
        if self.rota_admin {
            out.push("RotaAdmin");
        }
        if self.user {
            out.push("User");
        }
        out
    }
}

/// Full claim set carried by an identity-provider account: role flags plus
/// the organization binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessClaims {
    pub org_id: Uuid,
    pub roles: RoleFlags,
}
