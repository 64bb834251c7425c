use core::str::FromStr;

use serde::{Deserialize, Serialize};

use atlaserp_core::DomainError;

/// Coarse privilege tier.
///
/// `SuperAdmin` outranks the other two and is tenant-agnostic; `Owner` and
/// `Staff` differ only by which modules they are granted, not by rank.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    SuperAdmin,
    Owner,
    Staff,
}

impl Role {
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::SuperAdmin)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "super-admin",
            Role::Owner => "owner",
            Role::Staff => "staff",
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "super-admin" => Ok(Role::SuperAdmin),
            "owner" => Ok(Role::Owner),
            "staff" => Ok(Role::Staff),
            other => Err(DomainError::validation(format!("unknown role: {other}"))),
        }
    }
}
