//! User roles and the request-scoped actor.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User permission level.
///
/// Storage and token format: lowercase string (`customer`, `admin`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Customer = 0,
    Admin = 1,
}

impl UserRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Admin => "admin",
        }
    }

    /// Parse the storage string. Returns `None` for unknown values.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "customer" => Some(Self::Customer),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }

    fn as_u8(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PartialOrd for UserRole {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for UserRole {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.as_u8().cmp(&other.as_u8())
    }
}

/// Returned by [`Actor`] guards when the caller lacks the required right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("access denied")]
pub struct AccessDenied;

/// The authenticated caller of a use case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: Uuid,
    pub role: UserRole,
}

impl Actor {
    pub fn new(user_id: Uuid, role: UserRole) -> Self {
        Self { user_id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role >= UserRole::Admin
    }

    pub fn ensure_admin(&self) -> Result<(), AccessDenied> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AccessDenied)
        }
    }

    /// Passes only when the actor is the owner. Admins are not exempt.
    pub fn ensure_owner(&self, owner_id: Uuid) -> Result<(), AccessDenied> {
        if self.user_id == owner_id {
            Ok(())
        } else {
            Err(AccessDenied)
        }
    }

    /// Passes for the owner or any admin.
    pub fn ensure_owner_or_admin(&self, owner_id: Uuid) -> Result<(), AccessDenied> {
        if self.is_admin() {
            return Ok(());
        }
        self.ensure_owner(owner_id)
    }
}
