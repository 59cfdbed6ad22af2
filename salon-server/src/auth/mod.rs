//! Actor context
//!
//! Tokens are issued and verified by an external auth service; the booking
//! core receives an already authenticated [`CurrentUser`] and only performs
//! ownership and role checks.

use serde::{Deserialize, Serialize};
use shared::error::{AppError, AppResult, ErrorCode};

/// Role of the authenticated actor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Client,
    Staff,
    Admin,
}

/// Permission names understood by the back office
pub mod permissions {
    pub const APPOINTMENTS_MANAGE: &str = "appointments:manage";
    pub const APPOINTMENTS_PRICE: &str = "appointments:price";
    pub const STAFF_MANAGE: &str = "staff:manage";
    pub const SERVICES_MANAGE: &str = "services:manage";
    pub const DASHBOARD_VIEW: &str = "dashboard:view";
}

/// Authenticated actor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: i64,
    pub role: Role,
    /// Extra grants, e.g. `appointments:*`
    #[serde(default)]
    pub permissions: Vec<String>,
}

impl CurrentUser {
    pub fn client(id: i64) -> Self {
        Self {
            id,
            role: Role::Client,
            permissions: Vec::new(),
        }
    }

    /// Staff member with the default front-desk grant
    pub fn staff(id: i64) -> Self {
        Self {
            id,
            role: Role::Staff,
            permissions: vec![permissions::APPOINTMENTS_MANAGE.to_string()],
        }
    }

    pub fn admin(id: i64) -> Self {
        Self {
            id,
            role: Role::Admin,
            permissions: Vec::new(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Check a permission
    ///
    /// Admins hold every permission. `"all"` grants everything and
    /// `"appointments:*"` matches `"appointments:manage"`.
    pub fn has_permission(&self, permission: &str) -> bool {
        if self.is_admin() {
            return true;
        }
        self.permissions.iter().any(|p| {
            if p == "all" || p == permission {
                return true;
            }
            match p.strip_suffix(":*") {
                Some(prefix) => permission
                    .strip_prefix(prefix)
                    .is_some_and(|rest| rest.starts_with(':')),
                None => false,
            }
        })
    }

    /// Fail with `PermissionDenied` unless the permission is held
    pub fn require(&self, permission: &str) -> AppResult<()> {
        if self.has_permission(permission) {
            Ok(())
        } else {
            Err(AppError::with_message(
                ErrorCode::PermissionDenied,
                format!("Missing permission: {permission}"),
            )
            .with_detail("permission", permission))
        }
    }

    /// Fail with `NotResourceOwner` unless the actor is `owner_id`
    pub fn require_owner(&self, owner_id: i64) -> AppResult<()> {
        if self.id == owner_id {
            Ok(())
        } else {
            Err(AppError::with_message(
                ErrorCode::NotResourceOwner,
                "Only the client who booked this appointment may change it",
            ))
        }
    }
}
