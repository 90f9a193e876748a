//! Explicit caller identity passed into every service call.

use uuid::Uuid;

use crate::core::errors::{DairyError, Result};
use crate::domain::{Role, UserProfile};

/// Who is acting and which center their reads and writes are scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestContext {
    pub user_id: Option<Uuid>,
    pub dairy_center_id: Option<Uuid>,
    pub role: Role,
}

impl RequestContext {
    pub fn for_user(profile: &UserProfile) -> Self {
        Self {
            user_id: Some(profile.id),
            dairy_center_id: profile.dairy_center_id,
            role: profile.role,
        }
    }

    /// Context without a user, scoped to a center. Used by tooling and tests.
    pub fn for_center(dairy_center_id: Uuid) -> Self {
        Self {
            user_id: None,
            dairy_center_id: Some(dairy_center_id),
            role: Role::None,
        }
    }

    pub fn anonymous() -> Self {
        Self {
            user_id: None,
            dairy_center_id: None,
            role: Role::None,
        }
    }

    /// Center the caller is bound to, or [`DairyError::NoDairyCenter`].
    pub fn require_center(&self) -> Result<Uuid> {
        self.dairy_center_id.ok_or(DairyError::NoDairyCenter)
    }

    pub fn require_super_admin(&self) -> Result<()> {
        if self.role.is_super_admin() {
            Ok(())
        } else {
            Err(DairyError::PermissionDenied(
                "super admin role required".into(),
            ))
        }
    }
}
