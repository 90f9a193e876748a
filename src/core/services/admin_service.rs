//! Dairy-center administration and user access.

use tracing::{info, warn};
use uuid::Uuid;

use crate::core::context::RequestContext;
use crate::core::errors::DairyError;
use crate::domain::{CenterInput, DairyCenter, Role, UserProfile};
use crate::storage::CenterDirectory;

use super::{ServiceError, ServiceResult};

pub struct AdminService;

impl AdminService {
    /// Signs a user in by email, registering unknown addresses.
    ///
    /// The very first profile ever created is made a super admin so a fresh
    /// installation can be administered.
    pub fn sign_in(
        directory: &dyn CenterDirectory,
        email: &str,
        full_name: Option<String>,
    ) -> ServiceResult<UserProfile> {
        let email = email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(ServiceError::Invalid(format!(
                "`{}` is not a valid email address",
                email
            )));
        }
        if let Some(existing) = directory.user_by_email(email)? {
            return Ok(existing);
        }
        let bootstrap = directory.list_users()?.is_empty();
        let mut profile = directory.create_user(email, full_name)?;
        if bootstrap {
            profile = directory.assign_role(profile.id, Role::SuperAdmin)?;
            info!(user = %profile.email, "first user promoted to super admin");
        } else {
            info!(user = %profile.email, "user registered");
        }
        Ok(profile)
    }

    pub fn list_centers(
        ctx: &RequestContext,
        directory: &dyn CenterDirectory,
    ) -> ServiceResult<Vec<DairyCenter>> {
        Self::authorize(ctx)?;
        Ok(directory.list_centers()?)
    }

    /// The center the caller is assigned to.
    pub fn current_center(
        ctx: &RequestContext,
        directory: &dyn CenterDirectory,
    ) -> ServiceResult<DairyCenter> {
        let id = ctx.require_center()?;
        directory
            .center(id)?
            .ok_or_else(|| DairyError::CenterNotFound(id.to_string()).into())
    }

    pub fn add_center(
        ctx: &RequestContext,
        directory: &dyn CenterDirectory,
        input: CenterInput,
    ) -> ServiceResult<DairyCenter> {
        Self::authorize(ctx)?;
        let input = Self::validate_center(input)?;
        let center = directory.create_center(input)?;
        info!(center = %center.id, name = %center.name, "dairy center created");
        Ok(center)
    }

    pub fn edit_center(
        ctx: &RequestContext,
        directory: &dyn CenterDirectory,
        id: Uuid,
        input: CenterInput,
    ) -> ServiceResult<DairyCenter> {
        Self::authorize(ctx)?;
        let input = Self::validate_center(input)?;
        Ok(directory.update_center(id, input)?)
    }

    /// Deletes a center without farmers; its users lose their assignment.
    pub fn remove_center(
        ctx: &RequestContext,
        directory: &dyn CenterDirectory,
        id: Uuid,
    ) -> ServiceResult<()> {
        Self::authorize(ctx)?;
        directory.delete_center(id)?;
        info!(center = %id, "dairy center removed");
        Ok(())
    }

    pub fn list_users(
        ctx: &RequestContext,
        directory: &dyn CenterDirectory,
    ) -> ServiceResult<Vec<UserProfile>> {
        Self::authorize(ctx)?;
        Ok(directory.list_users()?)
    }

    pub fn assign_center(
        ctx: &RequestContext,
        directory: &dyn CenterDirectory,
        user_id: Uuid,
        dairy_center_id: Option<Uuid>,
    ) -> ServiceResult<UserProfile> {
        Self::authorize(ctx)?;
        let profile = directory.assign_center(user_id, dairy_center_id)?;
        info!(user = %profile.email, center = ?dairy_center_id, "user center assigned");
        Ok(profile)
    }

    pub fn assign_role(
        ctx: &RequestContext,
        directory: &dyn CenterDirectory,
        user_id: Uuid,
        role: Role,
    ) -> ServiceResult<UserProfile> {
        Self::authorize(ctx)?;
        if ctx.user_id == Some(user_id) && !role.is_super_admin() {
            return Err(ServiceError::Invalid(
                "Super admins cannot demote themselves".into(),
            ));
        }
        let profile = directory.assign_role(user_id, role)?;
        info!(user = %profile.email, role = %role, "user role assigned");
        Ok(profile)
    }

    fn authorize(ctx: &RequestContext) -> ServiceResult<()> {
        ctx.require_super_admin().map_err(|err| {
            warn!(user = ?ctx.user_id, "admin operation denied");
            ServiceError::from(err)
        })
    }

    fn validate_center(input: CenterInput) -> ServiceResult<CenterInput> {
        let name = input.name.trim().to_string();
        if name.is_empty() {
            return Err(ServiceError::Invalid("Center name is required".into()));
        }
        let blank_to_none = |value: Option<String>| {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        Ok(CenterInput {
            name,
            address: blank_to_none(input.address),
            phone: blank_to_none(input.phone),
        })
    }
}
