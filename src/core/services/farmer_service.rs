use tracing::{info, warn};
use uuid::Uuid;

use crate::core::context::RequestContext;
use crate::domain::{short_id, Farmer, FarmerInput};
use crate::storage::FarmerDirectory;

use super::{ServiceError, ServiceResult};

/// Farmer registration scoped to the caller's dairy center.
pub struct FarmerService;

impl FarmerService {
    pub fn list(ctx: &RequestContext, directory: &dyn FarmerDirectory) -> ServiceResult<Vec<Farmer>> {
        Ok(directory.list_farmers(ctx.require_center()?)?)
    }

    /// Farmers whose name, phone or village contains `needle`.
    pub fn search(
        ctx: &RequestContext,
        directory: &dyn FarmerDirectory,
        needle: &str,
    ) -> ServiceResult<Vec<Farmer>> {
        Ok(Self::list(ctx, directory)?
            .into_iter()
            .filter(|farmer| farmer.matches_search(needle))
            .collect())
    }

    pub fn get(
        ctx: &RequestContext,
        directory: &dyn FarmerDirectory,
        id: Uuid,
    ) -> ServiceResult<Farmer> {
        let center = ctx.require_center()?;
        directory
            .farmer(id)?
            .filter(|farmer| farmer.dairy_center_id == center)
            .ok_or_else(|| ServiceError::Invalid("Farmer not found".into()))
    }

    /// Resolves a full id, short id prefix or exact (case-insensitive) name.
    pub fn resolve(
        ctx: &RequestContext,
        directory: &dyn FarmerDirectory,
        key: &str,
    ) -> ServiceResult<Farmer> {
        let key = key.trim();
        if let Ok(id) = Uuid::parse_str(key) {
            return Self::get(ctx, directory, id);
        }
        let farmers = Self::list(ctx, directory)?;
        let lowered = key.to_lowercase();
        let mut matches: Vec<Farmer> = farmers
            .into_iter()
            .filter(|farmer| {
                farmer.name.to_lowercase() == lowered
                    || (!lowered.is_empty() && short_id(farmer.id).starts_with(&lowered))
            })
            .collect();
        match matches.len() {
            0 => Err(ServiceError::Invalid(format!("Farmer `{}` not found", key))),
            1 => Ok(matches.remove(0)),
            _ => Err(ServiceError::Invalid(format!(
                "`{}` matches several farmers; use the id instead",
                key
            ))),
        }
    }

    pub fn add(
        ctx: &RequestContext,
        directory: &dyn FarmerDirectory,
        input: FarmerInput,
    ) -> ServiceResult<Farmer> {
        let center = ctx.require_center()?;
        let input = Self::validate(input)?;
        let farmer = directory.create_farmer(center, input)?;
        info!(farmer = %farmer.id, name = %farmer.name, "farmer registered");
        Ok(farmer)
    }

    pub fn edit(
        ctx: &RequestContext,
        directory: &dyn FarmerDirectory,
        id: Uuid,
        input: FarmerInput,
    ) -> ServiceResult<Farmer> {
        Self::get(ctx, directory, id)?;
        let input = Self::validate(input)?;
        let farmer = directory.update_farmer(id, input)?;
        info!(farmer = %farmer.id, "farmer updated");
        Ok(farmer)
    }

    /// Removes the farmer. Past collection entries are kept.
    pub fn remove(
        ctx: &RequestContext,
        directory: &dyn FarmerDirectory,
        id: Uuid,
    ) -> ServiceResult<()> {
        Self::get(ctx, directory, id)?;
        directory.delete_farmer(id)?;
        info!(farmer = %id, "farmer removed");
        Ok(())
    }

    fn validate(input: FarmerInput) -> ServiceResult<FarmerInput> {
        let input = input.normalized();
        if input.name.is_empty() {
            warn!("farmer rejected: empty name");
            return Err(ServiceError::Invalid("Farmer name is required".into()));
        }
        if let Some(phone) = &input.phone {
            if !phone.chars().all(|c| c.is_ascii_digit() || c == '+' || c == ' ') {
                return Err(ServiceError::Invalid(format!(
                    "Phone `{}` may only contain digits",
                    phone
                )));
            }
        }
        Ok(input)
    }
}
