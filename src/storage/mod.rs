pub mod json_backend;

use uuid::Uuid;

use crate::core::errors::Result;
use crate::domain::{
    CenterInput, CollectionEntry, DairyCenter, EntryFilter, Farmer, FarmerInput, NewEntry, Role,
    UserProfile,
};

/// Read side of collection entries. Results are newest first.
pub trait EntrySource: Send + Sync {
    fn list_entries(&self, filter: &EntryFilter) -> Result<Vec<CollectionEntry>>;
}

/// Write side of collection entries. Rate and amount are stored as given.
pub trait EntrySink: Send + Sync {
    fn create_entry(&self, entry: NewEntry) -> Result<CollectionEntry>;
}

/// Farmers registered at each dairy center.
pub trait FarmerDirectory: Send + Sync {
    fn list_farmers(&self, dairy_center_id: Uuid) -> Result<Vec<Farmer>>;
    fn farmer(&self, id: Uuid) -> Result<Option<Farmer>>;
    fn create_farmer(&self, dairy_center_id: Uuid, input: FarmerInput) -> Result<Farmer>;
    fn update_farmer(&self, id: Uuid, input: FarmerInput) -> Result<Farmer>;
    fn delete_farmer(&self, id: Uuid) -> Result<()>;
}

/// Dairy centers and the users assigned to them.
pub trait CenterDirectory: Send + Sync {
    fn list_centers(&self) -> Result<Vec<DairyCenter>>;
    fn center(&self, id: Uuid) -> Result<Option<DairyCenter>>;
    fn create_center(&self, input: CenterInput) -> Result<DairyCenter>;
    fn update_center(&self, id: Uuid, input: CenterInput) -> Result<DairyCenter>;
    fn delete_center(&self, id: Uuid) -> Result<()>;

    fn list_users(&self) -> Result<Vec<UserProfile>>;
    fn user(&self, id: Uuid) -> Result<Option<UserProfile>>;
    fn user_by_email(&self, email: &str) -> Result<Option<UserProfile>>;
    fn create_user(&self, email: &str, full_name: Option<String>) -> Result<UserProfile>;
    fn assign_center(&self, user_id: Uuid, dairy_center_id: Option<Uuid>) -> Result<UserProfile>;
    fn assign_role(&self, user_id: Uuid, role: Role) -> Result<UserProfile>;
}

pub use json_backend::{BackupInfo, JsonStorage, StoreDocument, STORE_SCHEMA_VERSION};
