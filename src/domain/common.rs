//! Shared traits implemented by the dairy domain entities.

use uuid::Uuid;

/// Exposes a stable identifier for stored entities.
pub trait Identifiable {
    fn id(&self) -> Uuid;
}

/// Provides read-only access to an entity's display name.
pub trait NamedEntity {
    fn name(&self) -> &str;
}

/// Converts an entity into a user-facing display label.
pub trait Displayable {
    fn display_label(&self) -> String;
}

/// Entities that belong to a single dairy center.
pub trait CenterScoped {
    fn dairy_center_id(&self) -> Uuid;
}

/// Returns the first eight hex characters of an identifier, used in listings.
pub fn short_id(id: Uuid) -> String {
    let mut short = id.simple().to_string();
    short.truncate(8);
    short
}
