use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::*;

/// A milk supplier registered at a dairy center.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Farmer {
    pub id: Uuid,
    pub dairy_center_id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub village: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Farmer {
    pub fn new(dairy_center_id: Uuid, input: FarmerInput, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            dairy_center_id,
            name: input.name,
            phone: input.phone,
            village: input.village,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrites the editable fields with `input`.
    pub fn apply(&mut self, input: FarmerInput, now: DateTime<Utc>) {
        self.name = input.name;
        self.phone = input.phone;
        self.village = input.village;
        self.updated_at = now;
    }

    /// Case-insensitive match on name, phone or village.
    pub fn matches_search(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(&needle)
            || self
                .phone
                .as_deref()
                .is_some_and(|phone| phone.contains(&needle))
            || self
                .village
                .as_deref()
                .is_some_and(|village| village.to_lowercase().contains(&needle))
    }
}

impl Identifiable for Farmer {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl NamedEntity for Farmer {
    fn name(&self) -> &str {
        &self.name
    }
}

impl CenterScoped for Farmer {
    fn dairy_center_id(&self) -> Uuid {
        self.dairy_center_id
    }
}

impl Displayable for Farmer {
    fn display_label(&self) -> String {
        match &self.village {
            Some(village) => format!("{} ({})", self.name, village),
            None => self.name.clone(),
        }
    }
}

/// Editable farmer fields. Blank optional values are stored as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FarmerInput {
    pub name: String,
    pub phone: Option<String>,
    pub village: Option<String>,
}

impl FarmerInput {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: None,
            village: None,
        }
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = non_blank(phone.into());
        self
    }

    pub fn with_village(mut self, village: impl Into<String>) -> Self {
        self.village = non_blank(village.into());
        self
    }

    /// Trims every field and drops empty optionals.
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            phone: self.phone.and_then(non_blank),
            village: self.village.and_then(non_blank),
        }
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_input_drops_blank_optionals() {
        let input = FarmerInput {
            name: "  Sita Devi ".into(),
            phone: Some("   ".into()),
            village: Some(" Rampur ".into()),
        }
        .normalized();
        assert_eq!(input.name, "Sita Devi");
        assert_eq!(input.phone, None);
        assert_eq!(input.village.as_deref(), Some("Rampur"));
    }

    #[test]
    fn search_checks_name_phone_and_village() {
        let farmer = Farmer::new(
            Uuid::new_v4(),
            FarmerInput::new("Mohan Lal")
                .with_phone("9876543210")
                .with_village("Kheda"),
            Utc::now(),
        );
        assert!(farmer.matches_search("mohan"));
        assert!(farmer.matches_search("98765"));
        assert!(farmer.matches_search("KHEDA"));
        assert!(farmer.matches_search(""));
        assert!(!farmer.matches_search("anand"));
    }
}
