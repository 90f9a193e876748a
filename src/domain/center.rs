//! Dairy centers, user profiles and administrative roles.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::errors::DairyError;
use crate::domain::common::*;

/// A collection site that scopes farmers and entries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DairyCenter {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DairyCenter {
    pub fn new(input: CenterInput, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: input.name,
            address: input.address,
            phone: input.phone,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, input: CenterInput, now: DateTime<Utc>) {
        self.name = input.name;
        self.address = input.address;
        self.phone = input.phone;
        self.updated_at = now;
    }
}

impl Identifiable for DairyCenter {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl NamedEntity for DairyCenter {
    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CenterInput {
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
}

/// Administrative role assigned to a user.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    DairyDirector,
    #[default]
    None,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "super_admin",
            Role::DairyDirector => "dairy_director",
            Role::None => "none",
        }
    }

    pub fn is_super_admin(&self) -> bool {
        matches!(self, Role::SuperAdmin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Role::SuperAdmin => "Super Admin",
            Role::DairyDirector => "Dairy Director",
            Role::None => "No role",
        };
        f.write_str(label)
    }
}

impl FromStr for Role {
    type Err = DairyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "super_admin" | "admin" => Ok(Role::SuperAdmin),
            "dairy_director" | "director" => Ok(Role::DairyDirector),
            "none" | "" => Ok(Role::None),
            other => Err(DairyError::InvalidInput(format!("unknown role `{other}`"))),
        }
    }
}

/// A user of the application and their center assignment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dairy_center_id: Option<Uuid>,
    #[serde(default)]
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    pub fn new(email: impl Into<String>, full_name: Option<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.into().trim().to_lowercase(),
            full_name,
            dairy_center_id: None,
            role: Role::None,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Identifiable for UserProfile {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Displayable for UserProfile {
    fn display_label(&self) -> String {
        match &self.full_name {
            Some(name) => format!("{} <{}>", name, self.email),
            None => self.email.clone(),
        }
    }
}
