//! Milk collection entries and the collection session they belong to.

use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::errors::DairyError;
use crate::domain::common::*;
use crate::domain::period::DateRange;

/// One of the two daily collection windows.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Session {
    Morning,
    Evening,
}

impl Session {
    pub const ALL: [Session; 2] = [Session::Morning, Session::Evening];

    pub fn as_str(&self) -> &'static str {
        match self {
            Session::Morning => "morning",
            Session::Evening => "evening",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Session::Morning => "Morning",
            Session::Evening => "Evening",
        }
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Session {
    type Err = DairyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "morning" | "am" | "m" => Ok(Session::Morning),
            "evening" | "pm" | "e" => Ok(Session::Evening),
            other => Err(DairyError::InvalidInput(format!(
                "unknown session `{other}` (expected morning or evening)"
            ))),
        }
    }
}

/// A single recorded milk delivery.
///
/// `rate_per_liter` and `total_amount` are frozen at creation time; later
/// changes to the pricing policy never touch stored entries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CollectionEntry {
    pub id: Uuid,
    pub dairy_center_id: Uuid,
    pub farmer_id: Uuid,
    pub farmer_name: String,
    pub date: NaiveDate,
    pub session: Session,
    pub fat_percentage: f64,
    pub quantity_liters: f64,
    pub rate_per_liter: f64,
    pub total_amount: f64,
    pub created_at: DateTime<Utc>,
}

impl Identifiable for CollectionEntry {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl CenterScoped for CollectionEntry {
    fn dairy_center_id(&self) -> Uuid {
        self.dairy_center_id
    }
}

impl Displayable for CollectionEntry {
    fn display_label(&self) -> String {
        format!(
            "{} {} {}: {} L @ {:.2}",
            self.date, self.session, self.farmer_name, self.quantity_liters, self.rate_per_liter
        )
    }
}

/// Values handed to an entry sink once pricing has been applied.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEntry {
    pub dairy_center_id: Uuid,
    pub farmer_id: Uuid,
    pub session: Session,
    pub fat_percentage: f64,
    pub quantity_liters: f64,
    pub rate: f64,
    pub amount: f64,
    pub date: Option<NaiveDate>,
}

/// Operator input for a new collection, before pricing.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryDraft {
    pub farmer_id: Uuid,
    pub session: Session,
    pub fat_percentage: f64,
    pub quantity_liters: f64,
    pub date: Option<NaiveDate>,
}

/// Query used by entry sources. Results are always limited to one center.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryFilter {
    pub dairy_center_id: Uuid,
    pub date_range: Option<DateRange>,
    pub farmer_id: Option<Uuid>,
    pub session: Option<Session>,
}

impl EntryFilter {
    pub fn for_center(dairy_center_id: Uuid) -> Self {
        Self {
            dairy_center_id,
            date_range: None,
            farmer_id: None,
            session: None,
        }
    }

    pub fn with_range(mut self, range: DateRange) -> Self {
        self.date_range = Some(range);
        self
    }

    pub fn with_farmer(mut self, farmer_id: Uuid) -> Self {
        self.farmer_id = Some(farmer_id);
        self
    }

    pub fn with_session(mut self, session: Session) -> Self {
        self.session = Some(session);
        self
    }

    pub fn matches(&self, entry: &CollectionEntry) -> bool {
        entry.dairy_center_id == self.dairy_center_id
            && self
                .date_range
                .map_or(true, |range| range.contains(entry.date))
            && self.farmer_id.map_or(true, |id| entry.farmer_id == id)
            && self.session.map_or(true, |session| entry.session == session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_parses_case_insensitively() {
        assert_eq!("Morning".parse::<Session>().unwrap(), Session::Morning);
        assert_eq!(" EVENING ".parse::<Session>().unwrap(), Session::Evening);
        assert!("noon".parse::<Session>().is_err());
    }

    #[test]
    fn session_serializes_as_snake_case() {
        let json = serde_json::to_string(&Session::Evening).unwrap();
        assert_eq!(json, "\"evening\"");
    }

    #[test]
    fn filter_matches_center_and_optional_fields() {
        let center = Uuid::new_v4();
        let farmer = Uuid::new_v4();
        let date = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
        let entry = CollectionEntry {
            id: Uuid::new_v4(),
            dairy_center_id: center,
            farmer_id: farmer,
            farmer_name: "Ravi".into(),
            date,
            session: Session::Morning,
            fat_percentage: 4.0,
            quantity_liters: 5.0,
            rate_per_liter: 35.0,
            total_amount: 175.0,
            created_at: Utc::now(),
        };

        assert!(EntryFilter::for_center(center).matches(&entry));
        assert!(!EntryFilter::for_center(Uuid::new_v4()).matches(&entry));
        assert!(EntryFilter::for_center(center)
            .with_farmer(farmer)
            .with_session(Session::Morning)
            .with_range(DateRange::single_day(date))
            .matches(&entry));
        assert!(!EntryFilter::for_center(center)
            .with_session(Session::Evening)
            .matches(&entry));
    }
}
