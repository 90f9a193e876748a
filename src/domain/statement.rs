//! Derived, non-persisted summaries produced by the aggregation services.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entry::CollectionEntry;
use crate::domain::period::{month_name, MonthPeriod};

/// Totals for one collection day, split by session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub total_quantity: f64,
    pub total_amount: f64,
    pub morning_quantity: f64,
    pub evening_quantity: f64,
    pub farmers_count: usize,
    pub entry_count: usize,
}

/// Totals for a calendar month across every farmer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PeriodSummary {
    pub period: MonthPeriod,
    pub total_quantity: f64,
    pub total_amount: f64,
    pub unique_farmers: usize,
    pub entry_count: usize,
}

/// Per-farmer totals within some set of entries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FarmerTotals {
    pub farmer_id: Uuid,
    pub farmer_name: String,
    pub total_quantity: f64,
    pub total_amount: f64,
    pub average_fat: f64,
    pub entry_count: usize,
}

/// One farmer's collections for a month.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonthlyStatement {
    pub farmer_id: Uuid,
    pub farmer_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub month: u32,
    pub year: i32,
    pub entries: Vec<CollectionEntry>,
    pub total_quantity: f64,
    pub total_amount: f64,
    pub average_fat: f64,
}

impl MonthlyStatement {
    pub fn month_name(&self) -> &'static str {
        month_name(self.month)
    }

    pub fn period(&self) -> MonthPeriod {
        MonthPeriod {
            year: self.year,
            month: self.month,
        }
    }

    pub fn period_label(&self) -> String {
        format!("{} {}", self.month_name(), self.year)
    }
}
