//! Monthly statements for a single farmer.

use std::cmp::Reverse;

use crate::core::services::SummaryService;
use crate::domain::{CollectionEntry, Farmer, MonthPeriod, MonthlyStatement};

pub struct StatementService;

impl StatementService {
    /// Builds the statement for `farmer` in `period`.
    ///
    /// Entries belonging to other farmers or months are dropped first. Returns
    /// `None` when nothing remains: an empty month never produces a statement.
    /// Entries are listed newest first; the ordering has no effect on totals.
    pub fn build_statement(
        farmer: &Farmer,
        period: MonthPeriod,
        month_entries: &[CollectionEntry],
    ) -> Option<MonthlyStatement> {
        let mut entries: Vec<CollectionEntry> = month_entries
            .iter()
            .filter(|entry| entry.farmer_id == farmer.id && period.contains(entry.date))
            .cloned()
            .collect();
        if entries.is_empty() {
            return None;
        }
        entries.sort_by_key(|entry| Reverse((entry.date, entry.created_at)));

        Some(MonthlyStatement {
            farmer_id: farmer.id,
            farmer_name: farmer.name.clone(),
            phone: farmer.phone.clone(),
            month: period.month,
            year: period.year,
            total_quantity: SummaryService::total_quantity(&entries),
            total_amount: SummaryService::total_amount(&entries),
            average_fat: SummaryService::average_fat(&entries),
            entries,
        })
    }

    /// Statements for every farmer with activity in `period`, in farmer order.
    pub fn build_all(
        farmers: &[Farmer],
        period: MonthPeriod,
        month_entries: &[CollectionEntry],
    ) -> Vec<MonthlyStatement> {
        farmers
            .iter()
            .filter_map(|farmer| Self::build_statement(farmer, period, month_entries))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FarmerInput, Session};
    use chrono::{Duration, NaiveDate, Utc};
    use uuid::Uuid;

    fn farmer() -> Farmer {
        Farmer::new(
            Uuid::new_v4(),
            FarmerInput::new("Gopal").with_phone("9000000001"),
            Utc::now(),
        )
    }

    fn entry(farmer: &Farmer, date: NaiveDate, fat: f64, qty: f64, amount: f64) -> CollectionEntry {
        CollectionEntry {
            id: Uuid::new_v4(),
            dairy_center_id: farmer.dairy_center_id,
            farmer_id: farmer.id,
            farmer_name: farmer.name.clone(),
            date,
            session: Session::Morning,
            fat_percentage: fat,
            quantity_liters: qty,
            rate_per_liter: amount / qty,
            total_amount: amount,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn empty_month_yields_no_statement() {
        let period = MonthPeriod::new(2024, 3).unwrap();
        assert!(StatementService::build_statement(&farmer(), period, &[]).is_none());
    }

    #[test]
    fn statement_totals_and_average_fat() {
        let farmer = farmer();
        let period = MonthPeriod::new(2024, 3).unwrap();
        let entries = vec![
            entry(&farmer, period.first_day(), 3.5, 5.0, 150.0),
            entry(&farmer, period.last_day(), 4.5, 5.0, 200.0),
        ];
        let statement = StatementService::build_statement(&farmer, period, &entries).unwrap();
        assert_eq!(statement.total_quantity, 10.0);
        assert_eq!(statement.total_amount, 350.0);
        assert_eq!(statement.average_fat, 4.0);
        assert_eq!(statement.phone.as_deref(), Some("9000000001"));
        assert_eq!(statement.period_label(), "March 2024");
    }

    #[test]
    fn entries_are_sorted_newest_first() {
        let farmer = farmer();
        let period = MonthPeriod::new(2024, 3).unwrap();
        let first = period.first_day();
        let entries = vec![
            entry(&farmer, first, 4.0, 1.0, 35.0),
            entry(&farmer, first + Duration::days(10), 4.0, 1.0, 35.0),
            entry(&farmer, first + Duration::days(5), 4.0, 1.0, 35.0),
        ];
        let statement = StatementService::build_statement(&farmer, period, &entries).unwrap();
        let dates: Vec<_> = statement.entries.iter().map(|e| e.date).collect();
        assert_eq!(
            dates,
            vec![
                first + Duration::days(10),
                first + Duration::days(5),
                first
            ]
        );
    }

    #[test]
    fn foreign_entries_are_excluded() {
        let farmer = farmer();
        let other = Farmer::new(farmer.dairy_center_id, FarmerInput::new("Other"), Utc::now());
        let period = MonthPeriod::new(2024, 3).unwrap();
        let entries = vec![
            entry(&other, period.first_day(), 4.0, 3.0, 105.0),
            entry(&farmer, period.next().first_day(), 4.0, 3.0, 105.0),
        ];
        assert!(StatementService::build_statement(&farmer, period, &entries).is_none());

        let all = StatementService::build_all(&[farmer, other.clone()], period, &entries);
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].farmer_id, other.id);
    }
}
