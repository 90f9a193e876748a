//! Folds collection entries into daily, monthly and per-farmer totals.
//!
//! Every aggregate is a plain sum, so the order of the input never matters.
//! Amounts are summed from each entry's stored `total_amount` rather than
//! recomputed, which keeps historical prices intact.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::{
    CollectionEntry, DailySummary, FarmerTotals, MonthPeriod, PeriodSummary, Session,
};

pub struct SummaryService;

impl SummaryService {
    pub fn total_quantity(entries: &[CollectionEntry]) -> f64 {
        entries.iter().map(|entry| entry.quantity_liters).sum()
    }

    pub fn total_amount(entries: &[CollectionEntry]) -> f64 {
        entries.iter().map(|entry| entry.total_amount).sum()
    }

    pub fn session_quantity(entries: &[CollectionEntry], session: Session) -> f64 {
        entries
            .iter()
            .filter(|entry| entry.session == session)
            .map(|entry| entry.quantity_liters)
            .sum()
    }

    /// Quantity-weighted fat percentage; 0 when there is no quantity to weigh.
    pub fn average_fat(entries: &[CollectionEntry]) -> f64 {
        let total_quantity = Self::total_quantity(entries);
        if total_quantity > 0.0 {
            let weighted: f64 = entries
                .iter()
                .map(|entry| entry.fat_percentage * entry.quantity_liters)
                .sum();
            weighted / total_quantity
        } else {
            0.0
        }
    }

    pub fn unique_farmers(entries: &[CollectionEntry]) -> usize {
        entries
            .iter()
            .map(|entry| entry.farmer_id)
            .collect::<HashSet<_>>()
            .len()
    }

    pub fn entries_for_day(entries: &[CollectionEntry], date: NaiveDate) -> Vec<CollectionEntry> {
        entries
            .iter()
            .filter(|entry| entry.date == date)
            .cloned()
            .collect()
    }

    pub fn entries_in_period(
        entries: &[CollectionEntry],
        period: MonthPeriod,
    ) -> Vec<CollectionEntry> {
        entries
            .iter()
            .filter(|entry| period.contains(entry.date))
            .cloned()
            .collect()
    }

    /// Dashboard totals for `date`; entries from other days are ignored.
    pub fn daily_summary(date: NaiveDate, entries: &[CollectionEntry]) -> DailySummary {
        let day = Self::entries_for_day(entries, date);
        DailySummary {
            date,
            total_quantity: Self::total_quantity(&day),
            total_amount: Self::total_amount(&day),
            morning_quantity: Self::session_quantity(&day, Session::Morning),
            evening_quantity: Self::session_quantity(&day, Session::Evening),
            farmers_count: Self::unique_farmers(&day),
            entry_count: day.len(),
        }
    }

    /// Month totals across all farmers; entries outside `period` are ignored.
    pub fn period_summary(period: MonthPeriod, entries: &[CollectionEntry]) -> PeriodSummary {
        let scoped = Self::entries_in_period(entries, period);
        PeriodSummary {
            period,
            total_quantity: Self::total_quantity(&scoped),
            total_amount: Self::total_amount(&scoped),
            unique_farmers: Self::unique_farmers(&scoped),
            entry_count: scoped.len(),
        }
    }

    /// One summary per day of `period` that has at least one entry, ascending.
    pub fn daily_breakdown(period: MonthPeriod, entries: &[CollectionEntry]) -> Vec<DailySummary> {
        let mut by_day: BTreeMap<NaiveDate, Vec<CollectionEntry>> = BTreeMap::new();
        for entry in entries.iter().filter(|entry| period.contains(entry.date)) {
            by_day.entry(entry.date).or_default().push(entry.clone());
        }
        by_day
            .into_iter()
            .map(|(date, day)| Self::daily_summary(date, &day))
            .collect()
    }

    /// Totals grouped by farmer, sorted by farmer name.
    pub fn farmer_totals(entries: &[CollectionEntry]) -> Vec<FarmerTotals> {
        let mut grouped: HashMap<Uuid, Vec<CollectionEntry>> = HashMap::new();
        for entry in entries {
            grouped.entry(entry.farmer_id).or_default().push(entry.clone());
        }
        let mut totals: Vec<FarmerTotals> = grouped
            .into_iter()
            .map(|(farmer_id, group)| FarmerTotals {
                farmer_id,
                farmer_name: display_name(&group),
                total_quantity: Self::total_quantity(&group),
                total_amount: Self::total_amount(&group),
                average_fat: Self::average_fat(&group),
                entry_count: group.len(),
            })
            .collect();
        totals.sort_by(|a, b| {
            a.farmer_name
                .to_lowercase()
                .cmp(&b.farmer_name.to_lowercase())
                .then(a.farmer_id.cmp(&b.farmer_id))
        });
        totals
    }
}

/// Most recent denormalized name captured for a farmer's entries.
fn display_name(group: &[CollectionEntry]) -> String {
    group
        .iter()
        .max_by_key(|entry| (entry.date, entry.created_at))
        .map(|entry| entry.farmer_name.clone())
        .unwrap_or_default()
}
