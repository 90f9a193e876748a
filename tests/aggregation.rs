mod common;

use std::collections::HashSet;

use common::{entry, june, setup_center};
use dairy_core::{
    core::services::{CollectionService, RatePolicy, SummaryService},
    core::time::FixedClock,
    domain::{EntryDraft, FarmerInput, MonthPeriod, Session},
    storage::FarmerDirectory,
};
use uuid::Uuid;

#[test]
fn totals_sum_stored_amounts_in_any_order() {
    let farmer = Uuid::new_v4();
    let mut entries = vec![
        entry(farmer, june(1), Session::Morning, 3.5, 5.0, 150.0),
        entry(farmer, june(2), Session::Evening, 4.5, 5.0, 200.5),
        entry(Uuid::new_v4(), june(2), Session::Morning, 4.0, 2.5, 87.25),
    ];
    let forward = SummaryService::total_amount(&entries);
    entries.reverse();
    let backward = SummaryService::total_amount(&entries);
    entries.swap(0, 1);
    let shuffled = SummaryService::total_amount(&entries);

    assert_eq!(forward, 437.75);
    assert_eq!(forward, backward);
    assert_eq!(forward, shuffled);
}

#[test]
fn amounts_are_not_recomputed_from_rates() {
    let farmer = Uuid::new_v4();
    let mut old = entry(farmer, june(1), Session::Morning, 4.0, 10.0, 300.0);
    old.rate_per_liter = 30.0;
    let entries = vec![old];
    assert_eq!(SummaryService::total_amount(&entries), 300.0);
}

#[test]
fn average_fat_is_weighted_by_quantity() {
    let farmer = Uuid::new_v4();
    let equal = vec![
        entry(farmer, june(1), Session::Morning, 3.0, 10.0, 250.0),
        entry(farmer, june(1), Session::Evening, 4.0, 10.0, 350.0),
    ];
    assert_eq!(SummaryService::average_fat(&equal), 3.5);

    let skewed = vec![
        entry(farmer, june(1), Session::Morning, 3.0, 30.0, 750.0),
        entry(farmer, june(1), Session::Evening, 5.0, 10.0, 450.0),
    ];
    assert_eq!(SummaryService::average_fat(&skewed), 3.5);
}

#[test]
fn empty_sets_average_to_zero() {
    assert_eq!(SummaryService::average_fat(&[]), 0.0);
    let summary = SummaryService::daily_summary(june(1), &[]);
    assert_eq!(summary.total_quantity, 0.0);
    assert_eq!(summary.total_amount, 0.0);
    assert_eq!(summary.farmers_count, 0);
}

#[test]
fn recorded_day_splits_by_session() {
    let env = setup_center(june(15));
    let farmer = env
        .storage
        .create_farmer(env.center.id, FarmerInput::new("Ramesh"))
        .expect("create farmer");
    let policy = RatePolicy::default();
    for session in Session::ALL {
        let recorded = CollectionService::record(
            &env.ctx,
            &env.storage,
            &policy,
            EntryDraft {
                farmer_id: farmer.id,
                session,
                fat_percentage: 4.5,
                quantity_liters: 10.0,
                date: None,
            },
        )
        .expect("record entry");
        assert_eq!(recorded.rate_per_liter, 40.00);
        assert_eq!(recorded.total_amount, 400.00);
        assert_eq!(recorded.date, june(15));
    }

    let summary = CollectionService::today_summary(
        &env.ctx,
        &env.storage,
        &FixedClock::at_date(june(15)),
    )
    .expect("today summary");
    assert_eq!(summary.total_quantity, 20.0);
    assert_eq!(summary.total_amount, 800.0);
    assert_eq!(summary.morning_quantity, 10.0);
    assert_eq!(summary.evening_quantity, 10.0);
    assert_eq!(summary.farmers_count, 1);
    assert_eq!(summary.entry_count, 2);
}

#[test]
fn month_summary_counts_distinct_farmers() {
    let env = setup_center(june(20));
    let policy = RatePolicy::default();
    let mut ids = HashSet::new();
    for name in ["Asha", "Bhim"] {
        let farmer = env
            .storage
            .create_farmer(env.center.id, FarmerInput::new(name))
            .expect("create farmer");
        ids.insert(farmer.id);
        for day in [1, 2] {
            CollectionService::record(
                &env.ctx,
                &env.storage,
                &policy,
                EntryDraft {
                    farmer_id: farmer.id,
                    session: Session::Morning,
                    fat_percentage: 3.5,
                    quantity_liters: 2.0,
                    date: Some(june(day)),
                },
            )
            .expect("record entry");
        }
    }

    let period = MonthPeriod::new(2024, 6).expect("period");
    let summary =
        CollectionService::month_summary(&env.ctx, &env.storage, period).expect("month summary");
    assert_eq!(summary.unique_farmers, ids.len());
    assert_eq!(summary.entry_count, 4);
    assert_eq!(summary.total_quantity, 8.0);
    assert_eq!(summary.total_amount, 240.0);

    let july = MonthPeriod::new(2024, 7).expect("period");
    let empty = CollectionService::month_summary(&env.ctx, &env.storage, july).expect("summary");
    assert_eq!(empty.entry_count, 0);
}
