mod common;

use chrono::Utc;
use common::{entry, june, setup_center};
use dairy_core::{
    core::services::{CollectionService, RatePolicy, StatementService},
    domain::{EntryDraft, Farmer, FarmerInput, MonthPeriod, Session},
    storage::FarmerDirectory,
};
use uuid::Uuid;

fn june_period() -> MonthPeriod {
    MonthPeriod::new(2024, 6).expect("period")
}

#[test]
fn empty_month_has_no_statement() {
    let farmer = Farmer::new(Uuid::new_v4(), FarmerInput::new("Idle"), Utc::now());
    assert!(StatementService::build_statement(&farmer, june_period(), &[]).is_none());
}

#[test]
fn statement_totals_and_weighted_fat() {
    let farmer = Farmer::new(
        Uuid::new_v4(),
        FarmerInput::new("Savitri").with_phone("9876543210"),
        Utc::now(),
    );
    let entries = vec![
        entry(farmer.id, june(3), Session::Morning, 3.5, 5.0, 150.0),
        entry(farmer.id, june(9), Session::Evening, 4.5, 5.0, 200.0),
        entry(Uuid::new_v4(), june(9), Session::Evening, 6.0, 5.0, 350.0),
    ];
    let statement = StatementService::build_statement(&farmer, june_period(), &entries)
        .expect("statement");

    assert_eq!(statement.total_quantity, 10.0);
    assert_eq!(statement.total_amount, 350.0);
    assert_eq!(statement.average_fat, 4.0);
    assert_eq!(statement.entries.len(), 2);
    assert_eq!(statement.entries[0].date, june(9));
    assert_eq!(statement.phone.as_deref(), Some("9876543210"));
    assert_eq!(statement.period_label(), "June 2024");
}

#[test]
fn statement_order_does_not_change_totals() {
    let farmer = Farmer::new(Uuid::new_v4(), FarmerInput::new("Mohan"), Utc::now());
    let mut entries = vec![
        entry(farmer.id, june(1), Session::Morning, 3.5, 4.0, 120.0),
        entry(farmer.id, june(5), Session::Morning, 4.0, 6.0, 210.0),
        entry(farmer.id, june(2), Session::Evening, 5.0, 2.0, 90.0),
    ];
    let first = StatementService::build_statement(&farmer, june_period(), &entries)
        .expect("statement");
    entries.reverse();
    let second = StatementService::build_statement(&farmer, june_period(), &entries)
        .expect("statement");

    assert_eq!(first.total_amount, second.total_amount);
    assert_eq!(first.total_quantity, second.total_quantity);
    assert_eq!(first.average_fat, second.average_fat);
    let dates: Vec<_> = first.entries.iter().map(|e| e.date).collect();
    assert_eq!(dates, vec![june(5), june(2), june(1)]);
}

#[test]
fn center_statements_skip_idle_farmers() {
    let env = setup_center(june(30));
    let busy = env
        .storage
        .create_farmer(env.center.id, FarmerInput::new("Busy"))
        .expect("create farmer");
    let idle = env
        .storage
        .create_farmer(env.center.id, FarmerInput::new("Idle"))
        .expect("create farmer");
    CollectionService::record(
        &env.ctx,
        &env.storage,
        &RatePolicy::default(),
        EntryDraft {
            farmer_id: busy.id,
            session: Session::Evening,
            fat_percentage: 4.0,
            quantity_liters: 3.0,
            date: Some(june(12)),
        },
    )
    .expect("record entry");

    let statements =
        CollectionService::statements(&env.ctx, &env.storage, &env.storage, june_period())
            .expect("statements");
    assert_eq!(statements.len(), 1);
    assert_eq!(statements[0].farmer_id, busy.id);
    assert_eq!(statements[0].total_amount, 105.0);

    let none = CollectionService::statement(&env.ctx, &env.storage, &env.storage, idle.id, june_period())
        .expect("statement lookup");
    assert!(none.is_none());
}
