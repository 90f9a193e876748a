mod common;

use std::fs;

use common::{june, setup_center};
use dairy_core::{
    core::services::{AdminService, CollectionService, FarmerService, RatePolicy},
    domain::{CenterInput, EntryDraft, EntryFilter, FarmerInput, Session},
    storage::{CenterDirectory, EntrySink, EntrySource, FarmerDirectory, JsonStorage},
};

fn draft(farmer_id: uuid::Uuid) -> EntryDraft {
    EntryDraft {
        farmer_id,
        session: Session::Morning,
        fat_percentage: 4.0,
        quantity_liters: 5.0,
        date: Some(june(10)),
    }
}

#[test]
fn data_survives_reopening_the_store() {
    let env = setup_center(june(10));
    let farmer = FarmerService::add(&env.ctx, &env.storage, FarmerInput::new("Lakshmi"))
        .expect("add farmer");
    CollectionService::record(&env.ctx, &env.storage, &RatePolicy::default(), draft(farmer.id))
        .expect("record entry");

    let reopened = JsonStorage::new(&env.base, None).expect("reopen store");
    let farmers = reopened.list_farmers(env.center.id).expect("list farmers");
    assert_eq!(farmers.len(), 1);
    assert_eq!(farmers[0].name, "Lakshmi");
    let entries = reopened
        .list_entries(&EntryFilter::for_center(env.center.id))
        .expect("list entries");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].total_amount, 175.0);
    assert!(reopened.store_path().ends_with("data/store.json"));
}

#[test]
fn entries_are_scoped_to_their_center() {
    let env = setup_center(june(10));
    let other = AdminService::add_center(
        &env.ctx,
        &env.storage,
        CenterInput {
            name: "Other Dairy".into(),
            ..CenterInput::default()
        },
    )
    .expect("add second center");
    let stranger = env
        .storage
        .create_farmer(other.id, FarmerInput::new("Stranger"))
        .expect("create farmer");

    assert!(FarmerService::list(&env.ctx, &env.storage)
        .expect("list farmers")
        .is_empty());
    let result =
        CollectionService::record(&env.ctx, &env.storage, &RatePolicy::default(), draft(stranger.id));
    assert!(result.is_err());
    assert!(env
        .storage
        .list_entries(&EntryFilter::for_center(other.id))
        .expect("list entries")
        .is_empty());
}

#[test]
fn removing_a_farmer_keeps_history() {
    let env = setup_center(june(10));
    let farmer = FarmerService::add(&env.ctx, &env.storage, FarmerInput::new("Gone"))
        .expect("add farmer");
    CollectionService::record(&env.ctx, &env.storage, &RatePolicy::default(), draft(farmer.id))
        .expect("record entry");
    FarmerService::remove(&env.ctx, &env.storage, farmer.id).expect("remove farmer");

    let entries = CollectionService::list(&env.ctx, &env.storage, None, None, None)
        .expect("list entries");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].farmer_name, "Gone");
}

#[test]
fn centers_with_farmers_cannot_be_removed() {
    let env = setup_center(june(10));
    env.storage
        .create_farmer(env.center.id, FarmerInput::new("Anchor"))
        .expect("create farmer");
    assert!(AdminService::remove_center(&env.ctx, &env.storage, env.center.id).is_err());
    assert!(env.storage.center(env.center.id).expect("lookup").is_some());
}

#[test]
fn backups_can_be_restored() {
    let env = setup_center(june(10));
    FarmerService::add(&env.ctx, &env.storage, FarmerInput::new("Before"))
        .expect("add farmer");
    let backup = env.storage.backup(Some("Before import")).expect("backup");
    assert!(backup.id.ends_with("_before-import.json"));
    assert!(backup.created_at.is_some());

    FarmerService::add(&env.ctx, &env.storage, FarmerInput::new("After"))
        .expect("add farmer");
    assert_eq!(env.storage.list_farmers(env.center.id).expect("list").len(), 2);

    let listed = env.storage.list_backups().expect("list backups");
    assert!(listed.iter().any(|info| info.id == backup.id));

    env.storage.restore(&backup.id).expect("restore");
    let farmers = env.storage.list_farmers(env.center.id).expect("list");
    assert_eq!(farmers.len(), 1);
    assert_eq!(farmers[0].name, "Before");

    let reopened = JsonStorage::new(&env.base, None).expect("reopen");
    assert_eq!(reopened.list_farmers(env.center.id).expect("list").len(), 1);
    assert!(env.storage.restore("store_missing.json").is_err());
}

#[test]
fn newer_store_schema_is_rejected() {
    let temp = tempfile::TempDir::new().expect("temp dir");
    let data = temp.path().join("data");
    fs::create_dir_all(&data).expect("create data dir");
    fs::write(data.join("store.json"), r#"{ "schema_version": 99 }"#).expect("write store");

    assert!(JsonStorage::new(temp.path(), None).is_err());
}

#[test]
fn entries_for_missing_farmers_are_refused() {
    let env = setup_center(june(10));
    let result = env.storage.create_entry(dairy_core::domain::NewEntry {
        dairy_center_id: env.center.id,
        farmer_id: uuid::Uuid::new_v4(),
        session: Session::Evening,
        fat_percentage: 4.0,
        quantity_liters: 1.0,
        rate: 35.0,
        amount: 35.0,
        date: None,
    });
    assert!(result.is_err());
}

#[test]
fn named_backups_outlive_automatic_retention() {
    let env = setup_center(june(10));
    let named = env.storage.backup(Some("month-end")).expect("named backup");
    let backups_dir = env.base.join("backups");
    for day in 1..=5 {
        fs::write(backups_dir.join(format!("auto_2024050{day}_000000.json")), "{}")
            .expect("seed automatic backup");
    }
    for index in 0..6 {
        env.storage
            .create_farmer(env.center.id, FarmerInput::new(format!("Farmer {index}")))
            .expect("create farmer");
    }

    let listed = env.storage.list_backups().expect("list backups");
    assert!(listed.iter().any(|info| info.id == named.id));
    let automatic: Vec<_> = listed
        .iter()
        .filter(|info| info.id.starts_with("auto_"))
        .collect();
    assert_eq!(automatic.len(), 3);
    assert!(automatic.iter().any(|info| info.id == "auto_20240610_060000.json"));
    assert!(!automatic.iter().any(|info| info.id == "auto_20240501_000000.json"));

    env.storage.restore(&named.id).expect("restore named backup");
    assert!(env
        .storage
        .list_farmers(env.center.id)
        .expect("list farmers")
        .is_empty());
}

#[test]
fn non_finite_entry_figures_are_refused() {
    let env = setup_center(june(10));
    let farmer = env
        .storage
        .create_farmer(env.center.id, FarmerInput::new("Overflow"))
        .expect("create farmer");
    let result = env.storage.create_entry(dairy_core::domain::NewEntry {
        dairy_center_id: env.center.id,
        farmer_id: farmer.id,
        session: Session::Morning,
        fat_percentage: 4.5,
        quantity_liters: 1e308,
        rate: 40.0,
        amount: f64::INFINITY,
        date: None,
    });
    assert!(result.is_err());
    assert!(env.storage.snapshot().expect("snapshot").entries.is_empty());
}

#[test]
fn rejected_oversized_delivery_leaves_store_readable() {
    let env = setup_center(june(10));
    let farmer = FarmerService::add(&env.ctx, &env.storage, FarmerInput::new("Bulk"))
        .expect("add farmer");
    let mut oversized = draft(farmer.id);
    oversized.fat_percentage = 4.5;
    oversized.quantity_liters = 1e308;
    assert!(
        CollectionService::record(&env.ctx, &env.storage, &RatePolicy::default(), oversized)
            .is_err()
    );
    CollectionService::record(&env.ctx, &env.storage, &RatePolicy::default(), draft(farmer.id))
        .expect("record regular entry");

    let reopened = JsonStorage::new(&env.base, None).expect("reopen store");
    let entries = reopened
        .list_entries(&EntryFilter::for_center(env.center.id))
        .expect("list entries");
    assert_eq!(entries.len(), 1);
    assert!(entries[0].total_amount.is_finite());
}
