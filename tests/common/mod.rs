#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use chrono::{NaiveDate, Utc};
use dairy_core::{
    core::{context::RequestContext, services::AdminService, time::FixedClock},
    domain::{CenterInput, CollectionEntry, DairyCenter, Session},
    storage::JsonStorage,
};
use once_cell::sync::Lazy;
use tempfile::TempDir;
use uuid::Uuid;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

pub struct TestCenter {
    pub storage: JsonStorage,
    pub ctx: RequestContext,
    pub center: DairyCenter,
    pub base: std::path::PathBuf,
}

pub fn june(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, day).expect("valid June date")
}

/// A store in a fresh directory, frozen at `today`, with one center and a
/// super admin assigned to it.
pub fn setup_center(today: NaiveDate) -> TestCenter {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);

    let storage = JsonStorage::with_clock(&base, Some(3), Arc::new(FixedClock::at_date(today)))
        .expect("create json storage backend");
    let admin = AdminService::sign_in(&storage, "admin@example.com", None).expect("sign in");
    let admin_ctx = RequestContext::for_user(&admin);
    let center = AdminService::add_center(
        &admin_ctx,
        &storage,
        CenterInput {
            name: "Shree Dairy".into(),
            ..CenterInput::default()
        },
    )
    .expect("add center");
    let admin = AdminService::assign_center(&admin_ctx, &storage, admin.id, Some(center.id))
        .expect("assign center");

    TestCenter {
        ctx: RequestContext::for_user(&admin),
        storage,
        center,
        base,
    }
}

/// Entry built in memory with a fixed amount, for the pure aggregation paths.
pub fn entry(
    farmer_id: Uuid,
    date: NaiveDate,
    session: Session,
    fat: f64,
    quantity: f64,
    amount: f64,
) -> CollectionEntry {
    CollectionEntry {
        id: Uuid::new_v4(),
        dairy_center_id: Uuid::nil(),
        farmer_id,
        farmer_name: "Farmer".into(),
        date,
        session,
        fat_percentage: fat,
        quantity_liters: quantity,
        rate_per_liter: if quantity == 0.0 { 0.0 } else { amount / quantity },
        total_amount: amount,
        created_at: Utc::now(),
    }
}
