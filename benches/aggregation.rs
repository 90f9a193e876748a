use chrono::{Duration, NaiveDate, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dairy_core::core::services::{RateService, StatementService, SummaryService};
use dairy_core::domain::{CollectionEntry, Farmer, FarmerInput, MonthPeriod, Session};
use uuid::Uuid;

fn build_sample_entries(farmer: &Farmer, count: usize) -> Vec<CollectionEntry> {
    let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
    (0..count)
        .map(|idx| {
            let fat = 3.0 + (idx % 30) as f64 / 10.0;
            let quantity = 2.0 + (idx % 8) as f64;
            let rate = RateService::compute_rate(fat);
            CollectionEntry {
                id: Uuid::new_v4(),
                dairy_center_id: farmer.dairy_center_id,
                farmer_id: farmer.id,
                farmer_name: farmer.name.clone(),
                date: start + Duration::days((idx % 31) as i64),
                session: if idx % 2 == 0 {
                    Session::Morning
                } else {
                    Session::Evening
                },
                fat_percentage: fat,
                quantity_liters: quantity,
                rate_per_liter: rate,
                total_amount: RateService::amount_for(rate, quantity),
                created_at: Utc::now(),
            }
        })
        .collect()
}

fn bench_aggregation(c: &mut Criterion) {
    let farmer = Farmer::new(Uuid::new_v4(), FarmerInput::new("Benchmark"), Utc::now());
    let entries = build_sample_entries(&farmer, black_box(10_000));
    let period = MonthPeriod::new(2025, 1).unwrap();

    c.bench_function("compute_rate", |b| {
        b.iter(|| RateService::compute_rate(black_box(4.2)))
    });

    c.bench_function("period_summary_10k", |b| {
        b.iter(|| black_box(SummaryService::period_summary(period, &entries)))
    });

    c.bench_function("average_fat_10k", |b| {
        b.iter(|| black_box(SummaryService::average_fat(&entries)))
    });

    c.bench_function("build_statement_10k", |b| {
        b.iter(|| black_box(StatementService::build_statement(&farmer, period, &entries)))
    });
}

criterion_group!(benches, bench_aggregation);
criterion_main!(benches);
