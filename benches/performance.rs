use chrono::{Duration, NaiveDate, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use spendlog_core::{CategoryFilter, FilterCriteria, FilterService, SummaryService, TrendService};
use spendlog_domain::{Category, Expense, ExpenseInput};
use spendlog_export::{to_csv, to_json};

fn build_sample(count: usize) -> Vec<Expense> {
    let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
    let now = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
    (0..count)
        .map(|idx| {
            let date = start + Duration::days((idx % 540) as i64);
            let category = Category::ALL[idx % Category::COUNT];
            Expense::new(
                ExpenseInput::new(
                    date.format("%Y-%m-%d").to_string(),
                    5.0 + (idx % 100) as f64,
                    category,
                    format!("purchase {idx}"),
                ),
                now,
            )
        })
        .collect()
}

fn bench_aggregation(c: &mut Criterion) {
    let expenses = build_sample(black_box(10_000));
    let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();

    c.bench_function("summarize_10k", |b| {
        b.iter(|| black_box(SummaryService::summarize(&expenses, today)))
    });

    c.bench_function("monthly_trend_10k", |b| {
        b.iter(|| black_box(TrendService::monthly_totals(&expenses, today)))
    });
}

fn bench_filtering(c: &mut Criterion) {
    let expenses = build_sample(black_box(10_000));
    let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
    let criteria = FilterCriteria {
        query: "purchase 1".into(),
        category: CategoryFilter::Only(Category::Food),
        start: NaiveDate::from_ymd_opt(2023, 3, 1),
        end: None,
    };

    c.bench_function("filter_10k", |b| {
        b.iter(|| black_box(FilterService::apply(&expenses, &criteria, today)))
    });
}

fn bench_export(c: &mut Criterion) {
    let expenses = build_sample(black_box(10_000));
    let now = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();

    c.bench_function("csv_export_10k", |b| b.iter(|| black_box(to_csv(&expenses))));
    c.bench_function("json_export_10k", |b| {
        b.iter(|| black_box(to_json(&expenses, now).expect("json")))
    });
}

criterion_group!(benches, bench_aggregation, bench_filtering, bench_export);
criterion_main!(benches);
