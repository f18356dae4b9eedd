use chrono::{NaiveDate, TimeZone, Utc};

use crate::{
    filter_service::{CategoryFilter, FilterCriteria, FilterService},
    storage::{ExpenseBook, MemoryStorage},
    summary_service::SummaryService,
    time::{Clock, FixedClock},
    trend_service::{TrendService, TREND_MONTHS},
    validation::{validate_expense_form, FormField},
};
use spendlog_domain::{Category, Expense, ExpenseInput};

fn clock() -> FixedClock {
    FixedClock(Utc.with_ymd_and_hms(2024, 2, 20, 18, 45, 0).unwrap())
}

fn three_record_book() -> ExpenseBook<MemoryStorage> {
    let book = ExpenseBook::new(MemoryStorage::new());
    let now = clock().now();
    for (amount, category, date) in [
        (50.0, Category::Food, "2024-01-10"),
        (30.0, Category::Food, "2024-02-01"),
        (20.0, Category::Bills, "2024-02-15"),
    ] {
        book.create(ExpenseInput::new(date, amount, category, "entry"), now)
            .expect("create");
    }
    book
}

#[test]
fn three_record_summary_matches_dashboard_figures() {
    let book = three_record_book();
    let summary = SummaryService::summarize(&book.read(), clock().today());

    assert_eq!(summary.total_spending, 100.0);
    assert_eq!(summary.category_breakdown.get(Category::Food), 80.0);
    assert_eq!(summary.category_breakdown.get(Category::Bills), 20.0);
    for category in [
        Category::Transportation,
        Category::Entertainment,
        Category::Shopping,
        Category::Other,
    ] {
        assert_eq!(summary.category_breakdown.get(category), 0.0);
    }
    assert_eq!(summary.top_category, Some(Category::Food));
    assert_eq!(summary.expense_count, 3);
    assert_eq!(summary.monthly_spending, 50.0);
}

#[test]
fn breakdown_always_sums_to_total() {
    let book = three_record_book();
    book.create(
        ExpenseInput::new("bad", 0.1, Category::Shopping, "odd"),
        clock().now(),
    )
    .expect("create");
    book.create(
        ExpenseInput::new("2023-12-24", 0.2, Category::Entertainment, "gift"),
        clock().now(),
    )
    .expect("create");
    let expenses = book.read();
    let summary = SummaryService::summarize(&expenses, clock().today());

    let breakdown_total: f64 = summary.category_breakdown.iter().map(|(_, v)| v).sum();
    assert!((breakdown_total - summary.total_spending).abs() < 1e-9);
    assert_eq!(summary.expense_count, expenses.len());
}

#[test]
fn validation_scenario_reports_three_fields() {
    let errors = validate_expense_form("", "-5", "Food", "").unwrap_err();
    let fields: Vec<FormField> = errors.iter().map(|(field, _)| field).collect();
    assert_eq!(
        fields,
        vec![FormField::Date, FormField::Amount, FormField::Description]
    );
}

#[test]
fn bills_filter_yields_the_third_record() {
    let book = three_record_book();
    let expenses = book.read();
    let criteria = FilterCriteria {
        category: CategoryFilter::Only(Category::Bills),
        ..Default::default()
    };
    let result = FilterService::apply(&expenses, &criteria, clock().today());

    assert_eq!(result.len(), 1);
    assert_eq!(result[0].date, "2024-02-15");
    assert_eq!(result[0].amount, 20.0);
}

#[test]
fn unfiltered_view_is_a_date_descending_permutation() {
    let book = three_record_book();
    let expenses = book.read();
    let result = FilterService::apply(&expenses, &FilterCriteria::default(), clock().today());

    assert_eq!(result.len(), expenses.len());
    let dates: Vec<NaiveDate> = result.iter().filter_map(Expense::parsed_date).collect();
    assert!(dates.windows(2).all(|pair| pair[0] >= pair[1]));
    for expense in &expenses {
        assert!(result.contains(expense));
    }
}

#[test]
fn trend_has_six_buckets_for_any_volume() {
    let book = three_record_book();
    let buckets = TrendService::monthly_totals(&book.read(), clock().today());
    assert_eq!(buckets.len(), TREND_MONTHS);
    assert_eq!(buckets[4].total, 50.0);
    assert_eq!(buckets[5].total, 50.0);
    assert_eq!(buckets[5].label, "Feb 2024");
}

#[test]
fn validated_form_flows_into_the_book() {
    let book = ExpenseBook::new(MemoryStorage::new());
    let input = validate_expense_form("2024-02-19", "12.40", "Transportation", " Taxi ")
        .expect("valid form");
    let snapshot = book.create(input, clock().now()).expect("create");

    assert_eq!(snapshot[0].description, "Taxi");
    assert_eq!(snapshot[0].created_at, clock().now());
    assert_eq!(snapshot[0].updated_at, snapshot[0].created_at);
}
