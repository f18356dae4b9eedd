//! Rolling per-month spending totals for the trend chart.

use chrono::NaiveDate;

use spendlog_domain::{month_label, month_start, same_month, shift_month_start, Expense};

/// Number of calendar months in the trend window, current month included.
pub const TREND_MONTHS: usize = 6;

/// Spending total for one calendar month.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyBucket {
    /// First day of the month.
    pub month: NaiveDate,
    pub label: String,
    pub total: f64,
}

pub struct TrendService;

impl TrendService {
    /// Totals for the month containing `today` and the five before it, oldest first.
    pub fn monthly_totals(expenses: &[Expense], today: NaiveDate) -> Vec<MonthlyBucket> {
        let current = month_start(today);
        let dated: Vec<(NaiveDate, f64)> = expenses
            .iter()
            .filter_map(|expense| expense.parsed_date().map(|date| (date, expense.amount)))
            .collect();

        (0..TREND_MONTHS as i32)
            .rev()
            .filter_map(|offset| shift_month_start(current, -offset))
            .map(|month| MonthlyBucket {
                month,
                label: month_label(month),
                total: dated
                    .iter()
                    .filter(|(date, _)| same_month(*date, month))
                    .map(|(_, amount)| amount)
                    .sum(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use spendlog_domain::{Category, ExpenseInput};

    fn expense(date: &str, amount: f64) -> Expense {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
        Expense::new(ExpenseInput::new(date, amount, Category::Food, "meal"), now)
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn always_six_chronological_buckets() {
        let buckets = TrendService::monthly_totals(&[], ymd(2024, 3, 14));
        assert_eq!(buckets.len(), TREND_MONTHS);
        let labels: Vec<_> = buckets.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["Oct 2023", "Nov 2023", "Dec 2023", "Jan 2024", "Feb 2024", "Mar 2024"]
        );
        assert!(buckets.windows(2).all(|pair| pair[0].month < pair[1].month));
        assert!(buckets.iter().all(|b| b.total == 0.0));
    }

    #[test]
    fn totals_land_in_their_month_and_ignore_outliers() {
        let expenses = vec![
            expense("2024-03-01", 10.0),
            expense("2024-03-31", 5.0),
            expense("2023-10-02", 7.5),
            expense("2023-09-30", 100.0),
            expense("2024-04-01", 100.0),
            expense("broken", 100.0),
        ];
        let buckets = TrendService::monthly_totals(&expenses, ymd(2024, 3, 14));
        let totals: Vec<f64> = buckets.iter().map(|b| b.total).collect();
        assert_eq!(totals, vec![7.5, 0.0, 0.0, 0.0, 0.0, 15.0]);
    }
}
