//! Comma separated export.

use std::borrow::Cow;

use spendlog_domain::Expense;

pub const CSV_HEADER: &str = "Date,Category,Amount,Description";

/// Renders `expenses` as CSV text in the given order.
///
/// Lines are joined with `\n` and there is no trailing newline. Only the
/// description is quoted; embedded quotes are doubled.
pub fn to_csv(expenses: &[Expense]) -> String {
    let mut lines = Vec::with_capacity(expenses.len() + 1);
    lines.push(CSV_HEADER.to_string());
    lines.extend(expenses.iter().map(|expense| {
        format!(
            "{},{},{:.2},{}",
            export_date(&expense.date),
            expense.category,
            expense.amount,
            quote(&expense.description)
        )
    }));
    lines.join("\n")
}

/// `yyyy-MM-dd` for parseable dates; anything else is passed through untouched.
pub(crate) fn export_date(raw: &str) -> Cow<'_, str> {
    match spendlog_domain::parse_calendar_date(raw) {
        Some(date) => Cow::Owned(date.format("%Y-%m-%d").to_string()),
        None => Cow::Borrowed(raw),
    }
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use spendlog_domain::{Category, ExpenseInput};

    fn expense(date: &str, amount: f64, category: Category, description: &str) -> Expense {
        let now = Utc.with_ymd_and_hms(2024, 2, 20, 9, 0, 0).unwrap();
        Expense::new(ExpenseInput::new(date, amount, category, description), now)
    }

    #[test]
    fn empty_input_is_header_only() {
        assert_eq!(to_csv(&[]), CSV_HEADER);
    }

    #[test]
    fn rows_follow_input_order_with_two_decimals() {
        let csv = to_csv(&[
            expense("2024-02-15", 20.0, Category::Bills, "Power"),
            expense("2024-01-10", 4.5, Category::Food, "Bagel"),
        ]);
        assert_eq!(
            csv,
            "Date,Category,Amount,Description\n\
             2024-02-15,Bills,20.00,\"Power\"\n\
             2024-01-10,Food,4.50,\"Bagel\""
        );
    }

    #[test]
    fn quotes_are_doubled_inside_descriptions() {
        let csv = to_csv(&[expense(
            "2024-01-10",
            12.0,
            Category::Entertainment,
            "The \"big\" show, live",
        )]);
        assert!(csv.ends_with("12.00,\"The \"\"big\"\" show, live\""));
    }

    #[test]
    fn timestamps_are_reduced_to_dates_and_garbage_kept() {
        assert_eq!(export_date("2024-03-05T10:00:00Z"), "2024-03-05");
        assert_eq!(export_date("someday"), "someday");
    }
}
