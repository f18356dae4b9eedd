//! JSON export envelope.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use spendlog_core::SummaryService;
use spendlog_domain::Expense;

use crate::ExportError;

/// Top-level object written by the JSON export.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExportEnvelope {
    pub export_date: DateTime<Utc>,
    pub total_records: usize,
    pub total_amount: f64,
    pub expenses: Vec<Expense>,
}

impl ExportEnvelope {
    pub fn new(expenses: &[Expense], exported_at: DateTime<Utc>) -> Self {
        Self {
            export_date: exported_at,
            total_records: expenses.len(),
            total_amount: SummaryService::total_amount(expenses),
            expenses: expenses.to_vec(),
        }
    }
}

/// Pretty-printed JSON document for `expenses`, order preserved.
pub fn to_json(expenses: &[Expense], exported_at: DateTime<Utc>) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(&ExportEnvelope::new(
        expenses,
        exported_at,
    ))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use spendlog_domain::{Category, ExpenseInput};

    #[test]
    fn empty_export_is_a_zero_record_envelope() {
        let at = Utc.with_ymd_and_hms(2024, 2, 20, 9, 0, 0).unwrap();
        let json = to_json(&[], at).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["totalRecords"], 0);
        assert_eq!(value["totalAmount"], 0.0);
        assert_eq!(value["expenses"], serde_json::json!([]));
        assert_eq!(value["exportDate"], "2024-02-20T09:00:00Z");
    }

    #[test]
    fn output_is_pretty_printed() {
        let at = Utc.with_ymd_and_hms(2024, 2, 20, 9, 0, 0).unwrap();
        let expense = Expense::new(
            ExpenseInput::new("2024-02-01", 3.25, Category::Food, "Tea"),
            at,
        );
        let json = to_json(&[expense], at).unwrap();
        assert!(json.starts_with("{\n  \"exportDate\""));
        assert!(json.contains("\n  \"totalAmount\": 3.25"));
    }
}
