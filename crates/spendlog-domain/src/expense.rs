//! Domain model for a recorded spending event.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{category::Category, common::*};

/// One persisted expense entry.
///
/// `date` is kept as entered so a malformed stored value survives a
/// round-trip; use [`Expense::parsed_date`] for calendar arithmetic.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: Uuid,
    pub date: String,
    pub amount: f64,
    pub category: Category,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Expense {
    pub fn new(input: ExpenseInput, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            date: input.date,
            amount: input.amount,
            category: input.category,
            description: input.description,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replaces every editable field, keeping `id` and `created_at`.
    pub fn apply(&mut self, input: ExpenseInput, now: DateTime<Utc>) {
        self.date = input.date;
        self.amount = input.amount;
        self.category = input.category;
        self.description = input.description;
        self.updated_at = now.max(self.created_at);
    }

    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_calendar_date(&self.date)
    }

    /// Case-insensitive match of `needle` against description or category name.
    /// `needle` must already be lowercase.
    pub fn matches_text(&self, needle: &str) -> bool {
        needle.is_empty()
            || self.description.to_lowercase().contains(needle)
            || self.category.as_str().to_lowercase().contains(needle)
    }
}

impl Amounted for Expense {
    fn amount(&self) -> f64 {
        self.amount
    }
}

/// Field values accepted by validation, ready to become an [`Expense`].
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseInput {
    pub date: String,
    pub amount: f64,
    pub category: Category,
    pub description: String,
}

impl ExpenseInput {
    pub fn new(
        date: impl Into<String>,
        amount: f64,
        category: Category,
        description: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            amount,
            category,
            description: description.into(),
        }
    }
}

impl From<&Expense> for ExpenseInput {
    fn from(expense: &Expense) -> Self {
        Self {
            date: expense.date.clone(),
            amount: expense.amount,
            category: expense.category,
            description: expense.description.clone(),
        }
    }
}
