//! Form validation for candidate expense records.

use std::{collections::BTreeMap, fmt};

use spendlog_domain::{Category, ExpenseInput};

/// Form fields that can carry a validation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
    Date,
    Amount,
    Category,
    Description,
}

impl FormField {
    pub fn as_str(self) -> &'static str {
        match self {
            FormField::Date => "date",
            FormField::Amount => "amount",
            FormField::Category => "category",
            FormField::Description => "description",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every failing field of a submitted form, keyed by field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: BTreeMap<FormField, String>,
}

impl ValidationErrors {
    pub fn insert(&mut self, field: FormField, message: impl Into<String>) {
        self.errors.insert(field, message.into());
    }

    pub fn get(&self, field: FormField) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: FormField) -> bool {
        self.errors.contains_key(&field)
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FormField, &str)> {
        self.errors
            .iter()
            .map(|(field, message)| (*field, message.as_str()))
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .iter()
            .map(|(field, message)| format!("{field}: {message}"))
            .collect::<Vec<_>>()
            .join("; ");
        write!(f, "Validation failed: {joined}")
    }
}

impl std::error::Error for ValidationErrors {}

/// Checks raw form values and reports every failing field at once.
pub fn validate_expense_form(
    date: &str,
    amount: &str,
    category: &str,
    description: &str,
) -> Result<ExpenseInput, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    if date.is_empty() {
        errors.insert(FormField::Date, "Date is required");
    }

    let parsed_amount = amount
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value > 0.0);
    if parsed_amount.is_none() {
        errors.insert(FormField::Amount, "Amount must be greater than 0");
    }

    let parsed_category = if category.trim().is_empty() {
        errors.insert(FormField::Category, "Category is required");
        None
    } else {
        match category.parse::<Category>() {
            Ok(value) => Some(value),
            Err(err) => {
                errors.insert(FormField::Category, err.to_string());
                None
            }
        }
    };

    let trimmed_description = description.trim();
    if trimmed_description.is_empty() {
        errors.insert(FormField::Description, "Description is required");
    }

    match (parsed_amount, parsed_category) {
        (Some(amount), Some(category)) if errors.is_empty() => Ok(ExpenseInput {
            date: date.to_string(),
            amount,
            category,
            description: trimmed_description.to_string(),
        }),
        _ => Err(errors),
    }
}
