use spendlog_config::Config;
use spendlog_domain::Expense;
use uuid::Uuid;

const SHORT_ID_LEN: usize = 8;
const BAR_WIDTH: usize = 30;

/// Display helpers driven by the active configuration.
#[derive(Debug, Clone)]
pub struct CliFormatters {
    currency_symbol: String,
}

impl CliFormatters {
    pub fn new(config: &Config) -> Self {
        Self {
            currency_symbol: config.currency_symbol.clone(),
        }
    }

    pub fn format_amount(&self, amount: f64) -> String {
        format!("{}{:.2}", self.currency_symbol, amount)
    }

    /// Table row for an expense: id, date, category, amount, description.
    pub fn expense_row(&self, expense: &Expense) -> Vec<String> {
        vec![
            short_id(expense.id),
            expense.date.clone(),
            expense.category.to_string(),
            self.format_amount(expense.amount),
            expense.description.clone(),
        ]
    }
}

pub fn short_id(id: Uuid) -> String {
    let mut short = id.simple().to_string();
    short.truncate(SHORT_ID_LEN);
    short
}

/// Horizontal bar proportional to `value / max`.
pub fn bar(value: f64, max: f64) -> String {
    if max <= 0.0 || value <= 0.0 {
        return String::new();
    }
    let filled = ((value / max) * BAR_WIDTH as f64).round().max(1.0) as usize;
    "#".repeat(filled.min(BAR_WIDTH))
}
