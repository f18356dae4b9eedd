//! Dashboard aggregation over a snapshot of expenses.

use chrono::NaiveDate;

use spendlog_domain::{same_month, sum_amounts, Category, Expense};

/// Per-category sums. Every category always has an entry.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CategoryTotals {
    amounts: [f64; Category::COUNT],
}

impl CategoryTotals {
    pub fn from_expenses(expenses: &[Expense]) -> Self {
        let mut totals = Self::default();
        for expense in expenses {
            totals.amounts[expense.category.index()] += expense.amount;
        }
        totals
    }

    pub fn get(&self, category: Category) -> f64 {
        self.amounts[category.index()]
    }

    /// Entries in category declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, f64)> + '_ {
        Category::ALL
            .into_iter()
            .map(move |category| (category, self.get(category)))
    }

    pub fn total(&self) -> f64 {
        self.amounts.iter().sum()
    }

    /// Category with the strictly largest sum; earlier categories win ties.
    pub fn top(&self) -> Option<Category> {
        let mut best = None;
        let mut max_amount = 0.0;
        for (category, amount) in self.iter() {
            if amount > max_amount {
                max_amount = amount;
                best = Some(category);
            }
        }
        best
    }
}

/// Dashboard totals for a snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub total_spending: f64,
    pub monthly_spending: f64,
    pub category_breakdown: CategoryTotals,
    pub top_category: Option<Category>,
    pub expense_count: usize,
}

/// A non-zero slice of the category pie.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryShare {
    pub category: Category,
    pub amount: f64,
    pub percent: f64,
}

pub struct SummaryService;

impl SummaryService {
    /// Computes dashboard totals; `today` selects the current month.
    pub fn summarize(expenses: &[Expense], today: NaiveDate) -> Summary {
        let category_breakdown = CategoryTotals::from_expenses(expenses);
        let monthly_spending = expenses
            .iter()
            .filter(|expense| {
                expense
                    .parsed_date()
                    .is_some_and(|date| same_month(date, today))
            })
            .map(|expense| expense.amount)
            .sum();

        Summary {
            total_spending: Self::total_amount(expenses),
            monthly_spending,
            top_category: category_breakdown.top(),
            category_breakdown,
            expense_count: expenses.len(),
        }
    }

    pub fn total_amount(expenses: &[Expense]) -> f64 {
        sum_amounts(expenses)
    }

    /// Highest-spending categories, largest first, zero entries dropped.
    pub fn top_categories(totals: &CategoryTotals, limit: usize) -> Vec<(Category, f64)> {
        let mut ranked: Vec<_> = totals.iter().filter(|(_, amount)| *amount > 0.0).collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked.truncate(limit);
        ranked
    }

    /// Percentage share of each category with spending, in declaration order.
    pub fn category_shares(totals: &CategoryTotals) -> Vec<CategoryShare> {
        let total = totals.total();
        if total <= 0.0 {
            return Vec::new();
        }
        totals
            .iter()
            .filter(|(_, amount)| *amount > 0.0)
            .map(|(category, amount)| CategoryShare {
                category,
                amount,
                percent: amount / total * 100.0,
            })
            .collect()
    }
}
