//! Search, category and date-range filtering of expense snapshots.

use std::{
    cmp::{Ordering, Reverse},
    collections::BTreeSet,
    fmt,
    str::FromStr,
};

use chrono::NaiveDate;

use spendlog_domain::{epoch_date, Category, Expense, UnknownCategory};

/// Category restriction used by the expense list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn matches(self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(expected) => expected == category,
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = UnknownCategory;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.trim().eq_ignore_ascii_case("all") {
            Ok(CategoryFilter::All)
        } else {
            value.parse().map(CategoryFilter::Only)
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str("All"),
            CategoryFilter::Only(category) => write!(f, "{category}"),
        }
    }
}

/// Criteria for the expense list view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub query: String,
    pub category: CategoryFilter,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl FilterCriteria {
    pub fn has_date_bounds(&self) -> bool {
        self.start.is_some() || self.end.is_some()
    }

    /// Returns `true` when any criterion narrows the view.
    pub fn is_active(&self) -> bool {
        !self.query.is_empty() || self.category != CategoryFilter::All || self.has_date_bounds()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

pub struct FilterService;

impl FilterService {
    /// Matching records, most recent date first.
    ///
    /// A missing start bound means the epoch and a missing end bound means
    /// `today`. Records with unparseable dates are dropped whenever a bound is
    /// set and otherwise sort after every dated record.
    pub fn apply(expenses: &[Expense], criteria: &FilterCriteria, today: NaiveDate) -> Vec<Expense> {
        let needle = criteria.query.to_lowercase();
        let range = criteria.has_date_bounds().then(|| {
            (
                criteria.start.unwrap_or_else(epoch_date),
                criteria.end.unwrap_or(today),
            )
        });

        let mut matched: Vec<(Option<NaiveDate>, &Expense)> = expenses
            .iter()
            .filter(|expense| expense.matches_text(&needle))
            .filter(|expense| criteria.category.matches(expense.category))
            .map(|expense| (expense.parsed_date(), expense))
            .filter(|(date, _)| match (range, date) {
                (None, _) => true,
                (Some((start, end)), Some(date)) => start <= *date && *date <= end,
                (Some(_), None) => false,
            })
            .collect();

        matched.sort_by(|(a, _), (b, _)| newest_first(*a, *b));
        matched
            .into_iter()
            .map(|(_, expense)| expense.clone())
            .collect()
    }
}

fn newest_first(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => Reverse(a).cmp(&Reverse(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Category picker of the export dialog: either everything or a non-empty set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategorySelection {
    #[default]
    All,
    Only(BTreeSet<Category>),
}

impl CategorySelection {
    pub fn matches(&self, category: Category) -> bool {
        match self {
            CategorySelection::All => true,
            CategorySelection::Only(selected) => selected.contains(&category),
        }
    }

    /// Flips `category`; emptying the set falls back to `All`.
    pub fn toggle(&mut self, category: Category) {
        let mut selected = match std::mem::take(self) {
            CategorySelection::All => BTreeSet::new(),
            CategorySelection::Only(selected) => selected,
        };
        if !selected.remove(&category) {
            selected.insert(category);
        }
        *self = if selected.is_empty() {
            CategorySelection::All
        } else {
            CategorySelection::Only(selected)
        };
    }

    pub fn select_all(&mut self) {
        *self = CategorySelection::All;
    }
}

/// Record subset chosen in the export dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSelection {
    pub categories: CategorySelection,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl ExportSelection {
    /// Matching records in their original order. Each bound applies on its own.
    pub fn apply(&self, expenses: &[Expense]) -> Vec<Expense> {
        let bounded = self.start.is_some() || self.end.is_some();
        expenses
            .iter()
            .filter(|expense| self.categories.matches(expense.category))
            .filter(|expense| {
                if !bounded {
                    return true;
                }
                let Some(date) = expense.parsed_date() else {
                    return false;
                };
                self.start.map_or(true, |start| date >= start)
                    && self.end.map_or(true, |end| date <= end)
            })
            .cloned()
            .collect()
    }
}

/// First rows of an export with the number left out.
#[derive(Debug, Clone, PartialEq)]
pub struct Preview<'a> {
    pub rows: &'a [Expense],
    pub hidden: usize,
}

pub fn preview(expenses: &[Expense], limit: usize) -> Preview<'_> {
    let shown = limit.min(expenses.len());
    Preview {
        rows: &expenses[..shown],
        hidden: expenses.len() - shown,
    }
}
