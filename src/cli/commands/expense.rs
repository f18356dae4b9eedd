use chrono::NaiveDate;
use spendlog_core::{
    validate_expense_form, CategoryFilter, FilterCriteria, FilterService, FormField,
    SummaryService, ValidationErrors,
};
use spendlog_domain::{Category, Expense, ExpenseInput};
use tracing::info;

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::formatters::short_id;
use crate::cli::io::{self, ParsedArgs};
use crate::cli::output::{self, Align};
use crate::cli::registry::CommandEntry;

const ADD_USAGE: &str = "add <date> <amount> <category> <description...>";
const EDIT_USAGE: &str = "edit <id> <date> <amount> <category> <description...>";
pub(crate) const LIST_FLAGS: [&str; 4] = ["--category", "--from", "--to", "--limit"];
const TABLE_HEADERS: [&str; 5] = ["ID", "Date", "Category", "Amount", "Description"];
const TABLE_ALIGNS: [Align; 5] = [Align::Left, Align::Left, Align::Left, Align::Right, Align::Left];

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("add", "Record a new expense", ADD_USAGE, cmd_add),
        CommandEntry::new("edit", "Change an existing expense", EDIT_USAGE, cmd_edit),
        CommandEntry::new("delete", "Delete an expense", "delete <id>", cmd_delete),
        CommandEntry::new(
            "list",
            "List expenses, newest first",
            "list [search text] [--category <name|all>] [--from YYYY-MM-DD] [--to YYYY-MM-DD] [--limit n]",
            cmd_list,
        ),
        CommandEntry::new("clear", "Delete every expense", "clear", cmd_clear),
    ]
}

/// Raw form values in field order: date, amount, category, description.
struct FormValues {
    date: String,
    amount: String,
    category: String,
    description: String,
}

impl FormValues {
    fn from_args(args: &[&str], usage: &str) -> Result<Self, CommandError> {
        if args.len() < 3 {
            return Err(CommandError::InvalidArguments(format!("usage: {}", usage)));
        }
        Ok(Self {
            date: args[0].to_string(),
            amount: args[1].to_string(),
            category: args[2].to_string(),
            description: args[3..].join(" "),
        })
    }

    fn prompt(context: &ShellContext, initial: &FormValues) -> Result<Self, CommandError> {
        let categories = Category::ALL
            .iter()
            .map(|category| category.as_str())
            .collect::<Vec<_>>()
            .join("/");
        Ok(Self {
            date: io::prompt_text(&context.theme, "Date (YYYY-MM-DD)", &initial.date)?,
            amount: io::prompt_text(&context.theme, "Amount", &initial.amount)?,
            category: io::prompt_text(
                &context.theme,
                &format!("Category ({categories})"),
                &initial.category,
            )?,
            description: io::prompt_text(&context.theme, "Description", &initial.description)?,
        })
    }

    fn from_expense(expense: &Expense) -> Self {
        Self {
            date: expense.date.clone(),
            amount: format!("{:.2}", expense.amount),
            category: expense.category.to_string(),
            description: expense.description.clone(),
        }
    }

    /// Runs form validation, then insists on a real calendar date no later
    /// than `today`.
    fn validate(&self, today: NaiveDate) -> Result<ExpenseInput, CommandError> {
        let input =
            validate_expense_form(&self.date, &self.amount, &self.category, &self.description)?;
        if io::parse_date(&input.date)? > today {
            let mut errors = ValidationErrors::default();
            errors.insert(FormField::Date, "Date cannot be in the future");
            return Err(errors.into());
        }
        Ok(input)
    }
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let values = if args.is_empty() && context.can_prompt() {
        let blank = FormValues {
            date: context.clock.today().format("%Y-%m-%d").to_string(),
            amount: String::new(),
            category: String::new(),
            description: String::new(),
        };
        FormValues::prompt(context, &blank)?
    } else {
        FormValues::from_args(args, ADD_USAGE)?
    };
    let input = values.validate(context.clock.today())?;

    let snapshot = context.book.create(input, context.clock.now())?;
    let Some(created) = snapshot.first() else {
        return Err(CommandError::Message("Expense could not be recorded.".into()));
    };
    info!(id = %created.id, "expense added from shell");
    io::print_success(format!(
        "Expense added: {} {} on {} (id {}).",
        created.category,
        context.formatters().format_amount(created.amount),
        created.date,
        short_id(created.id)
    ));
    Ok(())
}

fn cmd_edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(token) = args.first() else {
        return Err(CommandError::InvalidArguments(format!("usage: {}", EDIT_USAGE)));
    };
    let existing = context.resolve_expense(token)?;
    let values = if args.len() == 1 && context.can_prompt() {
        FormValues::prompt(context, &FormValues::from_expense(&existing))?
    } else {
        FormValues::from_args(&args[1..], EDIT_USAGE)?
    };
    let input = values.validate(context.clock.today())?;

    context
        .book
        .update(existing.id, input, context.clock.now())?;
    io::print_success(format!("Expense {} updated.", short_id(existing.id)));
    Ok(())
}

fn cmd_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(token) = args.first() else {
        return Err(CommandError::InvalidArguments("usage: delete <id>".into()));
    };
    let expense = context.resolve_expense(token)?;
    let prompt = format!(
        "Delete {} expense \"{}\"?",
        expense.category, expense.description
    );
    if !context.confirm(&prompt)? {
        io::print_info("Operation cancelled.");
        return Ok(());
    }
    context.book.delete(expense.id)?;
    io::print_success(format!("Expense {} deleted.", short_id(expense.id)));
    Ok(())
}

fn cmd_clear(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if !context.confirm("Delete all expenses? This cannot be undone.")? {
        io::print_info("Operation cancelled.");
        return Ok(());
    }
    context.book.clear();
    io::print_success("All expenses cleared.");
    Ok(())
}

fn cmd_list(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &LIST_FLAGS)?;
    let criteria = criteria_from_args(&parsed)?;
    let limit = parsed
        .value("--limit")
        .map(|raw| {
            raw.parse::<usize>().map_err(|_| {
                CommandError::InvalidArguments(format!("invalid limit `{}`", raw))
            })
        })
        .transpose()?;

    let expenses = context.book.read();
    if expenses.is_empty() {
        io::print_info("No expenses recorded yet. Use `add` to record one.");
        return Ok(());
    }

    let matched = FilterService::apply(&expenses, &criteria, context.clock.today());
    if matched.is_empty() {
        io::print_info("No expenses match the current filters.");
        return Ok(());
    }

    let formatters = context.formatters();
    let shown = &matched[..limit.unwrap_or(matched.len()).min(matched.len())];
    let rows: Vec<Vec<String>> = shown
        .iter()
        .map(|expense| formatters.expense_row(expense))
        .collect();
    output::render_table(&TABLE_HEADERS, &TABLE_ALIGNS, &rows);

    output::line(format!(
        "Showing {} of {} expenses",
        shown.len(),
        expenses.len()
    ));
    if criteria.is_active() {
        output::line(format!(
            "Filtered total: {}",
            formatters.format_amount(SummaryService::total_amount(&matched))
        ));
    }
    Ok(())
}

fn criteria_from_args(parsed: &ParsedArgs<'_>) -> Result<FilterCriteria, CommandError> {
    let category = match parsed.value("--category") {
        Some(raw) => raw
            .parse::<CategoryFilter>()
            .map_err(|err| CommandError::InvalidArguments(err.to_string()))?,
        None => CategoryFilter::All,
    };
    Ok(FilterCriteria {
        query: parsed.positional.join(" "),
        category,
        start: parsed.value("--from").map(io::parse_date).transpose()?,
        end: parsed.value("--to").map(io::parse_date).transpose()?,
    })
}
