use std::{fs, path::PathBuf};

use spendlog_core::{preview, CategorySelection, ExportSelection};
use spendlog_domain::Category;
use spendlog_export::{file_stem, ExportFormat};
use tracing::info;

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io::{self, ParsedArgs};
use crate::cli::output::{self, Align};
use crate::cli::registry::CommandEntry;

const EXPORT_USAGE: &str =
    "export <csv|json|pdf> [--category <name>]... [--from YYYY-MM-DD] [--to YYYY-MM-DD] [--out <path>]";
pub(crate) const EXPORT_FLAGS: [&str; 4] = ["--category", "--from", "--to", "--out"];

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "export",
        "Export selected expenses as CSV, JSON or PDF",
        EXPORT_USAGE,
        cmd_export,
    )]
}

fn cmd_export(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &EXPORT_FLAGS)?;
    let format = match parsed.positional.as_slice() {
        [format] => format.parse::<ExportFormat>()?,
        _ => {
            return Err(CommandError::InvalidArguments(format!(
                "usage: {}",
                EXPORT_USAGE
            )))
        }
    };
    let selection = selection_from_args(&parsed)?;

    let expenses = context.book.read();
    let selected = selection.apply(&expenses);
    if selected.is_empty() {
        io::print_warning("No expenses match the export selection; writing an empty document.");
    } else {
        print_preview(context, &selected);
    }

    let now = context.clock.now();
    let payload = context.exporter.render(format, &selected, now)?;
    let path = match parsed.value("--out") {
        Some(out) => PathBuf::from(out),
        None => context.export_dir().join(format.file_name(&file_stem(
            &context.config.export_file_prefix,
            context.clock.today(),
        ))),
    };
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, &payload.bytes)?;

    info!(path = %path.display(), format = %format, records = selected.len(), "export written");
    io::print_success(format!(
        "Exported {} expenses as {} to {}.",
        selected.len(),
        format,
        path.display()
    ));
    Ok(())
}

fn selection_from_args(parsed: &ParsedArgs<'_>) -> Result<ExportSelection, CommandError> {
    let mut categories = CategorySelection::All;
    for raw in parsed.values("--category") {
        if raw.trim().eq_ignore_ascii_case("all") {
            categories.select_all();
            continue;
        }
        let category = raw
            .parse::<Category>()
            .map_err(|err| CommandError::InvalidArguments(err.to_string()))?;
        if !categories.matches(category) || categories == CategorySelection::All {
            categories.toggle(category);
        }
    }
    Ok(ExportSelection {
        categories,
        start: parsed.value("--from").map(io::parse_date).transpose()?,
        end: parsed.value("--to").map(io::parse_date).transpose()?,
    })
}

fn print_preview(context: &ShellContext, selected: &[spendlog_domain::Expense]) {
    let formatters = context.formatters();
    let shown = preview(selected, context.config.preview_rows);
    output::section("Export preview");
    let rows: Vec<Vec<String>> = shown
        .rows
        .iter()
        .map(|expense| {
            vec![
                expense.date.clone(),
                expense.category.to_string(),
                formatters.format_amount(expense.amount),
                expense.description.clone(),
            ]
        })
        .collect();
    output::render_table(
        &["Date", "Category", "Amount", "Description"],
        &[Align::Left, Align::Left, Align::Right, Align::Left],
        &rows,
    );
    if shown.hidden > 0 {
        output::line(format!("... and {} more", shown.hidden));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::core::{process_line, test_context};
    use tempfile::tempdir;

    #[test]
    fn repeated_categories_build_a_set() {
        let args = ["csv", "--category", "Food", "--category", "bills", "--category", "food"];
        let parsed = ParsedArgs::parse(&args, &EXPORT_FLAGS).unwrap();
        let selection = selection_from_args(&parsed).unwrap();
        assert!(selection.categories.matches(Category::Food));
        assert!(selection.categories.matches(Category::Bills));
        assert!(!selection.categories.matches(Category::Other));
    }

    #[test]
    fn writes_default_named_file_into_export_dir() {
        let dir = tempdir().unwrap();
        let mut context = test_context(dir.path(), "2024-02-20");
        process_line(&mut context, "add 2024-02-10 50 Food Groceries").unwrap();
        process_line(&mut context, "add 2024-02-11 20 Bills Water").unwrap();
        process_line(&mut context, "export csv --category Bills").unwrap();

        let path = dir.path().join("exports").join("expenses-2024-02-20.csv");
        let text = fs::read_to_string(path).unwrap();
        assert_eq!(
            text,
            "Date,Category,Amount,Description\n2024-02-11,Bills,20.00,\"Water\""
        );
    }

    #[test]
    fn explicit_out_path_and_pdf_format() {
        let dir = tempdir().unwrap();
        let mut context = test_context(dir.path(), "2024-02-20");
        let out = dir.path().join("report.pdf");
        process_line(&mut context, &format!("export pdf --out {}", out.display())).unwrap();
        assert!(fs::read(out).unwrap().starts_with(b"%PDF-"));
    }

    #[test]
    fn unknown_format_is_rejected() {
        let dir = tempdir().unwrap();
        let mut context = test_context(dir.path(), "2024-02-20");
        let err = process_line(&mut context, "export xlsx").unwrap_err();
        assert!(matches!(err, CommandError::Export(_)));
    }
}
