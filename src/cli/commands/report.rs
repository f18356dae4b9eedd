use spendlog_core::{SummaryService, TrendService, TREND_MONTHS};

use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::formatters::bar;
use crate::cli::io;
use crate::cli::output::{self, Align};
use crate::cli::registry::CommandEntry;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "summary",
            "Show totals, this month and the category breakdown",
            "summary",
            cmd_summary,
        ),
        CommandEntry::new(
            "trend",
            "Show monthly spending for the last six months",
            "trend",
            cmd_trend,
        ),
    ]
}

fn cmd_summary(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let expenses = context.book.read();
    let summary = SummaryService::summarize(&expenses, context.clock.today());
    let formatters = context.formatters();

    output::section("Dashboard");
    output::line(format!(
        "  Total spending : {}",
        formatters.format_amount(summary.total_spending)
    ));
    output::line(format!(
        "  This month     : {}",
        formatters.format_amount(summary.monthly_spending)
    ));
    output::line(format!(
        "  Top category   : {}",
        summary
            .top_category
            .map(|category| category.to_string())
            .unwrap_or_else(|| "None".into())
    ));
    output::line(format!("  Expenses       : {}", summary.expense_count));

    let shares = SummaryService::category_shares(&summary.category_breakdown);
    if shares.is_empty() {
        io::print_info("No expenses recorded yet. Use `add` to record one.");
        return Ok(());
    }

    output::section("Spending by category");
    let rows: Vec<Vec<String>> = shares
        .iter()
        .map(|share| {
            vec![
                share.category.to_string(),
                formatters.format_amount(share.amount),
                format!("{:.1}%", share.percent),
                bar(share.percent, 100.0),
            ]
        })
        .collect();
    output::render_table(
        &["Category", "Amount", "Share", ""],
        &[Align::Left, Align::Right, Align::Right, Align::Left],
        &rows,
    );

    let top = SummaryService::top_categories(
        &summary.category_breakdown,
        context.config.dashboard_top_categories,
    );
    output::section("Top categories");
    for (rank, (category, amount)) in top.iter().enumerate() {
        output::line(format!(
            "  {}. {:<14} {}",
            rank + 1,
            category.to_string(),
            formatters.format_amount(*amount)
        ));
    }
    Ok(())
}

fn cmd_trend(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let expenses = context.book.read();
    let buckets = TrendService::monthly_totals(&expenses, context.clock.today());
    let formatters = context.formatters();
    let peak = buckets
        .iter()
        .map(|bucket| bucket.total)
        .fold(0.0_f64, f64::max);

    output::section(format!("Monthly trend (last {} months)", TREND_MONTHS));
    let rows: Vec<Vec<String>> = buckets
        .iter()
        .map(|bucket| {
            vec![
                bucket.label.clone(),
                formatters.format_amount(bucket.total),
                bar(bucket.total, peak),
            ]
        })
        .collect();
    output::render_table(
        &["Month", "Total", ""],
        &[Align::Left, Align::Right, Align::Left],
        &rows,
    );
    Ok(())
}
