use chrono::NaiveDate;
use snapbooks_core::{format::CurrencyFormatter, MetricsEngine, ReportService};
use snapbooks_domain::{Books, Period};

use crate::cli::args;
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io as cli_io;
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::render::period_lines;
use crate::cli::ui::{Table, TableColumn};

use super::show_table;

const USAGE: &str = "report [week|month] [YYYY-MM-DD]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "report",
        "Break down profit for a week or month",
        USAGE,
        cmd_report,
    )]
}

fn cmd_report(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let today = context.today();
    let mut period = Period::Week;
    let mut reference = today;
    for raw in args {
        if let Some(parsed) = Period::parse(raw) {
            period = parsed;
        } else if let Some(date) = args::parse_date(raw, today) {
            reference = date;
        } else {
            return Err(CommandError::InvalidArguments(format!(
                "`{raw}` is neither week, month nor a date"
            )));
        }
    }

    let books = context.books()?;
    let window = period.window_containing(reference);
    let totals = MetricsEngine::period(books, period, reference);
    output::section(format!("{period} report {} to {}", window.start, window.end));
    for line in period_lines(&totals, &context.formatters) {
        cli_io::println_text(&line)?;
    }
    cli_io::println_text(&format!(
        "{:<22}{:>14}",
        "Sessions booked",
        ReportService::sessions_in_window(books, window)
    ))?;

    if period == Period::Month {
        month_details(context, books, reference)?;
    }
    Ok(())
}

fn month_details(
    context: &ShellContext,
    books: &Books,
    reference: NaiveDate,
) -> CommandResult {
    let fmt = &context.formatters;

    let mut weeks = Table::new(
        Some("Weekly profit"),
        vec![TableColumn::new("Week"), TableColumn::numeric("Profit")],
    );
    for week in ReportService::weekly_breakdown(books, reference) {
        weeks.add_row(vec![
            format!("{}..{}", week.window.start, week.window.end),
            fmt.format_amount(week.profit),
        ]);
    }
    show_table(&weeks, "No weeks in range.");

    let mut photographers = Table::new(
        Some("Photographers"),
        vec![
            TableColumn::new("Photographer"),
            TableColumn::numeric("Sessions"),
            TableColumn::numeric("Delivered"),
            TableColumn::numeric("Revenue"),
        ],
    );
    for row in ReportService::photographer_performance(books) {
        photographers.add_row(vec![
            row.photographer,
            row.sessions.to_string(),
            row.delivered.to_string(),
            fmt.format_amount(row.revenue),
        ]);
    }
    show_table(&photographers, "No sessions recorded yet.");

    let revenue = ReportService::revenue_breakdown(books);
    let debts = ReportService::debt_summary(books);
    let payroll = ReportService::payroll_summary(books);
    output::section("All-time totals");
    for (label, value) in [
        ("Delivered sessions", fmt.format_amount(revenue.delivered_sessions)),
        ("Delivered prints", fmt.format_amount(revenue.delivered_prints)),
        ("Delivered print costs", fmt.format_amount(revenue.delivered_print_costs)),
        (
            "Debts outstanding",
            format!("{} ({})", fmt.format_amount(debts.outstanding), debts.outstanding_count),
        ),
        (
            "Debts settled",
            format!("{} ({})", fmt.format_amount(debts.settled), debts.settled_count),
        ),
        (
            "Payroll pending",
            format!("{} ({})", fmt.format_amount(payroll.pending), payroll.pending_count),
        ),
        (
            "Payroll paid",
            format!("{} ({})", fmt.format_amount(payroll.paid), payroll.paid_count),
        ),
    ] {
        cli_io::println_text(&format!("{label:<22}{value:>14}"))?;
    }

    let mut categories = Table::new(
        Some("Expenses by category"),
        vec![TableColumn::new("Category"), TableColumn::numeric("Total")],
    );
    for (category, total) in ReportService::expense_totals_by_category(books) {
        categories.add_row(vec![category.to_string(), fmt.format_amount(total)]);
    }
    show_table(&categories, "No expenses recorded yet.");
    Ok(())
}
