use snapbooks_core::{MetricsEngine, ReportService};
use snapbooks_domain::DateWindow;

use crate::cli::args;
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io as cli_io;
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::render::{counts_lines, metrics_lines};

const USAGE: &str = "metrics [YYYY-MM-DD]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "metrics",
        "Show the dashboard figures as of today or a given date",
        USAGE,
        cmd_metrics,
    )]
}

fn cmd_metrics(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let today = context.today();
    let reference = match args {
        [] => today,
        [raw] => args::parse_date(raw, today).ok_or_else(|| {
            CommandError::InvalidArguments(format!("`{raw}` is not a date (use YYYY-MM-DD)"))
        })?,
        _ => {
            return Err(CommandError::InvalidArguments(
                "metrics takes at most one date".into(),
            ))
        }
    };

    let books = context.books()?;
    let metrics = MetricsEngine::at(books, reference);
    let counts = ReportService::dashboard_counts(books);
    let this_week = ReportService::sessions_in_window(books, DateWindow::week_containing(reference));

    output::section(format!("Metrics as of {reference}"));
    for line in metrics_lines(&metrics, &context.formatters) {
        cli_io::println_text(&line)?;
    }
    for line in counts_lines(&counts) {
        cli_io::println_text(&line)?;
    }
    cli_io::println_text(&format!("{:<22}{:>14}", "Sessions this week", this_week))?;
    Ok(())
}
