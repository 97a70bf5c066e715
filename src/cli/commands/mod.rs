pub mod books;
pub mod config;
pub mod debt;
pub mod expense;
pub mod metrics;
pub mod print;
pub mod report;
pub mod salary;
pub mod session;
pub mod system;
pub mod worker;

use chrono::NaiveDate;

use crate::cli::core::CommandError;
use crate::cli::io as cli_io;
use crate::cli::registry::{CommandEntry, CommandRegistry};
use crate::cli::ui::{style::style, Table, TableRenderer};

const ROOT_COMMAND_ORDER: &[&str] = &[
    "session", "print", "worker", "salary", "expense", "debt", "metrics", "report", "books",
    "config", "help", "version", "exit",
];

pub(crate) fn all_entries() -> Vec<CommandEntry> {
    let mut commands = Vec::new();
    commands.extend(session::definitions());
    commands.extend(print::definitions());
    commands.extend(worker::definitions());
    commands.extend(salary::definitions());
    commands.extend(expense::definitions());
    commands.extend(debt::definitions());
    commands.extend(metrics::definitions());
    commands.extend(report::definitions());
    commands.extend(books::definitions());
    commands.extend(config::definitions());
    commands.extend(system::definitions());
    commands
}

pub(crate) fn register_all(registry: &mut CommandRegistry) {
    let mut entries = all_entries();
    entries.sort_by_key(|entry| {
        ROOT_COMMAND_ORDER
            .iter()
            .position(|name| entry.name.eq_ignore_ascii_case(name))
            .unwrap_or(ROOT_COMMAND_ORDER.len())
    });
    for entry in entries {
        registry.register(entry);
    }
}

/// Splits `<action> <args...>`; the action is lower-cased.
pub(crate) fn split_action<'a, 'b>(args: &'a [&'b str]) -> (Option<String>, &'a [&'b str]) {
    match args.split_first() {
        Some((action, rest)) => (Some(action.to_lowercase()), rest),
        None => (None, args),
    }
}

pub(crate) fn unknown_action(command: &str, action: &str) -> CommandError {
    CommandError::InvalidArguments(format!("unknown `{command}` action `{action}`"))
}

pub(crate) fn show_table(table: &Table, empty_message: &str) {
    if table.is_empty() {
        cli_io::print_info(empty_message);
        return;
    }
    TableRenderer::render(table, &style());
}

pub(crate) fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

pub(crate) fn date_or_dash(date: Option<NaiveDate>) -> String {
    date.map(|value| value.to_string())
        .unwrap_or_else(|| "-".to_string())
}
