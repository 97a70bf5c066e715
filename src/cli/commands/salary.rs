use snapbooks_core::{
    format::{CurrencyFormatter, DateFormatter},
    CoreError, PayrollService,
};
use snapbooks_domain::{date_label, DateWindow, Money, WeeklySalaryEntry};
use uuid::Uuid;

use crate::cli::args::{self, split_args};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io as cli_io;
use crate::cli::registry::CommandEntry;
use crate::cli::ui::{Table, TableColumn};

use super::worker::resolve_worker_token;
use super::{date_or_dash, show_table, split_action, unknown_action, yes_no};

const USAGE: &str = "\
salary draft worker=<name|n> [week=<any date in the week>]
salary add worker=<name|n> [week=<date>] [fixed=<amount>] [generated=<amount>]
salary list
salary edit <n> [fixed=<amount>] [generated=<amount>] [week=<date>]
salary pay <n> [date=<YYYY-MM-DD>]
salary unpay <n>
salary remove <n>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "salary",
        "Record weekly payroll and mark it paid",
        USAGE,
        cmd_salary,
    )]
}

fn cmd_salary(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (action, rest) = split_action(args);
    match action.as_deref() {
        None | Some("list") => list(context),
        Some("draft") => draft(context, rest),
        Some("add") => add(context, rest),
        Some("edit") => edit(context, rest),
        Some("pay") => pay(context, rest),
        Some("unpay") => unpay(context, rest),
        Some("remove") => remove(context, rest),
        Some(other) => Err(unknown_action("salary", other)),
    }
}

/// Computes the week's pay from the worker's rate and the sessions they shot.
fn draft(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (_, mut fields) = split_args(args)?;
    let today = context.today();
    let worker_id = resolve_worker_token(context, &fields.required_text("worker")?)?;
    let week = DateWindow::week_containing(fields.date("week", today)?.unwrap_or(today));
    fields.finish()?;

    let entry = PayrollService::draft_entry(context.books()?, worker_id, week)?;
    let summary = format!(
        "{} for {} to {}: {}",
        entry.worker_name,
        week.start,
        week.end,
        context.formatters.format_amount(entry.total())
    );
    context.update(|books| PayrollService::add(books, entry))?;
    cli_io::print_success(format!("Salary recorded for {summary}."));
    Ok(())
}

fn add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (_, mut fields) = split_args(args)?;
    let today = context.today();
    let worker_id = resolve_worker_token(context, &fields.required_text("worker")?)?;
    let week = DateWindow::week_containing(fields.date("week", today)?.unwrap_or(today));
    let fixed = fields.money("fixed")?.unwrap_or(Money::ZERO);
    let generated = fields.money("generated")?.unwrap_or(Money::ZERO);
    fields.finish()?;

    let name = context
        .books()?
        .worker(worker_id)
        .map(|worker| worker.name.clone())
        .ok_or(CoreError::WorkerNotFound(worker_id))?;
    let entry = WeeklySalaryEntry::new(worker_id, name.clone(), week.start, week.end)
        .with_amounts(fixed, generated);
    context.update(|books| PayrollService::add(books, entry))?;
    cli_io::print_success(format!("Salary entry added for {name}."));
    Ok(())
}

fn edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (positional, mut fields) = split_args(args)?;
    let id = resolve_salary(context, &positional)?;
    if fields.is_empty() {
        return Err(CommandError::InvalidArguments(
            "nothing to change; pass fixed=, generated= or week=".into(),
        ));
    }
    let mut changes = context
        .books()?
        .salary(id)
        .cloned()
        .ok_or(CoreError::SalaryNotFound(id))?;
    if let Some(fixed) = fields.money("fixed")? {
        changes.fixed_salary = fixed;
    }
    if let Some(generated) = fields.money("generated")? {
        changes.generated_amount = generated;
    }
    if let Some(reference) = fields.date("week", context.today())? {
        let week = DateWindow::week_containing(reference);
        changes.week_start = Some(week.start);
        changes.week_end = Some(week.end);
    }
    fields.finish()?;

    context.update(|books| PayrollService::edit(books, id, changes))?;
    cli_io::print_success("Salary entry updated.");
    Ok(())
}

fn resolve_salary(context: &ShellContext, positional: &[&str]) -> Result<Uuid, CommandError> {
    let token = args::positional(positional, 0, "salary number")?;
    args::resolve(&PayrollService::list(context.books()?), token, "salary")
}

fn list(context: &ShellContext) -> CommandResult {
    let fmt = &context.formatters;
    let mut table = Table::new(
        Some("Weekly salaries"),
        vec![
            TableColumn::numeric("#"),
            TableColumn::new("Week"),
            TableColumn::new("Worker"),
            TableColumn::numeric("Fixed"),
            TableColumn::numeric("Generated"),
            TableColumn::numeric("Total"),
            TableColumn::new("Paid"),
            TableColumn::new("Paid on"),
        ],
    );
    for (index, entry) in PayrollService::list(context.books()?).into_iter().enumerate() {
        table.add_row(vec![
            (index + 1).to_string(),
            format!(
                "{}..{}",
                fmt.format_optional_date(entry.week_start),
                fmt.format_optional_date(entry.week_end)
            ),
            entry.worker_name.clone(),
            fmt.format_amount(entry.fixed_salary),
            fmt.format_amount(entry.generated_amount),
            fmt.format_amount(entry.total()),
            yes_no(entry.paid).to_string(),
            date_or_dash(entry.paid_date),
        ]);
    }
    show_table(&table, "No salary entries recorded yet.");
    Ok(())
}

fn pay(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (positional, mut fields) = split_args(args)?;
    let id = resolve_salary(context, &positional)?;
    let today = context.today();
    let date = fields.date("date", today)?.unwrap_or(today);
    fields.finish()?;

    context.update(|books| PayrollService::mark_paid(books, id, date))?;
    cli_io::print_success(format!("Salary marked paid on {date}."));
    Ok(())
}

fn unpay(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let id = resolve_salary(context, args)?;
    context.update(|books| PayrollService::mark_unpaid(books, id))?;
    cli_io::print_success("Salary marked unpaid.");
    Ok(())
}

fn remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let id = resolve_salary(context, args)?;
    let label = context
        .books()?
        .salary(id)
        .map(|entry| format!("{} (week of {})", entry.worker_name, date_label(entry.week_start)))
        .unwrap_or_default();
    if !context.confirm(&format!("Remove salary entry for {label}?"))? {
        cli_io::print_info("Nothing removed.");
        return Ok(());
    }
    context.update(|books| PayrollService::remove(books, id))?;
    cli_io::print_success(format!("Removed salary entry for {label}."));
    Ok(())
}
