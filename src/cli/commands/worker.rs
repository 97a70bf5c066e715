use snapbooks_core::{format::CurrencyFormatter, CoreError, WorkerService};
use snapbooks_domain::{PaymentType, Worker};
use uuid::Uuid;

use crate::cli::args::{self, split_args, Fields};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io as cli_io;
use crate::cli::registry::CommandEntry;
use crate::cli::ui::{Table, TableColumn};

use super::{show_table, split_action, unknown_action};

const USAGE: &str = "\
worker add name=<name> pay=weekly|session|photo|client rate=<amount> [role=<text>]
worker list
worker edit <n> <field>=<value>...
worker remove <n>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "worker",
        "Manage studio staff and their pay rates",
        USAGE,
        cmd_worker,
    )]
}

fn cmd_worker(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (action, rest) = split_action(args);
    match action.as_deref() {
        None | Some("list") => list(context),
        Some("add") => add(context, rest),
        Some("edit") => edit(context, rest),
        Some("remove") => remove(context, rest),
        Some(other) => Err(unknown_action("worker", other)),
    }
}

fn add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (_, mut fields) = split_args(args)?;
    let name = fields.required_text("name")?;
    let pay = parse_payment(&fields.required_text("pay")?)?;
    let rate = fields.required_money("rate")?;
    let mut worker = Worker::new(name, pay, rate);
    apply_fields(&mut worker, &mut fields)?;
    fields.finish()?;

    let name = worker.name.clone();
    context.update(|books| WorkerService::add(books, worker))?;
    cli_io::print_success(format!("Worker {name} added."));
    Ok(())
}

fn edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (positional, mut fields) = split_args(args)?;
    let id = resolve_worker(context, &positional)?;
    if fields.is_empty() {
        return Err(CommandError::InvalidArguments(
            "nothing to change; pass fields such as rate=30".into(),
        ));
    }
    let mut changes = context
        .books()?
        .worker(id)
        .cloned()
        .ok_or(CoreError::WorkerNotFound(id))?;
    apply_fields(&mut changes, &mut fields)?;
    fields.finish()?;

    context.update(|books| WorkerService::edit(books, id, changes))?;
    cli_io::print_success("Worker updated.");
    Ok(())
}

fn apply_fields(worker: &mut Worker, fields: &mut Fields) -> CommandResult {
    if let Some(name) = fields.text("name") {
        worker.name = name;
    }
    if let Some(role) = fields.text("role") {
        worker.role = role;
    }
    if let Some(pay) = fields.text("pay") {
        worker.payment_type = parse_payment(&pay)?;
    }
    if let Some(rate) = fields.money("rate")? {
        worker.amount = rate;
    }
    Ok(())
}

fn parse_payment(raw: &str) -> Result<PaymentType, CommandError> {
    PaymentType::from_label(raw).ok_or_else(|| {
        let keys: Vec<_> = PaymentType::ALL.iter().map(|pay| pay.key()).collect();
        CommandError::InvalidArguments(format!(
            "unknown payment type `{raw}` (use one of: {})",
            keys.join(", ")
        ))
    })
}

/// Accepts a list position, an id, or the worker's name.
pub(crate) fn resolve_worker(
    context: &ShellContext,
    positional: &[&str],
) -> Result<Uuid, CommandError> {
    let token = args::positional(positional, 0, "worker")?;
    resolve_worker_token(context, token)
}

pub(crate) fn resolve_worker_token(
    context: &ShellContext,
    token: &str,
) -> Result<Uuid, CommandError> {
    let books = context.books()?;
    if let Some(worker) = WorkerService::find_by_name(books, token) {
        return Ok(worker.id);
    }
    args::resolve(&WorkerService::list(books), token, "worker")
}

fn list(context: &ShellContext) -> CommandResult {
    let mut table = Table::new(
        Some("Workers"),
        vec![
            TableColumn::numeric("#"),
            TableColumn::new("Name"),
            TableColumn::new("Role"),
            TableColumn::new("Paid"),
            TableColumn::numeric("Rate"),
        ],
    );
    for (index, worker) in WorkerService::list(context.books()?).into_iter().enumerate() {
        table.add_row(vec![
            (index + 1).to_string(),
            worker.name.clone(),
            worker.role.clone(),
            worker.payment_type.to_string(),
            context.formatters.format_amount(worker.amount),
        ]);
    }
    show_table(&table, "No workers recorded yet.");
    Ok(())
}

fn remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let id = resolve_worker(context, args)?;
    let name = context
        .books()?
        .worker(id)
        .map(|worker| worker.name.clone())
        .unwrap_or_default();
    if !context.confirm(&format!("Remove worker {name}?"))? {
        cli_io::print_info("Nothing removed.");
        return Ok(());
    }
    context.update(|books| WorkerService::remove(books, id))?;
    cli_io::print_success(format!("Removed worker {name}. Recorded salaries keep their name."));
    Ok(())
}
