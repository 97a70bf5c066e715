use snapbooks_core::{
    format::{CurrencyFormatter, DateFormatter},
    CoreError, DebtService, ReportService,
};
use snapbooks_domain::Debt;
use uuid::Uuid;

use crate::cli::args::{self, split_args, Fields};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io as cli_io;
use crate::cli::registry::CommandEntry;
use crate::cli::ui::{Table, TableColumn};

use super::{date_or_dash, show_table, split_action, unknown_action, yes_no};

const USAGE: &str = "\
debt add person=<name> amount=<amount> [reason=<text>] [date=<YYYY-MM-DD>]
debt list [open]
debt edit <n> <field>=<value>...
debt pay <n> [date=<YYYY-MM-DD>]
debt unpay <n>
debt remove <n>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "debt",
        "Track money owed to people outside the studio",
        USAGE,
        cmd_debt,
    )]
}

fn cmd_debt(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (action, rest) = split_action(args);
    match action.as_deref() {
        None | Some("list") => list(context, rest),
        Some("add") => add(context, rest),
        Some("edit") => edit(context, rest),
        Some("pay") => pay(context, rest),
        Some("unpay") => unpay(context, rest),
        Some("remove") => remove(context, rest),
        Some(other) => Err(unknown_action("debt", other)),
    }
}

fn add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (_, mut fields) = split_args(args)?;
    let today = context.today();
    let person = fields.required_text("person")?;
    let amount = fields.required_money("amount")?;
    let date = fields.date("date", today)?.unwrap_or(today);
    let mut debt = Debt::new(person, amount, date);
    apply_fields(&mut debt, &mut fields, context)?;
    fields.finish()?;

    let person = debt.person_name.clone();
    context.update(|books| DebtService::add(books, debt))?;
    cli_io::print_success(format!(
        "Debt of {} to {person} recorded.",
        context.formatters.format_amount(amount)
    ));
    Ok(())
}

fn edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (positional, mut fields) = split_args(args)?;
    let id = resolve_debt(context, &positional)?;
    if fields.is_empty() {
        return Err(CommandError::InvalidArguments(
            "nothing to change; pass fields such as amount=80".into(),
        ));
    }
    let mut changes = context
        .books()?
        .debt(id)
        .cloned()
        .ok_or(CoreError::DebtNotFound(id))?;
    apply_fields(&mut changes, &mut fields, context)?;
    fields.finish()?;

    context.update(|books| DebtService::edit(books, id, changes))?;
    cli_io::print_success("Debt updated.");
    Ok(())
}

fn apply_fields(debt: &mut Debt, fields: &mut Fields, context: &ShellContext) -> CommandResult {
    if let Some(person) = fields.text("person") {
        debt.person_name = person;
    }
    if let Some(amount) = fields.money("amount")? {
        debt.amount = amount;
    }
    if let Some(reason) = fields.text("reason") {
        debt.reason = reason;
    }
    if let Some(date) = fields.date("date", context.today())? {
        debt.date = Some(date);
    }
    Ok(())
}

fn resolve_debt(context: &ShellContext, positional: &[&str]) -> Result<Uuid, CommandError> {
    let token = args::positional(positional, 0, "debt number")?;
    args::resolve(&DebtService::list(context.books()?), token, "debt")
}

fn list(context: &ShellContext, args: &[&str]) -> CommandResult {
    let open_only = match args.first() {
        None => false,
        Some(filter) if filter.eq_ignore_ascii_case("open") => true,
        Some(other) => {
            return Err(CommandError::InvalidArguments(format!(
                "unknown filter `{other}` (use `open`)"
            )))
        }
    };
    let books = context.books()?;
    let fmt = &context.formatters;
    let mut table = Table::new(
        Some(if open_only { "Open debts" } else { "Debts" }),
        vec![
            TableColumn::numeric("#"),
            TableColumn::new("Date"),
            TableColumn::new("Person"),
            TableColumn::numeric("Amount"),
            TableColumn::new("Reason"),
            TableColumn::new("Paid"),
            TableColumn::new("Paid on"),
        ],
    );
    for (index, debt) in DebtService::list(books).into_iter().enumerate() {
        if open_only && debt.paid {
            continue;
        }
        table.add_row(vec![
            (index + 1).to_string(),
            fmt.format_optional_date(debt.date),
            debt.person_name.clone(),
            fmt.format_amount(debt.amount),
            debt.reason.clone(),
            yes_no(debt.paid).to_string(),
            date_or_dash(debt.paid_date),
        ]);
    }
    show_table(&table, "No debts to show.");

    let summary = ReportService::debt_summary(books);
    if summary.outstanding_count + summary.settled_count > 0 {
        cli_io::print_info(format!(
            "Outstanding: {} ({}), settled: {} ({})",
            fmt.format_amount(summary.outstanding),
            summary.outstanding_count,
            fmt.format_amount(summary.settled),
            summary.settled_count
        ));
    }
    Ok(())
}

fn pay(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (positional, mut fields) = split_args(args)?;
    let id = resolve_debt(context, &positional)?;
    let today = context.today();
    let date = fields.date("date", today)?.unwrap_or(today);
    fields.finish()?;

    context.update(|books| DebtService::mark_paid(books, id, date))?;
    cli_io::print_success(format!("Debt marked paid on {date}."));
    Ok(())
}

fn unpay(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let id = resolve_debt(context, args)?;
    context.update(|books| DebtService::mark_unpaid(books, id))?;
    cli_io::print_success("Debt marked unpaid.");
    Ok(())
}

fn remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let id = resolve_debt(context, args)?;
    let label = context
        .books()?
        .debt(id)
        .map(|debt| {
            format!(
                "debt of {} to {}",
                context.formatters.format_amount(debt.amount),
                debt.person_name
            )
        })
        .unwrap_or_default();
    if !context.confirm(&format!("Remove {label}?"))? {
        cli_io::print_info("Nothing removed.");
        return Ok(());
    }
    context.update(|books| DebtService::remove(books, id))?;
    cli_io::print_success(format!("Removed {label}."));
    Ok(())
}
