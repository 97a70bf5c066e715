use snapbooks_core::{
    format::{CurrencyFormatter, DateFormatter},
    CoreError, PrintService,
};
use snapbooks_domain::{date_label, Print};
use uuid::Uuid;

use crate::cli::args::{self, split_args, Fields};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io as cli_io;
use crate::cli::registry::CommandEntry;
use crate::cli::ui::{Table, TableColumn};

use super::{date_or_dash, show_table, split_action, unknown_action};

const USAGE: &str = "\
print add client=<name> charged=<amount> cost=<amount> [date=<YYYY-MM-DD>]
print list [pending]
print edit <n> <field>=<value>...
print deliver <n> [date=<YYYY-MM-DD>]
print remove <n>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "print",
        "Track charged prints until they are delivered",
        USAGE,
        cmd_print,
    )]
}

fn cmd_print(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (action, rest) = split_action(args);
    match action.as_deref() {
        None | Some("list") => list(context, rest),
        Some("add") => add(context, rest),
        Some("edit") => edit(context, rest),
        Some("deliver") => deliver(context, rest),
        Some("remove") => remove(context, rest),
        Some(other) => Err(unknown_action("print", other)),
    }
}

fn add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (_, mut fields) = split_args(args)?;
    let today = context.today();
    let client = fields.required_text("client")?;
    let charged = fields.required_money("charged")?;
    let cost = fields.required_money("cost")?;
    let date = fields.date("date", today)?.unwrap_or(today);
    fields.finish()?;

    let print = Print::new(client, date, charged, cost);
    let over_cost = print.actual_cost > print.amount_charged;
    context.update(|books| PrintService::add(books, print))?;
    let number = context.books()?.prints.len();
    cli_io::print_success(format!("Print #{number} charged."));
    if over_cost {
        cli_io::print_warning("This print costs more than was charged for it.");
    }
    Ok(())
}

fn edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (positional, mut fields) = split_args(args)?;
    let id = resolve_print(context, &positional)?;
    if fields.is_empty() {
        return Err(CommandError::InvalidArguments(
            "nothing to change; pass fields such as cost=20".into(),
        ));
    }
    let mut changes = context
        .books()?
        .print(id)
        .cloned()
        .ok_or(CoreError::PrintNotFound(id))?;
    apply_fields(&mut changes, &mut fields, context)?;
    fields.finish()?;

    context.update(|books| PrintService::edit(books, id, changes))?;
    cli_io::print_success("Print updated.");
    Ok(())
}

fn apply_fields(print: &mut Print, fields: &mut Fields, context: &ShellContext) -> CommandResult {
    let today = context.today();
    if let Some(client) = fields.text("client") {
        print.client_name = client;
    }
    if let Some(date) = fields.date("date", today)? {
        print.charge_date = Some(date);
    }
    if let Some(charged) = fields.money("charged")? {
        print.amount_charged = charged;
    }
    if let Some(cost) = fields.money("cost")? {
        print.actual_cost = cost;
    }
    if let Some(delivered) = fields.date("delivered", today)? {
        if !print.is_delivered() {
            return Err(CommandError::InvalidArguments(
                "use `print deliver` to deliver a print".into(),
            ));
        }
        print.delivery_date = Some(delivered);
    }
    Ok(())
}

fn resolve_print(context: &ShellContext, positional: &[&str]) -> Result<Uuid, CommandError> {
    let token = args::positional(positional, 0, "print number")?;
    args::resolve(&PrintService::list(context.books()?), token, "print")
}

fn list(context: &ShellContext, args: &[&str]) -> CommandResult {
    let pending_only = match args.first() {
        None => false,
        Some(filter) if filter.eq_ignore_ascii_case("pending") => true,
        Some(other) => {
            return Err(CommandError::InvalidArguments(format!(
                "unknown filter `{other}` (use `pending`)"
            )))
        }
    };
    let fmt = &context.formatters;
    let mut table = Table::new(
        Some(if pending_only { "Prints to deliver" } else { "Prints" }),
        vec![
            TableColumn::numeric("#"),
            TableColumn::new("Charged on"),
            TableColumn::new("Client"),
            TableColumn::numeric("Charged"),
            TableColumn::numeric("Cost"),
            TableColumn::new("Status"),
            TableColumn::new("Delivered"),
        ],
    );
    for (index, print) in PrintService::list(context.books()?).into_iter().enumerate() {
        if pending_only && print.is_delivered() {
            continue;
        }
        table.add_row(vec![
            (index + 1).to_string(),
            fmt.format_optional_date(print.charge_date),
            print.client_name.clone(),
            fmt.format_amount(print.amount_charged),
            fmt.format_amount(print.actual_cost),
            print.status.to_string(),
            date_or_dash(print.delivery_date),
        ]);
    }
    show_table(&table, "No prints to show.");
    Ok(())
}

fn deliver(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (positional, mut fields) = split_args(args)?;
    let id = resolve_print(context, &positional)?;
    let today = context.today();
    let date = fields.date("date", today)?.unwrap_or(today);
    fields.finish()?;

    context.update(|books| PrintService::deliver(books, id, date))?;
    cli_io::print_success(format!("Print delivered on {date}."));
    Ok(())
}

fn remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let id = resolve_print(context, args)?;
    let label = context
        .books()?
        .print(id)
        .map(|print| format!("{} charged on {}", print.client_name, date_label(print.charge_date)))
        .unwrap_or_default();
    if !context.confirm(&format!("Remove print for {label}?"))? {
        cli_io::print_info("Nothing removed.");
        return Ok(());
    }
    context.update(|books| PrintService::remove(books, id))?;
    cli_io::print_success(format!("Removed print for {label}."));
    Ok(())
}
