use snapbooks_core::{
    format::{CurrencyFormatter, DateFormatter},
    CoreError, ExpenseService, ReportService, SessionService,
};
use snapbooks_domain::{Expense, ExpenseCategory, Money};
use uuid::Uuid;

use crate::cli::args::{self, split_args, Fields};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io as cli_io;
use crate::cli::registry::CommandEntry;
use crate::cli::ui::{Table, TableColumn};

use super::{show_table, split_action, unknown_action};

const USAGE: &str = "\
expense add category=<category> amount=<amount> [date=<YYYY-MM-DD>] [session=<n>]
            [paid_by=<name>] [notes=<text>]
expense list [category=<category>]
expense edit <n> <field>=<value>...
expense remove <n>
categories: Decoration, Fuel, Printing, Makeup, Wardrobe, Props, Other";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "expense",
        "Record studio expenses, optionally linked to a session",
        USAGE,
        cmd_expense,
    )]
}

fn cmd_expense(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (action, rest) = split_action(args);
    match action.as_deref() {
        None | Some("list") => list(context, rest),
        Some("add") => add(context, rest),
        Some("edit") => edit(context, rest),
        Some("remove") => remove(context, rest),
        Some(other) => Err(unknown_action("expense", other)),
    }
}

fn add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (_, mut fields) = split_args(args)?;
    let today = context.today();
    let category = parse_category(&fields.required_text("category")?)?;
    let amount = fields.required_money("amount")?;
    let date = fields.date("date", today)?.unwrap_or(today);
    let mut expense = Expense::new(date, category, amount);
    apply_fields(&mut expense, &mut fields, context)?;
    fields.finish()?;

    context.update(|books| ExpenseService::add(books, expense))?;
    cli_io::print_success(format!(
        "{category} expense of {} recorded.",
        context.formatters.format_amount(amount)
    ));
    Ok(())
}

fn edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (positional, mut fields) = split_args(args)?;
    let id = resolve_expense(context, &positional)?;
    if fields.is_empty() {
        return Err(CommandError::InvalidArguments(
            "nothing to change; pass fields such as amount=40".into(),
        ));
    }
    let mut changes = context
        .books()?
        .expense(id)
        .cloned()
        .ok_or(CoreError::ExpenseNotFound(id))?;
    apply_fields(&mut changes, &mut fields, context)?;
    fields.finish()?;

    context.update(|books| ExpenseService::edit(books, id, changes))?;
    cli_io::print_success("Expense updated.");
    Ok(())
}

/// `session=none` (or an empty value) unlinks the expense.
fn apply_fields(expense: &mut Expense, fields: &mut Fields, context: &ShellContext) -> CommandResult {
    if let Some(category) = fields.text("category") {
        expense.category = parse_category(&category)?;
    }
    if let Some(amount) = fields.money("amount")? {
        expense.amount = amount;
    }
    if let Some(date) = fields.date("date", context.today())? {
        expense.date = Some(date);
    }
    if let Some(session) = fields.text("session") {
        expense.session_id = if session.is_empty() || session.eq_ignore_ascii_case("none") {
            None
        } else {
            Some(args::resolve(
                &SessionService::list(context.books()?),
                &session,
                "session",
            )?)
        };
    }
    if let Some(paid_by) = fields.text("paid_by") {
        expense.paid_by = paid_by;
    }
    if let Some(notes) = fields.text("notes") {
        expense.notes = (!notes.is_empty()).then_some(notes);
    }
    Ok(())
}

fn parse_category(raw: &str) -> Result<ExpenseCategory, CommandError> {
    ExpenseCategory::from_label(raw).ok_or_else(|| {
        let labels: Vec<_> = ExpenseCategory::ALL.iter().map(ToString::to_string).collect();
        CommandError::InvalidArguments(format!(
            "unknown category `{raw}` (use one of: {})",
            labels.join(", ")
        ))
    })
}

fn resolve_expense(context: &ShellContext, positional: &[&str]) -> Result<Uuid, CommandError> {
    let token = args::positional(positional, 0, "expense number")?;
    args::resolve(&ExpenseService::list(context.books()?), token, "expense")
}

fn list(context: &ShellContext, args: &[&str]) -> CommandResult {
    let (_, mut fields) = split_args(args)?;
    let category = fields
        .text("category")
        .map(|raw| parse_category(&raw))
        .transpose()?;
    fields.finish()?;

    let books = context.books()?;
    let fmt = &context.formatters;
    let shown: Vec<&Expense> = match category {
        Some(category) => ReportService::expenses_in_category(books, category),
        None => ExpenseService::list(books),
    };
    let all = ExpenseService::list(books);
    let title = match category {
        Some(category) => format!("{category} expenses"),
        None => "Expenses".to_string(),
    };
    let mut table = Table::new(
        Some(title),
        vec![
            TableColumn::numeric("#"),
            TableColumn::new("Date"),
            TableColumn::new("Category"),
            TableColumn::numeric("Amount"),
            TableColumn::new("Session"),
            TableColumn::new("Paid by"),
            TableColumn::new("Notes"),
        ],
    );
    for expense in &shown {
        let number = all
            .iter()
            .position(|candidate| candidate.id == expense.id)
            .map(|index| (index + 1).to_string())
            .unwrap_or_default();
        let session = expense
            .session_id
            .and_then(|id| books.session(id))
            .map(|session| session.client_name.clone())
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![
            number,
            fmt.format_optional_date(expense.date),
            expense.category.to_string(),
            fmt.format_amount(expense.amount),
            session,
            expense.paid_by.clone(),
            expense.notes.clone().unwrap_or_default(),
        ]);
    }
    show_table(&table, "No expenses to show.");
    if !shown.is_empty() {
        let total: Money = shown.iter().map(|expense| expense.amount).sum();
        cli_io::print_info(format!("Total: {}", fmt.format_amount(total)));
    }
    Ok(())
}

fn remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let id = resolve_expense(context, args)?;
    let label = context
        .books()?
        .expense(id)
        .map(|expense| {
            format!(
                "{} expense of {} on {}",
                expense.category,
                context.formatters.format_amount(expense.amount),
                context.formatters.format_optional_date(expense.date)
            )
        })
        .unwrap_or_default();
    if !context.confirm(&format!("Remove {label}?"))? {
        cli_io::print_info("Nothing removed.");
        return Ok(());
    }
    context.update(|books| ExpenseService::remove(books, id))?;
    cli_io::print_success(format!("Removed {label}."));
    Ok(())
}
