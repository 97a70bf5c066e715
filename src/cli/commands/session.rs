use chrono::NaiveDate;
use snapbooks_core::{
    format::{CurrencyFormatter, DateFormatter},
    CoreError, ReportService, SessionService,
};
use snapbooks_domain::{date_label, Money, Session, SessionStatus};
use uuid::Uuid;

use crate::cli::args::{self, split_args, Fields};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io as cli_io;
use crate::cli::registry::CommandEntry;
use crate::cli::ui::{Table, TableColumn};

use super::{show_table, split_action, unknown_action, yes_no};

const USAGE: &str = "\
session add client=<name> price=<amount> [date=<YYYY-MM-DD>] [type=<text>] [photos=<n>]
            [photographer=<name>] [decoration=<amount>] [status=<status>] [print=yes|no] [notes=<text>]
session list
session show <n>
session edit <n> <field>=<value>...
session advance <n>
session status <n> pending|done|delivered
session remove <n>
session search <text>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "session",
        "Book, update and deliver photo sessions",
        USAGE,
        cmd_session,
    )]
}

fn cmd_session(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (action, rest) = split_action(args);
    match action.as_deref() {
        None | Some("list") => list(context),
        Some("add") => add(context, rest),
        Some("show") => show(context, rest),
        Some("edit") => edit(context, rest),
        Some("advance") => advance(context, rest),
        Some("status") => set_status(context, rest),
        Some("remove") => remove(context, rest),
        Some("search") => search(context, rest),
        Some(other) => Err(unknown_action("session", other)),
    }
}

fn add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (_, mut fields) = split_args(args)?;
    let today = context.today();
    let client = fields.required_text("client")?;
    let price = fields.required_money("price")?;
    let date = fields.date("date", today)?.unwrap_or(today);
    let mut session = Session::new(client, date, price);
    apply_fields(&mut session, &mut fields, today)?;
    fields.finish()?;

    context.update(|books| SessionService::add(books, session))?;
    let number = context.books()?.sessions.len();
    cli_io::print_success(format!("Session #{number} added."));
    Ok(())
}

fn edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (positional, mut fields) = split_args(args)?;
    let id = resolve_session(context, &positional)?;
    if fields.is_empty() {
        return Err(CommandError::InvalidArguments(
            "nothing to change; pass fields such as status=done".into(),
        ));
    }
    let mut changes = context
        .books()?
        .session(id)
        .cloned()
        .ok_or(CoreError::SessionNotFound(id))?;
    apply_fields(&mut changes, &mut fields, context.today())?;
    fields.finish()?;

    context.update(|books| SessionService::edit(books, id, changes))?;
    cli_io::print_success("Session updated.");
    Ok(())
}

fn apply_fields(session: &mut Session, fields: &mut Fields, today: NaiveDate) -> CommandResult {
    if let Some(client) = fields.text("client") {
        session.client_name = client;
    }
    if let Some(date) = fields.date("date", today)? {
        session.date = Some(date);
    }
    if let Some(price) = fields.money("price")? {
        session.price = price;
    }
    if let Some(kind) = fields.text("type") {
        session.session_type = kind;
    }
    if let Some(photos) = fields.count("photos")? {
        session.photo_count = photos;
    }
    if let Some(photographer) = fields.text("photographer") {
        session.photographer = photographer;
    }
    if let Some(decoration) = fields.money("decoration")? {
        session.decoration_cost = decoration;
    }
    if let Some(status) = fields.text("status") {
        session.status = parse_status(&status)?;
    }
    if let Some(includes_print) = fields.flag("print")? {
        session.includes_print = includes_print;
    }
    if let Some(notes) = fields.text("notes") {
        session.notes = (!notes.is_empty()).then_some(notes);
    }
    Ok(())
}

fn parse_status(raw: &str) -> Result<SessionStatus, CommandError> {
    SessionStatus::from_label(raw).ok_or_else(|| {
        CommandError::InvalidArguments(format!(
            "unknown session status `{raw}` (use pending, done or delivered)"
        ))
    })
}

fn resolve_session(context: &ShellContext, positional: &[&str]) -> Result<Uuid, CommandError> {
    let token = args::positional(positional, 0, "session number")?;
    args::resolve(&SessionService::list(context.books()?), token, "session")
}

fn list(context: &ShellContext) -> CommandResult {
    let books = context.books()?;
    let rows = SessionService::list(books).into_iter().enumerate().collect();
    show_table(
        &session_table(context, "Sessions", rows),
        "No sessions recorded yet.",
    );
    Ok(())
}

fn search(context: &ShellContext, args: &[&str]) -> CommandResult {
    let term = args.join(" ");
    let books = context.books()?;
    let all = SessionService::list(books);
    let rows = ReportService::session_search(books, &term)
        .into_iter()
        .filter_map(|found| {
            all.iter()
                .position(|session| session.id == found.id)
                .map(|index| (index, found))
        })
        .collect();
    show_table(
        &session_table(context, &format!("Sessions matching `{term}`"), rows),
        "No matching sessions.",
    );
    Ok(())
}

fn session_table(context: &ShellContext, title: &str, rows: Vec<(usize, &Session)>) -> Table {
    let mut table = Table::new(
        Some(title),
        vec![
            TableColumn::numeric("#"),
            TableColumn::new("Date"),
            TableColumn::new("Client"),
            TableColumn::new("Type"),
            TableColumn::new("Photographer"),
            TableColumn::numeric("Photos"),
            TableColumn::numeric("Price"),
            TableColumn::new("Status"),
        ],
    );
    for (index, session) in rows {
        table.add_row(vec![
            (index + 1).to_string(),
            context.formatters.format_optional_date(session.date),
            session.client_name.clone(),
            session.session_type.clone(),
            session.photographer.clone(),
            session.photo_count.to_string(),
            context.formatters.format_amount(session.price),
            session.status.to_string(),
        ]);
    }
    table
}

fn show(context: &ShellContext, args: &[&str]) -> CommandResult {
    let id = resolve_session(context, args)?;
    let books = context.books()?;
    let session = books.session(id).ok_or(CoreError::SessionNotFound(id))?;
    let linked: Vec<_> = books
        .expenses
        .iter()
        .filter(|expense| expense.session_id == Some(id))
        .collect();
    let linked_total: Money = linked.iter().map(|expense| expense.amount).sum();
    let fmt = &context.formatters;

    let rows = [
        ("Id", session.id.to_string()),
        ("Client", session.client_name.clone()),
        ("Date", fmt.format_optional_date(session.date)),
        ("Type", session.session_type.clone()),
        ("Price", fmt.format_amount(session.price)),
        ("Photos", session.photo_count.to_string()),
        ("Photographer", session.photographer.clone()),
        ("Decoration", fmt.format_amount(session.decoration_cost)),
        ("Status", session.status.to_string()),
        ("Includes print", yes_no(session.includes_print).to_string()),
        ("Notes", session.notes.clone().unwrap_or_default()),
        (
            "Linked expenses",
            format!("{} ({})", linked.len(), fmt.format_amount(linked_total)),
        ),
    ];
    crate::cli::output::section(format!("Session: {}", session.client_name));
    for (label, value) in rows {
        cli_io::print_info(format!("  {label:<16} {value}"));
    }
    Ok(())
}

fn advance(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let id = resolve_session(context, args)?;
    let status = context.update(|books| SessionService::advance(books, id))?;
    cli_io::print_success(format!("Session is now {status}."));
    Ok(())
}

fn set_status(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let id = resolve_session(context, args)?;
    let status = parse_status(args::positional(args, 1, "status")?)?;
    context.update(|books| SessionService::set_status(books, id, status))?;
    cli_io::print_success(format!("Session is now {status}."));
    Ok(())
}

fn remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let id = resolve_session(context, args)?;
    let label = {
        let books = context.books()?;
        books
            .session(id)
            .map(|session| format!("{} on {}", session.client_name, date_label(session.date)))
            .unwrap_or_default()
    };
    if !context.confirm(&format!("Remove session for {label}?"))? {
        cli_io::print_info("Nothing removed.");
        return Ok(());
    }
    context.update(|books| SessionService::remove(books, id))?;
    cli_io::print_success(format!("Removed session for {label}."));
    Ok(())
}
