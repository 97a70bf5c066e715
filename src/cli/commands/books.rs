use std::{fs, path::Path};

use snapbooks_core::storage::BackupInfo;

use crate::cli::args::{self, split_args};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io as cli_io;
use crate::cli::registry::CommandEntry;
use crate::cli::ui::{Table, TableColumn};

use super::{show_table, split_action, unknown_action};

const USAGE: &str = "\
books list
books open <name>
books save [name]
books export <path>
books import <path> [name=<name>]
books backup [note]
books backups
books restore <n|backup id>
books warnings";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "books",
        "Open, save, back up and import sets of books",
        USAGE,
        cmd_books,
    )]
}

fn cmd_books(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (action, rest) = split_action(args);
    match action.as_deref() {
        None | Some("list") => list(context),
        Some("open") => open(context, rest),
        Some("save") => save(context, rest),
        Some("export") => export(context, rest),
        Some("import") => import(context, rest),
        Some("backup") => backup(context, rest),
        Some("backups") => backups(context),
        Some("restore") => restore(context, rest),
        Some("warnings") => warnings(context),
        Some(other) => Err(unknown_action("books", other)),
    }
}

fn list(context: &ShellContext) -> CommandResult {
    let names = context.manager.list_books()?;
    if names.is_empty() {
        cli_io::print_info("No books saved yet.");
        return Ok(());
    }
    let current = context.manager.current_name();
    for name in names {
        let marker = if current == Some(name.as_str()) { "*" } else { " " };
        cli_io::print_info(format!("{marker} {name}"));
    }
    Ok(())
}

fn open(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let name = args.join(" ");
    if name.trim().is_empty() {
        return Err(CommandError::InvalidArguments("missing books name".into()));
    }
    context.open_books(name.trim())
}

fn save(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let name = args.join(" ");
    let name = name.trim();
    if name.is_empty() {
        context.manager.save()?;
        cli_io::print_success("Books saved.");
        return Ok(());
    }
    context.manager.save_as(name)?;
    context.remember_books(name)?;
    cli_io::print_success(format!("Books saved as `{name}`."));
    Ok(())
}

fn export(context: &ShellContext, args: &[&str]) -> CommandResult {
    let path = args::positional(args, 0, "export path")?;
    context.manager.export_to(Path::new(path))?;
    cli_io::print_success(format!("Books exported to {path}."));
    Ok(())
}

/// Reads a JSON export from the legacy browser app and opens it as new books.
fn import(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (positional, mut fields) = split_args(args)?;
    let path = Path::new(args::positional(&positional, 0, "path to the exported file")?);
    let name = match fields.text("name") {
        Some(name) if !name.is_empty() => name,
        _ => path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("imported")
            .to_string(),
    };
    fields.finish()?;

    let json = fs::read_to_string(path)?;
    let warnings = context.manager.import_legacy(&json, &name)?;
    let records = context.books()?.record_count();
    cli_io::print_success(format!("Imported {records} records into `{name}`."));
    context.report_warnings(&warnings);
    context.remember_books(&name)
}

fn backup(context: &ShellContext, args: &[&str]) -> CommandResult {
    let note = args.join(" ");
    let note = note.trim();
    let info = context
        .manager
        .backup((!note.is_empty()).then_some(note))?;
    cli_io::print_success(format!("Backup written: {}", info.id));
    Ok(())
}

fn backups(context: &ShellContext) -> CommandResult {
    let mut table = Table::new(
        Some("Backups (newest first)"),
        vec![
            TableColumn::numeric("#"),
            TableColumn::new("Created"),
            TableColumn::new("Id"),
        ],
    );
    for (index, info) in context.manager.list_backups()?.into_iter().enumerate() {
        table.add_row(vec![(index + 1).to_string(), info.created_at, info.id]);
    }
    show_table(&table, "No backups yet.");
    Ok(())
}

fn restore(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let token = args::positional(args, 0, "backup number or id")?;
    let backups = context.manager.list_backups()?;
    let backup = find_backup(&backups, token).ok_or_else(|| {
        CommandError::InvalidArguments(format!("no backup matches `{token}`"))
    })?;
    if !context.confirm(&format!(
        "Replace the open books with backup {}?",
        backup.id
    ))? {
        cli_io::print_info("Nothing restored.");
        return Ok(());
    }
    let warnings = context.manager.restore(backup)?;
    cli_io::print_success(format!("Restored backup {}.", backup.id));
    context.report_warnings(&warnings);
    Ok(())
}

/// Matches a 1-based position in `backups` or an id, with or without `.json`.
fn find_backup<'a>(backups: &'a [BackupInfo], token: &str) -> Option<&'a BackupInfo> {
    if let Ok(position) = token.parse::<usize>() {
        return position.checked_sub(1).and_then(|index| backups.get(index));
    }
    backups
        .iter()
        .find(|info| info.id == token || info.id.trim_end_matches(".json") == token)
}

fn warnings(context: &ShellContext) -> CommandResult {
    let warnings = context.manager.warnings()?;
    if warnings.is_empty() {
        cli_io::print_success("No anomalies found.");
    } else {
        context.report_warnings(&warnings);
    }
    Ok(())
}
