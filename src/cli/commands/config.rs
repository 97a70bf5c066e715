use snapbooks_config::Config;

use crate::cli::args;
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io as cli_io;
use crate::cli::output;
use crate::cli::registry::CommandEntry;

use super::{split_action, unknown_action};

const USAGE: &str = "\
config show
config set <key> <value>
config backup [note]
config backups
config restore <n|backup name>
keys: locale, currency_symbol, theme, ui_color_enabled, default_books_name,
      books_root, backup_root, backup_retention";

/// Settings that change how books are stored or displayed.
const RELOAD_KEYS: [&str; 6] = [
    "currency_symbol",
    "theme",
    "ui_color_enabled",
    "books_root",
    "backup_root",
    "backup_retention",
];

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "config",
        "Show and change shell settings",
        USAGE,
        cmd_config,
    )]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (action, rest) = split_action(args);
    match action.as_deref() {
        None | Some("show") => show(context),
        Some("set") => set(context, rest),
        Some("backup") => backup(context, rest),
        Some("backups") => backups(context),
        Some("restore") => restore(context, rest),
        Some(other) => Err(unknown_action("config", other)),
    }
}

fn show(context: &ShellContext) -> CommandResult {
    output::section("Configuration");
    for key in Config::KEYS {
        let value = context.config.get(key)?;
        cli_io::print_info(format!("  {key:<20} {value}"));
    }
    cli_io::print_info(format!(
        "  {:<20} {}",
        "last_opened_books",
        context.config.get("last_opened_books")?
    ));
    cli_io::print_info(format!(
        "  {:<20} {}",
        "file",
        context.config_manager.config_path().display()
    ));
    Ok(())
}

fn set(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let key = args::positional(args, 0, "setting name")?.to_ascii_lowercase();
    let value = args.get(1..).unwrap_or_default().join(" ");

    let mut updated = context.config.clone();
    updated.set(&key, &value)?;
    context.config = updated;
    context.persist_config()?;
    if RELOAD_KEYS.contains(&key.as_str()) {
        context.reload_from_config()?;
    }
    cli_io::print_success(format!("{key} = {}", context.config.get(&key)?));
    Ok(())
}

fn backup(context: &ShellContext, args: &[&str]) -> CommandResult {
    let note = args.join(" ");
    let note = note.trim();
    let name = context
        .config_manager
        .backup(&context.config, (!note.is_empty()).then_some(note))?;
    cli_io::print_success(format!("Configuration backed up as {name}."));
    Ok(())
}

fn backups(context: &ShellContext) -> CommandResult {
    let names = context.config_manager.list_backups()?;
    if names.is_empty() {
        cli_io::print_info("No configuration backups yet.");
        return Ok(());
    }
    for (index, name) in names.iter().enumerate() {
        cli_io::print_info(format!("  {:>2}. {name}", index + 1));
    }
    Ok(())
}

fn restore(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let token = args::positional(args, 0, "backup number or name")?;
    let names = context.config_manager.list_backups()?;
    let name = match token.parse::<usize>() {
        Ok(position) => position
            .checked_sub(1)
            .and_then(|index| names.get(index))
            .cloned(),
        Err(_) => names.iter().find(|name| name.as_str() == token).cloned(),
    }
    .ok_or_else(|| CommandError::InvalidArguments(format!("no configuration backup `{token}`")))?;

    context.config = context.config_manager.restore(&name)?;
    context.reload_from_config()?;
    cli_io::print_success(format!("Configuration restored from {name}."));
    Ok(())
}
