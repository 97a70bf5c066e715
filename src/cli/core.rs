//! Dispatch, error reporting, and books helpers for the shell context.

use std::{io, path::PathBuf};

use chrono::NaiveDate;
use snapbooks_config::{ConfigError, ConfigManager};
use snapbooks_core::{time::Clock, CoreError, ServiceResult};
use snapbooks_domain::Books;
use snapbooks_storage_json::JsonBooksStorage;
use strsim::levenshtein;
use thiserror::Error;

pub use crate::core::errors::CliError;
use crate::core::{books_manager::BooksManager, errors::BooksError, utils::PathResolver};

use super::commands;
use super::formatters::CliFormatters;
use super::io as cli_io;
use super::registry::{CommandEntry, CommandRegistry};
pub use super::shell_context::{CliMode, ShellContext};
use super::system_clock::SystemClock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Core(#[from] BooksError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<CoreError> for CommandError {
    fn from(err: CoreError) -> Self {
        CommandError::Core(BooksError::from(err))
    }
}

impl From<ConfigError> for CommandError {
    fn from(err: ConfigError) -> Self {
        CommandError::Core(BooksError::from(err))
    }
}

impl From<CliError> for CommandError {
    fn from(err: CliError) -> Self {
        match err {
            CliError::Core(inner) => CommandError::Core(inner),
            CliError::Command(message) => CommandError::Message(message),
        }
    }
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        match err {
            CommandError::Core(inner) => CliError::Core(inner),
            other => CliError::Command(other.to_string()),
        }
    }
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        Self::with_base_dir(mode, PathResolver::base_dir())
    }

    /// Builds a context whose config, books and backups all live under `base`.
    pub fn with_base_dir(mode: CliMode, base: PathBuf) -> Result<Self, CliError> {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let config_manager = ConfigManager::with_base_dir(base.clone())?;
        let config = config_manager.load()?;
        cli_io::apply_config(&config);
        let storage = JsonBooksStorage::with_retention(
            PathResolver::storage_paths_in(&base, &config),
            config.backup_retention,
        )?;

        let mut context = ShellContext {
            mode,
            registry,
            manager: BooksManager::new(Box::new(storage)),
            formatters: CliFormatters::from_config(&config),
            config_manager,
            config,
            clock: Box::new(SystemClock),
            base_dir: base,
            last_command: None,
            running: true,
        };
        context.open_startup_books();
        Ok(context)
    }

    /// Replaces the clock used for "today".
    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    fn open_startup_books(&mut self) {
        let name = self
            .config
            .last_opened_books
            .clone()
            .unwrap_or_else(|| self.config.default_books_name.clone());
        if let Err(err) = self.open_books(&name) {
            cli_io::print_warning(format!("Could not open books `{name}`: {err}"));
            cli_io::print_hint("Use `books open <name>` to pick another set of books.");
        }
    }

    pub(crate) fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub(crate) fn books(&self) -> Result<&Books, CommandError> {
        Ok(self.manager.current()?)
    }

    /// Runs a service call against the active books and saves the result.
    pub(crate) fn update<T>(
        &mut self,
        change: impl FnOnce(&mut Books) -> ServiceResult<T>,
    ) -> Result<T, CommandError> {
        Ok(self.manager.update(change)?)
    }

    pub(crate) fn open_books(&mut self, name: &str) -> CommandResult {
        let report = self.manager.open(name)?;
        if report.created {
            cli_io::print_success(format!("Created new books `{}`.", report.name));
        } else {
            cli_io::print_info(format!("Opened books `{}`.", report.name));
        }
        self.report_warnings(&report.warnings);
        self.remember_books(name)
    }

    pub(crate) fn remember_books(&mut self, name: &str) -> CommandResult {
        if self.config.last_opened_books.as_deref() == Some(name) {
            return Ok(());
        }
        self.config.last_opened_books = Some(name.to_string());
        self.persist_config()
    }

    pub(crate) fn persist_config(&self) -> CommandResult {
        self.config_manager.save(&self.config)?;
        Ok(())
    }

    /// Re-applies display settings and rebuilds storage after a config change.
    pub(crate) fn reload_from_config(&mut self) -> CommandResult {
        cli_io::apply_config(&self.config);
        self.formatters = CliFormatters::from_config(&self.config);
        let storage = JsonBooksStorage::with_retention(
            PathResolver::storage_paths_in(&self.base_dir, &self.config),
            self.config.backup_retention,
        )?;
        let current = self.manager.current_name().map(str::to_string);
        self.manager = BooksManager::new(Box::new(storage));
        if let Some(name) = current {
            self.open_books(&name)?;
        }
        Ok(())
    }

    pub(crate) fn report_warnings(&self, warnings: &[String]) {
        for warning in warnings {
            cli_io::print_warning(warning);
        }
    }

    /// Asks before destructive changes; scripts are never prompted.
    pub(crate) fn confirm(&self, prompt: &str) -> Result<bool, CommandError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action(prompt)
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{input}`. Type `help` to see available commands."
        ));
        if let Some(best) = closest(self.registry.names(), &input.to_lowercase()) {
            cli_io::print_hint(format!("Did you mean `{best}`?"));
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Ok(cli_io::confirm_action("Exit shell?")?)
    }

    pub(crate) fn report_error(&self, err: CommandError) {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                cli_io::print_error(message);
                if let Some(usage) = self
                    .last_command
                    .as_deref()
                    .and_then(|line| line.split_whitespace().next())
                    .and_then(|name| self.command(&name.to_lowercase()))
                    .map(|entry| entry.usage)
                {
                    cli_io::print_hint(format!("usage: {usage}"));
                }
            }
            CommandError::Core(BooksError::BooksNotLoaded) => {
                cli_io::print_error("No books are open.");
                cli_io::print_hint("Try `books open studio` to get started.");
            }
            other => cli_io::print_error(other),
        }
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }
}

/// Closest registered name within edit distance 3.
fn closest<'a>(names: impl Iterator<Item = &'a str>, input: &str) -> Option<&'a str> {
    names
        .map(|name| (levenshtein(name, input), name))
        .filter(|(distance, _)| *distance <= 3)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, name)| name)
}

#[cfg(test)]
pub(crate) fn process_script(
    base: &std::path::Path,
    today: NaiveDate,
    lines: &[&str],
) -> Result<ShellContext, CliError> {
    let mut context = ShellContext::with_base_dir(CliMode::Script, base.to_path_buf())?
        .with_clock(Box::new(snapbooks_core::time::FixedClock(today)));
    for line in lines {
        match super::shell::handle_line(&mut context, line) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => context.report_error(err),
        }
    }
    Ok(context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use snapbooks_domain::{Money, PaymentType, PrintStatus, SessionStatus};
    use tempfile::tempdir;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 7).unwrap()
    }

    #[test]
    fn suggestions_pick_the_nearest_command() {
        let names = ["session", "print", "salary", "metrics"];
        assert_eq!(closest(names.into_iter(), "sesion"), Some("session"));
        assert_eq!(closest(names.into_iter(), "metric"), Some("metrics"));
        assert_eq!(closest(names.into_iter(), "zzzzzzzzz"), None);
    }

    #[test]
    fn startup_opens_default_books() {
        let dir = tempdir().unwrap();
        let context = process_script(dir.path(), today(), &[]).unwrap();
        assert_eq!(context.manager.current_name(), Some("studio"));
        assert_eq!(context.config.last_opened_books.as_deref(), Some("studio"));
    }

    #[test]
    fn script_records_sessions_and_prints() {
        let dir = tempdir().unwrap();
        let context = process_script(
            dir.path(),
            today(),
            &[
                "session add client=Ana date=2025-05-05 price=150 photographer=Mara photos=30",
                "session advance 1",
                "session status 1 delivered",
                "print add client=Ana charged=50 cost=20 date=today",
                "print deliver 1",
            ],
        )
        .unwrap();
        let books = context.books().unwrap();
        assert_eq!(books.sessions[0].status, SessionStatus::Delivered);
        assert_eq!(books.sessions[0].price, Money::from_cents(15_000));
        assert_eq!(books.prints[0].status, PrintStatus::Delivered);
        assert_eq!(books.prints[0].delivery_date, Some(today()));
    }

    #[test]
    fn invalid_commands_do_not_stop_the_script() {
        let dir = tempdir().unwrap();
        let context = process_script(
            dir.path(),
            today(),
            &[
                "sesion list",
                "session add client=Ana",
                "session add client=Ana date=2025-05-05 price=-1",
                "worker add name=Mara pay=photo rate=2",
            ],
        )
        .unwrap();
        let books = context.books().unwrap();
        assert!(books.sessions.is_empty());
        assert_eq!(books.workers.len(), 1);
        assert_eq!(books.workers[0].payment_type, PaymentType::PerPhoto);
    }

    #[test]
    fn exit_stops_processing() {
        let dir = tempdir().unwrap();
        let context = process_script(
            dir.path(),
            today(),
            &["worker add name=Mara pay=weekly rate=300", "exit", "worker add name=Bo pay=weekly rate=300"],
        )
        .unwrap();
        assert_eq!(context.books().unwrap().workers.len(), 1);
        assert!(!context.running);
    }

    #[test]
    fn salary_draft_uses_the_workers_sessions() {
        let dir = tempdir().unwrap();
        let context = process_script(
            dir.path(),
            today(),
            &[
                "worker add name=Mara pay=session rate=25",
                "session add client=Ana date=2025-05-05 price=150 photographer=Mara",
                "session add client=Bo date=2025-05-06 price=90 photographer=mara",
                "salary draft worker=Mara week=2025-05-07",
                "salary pay 1 date=2025-05-11",
            ],
        )
        .unwrap();
        let entry = &context.books().unwrap().salaries[0];
        assert_eq!(entry.generated_amount, Money::from_cents(5_000));
        assert_eq!(entry.week_start, NaiveDate::from_ymd_opt(2025, 5, 5));
        assert!(entry.paid);
    }
}
