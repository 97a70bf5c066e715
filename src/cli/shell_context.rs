//! Shared runtime state for CLI interactions and command execution.

use std::path::PathBuf;

use snapbooks_config::{Config, ConfigManager};
use snapbooks_core::time::Clock;

use crate::core::books_manager::BooksManager;

use super::{formatters::CliFormatters, registry::CommandRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub manager: BooksManager,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub formatters: CliFormatters,
    pub clock: Box<dyn Clock>,
    pub base_dir: PathBuf,
    pub last_command: Option<String>,
    pub running: bool,
}

impl ShellContext {
    pub fn prompt(&self) -> String {
        match self.manager.current_name() {
            Some(name) => format!("snapbooks[{name}]> "),
            None => "snapbooks> ".to_string(),
        }
    }
}
