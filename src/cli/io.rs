use std::fmt;
use std::io::{self, Write};

use dialoguer::{theme::ColorfulTheme, Confirm};
use snapbooks_config::Config;

use crate::cli::core::CommandError;
use crate::cli::output::{self, OutputPreferences};

pub fn print_info(message: impl fmt::Display) {
    output::info(message);
}

pub fn print_warning(message: impl fmt::Display) {
    output::warning(message);
}

pub fn print_error(message: impl fmt::Display) {
    output::error(message);
}

pub fn print_success(message: impl fmt::Display) {
    output::success(message);
}

pub fn print_hint(message: impl fmt::Display) {
    output::hint(message);
}

/// Writes a pre-formatted line to stdout.
pub fn println_text(text: &str) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{text}")
}

/// Prompt the user for confirmation with a yes/no question.
pub fn confirm_action(prompt: &str) -> Result<bool, CommandError> {
    Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(CommandError::from)
}

/// Pushes display preferences from `config` into the output helpers and table style.
pub fn apply_config(config: &Config) {
    output::set_preferences(OutputPreferences::from_config(config));
    crate::cli::ui::style::refresh_style();
}
