use std::result::Result as StdResult;

use snapbooks_config::ConfigError;
use snapbooks_core::CoreError;
use snapbooks_domain::{DateWindowError, MoneyParseError};
use thiserror::Error;

/// Unified error type for the domain, service, storage, and config layers.
#[derive(Error, Debug)]
pub enum BooksError {
    #[error("Books not loaded")]
    BooksNotLoaded,
    #[error("Record not found: {0}")]
    NotFound(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Persistence error: {0}")]
    StorageError(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

pub type Result<T> = StdResult<T, BooksError>;

/// User-facing CLI error wrapper.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] BooksError),
    #[error("Command failed: {0}")]
    Command(String),
}

impl From<std::io::Error> for BooksError {
    fn from(err: std::io::Error) -> Self {
        BooksError::StorageError(err.to_string())
    }
}

impl From<serde_json::Error> for BooksError {
    fn from(err: serde_json::Error) -> Self {
        BooksError::StorageError(err.to_string())
    }
}

impl From<DateWindowError> for BooksError {
    fn from(err: DateWindowError) -> Self {
        BooksError::InvalidInput(err.to_string())
    }
}

impl From<MoneyParseError> for BooksError {
    fn from(err: MoneyParseError) -> Self {
        BooksError::InvalidInput(err.to_string())
    }
}

impl From<CoreError> for BooksError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::BooksNotLoaded => BooksError::BooksNotLoaded,
            CoreError::BooksNotFound(name) => BooksError::NotFound(format!("books `{name}`")),
            CoreError::SessionNotFound(id) => BooksError::NotFound(format!("session {id}")),
            CoreError::PrintNotFound(id) => BooksError::NotFound(format!("print {id}")),
            CoreError::WorkerNotFound(id) => BooksError::NotFound(format!("worker {id}")),
            CoreError::SalaryNotFound(id) => BooksError::NotFound(format!("salary entry {id}")),
            CoreError::ExpenseNotFound(id) => BooksError::NotFound(format!("expense {id}")),
            CoreError::DebtNotFound(id) => BooksError::NotFound(format!("debt {id}")),
            CoreError::InvalidOperation(message) | CoreError::Validation(message) => {
                BooksError::InvalidInput(message)
            }
            CoreError::Storage(message) | CoreError::Serde(message) => {
                BooksError::StorageError(message)
            }
            CoreError::Io(err) => BooksError::StorageError(err.to_string()),
        }
    }
}

impl From<ConfigError> for BooksError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Io(io) => BooksError::StorageError(io.to_string()),
            other => BooksError::ConfigError(other.to_string()),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        CliError::from(BooksError::from(err))
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        CliError::from(BooksError::from(err))
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Command(err.to_string())
    }
}

impl From<rustyline::error::ReadlineError> for CliError {
    fn from(err: rustyline::error::ReadlineError) -> Self {
        CliError::Command(err.to_string())
    }
}
