use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Books not loaded")]
    BooksNotLoaded,
    #[error("Books not found: {0}")]
    BooksNotFound(String),
    #[error("Session not found: {0}")]
    SessionNotFound(Uuid),
    #[error("Print not found: {0}")]
    PrintNotFound(Uuid),
    #[error("Worker not found: {0}")]
    WorkerNotFound(Uuid),
    #[error("Salary entry not found: {0}")]
    SalaryNotFound(Uuid),
    #[error("Expense not found: {0}")]
    ExpenseNotFound(Uuid),
    #[error("Debt not found: {0}")]
    DebtNotFound(Uuid),
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Serialization error: {0}")]
    Serde(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
