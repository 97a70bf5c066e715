//! snapbooks-core
//!
//! Metrics, reports, and record services for SnapBooks.
//! Depends on snapbooks-domain. No CLI, no terminal I/O, no direct storage interactions.

pub mod debt_service;
pub mod error;
pub mod expense_service;
pub mod format;
pub mod metrics;
pub mod payroll_service;
pub mod print_service;
pub mod report_service;
pub mod session_service;
pub mod storage;
pub mod time;
pub mod worker_service;

mod validate;

pub use debt_service::*;
pub use error::CoreError;
pub use expense_service::*;
pub use metrics::*;
pub use payroll_service::*;
pub use print_service::*;
pub use report_service::*;
pub use session_service::*;
pub use worker_service::*;

pub type ServiceResult<T> = Result<T, CoreError>;
