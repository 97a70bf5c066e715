//! snapbooks-domain
//!
//! Pure record models for the studio books (sessions, prints, workers, payroll,
//! expenses, debts) plus money and calendar-window primitives.
//! No I/O, no CLI, no storage.

pub mod books;
pub mod common;
pub mod debt;
pub mod expense;
pub mod money;
pub mod print;
pub mod salary;
pub mod session;
pub mod worker;

pub use books::*;
pub use common::*;
pub use debt::*;
pub use expense::*;
pub use money::*;
pub use print::*;
pub use salary::*;
pub use session::*;
pub use worker::*;
