#![doc(test(attr(deny(warnings))))]

//! SnapBooks keeps the books of a photography studio: sessions, prints,
//! workers, weekly salaries, expenses and debts, plus the derived metrics
//! and the interactive shell used to manage them.

pub mod cli;
pub mod config;
pub mod core;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("SnapBooks tracing initialized.");
    });
}
