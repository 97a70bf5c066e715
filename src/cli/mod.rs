pub mod args;
pub mod commands;
pub mod core;
pub mod formatters;
pub mod help;
pub mod io;
pub mod output;
pub mod registry;
pub mod render;
pub mod shell;
pub mod shell_context;
pub mod system_clock;
pub mod ui;

pub use shell::run_cli;
