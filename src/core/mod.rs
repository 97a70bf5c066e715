pub mod books_manager;
pub mod errors;
pub mod utils;

pub use books_manager::{BooksManager, OpenReport};
pub use errors::{BooksError, CliError};
