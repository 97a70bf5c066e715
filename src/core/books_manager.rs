use std::path::Path;

use snapbooks_core::{
    storage::{books_warnings, BackupInfo, BooksStorage},
    CoreError, ServiceResult,
};
use snapbooks_domain::Books;
use snapbooks_storage_json::import_legacy_export;
use tracing::{debug, info, warn};

use crate::core::errors::{BooksError, Result};

/// Outcome of opening a named set of books.
#[derive(Debug, Clone)]
pub struct OpenReport {
    pub name: String,
    pub created: bool,
    pub warnings: Vec<String>,
}

/// Owns the active books and writes every accepted change through the storage backend.
pub struct BooksManager {
    current: Option<Books>,
    current_name: Option<String>,
    storage: Box<dyn BooksStorage>,
}

impl BooksManager {
    pub fn new(storage: Box<dyn BooksStorage>) -> Self {
        Self {
            current: None,
            current_name: None,
            storage,
        }
    }

    pub fn current(&self) -> Result<&Books> {
        self.current.as_ref().ok_or(BooksError::BooksNotLoaded)
    }

    pub fn current_name(&self) -> Option<&str> {
        self.current_name.as_deref()
    }

    pub fn is_loaded(&self) -> bool {
        self.current.is_some()
    }

    /// Loads `name`, creating and saving empty books when nothing is stored under it yet.
    pub fn open(&mut self, name: &str) -> Result<OpenReport> {
        let (books, created) = match self.storage.load_books(name) {
            Ok(books) => (books, false),
            Err(CoreError::BooksNotFound(_)) => {
                let books = Books::new(name);
                self.storage.save_books(name, &books)?;
                (books, true)
            }
            Err(err) => return Err(err.into()),
        };
        let warnings = books_warnings(&books);
        for warning in &warnings {
            warn!(books = name, "{warning}");
        }
        info!(
            books = name,
            created,
            records = books.record_count(),
            "books opened"
        );
        self.set_current(books, name);
        Ok(OpenReport {
            name: name.to_string(),
            created,
            warnings,
        })
    }

    pub fn set_current(&mut self, books: Books, name: &str) {
        self.current = Some(books);
        self.current_name = Some(name.to_string());
    }

    /// Applies `change` to a copy of the books, persists it, then swaps it in.
    ///
    /// A rejected change or a failed write leaves the active books untouched.
    pub fn update<T>(&mut self, change: impl FnOnce(&mut Books) -> ServiceResult<T>) -> Result<T> {
        let name = self
            .current_name
            .clone()
            .ok_or(BooksError::BooksNotLoaded)?;
        let current = self.current.as_mut().ok_or(BooksError::BooksNotLoaded)?;
        let mut draft = current.clone();
        let value = change(&mut draft)?;
        self.storage.save_books(&name, &draft)?;
        *current = draft;
        debug!(books = %name, "books saved after change");
        Ok(value)
    }

    pub fn save(&self) -> Result<()> {
        let name = self.current_name.as_deref().ok_or(BooksError::BooksNotLoaded)?;
        self.storage.save_books(name, self.current()?)?;
        Ok(())
    }

    /// Saves the active books under a new name and keeps working on that copy.
    pub fn save_as(&mut self, name: &str) -> Result<()> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(BooksError::InvalidInput("books name must not be empty".into()));
        }
        let books = self.current()?.clone();
        self.storage.save_books(trimmed, &books)?;
        self.current_name = Some(trimmed.to_string());
        info!(books = trimmed, "books saved under new name");
        Ok(())
    }

    pub fn export_to(&self, path: &Path) -> Result<()> {
        self.storage.save_books_to_path(self.current()?, path)?;
        Ok(())
    }

    pub fn list_books(&self) -> Result<Vec<String>> {
        Ok(self.storage.list_books()?)
    }

    pub fn backup(&self, note: Option<&str>) -> Result<BackupInfo> {
        let name = self.current_name.as_deref().ok_or(BooksError::BooksNotLoaded)?;
        Ok(self.storage.backup_books(name, self.current()?, note)?)
    }

    pub fn list_backups(&self) -> Result<Vec<BackupInfo>> {
        let name = self.current_name.as_deref().ok_or(BooksError::BooksNotLoaded)?;
        Ok(self.storage.list_backups(name)?)
    }

    /// Replaces the active books with `backup` and returns any anomalies it carries.
    pub fn restore(&mut self, backup: &BackupInfo) -> Result<Vec<String>> {
        if self.current_name.is_none() {
            return Err(BooksError::BooksNotLoaded);
        }
        let books = self.storage.restore_backup(backup)?;
        let warnings = books_warnings(&books);
        info!(backup = %backup.id, "books restored from backup");
        self.current = Some(books);
        Ok(warnings)
    }

    /// Imports a legacy JSON export as `name`, makes it active, and saves it.
    pub fn import_legacy(&mut self, json: &str, name: &str) -> Result<Vec<String>> {
        let import = import_legacy_export(json, name)?;
        self.storage.save_books(name, &import.books)?;
        info!(
            books = name,
            records = import.books.record_count(),
            warnings = import.warnings.len(),
            "legacy export imported"
        );
        self.set_current(import.books, name);
        Ok(import.warnings)
    }

    pub fn warnings(&self) -> Result<Vec<String>> {
        Ok(books_warnings(self.current()?))
    }
}
