#![allow(dead_code)]

use std::{path::PathBuf, sync::Mutex};

use once_cell::sync::Lazy;
use snapbooks::{
    config::{manager_with_base, ConfigManager},
    core::BooksManager,
};
use snapbooks_storage_json::{JsonBooksStorage, StoragePaths};
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// A fresh data directory that outlives the calling test.
pub fn temp_base() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// Creates isolated managers backed by unique directories for each test.
pub fn setup_test_env() -> (BooksManager, ConfigManager, PathBuf) {
    let base = temp_base();
    let storage = JsonBooksStorage::with_retention(
        StoragePaths {
            books_root: base.join("books"),
            backup_root: base.join("backups"),
        },
        3,
    )
    .expect("create json storage backend");
    let books_manager = BooksManager::new(Box::new(storage));
    let config_manager = manager_with_base(base.clone()).expect("create config manager");
    (books_manager, config_manager, base)
}
