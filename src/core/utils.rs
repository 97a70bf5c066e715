use std::{
    env,
    path::{Path, PathBuf},
};

use snapbooks_config::Config;
use snapbooks_storage_json::StoragePaths;

pub const HOME_ENV: &str = "SNAPBOOKS_HOME";

/// Resolves the on-disk layout of the application data directory.
pub struct PathResolver;

impl PathResolver {
    /// `$SNAPBOOKS_HOME` when set, `~/.snapbooks` otherwise.
    pub fn base_dir() -> PathBuf {
        match env::var_os(HOME_ENV) {
            Some(custom) if !custom.is_empty() => PathBuf::from(custom),
            _ => Config::default_data_dir(),
        }
    }

    /// Books and backup directories under `base`, honouring overrides stored in `config`.
    pub fn storage_paths_in(base: &Path, config: &Config) -> StoragePaths {
        StoragePaths {
            books_root: config.resolve_books_root(base),
            backup_root: config.resolve_backup_root(base),
        }
    }
}
