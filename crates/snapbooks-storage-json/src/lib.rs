//! snapbooks-storage-json
//!
//! Filesystem JSON persistence for studio books, their rotating backups, and
//! import of JSON exports from the legacy browser bookkeeping app.

use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use chrono::{DateTime, NaiveDateTime, Utc};
use snapbooks_core::{
    storage::{BackupInfo, BooksStorage},
    CoreError,
};
use snapbooks_domain::{Books, CURRENT_SCHEMA_VERSION};
use tracing::{debug, info, warn};

pub mod legacy;

pub use legacy::{import_legacy_export, LegacyImport};

const BOOKS_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M";
const TMP_SUFFIX: &str = "tmp";
pub const DEFAULT_RETENTION: usize = 5;

/// Directory layout used by [`JsonBooksStorage`].
#[derive(Debug, Clone)]
pub struct StoragePaths {
    pub books_root: PathBuf,
    pub backup_root: PathBuf,
}

/// Filesystem-backed JSON persistence for books and their backups.
#[derive(Clone)]
pub struct JsonBooksStorage {
    books_dir: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
}

impl JsonBooksStorage {
    pub fn new(paths: StoragePaths) -> Result<Self, CoreError> {
        Self::with_retention(paths, DEFAULT_RETENTION)
    }

    pub fn with_retention(paths: StoragePaths, retention: usize) -> Result<Self, CoreError> {
        fs::create_dir_all(&paths.books_root)?;
        fs::create_dir_all(&paths.backup_root)?;
        Ok(Self {
            books_dir: paths.books_root,
            backups_dir: paths.backup_root,
            retention: retention.max(1),
        })
    }

    pub fn books_path(&self, name: &str) -> PathBuf {
        self.books_dir
            .join(format!("{}.{}", canonical_name(name), BOOKS_EXTENSION))
    }

    pub fn save_to_path(&self, books: &Books, path: &Path) -> Result<(), CoreError> {
        if path.starts_with(&self.books_dir) {
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                self.backup_existing_file(stem, path)?;
            }
        }
        save_books_to_path(books, path)
    }

    pub fn load_from_path(&self, path: &Path) -> Result<Books, CoreError> {
        load_books_from_path(path)
    }

    fn backup_dir(&self, name: &str) -> PathBuf {
        self.backups_dir.join(canonical_name(name))
    }

    fn write_backup_file(
        &self,
        books: &Books,
        name: &str,
        note: Option<&str>,
    ) -> Result<BackupInfo, CoreError> {
        let dir = self.backup_dir(name);
        fs::create_dir_all(&dir)?;
        let timestamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let mut stem = format!("{}_{}", canonical_name(name), timestamp);
        if let Some(label) = sanitize_backup_note(note) {
            stem.push('_');
            stem.push_str(&label);
        }
        let file_name = format!("{}.{}", stem, BOOKS_EXTENSION);
        let path = dir.join(&file_name);
        write_atomic(&path, &serialize_books(books)?)?;
        self.prune_backups(name)?;
        info!(books = %canonical_name(name), backup = %file_name, "backup written");
        Ok(BackupInfo {
            books: canonical_name(name),
            id: file_name,
            created_at: timestamp,
            path,
        })
    }

    fn backup_existing_file(&self, name: &str, path: &Path) -> Result<(), CoreError> {
        if !path.exists() {
            return Ok(());
        }
        let dir = self.backup_dir(name);
        fs::create_dir_all(&dir)?;
        let timestamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let file_name = format!(
            "{}_{}.{}",
            canonical_name(name),
            timestamp,
            BOOKS_EXTENSION
        );
        fs::copy(path, dir.join(&file_name))?;
        self.prune_backups(name)?;
        Ok(())
    }

    /// Keeps the newest `retention` backups in each of two pools: noted backups
    /// the user asked for, and the plain snapshots taken before every save.
    fn prune_backups(&self, name: &str) -> Result<(), CoreError> {
        let (noted, plain): (Vec<_>, Vec<_>) = self
            .list_backups(name)?
            .into_iter()
            .partition(|entry| has_backup_note(&entry.id));
        let expired = noted
            .into_iter()
            .skip(self.retention)
            .chain(plain.into_iter().skip(self.retention));
        for entry in expired {
            debug!(backup = %entry.id, "pruning backup");
            if let Err(err) = fs::remove_file(&entry.path) {
                warn!(backup = %entry.id, error = %err, "failed to prune backup");
            }
        }
        Ok(())
    }
}

impl BooksStorage for JsonBooksStorage {
    fn save_books(&self, name: &str, books: &Books) -> Result<(), CoreError> {
        let path = self.books_path(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        if path.exists() {
            self.backup_existing_file(name, &path)?;
        }
        let tmp = tmp_path(&path);
        write_atomic(&tmp, &serialize_books(books)?)?;
        fs::rename(&tmp, &path)?;
        debug!(path = %path.display(), records = books.record_count(), "books saved");
        Ok(())
    }

    fn load_books(&self, name: &str) -> Result<Books, CoreError> {
        let path = self.books_path(name);
        if !path.exists() {
            return Err(CoreError::BooksNotFound(name.to_string()));
        }
        load_books_from_path(&path)
    }

    fn list_books(&self) -> Result<Vec<String>, CoreError> {
        if !self.books_dir.exists() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.books_dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            if path.extension().and_then(|ext| ext.to_str()) != Some(BOOKS_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    fn delete_books(&self, name: &str) -> Result<(), CoreError> {
        let path = self.books_path(name);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    fn save_books_to_path(&self, books: &Books, path: &Path) -> Result<(), CoreError> {
        self.save_to_path(books, path)
    }

    fn load_books_from_path(&self, path: &Path) -> Result<Books, CoreError> {
        self.load_from_path(path)
    }

    fn backup_books(
        &self,
        name: &str,
        books: &Books,
        note: Option<&str>,
    ) -> Result<BackupInfo, CoreError> {
        self.write_backup_file(books, name, note)
    }

    fn list_backups(&self, name: &str) -> Result<Vec<BackupInfo>, CoreError> {
        let dir = self.backup_dir(name);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        let slug = canonical_name(name);
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(BOOKS_EXTENSION) {
                continue;
            }
            if let Some(file_name) = path.file_name().and_then(|name| name.to_str()) {
                entries.push(BackupInfo {
                    books: slug.clone(),
                    id: file_name.to_string(),
                    created_at: parse_backup_timestamp(file_name)
                        .map(|ts| ts.format("%Y-%m-%d %H:%M").to_string())
                        .unwrap_or_else(|| file_name.to_string()),
                    path: path.clone(),
                });
            }
        }
        entries.sort_by(|a, b| {
            parse_backup_timestamp(&b.id)
                .cmp(&parse_backup_timestamp(&a.id))
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(entries)
    }

    fn restore_backup(&self, backup: &BackupInfo) -> Result<Books, CoreError> {
        if !backup.path.exists() {
            return Err(CoreError::Storage(format!(
                "backup `{}` not found",
                backup.id
            )));
        }
        let restored = load_books_from_path(&backup.path)?;
        let target = self.books_path(&backup.books);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = tmp_path(&target);
        fs::copy(&backup.path, &tmp)?;
        fs::rename(&tmp, &target)?;
        info!(backup = %backup.id, "backup restored");
        Ok(restored)
    }
}

/// Saves books to an arbitrary path on disk.
pub fn save_books_to_path(books: &Books, path: &Path) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = tmp_path(path);
    write_atomic(&tmp, &serialize_books(books)?)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Loads books from the provided filesystem path.
pub fn load_books_from_path(path: &Path) -> Result<Books, CoreError> {
    let data = fs::read_to_string(path)?;
    let books: Books =
        serde_json::from_str(&data).map_err(|err| CoreError::Serde(err.to_string()))?;
    if books.schema_version > CURRENT_SCHEMA_VERSION {
        return Err(CoreError::Storage(format!(
            "{} uses schema version {} but only {} is supported",
            path.display(),
            books.schema_version,
            CURRENT_SCHEMA_VERSION
        )));
    }
    info!(path = %path.display(), records = books.record_count(), "books loaded");
    Ok(books)
}

/// File-name slug for a books name: lowercase ASCII letters and digits, other characters become `_`.
pub fn canonical_name(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "books".into()
    } else {
        sanitized
    }
}

fn sanitize_backup_note(note: Option<&str>) -> Option<String> {
    let raw = note?.trim();
    if raw.is_empty() {
        return None;
    }
    let mut sanitized = String::new();
    let mut last_dash = false;
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            sanitized.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if (ch.is_whitespace() || matches!(ch, '-' | '.' | '_'))
            && !sanitized.is_empty()
            && !last_dash
        {
            sanitized.push('-');
            last_dash = true;
        }
    }
    let trimmed = sanitized.trim_matches('-').to_string();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

/// Extracts the `YYYYMMDD_HHMM` stamp from a backup file name, with or without a trailing note.
fn parse_backup_timestamp(name: &str) -> Option<DateTime<Utc>> {
    let trimmed = name.strip_suffix(&format!(".{}", BOOKS_EXTENSION))?;
    let segments = trimmed.split('_').collect::<Vec<_>>();
    segments
        .windows(2)
        .rev()
        .find(|pair| is_digits(pair[0], 8) && is_digits(pair[1], 4))
        .and_then(|pair| {
            NaiveDateTime::parse_from_str(&format!("{}{}", pair[0], pair[1]), "%Y%m%d%H%M").ok()
        })
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
}

/// Whether a backup file name carries a note after its timestamp.
fn has_backup_note(name: &str) -> bool {
    let Some(stem) = name.strip_suffix(&format!(".{}", BOOKS_EXTENSION)) else {
        return false;
    };
    let segments = stem.split('_').collect::<Vec<_>>();
    segments
        .windows(2)
        .rposition(|pair| is_digits(pair[0], 8) && is_digits(pair[1], 4))
        .is_some_and(|start| start + 2 < segments.len())
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.chars().all(|c| c.is_ascii_digit())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.sync_all()?;
    Ok(())
}

fn serialize_books(books: &Books) -> Result<String, CoreError> {
    serde_json::to_string_pretty(books).map_err(|err| CoreError::Serde(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_name_slugs_and_falls_back() {
        assert_eq!(canonical_name("My Studio 2025"), "my_studio_2025");
        assert_eq!(canonical_name("  ***  "), "books");
    }

    #[test]
    fn backup_note_is_sanitized() {
        assert_eq!(
            sanitize_backup_note(Some(" Before Import! v2.1 ")),
            Some("before-import-v2-1".into())
        );
        assert_eq!(sanitize_backup_note(Some("   ")), None);
        assert_eq!(sanitize_backup_note(None), None);
    }

    #[test]
    fn backup_timestamp_parses_with_and_without_note() {
        let plain = parse_backup_timestamp("studio_20250314_0930.json").expect("plain");
        assert_eq!(plain.format("%Y-%m-%d %H:%M").to_string(), "2025-03-14 09:30");
        let noted =
            parse_backup_timestamp("my_studio_20250314_0930_before-import.json").expect("noted");
        assert_eq!(noted, plain);
        assert!(parse_backup_timestamp("studio.json").is_none());
    }

    #[test]
    fn notes_are_detected_after_the_timestamp() {
        assert!(has_backup_note("my_studio_20250314_0930_before-import.json"));
        assert!(!has_backup_note("my_studio_20250314_0930.json"));
        assert!(!has_backup_note("studio.json"));
    }

    #[test]
    fn tmp_path_appends_suffix() {
        let tmp = tmp_path(Path::new("/data/studio.json"));
        assert_eq!(tmp, PathBuf::from("/data/studio.json.tmp"));
    }
}
