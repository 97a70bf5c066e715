use std::{
    fs::{self, File},
    io::{self, Write},
    path::{Path, PathBuf},
};

use chrono::{NaiveDateTime, Utc};

use crate::{Config, ConfigError};

const STAMP_FORMAT: &str = "%Y%m%d_%H%M";
const BACKUP_PREFIX: &str = "config_";
const BACKUP_SUFFIX: &str = ".json";

/// Reads, writes and snapshots the shell [`Config`] on disk.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_path: PathBuf,
    backups_dir: PathBuf,
}

impl ConfigManager {
    pub fn new(config_path: PathBuf, backups_dir: PathBuf) -> Self {
        Self {
            config_path,
            backups_dir,
        }
    }

    /// Lays out `<base>/config/config.json` and `<base>/config/backups/`.
    pub fn with_base_dir(base: PathBuf) -> Result<Self, ConfigError> {
        let dir = base.join("config");
        let manager = Self::new(dir.join("config.json"), dir.join("backups"));
        fs::create_dir_all(&manager.backups_dir)?;
        Ok(manager)
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn backups_dir(&self) -> &Path {
        &self.backups_dir
    }

    /// The stored config, or defaults when nothing has been saved yet.
    pub fn load(&self) -> Result<Config, ConfigError> {
        match fs::read_to_string(&self.config_path) {
            Ok(data) => parse(&data),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Config::default()),
            Err(err) => Err(err.into()),
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        write_replacing(&self.config_path, config)
    }

    /// Writes a timestamped copy of `config` and returns the backup's file name.
    pub fn backup(&self, config: &Config, note: Option<&str>) -> Result<String, ConfigError> {
        let stamp = Utc::now().format(STAMP_FORMAT);
        let name = match note.and_then(slug) {
            Some(label) => format!("{BACKUP_PREFIX}{stamp}_{label}{BACKUP_SUFFIX}"),
            None => format!("{BACKUP_PREFIX}{stamp}{BACKUP_SUFFIX}"),
        };
        write_replacing(&self.backups_dir.join(&name), config)?;
        Ok(name)
    }

    /// Makes the named backup the active config.
    pub fn restore(&self, backup_name: &str) -> Result<Config, ConfigError> {
        let data = fs::read_to_string(self.backups_dir.join(backup_name)).map_err(|err| {
            if err.kind() == io::ErrorKind::NotFound {
                ConfigError::Io(io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("configuration backup `{backup_name}` not found"),
                ))
            } else {
                err.into()
            }
        })?;
        let config = parse(&data)?;
        self.save(&config)?;
        Ok(config)
    }

    /// Backup file names, newest first.
    pub fn list_backups(&self) -> Result<Vec<String>, ConfigError> {
        let entries = match fs::read_dir(&self.backups_dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };
        let mut names = Vec::new();
        for entry in entries {
            let name = entry?.file_name().to_string_lossy().into_owned();
            if name.ends_with(BACKUP_SUFFIX) {
                names.push(name);
            }
        }
        names.sort_by(|a, b| backup_stamp(b).cmp(&backup_stamp(a)).then_with(|| b.cmp(a)));
        Ok(names)
    }
}

fn parse(data: &str) -> Result<Config, ConfigError> {
    serde_json::from_str(data).map_err(|err| ConfigError::Serde(err.to_string()))
}

/// Writes pretty JSON beside `path`, then renames it into place.
fn write_replacing(path: &Path, config: &Config) -> Result<(), ConfigError> {
    let json =
        serde_json::to_string_pretty(config).map_err(|err| ConfigError::Serde(err.to_string()))?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let staging = path.with_extension("json.tmp");
    let mut file = File::create(&staging)?;
    file.write_all(json.as_bytes())?;
    file.sync_all()?;
    fs::rename(&staging, path)?;
    Ok(())
}

/// Lower-case alphanumeric runs joined by single dashes.
fn slug(note: &str) -> Option<String> {
    let words: Vec<String> = note
        .split(|ch: char| !ch.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_ascii_lowercase)
        .collect();
    (!words.is_empty()).then(|| words.join("-"))
}

fn backup_stamp(name: &str) -> Option<NaiveDateTime> {
    let rest = name.strip_prefix(BACKUP_PREFIX)?;
    let stamp = rest.get(..13)?;
    NaiveDateTime::parse_from_str(stamp, STAMP_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stamp_ignores_trailing_note() {
        let plain = backup_stamp("config_20250102_0304.json");
        let noted = backup_stamp("config_20250102_0304_pre-upgrade.json");
        assert!(plain.is_some());
        assert_eq!(plain, noted);
        assert!(backup_stamp("config.json").is_none());
    }

    #[test]
    fn notes_become_dashed_slugs() {
        assert_eq!(slug(" Before Change! v2 ").as_deref(), Some("before-change-v2"));
        assert_eq!(slug("***"), None);
    }
}
