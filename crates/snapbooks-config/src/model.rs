use serde::{de::Deserializer, Deserialize, Serialize};
use std::{
    fmt,
    path::{Path, PathBuf},
};

use crate::ConfigError;

/// Stores user-configurable shell preferences and metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub locale: String,
    #[serde(default = "Config::default_currency_symbol")]
    pub currency_symbol: String,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_opened_books: Option<String>,
    #[serde(default = "Config::default_books_name_value")]
    pub default_books_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Optional custom directory for books files. Defaults to `<data dir>/books`.
    pub books_root: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Optional custom directory for backups. Defaults to `<data dir>/backups`.
    pub backup_root: Option<PathBuf>,

    #[serde(default = "Config::default_backup_retention")]
    pub backup_retention: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "en-US".into(),
            currency_symbol: Self::default_currency_symbol(),
            theme: Theme::default(),
            ui_color_enabled: Self::default_ui_color_enabled(),
            last_opened_books: None,
            default_books_name: Self::default_books_name_value(),
            books_root: None,
            backup_root: None,
            backup_retention: Self::default_backup_retention(),
        }
    }
}

impl Config {
    pub const KEYS: [&'static str; 8] = [
        "locale",
        "currency_symbol",
        "theme",
        "ui_color_enabled",
        "default_books_name",
        "books_root",
        "backup_root",
        "backup_retention",
    ];

    pub fn default_currency_symbol() -> String {
        "$".into()
    }

    pub fn default_ui_color_enabled() -> bool {
        true
    }

    pub fn default_books_name_value() -> String {
        "studio".into()
    }

    pub fn default_backup_retention() -> usize {
        5
    }

    /// Directory that holds the books files, relative to the application data dir.
    pub fn resolve_books_root(&self, data_dir: &Path) -> PathBuf {
        self.books_root
            .clone()
            .unwrap_or_else(|| data_dir.join("books"))
    }

    pub fn resolve_backup_root(&self, data_dir: &Path) -> PathBuf {
        self.backup_root
            .clone()
            .unwrap_or_else(|| data_dir.join("backups"))
    }

    /// Fallback data directory when no override is supplied: `~/.snapbooks`.
    pub fn default_data_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".snapbooks")
    }

    /// Reads a setting by key as display text.
    pub fn get(&self, key: &str) -> Result<String, ConfigError> {
        let value = match key {
            "locale" => self.locale.clone(),
            "currency_symbol" => self.currency_symbol.clone(),
            "theme" => self.theme.to_string(),
            "ui_color_enabled" => self.ui_color_enabled.to_string(),
            "last_opened_books" => self.last_opened_books.clone().unwrap_or_default(),
            "default_books_name" => self.default_books_name.clone(),
            "books_root" => display_path(self.books_root.as_deref()),
            "backup_root" => display_path(self.backup_root.as_deref()),
            "backup_retention" => self.backup_retention.to_string(),
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        };
        Ok(value)
    }

    /// Updates a setting from user text. Blank paths reset to the default location.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = || ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        };
        let trimmed = value.trim();
        match key {
            "locale" if !trimmed.is_empty() => self.locale = trimmed.to_string(),
            "currency_symbol" if !trimmed.is_empty() => self.currency_symbol = trimmed.to_string(),
            "theme" => self.theme = Theme::parse(trimmed).ok_or_else(invalid)?,
            "ui_color_enabled" => self.ui_color_enabled = parse_bool(trimmed).ok_or_else(invalid)?,
            "default_books_name" if !trimmed.is_empty() => {
                self.default_books_name = trimmed.to_string()
            }
            "books_root" => self.books_root = optional_path(trimmed),
            "backup_root" => self.backup_root = optional_path(trimmed),
            "backup_retention" => {
                let retention: usize = trimmed.parse().map_err(|_| invalid())?;
                if retention == 0 {
                    return Err(invalid());
                }
                self.backup_retention = retention;
            }
            "locale" | "currency_symbol" | "default_books_name" => return Err(invalid()),
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        }
        Ok(())
    }
}

fn display_path(path: Option<&Path>) -> String {
    path.map(|p| p.display().to_string())
        .unwrap_or_else(|| "(default)".into())
}

fn optional_path(value: &str) -> Option<PathBuf> {
    if value.is_empty() {
        None
    } else {
        Some(PathBuf::from(value))
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Plain,
    #[default]
    Colorful,
}

impl Theme {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "plain" => Some(Theme::Plain),
            "colorful" | "color" => Some(Theme::Colorful),
            _ => None,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Theme::Plain => "plain",
            Theme::Colorful => "colorful",
        };
        f.write_str(label)
    }
}

impl<'de> Deserialize<'de> for Theme {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value
            .as_deref()
            .and_then(Theme::parse)
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_get_round_trip_known_keys() {
        let mut config = Config::default();
        config.set("theme", "plain").unwrap();
        config.set("backup_retention", "9").unwrap();
        config.set("books_root", "/tmp/books").unwrap();
        assert_eq!(config.get("theme").unwrap(), "plain");
        assert_eq!(config.get("backup_retention").unwrap(), "9");
        assert_eq!(config.get("books_root").unwrap(), "/tmp/books");

        config.set("books_root", "").unwrap();
        assert_eq!(config.get("books_root").unwrap(), "(default)");
    }

    #[test]
    fn set_rejects_bad_input() {
        let mut config = Config::default();
        assert!(matches!(
            config.set("colour", "x"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(
            config.set("backup_retention", "0"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            config.set("locale", "  "),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(config.set("ui_color_enabled", "maybe").is_err());
    }

    #[test]
    fn unknown_theme_falls_back_to_default() {
        let config: Config =
            serde_json::from_str(r#"{"locale":"en-US","theme":"neon"}"#).expect("parse");
        assert_eq!(config.theme, Theme::Colorful);
        assert_eq!(config.currency_symbol, "$");
        assert_eq!(config.backup_retention, 5);
    }
}
