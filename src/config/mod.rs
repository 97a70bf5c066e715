use std::path::PathBuf;

pub use snapbooks_config::{Config, ConfigError, ConfigManager, Theme};

/// Config manager rooted at `base`, laid out as `<base>/config/config.json`.
pub fn manager_with_base(base: PathBuf) -> Result<ConfigManager, ConfigError> {
    ConfigManager::with_base_dir(base)
}
