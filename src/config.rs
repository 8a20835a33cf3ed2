use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub storage: StorageConfig,
    pub keyboard: KeyboardConfig,
    pub scripts: ScriptsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding persisted user data. Supports `~` expansion.
    pub directory: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyboardConfig {
    /// How long transient notifications stay on screen.
    pub notification_duration_ms: u64,
    /// Number of script keys shown on the keyboard's script row.
    pub row_slots: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptsConfig {
    /// Maximum nesting depth for scripts invoking other scripts via `run`.
    pub max_run_depth: usize,
}

#[allow(clippy::derivable_impls)]
impl Default for Config {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            keyboard: KeyboardConfig::default(),
            scripts: ScriptsConfig::default(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            directory: "~/.config/scriptboard".to_string(),
        }
    }
}

impl Default for KeyboardConfig {
    fn default() -> Self {
        Self {
            notification_duration_ms: 2000,
            row_slots: 5,
        }
    }
}

impl Default for ScriptsConfig {
    fn default() -> Self {
        Self { max_run_depth: 4 }
    }
}

impl Config {
    /// Path of the config file under the platform config dir.
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("scriptboard").join("config.toml"))
    }

    /// Load the config from the default location, falling back to defaults
    /// when the file is absent or malformed.
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("failed to load config, using defaults: {e}");
                Self::default()
            }
        }
    }

    /// Load the config from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Resolved storage directory, with `~` expanded.
    pub fn storage_dir(&self) -> PathBuf {
        let expanded = shellexpand::tilde(&self.storage.directory);
        PathBuf::from(expanded.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.keyboard.row_slots, 5);
        assert_eq!(config.keyboard.notification_duration_ms, 2000);
        assert_eq!(config.scripts.max_run_depth, 4);
        assert_eq!(config.storage.directory, "~/.config/scriptboard");
    }

    #[test]
    fn test_partial_config() {
        let config: Config = toml::from_str(
            r#"
[keyboard]
row_slots = 3

[scripts]
max_run_depth = 2
"#,
        )
        .unwrap();

        assert_eq!(config.keyboard.row_slots, 3);
        assert_eq!(config.scripts.max_run_depth, 2);
        // Untouched sections keep their defaults
        assert_eq!(config.keyboard.notification_duration_ms, 2000);
    }

    #[test]
    fn test_storage_dir_expands_tilde() {
        let config = Config::default();
        let dir = config.storage_dir();
        assert!(!dir.to_string_lossy().starts_with('~'));
    }
}
