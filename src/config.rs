//! Configuration management for rolodex.
//!
//! Settings are layered with figment: built-in defaults, then the TOML file,
//! then `ROLODEX_`-prefixed environment variables. `config set` writes the
//! file back with `toml`.

use std::fs;
use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::codec::ExportFormat;
use crate::error::{RolodexError, RolodexResult};
use crate::hints::HintMode;
use crate::sorts::SortKey;
use crate::view::ViewMode;

const CONFIG_FILE_NAME: &str = "config.toml";

const DATA_DIR_NAME: &str = "rolodex";

const DATABASE_FILE_NAME: &str = "rolodex.db";

/// Application configuration.
///
/// Loaded from (highest precedence first):
/// 1. Environment variables (prefixed with `ROLODEX_`, sections split on
///    `__`, e.g. `ROLODEX_DISPLAY__SORT=callsign`)
/// 2. TOML config file at `~/.config/rolodex/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub storage: StorageConfig,
    pub display: DisplayConfig,
    pub export: ExportConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/rolodex/rolodex.db`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_path: Option<PathBuf>,
    /// Whose collection the cards live in.
    pub owner: String,
}

/// How the card list is shown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub view: ViewMode,
    pub sort: SortKey,
    pub hint: HintMode,
    /// Look up each shown card's DMR id on radioid.net.
    pub dmr_lookup: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub format: ExportFormat,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            owner: "local".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> RolodexResult<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, parsing or validation fails.
    pub fn load_from(config_path: Option<PathBuf>) -> RolodexResult<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("ROLODEX_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        debug!(path = %config_file.display(), "configuration loaded");
        Ok(config)
    }

    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// # Errors
    ///
    /// Returns an error if the owner is blank.
    pub fn validate(&self) -> RolodexResult<()> {
        if self.storage.owner.trim().is_empty() {
            return Err(RolodexError::ConfigValidation {
                message: "storage.owner cannot be blank".to_string(),
            });
        }
        if self.storage.owner.contains('/') {
            return Err(RolodexError::ConfigValidation {
                message: format!("storage.owner cannot contain '/': {}", self.storage.owner),
            });
        }
        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// Writes the configuration as TOML, creating parent directories.
    pub fn save(&self, path: &Path) -> RolodexResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        debug!(path = %path.display(), "configuration saved");
        Ok(())
    }

    /// Sets one setting by its dotted key, e.g. `display.sort`.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown key, an unparsable value, or a value
    /// that fails validation.
    pub fn set(&mut self, key: &str, value: &str) -> RolodexResult<()> {
        match key {
            "storage.database_path" => {
                let value = value.trim();
                self.storage.database_path = (!value.is_empty()).then(|| PathBuf::from(value));
            }
            "storage.owner" => self.storage.owner = value.trim().to_string(),
            "display.view" => self.display.view = value.parse()?,
            "display.sort" => self.display.sort = value.parse()?,
            "display.hint" => self.display.hint = value.parse()?,
            "display.dmr_lookup" => {
                self.display.dmr_lookup = value.trim().parse().map_err(|_| RolodexError::ConfigValidation {
                    message: format!("display.dmr_lookup must be true or false, got {}", value),
                })?
            }
            "export.format" => self.export.format = value.parse()?,
            other => {
                return Err(RolodexError::ConfigValidation {
                    message: format!("unknown setting: {}", other),
                })
            }
        }
        self.validate()
    }

    /// Every settable key.
    pub const KEYS: [&'static str; 7] = [
        "storage.database_path",
        "storage.owner",
        "display.view",
        "display.sort",
        "display.hint",
        "display.dmr_lookup",
        "export.format",
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert!(config.storage.database_path.is_none());
        assert_eq!(config.storage.owner, "local");
        assert_eq!(config.display.view, ViewMode::Grid);
        assert_eq!(config.display.sort, SortKey::Starred);
        assert_eq!(config.display.hint, HintMode::Morse);
        assert_eq!(config.export.format, ExportFormat::Vcf);
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_blank_owner() {
        let mut config = Config::default();
        config.storage.owner = "  ".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("storage.owner"));
    }

    #[test]
    fn test_database_path_default() {
        let config = Config::default();
        assert!(config.database_path().ends_with("rolodex/rolodex.db"));
    }

    #[test]
    fn test_database_path_custom() {
        let mut config = Config::default();
        config.storage.database_path = Some(PathBuf::from("/tmp/cards.db"));
        assert_eq!(config.database_path(), PathBuf::from("/tmp/cards.db"));
    }

    #[test]
    fn test_load_from_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(Some(dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config.display, DisplayConfig::default());
    }

    #[test]
    fn test_load_from_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[display]\nview = \"column\"\nsort = \"frequency\"\nhint = \"nato\"\n\n[export]\nformat = \"json\"\n",
        )
        .unwrap();

        let config = Config::load_from(Some(path)).unwrap();
        assert_eq!(config.display.view, ViewMode::Column);
        assert_eq!(config.display.sort, SortKey::Frequency);
        assert_eq!(config.display.hint, HintMode::Nato);
        assert_eq!(config.export.format, ExportFormat::Json);
    }

    #[test]
    fn test_load_from_toml_accepts_legacy_sort_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        fs::write(&path, "[display]\nsort = 1\n").unwrap();
        assert_eq!(Config::load_from(Some(path.clone())).unwrap().display.sort, SortKey::LastName);

        fs::write(&path, "[display]\nsort = \"Frequency\"\n").unwrap();
        assert_eq!(Config::load_from(Some(path.clone())).unwrap().display.sort, SortKey::Frequency);

        fs::write(&path, "[display]\nsort = 99\n").unwrap();
        assert!(Config::load_from(Some(path)).is_err());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = Config::default();
        config.set("display.sort", "Last Name").unwrap();
        config.set("storage.owner", "w1aw").unwrap();
        config.save(&path).unwrap();

        let loaded = Config::load_from(Some(path)).unwrap();
        assert_eq!(loaded.display.sort, SortKey::LastName);
        assert_eq!(loaded.storage.owner, "w1aw");
    }

    #[test]
    fn test_set_rejects_unknown_key_and_bad_value() {
        let mut config = Config::default();
        assert!(config.set("display.colour", "red").is_err());
        assert!(config.set("display.view", "carousel").is_err());
        assert!(config.set("storage.owner", "").is_err());
    }

    #[test]
    fn test_set_dmr_lookup() {
        let mut config = Config::default();
        assert!(!config.display.dmr_lookup);
        config.set("display.dmr_lookup", "true").unwrap();
        assert!(config.display.dmr_lookup);
        assert!(config.set("display.dmr_lookup", "sometimes").is_err());
    }

    #[test]
    fn test_set_clears_database_path() {
        let mut config = Config::default();
        config.set("storage.database_path", "/tmp/a.db").unwrap();
        assert_eq!(config.storage.database_path, Some(PathBuf::from("/tmp/a.db")));
        config.set("storage.database_path", "").unwrap();
        assert!(config.storage.database_path.is_none());
    }
}
