//! Session configuration and environment loading.
use std::env;
use std::path::PathBuf;

use class_content::{ConfigLoader, WeaponCatalog};
use class_core::ProgressionConfig;

use crate::error::{Result, RuntimeError};

/// Configuration required to open a [`crate::Session`].
#[derive(Clone, Debug, Default)]
pub struct RuntimeConfig {
    /// TOML balance file; the shipped balance is used when absent.
    pub config_path: Option<PathBuf>,
    /// RON item-name overrides; the shipped overrides are used when absent.
    pub weapon_catalog_path: Option<PathBuf>,
    pub enable_persistence: bool,
    pub save_data_dir: Option<PathBuf>,
}

impl RuntimeConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `CLASS_CONFIG_PATH` - Balance TOML file (default: shipped balance)
    /// - `WEAPON_CATALOG_PATH` - Item-name overrides RON file (default: shipped overrides)
    /// - `ENABLE_PERSISTENCE` - Save character blobs to disk (default: false)
    /// - `SAVE_DATA_DIR` - Directory for character blobs (default: platform-specific)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        config.config_path = env::var("CLASS_CONFIG_PATH").ok().map(PathBuf::from);
        config.weapon_catalog_path = env::var("WEAPON_CATALOG_PATH").ok().map(PathBuf::from);

        if let Some(enable) = read_env::<bool>("ENABLE_PERSISTENCE") {
            config.enable_persistence = enable;
        } else if env::var("ENABLE_PERSISTENCE").is_ok() {
            // Also accept just setting the variable without value as "true"
            config.enable_persistence = true;
        }

        config.save_data_dir = env::var("SAVE_DATA_DIR").ok().map(PathBuf::from);

        config
    }

    /// Directory holding character blobs.
    ///
    /// Follows platform conventions when `save_data_dir` is unset:
    /// - Linux: `~/.local/share/classes/characters`
    /// - macOS: `~/Library/Application Support/classes/characters`
    /// - Windows: `%APPDATA%\classes\characters`
    /// - Fallback: `./save_data/characters`
    pub fn resolve_save_dir(&self) -> PathBuf {
        match &self.save_data_dir {
            Some(dir) => dir.clone(),
            None => directories::ProjectDirs::from("", "", "classes")
                .map(|dirs| dirs.data_dir().to_path_buf())
                .unwrap_or_else(|| PathBuf::from("./save_data"))
                .join("characters"),
        }
    }

    /// Balance from `config_path`, or the shipped balance.
    pub fn load_progression(&self) -> Result<ProgressionConfig> {
        let loaded = match &self.config_path {
            Some(path) => ConfigLoader::load(path),
            None => ConfigLoader::shipped(),
        };
        loaded.map_err(|e| RuntimeError::Content(format!("{e:#}")))
    }

    /// Item-name overrides from `weapon_catalog_path`, or the shipped ones.
    pub fn load_weapon_catalog(&self) -> Result<WeaponCatalog> {
        let loaded = match &self.weapon_catalog_path {
            Some(path) => WeaponCatalog::load(path),
            None => WeaponCatalog::shipped(),
        };
        loaded.map_err(|e| RuntimeError::Content(format!("{e:#}")))
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
