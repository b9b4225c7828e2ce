//! Settings for where the profile lives and how the screen words things.
//!
//! Values are layered with figment: built-in defaults, then the TOML file,
//! then `ATITHI_` environment variables.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::store::DEFAULT_PROFILE_KEY;

const CONFIG_FILE_NAME: &str = "config.toml";

/// Directory under the platform config and data dirs.
const DATA_DIR_NAME: &str = "atithi";

const DATABASE_FILE_NAME: &str = "profile.db";

/// Top-level settings.
///
/// Later sources override earlier ones; highest precedence first:
/// 1. Environment variables (prefixed with `ATITHI_`, sections split on `__`)
/// 2. TOML config file at `~/.config/atithi/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where and how the profile is persisted.
    pub storage: StorageConfig,
    /// Profile screen configuration.
    pub profile: ProfileConfig,
}

/// The `[storage]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// `SQLite` file holding the profile; `None` means
    /// `<data dir>/atithi/profile.db`.
    pub database_path: Option<PathBuf>,
    /// Key the profile record is stored under.
    pub profile_key: String,
    /// Skip writing a record whose bytes match what is already stored.
    pub skip_unchanged_writes: bool,
}

/// The `[profile]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    /// Separator between labels in the missing-fields message.
    pub missing_separator: String,
    /// Text shown for a field with no value.
    pub unset_placeholder: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            profile_key: DEFAULT_PROFILE_KEY.to_string(),
            skip_unchanged_writes: true,
        }
    }
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            missing_separator: ", ".to_string(),
            unset_placeholder: "Not set".to_string(),
        }
    }
}

impl Config {
    /// Load settings using the default config file location.
    ///
    /// # Errors
    ///
    /// See [`Config::load_from`].
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load settings, reading `path` instead of the default file if given.
    ///
    /// A missing file is not an error; the other layers still apply.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigLoad`] if a layer cannot be parsed, or
    /// [`Error::ConfigValidation`] if the merged values are unusable.
    pub fn load_from(path: Option<PathBuf>) -> Result<Self> {
        let file = path.unwrap_or_else(Self::default_config_path);

        let loaded: Self = Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(&file))
            .merge(Env::prefixed("ATITHI_").split("__"))
            .extract()?;
        loaded.validate()?;
        Ok(loaded)
    }

    /// `<config dir>/atithi/config.toml`.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// `<local data dir>/atithi`.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DATA_DIR_NAME)
    }

    /// Reject settings the profile screen cannot work with.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigValidation`] naming the offending key.
    pub fn validate(&self) -> Result<()> {
        if self.storage.profile_key.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "storage.profile_key must not be empty".to_string(),
            });
        }

        if self.profile.missing_separator.is_empty() {
            return Err(Error::ConfigValidation {
                message: "profile.missing_separator must not be empty".to_string(),
            });
        }

        Ok(())
    }

    /// The database file to open.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }
}
