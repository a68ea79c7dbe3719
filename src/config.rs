use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    clock::DayBoundary,
    error::ConfigError,
    storage::{StorageKeys, DEFAULT_KEY_PREFIX, PROJECT_DIR},
};

/// Overrides the location of the config file
pub const CONFIG_PATH_ENV: &str = "SPLASHY_BEAR_CONFIG";

const CONFIG_FILE_NAME: &str = "splashy-bear.toml";

/// Size of one drink, a standard water bottle
pub const DEFAULT_SERVING_SIZE_OZ: f64 = 16.9;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Ounces added by a single drink
    pub serving_size_oz: f64,

    /// Prefix of the three storage keys
    pub key_prefix: String,

    /// Where the file store keeps its data. Defaults to the platform data dir.
    pub data_dir: Option<PathBuf>,

    pub day_boundary: DayBoundary,

    /// When set, logs are also written to a daily rolling file in this directory
    pub log_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            serving_size_oz: DEFAULT_SERVING_SIZE_OZ,
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            data_dir: None,
            day_boundary: DayBoundary::default(),
            log_dir: None,
        }
    }
}

impl Config {
    /// Loads the config from `$SPLASHY_BEAR_CONFIG`, or from the platform config
    /// dir. A missing file yields the defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .or_else(|| {
                PROJECT_DIR
                    .as_ref()
                    .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
            });

        match path {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => {
                debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Self = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;

        debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.serving_size_oz.is_finite() || self.serving_size_oz <= 0.0 {
            return Err(ConfigError::ServingSize(self.serving_size_oz));
        }

        Ok(())
    }

    pub fn storage_keys(&self) -> StorageKeys {
        StorageKeys::with_prefix(&self.key_prefix)
    }
}
