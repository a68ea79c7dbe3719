use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// Rejected caller input. Never retried, the UI is expected to re-prompt.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Drinker name must not be empty")]
    EmptyName,
    #[error("{field} must be a positive number, got {value}")]
    NotPositive { field: &'static str, value: f64 },
    #[error("Age must be a positive number of years")]
    ZeroAge,
    #[error("Intake amount must be positive, got {0}")]
    NonPositiveAmount(f64),
}

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("I/O error on key {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Unable to encode value for key {key}: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),
    #[error("No data directory could be resolved for this platform")]
    NoDataDir,
    #[error("Storage backend error: {0}")]
    Backend(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unable to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Unable to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("serving_size_oz must be positive, got {0}")]
    ServingSize(f64),
    #[error("Unable to create log directory {path}: {source}")]
    LogDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
