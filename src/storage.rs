use std::{
    collections::HashMap,
    fs,
    io::Write,
    path::{Path, PathBuf},
    sync::LazyLock,
};

use directories::ProjectDirs;
use serde::{de::DeserializeOwned, Serialize};
use tracing::{trace, warn};

use crate::error::PersistenceError;

pub(crate) static PROJECT_DIR: LazyLock<Option<ProjectDirs>> =
    LazyLock::new(|| ProjectDirs::from("app", "Splashy Bear", "splashy-bear"));

pub const DEFAULT_KEY_PREFIX: &str = "splashyBear_";

/// String-keyed text storage, the shape of a browser's local storage
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError>;

    fn remove(&mut self, key: &str) -> Result<(), PersistenceError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &mut S {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), PersistenceError> {
        (**self).remove(key)
    }
}

/// The three top-level keys everything is persisted under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    pub drinkers: String,
    pub daily_data: String,
    pub active_drinker: String,
}

impl StorageKeys {
    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            drinkers: format!("{prefix}drinkers"),
            daily_data: format!("{prefix}dailyData"),
            active_drinker: format!("{prefix}activeDrinker"),
        }
    }
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self::with_prefix(DEFAULT_KEY_PREFIX)
    }
}

/// Reads a JSON value, treating missing and malformed data alike as `T::default()`
pub fn load_json<T, S>(store: &S, key: &str) -> Result<T, PersistenceError>
where
    T: DeserializeOwned + Default,
    S: KeyValueStore + ?Sized,
{
    let Some(text) = store.get(key)? else {
        return Ok(T::default());
    };

    match serde_json::from_str(&text) {
        Ok(value) => Ok(value),
        Err(e) => {
            warn!("Discarding corrupt data under {key}: {e}");
            Ok(T::default())
        }
    }
}

pub fn save_json<T, S>(store: &mut S, key: &str, value: &T) -> Result<(), PersistenceError>
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let text = serde_json::to_string(value).map_err(|source| PersistenceError::Encode {
        key: key.to_string(),
        source,
    })?;
    store.set(key, &text)
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore(HashMap<String, String>);

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.0.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        self.0.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), PersistenceError> {
        self.0.remove(key);
        Ok(())
    }
}

/// Keeps each key as its own file inside a data directory
#[derive(Debug, Clone)]
pub struct FileStore {
    data_dir: PathBuf,
}

impl FileStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Result<Self, PersistenceError> {
        let data_dir = data_dir.into();
        trace!("Data path: {:?}", data_dir);

        fs::create_dir_all(&data_dir).map_err(|source| PersistenceError::Io {
            key: data_dir.display().to_string(),
            source,
        })?;

        Ok(Self { data_dir })
    }

    /// Opens the store in the platform's data directory for this app
    pub fn open_default() -> Result<Self, PersistenceError> {
        let project_dir = PROJECT_DIR.as_ref().ok_or(PersistenceError::NoDataDir)?;
        Self::new(project_dir.data_dir())
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, PersistenceError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
            && !key.starts_with('.');
        if !valid {
            return Err(PersistenceError::InvalidKey(key.to_string()));
        }

        Ok(self.data_dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        let path = self.path_for(key)?;

        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(PersistenceError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        let path = self.path_for(key)?;
        let io_err = |source| PersistenceError::Io {
            key: key.to_string(),
            source,
        };

        // Write to a sibling temp file first so a crash never leaves half a value
        let temp = path.with_extension("tmp");
        let written = fs::File::create(&temp)
            .and_then(|mut file| {
                file.write_all(value.as_bytes())?;
                file.sync_all()
            })
            .and_then(|()| fs::rename(&temp, &path));
        if let Err(source) = written {
            fs::remove_file(&temp).ok();
            return Err(io_err(source));
        }

        trace!("Wrote {} bytes to {:?}", value.len(), path);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), PersistenceError> {
        let path = self.path_for(key)?;

        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(PersistenceError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }
}
