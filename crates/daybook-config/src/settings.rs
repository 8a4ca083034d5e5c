//! Durable key/value store for small preference values.
//!
//! Backs the settings mutated at runtime (default calendar, model picker
//! preferences) with a single JSON object blob.

use crate::ConfigError;
use log::debug;
use parking_lot::Mutex;
use serde_json::{Map, Value};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Settings key holding the user's default calendar name.
pub const KEY_DEFAULT_CALENDAR: &str = "default_calendar";
/// Settings key holding the default model display name.
pub const KEY_DEFAULT_MODEL: &str = "default_model";
/// Settings key holding the hidden model display names, comma separated.
pub const KEY_HIDDEN_MODELS: &str = "hidden_models";

/// Key-addressed preference storage.
pub trait SettingsStore: Send + Sync {
    /// Read a settings value by key.
    fn get(&self, key: &str) -> Result<Option<String>, ConfigError>;
    /// Write a settings value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> Result<(), ConfigError>;
    /// Remove a settings value; returns whether it existed.
    fn remove(&self, key: &str) -> Result<bool, ConfigError>;
}

/// File-backed settings store holding one JSON object blob.
pub struct FileSettingsStore {
    path: PathBuf,
    /// Serialize read-modify-write cycles on the blob.
    write_lock: Mutex<()>,
}

impl FileSettingsStore {
    /// Create a store backed by the given blob path.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    /// Load the full settings object from disk.
    fn load(&self) -> Result<Map<String, Value>, ConfigError> {
        if !self.path.exists() {
            return Ok(Map::new());
        }
        let contents = fs::read_to_string(&self.path)?;
        if contents.trim().is_empty() {
            return Ok(Map::new());
        }
        let value: Value = serde_json::from_str(&contents)?;
        match value {
            Value::Object(map) => Ok(map),
            _ => Err(ConfigError::Invalid(
                "settings blob is not a JSON object".to_string(),
            )),
        }
    }

    /// Rewrite the settings blob atomically.
    fn write(&self, map: &Map<String, Value>) -> Result<(), ConfigError> {
        let temp_path = self.path.with_extension("json.tmp");
        {
            let mut file = OpenOptions::new()
                .create(true)
                .truncate(true)
                .write(true)
                .open(&temp_path)?;
            let body = serde_json::to_string_pretty(&Value::Object(map.clone()))?;
            file.write_all(body.as_bytes())?;
        }
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        fs::rename(temp_path, &self.path)?;
        Ok(())
    }
}

impl SettingsStore for FileSettingsStore {
    fn get(&self, key: &str) -> Result<Option<String>, ConfigError> {
        let _guard = self.write_lock.lock();
        let map = self.load()?;
        Ok(map
            .get(key)
            .and_then(Value::as_str)
            .map(|value| value.to_string()))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ConfigError> {
        let _guard = self.write_lock.lock();
        let mut map = self.load()?;
        debug!("setting preference (key={})", key);
        map.insert(key.to_string(), Value::String(value.to_string()));
        self.write(&map)
    }

    fn remove(&self, key: &str) -> Result<bool, ConfigError> {
        let _guard = self.write_lock.lock();
        let mut map = self.load()?;
        let existed = map.remove(key).is_some();
        if existed {
            debug!("removing preference (key={})", key);
            self.write(&map)?;
        }
        Ok(existed)
    }
}
