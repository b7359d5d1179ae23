//! Persistent key-value store for client preferences.
//!
//! The on-disk form is a flat JSON object. Keys this client does not know about are carried
//! through untouched on every write.

use crate::error::{PreferenceError, PreferenceResult};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub trait PreferenceStore {
    /// The string stored under `key`, if any. Non-string values read as absent.
    fn get(&self, key: &str) -> PreferenceResult<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> PreferenceResult<()>;
}

/// Preferences kept in a JSON file. A missing file reads as empty.
#[derive(Clone, Debug)]
pub struct JsonFilePreferences {
    path: PathBuf,
}

impl JsonFilePreferences {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> PreferenceResult<Map<String, Value>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Map::new()),
            Err(source) => {
                return Err(PreferenceError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        if contents.trim().is_empty() {
            return Ok(Map::new());
        }

        serde_json::from_str(&contents).map_err(|source| PreferenceError::Parse {
            path: self.path.clone(),
            source,
        })
    }
}

impl PreferenceStore for JsonFilePreferences {
    fn get(&self, key: &str) -> PreferenceResult<Option<String>> {
        Ok(self
            .load()?
            .get(key)
            .and_then(Value::as_str)
            .map(str::to_owned))
    }

    fn set(&mut self, key: &str, value: &str) -> PreferenceResult<()> {
        let mut map = self.load()?;
        map.insert(key.to_owned(), Value::String(value.to_owned()));

        let json = serde_json::to_string_pretty(&map).map_err(PreferenceError::Serialization)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| PreferenceError::Write {
                path: self.path.clone(),
                source,
            })?;
        }

        fs::write(&self.path, json).map_err(|source| PreferenceError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

/// Preferences that live only as long as the process.
#[derive(Clone, Debug, Default)]
pub struct MemoryPreferences {
    values: HashMap<String, String>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get(&self, key: &str) -> PreferenceResult<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> PreferenceResult<()> {
        self.values.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}
