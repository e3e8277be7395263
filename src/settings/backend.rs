//! Persistence services behind the settings store.

use super::SettingsError;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// Durable key-value service. Implementations guard their own state so a
/// store can be shared between threads.
pub trait PreferenceBackend: Send + Sync {
    fn get_string(&self, key: &str) -> Result<Option<String>, SettingsError>;
    fn set_string(&self, key: &str, value: &str) -> Result<(), SettingsError>;
    fn get_bool(&self, key: &str) -> Result<Option<bool>, SettingsError>;
    fn set_bool(&self, key: &str, value: bool) -> Result<(), SettingsError>;
    fn remove(&self, key: &str) -> Result<(), SettingsError>;
    fn contains(&self, key: &str) -> Result<bool, SettingsError>;
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn string_value(key: &str, value: Option<&Value>) -> Result<Option<String>, SettingsError> {
    match value {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(SettingsError::TypeMismatch {
            key: key.to_string(),
            expected: "string",
        }),
    }
}

fn bool_value(key: &str, value: Option<&Value>) -> Result<Option<bool>, SettingsError> {
    match value {
        None => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(_) => Err(SettingsError::TypeMismatch {
            key: key.to_string(),
            expected: "bool",
        }),
    }
}

/// Process-local backend; nothing survives the process
#[derive(Debug, Default)]
pub struct MemoryBackend {
    values: Mutex<Map<String, Value>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceBackend for MemoryBackend {
    fn get_string(&self, key: &str) -> Result<Option<String>, SettingsError> {
        string_value(key, lock(&self.values).get(key))
    }

    fn set_string(&self, key: &str, value: &str) -> Result<(), SettingsError> {
        lock(&self.values).insert(key.to_string(), Value::String(value.to_string()));
        Ok(())
    }

    fn get_bool(&self, key: &str) -> Result<Option<bool>, SettingsError> {
        bool_value(key, lock(&self.values).get(key))
    }

    fn set_bool(&self, key: &str, value: bool) -> Result<(), SettingsError> {
        lock(&self.values).insert(key.to_string(), Value::Bool(value));
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SettingsError> {
        lock(&self.values).remove(key);
        Ok(())
    }

    fn contains(&self, key: &str) -> Result<bool, SettingsError> {
        Ok(lock(&self.values).contains_key(key))
    }
}

/// One JSON object file per namespace, rewritten whole on every change
#[derive(Debug)]
pub struct JsonFileBackend {
    path: PathBuf,
    values: Mutex<Map<String, Value>>,
}

impl JsonFileBackend {
    /// Open `<dir>/<namespace>.json`, creating `dir` if needed.
    ///
    /// A file that is not a JSON object opens as empty and is overwritten on
    /// the next write.
    pub fn open(dir: &Path, namespace: &str) -> Result<Self, SettingsError> {
        fs::create_dir_all(dir)?;
        let path = dir.join(format!("{}.json", namespace));

        let values = if path.exists() {
            let contents = fs::read_to_string(&path)?;
            match serde_json::from_str::<Map<String, Value>>(&contents) {
                Ok(map) => map,
                Err(e) => {
                    log::warn!("Settings file {:?} is corrupt, starting empty: {}", path, e);
                    Map::new()
                }
            }
        } else {
            Map::new()
        };

        log::info!("Settings file opened at {:?} ({} keys)", path, values.len());

        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write to a sibling temp file, then rename over the target
    fn persist(&self, values: &Map<String, Value>) -> Result<(), SettingsError> {
        let contents = serde_json::to_string_pretty(values)?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, contents)?;
        fs::rename(&tmp_path, &self.path)?;
        log::debug!("Settings saved to {:?}", self.path);
        Ok(())
    }

    fn update<F>(&self, apply: F) -> Result<(), SettingsError>
    where
        F: FnOnce(&mut Map<String, Value>),
    {
        let mut values = lock(&self.values);
        // Only a saved change becomes visible to readers
        let mut updated = values.clone();
        apply(&mut updated);
        self.persist(&updated)?;
        *values = updated;
        Ok(())
    }
}

impl PreferenceBackend for JsonFileBackend {
    fn get_string(&self, key: &str) -> Result<Option<String>, SettingsError> {
        string_value(key, lock(&self.values).get(key))
    }

    fn set_string(&self, key: &str, value: &str) -> Result<(), SettingsError> {
        self.update(|values| {
            values.insert(key.to_string(), Value::String(value.to_string()));
        })
    }

    fn get_bool(&self, key: &str) -> Result<Option<bool>, SettingsError> {
        bool_value(key, lock(&self.values).get(key))
    }

    fn set_bool(&self, key: &str, value: bool) -> Result<(), SettingsError> {
        self.update(|values| {
            values.insert(key.to_string(), Value::Bool(value));
        })
    }

    fn remove(&self, key: &str) -> Result<(), SettingsError> {
        self.update(|values| {
            values.remove(key);
        })
    }

    fn contains(&self, key: &str) -> Result<bool, SettingsError> {
        Ok(lock(&self.values).contains_key(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_memory_type_mismatch() {
        let backend = MemoryBackend::new();
        backend.set_string("flag", "yes").unwrap();

        assert!(matches!(
            backend.get_bool("flag"),
            Err(SettingsError::TypeMismatch { .. })
        ));
        assert_eq!(backend.get_string("flag").unwrap(), Some("yes".to_string()));
        assert_eq!(backend.get_bool("missing").unwrap(), None);
    }

    #[test]
    fn test_json_file_survives_reopen() {
        let dir = tempdir().unwrap();
        {
            let backend = JsonFileBackend::open(dir.path(), "settings").unwrap();
            backend.set_bool("auto_start", true).unwrap();
            backend.set_string("theme_mode", "dark").unwrap();
            backend.set_string("gone", "soon").unwrap();
            backend.remove("gone").unwrap();
        }

        let backend = JsonFileBackend::open(dir.path(), "settings").unwrap();
        assert_eq!(backend.get_bool("auto_start").unwrap(), Some(true));
        assert_eq!(backend.get_string("theme_mode").unwrap(), Some("dark".to_string()));
        assert!(!backend.contains("gone").unwrap());
        assert!(!dir.path().join("settings.json.tmp").exists());
    }

    #[test]
    fn test_json_namespaces_are_separate() {
        let dir = tempdir().unwrap();
        let a = JsonFileBackend::open(dir.path(), "a").unwrap();
        let b = JsonFileBackend::open(dir.path(), "b").unwrap();

        a.set_bool("auto_hide", true).unwrap();
        assert_eq!(b.get_bool("auto_hide").unwrap(), None);
    }

    #[test]
    fn test_failed_json_write_is_not_visible() {
        let root = tempdir().unwrap();
        let dir = root.path().join("d");
        let backend = JsonFileBackend::open(&dir, "settings").unwrap();
        fs::remove_dir_all(&dir).unwrap();

        assert!(backend.set_bool("auto_start", true).is_err());
        assert_eq!(backend.get_bool("auto_start").unwrap(), None);
        assert!(backend.remove("auto_start").is_err());
        assert!(!backend.contains("auto_start").unwrap());
    }

    #[test]
    fn test_corrupt_json_file_opens_empty() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("settings.json"), "{ not json").unwrap();

        let backend = JsonFileBackend::open(dir.path(), "settings").unwrap();
        assert!(!backend.contains("auto_start").unwrap());

        backend.set_bool("auto_start", true).unwrap();
        let reopened = JsonFileBackend::open(dir.path(), "settings").unwrap();
        assert_eq!(reopened.get_bool("auto_start").unwrap(), Some(true));
    }
}
