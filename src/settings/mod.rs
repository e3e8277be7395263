//! Persistent user preferences and the ordered engine list.

mod backend;
pub mod draft;
pub mod shared;
mod sqlite;

pub use backend::{JsonFileBackend, MemoryBackend, PreferenceBackend};
pub use draft::{DraftError, EngineOrderDraft};
pub use shared::SettingsContext;
pub use sqlite::SqliteBackend;

use crate::config::{self, AppConfig, StorageBackend};
use crate::engine::{self, Engine};
use serde::{Deserialize, Serialize};

/// Error type for settings persistence
#[derive(Debug)]
pub enum SettingsError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Database(rusqlite::Error),
    TypeMismatch { key: String, expected: &'static str },
}

impl std::fmt::Display for SettingsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettingsError::Io(e) => write!(f, "IO error: {}", e),
            SettingsError::Json(e) => write!(f, "JSON error: {}", e),
            SettingsError::Database(e) => write!(f, "Database error: {}", e),
            SettingsError::TypeMismatch { key, expected } => {
                write!(f, "Setting '{}' is not a {}", key, expected)
            }
        }
    }
}

impl std::error::Error for SettingsError {}

impl From<std::io::Error> for SettingsError {
    fn from(e: std::io::Error) -> Self {
        SettingsError::Io(e)
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(e: serde_json::Error) -> Self {
        SettingsError::Json(e)
    }
}

impl From<rusqlite::Error> for SettingsError {
    fn from(e: rusqlite::Error) -> Self {
        SettingsError::Database(e)
    }
}

/// One row of the user's ordered engine list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineOrderEntry {
    pub name: String,
    pub url: String,
}

impl EngineOrderEntry {
    pub fn new(name: &str, url: &str) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
        }
    }

    /// Catalog engine with this name, or a custom engine using `url` as template
    pub fn to_engine(&self) -> Engine {
        engine::lookup(&self.name).unwrap_or_else(|| Engine::custom(&self.name, &self.url))
    }
}

/// The hard-coded engine order used when nothing valid is stored
pub fn default_engine_order() -> Vec<EngineOrderEntry> {
    config::DEFAULT_ENGINE_ORDER
        .iter()
        .map(|(name, url)| EngineOrderEntry::new(name, url))
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ThemeMode {
    #[default]
    System,
    Light,
    Dark,
}

impl ThemeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeMode::System => "system",
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }

    /// Unknown values map to `System`
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "light" => ThemeMode::Light,
            "dark" => ThemeMode::Dark,
            _ => ThemeMode::System,
        }
    }
}

/// Typed access to persisted preferences.
///
/// Reads never fail: errors are logged and mapped to defaults. Writes are
/// fire-and-forget; a failing backend is logged and the call returns.
pub struct SettingsStore {
    backend: Box<dyn PreferenceBackend>,
}

impl std::fmt::Debug for SettingsStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsStore").finish_non_exhaustive()
    }
}

impl SettingsStore {
    pub fn new(backend: Box<dyn PreferenceBackend>) -> Self {
        Self { backend }
    }

    /// Store over a fresh in-memory backend
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryBackend::new()))
    }

    /// Open the backend selected by the application config
    pub fn open(app_config: &AppConfig) -> Result<Self, SettingsError> {
        let namespace = &app_config.storage.namespace;
        let backend: Box<dyn PreferenceBackend> = match app_config.storage.backend {
            StorageBackend::Json => {
                Box::new(JsonFileBackend::open(&app_config.data_dir(), namespace)?)
            }
            StorageBackend::Sqlite => Box::new(SqliteBackend::open(&app_config.data_dir(), namespace)?),
            StorageBackend::Memory => Box::new(MemoryBackend::new()),
        };
        Ok(Self::new(backend))
    }

    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.backend.get_bool(key) {
            Ok(value) => value.unwrap_or(default),
            Err(e) => {
                log::warn!("Failed to read '{}', using default: {}", key, e);
                default
            }
        }
    }

    pub fn set_bool(&self, key: &str, value: bool) {
        if let Err(e) = self.backend.set_bool(key, value) {
            log::warn!("Failed to write '{}': {}", key, e);
        }
    }

    pub fn get_string(&self, key: &str, default: &str) -> String {
        match self.backend.get_string(key) {
            Ok(value) => value.unwrap_or_else(|| default.to_string()),
            Err(e) => {
                log::warn!("Failed to read '{}', using default: {}", key, e);
                default.to_string()
            }
        }
    }

    pub fn set_string(&self, key: &str, value: &str) {
        if let Err(e) = self.backend.set_string(key, value) {
            log::warn!("Failed to write '{}': {}", key, e);
        }
    }

    pub fn remove(&self, key: &str) {
        if let Err(e) = self.backend.remove(key) {
            log::warn!("Failed to remove '{}': {}", key, e);
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        match self.backend.contains(key) {
            Ok(found) => found,
            Err(e) => {
                log::warn!("Failed to check '{}': {}", key, e);
                false
            }
        }
    }

    // ------------------------------------------------------------------------
    // Engine order
    // ------------------------------------------------------------------------

    /// The user's engine order; the default three when missing or unreadable
    pub fn engine_order(&self) -> Vec<EngineOrderEntry> {
        let raw = match self.backend.get_string(config::KEY_SEARCH_ENGINES) {
            Ok(Some(raw)) => raw,
            Ok(None) => return default_engine_order(),
            Err(e) => {
                log::warn!("Failed to read engine order: {}", e);
                return default_engine_order();
            }
        };

        match serde_json::from_str::<Vec<EngineOrderEntry>>(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("Stored engine order is malformed, using defaults: {}", e);
                default_engine_order()
            }
        }
    }

    /// Replace the stored engine order in full
    pub fn save_engine_order(&self, entries: &[EngineOrderEntry]) {
        match serde_json::to_string(entries) {
            Ok(json) => {
                self.set_string(config::KEY_SEARCH_ENGINES, &json);
                log::debug!("Saved engine order with {} entries", entries.len());
            }
            Err(e) => log::warn!("Failed to serialize engine order: {}", e),
        }
    }

    /// First engine in the user's order
    pub fn default_engine(&self) -> Engine {
        self.engine_order()
            .first()
            .map(EngineOrderEntry::to_engine)
            .unwrap_or_else(|| default_engine_order()[0].to_engine())
    }

    // ------------------------------------------------------------------------
    // Flags and simple values
    // ------------------------------------------------------------------------

    pub fn is_onboarding_complete(&self) -> bool {
        self.get_bool(config::KEY_ONBOARDING_COMPLETE, false)
    }

    pub fn set_onboarding_complete(&self, complete: bool) {
        self.set_bool(config::KEY_ONBOARDING_COMPLETE, complete);
    }

    pub fn auto_start(&self) -> bool {
        self.get_bool(config::KEY_AUTO_START, false)
    }

    pub fn set_auto_start(&self, enabled: bool) {
        self.set_bool(config::KEY_AUTO_START, enabled);
    }

    pub fn auto_hide(&self) -> bool {
        self.get_bool(config::KEY_AUTO_HIDE, false)
    }

    pub fn set_auto_hide(&self, enabled: bool) {
        self.set_bool(config::KEY_AUTO_HIDE, enabled);
    }

    pub fn theme_mode(&self) -> ThemeMode {
        ThemeMode::parse(&self.get_string(config::KEY_THEME_MODE, ThemeMode::System.as_str()))
    }

    pub fn set_theme_mode(&self, mode: ThemeMode) {
        self.set_string(config::KEY_THEME_MODE, mode.as_str());
    }

    /// API key for an engine, empty when unset
    pub fn api_key(&self, engine_name: &str) -> String {
        self.get_string(&api_key_setting(engine_name), "")
    }

    pub fn set_api_key(&self, engine_name: &str, api_key: &str) {
        let key = api_key_setting(engine_name);
        if api_key.is_empty() {
            self.remove(&key);
        } else {
            self.set_string(&key, api_key);
        }
    }

    // ------------------------------------------------------------------------
    // User-defined engines
    // ------------------------------------------------------------------------

    pub fn saved_search_engines(&self) -> Vec<Engine> {
        let raw = self.get_string(config::KEY_SAVED_SEARCH_ENGINES, "[]");
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            log::warn!("Saved engines are malformed, ignoring: {}", e);
            Vec::new()
        })
    }

    /// Add an engine, replacing any saved engine with the same URL
    pub fn save_search_engine(&self, engine: Engine) {
        let mut engines = self.saved_search_engines();
        match engines
            .iter()
            .position(|saved| saved.url_template == engine.url_template)
        {
            Some(index) => engines[index] = engine,
            None => engines.push(engine),
        }

        match serde_json::to_string(&engines) {
            Ok(json) => self.set_string(config::KEY_SAVED_SEARCH_ENGINES, &json),
            Err(e) => log::warn!("Failed to serialize saved engines: {}", e),
        }
    }

    pub fn clear_search_engines(&self) {
        self.remove(config::KEY_SAVED_SEARCH_ENGINES);
    }
}

/// Setting key holding the API key for `engine_name`
pub fn api_key_setting(engine_name: &str) -> String {
    format!("{}{}", engine::engine_key(engine_name), config::API_KEY_SUFFIX)
}
