use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Application ID (reverse domain notation)
pub const APP_ID: &str = "dev.myyc.floatball";

/// Application name
pub const APP_NAME: &str = "floatball";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Configuration filename inside the config directory
pub const CONFIG_FILE: &str = "config.toml";

/// Placeholder replaced with the encoded query in engine URL templates
pub const QUERY_PLACEHOLDER: &str = "{query}";

/// Favicon service used for engine icons: domain, then size in pixels
pub const FAVICON_SERVICE_URL: &str = "https://www.google.com/s2/favicons?domain={domain}&sz={size}";

/// Host used for favicons when an engine URL has no parseable host
pub const FALLBACK_FAVICON_DOMAIN: &str = "google.com";

// ============================================================================
// Settings
// ============================================================================

/// Default settings namespace (one persisted blob per namespace)
pub const DEFAULT_NAMESPACE: &str = "settings";

/// SQLite database filename for the sqlite storage backend
pub const SETTINGS_DB: &str = "settings.db";

pub const KEY_AUTO_START: &str = "auto_start";
pub const KEY_AUTO_HIDE: &str = "auto_hide";
pub const KEY_ONBOARDING_COMPLETE: &str = "onboarding_complete";
pub const KEY_THEME_MODE: &str = "theme_mode";
pub const KEY_SEARCH_ENGINES: &str = "search_engines";
pub const KEY_SAVED_SEARCH_ENGINES: &str = "saved_search_engines";

/// Suffix appended to an engine key to form its API key setting
pub const API_KEY_SUFFIX: &str = "_api_key";

/// Engine order used when nothing valid is stored: (name, url)
pub const DEFAULT_ENGINE_ORDER: &[(&str, &str)] = &[
    ("Kimi", "https://kimi.moonshot.cn"),
    ("DeepSeek", "https://chat.deepseek.com"),
    ("豆包", "https://www.doubao.com"),
];

// ============================================================================
// Application configuration file
// ============================================================================

/// Error type for configuration file operations
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Serialize(toml::ser::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Config parse error: {}", e),
            ConfigError::Serialize(e) => write!(f, "Config serialize error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(e: toml::ser::Error) -> Self {
        ConfigError::Serialize(e)
    }
}

/// Which persistence service backs the settings store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Json,
    Sqlite,
    Memory,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub storage: StorageConfig,
    pub content_filter: ContentFilterConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub log_level: String,
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub namespace: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentFilterConfig {
    pub enabled: bool,
    pub block: Vec<String>,
    pub allow: Vec<String>,
    pub filter_lists: Vec<PathBuf>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            data_dir: None,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Json,
            namespace: DEFAULT_NAMESPACE.to_string(),
        }
    }
}

impl Default for ContentFilterConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            block: Vec::new(),
            allow: Vec::new(),
            filter_lists: Vec::new(),
        }
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("dev", "myyc", APP_NAME)
}

impl AppConfig {
    /// Default config file path (XDG config dir on Linux)
    pub fn config_path() -> PathBuf {
        project_dirs()
            .map(|dirs| dirs.config_dir().to_path_buf())
            .unwrap_or_else(|| std::env::temp_dir().join(APP_NAME))
            .join(CONFIG_FILE)
    }

    /// Load the config from the default path, falling back to defaults
    pub fn load() -> Self {
        Self::load_or_default(&Self::config_path())
    }

    /// Load the config at `path`. A missing or unreadable file yields defaults.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            log::debug!("No config at {:?}, using defaults", path);
            return Self::default();
        }

        match Self::load_from(path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Failed to load config {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Strictly load and parse the config at `path`
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let mut config: AppConfig = toml::from_str(&content)?;
        config.validate();
        Ok(config)
    }

    /// Save config to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        log::debug!("Config saved to {:?}", path);
        Ok(())
    }

    /// Directory holding persisted settings
    pub fn data_dir(&self) -> PathBuf {
        if let Some(dir) = &self.general.data_dir {
            return dir.clone();
        }
        project_dirs()
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| std::env::temp_dir().join(APP_NAME))
    }

    fn validate(&mut self) {
        if self.general.log_level.trim().is_empty() {
            self.general.log_level = GeneralConfig::default().log_level;
        }
        if self.storage.namespace.trim().is_empty() {
            self.storage.namespace = DEFAULT_NAMESPACE.to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = AppConfig::load_or_default(&dir.path().join("nope.toml"));

        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.storage.backend, StorageBackend::Json);
        assert_eq!(config.storage.namespace, DEFAULT_NAMESPACE);
        assert!(config.content_filter.enabled);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(
            &path,
            "[storage]\nbackend = \"sqlite\"\nnamespace = \"\"\n\n[content_filter]\nblock = [\"ads.example\"]\n",
        )
        .unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.storage.backend, StorageBackend::Sqlite);
        assert_eq!(config.storage.namespace, DEFAULT_NAMESPACE);
        assert_eq!(config.content_filter.block, vec!["ads.example"]);
        assert!(config.content_filter.enabled);
        assert_eq!(config.general.log_level, "info");
    }

    #[test]
    fn test_invalid_file_falls_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[storage\nbackend = ").unwrap();

        assert!(AppConfig::load_from(&path).is_err());
        let config = AppConfig::load_or_default(&path);
        assert_eq!(config.storage.backend, StorageBackend::Json);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE);

        let mut config = AppConfig::default();
        config.general.data_dir = Some(dir.path().join("data"));
        config.storage.backend = StorageBackend::Memory;
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded.storage.backend, StorageBackend::Memory);
        assert_eq!(loaded.data_dir(), dir.path().join("data"));
    }
}
