use super::backend::{lock, PreferenceBackend};
use super::SettingsError;
use crate::config;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;
use std::path::Path;
use std::sync::Mutex;

/// SQLite-backed preferences, values stored as JSON text
pub struct SqliteBackend {
    conn: Mutex<Connection>,
    namespace: String,
}

impl std::fmt::Debug for SqliteBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteBackend")
            .field("namespace", &self.namespace)
            .finish_non_exhaustive()
    }
}

impl SqliteBackend {
    /// Create or open the settings database in `dir`
    pub fn open(dir: &Path, namespace: &str) -> Result<Self, SettingsError> {
        std::fs::create_dir_all(dir)?;
        let db_path = dir.join(config::SETTINGS_DB);
        let conn = Connection::open(&db_path)?;
        let backend = Self::with_connection(conn, namespace)?;
        log::info!("Settings database opened at {:?} (namespace '{}')", db_path, namespace);
        Ok(backend)
    }

    /// Settings database that lives only as long as this backend
    pub fn open_in_memory(namespace: &str) -> Result<Self, SettingsError> {
        Self::with_connection(Connection::open_in_memory()?, namespace)
    }

    fn with_connection(conn: Connection, namespace: &str) -> Result<Self, SettingsError> {
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS preferences (
                namespace TEXT NOT NULL,
                key TEXT NOT NULL,
                value TEXT NOT NULL,
                PRIMARY KEY (namespace, key)
            );
            ",
        )?;

        Ok(Self {
            conn: Mutex::new(conn),
            namespace: namespace.to_string(),
        })
    }

    fn read(&self, key: &str) -> Result<Option<Value>, SettingsError> {
        let conn = lock(&self.conn);
        let raw: Option<String> = conn
            .query_row(
                "SELECT value FROM preferences WHERE namespace = ?1 AND key = ?2",
                params![self.namespace, key],
                |row| row.get(0),
            )
            .optional()?;

        match raw {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }

    fn write(&self, key: &str, value: &Value) -> Result<(), SettingsError> {
        let text = serde_json::to_string(value)?;
        lock(&self.conn).execute(
            "INSERT INTO preferences (namespace, key, value) VALUES (?1, ?2, ?3)
             ON CONFLICT(namespace, key) DO UPDATE SET value = excluded.value",
            params![self.namespace, key, text],
        )?;
        log::debug!("Stored preference '{}' in namespace '{}'", key, self.namespace);
        Ok(())
    }
}

impl PreferenceBackend for SqliteBackend {
    fn get_string(&self, key: &str) -> Result<Option<String>, SettingsError> {
        match self.read(key)? {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(_) => Err(SettingsError::TypeMismatch {
                key: key.to_string(),
                expected: "string",
            }),
        }
    }

    fn set_string(&self, key: &str, value: &str) -> Result<(), SettingsError> {
        self.write(key, &Value::String(value.to_string()))
    }

    fn get_bool(&self, key: &str) -> Result<Option<bool>, SettingsError> {
        match self.read(key)? {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(b)),
            Some(_) => Err(SettingsError::TypeMismatch {
                key: key.to_string(),
                expected: "bool",
            }),
        }
    }

    fn set_bool(&self, key: &str, value: bool) -> Result<(), SettingsError> {
        self.write(key, &Value::Bool(value))
    }

    fn remove(&self, key: &str) -> Result<(), SettingsError> {
        lock(&self.conn).execute(
            "DELETE FROM preferences WHERE namespace = ?1 AND key = ?2",
            params![self.namespace, key],
        )?;
        Ok(())
    }

    fn contains(&self, key: &str) -> Result<bool, SettingsError> {
        let count: i64 = lock(&self.conn).query_row(
            "SELECT COUNT(*) FROM preferences WHERE namespace = ?1 AND key = ?2",
            params![self.namespace, key],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempdir().unwrap();
        {
            let backend = SqliteBackend::open(dir.path(), "settings").unwrap();
            backend.set_bool("auto_hide", true).unwrap();
            backend.set_string("search_engines", "[]").unwrap();
        }

        let backend = SqliteBackend::open(dir.path(), "settings").unwrap();
        assert_eq!(backend.get_bool("auto_hide").unwrap(), Some(true));
        assert_eq!(backend.get_string("search_engines").unwrap(), Some("[]".to_string()));
    }

    #[test]
    fn test_overwrite_and_remove() {
        let backend = SqliteBackend::open_in_memory("settings").unwrap();
        backend.set_bool("auto_start", true).unwrap();
        backend.set_bool("auto_start", false).unwrap();
        assert_eq!(backend.get_bool("auto_start").unwrap(), Some(false));

        backend.remove("auto_start").unwrap();
        assert!(!backend.contains("auto_start").unwrap());
        assert_eq!(backend.get_bool("auto_start").unwrap(), None);
    }

    #[test]
    fn test_namespaces_share_a_file() {
        let dir = tempdir().unwrap();
        let a = SqliteBackend::open(dir.path(), "a").unwrap();
        let b = SqliteBackend::open(dir.path(), "b").unwrap();

        a.set_string("theme_mode", "dark").unwrap();
        assert_eq!(a.get_string("theme_mode").unwrap(), Some("dark".to_string()));
        assert_eq!(b.get_string("theme_mode").unwrap(), None);
    }

    #[test]
    fn test_type_mismatch() {
        let backend = SqliteBackend::open_in_memory("settings").unwrap();
        backend.set_bool("theme_mode", true).unwrap();
        assert!(matches!(
            backend.get_string("theme_mode"),
            Err(SettingsError::TypeMismatch { .. })
        ));
    }
}
