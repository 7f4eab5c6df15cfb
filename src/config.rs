//! Configuration management for todo-keeper.
//!
//! This module handles the `.todo-keeper/config.yaml` file, which selects the
//! storage backend and the key the todo list is kept under.

use crate::error::Result;
use crate::paths;
use crate::storage::{MemoryStore, SqliteStore};
use crate::todos::{TodoStore, DEFAULT_STORAGE_KEY};
use crate::traits::KeyValueStore;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file path relative to project root.
pub const CONFIG_FILE_PATH: &str = ".todo-keeper/config.yaml";

/// Which storage backend holds the todo list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Nothing survives the process.
    Memory,
    /// A `SQLite` database file (default).
    #[default]
    Sqlite,
}

impl Backend {
    /// Get the string representation of the backend.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Sqlite => "sqlite",
        }
    }
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

/// Project configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProjectConfig {
    /// Storage backend.
    #[serde(default)]
    pub backend: Backend,

    /// Database file for the `sqlite` backend.
    /// None means `~/.todo-keeper/storage.sqlite3`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_path: Option<PathBuf>,

    /// Key the todo list is stored under.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            database_path: None,
            storage_key: default_storage_key(),
        }
    }
}

impl ProjectConfig {
    /// Load config from a specific base directory, returning None if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load_from(base_dir: &Path) -> Result<Option<Self>> {
        let config_path = Self::config_path(base_dir);
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&config_path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        Ok(Some(config))
    }

    /// Save config to a specific base directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save_to(&self, base_dir: &Path) -> Result<()> {
        let config_path = Self::config_path(base_dir);

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    /// Get the config file path for a base directory.
    #[must_use]
    pub fn config_path(base_dir: &Path) -> PathBuf {
        base_dir.join(CONFIG_FILE_PATH)
    }

    /// Resolve the database path, relative paths being taken from `base_dir`.
    #[must_use]
    pub fn resolved_db_path(&self, base_dir: &Path) -> PathBuf {
        match &self.database_path {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => base_dir.join(path),
            None => paths::default_db_path(base_dir),
        }
    }

    /// Build the configured backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the `SQLite` database cannot be initialized.
    pub fn backend_in(&self, base_dir: &Path) -> Result<Box<dyn KeyValueStore>> {
        Ok(match self.backend {
            Backend::Memory => Box::new(MemoryStore::new()),
            Backend::Sqlite => Box::new(SqliteStore::new(self.resolved_db_path(base_dir))?),
        })
    }

    /// Open a todo store over the configured backend and key.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be created.
    pub fn open_store(&self, base_dir: &Path) -> Result<TodoStore> {
        let backend = self.backend_in(base_dir)?;
        tracing::debug!(
            backend = backend.name(),
            key = %self.storage_key,
            "opening configured store"
        );
        Ok(TodoStore::open(backend, self.storage_key.clone()))
    }
}

/// Ensure config exists in a specific directory, writing defaults if not.
///
/// Returns the config (either loaded or newly created).
///
/// # Errors
///
/// Returns an error if config cannot be loaded or saved.
pub fn ensure_config_in(base_dir: &Path) -> Result<ProjectConfig> {
    if let Some(config) = ProjectConfig::load_from(base_dir)? {
        return Ok(config);
    }

    let config = ProjectConfig::default();
    config.save_to(base_dir)?;
    Ok(config)
}

/// Load config from `base_dir`, falling back to defaults when none exists.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be parsed.
pub fn load_or_default(base_dir: &Path) -> Result<ProjectConfig> {
    Ok(ProjectConfig::load_from(base_dir)?.unwrap_or_default())
}
