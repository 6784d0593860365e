use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::storage::{BackendKind, StoreLocation};

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct TodosConfig {
    pub backend: Option<BackendKind>,
    pub database: Option<String>,
    pub session_file: Option<String>,
}

/// Values given on the command line; each one beats the config file
#[derive(Debug, Clone, Default)]
pub struct LocationOverrides {
    pub backend: Option<BackendKind>,
    pub database: Option<PathBuf>,
    pub session_file: Option<PathBuf>,
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("todos.toml")
}

pub fn default_database_path() -> PathBuf {
    PathBuf::from("todos.db")
}

pub fn default_session_path() -> PathBuf {
    PathBuf::from(".todos").join("session.json")
}

pub fn load_config(path: Option<&Path>) -> crate::Result<Option<TodosConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: TodosConfig = toml::from_str(&contents)?;
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &TodosConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}

/// Pick the backend and its path: command line, then config, then defaults.
pub fn resolve_location(overrides: &LocationOverrides, config: Option<&TodosConfig>) -> StoreLocation {
    let backend = overrides
        .backend
        .or_else(|| config.and_then(|c| c.backend))
        .unwrap_or_default();

    match backend {
        BackendKind::Sqlite => StoreLocation::Sqlite(
            overrides
                .database
                .clone()
                .or_else(|| config.and_then(|c| c.database.as_ref()).map(PathBuf::from))
                .unwrap_or_else(default_database_path),
        ),
        BackendKind::Session => StoreLocation::Session(
            overrides
                .session_file
                .clone()
                .or_else(|| config.and_then(|c| c.session_file.as_ref()).map(PathBuf::from))
                .unwrap_or_else(default_session_path),
        ),
    }
}

pub fn ensure_db_dir(db_path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
