//! ConfigMap loading from disk.

use std::path::Path;
use thiserror::Error;
use tokio::fs;

use crate::config::schema::ConfigMap;

/// Error type for ConfigMap loading and level application.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("config map has no level field")]
    MissingLevel,

    #[error("unknown log level: {0}")]
    InvalidLevel(String),
}

/// Load the ConfigMap from a YAML file.
///
/// Performs a fresh read on every call; no state is held between calls.
/// The read goes through tokio's blocking pool, so a slow filesystem
/// stalls only the refresh tick, not request-serving tasks.
/// Returns `Ok(None)` when the file is empty or a YAML null document,
/// which callers treat as "no configuration".
pub async fn load_config_map(path: &Path) -> Result<Option<ConfigMap>, ConfigError> {
    let content = fs::read_to_string(path).await?;
    if content.trim().is_empty() {
        return Ok(None);
    }
    let doc: Option<ConfigMap> = serde_yaml::from_str(&content)?;
    Ok(doc)
}
