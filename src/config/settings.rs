//! Process startup settings.
//!
//! Read from the environment once at startup. Only the ConfigMap
//! contents hot-reload; these values do not.

use std::path::PathBuf;
use std::time::Duration;

/// How often the refresher polls the ConfigMap file.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2000);

/// Startup settings for the greeting service.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Path to the mounted ConfigMap file (`CONFIGMAP_PATH`).
    pub configmap_path: PathBuf,

    /// Address the HTTP server binds to (`BIND_ADDRESS`, or `PORT` for
    /// the port alone).
    pub bind_address: String,

    /// ConfigMap poll interval (`CONFIG_POLL_INTERVAL_MS`).
    pub poll_interval: Duration,
}

impl Settings {
    /// Read settings from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        let configmap_path = std::env::var("CONFIGMAP_PATH")
            .unwrap_or_else(|_| "app-config/app-config.yml".to_string())
            .into();

        let port = std::env::var("PORT").unwrap_or_else(|_| "8080".to_string());
        let bind_address =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| format!("0.0.0.0:{}", port));

        let poll_interval = std::env::var("CONFIG_POLL_INTERVAL_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_POLL_INTERVAL);

        Self {
            configmap_path,
            bind_address,
            poll_interval,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            configmap_path: "app-config/app-config.yml".into(),
            bind_address: "0.0.0.0:8080".to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}
