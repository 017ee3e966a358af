use serde::Deserialize;
use std::path::{Path, PathBuf};

use tracing::debug;

// =============================================================================
// Time-related constants
// =============================================================================

/// Default catalog refresh interval in milliseconds (24 hours)
pub const DEFAULT_REFRESH_INTERVAL_MS: i64 = 24 * 60 * 60 * 1000;

/// Timeout for fetch operations in milliseconds (30 seconds)
pub const FETCH_TIMEOUT_MS: i64 = 30_000;

/// Application configuration structure
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
    pub cache: CacheConfig,
    pub catalog: CatalogConfig,
    /// Folder holding installed extensions, defaults to `<data_dir>/extensions`
    pub extensions_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Load the configuration file, falling back to defaults when it is absent.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            debug!("No config file at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn extensions_dir(&self) -> PathBuf {
        self.extensions_dir
            .clone()
            .unwrap_or_else(|| data_dir().join("extensions"))
    }
}

/// Cache-related configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CacheConfig {
    /// Cache refresh interval in milliseconds
    pub refresh_interval: i64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            refresh_interval: DEFAULT_REFRESH_INTERVAL_MS,
        }
    }
}

/// Remote catalog configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct CatalogConfig {
    pub enabled: bool,
    /// URL of the catalog JSON, nothing is fetched while unset
    pub url: Option<String>,
}

impl CatalogConfig {
    /// The catalog URL, if fetching is enabled and configured
    pub fn active_url(&self) -> Option<&str> {
        self.url.as_deref().filter(|_| self.enabled)
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url: None,
        }
    }
}

/// Returns the path to the data directory for extension-catalog.
/// Uses $XDG_DATA_HOME/extension-catalog if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/extension-catalog,
/// or ./extension-catalog if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the database file.
pub fn db_path() -> PathBuf {
    data_dir().join("catalog.db")
}

/// Returns the path to the log file.
pub fn log_path() -> PathBuf {
    data_dir().join("extension-catalog.log")
}

/// Returns the path to the configuration file.
pub fn config_path() -> PathBuf {
    data_dir().join("config.json")
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join("extension-catalog")
}
