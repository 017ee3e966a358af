//! Record builders and on-disk test environments

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use extension_catalog::app::App;
use extension_catalog::catalog::types::ExtensionRecord;
use extension_catalog::config::{AppConfig, CacheConfig, CatalogConfig};

pub fn catalog(id: &str, version: &str) -> ExtensionRecord {
    ExtensionRecord::new(id, version)
        .with_download(format!("https://example.com/{}-{}.zip", id, version))
}

pub fn installed(id: &str, version: &str) -> ExtensionRecord {
    ExtensionRecord::new(id, version).with_installation_path(format!("/extensions/{}", id))
}

/// Temporary data folder holding an extensions folder and a cache database
pub struct TestEnv {
    pub temp_dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    pub fn extensions_dir(&self) -> PathBuf {
        self.temp_dir.path().join("extensions")
    }

    pub fn db_path(&self) -> PathBuf {
        self.temp_dir.path().join("data").join("catalog.db")
    }

    /// Install an extension by writing its manifest
    pub fn install(&self, folder: &str, manifest: &str) -> PathBuf {
        let dir = self.extensions_dir().join(folder);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("package.json"), manifest).unwrap();
        dir
    }

    pub fn app(&self, catalog_url: Option<String>) -> App {
        let config = AppConfig {
            cache: CacheConfig::default(),
            catalog: CatalogConfig {
                enabled: true,
                url: catalog_url,
            },
            extensions_dir: Some(self.extensions_dir()),
        };
        App::new(config, self.db_path())
    }
}
