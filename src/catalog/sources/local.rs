//! Installed extensions read from the local extensions directory

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, warn};

use crate::catalog::error::ScanError;
use crate::catalog::types::ExtensionRecord;

/// Manifest file expected in every installed extension folder
const MANIFEST_FILE: &str = "package.json";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Manifest {
    id: Option<String>,
    name: String,
    display_name: Option<String>,
    version: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    author: Author,
}

/// `author` as either "Name <email>" text or an npm person object
#[derive(Debug, Default, Deserialize)]
#[serde(untagged)]
enum Author {
    Text(String),
    Person {
        #[serde(default)]
        name: String,
    },
    #[default]
    Unknown,
    /// Any other shape
    Other(serde::de::IgnoredAny),
}

impl Author {
    fn into_name(self) -> String {
        match self {
            Author::Text(name) | Author::Person { name } => name,
            Author::Unknown | Author::Other(_) => String::new(),
        }
    }
}

/// Scanner for the folder holding one subfolder per installed extension
pub struct LocalExtensions {
    root: PathBuf,
}

impl LocalExtensions {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Reads every installed extension.
    ///
    /// A missing root folder means nothing is installed. Folders without a
    /// readable, valid manifest are skipped.
    pub fn scan(&self) -> Result<Vec<ExtensionRecord>, ScanError> {
        if !self.root.exists() {
            debug!("Extensions folder {:?} does not exist", self.root);
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&self.root).map_err(|source| ScanError::Io {
            path: self.root.clone(),
            source,
        })?;

        let mut folders: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|entry| entry.path()))
            .filter(|path| path.is_dir())
            .collect();
        folders.sort();

        let records: Vec<ExtensionRecord> = folders
            .into_iter()
            .filter_map(|folder| {
                read_installed(&folder)
                    .inspect_err(|e| warn!("Skipping extension folder: {}", e))
                    .ok()
                    .flatten()
            })
            .collect();

        debug!(
            "Found {} installed extensions in {:?}",
            records.len(),
            self.root
        );
        Ok(records)
    }
}

/// Read the manifest of one extension folder.
///
/// Returns `Ok(None)` if the folder has no manifest.
fn read_installed(folder: &Path) -> Result<Option<ExtensionRecord>, ScanError> {
    let path = folder.join(MANIFEST_FILE);
    if !path.is_file() {
        return Ok(None);
    }

    let content = fs::read_to_string(&path).map_err(|source| ScanError::Io {
        path: path.clone(),
        source,
    })?;
    let manifest: Manifest =
        serde_json::from_str(&content).map_err(|source| ScanError::Manifest { path, source })?;

    Ok(Some(ExtensionRecord {
        id: manifest.id.unwrap_or_else(|| manifest.name.clone()),
        name: manifest.name,
        display_name: manifest.display_name,
        version: manifest.version,
        description: manifest.description,
        author: manifest.author.into_name(),
        download: None,
        installation_path: Some(folder.to_path_buf()),
    }))
}
