use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One published or installed build of an extension
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionRecord {
    /// Stable identity shared by every version of the extension
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub version: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub author: String,
    /// Package archive URL, only known for catalog entries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download: Option<String>,
    /// Present iff this exact version is installed locally
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installation_path: Option<PathBuf>,
}

impl ExtensionRecord {
    pub fn new(id: impl Into<String>, version: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            display_name: None,
            version: version.into(),
            description: String::new(),
            author: String::new(),
            download: None,
            installation_path: None,
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    pub fn with_download(mut self, url: impl Into<String>) -> Self {
        self.download = Some(url.into());
        self
    }

    pub fn with_installation_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.installation_path = Some(path.into());
        self
    }

    pub fn is_installed(&self) -> bool {
        self.installation_path.is_some()
    }

    /// Name shown in list views: the display name, or the plain name when the
    /// display name is absent or empty.
    pub fn label(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.name)
    }
}

/// Filter applied when listing extension groups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewFilter {
    #[default]
    All,
    Installed,
    NotInstalled,
    /// Installed extensions with a newer version available
    NewVersions,
}

impl ViewFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewFilter::All => "all",
            ViewFilter::Installed => "installed",
            ViewFilter::NotInstalled => "not-installed",
            ViewFilter::NewVersions => "new-versions",
        }
    }
}

impl fmt::Display for ViewFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(ViewFilter::All),
            "installed" => Ok(ViewFilter::Installed),
            "not-installed" => Ok(ViewFilter::NotInstalled),
            "new-versions" => Ok(ViewFilter::NewVersions),
            _ => Err(format!("Unknown view filter: {}", s)),
        }
    }
}
