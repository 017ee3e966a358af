//! List and details view model over a built catalog
//!
//! Sorting by display name, selection, and the install/update/replace/uninstall
//! decisions shown next to a selected extension.

use std::cmp::Ordering;

use crate::catalog::builder::{ExtensionVersionGroup, VersionCatalogBuilder};
use crate::catalog::types::{ExtensionRecord, ViewFilter};
use crate::catalog::version::{compare_versions, is_newer};

/// One row of the extension list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionNode<'a> {
    pub id: &'a str,
    /// The version in focus of the extension
    pub record: &'a ExtensionRecord,
    pub selected: bool,
}

/// Sort groups by the label of their version in focus (case-sensitive)
pub fn sort_by_label(groups: &mut [&ExtensionVersionGroup]) {
    groups.sort_by(|a, b| a.version_in_focus().label().cmp(b.version_in_focus().label()));
}

/// Filtered, sorted list of extensions with a single selection
pub struct CatalogView {
    catalog: VersionCatalogBuilder,
    filter: ViewFilter,
    selected: Option<String>,
}

impl CatalogView {
    pub fn new(catalog: VersionCatalogBuilder) -> Self {
        Self {
            catalog,
            filter: ViewFilter::All,
            selected: None,
        }
    }

    pub fn catalog(&self) -> &VersionCatalogBuilder {
        &self.catalog
    }

    /// Swap in a rebuilt catalog, keeping filter and selection
    pub fn set_catalog(&mut self, catalog: VersionCatalogBuilder) {
        self.catalog = catalog;
    }

    pub fn set_filter(&mut self, filter: ViewFilter) {
        self.filter = filter;
    }

    pub fn nodes(&self) -> Vec<ExtensionNode<'_>> {
        let mut groups = self.catalog.get(self.filter);
        sort_by_label(&mut groups);

        groups
            .into_iter()
            .map(|group| ExtensionNode {
                id: group.id(),
                record: group.version_in_focus(),
                selected: self.selected.as_deref() == Some(group.id()),
            })
            .collect()
    }

    /// Select an extension listed under the current filter.
    ///
    /// Selecting an id that is not listed clears the selection.
    pub fn select_by_id(&mut self, id: &str) {
        let listed = self
            .catalog
            .get(self.filter)
            .iter()
            .any(|group| group.id() == id);
        self.selected = listed.then(|| id.to_string());
    }

    pub fn selected_versions(&self) -> Option<&ExtensionVersionGroup> {
        self.catalog.group(self.selected.as_deref()?)
    }

    /// A specific version of the selected extension
    pub fn selected_by_version(&self, version: &str) -> Option<&ExtensionRecord> {
        self.selected_versions()?
            .all_versions()
            .iter()
            .find(|record| record.version == version)
    }
}

/// Which actions apply to the displayed version of an extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DetailsActions {
    pub install: bool,
    pub update: bool,
    pub replace: bool,
    pub uninstall: bool,
}

impl DetailsActions {
    pub fn for_group(group: &ExtensionVersionGroup, displayed: &ExtensionRecord) -> Self {
        match group.installed_version() {
            None => Self {
                install: true,
                ..Self::default()
            },
            Some(installed) => {
                let displays_installed = installed == displayed;
                Self {
                    install: false,
                    update: displays_installed
                        && is_newer(&group.latest_version().version, &installed.version),
                    replace: !displays_installed,
                    uninstall: true,
                }
            }
        }
    }
}

/// How an install relates to the version already installed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallConflict {
    /// Nothing is installed yet
    Fresh,
    SameVersion,
    /// The installed version is newer than the one being installed
    ExistingNewer,
    /// The installed version is older than the one being installed
    ExistingOlder,
}

impl InstallConflict {
    pub fn classify(candidate: &ExtensionRecord, installed: Option<&ExtensionRecord>) -> Self {
        let Some(installed) = installed else {
            return InstallConflict::Fresh;
        };

        match compare_versions(&installed.version, &candidate.version) {
            Ordering::Equal => InstallConflict::SameVersion,
            Ordering::Greater => InstallConflict::ExistingNewer,
            Ordering::Less => InstallConflict::ExistingOlder,
        }
    }

    /// Message asking the user to confirm replacing the installed version
    pub fn confirmation(
        &self,
        candidate: &ExtensionRecord,
        installed: &ExtensionRecord,
    ) -> Option<String> {
        let detail = match self {
            InstallConflict::Fresh => return None,
            InstallConflict::SameVersion => "That version is already installed.".to_string(),
            InstallConflict::ExistingNewer => {
                format!("The newer version {} is already installed.", installed.version)
            }
            InstallConflict::ExistingOlder => {
                format!("The older version {} is already installed.", installed.version)
            }
        };

        Some(format!(
            "You are about to install version {} of the '{}' extension. {}",
            candidate.version,
            candidate.label(),
            detail
        ))
    }
}

/// The record to download and install, and how it conflicts with the installed one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallPlan<'a> {
    pub record: &'a ExtensionRecord,
    pub download: &'a str,
    pub conflict: InstallConflict,
}

/// Decide what installing from the details of `displayed` would do.
///
/// When the installed version is displayed this installs the latest version.
/// Returns None when the chosen record has no download URL.
pub fn plan_install<'a>(
    group: &'a ExtensionVersionGroup,
    displayed: &'a ExtensionRecord,
) -> Option<InstallPlan<'a>> {
    let installed = group.installed_version();

    let record = if installed == Some(displayed) {
        group.latest_version()
    } else {
        displayed
    };

    let download = record.download.as_deref()?;

    Some(InstallPlan {
        record,
        download,
        conflict: InstallConflict::classify(record, installed),
    })
}
