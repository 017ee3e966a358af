//! Merges installed extensions and catalog entries into per-extension version groups

use std::cmp::Ordering;

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::catalog::types::{ExtensionRecord, ViewFilter};
use crate::catalog::version::{compare_versions, is_newer};

/// All known versions of one extension
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionVersionGroup {
    /// Strictly descending by version, never empty
    all_versions: Vec<ExtensionRecord>,
    /// Version string of the installed member of `all_versions`
    installed: Option<String>,
}

impl ExtensionVersionGroup {
    fn new(record: ExtensionRecord) -> Self {
        let installed = record.is_installed().then(|| record.version.clone());
        Self {
            all_versions: vec![record],
            installed,
        }
    }

    pub fn id(&self) -> &str {
        &self.latest_version().id
    }

    pub fn all_versions(&self) -> &[ExtensionRecord] {
        &self.all_versions
    }

    /// The record with the highest version seen for this extension
    pub fn latest_version(&self) -> &ExtensionRecord {
        &self.all_versions[0]
    }

    pub fn installed_version(&self) -> Option<&ExtensionRecord> {
        let installed = self.installed.as_deref()?;
        self.all_versions
            .iter()
            .find(|record| compare_versions(&record.version, installed).is_eq())
    }

    /// The installed version if any, otherwise the latest one
    pub fn version_in_focus(&self) -> &ExtensionRecord {
        self.installed_version()
            .unwrap_or_else(|| self.latest_version())
    }

    /// Returns true if the extension is installed and a newer version is known
    pub fn has_new_version(&self) -> bool {
        self.installed_version()
            .is_some_and(|installed| is_newer(&self.latest_version().version, &installed.version))
    }

    /// Insert a record keeping `all_versions` strictly descending.
    ///
    /// On an equal version the incoming record only wins if it is installed.
    /// Returns false if the record was discarded.
    fn add_version(&mut self, record: ExtensionRecord) -> bool {
        let installed = record.is_installed();
        let version = record.version.clone();

        let position = self
            .all_versions
            .iter()
            .position(|existing| compare_versions(&version, &existing.version) != Ordering::Less);

        let kept = match position {
            Some(i) if compare_versions(&version, &self.all_versions[i].version).is_eq() => {
                if installed {
                    self.all_versions[i] = record;
                }
                installed
            }
            Some(i) => {
                self.all_versions.insert(i, record);
                true
            }
            None => {
                self.all_versions.push(record);
                true
            }
        };

        if installed {
            self.installed = Some(version);
        }

        kept
    }

    fn matches(&self, filter: ViewFilter) -> bool {
        match filter {
            ViewFilter::All => true,
            ViewFilter::Installed => self.installed.is_some(),
            ViewFilter::NotInstalled => self.installed.is_none(),
            ViewFilter::NewVersions => self.has_new_version(),
        }
    }
}

/// Builds the version catalog from the installed set and the remote catalog.
///
/// Records with an equal version resolve in favour of the installed one only
/// when it arrives second, so the installed set must be added before the
/// catalog set. [`VersionCatalogBuilder::build`] does this.
///
/// The builder holds no state beyond one pass. Rebuild it whenever either
/// input changes.
#[derive(Debug, Clone, Default)]
pub struct VersionCatalogBuilder {
    groups: IndexMap<String, ExtensionVersionGroup>,
}

impl VersionCatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from both sources, installed extensions first.
    pub fn build<I, C>(installed: I, catalog: C) -> Self
    where
        I: IntoIterator<Item = ExtensionRecord>,
        C: IntoIterator<Item = ExtensionRecord>,
    {
        let mut builder = Self::new();
        installed
            .into_iter()
            .chain(catalog)
            .for_each(|record| builder.add_extension(record));

        debug!("Built version catalog with {} extensions", builder.len());
        builder
    }

    pub fn add_extension(&mut self, record: ExtensionRecord) {
        match self.groups.get_mut(&record.id) {
            Some(group) => {
                let id = record.id.clone();
                let version = record.version.clone();
                if !group.add_version(record) {
                    trace!("Discarded duplicate version {} of {}", version, id);
                }
            }
            None => {
                self.groups
                    .insert(record.id.clone(), ExtensionVersionGroup::new(record));
            }
        }
    }

    /// Groups matching the filter, in the order their identities were first seen
    pub fn get(&self, filter: ViewFilter) -> Vec<&ExtensionVersionGroup> {
        self.groups
            .values()
            .filter(|group| group.matches(filter))
            .collect()
    }

    pub fn group(&self, id: &str) -> Option<&ExtensionVersionGroup> {
        self.groups.get(id)
    }

    /// Look up a specific version of an extension by exact version string
    pub fn record(&self, id: &str, version: &str) -> Option<&ExtensionRecord> {
        self.group(id)?
            .all_versions()
            .iter()
            .find(|record| record.version == version)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(id: &str, version: &str) -> ExtensionRecord {
        ExtensionRecord::new(id, version)
    }

    fn installed(id: &str, version: &str) -> ExtensionRecord {
        ExtensionRecord::new(id, version).with_installation_path(format!("/ext/{}", id))
    }

    fn versions(group: &ExtensionVersionGroup) -> Vec<&str> {
        group
            .all_versions()
            .iter()
            .map(|record| record.version.as_str())
            .collect()
    }

    #[test]
    fn installed_then_newer_catalog_version_is_a_new_version() {
        let builder =
            VersionCatalogBuilder::build([installed("A", "1.2.0")], [catalog("A", "1.3.0")]);

        let group = builder.group("A").unwrap();
        assert_eq!(versions(group), vec!["1.3.0", "1.2.0"]);
        assert_eq!(group.installed_version(), Some(&installed("A", "1.2.0")));
        assert_eq!(group.latest_version(), &catalog("A", "1.3.0"));
        assert_eq!(group.version_in_focus(), &installed("A", "1.2.0"));

        let new_versions = builder.get(ViewFilter::NewVersions);
        assert_eq!(new_versions.len(), 1);
        assert_eq!(new_versions[0].id(), "A");
    }

    #[test]
    fn catalog_only_extension_is_not_installed() {
        let builder = VersionCatalogBuilder::build([], [catalog("B", "2.0.0")]);

        let group = builder.group("B").unwrap();
        assert_eq!(group.installed_version(), None);
        assert_eq!(group.version_in_focus().version, "2.0.0");
        assert_eq!(builder.get(ViewFilter::NotInstalled).len(), 1);
        assert!(builder.get(ViewFilter::Installed).is_empty());
    }

    #[test]
    fn add_extension_keeps_versions_strictly_descending() {
        let mut builder = VersionCatalogBuilder::new();
        for version in ["1.9.0", "1.10.0", "0.1", "1.9.5", "2"] {
            builder.add_extension(catalog("A", version));
        }

        let group = builder.group("A").unwrap();
        assert_eq!(versions(group), vec!["2", "1.10.0", "1.9.5", "1.9.0", "0.1"]);
        assert_eq!(group.latest_version().version, "2");
        assert_eq!(group.version_in_focus().version, "2");
    }

    #[test]
    fn installed_record_replaces_catalog_record_of_same_version() {
        let mut builder = VersionCatalogBuilder::new();
        builder.add_extension(catalog("A", "1.0.0"));
        builder.add_extension(installed("A", "1.0.0"));

        let group = builder.group("A").unwrap();
        assert_eq!(group.all_versions(), &[installed("A", "1.0.0")]);
        assert_eq!(group.installed_version(), Some(&installed("A", "1.0.0")));
        assert_eq!(group.latest_version(), &installed("A", "1.0.0"));
    }

    #[test]
    fn catalog_record_of_installed_version_is_discarded() {
        let builder = VersionCatalogBuilder::build(
            [installed("A", "1.0.0")],
            [catalog("A", "1.0.0").with_download("https://example.com/a.zip")],
        );

        let group = builder.group("A").unwrap();
        assert_eq!(group.all_versions(), &[installed("A", "1.0.0")]);
        assert!(!group.has_new_version());
    }

    #[test]
    fn equal_versions_with_different_spelling_are_deduplicated() {
        let builder = VersionCatalogBuilder::build([], [catalog("A", "1.2"), catalog("A", "1.2.0")]);

        assert_eq!(versions(builder.group("A").unwrap()), vec!["1.2"]);
    }

    #[test]
    fn segment_beyond_u64_orders_as_latest() {
        let builder = VersionCatalogBuilder::build(
            [],
            [catalog("x", "1.1"), catalog("x", "1.20000000000000000000")],
        );

        let group = builder.group("x").unwrap();
        assert_eq!(versions(group), vec!["1.20000000000000000000", "1.1"]);
        assert_eq!(group.latest_version().version, "1.20000000000000000000");
    }

    #[test]
    fn later_installed_record_becomes_installed_version() {
        let mut builder = VersionCatalogBuilder::new();
        builder.add_extension(installed("A", "1.0.0"));
        builder.add_extension(installed("A", "1.1.0"));

        let group = builder.group("A").unwrap();
        assert_eq!(group.installed_version().unwrap().version, "1.1.0");
    }

    #[test]
    fn get_returns_groups_in_first_seen_order() {
        let builder = VersionCatalogBuilder::build(
            [installed("C", "1.0.0")],
            [catalog("A", "1.0.0"), catalog("C", "2.0.0"), catalog("B", "1.0.0")],
        );

        let ids: Vec<&str> = builder.get(ViewFilter::All).iter().map(|g| g.id()).collect();
        assert_eq!(ids, vec!["C", "A", "B"]);
    }

    #[test]
    fn record_looks_up_exact_version_string() {
        let builder =
            VersionCatalogBuilder::build([installed("A", "1.2.0")], [catalog("A", "1.3.0")]);

        assert_eq!(builder.record("A", "1.3.0"), Some(&catalog("A", "1.3.0")));
        assert_eq!(builder.record("A", "1.2.0"), Some(&installed("A", "1.2.0")));
        assert_eq!(builder.record("A", "1.3"), None);
        assert_eq!(builder.record("missing", "1.3.0"), None);
    }

    #[test]
    fn empty_builder_returns_no_groups() {
        let builder = VersionCatalogBuilder::new();

        assert!(builder.is_empty());
        assert!(builder.get(ViewFilter::All).is_empty());
    }
}
