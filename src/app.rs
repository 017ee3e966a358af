//! Commands run by the command-line front end

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use tracing::{info, warn};

use crate::catalog::builder::VersionCatalogBuilder;
use crate::catalog::cache::{Cache, CatalogStorer};
use crate::catalog::refresh::{load_catalog, refresh_catalog};
use crate::catalog::sources::{HttpCatalog, LocalExtensions};
use crate::catalog::types::ViewFilter;
use crate::catalog::view::{CatalogView, DetailsActions, plan_install};
use crate::config::AppConfig;

/// How the remote catalog is obtained for a command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CatalogMode {
    /// Use the cache, fetching when it is stale
    #[default]
    Cached,
    /// Fetch even when the cache is fresh
    Refresh,
    /// Never touch the network
    Offline,
}

pub struct App {
    config: AppConfig,
    db_path: PathBuf,
}

impl App {
    pub fn new(config: AppConfig, db_path: PathBuf) -> Self {
        Self { config, db_path }
    }

    fn open_cache(&self) -> anyhow::Result<Cache> {
        if let Some(parent) = self.db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Cache::new(&self.db_path, self.config.cache.refresh_interval)
            .with_context(|| format!("Failed to open cache at {:?}", self.db_path))
    }

    /// Scan installed extensions and merge them with the catalog
    pub async fn build_catalog(&self, mode: CatalogMode) -> anyhow::Result<VersionCatalogBuilder> {
        let installed = LocalExtensions::new(self.config.extensions_dir()).scan()?;
        let cache = self.open_cache()?;

        let catalog = match (mode, self.config.catalog.active_url()) {
            (CatalogMode::Offline, _) | (_, None) => cache.load_catalog()?,
            (mode, Some(url)) => {
                let source = HttpCatalog::new(url)?;
                load_catalog(&cache, &source, mode == CatalogMode::Refresh).await
            }
        };

        info!(
            "Merging {} installed extensions with {} catalog records",
            installed.len(),
            catalog.len()
        );
        Ok(VersionCatalogBuilder::build(installed, catalog))
    }

    pub async fn list<W: Write>(
        &self,
        out: &mut W,
        filter: ViewFilter,
        json: bool,
        mode: CatalogMode,
    ) -> anyhow::Result<()> {
        let mut view = CatalogView::new(self.build_catalog(mode).await?);
        view.set_filter(filter);
        let nodes = view.nodes();

        if json {
            let records: Vec<_> = nodes.iter().map(|node| node.record).collect();
            serde_json::to_writer_pretty(&mut *out, &records)?;
            writeln!(out)?;
            return Ok(());
        }

        for node in nodes {
            let group = view.catalog().group(node.id);
            let marker = match group {
                Some(group) if group.has_new_version() => "*",
                Some(group) if group.installed_version().is_some() => "+",
                _ => " ",
            };
            writeln!(
                out,
                "{} {:<32} {:<12} {}",
                marker,
                node.record.label(),
                node.record.version,
                node.id
            )?;
        }
        Ok(())
    }

    pub async fn show<W: Write>(
        &self,
        out: &mut W,
        id: &str,
        version: Option<&str>,
        mode: CatalogMode,
    ) -> anyhow::Result<()> {
        let mut view = CatalogView::new(self.build_catalog(mode).await?);
        view.select_by_id(id);

        let group = view
            .selected_versions()
            .with_context(|| format!("Unknown extension: {}", id))?;
        let displayed = match version {
            Some(version) => view
                .selected_by_version(version)
                .with_context(|| format!("Unknown version {} of {}", version, id))?,
            None => group.version_in_focus(),
        };

        writeln!(out, "{} {}", displayed.label(), displayed.version)?;
        writeln!(out, "id:          {}", displayed.id)?;
        if !displayed.description.is_empty() {
            writeln!(out, "description: {}", displayed.description)?;
        }
        if !displayed.author.is_empty() {
            writeln!(out, "author:      {}", displayed.author)?;
        }
        if let Some(path) = &displayed.installation_path {
            writeln!(out, "installed:   {}", path.display())?;
        }

        let versions: Vec<&str> = group
            .all_versions()
            .iter()
            .map(|record| record.version.as_str())
            .collect();
        writeln!(out, "versions:    {}", versions.join(", "))?;

        let actions = DetailsActions::for_group(group, displayed);
        let available: Vec<&str> = [
            (actions.install, "install"),
            (actions.update, "update"),
            (actions.replace, "replace"),
            (actions.uninstall, "uninstall"),
        ]
        .into_iter()
        .filter_map(|(enabled, name)| enabled.then_some(name))
        .collect();
        writeln!(out, "actions:     {}", available.join(", "))?;

        if let Some(plan) = plan_install(group, displayed) {
            writeln!(out, "download:    {}", plan.download)?;
            if let Some(message) = group
                .installed_version()
                .and_then(|installed| plan.conflict.confirmation(plan.record, installed))
            {
                writeln!(out, "{}", message)?;
            }
        }
        Ok(())
    }

    /// Fetch the catalog into the cache regardless of its age
    pub async fn refresh<W: Write>(&self, out: &mut W) -> anyhow::Result<()> {
        let Some(url) = self.config.catalog.active_url() else {
            warn!("Catalog refresh requested but no catalog URL is configured");
            anyhow::bail!("No catalog URL configured");
        };

        let cache = self.open_cache()?;
        let source = HttpCatalog::new(url)?;

        if !refresh_catalog(&cache, &source).await {
            anyhow::bail!("Failed to refresh catalog from {}", url);
        }

        writeln!(out, "Cached {} catalog records", cache.load_catalog()?.len())?;
        Ok(())
    }
}
