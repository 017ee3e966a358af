//! Refresh logic for the cached extension catalog

use tracing::{debug, error, info, warn};

use crate::catalog::cache::CatalogStorer;
use crate::catalog::error::CatalogError;
use crate::catalog::source::CatalogSource;
use crate::catalog::types::ExtensionRecord;

/// Fetch the catalog and store it in the cache
///
/// Returns true if the catalog was fetched and saved. Failures are logged and
/// leave the previously cached catalog untouched.
pub async fn refresh_catalog<S: CatalogStorer>(storer: &S, source: &dyn CatalogSource) -> bool {
    match source.fetch_catalog().await {
        Ok(records) => {
            let record_count = records.len();
            storer
                .replace_catalog(&records)
                .inspect_err(|e| error!("Failed to save catalog: {}", e))
                .inspect(|_| info!("Saved {} catalog records", record_count))
                .is_ok()
        }
        Err(CatalogError::NotFound(url)) => {
            warn!("Catalog not found at {}", url);
            false
        }
        Err(e) => {
            error!("Failed to fetch catalog: {}", e);
            false
        }
    }
}

/// Load the catalog, refreshing it first when forced or stale
///
/// Falls back to whatever is cached when the refresh fails. An unreadable
/// cache yields an empty catalog.
pub async fn load_catalog<S: CatalogStorer>(
    storer: &S,
    source: &dyn CatalogSource,
    force: bool,
) -> Vec<ExtensionRecord> {
    let stale = storer
        .needs_refresh()
        .inspect_err(|e| error!("Failed to check catalog freshness: {}", e))
        .unwrap_or(true);

    if force || stale {
        debug!("Refreshing catalog (force: {}, stale: {})", force, stale);
        if !refresh_catalog(storer, source).await {
            warn!("Using cached catalog after failed refresh");
        }
    }

    storer
        .load_catalog()
        .inspect_err(|e| error!("Failed to load cached catalog: {}", e))
        .unwrap_or_default()
}
