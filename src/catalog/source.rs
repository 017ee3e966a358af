//! Source trait for fetching the remote extension catalog

#[cfg(test)]
use mockall::automock;

use crate::catalog::error::CatalogError;
use crate::catalog::types::ExtensionRecord;

/// Trait for fetching the extension catalog from a remote source
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetches every published version of every extension in the catalog
    ///
    /// # Returns
    /// * `Ok(Vec<ExtensionRecord>)` - Catalog records, none of them marked installed
    /// * `Err(CatalogError)` - If the fetch fails
    async fn fetch_catalog(&self) -> Result<Vec<ExtensionRecord>, CatalogError>;
}
