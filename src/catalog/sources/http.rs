//! HTTP/JSON catalog implementation

use std::time::Duration;

use tracing::warn;

use crate::config::FETCH_TIMEOUT_MS;
use crate::catalog::error::CatalogError;
use crate::catalog::source::CatalogSource;
use crate::catalog::types::ExtensionRecord;

/// Catalog served as a JSON array of extension records
pub struct HttpCatalog {
    client: reqwest::Client,
    url: String,
}

impl HttpCatalog {
    pub fn new(url: &str) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .user_agent("extension-catalog")
            .timeout(Duration::from_millis(FETCH_TIMEOUT_MS as u64))
            .build()?;

        Ok(Self {
            client,
            url: url.to_string(),
        })
    }
}

#[async_trait::async_trait]
impl CatalogSource for HttpCatalog {
    async fn fetch_catalog(&self) -> Result<Vec<ExtensionRecord>, CatalogError> {
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(self.url.clone()));
        }

        if !status.is_success() {
            warn!("Catalog returned status {}: {}", status, self.url);
            return Err(CatalogError::InvalidResponse(format!(
                "Unexpected status: {}",
                status
            )));
        }

        let records: Vec<ExtensionRecord> = response.json().await.map_err(|e| {
            warn!("Failed to parse catalog response: {}", e);
            CatalogError::InvalidResponse(e.to_string())
        })?;

        // Only the local scanner may mark a record installed
        Ok(records
            .into_iter()
            .map(|mut record| {
                record.installation_path = None;
                record
            })
            .collect())
    }
}
