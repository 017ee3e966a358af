use std::path::Path;
use std::sync::{Mutex, MutexGuard};

#[cfg(test)]
use mockall::automock;

use rusqlite::Connection;
use tracing::{debug, info};

use crate::catalog::error::CacheError;
use crate::catalog::types::ExtensionRecord;

/// Trait for storing and retrieving the last fetched catalog
#[cfg_attr(test, automock)]
pub trait CatalogStorer: Send + Sync + 'static {
    /// Get every cached catalog record
    fn load_catalog(&self) -> Result<Vec<ExtensionRecord>, CacheError>;

    /// Replace the cached catalog with freshly fetched records
    fn replace_catalog(&self, records: &[ExtensionRecord]) -> Result<(), CacheError>;

    /// Whether the catalog was never fetched or is older than the refresh interval
    fn needs_refresh(&self) -> Result<bool, CacheError>;
}

pub struct Cache {
    conn: Mutex<Connection>,
    refresh_interval: i64,
}

impl Cache {
    pub fn new(db_path: &Path, refresh_interval: i64) -> Result<Self, CacheError> {
        info!("Initializing cache database at {:?}", db_path);

        let conn = Connection::open(db_path)?;

        // Enable WAL mode for better concurrency
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;

        debug!("Database connection established");

        let cache = Self {
            conn: Mutex::new(conn),
            refresh_interval,
        };

        cache.create_schema()?;
        info!("Cache initialized successfully");

        Ok(cache)
    }

    /// Acquire database connection lock with proper error handling
    fn lock_conn(&self) -> Result<MutexGuard<'_, Connection>, CacheError> {
        self.conn.lock().map_err(|_| CacheError::LockPoisoned)
    }

    /// Get current timestamp in milliseconds since UNIX epoch
    fn current_timestamp_ms() -> i64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis() as i64)
            .unwrap_or(0)
    }

    fn create_schema(&self) -> Result<(), CacheError> {
        debug!("Creating database schema");

        let conn = self.lock_conn()?;

        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS catalog_fetches (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                updated_at INTEGER NOT NULL
            )
            "#,
            [],
        )?;

        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS extensions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                extension_id TEXT NOT NULL,
                version TEXT NOT NULL,
                record TEXT NOT NULL,
                UNIQUE(extension_id, version)
            )
            "#,
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_extension_id ON extensions(extension_id)",
            [],
        )?;

        debug!("Database schema created successfully");
        Ok(())
    }

    /// Timestamp of the last successful catalog fetch
    pub fn updated_at(&self) -> Result<Option<i64>, CacheError> {
        let conn = self.lock_conn()?;
        let result = conn.query_row(
            "SELECT updated_at FROM catalog_fetches WHERE id = 1",
            [],
            |row| row.get(0),
        );

        match result {
            Ok(updated_at) => Ok(Some(updated_at)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn replace_catalog_at(
        &self,
        records: &[ExtensionRecord],
        updated_at: i64,
    ) -> Result<(), CacheError> {
        debug!("Saving {} catalog records", records.len());

        let mut conn = self.lock_conn()?;
        let tx = conn.transaction()?;

        tx.execute("DELETE FROM extensions", [])?;

        {
            // Duplicate (id, version) pairs keep the first record, matching
            // how the catalog builder treats them
            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO extensions (extension_id, version, record) VALUES (?1, ?2, ?3)",
            )?;
            for record in records {
                let json = serde_json::to_string(record)?;
                stmt.execute((&record.id, &record.version, json))?;
            }
        }

        tx.execute(
            r#"
            INSERT INTO catalog_fetches (id, updated_at) VALUES (1, ?1)
            ON CONFLICT(id) DO UPDATE SET updated_at = excluded.updated_at
            "#,
            [updated_at],
        )?;

        tx.commit()?;

        debug!("Successfully saved catalog");
        Ok(())
    }
}

impl CatalogStorer for Cache {
    fn load_catalog(&self) -> Result<Vec<ExtensionRecord>, CacheError> {
        let conn = self.lock_conn()?;
        let mut stmt = conn.prepare("SELECT record FROM extensions ORDER BY id")?;

        let rows = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<String>, _>>()?;

        let records = rows
            .iter()
            .map(|json| serde_json::from_str(json))
            .collect::<Result<Vec<ExtensionRecord>, _>>()?;

        Ok(records)
    }

    fn replace_catalog(&self, records: &[ExtensionRecord]) -> Result<(), CacheError> {
        self.replace_catalog_at(records, Self::current_timestamp_ms())
    }

    fn needs_refresh(&self) -> Result<bool, CacheError> {
        let threshold = Self::current_timestamp_ms() - self.refresh_interval;

        Ok(match self.updated_at()? {
            Some(updated_at) => updated_at < threshold,
            None => true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_cache(refresh_interval: i64) -> (TempDir, Cache) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let cache = Cache::new(&db_path, refresh_interval).unwrap();
        (temp_dir, cache)
    }

    #[test]
    fn new_cache_needs_refresh() {
        let (_temp_dir, cache) = create_test_cache(86_400_000);

        assert_eq!(cache.updated_at().unwrap(), None);
        assert!(cache.needs_refresh().unwrap());
        assert!(cache.load_catalog().unwrap().is_empty());
    }

    #[test]
    fn replace_catalog_marks_cache_fresh() {
        let (_temp_dir, cache) = create_test_cache(86_400_000);

        cache
            .replace_catalog(&[ExtensionRecord::new("a", "1.0.0")])
            .unwrap();

        assert!(cache.updated_at().unwrap().is_some());
        assert!(!cache.needs_refresh().unwrap());
    }

    #[test]
    fn catalog_older_than_refresh_interval_needs_refresh() {
        let (_temp_dir, cache) = create_test_cache(1000);

        let stale = Cache::current_timestamp_ms() - 5000;
        cache
            .replace_catalog_at(&[ExtensionRecord::new("a", "1.0.0")], stale)
            .unwrap();

        assert_eq!(cache.updated_at().unwrap(), Some(stale));
        assert!(cache.needs_refresh().unwrap());
    }

    #[test]
    fn replace_catalog_ignores_duplicate_versions() {
        let (_temp_dir, cache) = create_test_cache(86_400_000);

        cache
            .replace_catalog(&[
                ExtensionRecord::new("a", "1.0.0").with_display_name("first"),
                ExtensionRecord::new("a", "1.0.0").with_display_name("second"),
            ])
            .unwrap();

        let records = cache.load_catalog().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].display_name.as_deref(), Some("first"));
    }
}
