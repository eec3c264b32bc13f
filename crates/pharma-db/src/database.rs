//! # Database Handle
//!
//! The single object the session layer holds: two repository capabilities,
//! backed by whichever backend configuration selected at startup.

use std::sync::Arc;

use tracing::info;

use crate::config::DbConfig;
use crate::error::DbResult;
use crate::repository::memory::MemoryBackend;
use crate::repository::sqlite::SqliteBackend;
use crate::repository::{CatalogRepository, OrderRepository};
use crate::seed;

/// Main database handle providing repository access.
///
/// ## Usage
/// ```rust,ignore
/// let db = Database::connect(DbConfig::from_env()).await?;
///
/// let products = db.catalog().products().await?;
/// let orders = db.orders().orders().await?;
/// ```
///
/// Cloning is cheap (two `Arc`s); every clone talks to the same backend.
#[derive(Clone)]
pub struct Database {
    catalog: Arc<dyn CatalogRepository>,
    orders: Arc<dyn OrderRepository>,
}

impl Database {
    /// Connects the backend the configuration selects and prepares it for
    /// use.
    ///
    /// ## Selection
    /// - `database_path` set → SQLite backend (migrations run here)
    /// - `database_path` unset → in-memory backend
    ///
    /// With `seed_if_empty`, a store with no products is populated with the
    /// starter catalog so a fresh install has something to sell.
    pub async fn connect(config: DbConfig) -> DbResult<Self> {
        let db = match &config.database_path {
            Some(path) => {
                let backend = Arc::new(SqliteBackend::connect(path, &config).await?);
                info!(path = %path.display(), "Using SQLite repository backend");
                Database {
                    catalog: backend.clone(),
                    orders: backend,
                }
            }
            None => {
                info!("No database path configured; using in-memory repository backend");
                let backend = Arc::new(MemoryBackend::new());
                Database {
                    catalog: backend.clone(),
                    orders: backend,
                }
            }
        };

        if config.seed_if_empty {
            db.seed_if_empty().await?;
        }

        Ok(db)
    }

    /// Creates a seeded in-memory database (the baseline storefront setup,
    /// also handy in tests).
    pub fn in_memory() -> Self {
        let backend = Arc::new(MemoryBackend::seeded());
        Database {
            catalog: backend.clone(),
            orders: backend,
        }
    }

    /// Assembles a database from explicit backend implementations.
    ///
    /// The supported backends come from [`Database::connect`]; this seam
    /// exists for embedders and tests that bring their own.
    pub fn with_backends(
        catalog: Arc<dyn CatalogRepository>,
        orders: Arc<dyn OrderRepository>,
    ) -> Self {
        Database { catalog, orders }
    }

    /// Returns the catalog/settings repository.
    pub fn catalog(&self) -> &dyn CatalogRepository {
        self.catalog.as_ref()
    }

    /// Returns the order repository.
    pub fn orders(&self) -> &dyn OrderRepository {
        self.orders.as_ref()
    }

    /// Populates the starter catalog into a store that has no products yet.
    async fn seed_if_empty(&self) -> DbResult<()> {
        if !self.catalog.products().await?.is_empty() {
            return Ok(());
        }

        info!("Empty catalog; seeding starter data");

        for product in seed::products() {
            self.catalog.save_product(&product).await?;
        }
        for category in seed::categories() {
            self.catalog.save_category(&category).await?;
        }
        for store in seed::stores() {
            self.catalog.save_store(&store).await?;
        }
        for page in seed::pages() {
            self.catalog.save_page(&page).await?;
        }

        Ok(())
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database").finish_non_exhaustive()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_memory_seeds_catalog() {
        let db = Database::connect(DbConfig::memory()).await.unwrap();
        assert_eq!(db.catalog().products().await.unwrap().len(), 4);
        assert_eq!(db.catalog().stores().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_connect_memory_without_seeding() {
        let db = Database::connect(DbConfig::memory().seed_if_empty(false))
            .await
            .unwrap();
        assert!(db.catalog().products().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_connect_sqlite_in_memory_and_seed() {
        let db = Database::connect(DbConfig::in_memory_sqlite().seed_if_empty(true))
            .await
            .unwrap();
        assert_eq!(db.catalog().products().await.unwrap().len(), 4);
        // Seeding is guarded: reconnecting logic must not duplicate rows
        db.seed_if_empty().await.unwrap();
        assert_eq!(db.catalog().products().await.unwrap().len(), 4);
    }
}
