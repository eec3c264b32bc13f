//! # SQLite Backend
//!
//! The persistent repository backend: SQLite via sqlx, WAL mode, embedded
//! migrations.
//!
//! ## Row Mapping
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Scalar fields map to columns directly; list-shaped fields go through  │
//! │  a JSON text column:                                                   │
//! │                                                                         │
//! │    Product.images        ↔  products.images (JSON array)               │
//! │    Order.items           ↔  orders.items   (JSON array)                │
//! │    AppSettings document  ↔  settings.data  (JSON object, single row)   │
//! │                                                                         │
//! │  Decode failures surface as DbError::Serialization, never a panic.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::Path;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::config::DbConfig;
use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::{CatalogRepository, OrderRepository};
use pharma_core::types::{
    AppSettings, Category, Order, OrderItem, OrderStatus, Page, Product, Store,
};

// =============================================================================
// Backend
// =============================================================================

/// SQLite-backed repository.
#[derive(Debug, Clone)]
pub struct SqliteBackend {
    pool: SqlitePool,
}

impl SqliteBackend {
    /// Opens (creating if missing) the database at `path` and prepares the
    /// pool.
    ///
    /// ## What This Does
    /// 1. Configures SQLite for storefront use:
    ///    - WAL mode, so reads don't block the occasional write
    ///    - NORMAL synchronous
    ///    - foreign keys enabled
    /// 2. Creates the connection pool
    /// 3. Runs migrations (if enabled in `config`)
    pub async fn connect(path: &Path, config: &DbConfig) -> DbResult<Self> {
        info!(path = %path.display(), "Opening SQLite database");

        let options = SqliteConnectOptions::new()
            .filename(path)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.connect_timeout)
            .connect_with(options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        let backend = SqliteBackend { pool };

        if config.run_migrations {
            migrations::run_migrations(&backend.pool).await?;
        }

        Ok(backend)
    }

    /// Returns a reference to the connection pool, for queries not covered
    /// by the repository contract.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Checks if the database is responsive.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

// =============================================================================
// Row Types
// =============================================================================

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: String,
    name: String,
    description: String,
    price_cents: i64,
    category: String,
    images: String,
    stock: i64,
    requires_prescription: bool,
}

impl TryFrom<ProductRow> for Product {
    type Error = DbError;

    fn try_from(row: ProductRow) -> DbResult<Self> {
        Ok(Product {
            id: row.id,
            name: row.name,
            description: row.description,
            price_cents: row.price_cents,
            category: row.category,
            images: serde_json::from_str(&row.images)?,
            stock: row.stock,
            requires_prescription: row.requires_prescription,
        })
    }
}

#[derive(sqlx::FromRow)]
struct CategoryRow {
    id: String,
    name: String,
    slug: String,
    image_url: Option<String>,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Category {
            id: row.id,
            name: row.name,
            slug: row.slug,
            image_url: row.image_url,
        }
    }
}

#[derive(sqlx::FromRow)]
struct StoreRow {
    id: String,
    name: String,
    address: String,
    phone: String,
    lat: f64,
    lng: f64,
}

impl From<StoreRow> for Store {
    fn from(row: StoreRow) -> Self {
        Store {
            id: row.id,
            name: row.name,
            address: row.address,
            phone: row.phone,
            lat: row.lat,
            lng: row.lng,
        }
    }
}

#[derive(sqlx::FromRow)]
struct PageRow {
    id: String,
    title: String,
    slug: String,
    content: String,
    last_updated: DateTime<Utc>,
}

impl From<PageRow> for Page {
    fn from(row: PageRow) -> Self {
        Page {
            id: row.id,
            title: row.title,
            slug: row.slug,
            content: row.content,
            last_updated: row.last_updated,
        }
    }
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: String,
    customer_name: String,
    created_at: DateTime<Utc>,
    items: String,
    subtotal_cents: i64,
    tax_cents: i64,
    total_cents: i64,
    status: String,
    shipping_address: String,
    payment_method: String,
}

impl TryFrom<OrderRow> for Order {
    type Error = DbError;

    fn try_from(row: OrderRow) -> DbResult<Self> {
        let items: Vec<OrderItem> = serde_json::from_str(&row.items)?;
        let status = OrderStatus::from_str(&row.status).map_err(DbError::Internal)?;
        Ok(Order {
            id: row.id,
            customer_name: row.customer_name,
            created_at: row.created_at,
            items,
            subtotal_cents: row.subtotal_cents,
            tax_cents: row.tax_cents,
            total_cents: row.total_cents,
            status,
            shipping_address: row.shipping_address,
            payment_method: row.payment_method,
        })
    }
}

// =============================================================================
// Catalog Repository
// =============================================================================

#[async_trait]
impl CatalogRepository for SqliteBackend {
    async fn products(&self) -> DbResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(
            "SELECT id, name, description, price_cents, category, images, stock, \
             requires_prescription FROM products ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Product::try_from).collect()
    }

    async fn product(&self, id: &str) -> DbResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(
            "SELECT id, name, description, price_cents, category, images, stock, \
             requires_prescription FROM products WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Product::try_from).transpose()
    }

    async fn save_product(&self, product: &Product) -> DbResult<Product> {
        debug!(id = %product.id, "Saving product");

        let images = serde_json::to_string(&product.images)?;
        sqlx::query(
            "INSERT INTO products \
             (id, name, description, price_cents, category, images, stock, \
              requires_prescription) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8) \
             ON CONFLICT(id) DO UPDATE SET \
               name = excluded.name, \
               description = excluded.description, \
               price_cents = excluded.price_cents, \
               category = excluded.category, \
               images = excluded.images, \
               stock = excluded.stock, \
               requires_prescription = excluded.requires_prescription",
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price_cents)
        .bind(&product.category)
        .bind(images)
        .bind(product.stock)
        .bind(product.requires_prescription)
        .execute(&self.pool)
        .await?;

        Ok(product.clone())
    }

    async fn delete_product(&self, id: &str) -> DbResult<()> {
        sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn categories(&self) -> DbResult<Vec<Category>> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            "SELECT id, name, slug, image_url FROM categories ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Category::from).collect())
    }

    async fn save_category(&self, category: &Category) -> DbResult<Category> {
        debug!(id = %category.id, "Saving category");

        sqlx::query(
            "INSERT INTO categories (id, name, slug, image_url) VALUES (?1, ?2, ?3, ?4) \
             ON CONFLICT(id) DO UPDATE SET \
               name = excluded.name, slug = excluded.slug, image_url = excluded.image_url",
        )
        .bind(&category.id)
        .bind(&category.name)
        .bind(&category.slug)
        .bind(&category.image_url)
        .execute(&self.pool)
        .await
        .map_err(|e| classify_unique(e, "slug", &category.slug))?;

        Ok(category.clone())
    }

    async fn delete_category(&self, id: &str) -> DbResult<()> {
        sqlx::query("DELETE FROM categories WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn stores(&self) -> DbResult<Vec<Store>> {
        let rows = sqlx::query_as::<_, StoreRow>(
            "SELECT id, name, address, phone, lat, lng FROM stores ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Store::from).collect())
    }

    async fn save_store(&self, store: &Store) -> DbResult<Store> {
        debug!(id = %store.id, "Saving store");

        sqlx::query(
            "INSERT INTO stores (id, name, address, phone, lat, lng) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6) \
             ON CONFLICT(id) DO UPDATE SET \
               name = excluded.name, address = excluded.address, \
               phone = excluded.phone, lat = excluded.lat, lng = excluded.lng",
        )
        .bind(&store.id)
        .bind(&store.name)
        .bind(&store.address)
        .bind(&store.phone)
        .bind(store.lat)
        .bind(store.lng)
        .execute(&self.pool)
        .await?;

        Ok(store.clone())
    }

    async fn delete_store(&self, id: &str) -> DbResult<()> {
        sqlx::query("DELETE FROM stores WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn pages(&self) -> DbResult<Vec<Page>> {
        let rows = sqlx::query_as::<_, PageRow>(
            "SELECT id, title, slug, content, last_updated FROM pages ORDER BY title",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Page::from).collect())
    }

    async fn save_page(&self, page: &Page) -> DbResult<Page> {
        debug!(id = %page.id, "Saving page");

        sqlx::query(
            "INSERT INTO pages (id, title, slug, content, last_updated) \
             VALUES (?1, ?2, ?3, ?4, ?5) \
             ON CONFLICT(id) DO UPDATE SET \
               title = excluded.title, slug = excluded.slug, \
               content = excluded.content, last_updated = excluded.last_updated",
        )
        .bind(&page.id)
        .bind(&page.title)
        .bind(&page.slug)
        .bind(&page.content)
        .bind(page.last_updated)
        .execute(&self.pool)
        .await
        .map_err(|e| classify_unique(e, "slug", &page.slug))?;

        Ok(page.clone())
    }

    async fn delete_page(&self, id: &str) -> DbResult<()> {
        sqlx::query("DELETE FROM pages WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn settings(&self) -> DbResult<AppSettings> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT data FROM settings WHERE id = 1")
                .fetch_optional(&self.pool)
                .await?;

        let settings = match row {
            Some((data,)) => serde_json::from_str::<AppSettings>(&data)?,
            None => AppSettings::default(),
        };

        settings
            .validate()
            .map_err(|e| DbError::Internal(e.to_string()))?;
        Ok(settings)
    }

    async fn save_settings(&self, settings: &AppSettings) -> DbResult<AppSettings> {
        settings
            .validate()
            .map_err(|e| DbError::Internal(e.to_string()))?;

        let data = serde_json::to_string(settings)?;
        sqlx::query(
            "INSERT INTO settings (id, version, data) VALUES (1, ?1, ?2) \
             ON CONFLICT(id) DO UPDATE SET version = excluded.version, data = excluded.data",
        )
        .bind(settings.version as i64)
        .bind(data)
        .execute(&self.pool)
        .await?;

        Ok(settings.clone())
    }
}

// =============================================================================
// Order Repository
// =============================================================================

#[async_trait]
impl OrderRepository for SqliteBackend {
    async fn orders(&self) -> DbResult<Vec<Order>> {
        let rows = sqlx::query_as::<_, OrderRow>(
            "SELECT id, customer_name, created_at, items, subtotal_cents, tax_cents, \
             total_cents, status, shipping_address, payment_method \
             FROM orders ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Order::try_from).collect()
    }

    async fn order(&self, id: &str) -> DbResult<Option<Order>> {
        let row = sqlx::query_as::<_, OrderRow>(
            "SELECT id, customer_name, created_at, items, subtotal_cents, tax_cents, \
             total_cents, status, shipping_address, payment_method \
             FROM orders WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Order::try_from).transpose()
    }

    async fn create_order(&self, order: &Order) -> DbResult<Order> {
        debug!(id = %order.id, total = order.total_cents, "Creating order");

        let items = serde_json::to_string(&order.items)?;
        sqlx::query(
            "INSERT INTO orders \
             (id, customer_name, created_at, items, subtotal_cents, tax_cents, \
              total_cents, status, shipping_address, payment_method) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        )
        .bind(&order.id)
        .bind(&order.customer_name)
        .bind(order.created_at)
        .bind(items)
        .bind(order.subtotal_cents)
        .bind(order.tax_cents)
        .bind(order.total_cents)
        .bind(order.status.as_str())
        .bind(&order.shipping_address)
        .bind(&order.payment_method)
        .execute(&self.pool)
        .await
        .map_err(|e| classify_unique(e, "id", &order.id))?;

        Ok(order.clone())
    }

    async fn update_status(&self, id: &str, status: OrderStatus) -> DbResult<()> {
        let result = sqlx::query("UPDATE orders SET status = ?2 WHERE id = ?1")
            .bind(id)
            .bind(status.as_str())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Order", id));
        }

        Ok(())
    }
}

/// Turns a SQLite unique-constraint failure into a `DbError::UniqueViolation`
/// carrying the offending field, passing every other error through.
fn classify_unique(err: sqlx::Error, field: &str, value: &str) -> DbError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            return DbError::unique_violation(field, value);
        }
    }
    DbError::QueryFailed(err)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;

    async fn test_backend() -> SqliteBackend {
        let config = DbConfig::in_memory_sqlite();
        let path = config.database_path.clone().unwrap();
        SqliteBackend::connect(&path, &config).await.unwrap()
    }

    fn test_order(id: &str) -> Order {
        Order {
            id: id.to_string(),
            customer_name: "Alice Smith".to_string(),
            created_at: Utc::now(),
            items: vec![OrderItem {
                product_id: "101".to_string(),
                name: "Advanced Pain Relief Gel".to_string(),
                unit_price_cents: 1299,
                quantity: 2,
                requires_prescription: false,
                prescription_proof: None,
            }],
            subtotal_cents: 2598,
            tax_cents: 208,
            total_cents: 2806,
            status: OrderStatus::Processing,
            shipping_address: "123 Maple St, Cityville 10001".to_string(),
            payment_method: "Cash on Delivery".to_string(),
        }
    }

    #[tokio::test]
    async fn test_connect_and_health_check() {
        let backend = test_backend().await;
        assert!(backend.health_check().await);
    }

    #[tokio::test]
    async fn test_product_round_trip() {
        let backend = test_backend().await;

        for product in seed::products() {
            backend.save_product(&product).await.unwrap();
        }

        let products = backend.products().await.unwrap();
        assert_eq!(products.len(), 4);

        let gel = backend.product("101").await.unwrap().unwrap();
        assert_eq!(gel.name, "Advanced Pain Relief Gel");
        assert_eq!(gel.images.len(), 1);
        assert!(!gel.requires_prescription);
    }

    #[tokio::test]
    async fn test_save_product_upserts() {
        let backend = test_backend().await;
        let mut product = seed::products().remove(0);

        backend.save_product(&product).await.unwrap();
        product.price_cents = 1499;
        backend.save_product(&product).await.unwrap();

        assert_eq!(backend.products().await.unwrap().len(), 1);
        assert_eq!(
            backend.product(&product.id).await.unwrap().unwrap().price_cents,
            1499
        );
    }

    #[tokio::test]
    async fn test_order_round_trip_preserves_items() {
        let backend = test_backend().await;
        backend.create_order(&test_order("ORD-1001")).await.unwrap();

        let order = backend.order("ORD-1001").await.unwrap().unwrap();
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].unit_price_cents, 1299);
        assert_eq!(order.status, OrderStatus::Processing);
    }

    #[tokio::test]
    async fn test_create_order_rejects_duplicate_id() {
        let backend = test_backend().await;
        backend.create_order(&test_order("ORD-1001")).await.unwrap();

        assert!(matches!(
            backend.create_order(&test_order("ORD-1001")).await,
            Err(DbError::UniqueViolation { .. })
        ));
    }

    #[tokio::test]
    async fn test_update_status_is_idempotent() {
        let backend = test_backend().await;
        backend.create_order(&test_order("ORD-1001")).await.unwrap();

        backend
            .update_status("ORD-1001", OrderStatus::Shipped)
            .await
            .unwrap();
        backend
            .update_status("ORD-1001", OrderStatus::Shipped)
            .await
            .unwrap();

        let order = backend.order("ORD-1001").await.unwrap().unwrap();
        assert_eq!(order.status, OrderStatus::Shipped);
    }

    #[tokio::test]
    async fn test_update_status_unknown_order() {
        let backend = test_backend().await;
        assert!(matches!(
            backend.update_status("ORD-nope", OrderStatus::Shipped).await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_settings_defaults_then_round_trip() {
        let backend = test_backend().await;

        // No row yet: shipped defaults
        let mut settings = backend.settings().await.unwrap();
        assert_eq!(settings.site_name, "PharmaCare Plus");

        settings.tax_rate = 0.08;
        backend.save_settings(&settings).await.unwrap();
        assert_eq!(backend.settings().await.unwrap().tax_rate, 0.08);
    }
}
