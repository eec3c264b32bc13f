//! # In-Memory Backend
//!
//! The baseline repository backend: process-local tables, transient by
//! design. Used when no database path is configured, and by tests that need
//! a fast isolated store.
//!
//! ## Table Model
//! Each collection is a `Vec` behind a `tokio::sync::RwLock`; `save_*` is an
//! upsert keyed on `id`, `delete_*` filters by `id`. Orders insert at the
//! front so `orders()` is newest-first without sorting.

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::{CatalogRepository, OrderRepository};
use crate::seed;
use pharma_core::types::{AppSettings, Category, Order, OrderStatus, Page, Product, Store};

/// Process-local repository backend.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    products: RwLock<Vec<Product>>,
    categories: RwLock<Vec<Category>>,
    stores: RwLock<Vec<Store>>,
    pages: RwLock<Vec<Page>>,
    orders: RwLock<Vec<Order>>,
    settings: RwLock<AppSettings>,
}

impl MemoryBackend {
    /// Creates an empty backend with default settings.
    pub fn new() -> Self {
        MemoryBackend::default()
    }

    /// Creates a backend pre-populated with the starter data a fresh
    /// storefront serves.
    pub fn seeded() -> Self {
        MemoryBackend {
            products: RwLock::new(seed::products()),
            categories: RwLock::new(seed::categories()),
            stores: RwLock::new(seed::stores()),
            pages: RwLock::new(seed::pages()),
            orders: RwLock::new(Vec::new()),
            settings: RwLock::new(AppSettings::default()),
        }
    }
}

/// Upserts `item` into `table`: replaces the row `matches` selects or
/// appends.
fn upsert<T: Clone>(table: &mut Vec<T>, item: &T, matches: impl Fn(&T) -> bool) {
    if let Some(pos) = table.iter().position(matches) {
        table[pos] = item.clone();
    } else {
        table.push(item.clone());
    }
}

#[async_trait]
impl CatalogRepository for MemoryBackend {
    async fn products(&self) -> DbResult<Vec<Product>> {
        Ok(self.products.read().await.clone())
    }

    async fn product(&self, id: &str) -> DbResult<Option<Product>> {
        Ok(self
            .products
            .read()
            .await
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn save_product(&self, product: &Product) -> DbResult<Product> {
        debug!(id = %product.id, "Saving product");
        let mut table = self.products.write().await;
        upsert(&mut table, product, |p| p.id == product.id);
        Ok(product.clone())
    }

    async fn delete_product(&self, id: &str) -> DbResult<()> {
        self.products.write().await.retain(|p| p.id != id);
        Ok(())
    }

    async fn categories(&self) -> DbResult<Vec<Category>> {
        Ok(self.categories.read().await.clone())
    }

    async fn save_category(&self, category: &Category) -> DbResult<Category> {
        debug!(id = %category.id, "Saving category");
        let mut table = self.categories.write().await;
        upsert(&mut table, category, |c| c.id == category.id);
        Ok(category.clone())
    }

    async fn delete_category(&self, id: &str) -> DbResult<()> {
        self.categories.write().await.retain(|c| c.id != id);
        Ok(())
    }

    async fn stores(&self) -> DbResult<Vec<Store>> {
        Ok(self.stores.read().await.clone())
    }

    async fn save_store(&self, store: &Store) -> DbResult<Store> {
        debug!(id = %store.id, "Saving store");
        let mut table = self.stores.write().await;
        upsert(&mut table, store, |s| s.id == store.id);
        Ok(store.clone())
    }

    async fn delete_store(&self, id: &str) -> DbResult<()> {
        self.stores.write().await.retain(|s| s.id != id);
        Ok(())
    }

    async fn pages(&self) -> DbResult<Vec<Page>> {
        Ok(self.pages.read().await.clone())
    }

    async fn save_page(&self, page: &Page) -> DbResult<Page> {
        debug!(id = %page.id, "Saving page");
        let mut table = self.pages.write().await;
        upsert(&mut table, page, |p| p.id == page.id);
        Ok(page.clone())
    }

    async fn delete_page(&self, id: &str) -> DbResult<()> {
        self.pages.write().await.retain(|p| p.id != id);
        Ok(())
    }

    async fn settings(&self) -> DbResult<AppSettings> {
        let settings = self.settings.read().await.clone();
        settings
            .validate()
            .map_err(|e| DbError::Internal(e.to_string()))?;
        Ok(settings)
    }

    async fn save_settings(&self, settings: &AppSettings) -> DbResult<AppSettings> {
        settings
            .validate()
            .map_err(|e| DbError::Internal(e.to_string()))?;
        *self.settings.write().await = settings.clone();
        Ok(settings.clone())
    }
}

#[async_trait]
impl OrderRepository for MemoryBackend {
    async fn orders(&self) -> DbResult<Vec<Order>> {
        Ok(self.orders.read().await.clone())
    }

    async fn order(&self, id: &str) -> DbResult<Option<Order>> {
        Ok(self
            .orders
            .read()
            .await
            .iter()
            .find(|o| o.id == id)
            .cloned())
    }

    async fn create_order(&self, order: &Order) -> DbResult<Order> {
        let mut table = self.orders.write().await;
        if table.iter().any(|o| o.id == order.id) {
            return Err(DbError::unique_violation("id", &order.id));
        }
        debug!(id = %order.id, total = order.total_cents, "Creating order");
        // Newest first
        table.insert(0, order.clone());
        Ok(order.clone())
    }

    async fn update_status(&self, id: &str, status: OrderStatus) -> DbResult<()> {
        let mut table = self.orders.write().await;
        match table.iter_mut().find(|o| o.id == id) {
            Some(order) => {
                order.status = status;
                Ok(())
            }
            None => Err(DbError::not_found("Order", id)),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn test_order(id: &str) -> Order {
        Order {
            id: id.to_string(),
            customer_name: "Alice Smith".to_string(),
            created_at: Utc::now(),
            items: vec![],
            subtotal_cents: 2497,
            tax_cents: 0,
            total_cents: 2497,
            status: OrderStatus::Processing,
            shipping_address: "123 Maple St, Cityville 10001".to_string(),
            payment_method: "Cash on Delivery".to_string(),
        }
    }

    #[tokio::test]
    async fn test_seeded_backend_serves_starter_catalog() {
        let backend = MemoryBackend::seeded();
        assert_eq!(backend.products().await.unwrap().len(), 4);
        assert_eq!(backend.categories().await.unwrap().len(), 4);
        assert!(backend.orders().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_product_upserts() {
        let backend = MemoryBackend::seeded();

        let mut product = backend.product("101").await.unwrap().unwrap();
        product.price_cents = 1499;
        backend.save_product(&product).await.unwrap();

        // Same row updated, not duplicated
        assert_eq!(backend.products().await.unwrap().len(), 4);
        assert_eq!(
            backend.product("101").await.unwrap().unwrap().price_cents,
            1499
        );
    }

    #[tokio::test]
    async fn test_delete_missing_product_is_noop() {
        let backend = MemoryBackend::seeded();
        backend.delete_product("nope").await.unwrap();
        assert_eq!(backend.products().await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_orders_newest_first() {
        let backend = MemoryBackend::new();
        backend.create_order(&test_order("ORD-1")).await.unwrap();
        backend.create_order(&test_order("ORD-2")).await.unwrap();

        let orders = backend.orders().await.unwrap();
        assert_eq!(orders[0].id, "ORD-2");
        assert_eq!(orders[1].id, "ORD-1");
    }

    #[tokio::test]
    async fn test_create_order_rejects_duplicate_id() {
        let backend = MemoryBackend::new();
        backend.create_order(&test_order("ORD-1")).await.unwrap();
        assert!(matches!(
            backend.create_order(&test_order("ORD-1")).await,
            Err(DbError::UniqueViolation { .. })
        ));
    }

    #[tokio::test]
    async fn test_update_status_is_idempotent() {
        let backend = MemoryBackend::new();
        backend.create_order(&test_order("ORD-1")).await.unwrap();

        backend
            .update_status("ORD-1", OrderStatus::Shipped)
            .await
            .unwrap();
        backend
            .update_status("ORD-1", OrderStatus::Shipped)
            .await
            .unwrap();

        let order = backend.order("ORD-1").await.unwrap().unwrap();
        assert_eq!(order.status, OrderStatus::Shipped);
        assert_eq!(backend.orders().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_status_unknown_order() {
        let backend = MemoryBackend::new();
        assert!(matches!(
            backend.update_status("nope", OrderStatus::Shipped).await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_settings_round_trip() {
        let backend = MemoryBackend::new();
        let mut settings = backend.settings().await.unwrap();
        settings.tax_rate = 0.08;
        backend.save_settings(&settings).await.unwrap();
        assert_eq!(backend.settings().await.unwrap().tax_rate, 0.08);
    }

    #[tokio::test]
    async fn test_save_settings_rejects_invalid_document() {
        let backend = MemoryBackend::new();
        let mut settings = backend.settings().await.unwrap();
        settings.tax_rate = 7.0;
        assert!(backend.save_settings(&settings).await.is_err());
    }
}
