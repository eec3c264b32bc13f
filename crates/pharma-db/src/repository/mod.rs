//! # Repository Contracts
//!
//! The abstract persistence capability the storefront depends on but never
//! implements inline.
//!
//! ## Contract Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Repository Boundary                                 │
//! │                                                                         │
//! │   CatalogRepository                 OrderRepository                     │
//! │   ─────────────────                 ───────────────                     │
//! │   products / product(id)            orders()        (newest first)      │
//! │   save_product / delete_product     order(id)                           │
//! │   categories / save / delete        create_order    (rejects dup id)    │
//! │   stores     / save / delete        update_status   (idempotent)        │
//! │   pages      / save / delete                                            │
//! │   settings / save_settings                                              │
//! │                                                                         │
//! │   Backends: memory (baseline, transient) · SQLite (sqlx, persistent)   │
//! │   Chosen once at startup from configuration presence.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Checkout logic only depends on the success/failure outcome of these
//! calls; whether the backing store is a process-local table or a database
//! file is invisible to it.

pub mod memory;
pub mod sqlite;

use async_trait::async_trait;

use crate::error::DbResult;
use pharma_core::types::{AppSettings, Category, Order, OrderStatus, Page, Product, Store};

// =============================================================================
// Catalog / Settings Repository
// =============================================================================

/// Per-entity CRUD for the catalog collections plus the settings singleton.
///
/// `save_*` is an upsert keyed on the entity's `id`. `delete_*` on an absent
/// id is a no-op, not an error. The storefront reads products and settings;
/// the admin surface performs the mutations.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    // --- products ---
    async fn products(&self) -> DbResult<Vec<Product>>;
    async fn product(&self, id: &str) -> DbResult<Option<Product>>;
    async fn save_product(&self, product: &Product) -> DbResult<Product>;
    async fn delete_product(&self, id: &str) -> DbResult<()>;

    // --- categories ---
    async fn categories(&self) -> DbResult<Vec<Category>>;
    async fn save_category(&self, category: &Category) -> DbResult<Category>;
    async fn delete_category(&self, id: &str) -> DbResult<()>;

    // --- stores ---
    async fn stores(&self) -> DbResult<Vec<Store>>;
    async fn save_store(&self, store: &Store) -> DbResult<Store>;
    async fn delete_store(&self, id: &str) -> DbResult<()>;

    // --- pages ---
    async fn pages(&self) -> DbResult<Vec<Page>>;
    async fn save_page(&self, page: &Page) -> DbResult<Page>;
    async fn delete_page(&self, id: &str) -> DbResult<()>;

    // --- settings singleton ---
    /// Returns the settings document, validated; shipped defaults when none
    /// has been saved yet.
    async fn settings(&self) -> DbResult<AppSettings>;
    async fn save_settings(&self, settings: &AppSettings) -> DbResult<AppSettings>;
}

// =============================================================================
// Order Repository
// =============================================================================

/// The order collection: append-only records plus one mutable status field.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// All orders, newest first.
    async fn orders(&self) -> DbResult<Vec<Order>>;

    /// Looks up a single order (order tracking).
    async fn order(&self, id: &str) -> DbResult<Option<Order>>;

    /// Persists a new order. Duplicate ids are rejected with a
    /// unique-violation error; orders are never overwritten.
    async fn create_order(&self, order: &Order) -> DbResult<Order>;

    /// Sets the fulfilment status. Idempotent: setting the current status
    /// again succeeds without effect. Unknown ids are a not-found error.
    async fn update_status(&self, id: &str, status: OrderStatus) -> DbResult<()>;
}
