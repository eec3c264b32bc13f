//! # Admin Commands
//!
//! Back-office mutations: thin, admin-gated pass-throughs from validated
//! input to the catalog repository, each confirmed with a toast. The forms
//! themselves live in the UI shell.

use tracing::{debug, info};

use crate::commands::require_admin;
use crate::error::ApiError;
use crate::notify::ToastKind;
use crate::state::Storefront;
use pharma_core::types::{AppSettings, Category, Page, Product, Store};
use pharma_core::validation::{validate_product, validate_product_name, validate_slug};

// =============================================================================
// Products
// =============================================================================

/// Creates or updates a product.
pub async fn save_product(shop: &Storefront, product: &Product) -> Result<Product, ApiError> {
    require_admin(shop).await?;
    validate_product(product)?;
    debug!(id = %product.id, "save_product command");

    let saved = shop.db.catalog().save_product(product).await?;
    shop.notifier.show("Product saved", ToastKind::Success);
    Ok(saved)
}

/// Deletes a product. Existing carts and orders keep their snapshots.
pub async fn delete_product(shop: &Storefront, id: &str) -> Result<(), ApiError> {
    require_admin(shop).await?;
    debug!(id = %id, "delete_product command");

    shop.db.catalog().delete_product(id).await?;
    shop.notifier.show("Product deleted", ToastKind::Info);
    Ok(())
}

// =============================================================================
// Categories
// =============================================================================

/// Creates or updates a category.
pub async fn save_category(shop: &Storefront, category: &Category) -> Result<Category, ApiError> {
    require_admin(shop).await?;
    validate_product_name(&category.name)?;
    validate_slug(&category.slug)?;

    let saved = shop.db.catalog().save_category(category).await?;
    shop.notifier.show("Category saved", ToastKind::Success);
    Ok(saved)
}

/// Deletes a category. Products keep their denormalized category name.
pub async fn delete_category(shop: &Storefront, id: &str) -> Result<(), ApiError> {
    require_admin(shop).await?;

    shop.db.catalog().delete_category(id).await?;
    shop.notifier.show("Category deleted", ToastKind::Info);
    Ok(())
}

// =============================================================================
// Stores
// =============================================================================

/// Creates or updates a pharmacy location.
pub async fn save_store(shop: &Storefront, store: &Store) -> Result<Store, ApiError> {
    require_admin(shop).await?;
    if store.name.trim().is_empty() {
        return Err(ApiError::validation("name is required"));
    }
    if !(-90.0..=90.0).contains(&store.lat) || !(-180.0..=180.0).contains(&store.lng) {
        return Err(ApiError::validation("coordinates are out of range"));
    }

    let saved = shop.db.catalog().save_store(store).await?;
    shop.notifier.show("Store saved", ToastKind::Success);
    Ok(saved)
}

/// Deletes a pharmacy location.
pub async fn delete_store(shop: &Storefront, id: &str) -> Result<(), ApiError> {
    require_admin(shop).await?;

    shop.db.catalog().delete_store(id).await?;
    shop.notifier.show("Store deleted", ToastKind::Info);
    Ok(())
}

// =============================================================================
// Pages
// =============================================================================

/// Creates or updates a content page.
pub async fn save_page(shop: &Storefront, page: &Page) -> Result<Page, ApiError> {
    require_admin(shop).await?;
    if page.title.trim().is_empty() {
        return Err(ApiError::validation("title is required"));
    }
    validate_slug(&page.slug)?;

    let saved = shop.db.catalog().save_page(page).await?;
    shop.notifier.show("Page saved", ToastKind::Success);
    Ok(saved)
}

/// Deletes a content page.
pub async fn delete_page(shop: &Storefront, id: &str) -> Result<(), ApiError> {
    require_admin(shop).await?;

    shop.db.catalog().delete_page(id).await?;
    shop.notifier.show("Page deleted", ToastKind::Info);
    Ok(())
}

// =============================================================================
// Settings
// =============================================================================

/// Replaces the settings document. The document validates itself; partial
/// updates are composed by the caller, never merged here.
pub async fn update_settings(
    shop: &Storefront,
    settings: &AppSettings,
) -> Result<AppSettings, ApiError> {
    require_admin(shop).await?;
    settings.validate()?;
    debug!("update_settings command");

    let saved = shop.db.catalog().save_settings(settings).await?;
    info!("Settings updated");
    shop.notifier.show("Settings saved", ToastKind::Success);
    Ok(saved)
}

/// Flips one payment method's `enabled` flag.
pub async fn toggle_payment_method(shop: &Storefront, id: &str) -> Result<AppSettings, ApiError> {
    require_admin(shop).await?;

    let mut settings = shop.db.catalog().settings().await?;
    let method = settings
        .payment_methods
        .iter_mut()
        .find(|pm| pm.id == id)
        .ok_or_else(|| ApiError::not_found("Payment method", id))?;
    method.enabled = !method.enabled;

    let saved = shop.db.catalog().save_settings(&settings).await?;
    shop.notifier
        .show("Payment method updated", ToastKind::Success);
    Ok(saved)
}

// =============================================================================
// Unit Tests
// =============================================================================
