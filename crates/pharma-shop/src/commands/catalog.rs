//! # Catalog Commands
//!
//! Read-side storefront queries: products with filtering, categories,
//! stores, content pages.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApiError;
use crate::notify::ToastKind;
use crate::state::Storefront;
use pharma_core::types::{Category, Page, Product, Store};

/// Product listing filter. Both criteria are optional and combine with AND.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFilter {
    /// Category name; `None` or `"All"` matches every category.
    pub category: Option<String>,
    /// Case-insensitive substring over name and description.
    pub search: Option<String>,
}

impl ProductFilter {
    fn matches(&self, product: &Product) -> bool {
        if let Some(category) = self.category.as_deref() {
            if category != "All" && product.category != category {
                return false;
            }
        }

        if let Some(search) = self.search.as_deref() {
            let needle = search.trim().to_lowercase();
            if !needle.is_empty() {
                let haystack =
                    format!("{} {}", product.name, product.description).to_lowercase();
                if !haystack.contains(&needle) {
                    return false;
                }
            }
        }

        true
    }
}

/// Lists catalog products matching the filter.
pub async fn products(shop: &Storefront, filter: &ProductFilter) -> Result<Vec<Product>, ApiError> {
    debug!(?filter, "products command");
    let all = shop.db.catalog().products().await?;
    Ok(all.into_iter().filter(|p| filter.matches(p)).collect())
}

/// Looks up a single product (product page).
pub async fn product(shop: &Storefront, id: &str) -> Result<Product, ApiError> {
    shop.db
        .catalog()
        .product(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", id))
}

/// Lists catalog categories.
pub async fn categories(shop: &Storefront) -> Result<Vec<Category>, ApiError> {
    Ok(shop.db.catalog().categories().await?)
}

/// Lists pharmacy locations.
pub async fn stores(shop: &Storefront) -> Result<Vec<Store>, ApiError> {
    Ok(shop.db.catalog().stores().await?)
}

/// Lists content pages.
pub async fn pages(shop: &Storefront) -> Result<Vec<Page>, ApiError> {
    Ok(shop.db.catalog().pages().await?)
}

/// Looks up a content page by slug. A missing page is a user-visible
/// message, not a crash.
pub async fn page_by_slug(shop: &Storefront, slug: &str) -> Result<Page, ApiError> {
    let pages = shop.db.catalog().pages().await?;
    match pages.into_iter().find(|p| p.slug == slug) {
        Some(page) => Ok(page),
        None => {
            shop.notifier.show("Page not found", ToastKind::Error);
            Err(ApiError::not_found("Page", slug))
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
