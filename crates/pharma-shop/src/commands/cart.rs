//! # Cart Commands
//!
//! Cart manipulation: look the product up in the catalog, mutate the session
//! cart through the engine, confirm with a toast, return the refreshed view.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApiError;
use crate::notify::ToastKind;
use crate::state::Storefront;
use pharma_core::cart::CartItem;
use pharma_core::checkout::CheckoutStage;
use pharma_core::types::TaxRate;
use pharma_core::validation::validate_quantity;

// =============================================================================
// Responses
// =============================================================================

/// Cart totals summary, computed with the configured tax rate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub item_count: usize,
    pub total_quantity: i64,
    pub subtotal_cents: i64,
    pub tax_cents: i64,
    pub total_cents: i64,
}

/// Cart response including items and totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<CartItem>,
    pub totals: CartTotals,
    /// Names of items still blocking checkout on a missing prescription.
    pub pending_prescriptions: Vec<String>,
}

async fn view(shop: &Storefront, rate: TaxRate) -> CartView {
    shop.session
        .with(|s| CartView {
            items: s.cart.items.clone(),
            totals: CartTotals {
                item_count: s.cart.item_count(),
                total_quantity: s.cart.total_quantity(),
                subtotal_cents: s.cart.subtotal().cents(),
                tax_cents: s.cart.tax(rate).cents(),
                total_cents: s.cart.total(rate).cents(),
            },
            pending_prescriptions: s
                .cart
                .pending_prescription_items()
                .iter()
                .map(|i| i.name.clone())
                .collect(),
        })
        .await
}

// =============================================================================
// Commands
// =============================================================================

/// Returns the current cart with totals.
pub async fn get_cart(shop: &Storefront) -> Result<CartView, ApiError> {
    let settings = shop.db.catalog().settings().await?;
    Ok(view(shop, settings.tax()).await)
}

/// Adds a product to the cart, accumulating quantity on repeated adds.
///
/// ## Behavior
/// - Product data is snapshotted into the cart line; later catalog edits do
///   not reach it
/// - `quantity` defaults to 1; values below 1 are rejected
///
/// ## Returns
/// Updated cart with all items and totals
pub async fn add_to_cart(
    shop: &Storefront,
    product_id: &str,
    quantity: Option<i64>,
) -> Result<CartView, ApiError> {
    let quantity = quantity.unwrap_or(1);
    debug!(product_id = %product_id, quantity = %quantity, "add_to_cart command");

    validate_quantity(quantity)?;

    let settings = shop.db.catalog().settings().await?;
    let product = shop
        .db
        .catalog()
        .product(product_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", product_id))?;

    shop.session
        .with_mut(|s| {
            // A completed checkout starts a fresh flow on the next add
            if s.stage == CheckoutStage::Success {
                s.stage = CheckoutStage::Cart;
            }
            s.cart.add_item(&product, quantity)
        })
        .await?;

    shop.notifier.show(
        format!("Added {} {} to cart", quantity, product.name),
        ToastKind::Success,
    );

    Ok(view(shop, settings.tax()).await)
}

/// Overwrites a line's quantity; 0 or below removes the line.
pub async fn update_cart_quantity(
    shop: &Storefront,
    product_id: &str,
    quantity: i64,
) -> Result<CartView, ApiError> {
    debug!(product_id = %product_id, quantity = %quantity, "update_cart_quantity command");

    let settings = shop.db.catalog().settings().await?;
    shop.session
        .with_mut(|s| s.cart.update_quantity(product_id, quantity))
        .await?;

    Ok(view(shop, settings.tax()).await)
}

/// Removes a line from the cart. Removing an absent product is a no-op.
pub async fn remove_from_cart(shop: &Storefront, product_id: &str) -> Result<CartView, ApiError> {
    debug!(product_id = %product_id, "remove_from_cart command");

    let settings = shop.db.catalog().settings().await?;
    let removed = shop
        .session
        .with_mut(|s| s.cart.remove_item(product_id))
        .await;

    if removed {
        shop.notifier
            .show("Item removed from cart", ToastKind::Info);
    }

    Ok(view(shop, settings.tax()).await)
}

/// Attaches a prescription proof to a cart line, or clears it when `proof`
/// is empty.
pub async fn attach_prescription(
    shop: &Storefront,
    product_id: &str,
    proof: &str,
) -> Result<CartView, ApiError> {
    debug!(product_id = %product_id, "attach_prescription command");

    let settings = shop.db.catalog().settings().await?;
    let found = shop
        .session
        .with_mut(|s| s.cart.attach_prescription(product_id, proof))
        .await;

    if found {
        if proof.trim().is_empty() {
            shop.notifier.show("Prescription removed", ToastKind::Info);
        } else {
            shop.notifier
                .show("Prescription attached successfully", ToastKind::Success);
        }
    }

    Ok(view(shop, settings.tax()).await)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_add_to_cart_accumulates() {
        let shop = Storefront::in_memory();

        add_to_cart(&shop, "101", Some(2)).await.unwrap();
        let cart = add_to_cart(&shop, "101", Some(3)).await.unwrap();

        assert_eq!(cart.totals.item_count, 1);
        assert_eq!(cart.totals.total_quantity, 5);
    }

    #[tokio::test]
    async fn test_add_unknown_product() {
        let shop = Storefront::in_memory();
        let err = add_to_cart(&shop, "nope", None).await.unwrap_err();
        assert_eq!(err.message, "Product not found: nope");
    }

    #[tokio::test]
    async fn test_add_emits_toast() {
        let shop = Storefront::in_memory();
        add_to_cart(&shop, "101", Some(2)).await.unwrap();

        let toasts = shop.notifier.visible();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].message, "Added 2 Advanced Pain Relief Gel to cart");
    }

    #[tokio::test]
    async fn test_quantity_floor() {
        let shop = Storefront::in_memory();
        add_to_cart(&shop, "101", Some(2)).await.unwrap();

        let cart = update_cart_quantity(&shop, "101", -5).await.unwrap();
        assert_eq!(cart.totals.item_count, 0);
    }

    #[tokio::test]
    async fn test_remove_absent_is_noop() {
        let shop = Storefront::in_memory();
        let cart = remove_from_cart(&shop, "nope").await.unwrap();
        assert_eq!(cart.totals.item_count, 0);
        // No toast for a no-op removal
        assert!(shop.notifier.visible().is_empty());
    }

    #[tokio::test]
    async fn test_totals_use_configured_tax_rate() {
        let shop = Storefront::in_memory();

        let mut settings = shop.db.catalog().settings().await.unwrap();
        settings.tax_rate = 0.08;
        shop.db.catalog().save_settings(&settings).await.unwrap();

        add_to_cart(&shop, "101", Some(1)).await.unwrap(); // $12.99
        let cart = add_to_cart(&shop, "103", Some(2)).await.unwrap(); // 2 × $5.99

        assert_eq!(cart.totals.subtotal_cents, 2497);
        assert_eq!(cart.totals.tax_cents, 200);
        assert_eq!(cart.totals.total_cents, 2697);
    }

    #[tokio::test]
    async fn test_prescription_pending_list() {
        let shop = Storefront::in_memory();

        let mut product = shop.db.catalog().product("101").await.unwrap().unwrap();
        product.requires_prescription = true;
        shop.db.catalog().save_product(&product).await.unwrap();

        let cart = add_to_cart(&shop, "101", None).await.unwrap();
        assert_eq!(cart.pending_prescriptions.len(), 1);

        let cart = attach_prescription(&shop, "101", "rx-scan.pdf").await.unwrap();
        assert!(cart.pending_prescriptions.is_empty());
    }
}
