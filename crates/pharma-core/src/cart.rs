//! # Cart Engine
//!
//! The shopping cart: line items, prescription-proof tracking, totals.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Storefront Action          Engine Call             State Change        │
//! │  ─────────────────          ───────────             ────────────        │
//! │                                                                         │
//! │  Add to Cart ─────────────► add_item() ───────────► accumulate/append  │
//! │                                                                         │
//! │  Change Quantity ─────────► update_quantity() ────► overwrite (≤0 =    │
//! │                                                      remove)            │
//! │                                                                         │
//! │  Remove ──────────────────► remove_item() ────────► drop line           │
//! │                                                                         │
//! │  Upload Rx Proof ─────────► attach_prescription() ► set/clear proof     │
//! │                                                                         │
//! │  Order Confirmed ─────────► clear() ──────────────► empty (exactly once │
//! │                                                      per placed order)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - No two items share a product id (repeated adds accumulate quantity)
//! - Every item quantity is ≥ 1 (dropping to 0 removes the line)
//! - Prices are snapshots taken when the item was added

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{Product, TaxRate};
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

// =============================================================================
// Cart Item
// =============================================================================

/// An item in the shopping cart.
///
/// ## Snapshot Fields
/// `name`, `unit_price_cents`, `category`, `image` and
/// `requires_prescription` are frozen copies of the product at the time it
/// was added, so the cart keeps displaying consistent data even if the
/// catalog is edited underneath it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Product id (reference for catalog lookup).
    pub product_id: String,

    /// Product name at time of adding (frozen).
    pub name: String,

    /// Price in cents at time of adding (frozen).
    pub unit_price_cents: i64,

    /// Category name at time of adding (frozen).
    pub category: String,

    /// Primary image URI at time of adding, if the product had one.
    pub image: Option<String>,

    /// Whether this item needs a prescription proof before checkout.
    pub requires_prescription: bool,

    /// Quantity in cart. Always ≥ 1.
    pub quantity: i64,

    /// Uploaded prescription proof reference (filename). `None` until the
    /// customer attaches one; cleared again by attaching an empty proof.
    pub prescription_proof: Option<String>,

    /// When this item was first added to the cart.
    pub added_at: DateTime<Utc>,
}

impl CartItem {
    /// Creates a new cart item from a product and quantity.
    pub fn from_product(product: &Product, quantity: i64) -> Self {
        CartItem {
            product_id: product.id.clone(),
            name: product.name.clone(),
            unit_price_cents: product.price_cents,
            category: product.category.clone(),
            image: product.primary_image().map(str::to_string),
            requires_prescription: product.requires_prescription,
            quantity,
            prescription_proof: None,
            added_at: Utc::now(),
        }
    }

    /// Line total (unit price × quantity), before tax.
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.unit_price_cents).multiply_quantity(self.quantity)
    }

    /// Checks whether this item still blocks checkout: it requires a
    /// prescription and no non-empty proof is attached.
    pub fn awaiting_prescription(&self) -> bool {
        self.requires_prescription
            && self
                .prescription_proof
                .as_deref()
                .map_or(true, |proof| proof.trim().is_empty())
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart. One per session, transient.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    /// Items in the cart, in the order they were first added.
    pub items: Vec<CartItem>,

    /// When the cart was created/last cleared.
    pub created_at: DateTime<Utc>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart {
            items: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Adds a product to the cart or accumulates quantity if already present.
    ///
    /// ## Behavior
    /// - Quantity < 1 is rejected (not clamped) with a validation error
    /// - If the product is already in the cart: quantity accumulates
    /// - Otherwise a new line is appended with a frozen product snapshot
    ///
    /// ## Errors
    /// - `ValidationError::MustBePositive` for quantity < 1
    /// - `CoreError::QuantityTooLarge` if the accumulated quantity would
    ///   exceed [`MAX_ITEM_QUANTITY`]
    /// - `CoreError::CartTooLarge` if a new line would exceed
    ///   [`MAX_CART_ITEMS`]
    pub fn add_item(&mut self, product: &Product, quantity: i64) -> CoreResult<()> {
        if quantity < 1 {
            return Err(ValidationError::MustBePositive {
                field: "quantity".to_string(),
            }
            .into());
        }

        if let Some(item) = self
            .items
            .iter_mut()
            .find(|i| i.product_id == product.id)
        {
            let new_qty = item.quantity + quantity;
            if new_qty > MAX_ITEM_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: new_qty,
                    max: MAX_ITEM_QUANTITY,
                });
            }
            item.quantity = new_qty;
            return Ok(());
        }

        if self.items.len() >= MAX_CART_ITEMS {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_ITEMS,
            });
        }
        if quantity > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: MAX_ITEM_QUANTITY,
            });
        }

        self.items.push(CartItem::from_product(product, quantity));
        Ok(())
    }

    /// Overwrites the quantity of an item in the cart.
    ///
    /// ## Behavior
    /// - Quantity ≤ 0 behaves as [`Cart::remove_item`] (the quantity floor:
    ///   a line never survives with quantity below 1)
    /// - Missing product id is a no-op, not an error
    pub fn update_quantity(&mut self, product_id: &str, quantity: i64) -> CoreResult<()> {
        if quantity <= 0 {
            self.remove_item(product_id);
            return Ok(());
        }

        if quantity > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: MAX_ITEM_QUANTITY,
            });
        }

        if let Some(item) = self.items.iter_mut().find(|i| i.product_id == product_id) {
            item.quantity = quantity;
        }
        Ok(())
    }

    /// Removes an item from the cart by product id.
    ///
    /// Returns whether an item was actually removed; removing an absent id
    /// is a no-op.
    pub fn remove_item(&mut self, product_id: &str) -> bool {
        let initial_len = self.items.len();
        self.items.retain(|i| i.product_id != product_id);
        self.items.len() != initial_len
    }

    /// Sets or clears the prescription proof on a cart item.
    ///
    /// ## Behavior
    /// - Non-empty `proof` attaches it
    /// - Empty (or whitespace-only) `proof` clears any attached proof
    /// - Missing product id is a no-op
    ///
    /// Returns whether a matching item was found.
    pub fn attach_prescription(&mut self, product_id: &str, proof: &str) -> bool {
        match self.items.iter_mut().find(|i| i.product_id == product_id) {
            Some(item) => {
                let proof = proof.trim();
                item.prescription_proof = if proof.is_empty() {
                    None
                } else {
                    Some(proof.to_string())
                };
                true
            }
            None => false,
        }
    }

    /// Clears all items from the cart.
    ///
    /// Called exactly once per placed order, after the repository confirmed
    /// persistence — and never before.
    pub fn clear(&mut self) {
        self.items.clear();
        self.created_at = Utc::now();
    }

    /// Items that still require a prescription proof before checkout may
    /// proceed.
    pub fn pending_prescription_items(&self) -> Vec<&CartItem> {
        self.items
            .iter()
            .filter(|i| i.awaiting_prescription())
            .collect()
    }

    /// Returns the number of distinct lines in the cart.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Returns the total quantity across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Calculates the subtotal (before tax).
    pub fn subtotal(&self) -> Money {
        self.items
            .iter()
            .fold(Money::zero(), |acc, i| acc + i.line_total())
    }

    /// Calculates the tax on the subtotal at the given rate.
    pub fn tax(&self, rate: TaxRate) -> Money {
        self.subtotal().calculate_tax(rate)
    }

    /// Calculates the grand total (subtotal + tax) at the given rate.
    pub fn total(&self, rate: TaxRate) -> Money {
        self.subtotal() + self.tax(rate)
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for Cart {
    fn default() -> Self {
        Cart::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn test_product(id: &str, price_cents: i64, requires_prescription: bool) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {}", id),
            description: String::new(),
            price_cents,
            category: "First Aid".to_string(),
            images: vec![format!("https://example.com/{}.jpg", id)],
            stock: 50,
            requires_prescription,
        }
    }

    #[test]
    fn test_add_item() {
        let mut cart = Cart::new();
        let product = test_product("101", 1299, false);

        cart.add_item(&product, 2).unwrap();

        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.total_quantity(), 2);
        assert_eq!(cart.subtotal().cents(), 2598);
    }

    #[test]
    fn test_add_same_product_accumulates() {
        let mut cart = Cart::new();
        let product = test_product("101", 1299, false);

        cart.add_item(&product, 2).unwrap();
        cart.add_item(&product, 3).unwrap();

        // One line, quantity 5 - never two lines for one product
        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.items[0].quantity, 5);
    }

    #[test]
    fn test_add_rejects_non_positive_quantity() {
        let mut cart = Cart::new();
        let product = test_product("101", 1299, false);

        assert!(cart.add_item(&product, 0).is_err());
        assert!(cart.add_item(&product, -3).is_err());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_quantity_floor_removes_item() {
        let mut cart = Cart::new();
        let product = test_product("101", 1299, false);
        cart.add_item(&product, 2).unwrap();

        cart.update_quantity("101", 0).unwrap();
        assert!(cart.is_empty());

        cart.add_item(&product, 2).unwrap();
        cart.update_quantity("101", -5).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_quantity_overwrites() {
        let mut cart = Cart::new();
        let product = test_product("101", 1299, false);
        cart.add_item(&product, 2).unwrap();

        cart.update_quantity("101", 7).unwrap();
        assert_eq!(cart.items[0].quantity, 7);
    }

    #[test]
    fn test_update_missing_item_is_noop() {
        let mut cart = Cart::new();
        cart.update_quantity("nope", 3).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_remove_missing_item_is_noop() {
        let mut cart = Cart::new();
        assert!(!cart.remove_item("nope"));
    }

    #[test]
    fn test_prescription_attach_and_clear() {
        let mut cart = Cart::new();
        let rx = test_product("200", 4999, true);
        cart.add_item(&rx, 1).unwrap();

        assert_eq!(cart.pending_prescription_items().len(), 1);

        assert!(cart.attach_prescription("200", "rx-scan.pdf"));
        assert!(cart.pending_prescription_items().is_empty());

        // Clearing the proof re-blocks the item
        assert!(cart.attach_prescription("200", ""));
        assert_eq!(cart.pending_prescription_items().len(), 1);
    }

    #[test]
    fn test_attach_prescription_missing_item() {
        let mut cart = Cart::new();
        assert!(!cart.attach_prescription("nope", "rx.pdf"));
    }

    #[test]
    fn test_totals_with_tax() {
        let mut cart = Cart::new();
        cart.add_item(&test_product("101", 1299, false), 1).unwrap();
        cart.add_item(&test_product("103", 599, false), 2).unwrap();

        let rate = TaxRate::from_fraction(0.08);
        assert_eq!(cart.subtotal().cents(), 2497); // $24.97
        assert_eq!(cart.tax(rate).cents(), 200); // $1.9976 → $2.00
        assert_eq!(cart.total(rate).cents(), 2697);
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::new();
        cart.add_item(&test_product("101", 1299, false), 2).unwrap();
        assert!(!cart.is_empty());

        cart.clear();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_snapshot_price_survives_product_edit() {
        let mut cart = Cart::new();
        let mut product = test_product("101", 1299, false);
        cart.add_item(&product, 1).unwrap();

        product.price_cents = 9999;
        assert_eq!(cart.items[0].unit_price_cents, 1299);
    }
}
