//! # Checkout State Machine
//!
//! The CART → DETAILS → SUCCESS flow, its transition guards, and order
//! synthesis.
//!
//! ## Stage Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Checkout Stages                                    │
//! │                                                                         │
//! │        begin_checkout                place_order                        │
//! │  ┌──────┐ ───────────────► ┌─────────┐ ─────────────► ┌─────────┐      │
//! │  │ Cart │                  │ Details │                │ Success │      │
//! │  └──────┘ ◄─────────────── └─────────┘                └─────────┘      │
//! │              back (form                                                 │
//! │              fields kept)                                               │
//! │                                                                         │
//! │  Guards on Cart → Details:                                             │
//! │    • cart not empty                                                    │
//! │    • authenticated user                                                │
//! │    • no item awaiting a prescription proof                             │
//! │                                                                         │
//! │  Guards on Details → Success:                                          │
//! │    • all shipping fields present (per-field errors)                    │
//! │    • payment method chosen from the enabled subset                     │
//! │    • repository confirmed persistence (session layer)                  │
//! │                                                                         │
//! │  No transition leaves Success.                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The functions here are pure guards and constructors; the session layer
//! owns the stage variable and the repository call, and only advances the
//! stage after persistence is confirmed.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cart::Cart;
use crate::types::{AppSettings, Order, OrderItem, OrderStatus, PaymentMethod, User};

// =============================================================================
// Stages
// =============================================================================

/// Where the session currently sits in the checkout flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckoutStage {
    /// Reviewing the cart (default).
    Cart,
    /// Entering shipping details and choosing a payment method.
    Details,
    /// Order placed and persisted.
    Success,
}

impl Default for CheckoutStage {
    fn default() -> Self {
        CheckoutStage::Cart
    }
}

// =============================================================================
// Shipping Details
// =============================================================================

/// The shipping form. Preserved verbatim when the user steps back from
/// DETAILS to CART.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingDetails {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub city: String,
    pub zip: String,
}

/// Per-field validation messages, keyed by camelCase field name so the UI
/// can attach each message to its input.
pub type FieldErrors = BTreeMap<String, String>;

impl ShippingDetails {
    /// Validates that every mandatory field is non-empty.
    ///
    /// All fields are checked in one pass; the result maps every failing
    /// field to its message rather than stopping at the first.
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();

        let required: [(&str, &str, &str); 5] = [
            ("firstName", &self.first_name, "First name is required"),
            ("lastName", &self.last_name, "Last name is required"),
            ("address", &self.address, "Address is required"),
            ("city", &self.city, "City is required"),
            ("zip", &self.zip, "ZIP code is required"),
        ];

        for (field, value, message) in required {
            if value.trim().is_empty() {
                errors.insert(field.to_string(), message.to_string());
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Single-line shipping address for the order record.
    pub fn formatted_address(&self) -> String {
        format!(
            "{}, {} {}",
            self.address.trim(),
            self.city.trim(),
            self.zip.trim()
        )
    }

    /// Full recipient name.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
    }
}

// =============================================================================
// Checkout Errors
// =============================================================================

/// Transition guard failures.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Cart has no items; there is nothing to check out.
    #[error("Cart is empty")]
    EmptyCart,

    /// No authenticated user; the caller should route to login instead of
    /// advancing the stage.
    #[error("Sign in to continue to checkout")]
    NotAuthenticated,

    /// One or more items require a prescription proof. Carries the product
    /// names so the UI can list the blocking items.
    #[error("Prescription required for: {}", .items.join(", "))]
    PrescriptionRequired { items: Vec<String> },

    /// Shipping details failed validation; carries the per-field messages.
    #[error("Checkout details are incomplete")]
    InvalidDetails { errors: FieldErrors },

    /// The chosen payment method is missing or disabled.
    #[error("Payment method is not available: {id}")]
    PaymentMethodUnavailable { id: String },

    /// No payment method was selected, or none is enabled in settings.
    #[error("No payment method available")]
    NoPaymentMethod,

    /// A placement is already in flight for this session.
    #[error("An order is already being placed")]
    PlacementInFlight,

    /// The session is not in the stage the operation needs.
    #[error("Checkout is not at the {expected:?} stage")]
    WrongStage { expected: CheckoutStage },
}

// =============================================================================
// Transition Guards
// =============================================================================

/// Guard for the CART → DETAILS transition.
///
/// ## Blocks When
/// - the cart is empty
/// - no user is signed in (caller redirects to login)
/// - any item still awaits a prescription proof (error lists the items)
pub fn guard_begin_checkout(cart: &Cart, user: Option<&User>) -> Result<(), CheckoutError> {
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    if user.is_none() {
        return Err(CheckoutError::NotAuthenticated);
    }

    let pending: Vec<String> = cart
        .pending_prescription_items()
        .iter()
        .map(|item| item.name.clone())
        .collect();
    if !pending.is_empty() {
        return Err(CheckoutError::PrescriptionRequired { items: pending });
    }

    Ok(())
}

/// Guard for the DETAILS → SUCCESS transition, run before any repository
/// call: shipping fields and payment method selection.
///
/// Returns the resolved payment method on success.
pub fn guard_place_order<'a>(
    cart: &Cart,
    details: &ShippingDetails,
    settings: &'a AppSettings,
    payment_method_id: Option<&str>,
) -> Result<&'a PaymentMethod, CheckoutError> {
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    // Re-check the prescription gate; proofs can be cleared while on the
    // details stage.
    let pending: Vec<String> = cart
        .pending_prescription_items()
        .iter()
        .map(|item| item.name.clone())
        .collect();
    if !pending.is_empty() {
        return Err(CheckoutError::PrescriptionRequired { items: pending });
    }

    if let Err(errors) = details.validate() {
        return Err(CheckoutError::InvalidDetails { errors });
    }

    let id = payment_method_id.ok_or(CheckoutError::NoPaymentMethod)?;
    match settings.payment_method(id) {
        Some(method) if method.enabled => Ok(method),
        Some(_) | None => Err(CheckoutError::PaymentMethodUnavailable { id: id.to_string() }),
    }
}

// =============================================================================
// Order Synthesis
// =============================================================================

/// Builds the order record for the current cart.
///
/// ## Snapshot Semantics
/// Items are deep copies of the cart lines; totals are computed here, once,
/// from the cart and the settings tax rate. Nothing in the returned order
/// aliases live cart or catalog state, so later mutations cannot reach it.
///
/// The caller persists the order and only then clears the cart and advances
/// the stage.
pub fn build_order(
    cart: &Cart,
    details: &ShippingDetails,
    payment: &PaymentMethod,
    settings: &AppSettings,
    customer_name: &str,
) -> Order {
    let rate = settings.tax();
    let items: Vec<OrderItem> = cart
        .items
        .iter()
        .map(|item| OrderItem {
            product_id: item.product_id.clone(),
            name: item.name.clone(),
            unit_price_cents: item.unit_price_cents,
            quantity: item.quantity,
            requires_prescription: item.requires_prescription,
            prescription_proof: item.prescription_proof.clone(),
        })
        .collect();

    Order {
        id: order_number(),
        customer_name: customer_name.to_string(),
        created_at: Utc::now(),
        items,
        subtotal_cents: cart.subtotal().cents(),
        tax_cents: cart.tax(rate).cents(),
        total_cents: cart.total(rate).cents(),
        status: OrderStatus::Processing,
        shipping_address: details.formatted_address(),
        payment_method: payment.name.clone(),
    }
}

/// Process-wide sequence for order numbers.
static ORDER_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Generates a fresh order number: `ORD-` + UTC timestamp digits + a
/// three-digit per-process sequence.
///
/// Two orders in the same second still differ in the sequence suffix;
/// repository backends additionally reject duplicate ids outright.
pub fn order_number() -> String {
    let seq = ORDER_SEQUENCE.fetch_add(1, Ordering::Relaxed) % 1000;
    format!("ORD-{}{:03}", Utc::now().format("%y%m%d%H%M%S"), seq)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Product, Role};

    fn test_product(id: &str, price_cents: i64, requires_prescription: bool) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {}", id),
            description: String::new(),
            price_cents,
            category: "Pain Relief".to_string(),
            images: vec!["https://example.com/p.jpg".to_string()],
            stock: 10,
            requires_prescription,
        }
    }

    fn test_user() -> User {
        User {
            id: "user-1".to_string(),
            name: "Alice Smith".to_string(),
            email: "alice@example.com".to_string(),
            saved_addresses: vec![],
            order_ids: vec![],
            role: Role::Customer,
        }
    }

    fn filled_details() -> ShippingDetails {
        ShippingDetails {
            first_name: "Alice".to_string(),
            last_name: "Smith".to_string(),
            address: "123 Maple St".to_string(),
            city: "Cityville".to_string(),
            zip: "10001".to_string(),
        }
    }

    #[test]
    fn test_begin_checkout_blocks_empty_cart() {
        let cart = Cart::new();
        let user = test_user();
        assert!(matches!(
            guard_begin_checkout(&cart, Some(&user)),
            Err(CheckoutError::EmptyCart)
        ));
    }

    #[test]
    fn test_begin_checkout_requires_login() {
        let mut cart = Cart::new();
        cart.add_item(&test_product("101", 1299, false), 1).unwrap();
        assert!(matches!(
            guard_begin_checkout(&cart, None),
            Err(CheckoutError::NotAuthenticated)
        ));
    }

    #[test]
    fn test_prescription_gate_blocks_and_unblocks() {
        let mut cart = Cart::new();
        cart.add_item(&test_product("200", 4999, true), 1).unwrap();
        let user = test_user();

        // Blocked while the proof is missing, and the error names the item
        match guard_begin_checkout(&cart, Some(&user)) {
            Err(CheckoutError::PrescriptionRequired { items }) => {
                assert_eq!(items, vec!["Product 200".to_string()]);
            }
            other => panic!("expected prescription gate, got {:?}", other.err()),
        }

        // Attaching a proof unblocks
        cart.attach_prescription("200", "rx-scan.pdf");
        assert!(guard_begin_checkout(&cart, Some(&user)).is_ok());

        // Clearing the proof re-blocks
        cart.attach_prescription("200", "");
        assert!(matches!(
            guard_begin_checkout(&cart, Some(&user)),
            Err(CheckoutError::PrescriptionRequired { .. })
        ));
    }

    #[test]
    fn test_details_validation_reports_every_field() {
        let details = ShippingDetails::default();
        let errors = details.validate().unwrap_err();
        assert_eq!(errors.len(), 5);
        assert_eq!(errors["firstName"], "First name is required");
        assert_eq!(errors["zip"], "ZIP code is required");
    }

    #[test]
    fn test_details_validation_rejects_whitespace() {
        let mut details = filled_details();
        details.city = "   ".to_string();
        let errors = details.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors.contains_key("city"));
    }

    #[test]
    fn test_place_order_guard_requires_enabled_payment_method() {
        let mut cart = Cart::new();
        cart.add_item(&test_product("101", 1299, false), 1).unwrap();
        let settings = AppSettings::default();
        let details = filled_details();

        // "paypal" exists but is disabled by default
        assert!(matches!(
            guard_place_order(&cart, &details, &settings, Some("paypal")),
            Err(CheckoutError::PaymentMethodUnavailable { .. })
        ));

        // No selection at all
        assert!(matches!(
            guard_place_order(&cart, &details, &settings, None),
            Err(CheckoutError::NoPaymentMethod)
        ));

        // "cod" is enabled
        let method = guard_place_order(&cart, &details, &settings, Some("cod")).unwrap();
        assert_eq!(method.name, "Cash on Delivery");
    }

    #[test]
    fn test_place_order_guard_stops_before_repository_on_bad_details() {
        let mut cart = Cart::new();
        cart.add_item(&test_product("101", 1299, false), 1).unwrap();
        let settings = AppSettings::default();
        let details = ShippingDetails::default();

        match guard_place_order(&cart, &details, &settings, Some("cod")) {
            Err(CheckoutError::InvalidDetails { errors }) => assert_eq!(errors.len(), 5),
            other => panic!("expected field errors, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_build_order_freezes_cart_snapshot() {
        let mut cart = Cart::new();
        let product = test_product("101", 1299, false);
        cart.add_item(&product, 2).unwrap();

        let mut settings = AppSettings::default();
        settings.tax_rate = 0.08;
        let details = filled_details();
        let method = settings.payment_method("cod").unwrap().clone();

        let order = build_order(&cart, &details, &method, &settings, "Alice Smith");

        assert!(order.id.starts_with("ORD-"));
        assert_eq!(order.status, OrderStatus::Processing);
        assert_eq!(order.subtotal_cents, 2598);
        assert_eq!(order.tax_cents, 208); // 2598 × 8% = 207.84 → 208
        assert_eq!(order.total_cents, 2806);
        assert_eq!(order.shipping_address, "123 Maple St, Cityville 10001");
        assert_eq!(order.payment_method, "Cash on Delivery");

        // Deep copy: emptying the cart afterwards leaves the order intact
        cart.clear();
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].quantity, 2);
        assert_eq!(order.items[0].unit_price_cents, 1299);
    }

    #[test]
    fn test_order_numbers_are_unique_in_a_batch() {
        let numbers: std::collections::HashSet<String> =
            (0..100).map(|_| order_number()).collect();
        assert_eq!(numbers.len(), 100);
        assert!(numbers.iter().all(|n| n.starts_with("ORD-")));
        assert!(numbers
            .iter()
            .all(|n| n["ORD-".len()..].chars().all(|c| c.is_ascii_digit())));
    }
}
