//! # Domain Types
//!
//! Core domain types used throughout the PharmaCare storefront.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │     Order       │   │     Store       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id (ORD-xxxx)  │   │  id             │       │
//! │  │  price_cents    │   │  items (frozen) │   │  lat / lng      │       │
//! │  │  requires_rx    │   │  status         │   │  address, phone │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    TaxRate      │   │   OrderStatus   │   │  AppSettings    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  bps (u32)      │   │  Processing     │   │  versioned      │       │
//! │  │  800 = 8%       │   │  Shipped        │   │  singleton      │       │
//! │  └─────────────────┘   │  Delivered      │   └─────────────────┘       │
//! │                        └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Serialized field names are camelCase so documents match the repository
//! collection shapes (`requiresPrescription`, `shippingAddress`, ...).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// 1 basis point = 0.01% = 1/10000, so 800 bps = 8%.
/// Settings documents carry the rate as a fraction (`0.08`); convert with
/// [`TaxRate::from_fraction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a fraction in `0.0..=1.0` (e.g. `0.08` = 8%).
    ///
    /// Values outside the range are clamped; the settings validator rejects
    /// them before they get this far.
    pub fn from_fraction(fraction: f64) -> Self {
        let bps = (fraction * 10_000.0).round().clamp(0.0, 10_000.0);
        TaxRate(bps as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a fraction (for serialization).
    #[inline]
    pub fn fraction(&self) -> f64 {
        self.0 as f64 / 10_000.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    /// Checks if tax rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product in the pharmacy catalog.
///
/// Created and edited by the admin surface; cart and order items reference it
/// by id and snapshot its fields, they never own it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Long-form description shown on the product page.
    pub description: String,

    /// Price in cents (smallest currency unit). Never negative.
    pub price_cents: i64,

    /// Category name (denormalized reference to [`Category::name`]).
    pub category: String,

    /// Ordered list of image URIs. At least one.
    pub images: Vec<String>,

    /// Units on hand. Never negative.
    pub stock: i64,

    /// Whether a prescription proof must be attached before checkout.
    pub requires_prescription: bool,
}

impl Product {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Returns the primary (first) image URI, if any.
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// Checks if any stock remains.
    #[inline]
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

// =============================================================================
// Category
// =============================================================================

/// A catalog category.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    /// URL-safe identifier (lowercase, hyphenated).
    pub slug: String,
    pub image_url: Option<String>,
}

// =============================================================================
// Store
// =============================================================================

/// A physical pharmacy location.
///
/// Static reference data edited by the admin surface; the geo module reads it
/// to resolve the nearest store and never mutates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    pub id: String,
    pub name: String,
    pub address: String,
    pub phone: String,
    /// Latitude in decimal degrees.
    pub lat: f64,
    /// Longitude in decimal degrees.
    pub lng: f64,
}

// =============================================================================
// Page
// =============================================================================

/// A static content page (terms of service, privacy policy, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: String,
    pub title: String,
    /// URL-safe identifier used for lookup.
    pub slug: String,
    /// Markdown-ish body text, rendered by the UI shell.
    pub content: String,
    pub last_updated: DateTime<Utc>,
}

// =============================================================================
// Order Status
// =============================================================================

/// The fulfilment status of an order.
///
/// Intent is one-directional (Processing → Shipped → Delivered) and only the
/// admin surface sets it. Serialized as the literal strings the order
/// collection stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Order received, being prepared.
    Processing,
    /// Order handed to the courier.
    Shipped,
    /// Order delivered to the customer.
    Delivered,
}

impl OrderStatus {
    /// The literal string stored in the order collection.
    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Processing => "Processing",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
        }
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Processing
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Processing" => Ok(OrderStatus::Processing),
            "Shipped" => Ok(OrderStatus::Shipped),
            "Delivered" => Ok(OrderStatus::Delivered),
            other => Err(format!("unknown order status: {other}")),
        }
    }
}

// =============================================================================
// Order
// =============================================================================

/// A line item in a placed order.
///
/// Uses the snapshot pattern: product data is frozen at placement time, so
/// later catalog edits never rewrite order history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    /// Product id the snapshot was taken from.
    pub product_id: String,
    /// Product name at time of placement (frozen).
    pub name: String,
    /// Unit price in cents at time of placement (frozen).
    pub unit_price_cents: i64,
    /// Quantity ordered.
    pub quantity: i64,
    /// Whether the product required a prescription.
    pub requires_prescription: bool,
    /// Prescription proof reference attached in the cart, if any.
    pub prescription_proof: Option<String>,
}

impl OrderItem {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Line total before tax (unit price × quantity).
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price().multiply_quantity(self.quantity)
    }
}

/// A placed order.
///
/// Created exactly once at checkout finalization. Totals and item prices are
/// frozen then; only `status` mutates afterwards, and only via the admin
/// surface. Orders are never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Human-readable order number, `ORD-` followed by digits.
    pub id: String,
    pub customer_name: String,
    pub created_at: DateTime<Utc>,
    /// Frozen snapshot of the cart at placement time.
    pub items: Vec<OrderItem>,
    pub subtotal_cents: i64,
    pub tax_cents: i64,
    pub total_cents: i64,
    pub status: OrderStatus,
    pub shipping_address: String,
    /// Display name of the payment method chosen at checkout.
    pub payment_method: String,
}

impl Order {
    /// Returns the grand total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    /// Creation date formatted for display (e.g. "2023-10-25").
    pub fn display_date(&self) -> String {
        self.created_at.format("%Y-%m-%d").to_string()
    }
}

// =============================================================================
// User
// =============================================================================

/// User role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Customer,
}

/// An authenticated storefront user.
///
/// Order history is kept as order ids; the order collection owns the orders.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub saved_addresses: Vec<String>,
    /// Ids of orders this user placed, newest first.
    pub order_ids: Vec<String>,
    pub role: Role,
}

impl User {
    /// Checks for the admin role.
    #[inline]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

// =============================================================================
// Payment Methods
// =============================================================================

/// Payment method kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentKind {
    /// Cash on delivery.
    Cod,
    /// Card payment.
    Card,
    /// Wallet provider (PayPal etc.).
    Wallet,
}

/// A configurable payment method entry in [`AppSettings`].
///
/// Only `enabled` methods are offered at checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethod {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: PaymentKind,
    pub enabled: bool,
    pub description: Option<String>,
}

// =============================================================================
// App Settings
// =============================================================================

/// Hero banner configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroConfig {
    pub title: String,
    pub subtitle: String,
    pub image_url: String,
    pub cta_text: String,
}

/// Contact block configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactConfig {
    pub address: String,
    pub phone: String,
    pub email: String,
}

/// Current settings document version. Bump when the shape changes.
pub const SETTINGS_VERSION: u32 = 1;

/// Site-wide settings singleton.
///
/// ## Versioned, Validated, Never Merged
/// The settings document is an explicit struct with a `version` field and
/// documented defaults. Backends deserialize the whole document and call
/// [`AppSettings::validate`] on load; partial documents are a load error, not
/// an implicit overlay.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    /// Document shape version ([`SETTINGS_VERSION`]).
    pub version: u32,
    pub site_name: String,
    pub logo_url: String,
    pub payment_methods: Vec<PaymentMethod>,
    pub hero: HeroConfig,
    pub contact: ContactConfig,
    pub footer_about_text: String,
    /// Symbol prefixed to formatted prices.
    pub currency_symbol: String,
    /// Sales tax applied to the cart subtotal, as a fraction in `0.0..=1.0`.
    pub tax_rate: f64,
}

impl Default for AppSettings {
    /// Returns the shipped storefront defaults.
    ///
    /// ## Default Values
    /// - Site: "PharmaCare Plus", `$` currency, 0% tax
    /// - Payment methods: cash on delivery and card enabled, PayPal disabled
    fn default() -> Self {
        AppSettings {
            version: SETTINGS_VERSION,
            site_name: "PharmaCare Plus".to_string(),
            logo_url: "https://cdn-icons-png.flaticon.com/512/3022/3022706.png".to_string(),
            payment_methods: vec![
                PaymentMethod {
                    id: "cod".to_string(),
                    name: "Cash on Delivery".to_string(),
                    kind: PaymentKind::Cod,
                    enabled: true,
                    description: Some("Pay with cash upon receipt of your order.".to_string()),
                },
                PaymentMethod {
                    id: "card".to_string(),
                    name: "Credit/Debit Card".to_string(),
                    kind: PaymentKind::Card,
                    enabled: true,
                    description: Some(
                        "Secure online payment via Stripe/Visa/Mastercard.".to_string(),
                    ),
                },
                PaymentMethod {
                    id: "paypal".to_string(),
                    name: "PayPal".to_string(),
                    kind: PaymentKind::Wallet,
                    enabled: false,
                    description: Some(
                        "Fast and secure payment using your PayPal account.".to_string(),
                    ),
                },
            ],
            hero: HeroConfig {
                title: "Your Health, Our Priority".to_string(),
                subtitle: "Get your medications delivered to your doorstep with the nearest \
                           pharmacy locator and trusted professionals."
                    .to_string(),
                image_url: "https://images.unsplash.com/photo-1587854692152-cbe660dbde88"
                    .to_string(),
                cta_text: "Shop Now".to_string(),
            },
            contact: ContactConfig {
                address: "123 Health Avenue, Medical District, New York, NY 10001".to_string(),
                phone: "(555) 123-4567".to_string(),
                email: "support@pharmacareplus.com".to_string(),
            },
            footer_about_text: "Your trusted partner in health and wellness. We provide \
                                high-quality medicines, health products, and professional care \
                                right to your doorstep."
                .to_string(),
            currency_symbol: "$".to_string(),
            tax_rate: 0.0,
        }
    }
}

impl AppSettings {
    /// Validates a loaded settings document.
    ///
    /// ## Rules
    /// - version must equal [`SETTINGS_VERSION`]
    /// - site name must be non-empty
    /// - tax rate must be a fraction in `0.0..=1.0`
    /// - payment method ids must be unique
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.version != SETTINGS_VERSION {
            return Err(ValidationError::InvalidFormat {
                field: "version".to_string(),
                reason: format!("expected settings version {SETTINGS_VERSION}"),
            });
        }

        if self.site_name.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "siteName".to_string(),
            });
        }

        if !(0.0..=1.0).contains(&self.tax_rate) || !self.tax_rate.is_finite() {
            return Err(ValidationError::InvalidFormat {
                field: "taxRate".to_string(),
                reason: "must be a fraction between 0 and 1".to_string(),
            });
        }

        let mut seen = std::collections::HashSet::new();
        for method in &self.payment_methods {
            if !seen.insert(method.id.as_str()) {
                return Err(ValidationError::Duplicate {
                    field: "paymentMethods".to_string(),
                    value: method.id.clone(),
                });
            }
        }

        Ok(())
    }

    /// Returns the configured tax rate.
    pub fn tax(&self) -> TaxRate {
        TaxRate::from_fraction(self.tax_rate)
    }

    /// Iterates over the enabled payment methods, in configured order.
    pub fn enabled_payment_methods(&self) -> impl Iterator<Item = &PaymentMethod> {
        self.payment_methods.iter().filter(|pm| pm.enabled)
    }

    /// Looks up a payment method by id.
    pub fn payment_method(&self, id: &str) -> Option<&PaymentMethod> {
        self.payment_methods.iter().find(|pm| pm.id == id)
    }

    /// Formats a money amount with the configured currency symbol.
    ///
    /// ## Example
    /// ```rust
    /// use pharma_core::money::Money;
    /// use pharma_core::types::AppSettings;
    ///
    /// let settings = AppSettings::default();
    /// assert_eq!(settings.format_price(Money::from_cents(1299)), "$12.99");
    /// ```
    pub fn format_price(&self, amount: Money) -> String {
        let sign = if amount.is_negative() { "-" } else { "" };
        format!(
            "{}{}{}.{:02}",
            sign,
            self.currency_symbol,
            amount.dollars().abs(),
            amount.cents_part()
        )
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tax_rate_from_fraction() {
        assert_eq!(TaxRate::from_fraction(0.08).bps(), 800);
        assert_eq!(TaxRate::from_fraction(0.0825).bps(), 825);
        assert_eq!(TaxRate::from_fraction(0.0).bps(), 0);
        // Out-of-range input clamps
        assert_eq!(TaxRate::from_fraction(2.0).bps(), 10_000);
    }

    #[test]
    fn test_order_status_serializes_as_literal() {
        let json = serde_json::to_string(&OrderStatus::Processing).unwrap();
        assert_eq!(json, "\"Processing\"");
        let back: OrderStatus = serde_json::from_str("\"Shipped\"").unwrap();
        assert_eq!(back, OrderStatus::Shipped);
    }

    #[test]
    fn test_payment_kind_serializes_lowercase() {
        let json = serde_json::to_string(&PaymentKind::Cod).unwrap();
        assert_eq!(json, "\"cod\"");
    }

    #[test]
    fn test_product_document_shape() {
        let product = Product {
            id: "101".to_string(),
            name: "Advanced Pain Relief Gel".to_string(),
            description: "Fast-acting gel.".to_string(),
            price_cents: 1299,
            category: "Pain Relief".to_string(),
            images: vec!["https://example.com/gel.jpg".to_string()],
            stock: 50,
            requires_prescription: false,
        };
        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["priceCents"], 1299);
        assert_eq!(json["requiresPrescription"], false);
    }

    #[test]
    fn test_default_settings_validate() {
        let settings = AppSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.enabled_payment_methods().count(), 2);
    }

    #[test]
    fn test_settings_rejects_bad_tax_rate() {
        let mut settings = AppSettings::default();
        settings.tax_rate = 1.5;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_settings_rejects_duplicate_payment_ids() {
        let mut settings = AppSettings::default();
        let dup = settings.payment_methods[0].clone();
        settings.payment_methods.push(dup);
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_settings_rejects_version_mismatch() {
        let mut settings = AppSettings::default();
        settings.version = 99;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_format_price() {
        let mut settings = AppSettings::default();
        settings.currency_symbol = "€".to_string();
        assert_eq!(settings.format_price(Money::from_cents(2450)), "€24.50");
    }

    #[test]
    fn test_order_display_date() {
        let order = Order {
            id: "ORD-1001".to_string(),
            customer_name: "Alice Smith".to_string(),
            created_at: chrono::DateTime::parse_from_rfc3339("2023-10-25T09:30:00Z")
                .unwrap()
                .with_timezone(&Utc),
            items: vec![],
            subtotal_cents: 2497,
            tax_cents: 0,
            total_cents: 2497,
            status: OrderStatus::Delivered,
            shipping_address: "123 Maple St, Cityville".to_string(),
            payment_method: "Credit Card".to_string(),
        };
        assert_eq!(order.display_date(), "2023-10-25");
    }
}
