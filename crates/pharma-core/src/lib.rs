//! # pharma-core: Pure Business Logic for the PharmaCare Storefront
//!
//! This crate is the **heart** of the storefront. It contains all business
//! logic as pure functions and types with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      PharmaCare Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                       UI Shell (out of scope)                   │   │
//! │  │    Shop UI ──► Cart UI ──► Checkout UI ──► Admin UI            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 pharma-shop (session commands)                  │   │
//! │  │    add_to_cart, begin_checkout, place_order, login, ...        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ pharma-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐  ┌─────────┐  ┌──────────┐  ┌─────┐  ┌────────┐ │   │
//! │  │   │  types  │  │  money  │  │   cart   │  │ geo │  │checkout│ │   │
//! │  │   │ Product │  │  Money  │  │   Cart   │  │     │  │ stages │ │   │
//! │  │   │  Order  │  │ TaxRate │  │ CartItem │  │     │  │ guards │ │   │
//! │  │   └─────────┘  └─────────┘  └──────────┘  └─────┘  └────────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                pharma-db (repository boundary)                  │   │
//! │  │           memory backend / SQLite backend via sqlx              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Order, Store, AppSettings, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`cart`] - Cart engine with prescription-proof tracking
//! - [`checkout`] - Checkout stages, transition guards, order synthesis
//! - [`geo`] - Haversine distance and nearest-store lookup
//! - [`validation`] - Business rule validation
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic where it can be
//!    (timestamps and order numbers are the deliberate exceptions)
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64)
//! 4. **Explicit Errors**: All errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod checkout;
pub mod error;
pub mod geo;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use pharma_core::Money` instead of
// `use pharma_core::money::Money`

pub use cart::{Cart, CartItem};
pub use checkout::{CheckoutError, CheckoutStage, ShippingDetails};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct lines allowed in a single cart.
///
/// ## Business Reason
/// Prevents runaway carts and keeps order documents a reasonable size.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single line in the cart.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g. typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;
