//! # pharma-shop: Storefront Session Layer
//!
//! The orchestration layer a UI shell calls into: it owns per-session state
//! (cart, checkout stage, signed-in user), exposes the storefront commands,
//! and wires the repository boundary underneath them.
//!
//! ## Module Organization
//! ```text
//! pharma_shop/
//! ├── lib.rs          ◄─── You are here
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── session.rs  ◄─── Session + SessionState (cart, stage, user)
//! │   └── storefront.rs ◄─ Storefront = Database + SessionState + Notifier
//! ├── commands/
//! │   ├── cart.rs     ◄─── Cart mutations
//! │   ├── checkout.rs ◄─── Stage transitions, place_order
//! │   ├── catalog.rs  ◄─── Read-side queries
//! │   ├── orders.rs   ◄─── Tracking and status updates
//! │   ├── admin.rs    ◄─── Back-office mutations
//! │   ├── auth.rs     ◄─── Mock login/register/logout
//! │   └── locator.rs  ◄─── Geolocation, nearest store
//! ├── notify.rs       ◄─── Toast queue
//! ├── telemetry.rs    ◄─── Tracing setup
//! └── error.rs        ◄─── ApiError for commands
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! use pharma_db::DbConfig;
//! use pharma_shop::{commands, Storefront};
//!
//! pharma_shop::telemetry::init();
//!
//! // SQLite when PHARMA_DATABASE_PATH is set, in-memory otherwise
//! let shop = Storefront::connect(DbConfig::from_env()).await?;
//!
//! commands::auth::login(&shop, "alice@example.com", "pw").await?;
//! commands::cart::add_to_cart(&shop, "101", Some(2)).await?;
//! commands::checkout::begin_checkout(&shop).await?;
//! commands::checkout::update_shipping(&shop, details).await;
//! let order = commands::checkout::place_order(&shop).await?;
//! ```

pub mod commands;
pub mod error;
pub mod notify;
pub mod state;
pub mod telemetry;

pub use error::{ApiError, ErrorCode};
pub use notify::{Notifier, Toast, ToastKind};
pub use state::{Session, SessionState, Storefront};
