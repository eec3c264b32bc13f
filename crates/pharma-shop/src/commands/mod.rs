//! # Storefront Commands
//!
//! The operations a UI shell invokes, grouped by surface.
//!
//! ```text
//! commands/
//! ├── cart.rs      ◄─── add/update/remove items, prescription proofs
//! ├── checkout.rs  ◄─── stage transitions, place order
//! ├── catalog.rs   ◄─── product/category/store/page reads
//! ├── orders.rs    ◄─── order tracking and status updates
//! ├── admin.rs     ◄─── back-office mutations (admin-gated)
//! ├── auth.rs      ◄─── mock login/register/logout
//! └── locator.rs   ◄─── geolocation and nearest-store lookup
//! ```
//!
//! Every command takes `&Storefront` and returns `Result<_, ApiError>` (or
//! plain data for infallible reads). State-changing commands emit toasts.

pub mod admin;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod locator;
pub mod orders;

use crate::error::ApiError;
use crate::state::Storefront;
use pharma_core::types::User;

/// Resolves the signed-in user, or fails with NOT_AUTHENTICATED.
pub(crate) async fn require_user(shop: &Storefront) -> Result<User, ApiError> {
    shop.session
        .with(|s| s.user.clone())
        .await
        .ok_or_else(|| ApiError::not_authenticated("Sign in required"))
}

/// Resolves the signed-in user and checks the admin role.
pub(crate) async fn require_admin(shop: &Storefront) -> Result<User, ApiError> {
    let user = require_user(shop).await?;
    if !user.is_admin() {
        return Err(ApiError::not_authenticated("Admin access required"));
    }
    Ok(user)
}
