//! # Auth Commands
//!
//! The mocked authentication boundary.
//!
//! ## This Is Not Real Authentication
//! One reserved credential pair grants the admin role; any other
//! syntactically valid email signs in as a customer named after the local
//! part. There is no credential verification and none should be read into
//! this module - the boundary is documented as mocked and is kept exactly
//! that.

use tracing::{debug, info};
use uuid::Uuid;

use crate::error::ApiError;
use crate::notify::ToastKind;
use crate::state::Storefront;
use pharma_core::checkout::CheckoutStage;
use pharma_core::types::{Role, User};
use pharma_core::validation::validate_email;

/// Reserved admin credential (mock).
pub const ADMIN_EMAIL: &str = "admin@gmail.com";
/// Reserved admin credential (mock).
pub const ADMIN_PASSWORD: &str = "Dark360@";

/// Signs a user in.
///
/// ## Behavior
/// - the reserved pair → `role = admin`
/// - any other syntactically valid email → `role = customer`, named after
///   the email's local part
/// - anything else → validation error; the caller stays on the login view
pub async fn login(shop: &Storefront, email: &str, password: &str) -> Result<User, ApiError> {
    debug!(email = %email, "login command");

    let user = if email == ADMIN_EMAIL && password == ADMIN_PASSWORD {
        User {
            id: "admin-1".to_string(),
            name: "Administrator".to_string(),
            email: email.to_string(),
            saved_addresses: vec![],
            order_ids: vec![],
            role: Role::Admin,
        }
    } else {
        validate_email(email)?;
        let local = email.split('@').next().unwrap_or(email);
        User {
            id: format!("user-{}", Uuid::new_v4()),
            name: local.to_string(),
            email: email.to_string(),
            saved_addresses: vec!["123 Main St, Cityville".to_string()],
            order_ids: vec![],
            role: Role::Customer,
        }
    };

    shop.session.with_mut(|s| s.user = Some(user.clone())).await;

    info!(user_id = %user.id, role = ?user.role, "User signed in");
    shop.notifier
        .show(format!("Welcome back, {}", user.name), ToastKind::Success);
    Ok(user)
}

/// Registers a new customer account (mock: nothing is verified or stored
/// beyond the session).
pub async fn register(shop: &Storefront, name: &str, email: &str) -> Result<User, ApiError> {
    debug!(email = %email, "register command");

    if name.trim().is_empty() {
        return Err(ApiError::validation("Name is required"));
    }
    validate_email(email)?;

    let user = User {
        id: format!("user-{}", Uuid::new_v4()),
        name: name.trim().to_string(),
        email: email.to_string(),
        saved_addresses: vec![],
        order_ids: vec![],
        role: Role::Customer,
    };

    shop.session.with_mut(|s| s.user = Some(user.clone())).await;

    shop.notifier
        .show("Account created successfully", ToastKind::Success);
    Ok(user)
}

/// Signs the user out. The cart is kept; checkout falls back to the CART
/// stage since an unauthenticated session cannot sit in DETAILS.
pub async fn logout(shop: &Storefront) {
    debug!("logout command");

    shop.session
        .with_mut(|s| {
            s.user = None;
            if s.stage == CheckoutStage::Details {
                s.stage = CheckoutStage::Cart;
            }
        })
        .await;

    shop.notifier
        .show("Logged out successfully", ToastKind::Info);
}

/// Returns the signed-in user, if any.
pub async fn current_user(shop: &Storefront) -> Option<User> {
    shop.session.with(|s| s.user.clone()).await
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reserved_pair_grants_admin() {
        let shop = Storefront::in_memory();
        let user = login(&shop, ADMIN_EMAIL, ADMIN_PASSWORD).await.unwrap();
        assert_eq!(user.role, Role::Admin);
        assert!(user.is_admin());
    }

    #[tokio::test]
    async fn test_admin_email_with_wrong_password_is_customer() {
        let shop = Storefront::in_memory();
        let user = login(&shop, ADMIN_EMAIL, "wrong").await.unwrap();
        assert_eq!(user.role, Role::Customer);
    }

    #[tokio::test]
    async fn test_customer_named_after_local_part() {
        let shop = Storefront::in_memory();
        let user = login(&shop, "alice@example.com", "anything").await.unwrap();
        assert_eq!(user.role, Role::Customer);
        assert_eq!(user.name, "alice");
        assert_eq!(current_user(&shop).await.unwrap().email, "alice@example.com");
    }

    #[tokio::test]
    async fn test_malformed_email_is_rejected() {
        let shop = Storefront::in_memory();
        assert!(login(&shop, "not-an-email", "pw").await.is_err());
        assert!(current_user(&shop).await.is_none());
    }

    #[tokio::test]
    async fn test_register_requires_name() {
        let shop = Storefront::in_memory();
        assert!(register(&shop, "  ", "bob@example.com").await.is_err());

        let user = register(&shop, "Bob Jones", "bob@example.com").await.unwrap();
        assert_eq!(user.name, "Bob Jones");
        assert_eq!(user.role, Role::Customer);
    }

    #[tokio::test]
    async fn test_logout_clears_user_and_leaves_details_stage() {
        let shop = Storefront::in_memory();
        login(&shop, "alice@example.com", "pw").await.unwrap();
        shop.session
            .with_mut(|s| s.stage = CheckoutStage::Details)
            .await;

        logout(&shop).await;

        assert!(current_user(&shop).await.is_none());
        shop.session
            .with(|s| assert_eq!(s.stage, CheckoutStage::Cart))
            .await;
    }
}
