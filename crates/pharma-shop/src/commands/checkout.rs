//! # Checkout Commands
//!
//! Drives the CART → DETAILS → SUCCESS flow against the session, and owns
//! the one repository-calling transition: `place_order`.
//!
//! ## Place Order Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  place_order()                                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  [lock]  stage == DETAILS? placing latch free?                         │
//! │          validate shipping fields (per-field errors)                   │
//! │          payment method enabled?                                       │
//! │          synthesize order (deep cart snapshot) · set placing           │
//! │  [unlock]                                                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  OrderRepository::create ──── Err ──► [lock] clear latch [unlock]      │
//! │       │                               error toast · stage & cart       │
//! │       │ Ok                            UNCHANGED (user can retry)       │
//! │       ▼                                                                 │
//! │  [lock]  append to user history · clear cart · stage = SUCCESS        │
//! │          clear latch                                                   │
//! │  [unlock]                                                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  success toast                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The cart is cleared only after the repository confirmed persistence.

use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::notify::ToastKind;
use crate::state::Storefront;
use pharma_core::checkout::{self, CheckoutError, CheckoutStage, ShippingDetails};
use pharma_core::types::Order;

/// Stores the shipping form. Fields survive DETAILS → CART backs and are
/// validated only when the order is placed.
pub async fn update_shipping(shop: &Storefront, details: ShippingDetails) {
    shop.session.with_mut(|s| s.shipping = details).await;
}

/// Selects a payment method for this session. Validity against the enabled
/// subset is checked at placement.
pub async fn select_payment_method(shop: &Storefront, method_id: &str) {
    shop.session
        .with_mut(|s| s.payment_method = Some(method_id.to_string()))
        .await;
}

/// CART → DETAILS.
///
/// ## Blocks When
/// - the cart is empty
/// - no user is signed in (the UI routes to login on NOT_AUTHENTICATED)
/// - any item still awaits a prescription proof (message lists the items)
///
/// On success, defaults the payment selection to the first enabled method
/// if none is chosen yet.
pub async fn begin_checkout(shop: &Storefront) -> Result<(), ApiError> {
    debug!("begin_checkout command");

    let settings = shop.db.catalog().settings().await?;
    let default_method = settings
        .enabled_payment_methods()
        .next()
        .map(|pm| pm.id.clone());

    shop.session
        .with_mut(|s| {
            if s.stage != CheckoutStage::Cart {
                return Err(CheckoutError::WrongStage {
                    expected: CheckoutStage::Cart,
                });
            }
            checkout::guard_begin_checkout(&s.cart, s.user.as_ref())?;

            if s.payment_method.is_none() {
                s.payment_method = default_method.clone();
            }
            s.stage = CheckoutStage::Details;
            Ok(())
        })
        .await?;

    Ok(())
}

/// DETAILS → CART (user "back" action). Cart contents and entered form
/// fields are preserved. There is no way back out of SUCCESS.
pub async fn back_to_cart(shop: &Storefront) -> Result<(), ApiError> {
    shop.session
        .with_mut(|s| {
            if s.stage != CheckoutStage::Details {
                return Err(CheckoutError::WrongStage {
                    expected: CheckoutStage::Details,
                });
            }
            s.stage = CheckoutStage::Cart;
            Ok(())
        })
        .await?;

    Ok(())
}

/// DETAILS → SUCCESS: validate, synthesize, persist, and only then commit
/// the session transition.
///
/// ## Failure Semantics
/// A repository failure leaves the stage at DETAILS and the cart intact, so
/// the user can retry without re-adding items. Validation failures never
/// reach the repository at all.
///
/// A hung repository call leaves the session latched in `placing`; there is
/// no explicit timeout here, deployments put one around the backend.
pub async fn place_order(shop: &Storefront) -> Result<Order, ApiError> {
    debug!("place_order command");

    let settings = shop.db.catalog().settings().await?;

    // Phase 1 (locked): guards, synthesis, latch. No repository calls.
    let order = shop
        .session
        .with_mut(|s| -> Result<Order, ApiError> {
            if s.stage != CheckoutStage::Details {
                return Err(CheckoutError::WrongStage {
                    expected: CheckoutStage::Details,
                }
                .into());
            }
            if s.placing {
                return Err(CheckoutError::PlacementInFlight.into());
            }
            let user = s
                .user
                .as_ref()
                .ok_or(CheckoutError::NotAuthenticated)?;

            let payment = checkout::guard_place_order(
                &s.cart,
                &s.shipping,
                &settings,
                s.payment_method.as_deref(),
            )?;

            let order = checkout::build_order(&s.cart, &s.shipping, payment, &settings, &user.name);
            s.placing = true;
            Ok(order)
        })
        .await?;

    // Phase 2 (unlocked): persist.
    match shop.db.orders().create_order(&order).await {
        Ok(created) => {
            // Phase 3 (locked): commit the transition.
            shop.session
                .with_mut(|s| {
                    if let Some(user) = s.user.as_mut() {
                        user.order_ids.insert(0, created.id.clone());
                    }
                    s.cart.clear();
                    s.stage = CheckoutStage::Success;
                    s.placing = false;
                })
                .await;

            info!(order_id = %created.id, total_cents = created.total_cents, "Order placed");
            shop.notifier
                .show("Order placed successfully!", ToastKind::Success);
            Ok(created)
        }
        Err(err) => {
            shop.session.with_mut(|s| s.placing = false).await;
            warn!(order_id = %order.id, error = %err, "Order placement failed");
            shop.notifier.show(
                "Could not place your order. Please try again.",
                ToastKind::Error,
            );
            Err(err.into())
        }
    }
}

/// SUCCESS → fresh flow: resets the stage for the next shopping round.
/// The cart is already empty; the shipping form is kept for reuse.
pub async fn return_to_shop(shop: &Storefront) -> Result<(), ApiError> {
    shop.session
        .with_mut(|s| {
            if s.stage != CheckoutStage::Success {
                return Err(CheckoutError::WrongStage {
                    expected: CheckoutStage::Success,
                });
            }
            s.stage = CheckoutStage::Cart;
            Ok(())
        })
        .await?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{auth, cart};
    use crate::error::ErrorCode;
    use pharma_core::types::OrderStatus;

    async fn signed_in_shop() -> Storefront {
        let shop = Storefront::in_memory();
        auth::login(&shop, "alice@example.com", "secret")
            .await
            .unwrap();
        shop
    }

    fn fill_shipping() -> ShippingDetails {
        ShippingDetails {
            first_name: "Alice".to_string(),
            last_name: "Smith".to_string(),
            address: "123 Maple St".to_string(),
            city: "Cityville".to_string(),
            zip: "10001".to_string(),
        }
    }

    #[tokio::test]
    async fn test_begin_checkout_requires_login() {
        let shop = Storefront::in_memory();
        cart::add_to_cart(&shop, "101", None).await.unwrap();

        let err = begin_checkout(&shop).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotAuthenticated);
    }

    #[tokio::test]
    async fn test_begin_checkout_blocked_by_prescription_gate() {
        let shop = signed_in_shop().await;

        let mut product = shop.db.catalog().product("101").await.unwrap().unwrap();
        product.requires_prescription = true;
        shop.db.catalog().save_product(&product).await.unwrap();

        cart::add_to_cart(&shop, "101", None).await.unwrap();

        let err = begin_checkout(&shop).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::PrescriptionRequired);
        assert!(err.message.contains("Advanced Pain Relief Gel"));

        // Attaching the proof unblocks the transition
        cart::attach_prescription(&shop, "101", "rx-scan.pdf")
            .await
            .unwrap();
        begin_checkout(&shop).await.unwrap();
    }

    #[tokio::test]
    async fn test_back_to_cart_preserves_cart_and_form() {
        let shop = signed_in_shop().await;
        cart::add_to_cart(&shop, "101", Some(2)).await.unwrap();
        begin_checkout(&shop).await.unwrap();
        update_shipping(&shop, fill_shipping()).await;

        back_to_cart(&shop).await.unwrap();

        shop.session
            .with(|s| {
                assert_eq!(s.stage, CheckoutStage::Cart);
                assert_eq!(s.cart.total_quantity(), 2);
                assert_eq!(s.shipping.city, "Cityville");
            })
            .await;
    }

    #[tokio::test]
    async fn test_place_order_validates_before_repository() {
        let shop = signed_in_shop().await;
        cart::add_to_cart(&shop, "101", None).await.unwrap();
        begin_checkout(&shop).await.unwrap();
        // Shipping form left empty

        let err = place_order(&shop).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        let fields = err.fields.unwrap();
        assert!(fields.contains_key("firstName"));
        assert!(fields.contains_key("zip"));

        // Stayed in DETAILS, nothing persisted
        shop.session
            .with(|s| assert_eq!(s.stage, CheckoutStage::Details))
            .await;
        assert!(shop.db.orders().orders().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_place_order_rejects_disabled_payment_method() {
        let shop = signed_in_shop().await;
        cart::add_to_cart(&shop, "101", None).await.unwrap();
        begin_checkout(&shop).await.unwrap();
        update_shipping(&shop, fill_shipping()).await;
        select_payment_method(&shop, "paypal").await; // disabled by default

        let err = place_order(&shop).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::PaymentError);
    }

    #[tokio::test]
    async fn test_place_order_happy_path() {
        let shop = signed_in_shop().await;

        let mut settings = shop.db.catalog().settings().await.unwrap();
        settings.tax_rate = 0.08;
        shop.db.catalog().save_settings(&settings).await.unwrap();

        cart::add_to_cart(&shop, "101", Some(2)).await.unwrap(); // 2 × $12.99
        begin_checkout(&shop).await.unwrap();
        update_shipping(&shop, fill_shipping()).await;
        select_payment_method(&shop, "cod").await;

        let order = place_order(&shop).await.unwrap();

        assert_eq!(order.status, OrderStatus::Processing);
        assert_eq!(order.subtotal_cents, 2598);
        assert_eq!(order.total_cents, 2806);
        assert_eq!(order.payment_method, "Cash on Delivery");
        assert_eq!(order.customer_name, "alice");

        // Session advanced and emptied; order history updated
        shop.session
            .with(|s| {
                assert_eq!(s.stage, CheckoutStage::Success);
                assert!(s.cart.is_empty());
                assert_eq!(s.user.as_ref().unwrap().order_ids, vec![order.id.clone()]);
                assert!(!s.placing);
            })
            .await;

        let persisted = shop.db.orders().orders().await.unwrap();
        assert_eq!(persisted.len(), 1);
        assert_eq!(persisted[0].id, order.id);
    }

    #[tokio::test]
    async fn test_order_survives_later_catalog_edits() {
        let shop = signed_in_shop().await;
        cart::add_to_cart(&shop, "101", Some(1)).await.unwrap();
        begin_checkout(&shop).await.unwrap();
        update_shipping(&shop, fill_shipping()).await;
        let order = place_order(&shop).await.unwrap();

        // Repricing the product afterwards must not rewrite the order
        let mut product = shop.db.catalog().product("101").await.unwrap().unwrap();
        product.price_cents = 99_999;
        shop.db.catalog().save_product(&product).await.unwrap();

        let stored = shop.db.orders().order(&order.id).await.unwrap().unwrap();
        assert_eq!(stored.items[0].unit_price_cents, 1299);
    }

    /// Order backend that refuses every write, standing in for an
    /// unavailable store.
    struct UnavailableOrders;

    #[async_trait::async_trait]
    impl pharma_db::OrderRepository for UnavailableOrders {
        async fn orders(&self) -> pharma_db::DbResult<Vec<Order>> {
            Ok(vec![])
        }
        async fn order(&self, _id: &str) -> pharma_db::DbResult<Option<Order>> {
            Ok(None)
        }
        async fn create_order(&self, _order: &Order) -> pharma_db::DbResult<Order> {
            Err(pharma_db::DbError::ConnectionFailed(
                "order store unavailable".to_string(),
            ))
        }
        async fn update_status(
            &self,
            id: &str,
            _status: OrderStatus,
        ) -> pharma_db::DbResult<()> {
            Err(pharma_db::DbError::not_found("Order", id))
        }
    }

    #[tokio::test]
    async fn test_failed_placement_keeps_cart_for_retry() {
        use std::sync::Arc;
        let catalog = Arc::new(pharma_db::MemoryBackend::seeded());
        let shop = Storefront {
            db: pharma_db::Database::with_backends(catalog, Arc::new(UnavailableOrders)),
            session: crate::state::SessionState::new(),
            notifier: crate::notify::Notifier::new(),
        };
        auth::login(&shop, "alice@example.com", "secret")
            .await
            .unwrap();

        cart::add_to_cart(&shop, "101", Some(2)).await.unwrap();
        begin_checkout(&shop).await.unwrap();
        update_shipping(&shop, fill_shipping()).await;

        let err = place_order(&shop).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::DatabaseError);

        // No SUCCESS, no cleared cart: the user retries without re-adding
        shop.session
            .with(|s| {
                assert_eq!(s.stage, CheckoutStage::Details);
                assert_eq!(s.cart.total_quantity(), 2);
                assert!(!s.placing);
                assert!(s.user.as_ref().unwrap().order_ids.is_empty());
            })
            .await;

        // And the failure was surfaced as an error toast
        let toasts = shop.notifier.visible();
        assert!(toasts
            .iter()
            .any(|t| t.kind == crate::notify::ToastKind::Error));
    }

    #[tokio::test]
    async fn test_return_to_shop_only_from_success() {
        let shop = signed_in_shop().await;
        assert!(return_to_shop(&shop).await.is_err());

        cart::add_to_cart(&shop, "101", None).await.unwrap();
        begin_checkout(&shop).await.unwrap();
        update_shipping(&shop, fill_shipping()).await;
        place_order(&shop).await.unwrap();

        return_to_shop(&shop).await.unwrap();
        shop.session
            .with(|s| assert_eq!(s.stage, CheckoutStage::Cart))
            .await;
    }
}
