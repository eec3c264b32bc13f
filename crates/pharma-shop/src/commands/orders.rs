//! # Order Commands
//!
//! Order tracking for customers, listing and status updates for the admin
//! surface.

use tracing::{debug, info};

use crate::commands::{require_admin, require_user};
use crate::error::ApiError;
use crate::notify::ToastKind;
use crate::state::Storefront;
use pharma_core::types::{Order, OrderStatus};

/// All orders, newest first. Admin only.
pub async fn all_orders(shop: &Storefront) -> Result<Vec<Order>, ApiError> {
    require_admin(shop).await?;
    Ok(shop.db.orders().orders().await?)
}

/// The signed-in user's own orders, newest first.
pub async fn my_orders(shop: &Storefront) -> Result<Vec<Order>, ApiError> {
    let user = require_user(shop).await?;

    let mut mine = Vec::with_capacity(user.order_ids.len());
    for id in &user.order_ids {
        if let Some(order) = shop.db.orders().order(id).await? {
            mine.push(order);
        }
    }
    Ok(mine)
}

/// Looks an order up by id for tracking. Unknown ids are an explicit
/// not-found message, never a crash.
pub async fn track_order(shop: &Storefront, order_id: &str) -> Result<Order, ApiError> {
    debug!(order_id = %order_id, "track_order command");

    shop.db
        .orders()
        .order(order_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Order", order_id))
}

/// Sets an order's fulfilment status. Admin only; idempotent.
pub async fn update_order_status(
    shop: &Storefront,
    order_id: &str,
    status: OrderStatus,
) -> Result<(), ApiError> {
    require_admin(shop).await?;
    debug!(order_id = %order_id, status = %status, "update_order_status command");

    shop.db.orders().update_status(order_id, status).await?;

    info!(order_id = %order_id, status = %status, "Order status updated");
    shop.notifier.show(
        format!("Order status updated to {}", status),
        ToastKind::Success,
    );
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
