//! # Session State
//!
//! The explicit per-session object: cart, checkout stage, shipping form,
//! signed-in user, location. One session per logical user; commands
//! serialize on its mutex, so there is no overlapping mutation of the same
//! cart.
//!
//! ## Thread Safety
//! The session is wrapped in `Arc<tokio::sync::Mutex<_>>`. Commands take the
//! lock for the synchronous part of their work only - never across a
//! repository await. `place_order` snapshots under the lock, awaits the
//! repository, then re-locks to commit.

use std::sync::Arc;

use tokio::sync::Mutex;

use pharma_core::cart::Cart;
use pharma_core::checkout::{CheckoutStage, ShippingDetails};
use pharma_core::geo::GeoPoint;
use pharma_core::types::User;

/// Per-session mutable state.
#[derive(Debug, Default)]
pub struct Session {
    /// The shopping cart.
    pub cart: Cart,

    /// Where the session sits in the checkout flow.
    pub stage: CheckoutStage,

    /// The shipping form; preserved across DETAILS → CART backs.
    pub shipping: ShippingDetails,

    /// Selected payment method id, if any.
    pub payment_method: Option<String>,

    /// Signed-in user. `None` until login.
    pub user: Option<User>,

    /// Last reported device location; `None` when geolocation is denied or
    /// unavailable (non-fatal, nearest-store display degrades).
    pub location: Option<GeoPoint>,

    /// Latch: a place-order call is in flight. Blocks a second submission
    /// until the first resolves.
    pub placing: bool,
}

/// Shared handle to the session.
///
/// ## Usage
/// ```rust,ignore
/// let totals = session.with(|s| s.cart.subtotal()).await;
/// session.with_mut(|s| s.cart.clear()).await;
/// ```
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    inner: Arc<Mutex<Session>>,
}

impl SessionState {
    /// Creates a fresh session (empty cart, CART stage, signed out).
    pub fn new() -> Self {
        SessionState::default()
    }

    /// Runs `f` with read access to the session.
    pub async fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Session) -> R,
    {
        let session = self.inner.lock().await;
        f(&session)
    }

    /// Runs `f` with write access to the session.
    pub async fn with_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Session) -> R,
    {
        let mut session = self.inner.lock().await;
        f(&mut session)
    }
}
