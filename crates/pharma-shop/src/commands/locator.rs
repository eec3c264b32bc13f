//! # Locator Commands
//!
//! Device geolocation intake and nearest-store resolution.
//!
//! Geolocation is optional: when the host denies or lacks it, no location is
//! ever set and [`nearest_store`] reports `None` - the UI shows the store
//! list without a "nearest" badge, and checkout is unaffected.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApiError;
use crate::state::Storefront;
use pharma_core::geo::{self, GeoPoint};
use pharma_core::types::Store;

/// A resolved nearest store with its distance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearestStore {
    pub store: Store,
    pub distance_km: f64,
    /// Human-readable distance ("850 meters", "12.41 km").
    pub distance_text: String,
}

/// Records the device location reported by the host environment.
pub async fn set_user_location(shop: &Storefront, lat: f64, lng: f64) {
    debug!(lat, lng, "set_user_location command");
    shop.session
        .with_mut(|s| s.location = Some(GeoPoint { lat, lng }))
        .await;
}

/// Resolves the store nearest to the session's location.
///
/// Returns `None` when no location has been reported or no stores exist.
pub async fn nearest_store(shop: &Storefront) -> Result<Option<NearestStore>, ApiError> {
    let location = match shop.session.with(|s| s.location).await {
        Some(location) => location,
        None => return Ok(None),
    };

    let stores = shop.db.catalog().stores().await?;
    Ok(geo::nearest_store(location.lat, location.lng, &stores).map(|store| {
        let distance_km = geo::distance_km(location.lat, location.lng, store.lat, store.lng);
        NearestStore {
            store: store.clone(),
            distance_km,
            distance_text: format_distance(distance_km),
        }
    }))
}

/// Formats a distance for display: metres under one kilometre, two-decimal
/// kilometres otherwise.
pub fn format_distance(km: f64) -> String {
    if km < 1.0 {
        format!("{:.0} meters", km * 1000.0)
    } else {
        format!("{:.2} km", km)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
