//! # Geo Module
//!
//! Great-circle distance math and nearest-store lookup.
//!
//! Pure functions over coordinates the host environment supplies. When
//! geolocation is denied or unavailable these are simply never called; the
//! nearest-store display degrades to "unknown" and checkout is unaffected.

use serde::{Deserialize, Serialize};

use crate::types::Store;

/// Earth radius in kilometres (mean radius).
const EARTH_RADIUS_KM: f64 = 6371.0;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// Great-circle distance between two coordinates via the haversine formula,
/// in kilometres.
///
/// Deterministic and symmetric: `distance_km(a, b) == distance_km(b, a)`
/// within floating-point tolerance.
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Returns the store closest to the given coordinates, or `None` for an
/// empty list. Ties keep the earliest store in the slice.
pub fn nearest_store(lat: f64, lng: f64, stores: &[Store]) -> Option<&Store> {
    let mut best: Option<(&Store, f64)> = None;

    for store in stores {
        let d = distance_km(lat, lng, store.lat, store.lng);
        match best {
            Some((_, min)) if d >= min => {}
            _ => best = Some((store, d)),
        }
    }

    best.map(|(store, _)| store)
}
