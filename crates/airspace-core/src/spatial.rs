//! Distance calculations used by the conflict detector.

use crate::models::Position;

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Calculate great-circle distance between two points in kilometers using the
/// Haversine formula.
///
/// # Arguments
/// * `lat1`, `lon1` - First point coordinates in decimal degrees
/// * `lat2`, `lon2` - Second point coordinates in decimal degrees
///
/// # Returns
/// Distance in kilometers
pub fn haversine_distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let dphi = (lat2 - lat1).to_radians();
    let dlambda = (lon2 - lon1).to_radians();
    let a = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Great-circle distance between two positions in kilometers.
pub fn position_distance_km(p1: &Position, p2: &Position) -> f64 {
    haversine_distance_km(p1.lat, p1.lon, p2.lat, p2.lon)
}

/// Euclidean distance treating (lat, lon) as flat (y, x) coordinates.
///
/// Units are whatever the coordinates are in; no projection is applied.
pub fn planar_distance(p1: &Position, p2: &Position) -> f64 {
    let dx = p1.lon - p2.lon;
    let dy = p1.lat - p2.lat;
    (dx * dx + dy * dy).sqrt()
}
