//! # Geographic Helpers
//!
//! Small pure utilities shared by the journey engine: great-circle distance
//! between coordinate pairs, a walking-duration estimate at a fixed pace, and
//! the region-code → timezone lookup for Australian states and territories.
//!
//! Nothing here touches the network or the filesystem. Address resolution is
//! an upstream responsibility; this module only works with coordinates the
//! caller already has.

use serde::{Deserialize, Serialize};

/// Mean radius of the Earth in kilometres (IUGG value).
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Assumed walking pace for duration estimates.
///
/// 5 km/h is the standard brisk-commuter figure; individual legs can always
/// be pinned with a manual override in the journey config instead.
pub const WALKING_SPEED_KMH: f64 = 5.0;

/// A WGS-84 coordinate pair.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in decimal degrees (negative = southern hemisphere)
    pub lat: f64,
    /// Longitude in decimal degrees
    pub lon: f64,
}

/// Great-circle distance between two coordinates in kilometres (haversine).
pub fn haversine_km(a: Coordinates, b: Coordinates) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lon / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

/// Estimate a walking duration in whole minutes between two coordinates.
///
/// Rounds up so a 30-second hop still shows as one minute; a zero-distance
/// walk is clamped to one minute as well (you still have to cross the road).
pub fn walking_minutes(from: Coordinates, to: Coordinates) -> i64 {
    let km = haversine_km(from, to);
    let minutes = (km / WALKING_SPEED_KMH * 60.0).ceil() as i64;
    minutes.max(1)
}

/// Look up the IANA timezone for an Australian state/territory code.
///
/// Unknown or empty codes fall back to Melbourne, where the reference
/// deployment lives. Matching is case-insensitive.
pub fn timezone_for_region(region: &str) -> &'static str {
    match region.to_ascii_uppercase().as_str() {
        "VIC" => "Australia/Melbourne",
        "NSW" => "Australia/Sydney",
        "QLD" => "Australia/Brisbane",
        "SA" => "Australia/Adelaide",
        "WA" => "Australia/Perth",
        "TAS" => "Australia/Hobart",
        "NT" => "Australia/Darwin",
        "ACT" => "Australia/Canberra",
        _ => "Australia/Melbourne",
    }
}
