//! Global-grid addressing.
//!
//! The GTOPO30 raster is a conceptual global grid at 30 arc-second spacing:
//! 120 samples per degree of latitude and longitude. Any coordinate maps
//! deterministically to an integer row/column of the tile that covers it.

use crate::tile::TileId;

/// Samples per degree of latitude/longitude (30 arc-seconds).
pub const SAMPLES_PER_DEGREE: f64 = 120.0;

/// Mean Earth radius in nautical miles.
const EARTH_RADIUS_NM: f64 = 3440.065;

/// Map a coordinate to the tile-local `(row, col)` of the given tile.
///
/// Rows count down from the tile's top-left latitude, columns count east
/// from its top-left longitude. No bounds check is applied: coordinates
/// outside the tile yield indices that are negative or beyond the tile
/// extent, which callers clip or reject. Returns `None` for non-finite
/// input.
pub fn tile_index(lat: f64, lon: f64, tile: TileId) -> Option<(i64, i64)> {
    if !lat.is_finite() || !lon.is_finite() {
        return None;
    }
    let row = ((lat - tile.lat as f64).abs() * SAMPLES_PER_DEGREE).floor() as i64;
    let col = ((lon - tile.lon as f64).abs() * SAMPLES_PER_DEGREE).floor() as i64;
    Some((row, col))
}

/// Whether a position is usable for tile selection and reloads.
///
/// The exact origin (0, 0) is treated as "no GPS fix yet", not a real
/// location, so reload attempts are suppressed for it.
pub fn is_valid_location(lat: f64, lon: f64) -> bool {
    if !lat.is_finite() || !lon.is_finite() {
        return false;
    }
    if lat == 0.0 && lon == 0.0 {
        return false;
    }
    lat.abs() <= 90.0 && lon.abs() <= 180.0
}

/// Great-circle distance between two coordinates in nautical miles.
///
/// Haversine on a spherical Earth; accurate to well under the half-cell
/// resolution the reload policy cares about.
pub fn distance_nm(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let dphi = (lat2 - lat1).to_radians();
    let dlambda = (lon2 - lon1).to_radians();

    let a = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * a.sqrt().asin() * EARTH_RADIUS_NM
}
