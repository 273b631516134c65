//! Cache configuration.

use crate::tile::{TILE_COLS, TILE_ROWS};

/// Dimensions of a tile file in samples.
///
/// The GTOPO30 default is 4800 × 6000. Tests and alternative datasets can
/// substitute smaller geometries; the loader and store take the geometry as
/// a parameter rather than assuming the global constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileGeometry {
    pub cols: u32,
    pub rows: u32,
}

impl TileGeometry {
    /// Expected byte length of a tile file: two bytes per sample, row-major.
    pub fn byte_len(&self) -> u64 {
        self.cols as u64 * self.rows as u64 * 2
    }
}

impl Default for TileGeometry {
    fn default() -> Self {
        Self {
            cols: TILE_COLS,
            rows: TILE_ROWS,
        }
    }
}

/// Tunables for the terrain cache.
///
/// `window_size` and `horizon_nm` are configuration, not contracts: the
/// window must simply be large enough that the look-ahead horizon fits with
/// margin. With the defaults, window cells are 0.5 nm of latitude, the
/// window spans 300 nm, and a reload triggers roughly 120 nm from the last
/// load center.
#[derive(Debug, Clone, Copy)]
pub struct CacheConfig {
    /// Side of the square window buffer in samples.
    pub window_size: u32,
    /// Look-ahead distance in nautical miles for the reload trigger.
    pub horizon_nm: f64,
    /// Dimensions of the tile files in the store.
    pub geometry: TileGeometry,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            window_size: 600,
            horizon_nm: 30.0,
            geometry: TileGeometry::default(),
        }
    }
}
