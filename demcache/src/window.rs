//! The sliding window buffer.
//!
//! A small square cache of elevation samples around the last load center.
//! The buffer tracks its tile-local origin `(x0, y0)` — the tile column/row
//! of its top-left cell — so that a point query is a subtraction and a
//! bounds check, never I/O.

use crate::grid::{self, SAMPLES_PER_DEGREE};
use crate::tile::TileId;

/// Fill value meaning "no data" inside the window. Tile samples that are
/// zero or negative never overwrite it during a load.
pub const NO_DATA: i16 = 0;

/// Fixed-size square cache of `i16` samples with a tile-local origin.
pub struct WindowBuffer {
    samples: Vec<i16>,
    size: u32,
    x0: i32,
    y0: i32,
    tile: TileId,
    lat0: f64,
    lon0: f64,
}

impl WindowBuffer {
    /// Build a window of side `size` centered on `(lat0, lon0)` within
    /// `tile`, filled with [`NO_DATA`].
    ///
    /// The center is copied at construction; the origin may be negative or
    /// extend past the tile when the center is near a tile edge — the
    /// loader clips, the query path bounds-checks.
    pub fn new(tile: TileId, lat0: f64, lon0: f64, size: u32) -> Self {
        let half = size as i32 / 2;
        let x0 = ((lon0 - tile.lon as f64).abs() * SAMPLES_PER_DEGREE).floor() as i32 - half;
        let y0 = ((lat0 - tile.lat as f64).abs() * SAMPLES_PER_DEGREE).floor() as i32 - half;
        Self {
            samples: vec![NO_DATA; size as usize * size as usize],
            size,
            x0,
            y0,
            tile,
            lat0,
            lon0,
        }
    }

    /// Set every cell to `value`.
    pub fn fill(&mut self, value: i16) {
        self.samples.fill(value);
    }

    /// Write a sample at buffer-local coordinates.
    pub(crate) fn set(&mut self, bx: u32, by: u32, value: i16) {
        self.samples[by as usize * self.size as usize + bx as usize] = value;
    }

    /// Read a sample at buffer-local coordinates, or `None` outside the
    /// buffer.
    pub fn get(&self, bx: i64, by: i64) -> Option<i16> {
        if bx < 0 || by < 0 || bx >= self.size as i64 || by >= self.size as i64 {
            return None;
        }
        Some(self.samples[by as usize * self.size as usize + bx as usize])
    }

    /// Look up the stored sample for a coordinate.
    ///
    /// Maps the coordinate to tile-local indices in this window's tile
    /// context, subtracts the origin, and bounds-checks. Returns `None`
    /// outside the window (the caller supplies the sentinel) and the raw
    /// stored sample inside it, including the [`NO_DATA`] fill. O(1) and
    /// allocation-free.
    pub fn query(&self, lat: f64, lon: f64) -> Option<i16> {
        let (row, col) = grid::tile_index(lat, lon, self.tile)?;
        self.get(col - self.x0 as i64, row - self.y0 as i64)
    }

    /// Tile-local column/row of the buffer's top-left corner.
    pub fn origin(&self) -> (i32, i32) {
        (self.x0, self.y0)
    }

    /// Side of the buffer in samples.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// The tile this window was loaded from.
    pub fn tile(&self) -> TileId {
        self.tile
    }

    /// The center the window was built around.
    pub fn center(&self) -> (f64, f64) {
        (self.lat0, self.lon0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TILE: TileId = TileId { lat: -10, lon: 100 };

    #[test]
    fn test_origin_reference_scenario() {
        // Center at tile cell (60, 60) with a 600-cell window puts the
        // origin a quarter window off the tile's top-left.
        let window = WindowBuffer::new(TILE, -10.5, 100.5, 600);
        assert_eq!(window.origin(), (-240, -240));
        assert_eq!(window.center(), (-10.5, 100.5));
    }

    #[test]
    fn test_origin_interior() {
        // Center deep inside the tile: origin fully on-tile.
        let window = WindowBuffer::new(TILE, -35.0, 120.0, 600);
        // Tile cell (3000, 2400), minus half the window.
        assert_eq!(window.origin(), (2100, 2700));
    }

    #[test]
    fn test_query_center_cell() {
        let mut window = WindowBuffer::new(TILE, -10.5, 100.5, 600);
        // Tile cell (60, 60) is buffer cell (300, 300).
        window.set(300, 300, 1234);
        assert_eq!(window.query(-10.5, 100.5), Some(1234));
    }

    #[test]
    fn test_query_out_of_window() {
        let window = WindowBuffer::new(TILE, -35.0, 120.0, 600);
        // Far side of the tile, well outside 600 cells.
        assert_eq!(window.query(-12.0, 101.0), None);
        assert_eq!(window.query(-59.0, 139.0), None);
    }

    #[test]
    fn test_query_returns_fill_inside_window() {
        let window = WindowBuffer::new(TILE, -35.0, 120.0, 600);
        assert_eq!(window.query(-35.0, 120.0), Some(NO_DATA));
    }

    #[test]
    fn test_query_non_finite() {
        let window = WindowBuffer::new(TILE, -35.0, 120.0, 600);
        assert_eq!(window.query(f64::NAN, 120.0), None);
    }

    #[test]
    fn test_fill() {
        let mut window = WindowBuffer::new(TILE, -35.0, 120.0, 8);
        window.fill(77);
        assert_eq!(window.query(-35.0, 120.0), Some(77));
    }

    #[test]
    fn test_window_edges() {
        let mut window = WindowBuffer::new(TILE, -35.0, 120.0, 600);
        window.set(0, 0, 11);
        window.set(599, 599, 22);
        assert_eq!(window.get(0, 0), Some(11));
        assert_eq!(window.get(599, 599), Some(22));
        assert_eq!(window.get(-1, 0), None);
        assert_eq!(window.get(600, 0), None);
    }
}
