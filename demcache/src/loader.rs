//! Partial tile loading.
//!
//! Populates a [`WindowBuffer`] from a tile's binary data, reading only the
//! bytes of the window's intersection with the tile. Samples are big-endian
//! `i16`; zero and negative samples mean "no data" and never overwrite the
//! window's fill value.

use std::io::{ErrorKind, Read, Seek, SeekFrom};

use tracing::warn;

use crate::config::TileGeometry;
use crate::error::{DemError, Result};
use crate::window::WindowBuffer;

/// Load the window's on-tile intersection from `src`.
///
/// Clips `[x0, x0+size) × [y0, y0+size)` against the tile extent, then per
/// clipped row seeks to `2·(y·cols + x1)` and reads the `x2 − x1` samples
/// of that row. Off-tile regions of the window are left untouched, as is
/// any cell whose tile sample is zero or negative.
///
/// Returns the number of cells populated. On a short read the cells decoded
/// so far are kept and [`DemError::TruncatedRead`] is returned; the window
/// then holds a partial load and the caller must not mark it valid.
pub fn load_window<R: Read + Seek + ?Sized>(
    src: &mut R,
    window: &mut WindowBuffer,
    geometry: TileGeometry,
) -> Result<u64> {
    let size = window.size() as i64;
    let (x0, y0) = window.origin();
    let (x0, y0) = (x0 as i64, y0 as i64);
    let cols = geometry.cols as i64;
    let rows = geometry.rows as i64;

    let x1 = x0.max(0);
    let x2 = (x0 + size).min(cols);
    let y1 = y0.max(0);
    let y2 = (y0 + size).min(rows);

    // Window entirely off-tile: nothing to read, the fill stands.
    if x1 >= x2 || y1 >= y2 {
        return Ok(0);
    }

    let row_bytes = ((x2 - x1) * 2) as usize;
    let mut raw = vec![0u8; row_bytes];
    let mut populated = 0u64;

    for y in y1..y2 {
        let offset = 2 * (y * cols + x1) as u64;
        src.seek(SeekFrom::Start(offset))?;

        let mut read = 0;
        let mut eof = false;
        while read < row_bytes {
            match src.read(&mut raw[read..]) {
                Ok(0) => {
                    eof = true;
                    break;
                }
                Ok(n) => read += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }

        // Decode whatever arrived, complete samples only.
        let base_bx = (x1 - x0) as u32;
        let by = (y - y0) as u32;
        for (i, pair) in raw[..read - read % 2].chunks_exact(2).enumerate() {
            let c = i16::from_be_bytes([pair[0], pair[1]]);
            if c > 0 {
                window.set(base_bx + i as u32, by, c);
                populated += 1;
            }
        }

        if eof {
            warn!(
                tile = %window.tile(),
                row = y,
                expected = row_bytes,
                read,
                "truncated tile read, keeping partial window"
            );
            return Err(DemError::TruncatedRead {
                expected: row_bytes,
                read,
            });
        }
    }

    Ok(populated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::TileId;
    use crate::window::NO_DATA;
    use std::io::Cursor;

    const TILE: TileId = TileId { lat: -10, lon: 100 };
    const GEOMETRY: TileGeometry = TileGeometry { cols: 10, rows: 8 };

    /// Synthetic tile where cell (row, col) holds `row·10 + col + 1`.
    fn synthetic_tile() -> Vec<u8> {
        let mut data = Vec::with_capacity(GEOMETRY.byte_len() as usize);
        for row in 0..GEOMETRY.rows {
            for col in 0..GEOMETRY.cols {
                let v = (row * 10 + col + 1) as i16;
                data.extend_from_slice(&v.to_be_bytes());
            }
        }
        data
    }

    fn tile_value(row: i64, col: i64) -> i16 {
        (row * 10 + col + 1) as i16
    }

    // Centers chosen so the degree offsets are exact in binary floating
    // point: 1/32° = 3.75 cells, 1/16° = 7.5 cells, 5/64° = 9.375 cells.

    #[test]
    fn test_load_fully_inside() {
        // Center at tile cell (3, 3), window 4: origin (1, 1), fully on-tile.
        let mut window = WindowBuffer::new(TILE, -10.03125, 100.03125, 4);
        assert_eq!(window.origin(), (1, 1));

        let mut src = Cursor::new(synthetic_tile());
        let populated = load_window(&mut src, &mut window, GEOMETRY).unwrap();
        assert_eq!(populated, 16);

        for by in 0..4 {
            for bx in 0..4 {
                assert_eq!(window.get(bx, by), Some(tile_value(1 + by, 1 + bx)));
            }
        }

        // The query path sees the exact loaded value for the center cell.
        assert_eq!(window.query(-10.03125, 100.03125), Some(tile_value(3, 3)));
    }

    #[test]
    fn test_load_clipped_west_north() {
        // Center at tile cell (0, 0): origin (-2, -2), only the southeast
        // quadrant of the window overlaps the tile.
        let mut window = WindowBuffer::new(TILE, -10.001, 100.001, 4);
        assert_eq!(window.origin(), (-2, -2));

        let mut src = Cursor::new(synthetic_tile());
        let populated = load_window(&mut src, &mut window, GEOMETRY).unwrap();
        assert_eq!(populated, 4);

        // Off-tile cells keep the fill.
        assert_eq!(window.get(0, 0), Some(NO_DATA));
        assert_eq!(window.get(1, 3), Some(NO_DATA));
        // Tile cell (0, 0) lands at buffer (2, 2): the same mapping the
        // query path uses.
        assert_eq!(window.get(2, 2), Some(tile_value(0, 0)));
        assert_eq!(window.get(3, 3), Some(tile_value(1, 1)));
        assert_eq!(window.query(-10.001, 100.001), Some(tile_value(0, 0)));
    }

    #[test]
    fn test_load_clipped_east_south() {
        // Center at tile cell (7, 9): origin (7, 5), window spills past the
        // east and south edges.
        let mut window = WindowBuffer::new(TILE, -10.0625, 100.078125, 4);
        assert_eq!(window.origin(), (7, 5));

        let mut src = Cursor::new(synthetic_tile());
        let populated = load_window(&mut src, &mut window, GEOMETRY).unwrap();
        assert_eq!(populated, 9);

        assert_eq!(window.get(0, 0), Some(tile_value(5, 7)));
        assert_eq!(window.get(2, 2), Some(tile_value(7, 9)));
        // Past the tile extent: fill.
        assert_eq!(window.get(3, 0), Some(NO_DATA));
        assert_eq!(window.get(0, 3), Some(NO_DATA));
    }

    #[test]
    fn test_load_fully_off_tile() {
        // Center half a degree past the data: origin (58, 58) on a 10×8
        // tile, empty intersection.
        let mut window = WindowBuffer::new(TILE, -10.5, 100.5, 4);
        assert_eq!(window.origin(), (58, 58));

        let mut src = Cursor::new(synthetic_tile());
        let populated = load_window(&mut src, &mut window, GEOMETRY).unwrap();
        assert_eq!(populated, 0);
        assert_eq!(window.get(0, 0), Some(NO_DATA));
    }

    #[test]
    fn test_no_data_samples_preserved() {
        // Zero and negative tile samples must not overwrite the fill.
        let mut data = synthetic_tile();
        let zero_at = (2 * GEOMETRY.cols + 2) as usize * 2; // cell (2, 2)
        data[zero_at..zero_at + 2].copy_from_slice(&0i16.to_be_bytes());
        let neg_at = (3 * GEOMETRY.cols + 3) as usize * 2; // cell (3, 3)
        data[neg_at..neg_at + 2].copy_from_slice(&(-500i16).to_be_bytes());

        let mut window = WindowBuffer::new(TILE, -10.03125, 100.03125, 4);
        let mut src = Cursor::new(data);
        let populated = load_window(&mut src, &mut window, GEOMETRY).unwrap();
        assert_eq!(populated, 14);

        // Both cells stay at the fill, not 0-from-file or -500.
        assert_eq!(window.get(1, 1), Some(NO_DATA)); // tile (2, 2)
        assert_eq!(window.get(2, 2), Some(NO_DATA)); // tile (3, 3)
        assert_eq!(window.get(0, 0), Some(tile_value(1, 1)));
    }

    #[test]
    fn test_truncated_read() {
        // Cut the file off in the middle of the window's third row.
        let full = synthetic_tile();
        let cut = (3 * GEOMETRY.cols + 3) as usize * 2; // mid row y=3
        let data = full[..cut].to_vec();

        let mut window = WindowBuffer::new(TILE, -10.03125, 100.03125, 4);
        let err = load_window(&mut Cursor::new(data), &mut window, GEOMETRY).unwrap_err();
        assert!(matches!(err, DemError::TruncatedRead { .. }));

        // Rows before the truncation were populated and are kept.
        assert_eq!(window.get(0, 0), Some(tile_value(1, 1)));
        assert_eq!(window.get(3, 1), Some(tile_value(2, 4)));
        // The partial row kept what arrived.
        assert_eq!(window.get(0, 2), Some(tile_value(3, 1)));
        assert_eq!(window.get(1, 2), Some(tile_value(3, 2)));
        // Nothing after the cut.
        assert_eq!(window.get(2, 2), Some(NO_DATA));
        assert_eq!(window.get(0, 3), Some(NO_DATA));
    }
}
