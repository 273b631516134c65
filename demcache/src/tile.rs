//! GTOPO30 tile identification and naming.
//!
//! The global grid is carved into tiles of 40° of longitude × 50° of
//! latitude, identified by their top-left corner. A tile is persisted as a
//! headerless row-major matrix of big-endian `i16` samples named after the
//! corner, e.g. `E100S10.DEM` for (lat −10, lon 100).

/// Columns per full tile (40° × 120 samples/degree).
pub const TILE_COLS: u32 = 4800;

/// Rows per full tile (50° × 120 samples/degree).
pub const TILE_ROWS: u32 = 6000;

/// Degrees of latitude covered by one tile.
pub const TILE_LAT_SPAN: i32 = 50;

/// Degrees of longitude covered by one tile.
pub const TILE_LON_SPAN: i32 = 40;

/// File extension for tile files.
pub const TILE_EXTENSION: &str = "DEM";

/// Identifier of a tile: its top-left corner in whole degrees.
///
/// `lat` is the northern edge, `lon` the western edge; the tile covers
/// latitudes `(lat − 50, lat]` and longitudes `[lon, lon + 40)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileId {
    pub lat: i32,
    pub lon: i32,
}

impl TileId {
    /// The tile covering the given coordinate.
    ///
    /// Snaps down to the tile grid. The east edge of the antimeridian
    /// (`lon = 180`) belongs to the `lon = 140` tile so that every valid
    /// coordinate resolves to exactly one tile that can exist on disk;
    /// likewise `lat = 90` and `lat = −90` resolve without overflow.
    pub fn containing(lat: f64, lon: f64) -> Self {
        let lat = 90 - ((90.0 - lat) / TILE_LAT_SPAN as f64).floor() as i32 * TILE_LAT_SPAN;
        let mut lon = -180 + ((lon + 180.0) / TILE_LON_SPAN as f64).floor() as i32 * TILE_LON_SPAN;
        if lon >= 180 {
            lon = 180 - TILE_LON_SPAN;
        }
        Self { lat, lon }
    }

    /// Whether the coordinate snaps to this tile. Used to detect
    /// tile crossings between reloads.
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        Self::containing(lat, lon) == *self
    }

    /// Canonical file name, e.g. `E100S10.DEM`.
    ///
    /// Longitude first with a 3-digit absolute value, then latitude with a
    /// 2-digit absolute value, compass letters encoding the signs.
    pub fn file_name(&self) -> String {
        format!(
            "{}{:03}{}{:02}.{}",
            if self.lon < 0 { 'W' } else { 'E' },
            self.lon.abs(),
            if self.lat < 0 { 'S' } else { 'N' },
            self.lat.abs(),
            TILE_EXTENSION
        )
    }

    /// Parse a tile file name (with or without the `.DEM` extension) back
    /// into its corner. Returns `None` for names that don't parse or whose
    /// corner doesn't lie on the tile grid.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name
            .strip_suffix(".DEM")
            .or_else(|| name.strip_suffix(".dem"))
            .unwrap_or(name);

        if name.len() != 7 || !name.is_ascii() {
            return None;
        }

        let bytes = name.as_bytes();
        let lon_sign = match bytes[0] {
            b'E' | b'e' => 1,
            b'W' | b'w' => -1,
            _ => return None,
        };
        let lon: i32 = name[1..4].parse().ok()?;
        let lat_sign = match bytes[4] {
            b'N' | b'n' => 1,
            b'S' | b's' => -1,
            _ => return None,
        };
        let lat: i32 = name[5..7].parse().ok()?;

        let id = Self {
            lat: lat * lat_sign,
            lon: lon * lon_sign,
        };

        // Only corners on the tile grid are valid identifiers.
        if (id.lon + 180) % TILE_LON_SPAN != 0 || (90 - id.lat) % TILE_LAT_SPAN != 0 {
            return None;
        }
        Some(id)
    }
}

impl std::fmt::Display for TileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.file_name())
    }
}
