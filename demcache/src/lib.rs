//! # demcache - GTOPO30 Terrain Window Cache
//!
//! Serves O(1) ground-elevation queries against the global GTOPO30 raster
//! without holding it in memory: a small square window of samples around
//! the aircraft's position is kept in RAM and transparently re-paged as the
//! position approaches the window's edge or crosses a tile boundary.
//!
//! ## Features
//!
//! - **O(1) queries**: a point lookup is index math and a bounds check,
//!   never I/O — safe on a rendering hot path
//! - **Partial reads**: reloads read only the window's intersection with
//!   the tile file, row by row
//! - **Background reloads**: a fresh window is built off to the side and
//!   swapped in whole, so queries never see a half-loaded buffer
//! - **Offline**: works against a local directory of `.DEM` files
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use demcache::{CacheConfig, DirTileStore, TerrainCache};
//!
//! let config = CacheConfig::default();
//! let store = Arc::new(DirTileStore::new("/data/terrain", config.geometry));
//! let cache = Arc::new(TerrainCache::new(store, config));
//!
//! // On each position update (reload runs in the background if needed):
//! cache.maintain(-10.5, 100.5);
//!
//! // On the render path:
//! let elevation = cache.elevation_at(-10.5, 100.5);
//! if elevation.valid {
//!     println!("Terrain: {:?} m", elevation.sample);
//! }
//! ```
//!
//! ## GTOPO30 Data Format
//!
//! The dataset is carved into tiles of 40° of longitude × 50° of latitude
//! at 30 arc-second spacing (120 samples per degree). Each tile is a
//! headerless, row-major matrix of 4800 × 6000 big-endian `i16` samples —
//! elevation in meters — named after its top-left corner (e.g.
//! `E100S10.DEM` for latitude −10, longitude 100). Zero and negative
//! samples mean "no data" (sea, voids).
//!
//! ## Data Sources
//!
//! GTOPO30 tiles are published by USGS EROS:
//! - <https://www.usgs.gov/centers/eros/science/usgs-eros-archive-digital-elevation-global-30-arc-second-elevation-gtopo30>

pub mod cache;
pub mod config;
pub mod error;
pub mod grid;
pub mod loader;
pub mod store;
pub mod tile;
pub mod window;

// Re-export main types at crate root for convenience
pub use cache::{Elevation, ReloadStats, TerrainCache, SENTINEL};
pub use config::{CacheConfig, TileGeometry};
pub use error::{DemError, Result};
pub use store::{DirTileStore, TileData, TileStore};
pub use tile::TileId;
pub use window::WindowBuffer;
