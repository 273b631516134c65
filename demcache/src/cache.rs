//! The terrain cache facade: reload policy, validity contract, and the
//! query surface consumed by the render loop and AGL computation.
//!
//! Reloads build a fresh [`WindowBuffer`] off to the side and swap it in
//! whole once fully populated, so a query never observes a window whose
//! origin moved ahead of its samples. At most one reload is in flight at a
//! time; a trigger that fires during a reload is dropped and re-fires on a
//! later position poll.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{info, warn};

use crate::config::CacheConfig;
use crate::error::{DemError, Result};
use crate::grid;
use crate::loader;
use crate::store::TileStore;
use crate::tile::TileId;
use crate::window::WindowBuffer;

/// Reserved value returned for queries outside the cached window or over
/// no-data cells, distinct from any real elevation.
pub const SENTINEL: i16 = -9999;

/// Result of an elevation query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Elevation {
    /// The cached sample, or `None` outside the window / over no-data.
    pub sample: Option<i16>,
    /// Whether the window fully reflects the current tile. Queries made
    /// while `false` are unreliable but not errors.
    pub valid: bool,
}

impl Elevation {
    /// Collapse to the legacy sentinel interface: the sample value, or
    /// [`SENTINEL`] when there is none.
    pub fn value_or_sentinel(&self) -> i16 {
        self.sample.unwrap_or(SENTINEL)
    }
}

/// Reload counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReloadStats {
    /// Reloads that completed without error.
    pub completed: u64,
    /// Reloads that failed; the previous window was retained.
    pub failed: u64,
}

/// Windowed elevation cache over a [`TileStore`].
pub struct TerrainCache {
    store: Arc<dyn TileStore>,
    config: CacheConfig,
    window: RwLock<Option<Arc<WindowBuffer>>>,
    valid: AtomicBool,
    reloading: AtomicBool,
    completed: AtomicU64,
    failed: AtomicU64,
}

impl TerrainCache {
    pub fn new(store: Arc<dyn TileStore>, config: CacheConfig) -> Self {
        Self {
            store,
            config,
            window: RwLock::new(None),
            valid: AtomicBool::new(false),
            reloading: AtomicBool::new(false),
            completed: AtomicU64::new(0),
            failed: AtomicU64::new(0),
        }
    }

    /// Elevation at a coordinate, from the cached window only. O(1), no
    /// I/O, safe on the rendering hot path.
    pub fn elevation_at(&self, lat: f64, lon: f64) -> Elevation {
        let valid = self.valid.load(Ordering::Acquire);
        let guard = self.read_window();
        let sample = guard
            .as_ref()
            .and_then(|w| w.query(lat, lon))
            .filter(|&v| v > 0);
        Elevation { sample, valid }
    }

    /// Height above ground in the dataset's units (meters for GTOPO30),
    /// clamped at zero. `None` while the window is invalid or over
    /// no-data / out-of-window cells.
    pub fn agl(&self, lat: f64, lon: f64, altitude_msl: f64) -> Option<f64> {
        let elevation = self.elevation_at(lat, lon);
        if !elevation.valid {
            return None;
        }
        elevation
            .sample
            .map(|s| (altitude_msl - s as f64).max(0.0))
    }

    /// Whether the window fully reflects the current tile.
    pub fn is_valid(&self) -> bool {
        self.valid.load(Ordering::Acquire)
    }

    /// The tile the current window was loaded from, if any.
    pub fn loaded_tile(&self) -> Option<TileId> {
        self.read_window().as_ref().map(|w| w.tile())
    }

    /// The center the current window was built around, if any.
    pub fn window_center(&self) -> Option<(f64, f64)> {
        self.read_window().as_ref().map(|w| w.center())
    }

    pub fn stats(&self) -> ReloadStats {
        ReloadStats {
            completed: self.completed.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }

    /// Policy check with background reload: when the position warrants a
    /// new window, spawn a worker to build and swap it. Returns whether a
    /// reload was started. Queries keep serving the previous window until
    /// the swap.
    pub fn maintain(self: &Arc<Self>, lat: f64, lon: f64) -> bool {
        if !self.begin_reload(lat, lon) {
            return false;
        }
        let cache = Arc::clone(self);
        std::thread::spawn(move || cache.finish_reload(lat, lon));
        true
    }

    /// Policy check with an inline reload, for single-threaded cooperative
    /// callers. Returns whether a reload ran.
    pub fn maintain_blocking(&self, lat: f64, lon: f64) -> bool {
        if !self.begin_reload(lat, lon) {
            return false;
        }
        self.finish_reload(lat, lon);
        true
    }

    /// Re-center and load the window for a position unconditionally.
    ///
    /// The validity flag drops at the start and is raised only after a
    /// complete, error-free load; on failure the previous window keeps
    /// serving (stale) samples and the error is returned.
    pub fn reload(&self, lat: f64, lon: f64) -> Result<()> {
        if !grid::is_valid_location(lat, lon) {
            return Err(DemError::InvalidCoordinate { lat, lon });
        }
        self.valid.store(false, Ordering::Release);

        match self.build_window(lat, lon) {
            Ok((window, populated)) => {
                info!(tile = %window.tile(), populated, "terrain window loaded");
                *self.write_window() = Some(Arc::new(window));
                self.valid.store(true, Ordering::Release);
                self.completed.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "terrain window load failed, keeping previous window");
                self.failed.fetch_add(1, Ordering::Relaxed);
                Err(e)
            }
        }
    }

    /// The Stable→Reloading transition: validity check, reload policy, and
    /// the single-flight claim.
    fn begin_reload(&self, lat: f64, lon: f64) -> bool {
        if !grid::is_valid_location(lat, lon) {
            return false;
        }
        if !self.needs_reload(lat, lon) {
            return false;
        }
        self.reloading
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    fn finish_reload(&self, lat: f64, lon: f64) {
        // Errors are already counted and logged; the next poll retries.
        let _ = self.reload(lat, lon);
        self.reloading.store(false, Ordering::Release);
    }

    /// Whether the position warrants a new window: never loaded, the
    /// look-ahead horizon no longer fits inside the window, or the
    /// position left the loaded tile.
    fn needs_reload(&self, lat: f64, lon: f64) -> bool {
        let guard = self.read_window();
        let Some(window) = guard.as_ref() else {
            return true;
        };

        let (lat0, lon0) = window.center();
        let distance = grid::distance_nm(lat0, lon0, lat, lon);
        // Window cells are 0.5 nm of latitude, so a quarter of the side as
        // a raw count equals the window's half-extent in nautical miles.
        let margin = self.config.window_size as f64 / 4.0;

        distance + self.config.horizon_nm > margin
            || (distance != 0.0 && !window.tile().contains(lat, lon))
    }

    fn build_window(&self, lat: f64, lon: f64) -> Result<(WindowBuffer, u64)> {
        let tile = TileId::containing(lat, lon);
        let mut window = WindowBuffer::new(tile, lat, lon, self.config.window_size);
        let mut src = self.store.open(tile)?;
        let populated = loader::load_window(src.as_mut(), &mut window, self.config.geometry)?;
        Ok((window, populated))
    }

    fn read_window(&self) -> RwLockReadGuard<'_, Option<Arc<WindowBuffer>>> {
        self.window.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_window(&self) -> RwLockWriteGuard<'_, Option<Arc<WindowBuffer>>> {
        self.window.write().unwrap_or_else(|e| e.into_inner())
    }
}
