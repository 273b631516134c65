//! Error types for the demcache library.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when working with DEM tile data.
#[derive(Error, Debug)]
pub enum DemError {
    /// IO error when reading tile files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Latitude/longitude outside the valid range, non-finite, or the
    /// degenerate (0, 0) "no fix" origin.
    #[error("Invalid coordinate: lat={lat}, lon={lon} (valid: lat ±90°, lon ±180°, excluding 0/0)")]
    InvalidCoordinate { lat: f64, lon: f64 },

    /// The required .DEM file was not found in the tile store.
    #[error("DEM tile not found: {path}")]
    TileUnavailable { path: PathBuf },

    /// Tile file exists but its size doesn't match the configured geometry.
    #[error("Unexpected tile size for {path}: {size} bytes (expected {expected})")]
    UnexpectedFileSize {
        path: PathBuf,
        size: u64,
        expected: u64,
    },

    /// A row read returned fewer bytes than the clip region requires.
    #[error("Truncated tile read: expected {expected} bytes, got {read}")]
    TruncatedRead { expected: usize, read: usize },
}

/// Result type alias using [`DemError`].
pub type Result<T> = std::result::Result<T, DemError>;
