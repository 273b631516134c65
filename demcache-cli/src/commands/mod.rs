use anyhow::{Context, Result};
use std::path::PathBuf;

pub mod info;
pub mod list;
pub mod query;
pub mod track;

/// Resolve the tile directory from the flag or the environment.
pub fn resolve_data_dir(data_dir: Option<PathBuf>) -> Result<PathBuf> {
    match data_dir {
        Some(dir) => Ok(dir),
        None => {
            let dir = std::env::var("DEM_DATA_DIR").context(
                "DEM_DATA_DIR environment variable not set. Use --data-dir or set DEM_DATA_DIR",
            )?;
            Ok(PathBuf::from(dir))
        }
    }
}
