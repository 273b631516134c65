use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use demcache::{CacheConfig, DirTileStore, TerrainCache};
use serde::Serialize;

use super::resolve_data_dir;

#[derive(Serialize)]
struct ElevationResponse {
    lat: f64,
    lon: f64,
    elevation: Option<i16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    agl: Option<f64>,
    valid: bool,
}

pub fn run(
    data_dir: Option<PathBuf>,
    window_size: u32,
    horizon_nm: f64,
    lat: f64,
    lon: f64,
    alt: Option<f64>,
    json: bool,
) -> Result<()> {
    let dir = resolve_data_dir(data_dir)?;

    let config = CacheConfig {
        window_size,
        horizon_nm,
        ..CacheConfig::default()
    };
    let store = Arc::new(DirTileStore::new(&dir, config.geometry));
    let cache = TerrainCache::new(store, config);

    cache
        .reload(lat, lon)
        .context("Failed to load terrain window")?;

    let elevation = cache.elevation_at(lat, lon);
    let agl = alt.and_then(|a| cache.agl(lat, lon, a));

    if json {
        let response = ElevationResponse {
            lat,
            lon,
            elevation: elevation.sample,
            agl,
            valid: elevation.valid,
        };
        println!("{}", serde_json::to_string(&response)?);
    } else {
        match elevation.sample {
            Some(elev) => println!("{} m", elev),
            None => println!("no data"),
        }
        if let Some(agl) = agl {
            println!("AGL: {:.0} m", agl);
        }
    }

    Ok(())
}
