//! Basic example demonstrating demcache library usage.
//!
//! Run with: cargo run --example basic -- /path/to/dem/files

use std::env;
use std::sync::Arc;

use demcache::{CacheConfig, DemError, DirTileStore, TerrainCache};

fn main() -> Result<(), DemError> {
    // Get data directory from command line
    let data_dir = env::args().nth(1).unwrap_or_else(|| {
        eprintln!("Usage: cargo run --example basic -- /path/to/dem/files");
        std::process::exit(1);
    });

    let config = CacheConfig::default();
    let store = Arc::new(DirTileStore::new(&data_dir, config.geometry));
    let cache = TerrainCache::new(store, config);

    // A short southbound hop over the Indonesian archipelago
    let fixes = [
        (-6.2, 106.8, 1500.0), // Jakarta area
        (-6.9, 107.6, 2500.0), // Bandung area
        (-7.8, 110.4, 3000.0), // Yogyakarta area
    ];

    println!("Track replay:");
    println!("{:-<60}", "");

    for (lat, lon, alt) in &fixes {
        // The policy re-pages the window when the position warrants it.
        cache.maintain_blocking(*lat, *lon);

        let elevation = cache.elevation_at(*lat, *lon);
        match elevation.sample {
            Some(elev) => {
                let agl = cache.agl(*lat, *lon, *alt).unwrap_or(0.0);
                println!("({lat:7.3}, {lon:8.3}): terrain {elev}m, AGL {agl:.0}m");
            }
            None if elevation.valid => {
                println!("({lat:7.3}, {lon:8.3}): no data (sea or void)");
            }
            None => {
                println!("({lat:7.3}, {lon:8.3}): terrain unavailable");
            }
        }
    }

    let stats = cache.stats();
    println!("\nReload statistics:");
    println!("  Completed: {}", stats.completed);
    println!("  Failed: {}", stats.failed);

    Ok(())
}
