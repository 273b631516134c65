use std::path::PathBuf;

use anyhow::{Context, Result};
use demcache::{DirTileStore, TileGeometry};

use super::resolve_data_dir;

pub fn run(data_dir: Option<PathBuf>) -> Result<()> {
    let dir = resolve_data_dir(data_dir)?;

    if !dir.exists() {
        anyhow::bail!("Data directory does not exist: {}", dir.display());
    }

    let geometry = TileGeometry::default();
    let store = DirTileStore::new(&dir, geometry);
    let tiles = store.scan_tiles();

    if tiles.is_empty() {
        println!("No .DEM files found in: {}", dir.display());
        return Ok(());
    }

    let mut ok_count = 0;
    let mut zipped_count = 0;
    let mut bad_count = 0;
    let mut total_size: u64 = 0;

    println!("{:<14} {:<28} {:>10}", "TILE", "COVERAGE", "STATUS");
    println!("{}", "-".repeat(54));

    for id in &tiles {
        let coverage = format!(
            "lat {} to {}, lon {} to {}",
            id.lat - 50,
            id.lat,
            id.lon,
            id.lon + 40
        );

        let path = dir.join(id.file_name());
        let status = match std::fs::metadata(&path) {
            Ok(meta) if meta.len() == geometry.byte_len() => {
                ok_count += 1;
                total_size += meta.len();
                "OK"
            }
            Ok(meta) => {
                bad_count += 1;
                total_size += meta.len();
                "BAD SIZE"
            }
            Err(_) => {
                // Only the .DEM.zip exists; it is extracted on first open.
                zipped_count += 1;
                let zip_path = dir.join(format!("{}.zip", id.file_name()));
                total_size += std::fs::metadata(&zip_path)
                    .context("Failed to stat zip archive")?
                    .len();
                "ZIPPED"
            }
        };

        println!("{:<14} {:<28} {:>10}", id.file_name(), coverage, status);
    }

    println!();
    println!("Summary:");
    println!("  Total tiles: {}", tiles.len());
    if ok_count > 0 {
        println!("  Ready: {}", ok_count);
    }
    if zipped_count > 0 {
        println!("  Zipped: {}", zipped_count);
    }
    if bad_count > 0 {
        println!("  Bad size: {}", bad_count);
    }
    println!("  Total size: {}", format_size(total_size));
    println!("  Data directory: {}", dir.display());

    Ok(())
}

fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}
