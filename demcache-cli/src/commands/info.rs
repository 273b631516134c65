use std::path::PathBuf;

use anyhow::{bail, Result};
use demcache::{TileGeometry, TileId};

use super::resolve_data_dir;

pub fn run(
    data_dir: Option<PathBuf>,
    tile: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
) -> Result<()> {
    let id = match (tile, lat, lon) {
        (Some(name), _, _) => match TileId::from_name(&name) {
            Some(id) => id,
            None => bail!("Not a valid tile name: {}", name),
        },
        (None, Some(lat), Some(lon)) => TileId::containing(lat, lon),
        _ => bail!("Specify a tile name or both --lat and --lon"),
    };

    let geometry = TileGeometry::default();

    println!("Tile:      {}", id.file_name());
    println!("Corner:    lat {} (north edge), lon {} (west edge)", id.lat, id.lon);
    println!(
        "Coverage:  lat {} to {}, lon {} to {}",
        id.lat - 50,
        id.lat,
        id.lon,
        id.lon + 40
    );
    println!(
        "Layout:    {} x {} samples, {} bytes, big-endian i16 (meters)",
        geometry.cols,
        geometry.rows,
        geometry.byte_len()
    );

    if let Ok(dir) = resolve_data_dir(data_dir) {
        let path = dir.join(id.file_name());
        let zip_path = dir.join(format!("{}.zip", id.file_name()));
        if let Ok(meta) = std::fs::metadata(&path) {
            let status = if meta.len() == geometry.byte_len() {
                "OK"
            } else {
                "WRONG SIZE"
            };
            println!("File:      {} ({} bytes, {})", path.display(), meta.len(), status);
        } else if zip_path.exists() {
            println!("File:      {} (zipped)", zip_path.display());
        } else {
            println!("File:      {} (missing)", path.display());
        }
    }

    Ok(())
}
