use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use demcache::{CacheConfig, DirTileStore, TerrainCache};
use indicatif::{ProgressBar, ProgressStyle};

use super::resolve_data_dir;

#[allow(clippy::too_many_arguments)]
pub fn run(
    data_dir: Option<PathBuf>,
    window_size: u32,
    horizon_nm: f64,
    input: PathBuf,
    output: Option<PathBuf>,
    lat_col: String,
    lon_col: String,
    alt_col: String,
) -> Result<()> {
    let dir = resolve_data_dir(data_dir)?;

    let config = CacheConfig {
        window_size,
        horizon_nm,
        ..CacheConfig::default()
    };
    let store = Arc::new(DirTileStore::new(&dir, config.geometry));
    let cache = TerrainCache::new(store, config);

    let file = File::open(&input).context("Failed to open input file")?;
    let mut reader = csv::Reader::from_reader(BufReader::new(file));

    // Find column indices
    let headers = reader.headers()?.clone();
    let lat_idx = headers
        .iter()
        .position(|h| h == lat_col)
        .with_context(|| format!("Column '{}' not found in CSV", lat_col))?;
    let lon_idx = headers
        .iter()
        .position(|h| h == lon_col)
        .with_context(|| format!("Column '{}' not found in CSV", lon_col))?;
    let alt_idx = headers.iter().position(|h| h == alt_col);

    // Collect records for progress bar
    let records: Vec<_> = reader.records().collect::<Result<_, _>>()?;
    let total = records.len() as u64;

    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
            )?
            .progress_chars("#>-"),
    );

    // Prepare output
    let output_path = output.unwrap_or_else(|| {
        let stem = input.file_stem().unwrap().to_string_lossy();
        input.with_file_name(format!("{}_terrain.csv", stem))
    });
    let output_file = File::create(&output_path).context("Failed to create output file")?;
    let mut writer = csv::Writer::from_writer(BufWriter::new(output_file));

    // Write header
    let mut new_headers: Vec<&str> = headers.iter().collect();
    new_headers.push("elevation");
    new_headers.push("agl");
    new_headers.push("terrain_valid");
    writer.write_record(&new_headers)?;

    let mut reloads = 0u64;

    // Replay the track: each fix runs the reload policy, then queries.
    for record in records {
        let lat: f64 = record
            .get(lat_idx)
            .context("Missing latitude")?
            .parse()
            .context("Invalid latitude")?;
        let lon: f64 = record
            .get(lon_idx)
            .context("Missing longitude")?
            .parse()
            .context("Invalid longitude")?;
        let alt: Option<f64> = alt_idx
            .and_then(|i| record.get(i))
            .and_then(|s| s.parse().ok());

        if cache.maintain_blocking(lat, lon) {
            reloads += 1;
        }

        let elevation = cache.elevation_at(lat, lon);
        let elevation_str = elevation
            .sample
            .map(|e| e.to_string())
            .unwrap_or_else(|| "void".to_string());
        let agl_str = alt
            .and_then(|a| cache.agl(lat, lon, a))
            .map(|a| format!("{:.0}", a))
            .unwrap_or_default();
        let valid_str = elevation.valid.to_string();

        let mut new_record: Vec<&str> = record.iter().collect();
        new_record.push(&elevation_str);
        new_record.push(&agl_str);
        new_record.push(&valid_str);
        writer.write_record(&new_record)?;

        pb.inc(1);
    }

    pb.finish_with_message("done");
    writer.flush()?;

    let stats = cache.stats();
    println!("Output written to: {}", output_path.display());
    println!(
        "Fixes: {}, window reloads: {} ({} failed)",
        total, reloads, stats.failed
    );

    Ok(())
}
