//! Tile file resolution.
//!
//! The cache doesn't assume where tile bytes come from: anything that can
//! hand out a seekable byte source per [`TileId`] works. [`DirTileStore`]
//! is the file-system implementation, resolving `<dir>/<name>.DEM` with a
//! fallback to extracting `<name>.DEM.zip` in place.

use std::collections::HashSet;
use std::fs::File;
use std::io::{Cursor, Read, Seek};
use std::path::{Path, PathBuf};

use memmap2::Mmap;

use crate::config::TileGeometry;
use crate::error::{DemError, Result};
use crate::tile::{TileId, TILE_EXTENSION};

/// A seekable byte source for one tile.
pub trait TileData: Read + Seek + Send {}

impl<T: Read + Seek + Send> TileData for T {}

impl std::fmt::Debug for dyn TileData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("TileData")
    }
}

/// Resolves tiles to their binary data.
pub trait TileStore: Send + Sync {
    /// Open the data for `tile`, verified to the expected length.
    fn open(&self, tile: TileId) -> Result<Box<dyn TileData>>;
}

/// Tile store over a directory of `.DEM` files.
pub struct DirTileStore {
    dir: PathBuf,
    geometry: TileGeometry,
}

impl DirTileStore {
    pub fn new<P: AsRef<Path>>(dir: P, geometry: TileGeometry) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            geometry,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Scan the directory for `.DEM` and `.DEM.zip` tiles.
    ///
    /// Returns a sorted, deduplicated list (if both `E100S10.DEM` and
    /// `E100S10.DEM.zip` exist, the tile appears once). Files whose names
    /// don't parse as tile identifiers are ignored.
    pub fn scan_tiles(&self) -> Vec<TileId> {
        let mut tiles = HashSet::new();

        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(_) => return Vec::new(),
        };

        for entry in entries.flatten() {
            let name = entry.file_name();
            let name = name.to_string_lossy();

            let base = name.strip_suffix(".zip").unwrap_or(&name);
            if let Some(id) = TileId::from_name(base) {
                tiles.insert(id);
            }
        }

        let mut result: Vec<TileId> = tiles.into_iter().collect();
        result.sort_by_key(|id| id.file_name());
        result
    }

    /// Extract a `.DEM` file from a local `.DEM.zip` archive.
    fn extract_from_zip(&self, zip_path: &Path, file_name: &str) -> Result<()> {
        let file = File::open(zip_path).map_err(DemError::Io)?;
        let mut archive = zip::ZipArchive::new(file)
            .map_err(|e| DemError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))?;

        let mut found = false;
        for i in 0..archive.len() {
            let mut entry = archive.by_index(i).map_err(|e| {
                DemError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
            })?;

            let entry_name = entry.name().to_string();
            if entry_name.ends_with(&format!(".{}", TILE_EXTENSION)) || entry_name == file_name {
                let out_path = self.dir.join(file_name);
                let mut out_file = File::create(&out_path)?;
                std::io::copy(&mut entry, &mut out_file)?;
                found = true;
                break;
            }
        }

        if !found {
            return Err(DemError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("No .{} file found in {}", TILE_EXTENSION, zip_path.display()),
            )));
        }

        Ok(())
    }
}

impl TileStore for DirTileStore {
    fn open(&self, tile: TileId) -> Result<Box<dyn TileData>> {
        let name = tile.file_name();
        let path = self.dir.join(&name);

        if !path.exists() {
            let zip_path = self.dir.join(format!("{}.zip", name));
            if zip_path.exists() {
                self.extract_from_zip(&zip_path, &name)?;
            } else {
                return Err(DemError::TileUnavailable { path });
            }
        }

        let file = File::open(&path)?;
        let size = file.metadata()?.len();
        let expected = self.geometry.byte_len();
        if size != expected {
            return Err(DemError::UnexpectedFileSize {
                path,
                size,
                expected,
            });
        }

        // SAFETY: The mapping is read-only and the file is expected to be
        // immutable dataset content; the map is not exposed beyond the
        // cursor handed back here.
        let mmap = unsafe { Mmap::map(&file)? };
        Ok(Box::new(Cursor::new(mmap)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    const GEOMETRY: TileGeometry = TileGeometry { cols: 10, rows: 8 };
    const TILE: TileId = TileId { lat: -10, lon: 100 };

    fn create_tile_file(dir: &Path, name: &str, fill: i16) {
        let mut data = Vec::with_capacity(GEOMETRY.byte_len() as usize);
        for _ in 0..GEOMETRY.cols * GEOMETRY.rows {
            data.extend_from_slice(&fill.to_be_bytes());
        }
        let mut file = File::create(dir.join(name)).unwrap();
        file.write_all(&data).unwrap();
    }

    fn create_tile_zip(dir: &Path, name: &str) {
        let data = vec![0u8; GEOMETRY.byte_len() as usize];
        let file = File::create(dir.join(format!("{}.zip", name))).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        let options = zip::write::SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Stored);
        writer.start_file(name, options).unwrap();
        writer.write_all(&data).unwrap();
        writer.finish().unwrap();
    }

    #[test]
    fn test_open_reads_verified_data() {
        let tmp = TempDir::new().unwrap();
        create_tile_file(tmp.path(), "E100S10.DEM", 250);

        let store = DirTileStore::new(tmp.path(), GEOMETRY);
        let mut src = store.open(TILE).unwrap();
        let mut pair = [0u8; 2];
        src.read_exact(&mut pair).unwrap();
        assert_eq!(i16::from_be_bytes(pair), 250);
    }

    #[test]
    fn test_open_missing_tile() {
        let tmp = TempDir::new().unwrap();
        let store = DirTileStore::new(tmp.path(), GEOMETRY);
        let err = store.open(TILE).unwrap_err();
        assert!(matches!(err, DemError::TileUnavailable { .. }));
    }

    #[test]
    fn test_open_wrong_size() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("E100S10.DEM"), vec![0u8; 50]).unwrap();

        let store = DirTileStore::new(tmp.path(), GEOMETRY);
        let err = store.open(TILE).unwrap_err();
        assert!(matches!(
            err,
            DemError::UnexpectedFileSize { size: 50, .. }
        ));
    }

    #[test]
    fn test_open_extracts_zip() {
        let tmp = TempDir::new().unwrap();
        create_tile_zip(tmp.path(), "E100S10.DEM");

        let store = DirTileStore::new(tmp.path(), GEOMETRY);
        assert!(store.open(TILE).is_ok());
        // Extracted alongside the archive for subsequent opens.
        assert!(tmp.path().join("E100S10.DEM").exists());
    }

    #[test]
    fn test_scan_tiles() {
        let tmp = TempDir::new().unwrap();
        create_tile_file(tmp.path(), "E100S10.DEM", 1);
        create_tile_file(tmp.path(), "W020N40.DEM", 1);
        std::fs::write(tmp.path().join("readme.txt"), "not a tile").unwrap();
        std::fs::write(tmp.path().join("E999S99.DEM"), "off-grid").unwrap();

        let store = DirTileStore::new(tmp.path(), GEOMETRY);
        let tiles = store.scan_tiles();
        assert_eq!(
            tiles,
            vec![TileId { lat: -10, lon: 100 }, TileId { lat: 40, lon: -20 }]
        );
    }

    #[test]
    fn test_scan_tiles_deduplicates_zip() {
        let tmp = TempDir::new().unwrap();
        create_tile_file(tmp.path(), "E100S10.DEM", 1);
        create_tile_zip(tmp.path(), "E100S10.DEM");

        let store = DirTileStore::new(tmp.path(), GEOMETRY);
        assert_eq!(store.scan_tiles(), vec![TILE]);
    }
}
