use std::{
    fmt::Display,
    path::{Path, PathBuf},
};

use mhac_core::{containers::Dimension, raster::Raster, MhacError};
use mhac_io::geotiff::{write_geotiff_file, GeoTiffOptions};

/// The two rasters produced per tile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Product {
    /// Maximum elevation of the retained points
    Mds,
    /// Maximum height above ground of the retained points
    Hag,
}

impl Product {
    /// Point value that is rasterized for this product
    pub fn dimension(&self) -> Dimension {
        match self {
            Product::Mds => Dimension::Z,
            Product::Hag => Dimension::HeightAboveGround,
        }
    }

    pub fn dir_name(&self) -> &'static str {
        match self {
            Product::Mds => "tiles_MDS",
            Product::Hag => "tiles_HAG",
        }
    }
}

impl Display for Product {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Product::Mds => write!(f, "MDS"),
            Product::Hag => write!(f, "HAG"),
        }
    }
}

/// Destination files of one tile: `<base>/<year>/tiles_MDS/<tile-id>.tif` and `<base>/<year>/tiles_HAG/<tile-id>.tif`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub mds: PathBuf,
    pub hag: PathBuf,
}

impl OutputPaths {
    pub fn for_tile<P: AsRef<Path>>(output_base_dir: P, year: u16, tile_id: &str) -> Self {
        let year_dir = output_base_dir.as_ref().join(year.to_string());
        let file_name = format!("{}.tif", tile_id);
        Self {
            mds: year_dir.join(Product::Mds.dir_name()).join(&file_name),
            hag: year_dir.join(Product::Hag.dir_name()).join(&file_name),
        }
    }

    /// True if both rasters of the tile are already on disk
    pub fn all_exist(&self) -> bool {
        self.mds.is_file() && self.hag.is_file()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    /// The destination existed and overwriting was not requested
    Skipped,
}

/// Writes `raster` as GeoTIFF to `path`. An existing file is left untouched unless `overwrite` is set; anything
/// else at `path` fails with `WriteFailure`. Missing parent directories are created
pub fn write_raster(
    raster: &Raster,
    path: &Path,
    overwrite: bool,
    options: &GeoTiffOptions,
) -> Result<WriteOutcome, MhacError> {
    if path.is_file() && !overwrite {
        log::debug!("{} exists, not overwriting it", path.display());
        return Ok(WriteOutcome::Skipped);
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| MhacError::write_failure(parent, e))?;
    }
    write_geotiff_file(raster, path, options)
        .map_err(|e| MhacError::write_failure(path, format!("{:#}", e)))?;
    Ok(WriteOutcome::Written)
}
