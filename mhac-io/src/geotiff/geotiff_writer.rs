use std::{
    fs::File,
    io::{BufWriter, Seek, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use mhac_core::raster::Raster;
use tiff::{
    encoder::{colortype, Compression, DeflateLevel, TiffEncoder},
    tags::Tag,
};

use super::{
    GT_MODEL_TYPE_GEO_KEY, GT_RASTER_TYPE_GEO_KEY, MODEL_TYPE_PROJECTED,
    PROJECTED_CS_TYPE_GEO_KEY, RASTER_PIXEL_IS_AREA, TAG_GDAL_NODATA, TAG_GEO_KEY_DIRECTORY,
};

/// Options for writing GeoTIFF rasters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeoTiffOptions {
    /// EPSG code of the projected coordinate reference system
    pub epsg: u16,
    /// Use deflate compression
    pub compress: bool,
}

impl Default for GeoTiffOptions {
    fn default() -> Self {
        Self {
            // SIRGAS 2000 / UTM zone 23S
            epsg: 31983,
            compress: true,
        }
    }
}

/// Builds the GeoKeyDirectory for a projected CRS with area pixels
fn geo_key_directory(epsg: u16) -> [u16; 16] {
    [
        1, 1, 0, 3, // header: version 1.1.0, 3 keys
        GT_MODEL_TYPE_GEO_KEY, 0, 1, MODEL_TYPE_PROJECTED,
        GT_RASTER_TYPE_GEO_KEY, 0, 1, RASTER_PIXEL_IS_AREA,
        PROJECTED_CS_TYPE_GEO_KEY, 0, 1, epsg,
    ]
}

/// Formats the no-data value the way GDAL expects it in the GDAL_NODATA tag
fn gdal_nodata_string(nodata: f32) -> String {
    if nodata.is_nan() {
        "nan".to_owned()
    } else {
        format!("{}", nodata)
    }
}

/// Writes `raster` as a single-band `f32` GeoTIFF to the given writer
pub fn write_geotiff<W: Write + Seek>(
    raster: &Raster,
    writer: W,
    options: &GeoTiffOptions,
) -> Result<()> {
    let grid = raster.grid();
    let (left, top) = grid.top_left();
    let resolution = grid.resolution();

    let mut tiff = TiffEncoder::new(writer)?;
    if options.compress {
        tiff = tiff.with_compression(Compression::Deflate(DeflateLevel::Balanced));
    }
    let mut image =
        tiff.new_image::<colortype::Gray32Float>(grid.width() as u32, grid.height() as u32)?;

    image
        .encoder()
        .write_tag(Tag::ModelPixelScaleTag, &[resolution, resolution, 0.0][..])?;
    image.encoder().write_tag(
        Tag::ModelTiepointTag,
        &[0.0, 0.0, 0.0, left, top, 0.0][..],
    )?;
    image
        .encoder()
        .write_tag(TAG_GEO_KEY_DIRECTORY, &geo_key_directory(options.epsg)[..])?;
    image
        .encoder()
        .write_tag(TAG_GDAL_NODATA, gdal_nodata_string(raster.nodata()).as_str())?;

    image.write_data(raster.data())?;
    Ok(())
}

fn temporary_sibling(path: &Path) -> PathBuf {
    let mut file_name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    file_name.push(format!(".{}.tmp", std::process::id()));
    path.with_file_name(file_name)
}

/// Writes `raster` to the GeoTIFF file at `path`, replacing any existing file. The raster is written to a temporary
/// file next to `path` first and then renamed, so `path` never holds a partially written raster
pub fn write_geotiff_file<P: AsRef<Path>>(
    raster: &Raster,
    path: P,
    options: &GeoTiffOptions,
) -> Result<()> {
    let path = path.as_ref();
    let tmp_path = temporary_sibling(path);
    let result = (|| -> Result<()> {
        let file = File::create(&tmp_path)
            .with_context(|| format!("Could not open file {} for writing", tmp_path.display()))?;
        let mut writer = BufWriter::new(file);
        write_geotiff(raster, &mut writer, options)?;
        writer.flush()?;
        std::fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "Could not move {} to {}",
                tmp_path.display(),
                path.display()
            )
        })
    })();
    if result.is_err() {
        let _ = std::fs::remove_file(&tmp_path);
    }
    result.with_context(|| format!("Failed to write GeoTIFF {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geo_key_directory() {
        let keys = geo_key_directory(31983);
        assert_eq!(keys[3], 3);
        assert_eq!(&keys[12..], &[3072, 0, 1, 31983]);
    }

    #[test]
    fn test_gdal_nodata_string() {
        assert_eq!(gdal_nodata_string(-9999.0), "-9999");
        assert_eq!(gdal_nodata_string(f32::NAN), "nan");
    }

    #[test]
    fn test_temporary_sibling() {
        let tmp = temporary_sibling(Path::new("/out/tiles_MDS/3313-311.tif"));
        assert_eq!(tmp.parent(), Some(Path::new("/out/tiles_MDS")));
        assert!(tmp
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("3313-311.tif."));
    }
}
