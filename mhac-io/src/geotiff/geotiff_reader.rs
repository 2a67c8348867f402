use std::{
    fs::File,
    io::{BufReader, Read, Seek},
    path::Path,
};

use anyhow::{anyhow, bail, Context, Result};
use mhac_core::raster::{Grid, Raster};
use tiff::{
    decoder::{Decoder, DecodingResult},
    tags::Tag,
};

use super::{PROJECTED_CS_TYPE_GEO_KEY, TAG_GDAL_NODATA, TAG_GEO_KEY_DIRECTORY};

/// A raster read back from a GeoTIFF file, together with its CRS
#[derive(Debug, Clone)]
pub struct GeoTiffRaster {
    pub raster: Raster,
    /// EPSG code from the ProjectedCSTypeGeoKey, if present
    pub epsg: Option<u16>,
}

fn required_f64_tag<R: Read + Seek>(
    decoder: &mut Decoder<R>,
    tag: Tag,
    min_len: usize,
) -> Result<Vec<f64>> {
    let values = decoder
        .find_tag(tag)?
        .ok_or_else(|| anyhow!("Missing GeoTIFF tag {:?}", tag))?
        .into_f64_vec()?;
    if values.len() < min_len {
        bail!(
            "GeoTIFF tag {:?} has {} values, expected at least {}",
            tag,
            values.len(),
            min_len
        );
    }
    Ok(values)
}

fn read_epsg<R: Read + Seek>(decoder: &mut Decoder<R>) -> Result<Option<u16>> {
    let keys = match decoder.find_tag(TAG_GEO_KEY_DIRECTORY)? {
        Some(value) => value.into_u16_vec()?,
        None => return Ok(None),
    };
    Ok(keys
        .chunks_exact(4)
        .skip(1)
        .find(|key| key[0] == PROJECTED_CS_TYPE_GEO_KEY && key[1] == 0)
        .map(|key| key[3]))
}

/// Reads a single-band `f32` GeoTIFF written by [write_geotiff](super::write_geotiff)
pub fn read_geotiff<R: Read + Seek>(reader: R) -> Result<GeoTiffRaster> {
    let mut decoder = Decoder::new(reader)?;
    let (width, height) = decoder.dimensions()?;

    let scale = required_f64_tag(&mut decoder, Tag::ModelPixelScaleTag, 2)?;
    let tiepoint = required_f64_tag(&mut decoder, Tag::ModelTiepointTag, 6)?;
    if scale[0] != scale[1] {
        bail!(
            "Non-square pixels ({} x {}) are not supported",
            scale[0],
            scale[1]
        );
    }
    let resolution = scale[0];
    let origin_x = tiepoint[3];
    let origin_y = tiepoint[4] - height as f64 * resolution;

    let nodata = match decoder.find_tag(TAG_GDAL_NODATA)? {
        Some(value) => {
            let text = value.into_string()?;
            text.trim_end_matches('\0')
                .trim()
                .parse::<f32>()
                .with_context(|| format!("Invalid GDAL_NODATA value '{}'", text))?
        }
        None => f32::NAN,
    };
    let epsg = read_epsg(&mut decoder)?;

    let data = match decoder.read_image()? {
        DecodingResult::F32(data) => data,
        _ => bail!("Only f32 GeoTIFF rasters are supported"),
    };

    let grid = Grid::new(
        origin_x,
        origin_y,
        resolution,
        width as usize,
        height as usize,
    )?;
    Ok(GeoTiffRaster {
        raster: Raster::from_data(grid, nodata, data)?,
        epsg,
    })
}

/// Reads the GeoTIFF file at `path`
pub fn read_geotiff_file<P: AsRef<Path>>(path: P) -> Result<GeoTiffRaster> {
    let file = File::open(path.as_ref())
        .with_context(|| format!("Could not open GeoTIFF {}", path.as_ref().display()))?;
    read_geotiff(BufReader::new(file))
        .with_context(|| format!("Failed to read GeoTIFF {}", path.as_ref().display()))
}
