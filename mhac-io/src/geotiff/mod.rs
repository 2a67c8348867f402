mod geotiff_writer;
pub use self::geotiff_writer::*;

mod geotiff_reader;
pub use self::geotiff_reader::*;

use tiff::tags::Tag;

/// GeoKeyDirectoryTag (GeoTIFF 1.0)
pub(crate) const TAG_GEO_KEY_DIRECTORY: Tag = Tag::Unknown(34735);
/// GDAL_NODATA, stored as an ASCII string
pub(crate) const TAG_GDAL_NODATA: Tag = Tag::Unknown(42113);

pub(crate) const GT_MODEL_TYPE_GEO_KEY: u16 = 1024;
pub(crate) const GT_RASTER_TYPE_GEO_KEY: u16 = 1025;
pub(crate) const PROJECTED_CS_TYPE_GEO_KEY: u16 = 3072;
pub(crate) const MODEL_TYPE_PROJECTED: u16 = 1;
pub(crate) const RASTER_PIXEL_IS_AREA: u16 = 1;
