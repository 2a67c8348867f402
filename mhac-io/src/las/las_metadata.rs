use std::fmt::Display;

use las::Bounds;
use mhac_core::{math::Extent, nalgebra::Point2};

/// Converts a las-rs `Bounds` type into the XY `Extent` of the tile
pub fn las_bounds_to_extent(las_bounds: &Bounds) -> Extent {
    Extent::from_min_max_unchecked(
        Point2::new(las_bounds.min.x, las_bounds.min.y),
        Point2::new(las_bounds.max.x, las_bounds.max.y),
    )
}

/// Header information of a LAS/LAZ file
#[derive(Debug, Clone)]
pub struct LasMetadata {
    extent: Extent,
    min_z: f64,
    max_z: f64,
    point_count: usize,
    point_format: u8,
    version: String,
}

impl LasMetadata {
    /// Creates a new `LasMetadata`
    ///
    /// Example:
    /// ```
    /// use mhac_io::las::LasMetadata;
    /// use mhac_core::{math::Extent, nalgebra::Point2};
    ///
    /// let las_meta = LasMetadata::new(
    ///     Extent::from_min_max(Point2::new(0.0, 0.0), Point2::new(1.0, 1.0)),
    ///     (0.0, 1.0),
    ///     1024,
    ///     0,
    ///     "1.2",
    /// );
    /// assert_eq!(las_meta.number_of_points(), 1024);
    /// ```
    pub fn new<S: Into<String>>(
        extent: Extent,
        z_range: (f64, f64),
        point_count: usize,
        point_format: u8,
        version: S,
    ) -> Self {
        Self {
            extent,
            min_z: z_range.0,
            max_z: z_range.1,
            point_count,
            point_format,
            version: version.into(),
        }
    }

    /// XY bounds as stored in the header
    pub fn extent(&self) -> Extent {
        self.extent
    }

    /// Minimum and maximum Z as stored in the header
    pub fn z_range(&self) -> (f64, f64) {
        (self.min_z, self.max_z)
    }

    pub fn number_of_points(&self) -> usize {
        self.point_count
    }

    pub fn point_format(&self) -> u8 {
        self.point_format
    }

    pub fn version(&self) -> &str {
        &self.version
    }
}

impl Display for LasMetadata {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "LAS version:            {}", self.version)?;
        writeln!(f, "Point format:           {}", self.point_format)?;
        writeln!(f, "Number of points:       {}", self.point_count)?;
        writeln!(
            f,
            "Bounds (min):           {} {} {}",
            self.extent.min().x,
            self.extent.min().y,
            self.min_z
        )?;
        write!(
            f,
            "Bounds (max):           {} {} {}",
            self.extent.max().x,
            self.extent.max().y,
            self.max_z
        )
    }
}

impl From<&las::Header> for LasMetadata {
    fn from(header: &las::Header) -> Self {
        let bounds = header.bounds();
        let version = header.version();
        Self {
            extent: las_bounds_to_extent(&bounds),
            min_z: bounds.min.z,
            max_z: bounds.max.z,
            point_count: header.number_of_points() as usize,
            // 255 marks a format without a LAS number
            point_format: header.point_format().to_u8().unwrap_or(u8::MAX),
            version: format!("{}.{}", version.major, version.minor),
        }
    }
}
