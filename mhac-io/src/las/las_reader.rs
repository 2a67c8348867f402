use std::{fmt::Debug, path::Path};

use anyhow::{Context, Result};
use las::{Read, Reader};
use mhac_core::containers::{LidarPoint, PointCloud};

use super::LasMetadata;

/// Reader for LAS and LAZ files that yields `LidarPoint`s. Only position and classification are kept, which is
/// all the raster products need
pub struct LasTileReader {
    reader: Reader<'static>,
    metadata: LasMetadata,
    current_point_index: usize,
}

impl LasTileReader {
    /// Creates a new `LasTileReader` by opening the file at the given `path`. Compression is detected from the
    /// file contents, so `.las` and `.laz` files are both supported.
    ///
    /// # Errors
    ///
    /// If `path` does not exist, cannot be opened or does not point to a valid LAS/LAZ file, an error is returned.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let las_reader = Reader::from_path(path.as_ref()).with_context(|| {
            format!(
                "Could not open point cloud file {}",
                path.as_ref().display()
            )
        })?;
        Ok(Self::from_las_reader(las_reader))
    }

    /// Creates a new `LasTileReader` from the given `std::io::Read`.
    ///
    /// # Errors
    ///
    /// If the given `Read` does not represent a valid LAS/LAZ file, an error is returned.
    pub fn from_read<R: std::io::Read + std::io::Seek + Send + Debug + 'static>(
        read: R,
    ) -> Result<Self> {
        let las_reader = Reader::new(read).context("Could not parse LAS header")?;
        Ok(Self::from_las_reader(las_reader))
    }

    fn from_las_reader(reader: Reader<'static>) -> Self {
        let metadata: LasMetadata = reader.header().into();
        Self {
            reader,
            metadata,
            current_point_index: 0,
        }
    }

    pub fn metadata(&self) -> &LasMetadata {
        &self.metadata
    }

    /// Returns the number of remaining points that can be read from this `LasTileReader`
    pub fn remaining_points(&self) -> usize {
        self.metadata.number_of_points() - self.current_point_index
    }

    /// Reads up to `count` points into `cloud`. Returns the number of points that were read
    pub fn read_into(&mut self, cloud: &mut PointCloud, count: usize) -> Result<usize> {
        let num_points_to_read = usize::min(count, self.remaining_points());
        let first_point_index = self.current_point_index;
        for _ in 0..num_points_to_read {
            let las_point = match self.reader.read() {
                Some(point) => point.with_context(|| {
                    format!("Could not read point {}", self.current_point_index)
                })?,
                None => break,
            };
            cloud.push(LidarPoint::new(
                las_point.x,
                las_point.y,
                las_point.z,
                u8::from(las_point.classification),
            ));
            self.current_point_index += 1;
        }
        Ok(self.current_point_index - first_point_index)
    }

    /// Reads all remaining points into a new `PointCloud`
    pub fn read_all(&mut self) -> Result<PointCloud> {
        let mut cloud = PointCloud::with_capacity(self.remaining_points());
        self.read_into(&mut cloud, self.remaining_points())?;
        Ok(cloud)
    }
}
