use mhac_core::{
    containers::{Dimension, PointCloud},
    raster::{Grid, Raster},
};

/// Bins the `dimension` values of all points in `cloud` onto `grid` and keeps the maximum per cell. Cells are
/// half-open, so a point on the boundary between two cells falls into the cell to its east or north. Points
/// outside of the grid and points without a finite value for `dimension` are ignored, cells without any point
/// hold `nodata`.
///
/// Values are stored as `f32`.
///
/// # Examples
/// ```
/// # use mhac_algorithms::rasterize::rasterize_max;
/// # use mhac_core::containers::{Dimension, LidarPoint, PointCloud};
/// # use mhac_core::raster::Grid;
/// let cloud: PointCloud = vec![
///     LidarPoint::new(0.2, 0.3, 5.0, 6),
///     LidarPoint::new(0.8, 0.9, 7.5, 6),
///     LidarPoint::new(1.5, 0.5, 2.0, 6),
/// ].into();
/// let grid = Grid::new(0.0, 0.0, 1.0, 2, 1).unwrap();
/// let raster = rasterize_max(&cloud, Dimension::Z, &grid, -9999.0);
/// assert_eq!(raster.get(0, 0), Some(7.5));
/// assert_eq!(raster.get(1, 0), Some(2.0));
/// ```
pub fn rasterize_max(cloud: &PointCloud, dimension: Dimension, grid: &Grid, nodata: f32) -> Raster {
    let mut raster = Raster::filled_with_nodata(*grid, nodata);
    let mut outside = 0usize;
    for point in cloud.iter() {
        let value = match dimension.value(point) {
            Some(value) if value.is_finite() => value,
            _ => continue,
        };
        match grid.cell_of(point.x(), point.y()) {
            Some((col, row)) => raster.update_max(col, row, value as f32),
            None => outside += 1,
        }
    }
    if outside > 0 {
        log::debug!(
            "{} points lie outside of grid {} and were not rasterized",
            outside,
            grid
        );
    }
    raster
}

#[cfg(test)]
mod tests {
    use super::*;
    use mhac_core::{classification::codes::BUILDING, containers::LidarPoint};

    fn grid_3x3() -> Grid {
        Grid::new(333_000.0, 7_394_000.0, 1.0, 3, 3).unwrap()
    }

    #[test]
    fn test_maximum_per_cell() {
        let cloud = [5.0, 7.2, 3.1, 7.2, 6.9, 4.4, 5.5, 7.1, 2.0, 6.0]
            .iter()
            .enumerate()
            .map(|(idx, z)| {
                let jitter = idx as f64 * 0.09;
                LidarPoint::new(333_001.05 + jitter, 7_394_001.05 + jitter, *z, BUILDING)
            })
            .collect::<PointCloud>();
        let raster = rasterize_max(&cloud, Dimension::Z, &grid_3x3(), -9999.0);

        // Cell (1, 1) from the south-west is the center cell
        assert_eq!(Some(7.2), raster.get(1, 1));
        assert_eq!(1, raster.valid_cell_count());
        assert_eq!(-9999.0, raster.value(0, 0));
    }

    #[test]
    fn test_single_point_keeps_its_value() {
        let cloud: PointCloud = vec![LidarPoint::new(333_002.5, 7_394_002.5, 761.25, 2)].into();
        let raster = rasterize_max(&cloud, Dimension::Z, &grid_3x3(), -9999.0);
        // Northernmost row is row 0
        assert_eq!(Some(761.25), raster.get(2, 0));
        assert_eq!(8, raster.data().iter().filter(|v| **v == -9999.0).count());
    }

    #[test]
    fn test_cell_boundaries_are_half_open() {
        let cloud: PointCloud = vec![
            LidarPoint::new(333_001.0, 7_394_000.5, 1.0, 2),
            LidarPoint::new(333_000.5, 7_394_002.0, 2.0, 2),
        ]
        .into();
        let raster = rasterize_max(&cloud, Dimension::Z, &grid_3x3(), -9999.0);
        assert_eq!(Some(1.0), raster.get(1, 2));
        assert_eq!(Some(2.0), raster.get(0, 0));
        assert_eq!(None, raster.get(0, 2));
    }

    #[test]
    fn test_points_outside_of_grid_are_ignored() {
        let cloud: PointCloud = vec![
            LidarPoint::new(332_999.9, 7_394_001.0, 10.0, 2),
            LidarPoint::new(333_003.0, 7_394_001.0, 10.0, 2),
            LidarPoint::new(333_001.0, 7_394_003.0, 10.0, 2),
        ]
        .into();
        let raster = rasterize_max(&cloud, Dimension::Z, &grid_3x3(), -9999.0);
        assert!(raster.is_empty());
    }

    #[test]
    fn test_height_above_ground_requires_value() {
        let mut with_hag = LidarPoint::new(333_000.5, 7_394_000.5, 750.0, BUILDING);
        with_hag.height_above_ground = Some(12.5);
        let without_hag = LidarPoint::new(333_001.5, 7_394_000.5, 760.0, BUILDING);
        let cloud: PointCloud = vec![with_hag, without_hag].into();

        let raster = rasterize_max(&cloud, Dimension::HeightAboveGround, &grid_3x3(), -9999.0);
        assert_eq!(Some(12.5), raster.get(0, 2));
        assert_eq!(None, raster.get(1, 2));
    }

    #[test]
    fn test_negative_heights_are_kept() {
        let mut below = LidarPoint::new(333_000.5, 7_394_000.5, 740.0, 2);
        below.height_above_ground = Some(-0.25);
        let cloud: PointCloud = vec![below].into();
        let raster = rasterize_max(&cloud, Dimension::HeightAboveGround, &grid_3x3(), -9999.0);
        assert_eq!(Some(-0.25), raster.get(0, 2));
    }
}
