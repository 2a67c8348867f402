use std::io::Cursor;

use anyhow::Result;
use assert_approx_eq::assert_approx_eq;
use mhac_core::{
    math::Extent,
    nalgebra::Point2,
    raster::{Grid, Raster},
};
use mhac_io::geotiff::{
    read_geotiff, read_geotiff_file, write_geotiff, write_geotiff_file, GeoTiffOptions,
};

fn sample_raster() -> Raster {
    let grid = Grid::new(333_000.0, 7_394_000.0, 1.0, 4, 3).unwrap();
    let mut raster = Raster::filled_with_nodata(grid, -9999.0);
    raster.update_max(0, 0, 7.2);
    raster.update_max(3, 2, 0.0);
    raster.update_max(1, 1, -1.5);
    raster
}

#[test]
fn test_geotiff_in_memory() -> Result<()> {
    let raster = sample_raster();
    let mut buffer = Cursor::new(Vec::new());
    write_geotiff(&raster, &mut buffer, &GeoTiffOptions::default())?;

    buffer.set_position(0);
    let read = read_geotiff(buffer)?;
    assert_eq!(Some(31983), read.epsg);
    assert_eq!(raster.grid(), read.raster.grid());
    assert_eq!(-9999.0, read.raster.nodata());
    assert_eq!(raster.data(), read.raster.data());
    Ok(())
}

#[test]
fn test_geotiff_tie_point_is_top_left() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("3313-311.tif");
    let options = GeoTiffOptions {
        epsg: 31983,
        compress: false,
    };
    write_geotiff_file(&sample_raster(), &path, &options)?;

    let read = read_geotiff_file(&path)?;
    assert_eq!((333_000.0, 7_394_003.0), read.raster.grid().top_left());
    assert_eq!((333_000.0, 7_394_000.0), read.raster.grid().origin());
    assert_eq!(Some(7.2), read.raster.get(0, 0));
    assert_eq!(None, read.raster.get(2, 0));

    // Only the final file is left behind
    let entries = std::fs::read_dir(dir.path())?.count();
    assert_eq!(1, entries);
    Ok(())
}

#[test]
fn test_write_into_missing_directory_fails_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("does_not_exist").join("3313-311.tif");
    assert!(write_geotiff_file(&sample_raster(), &path, &GeoTiffOptions::default()).is_err());
    assert!(!path.exists());
}

#[test]
fn test_geotiff_with_fractional_resolution() -> Result<()> {
    let footprint = Extent::from_min_max(
        Point2::new(334_954.3508709194, 7_393_999.95),
        Point2::new(334_960.0, 7_394_004.0),
    );
    let grid = Grid::covering(&footprint, 0.7)?;
    let mut raster = Raster::filled_with_nodata(grid, -9999.0);
    raster.update_max(2, 1, 12.5);

    let mut buffer = Cursor::new(Vec::new());
    write_geotiff(&raster, &mut buffer, &GeoTiffOptions::default())?;
    buffer.set_position(0);
    let read = read_geotiff(buffer)?;

    let (origin_x, origin_y) = read.raster.grid().origin();
    assert_approx_eq!(origin_x, grid.origin().0, 1e-6);
    assert_approx_eq!(origin_y, grid.origin().1, 1e-6);
    assert_eq!(grid.width(), read.raster.grid().width());
    assert_eq!(grid.height(), read.raster.grid().height());
    assert_eq!(Some(12.5), read.raster.get(2, 1));
    Ok(())
}
