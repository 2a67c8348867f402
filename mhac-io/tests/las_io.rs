use std::{fs::File, io::BufReader};

use anyhow::Result;
use assert_approx_eq::assert_approx_eq;
use common::{write_las_file, TestTilePointDistribution};
use mhac_core::containers::{LidarPoint, PointCloud};
use mhac_io::{
    base::{list_point_cloud_files, read_all},
    las::LasTileReader,
};
use rand::{thread_rng, Rng};

mod common;

fn random_points(count: usize) -> Vec<LidarPoint> {
    thread_rng()
        .sample_iter(TestTilePointDistribution {
            origin_x: 333_000.0,
            origin_y: 7_394_000.0,
        })
        .take(count)
        .collect()
}

#[test]
fn test_read_all_las_file() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("MDS_3313-311_1000.las");
    let expected = random_points(1000);
    write_las_file(&path, &expected)?;

    let cloud = read_all(&path)?;
    assert_eq!(expected.len(), cloud.len());
    for (idx, (expected, actual)) in expected.iter().zip(cloud.iter()).enumerate() {
        assert_approx_eq!(expected.x(), actual.x(), 1e-3);
        assert_approx_eq!(expected.y(), actual.y(), 1e-3);
        assert_approx_eq!(expected.z(), actual.z(), 1e-3);
        assert_eq!(
            expected.classification, actual.classification,
            "Point {idx} has wrong classification"
        );
        assert!(actual.height_above_ground.is_none());
    }
    Ok(())
}

#[test]
fn test_metadata_from_header() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("tile.las");
    let points = vec![
        LidarPoint::new(333_010.0, 7_394_020.0, 740.0, 2),
        LidarPoint::new(333_090.5, 7_394_080.25, 761.5, 6),
    ];
    write_las_file(&path, &points)?;

    let reader = LasTileReader::from_path(&path)?;
    let meta = reader.metadata();
    assert_eq!(2, meta.number_of_points());
    assert_eq!(0, meta.point_format());
    assert_eq!("1.2", meta.version());
    let extent = meta.extent();
    assert_approx_eq!(extent.min().x, 333_010.0, 1e-3);
    assert_approx_eq!(extent.max().y, 7_394_080.25, 1e-3);
    assert_approx_eq!(meta.z_range().1, 761.5, 1e-3);
    Ok(())
}

#[test]
fn test_read_in_chunks() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("tile.las");
    write_las_file(&path, &random_points(250))?;

    let mut reader = LasTileReader::from_read(BufReader::new(File::open(&path)?))?;
    let mut cloud = PointCloud::new();
    assert_eq!(100, reader.read_into(&mut cloud, 100)?);
    assert_eq!(150, reader.remaining_points());
    assert_eq!(150, reader.read_into(&mut cloud, 1000)?);
    assert_eq!(0, reader.read_into(&mut cloud, 10)?);
    assert_eq!(250, cloud.len());
    Ok(())
}

#[test]
fn test_missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(read_all(dir.path().join("MDS_0000-000_1000.laz")).is_err());
}

#[test]
fn test_list_point_cloud_files_by_suffix() -> Result<()> {
    let dir = tempfile::tempdir()?;
    for name in ["MDS_b_1000.las", "MDS_a_1000.las", "MDS_c.las", "notes.txt"] {
        std::fs::write(dir.path().join(name), b"")?;
    }
    let files = list_point_cloud_files(dir.path(), "_1000.las")?;
    let names = files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["MDS_a_1000.las", "MDS_b_1000.las"]);
    Ok(())
}
