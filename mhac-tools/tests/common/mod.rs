#![allow(dead_code)]

use std::path::{Path, PathBuf};

use anyhow::Result;
use las::{point::Classification, point::Format, Builder, Transform, Vector, Write, Writer};
use mhac_core::{containers::LidarPoint, math::Extent, nalgebra::Point2};
use mhac_io::articulation::{ArticulationEntry, ArticulationIndex};
use mhac_tools::config::MhacConfig;
use tempfile::TempDir;

/// Writes `points` as LAS 1.2 (point format 0) with millimeter precision. Files ending in `.laz` are compressed
pub fn write_las_file(path: &Path, points: &[LidarPoint]) -> Result<()> {
    let (offset_x, offset_y) = points
        .first()
        .map(|p| (p.x().floor(), p.y().floor()))
        .unwrap_or((0.0, 0.0));

    let mut builder = Builder::from((1, 2));
    builder.point_format = Format::new(0)?;
    builder.transforms = Vector {
        x: Transform {
            scale: 0.001,
            offset: offset_x,
        },
        y: Transform {
            scale: 0.001,
            offset: offset_y,
        },
        z: Transform {
            scale: 0.001,
            offset: 0.0,
        },
    };
    let header = builder.into_header()?;

    let mut writer = Writer::from_path(path, header)?;
    for point in points {
        writer.write(las::Point {
            x: point.x(),
            y: point.y(),
            z: point.z(),
            classification: Classification::new(point.classification)?,
            ..Default::default()
        })?;
    }
    writer.close()?;
    Ok(())
}

pub fn footprint(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Extent {
    Extent::from_min_max(Point2::new(min_x, min_y), Point2::new(max_x, max_y))
}

/// Ground points at the center of every cell of a `size` x `size` meter square, all at elevation `z`
pub fn flat_ground(origin_x: f64, origin_y: f64, size: usize, z: f64) -> Vec<LidarPoint> {
    let mut points = vec![];
    for i in 0..size {
        for j in 0..size {
            points.push(LidarPoint::new(
                origin_x + i as f64 + 0.5,
                origin_y + j as f64 + 0.5,
                z,
                2,
            ));
        }
    }
    points
}

/// Temporary data directory laid out like a real installation, with a configuration pointing into it
pub struct TestWorkspace {
    pub dir: TempDir,
    pub config: MhacConfig,
}

impl TestWorkspace {
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir()?;
        let config = MhacConfig {
            lidar_base_dir: dir.path().join("raw"),
            output_base_dir: dir.path().join("processed"),
            audit_dir: dir.path().join("audit"),
            ..Default::default()
        };
        Ok(Self { dir, config })
    }

    /// Writes the articulation index of `year`
    pub fn write_index(&self, year: u16, tiles: &[(&str, Extent)]) -> Result<()> {
        let year = self.config.year(year)?;
        let entries = tiles
            .iter()
            .map(|(tile_id, footprint)| ArticulationEntry {
                tile_id: tile_id.to_string(),
                footprint: *footprint,
            })
            .collect();
        ArticulationIndex::new(year.id_field.clone(), entries)
            .write_to_path(self.config.articulation_path(year))
    }

    /// Writes the point cloud file of a tile following the naming rule of `year`
    pub fn write_tile(&self, year: u16, tile_id: &str, points: &[LidarPoint]) -> Result<PathBuf> {
        let year = self.config.year(year)?;
        let raw_dir = self.config.raw_dir(year);
        std::fs::create_dir_all(&raw_dir)?;
        let path = raw_dir.join(year.file_name_for(tile_id));
        write_las_file(&path, points)?;
        Ok(path)
    }

    pub fn output_dir(&self) -> &Path {
        &self.config.output_base_dir
    }
}
